//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::Json;

use crate::application::{BookingService, ReservationView};
use crate::interfaces::http::common::{ApiPath, ApiResponse, ApiResult, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub booking: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>,
            headers(("location" = String, description = "URL of the new reservation"))),
        (status = 400, description = "Invalid request or unknown theme"),
        (status = 409, description = "Slot already reserved")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<ApiResponse<ReservationDto>>)> {
    let date = request.parse_date()?;
    let time = request.parse_time()?;

    let created = state
        .booking
        .create_reservation(date, time, &request.name, request.theme_id)
        .await?;
    let theme = state.booking.get_theme(created.theme_id).await?;

    tracing::info!(
        reservation_id = created.id(),
        theme_id = created.theme_id,
        "Reservation created for {} {}",
        created.date,
        created.time
    );

    let location = format!("/api/v1/reservations/{}", created.id());
    let view = ReservationView {
        reservation: created,
        theme,
    };
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(ReservationDto::from(view))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation with its theme", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    ApiPath(reservation_id): ApiPath<i32>,
) -> ApiResult<Json<ApiResponse<ReservationDto>>> {
    let view = state.booking.get_reservation(reservation_id).await?;
    Ok(Json(ApiResponse::success(view.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Number of removed reservations (0 or 1)", body = ApiResponse<DeleteResponse>),
        (status = 404, description = "Reservation not found (strict delete mode only)")
    )
)]
pub async fn delete_reservation(
    State(state): State<ReservationAppState>,
    ApiPath(reservation_id): ApiPath<i32>,
) -> ApiResult<Json<ApiResponse<DeleteResponse>>> {
    let deleted = state.booking.delete_reservation(reservation_id).await?;
    if deleted > 0 {
        tracing::info!(reservation_id, "Reservation deleted");
    }
    Ok(Json(ApiResponse::success(DeleteResponse { deleted })))
}
