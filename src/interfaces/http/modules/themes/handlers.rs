//! Theme HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::application::BookingService;
use crate::interfaces::http::common::{ApiPath, ApiResponse, ApiResult};
use crate::interfaces::http::modules::reservations::DeleteResponse;

use super::dto::ThemeDto;

#[derive(Clone)]
pub struct ThemeAppState {
    pub booking: Arc<BookingService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/themes/{theme_id}",
    tag = "Themes",
    params(("theme_id" = i32, Path, description = "Theme ID")),
    responses(
        (status = 200, description = "Theme details", body = ApiResponse<ThemeDto>),
        (status = 404, description = "Theme not found")
    )
)]
pub async fn get_theme(
    State(state): State<ThemeAppState>,
    ApiPath(theme_id): ApiPath<i32>,
) -> ApiResult<Json<ApiResponse<ThemeDto>>> {
    let theme = state.booking.get_theme(theme_id).await?;
    Ok(Json(ApiResponse::success(theme.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/themes/{theme_id}",
    tag = "Themes",
    params(("theme_id" = i32, Path, description = "Theme ID")),
    responses(
        (status = 200, description = "Number of removed themes (0 or 1)", body = ApiResponse<DeleteResponse>),
        (status = 409, description = "Theme is still referenced by reservations")
    )
)]
pub async fn delete_theme(
    State(state): State<ThemeAppState>,
    ApiPath(theme_id): ApiPath<i32>,
) -> ApiResult<Json<ApiResponse<DeleteResponse>>> {
    let deleted = state.booking.delete_theme(theme_id).await?;
    if deleted > 0 {
        tracing::info!(theme_id, "Theme deleted");
    }
    Ok(Json(ApiResponse::success(DeleteResponse { deleted })))
}
