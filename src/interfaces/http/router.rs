//! API Router with Swagger UI

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::BookingService;
use crate::domain::RepositoryProvider;

use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::request_id::request_id_middleware;
use super::modules::reservations::{self, ReservationAppState};
use super::modules::themes::{self, ThemeAppState};

/// Unified state for every route. Handlers extract their own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<BookingService>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(booking: Arc<BookingService>, repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            booking,
            repos,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for ReservationAppState {
    fn from_ref(s: &AppState) -> Self {
        ReservationAppState {
            booking: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<AppState> for ThemeAppState {
    fn from_ref(s: &AppState) -> Self {
        ThemeAppState {
            booking: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            repos: Arc::clone(&s.repos),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::delete_reservation,
        themes::get_theme,
        themes::delete_theme,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            reservations::DeleteResponse,
            themes::ThemeDto,
        )
    ),
    tags(
        (name = "Health", description = "Service and storage health"),
        (name = "Reservations", description = "Book, look up and cancel escape-room slots"),
        (name = "Themes", description = "Escape-room themes"),
    ),
    info(
        title = "Room Escape Reservation API",
        version = "1.0.0",
        description = "REST API for booking escape-room time slots",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState, request_timeout: Duration) -> Router {
    let reservation_routes = Router::new()
        .route("/", post(reservations::create_reservation))
        .route(
            "/{reservation_id}",
            get(reservations::get_reservation).delete(reservations::delete_reservation),
        );

    let theme_routes = Router::new().route(
        "/{theme_id}",
        get(themes::get_theme).delete(themes::delete_theme),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/themes", theme_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
}

// ── Tests ──────────────────────────────────────────────────────
