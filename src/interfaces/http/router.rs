//! API Router with Swagger UI

use std::time::Duration;

use axum::{
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{self, http_metrics_middleware, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::reservations::{self, ReservationAppState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Reservations
        reservations::get_availability,
        reservations::get_next_available,
        reservations::get_tables,
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::get_reservation,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            reservations::CreateReservationRequest,
            reservations::TimeSlotDto,
            reservations::AvailabilityDto,
            reservations::NextAvailableDto,
            reservations::SlotTablesDto,
            reservations::ReservationDto,
        )
    ),
    tags(
        (name = "Health", description = "Service and reservation store health"),
        (name = "Reservations", description = "Table availability per time slot, next free slot and booking"),
    ),
    info(
        title = "Campus Table Reservations API",
        version = "1.0.0",
        description = "Time-slot table availability and booking for the campus food-ordering storefront",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `metrics_handle` mounts `GET /metrics` when a Prometheus recorder is
/// installed.
pub fn create_api_router(
    reservation_state: ReservationAppState,
    health_state: HealthState,
    metrics_handle: Option<PrometheusHandle>,
    request_timeout: Duration,
) -> Router {
    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/availability", get(reservations::get_availability))
        .route("/next-available", get(reservations::get_next_available))
        .route("/tables", get(reservations::get_tables))
        .route("/{reservation_id}", get(reservations::get_reservation))
        .with_state(reservation_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest("/api/v1/reservations", reservation_routes);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
