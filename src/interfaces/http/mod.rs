//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, extractors
//! - `modules`: reservation, health and metrics handlers plus middleware
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use common::{ApiError, ApiResponse, SessionContext};
pub use modules::health::HealthState;
pub use modules::metrics::describe_metrics;
pub use modules::reservations::ReservationAppState;
pub use router::{create_api_router, ApiDoc};
