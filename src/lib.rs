//! # Campus Table Reservations
//!
//! Table reservation availability for the campus food-ordering storefront:
//! time-slot generation, per-slot table occupancy, next-available search and
//! atomic booking.
//!
//! ## Architecture
//!
//! - **domain**: schedule and slots, table fleet, reservation aggregate and
//!   repository traits
//! - **application**: capacity tracking, availability queries, booking
//! - **infrastructure**: SeaORM/SQLite and in-memory reservation stores
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::create_api_router;
