//! Reservation module: availability queries, booking creation and history

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
