//! Reservation aggregate
//!
//! Contains the Reservation entity, related types, and repository interface.

pub mod model;
pub mod repository;

pub use model::{Reservation, ReservationDraft, ReservationFilter, SlotKey};
pub use repository::ReservationRepository;
