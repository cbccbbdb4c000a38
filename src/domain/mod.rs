//! Domain layer: schedule, table fleet and the reservation aggregate

pub mod fleet;
pub mod repositories;
pub mod reservation;
pub mod schedule;

pub use fleet::TableFleet;
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{Reservation, ReservationDraft, ReservationFilter, ReservationRepository};
pub use schedule::{ServiceSchedule, Slot};

pub use crate::shared::errors::DomainError;
