//! Table reservation use cases
//!
//! - `CapacityTracker`: occupied/free tables per slot, read from the store
//! - `AvailabilityResolver`: slot listing, table detail, next-available search
//! - `ReservationWriter`: validated, atomic booking creation
//! - `ReservationHistory`: lookup of stored bookings

mod availability;
mod capacity;
mod history;
mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::{AvailabilityResolver, NextAvailable, SlotAvailability, SlotTables};
pub use capacity::{CapacityTracker, Occupancy};
pub use history::ReservationHistory;
pub use writer::{NewReservation, ReservationWriter};
