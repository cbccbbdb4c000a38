//! Application layer: reservation use cases over the domain repositories

pub mod reservations;

pub use reservations::{
    AvailabilityResolver, CapacityTracker, NewReservation, NextAvailable, Occupancy,
    ReservationHistory, ReservationWriter, SlotAvailability, SlotTables,
};
