//! Service schedule
//!
//! Generates the reservable time slots of a venue-local service day.

pub mod model;

pub use model::{ServiceSchedule, Slot};
