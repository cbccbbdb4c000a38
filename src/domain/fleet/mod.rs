//! Table fleet

pub mod model;

pub use model::TableFleet;
