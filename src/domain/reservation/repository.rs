//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::{Reservation, ReservationDraft, ReservationFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist a new reservation.
    ///
    /// Must be atomic with respect to the occupancy check: if a reservation
    /// already exists for the same (date, slot_start, table_number) this
    /// returns `DomainError::Conflict` and stores nothing.
    async fn create(&self, draft: ReservationDraft) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// All reservations for one slot
    async fn find_for_slot(
        &self,
        date: NaiveDate,
        slot_start: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;

    /// All reservations on a venue-local date
    async fn find_for_date(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>>;

    /// Reservation history, ordered by slot start then table number
    async fn find_all(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>>;
}
