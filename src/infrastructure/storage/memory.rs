//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::reservation::{
    Reservation, ReservationDraft, ReservationFilter, ReservationRepository, SlotKey,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// In-memory reservation store.
///
/// `by_slot` is the uniqueness index: a booking is only stored once its
/// `SlotKey` entry has been claimed, so concurrent creates for the same
/// table and slot resolve to exactly one winner.
pub struct InMemoryReservationRepository {
    reservations: DashMap<i32, Reservation>,
    by_slot: DashMap<SlotKey, i32>,
    id_counter: AtomicI32,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self {
            reservations: DashMap::new(),
            by_slot: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }

    fn collect_sorted(&self, keep: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| (r.slot_start, r.table_number));
        found
    }
}

impl Default for InMemoryReservationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, draft: ReservationDraft) -> DomainResult<Reservation> {
        match self.by_slot.entry(draft.key()) {
            Entry::Occupied(existing) => Err(DomainError::Conflict(format!(
                "table {} is already reserved for {} (reservation {})",
                draft.table_number,
                draft.slot_start.to_rfc3339(),
                existing.get()
            ))),
            Entry::Vacant(slot) => {
                let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
                let reservation = draft.into_reservation(id, Utc::now());
                self.reservations.insert(id, reservation.clone());
                slot.insert(id);
                Ok(reservation)
            }
        }
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_for_slot(
        &self,
        date: NaiveDate,
        slot_start: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| r.date == date && r.slot_start == slot_start))
    }

    async fn find_for_date(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| r.date == date))
    }

    async fn find_all(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| filter.matches(r)))
    }
}

/// Repository provider backed entirely by memory
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    reservations: InMemoryReservationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}
