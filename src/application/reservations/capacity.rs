//! Per-slot table occupancy read from the reservation store.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{DomainResult, RepositoryProvider, TableFleet};

/// Free and taken tables of one slot, both ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    pub available: Vec<u32>,
    pub taken: Vec<u32>,
}

/// Answers which tables are reserved for a slot.
///
/// Every call reads the store directly, so a read issued after a successful
/// write for the same slot observes that write. Store failures propagate as
/// `DomainError::Unavailable`; they are never reported as free capacity.
#[derive(Clone)]
pub struct CapacityTracker {
    repos: Arc<dyn RepositoryProvider>,
    fleet: TableFleet,
}

impl CapacityTracker {
    pub fn new(repos: Arc<dyn RepositoryProvider>, fleet: TableFleet) -> Self {
        Self { repos, fleet }
    }

    /// Reserved table numbers for one slot, restricted to the fleet
    pub async fn occupied(
        &self,
        date: NaiveDate,
        slot_start: DateTime<Utc>,
    ) -> DomainResult<BTreeSet<u32>> {
        let reservations = self
            .repos
            .reservations()
            .find_for_slot(date, slot_start)
            .await?;

        Ok(reservations
            .into_iter()
            .map(|r| r.table_number)
            .filter(|t| self.fleet.contains(*t))
            .collect())
    }

    pub async fn occupancy(
        &self,
        date: NaiveDate,
        slot_start: DateTime<Utc>,
    ) -> DomainResult<Occupancy> {
        let taken = self.occupied(date, slot_start).await?;
        Ok(Occupancy {
            available: self.fleet.free(&taken),
            taken: taken.into_iter().collect(),
        })
    }

    /// Occupied tables of every slot on `date` that has at least one booking,
    /// in a single store round trip.
    pub async fn occupancy_for_date(
        &self,
        date: NaiveDate,
    ) -> DomainResult<HashMap<DateTime<Utc>, BTreeSet<u32>>> {
        let reservations = self.repos.reservations().find_for_date(date).await?;

        let mut by_slot: HashMap<DateTime<Utc>, BTreeSet<u32>> = HashMap::new();
        for r in reservations {
            if self.fleet.contains(r.table_number) {
                by_slot.entry(r.slot_start).or_default().insert(r.table_number);
            }
        }
        Ok(by_slot)
    }

    /// Free tables given an occupied set; never underflows
    pub fn remaining(&self, occupied: Option<&BTreeSet<u32>>) -> u32 {
        let taken = occupied.map_or(0, |o| o.len() as u32);
        self.fleet.size().saturating_sub(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::application::reservations::testing::FailingRepositoryProvider;
    use crate::domain::{DomainError, ReservationDraft};
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    async fn book(repos: &InMemoryRepositoryProvider, table_number: u32, start: DateTime<Utc>) {
        repos
            .reservations()
            .create(ReservationDraft {
                date: day(),
                slot_start: start,
                slot_end: start + Duration::minutes(30),
                table_number,
                order_id: format!("ORD-{table_number}"),
                user_id: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn occupancy_splits_fleet() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        book(&repos, 1, noon()).await;
        book(&repos, 3, noon()).await;
        let tracker = CapacityTracker::new(repos, TableFleet::numbered(5));

        let occ = tracker.occupancy(day(), noon()).await.unwrap();
        assert_eq!(occ.available, vec![2, 4, 5]);
        assert_eq!(occ.taken, vec![1, 3]);
        assert_eq!(occ.available.len() + occ.taken.len(), 5);
    }

    #[tokio::test]
    async fn bookings_outside_fleet_are_ignored() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        book(&repos, 9, noon()).await;
        let tracker = CapacityTracker::new(repos, TableFleet::numbered(5));

        assert!(tracker.occupied(day(), noon()).await.unwrap().is_empty());
        let by_slot = tracker.occupancy_for_date(day()).await.unwrap();
        assert!(by_slot.is_empty());
    }

    #[tokio::test]
    async fn read_after_write_sees_the_write() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let tracker = CapacityTracker::new(repos.clone(), TableFleet::numbered(5));
        assert!(tracker.occupied(day(), noon()).await.unwrap().is_empty());

        book(&repos, 2, noon()).await;
        let occupied = tracker.occupied(day(), noon()).await.unwrap();
        assert!(occupied.contains(&2));
    }

    #[tokio::test]
    async fn date_occupancy_groups_by_slot() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        book(&repos, 1, noon()).await;
        book(&repos, 2, noon() + Duration::minutes(30)).await;
        book(&repos, 4, noon() + Duration::minutes(30)).await;
        let tracker = CapacityTracker::new(repos, TableFleet::numbered(5));

        let by_slot = tracker.occupancy_for_date(day()).await.unwrap();
        assert_eq!(by_slot.len(), 2);
        assert_eq!(tracker.remaining(by_slot.get(&noon())), 4);
        assert_eq!(
            tracker.remaining(by_slot.get(&(noon() + Duration::minutes(30)))),
            3
        );
        assert_eq!(tracker.remaining(None), 5);
    }

    #[tokio::test]
    async fn store_failure_is_not_reported_as_free() {
        let tracker = CapacityTracker::new(
            Arc::new(FailingRepositoryProvider),
            TableFleet::numbered(5),
        );
        let err = tracker.occupancy(day(), noon()).await.unwrap_err();
        assert!(matches!(err, DomainError::Unavailable(_)));
    }
}
