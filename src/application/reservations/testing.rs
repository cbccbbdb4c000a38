//! Shared fixtures for reservation tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationDraft,
    ReservationFilter, ReservationRepository, ServiceSchedule,
};
use crate::infrastructure::InMemoryRepositoryProvider;

/// Weekdays 12:00-14:00 UTC in 30 minute slots
pub fn lunch_schedule() -> ServiceSchedule {
    ServiceSchedule::new(
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        30,
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ],
        vec![],
        FixedOffset::east_opt(0).unwrap(),
    )
    .unwrap()
}

/// Reserve `tables` for the 30 minute slot starting at `start`
pub async fn book(repos: &InMemoryRepositoryProvider, start: DateTime<Utc>, tables: &[u32]) {
    for &table_number in tables {
        repos
            .reservations()
            .create(ReservationDraft {
                date: start.date_naive(),
                slot_start: start,
                slot_end: start + Duration::minutes(30),
                table_number,
                order_id: format!("ORD-{}-{}", start.format("%d%H%M"), table_number),
                user_id: None,
            })
            .await
            .unwrap();
    }
}

/// Store whose every call fails as if the database were unreachable
pub struct FailingRepositoryProvider;

#[async_trait]
impl ReservationRepository for FailingRepositoryProvider {
    async fn create(&self, _draft: ReservationDraft) -> DomainResult<Reservation> {
        Err(unreachable_store())
    }

    async fn find_by_id(&self, _id: i32) -> DomainResult<Option<Reservation>> {
        Err(unreachable_store())
    }

    async fn find_for_slot(
        &self,
        _date: NaiveDate,
        _slot_start: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        Err(unreachable_store())
    }

    async fn find_for_date(&self, _date: NaiveDate) -> DomainResult<Vec<Reservation>> {
        Err(unreachable_store())
    }

    async fn find_all(&self, _filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        Err(unreachable_store())
    }
}

impl RepositoryProvider for FailingRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }
}

fn unreachable_store() -> DomainError {
    DomainError::Unavailable("Database error: connection refused".into())
}
