//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use crate::domain::reservation::{
    Reservation, ReservationDraft, ReservationFilter, ReservationRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        date: m.date,
        slot_start: m.slot_start,
        slot_end: m.slot_end,
        table_number: m.table_number.max(0) as u32,
        order_id: m.order_id,
        user_id: m.user_id,
        created_at: m.created_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Unavailable(format!("Database error: {}", e))
}

/// A unique-index violation on insert means the table was taken between the
/// caller's read and this write.
fn insert_err(e: DbErr, draft: &ReservationDraft) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(format!(
            "table {} is already reserved for {}",
            draft.table_number,
            draft.slot_start.to_rfc3339()
        )),
        _ => db_err(e),
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, draft: ReservationDraft) -> DomainResult<Reservation> {
        debug!(
            "Saving reservation: table {} at {}",
            draft.table_number, draft.slot_start
        );

        let model = reservation::ActiveModel {
            id: NotSet,
            date: Set(draft.date),
            slot_start: Set(draft.slot_start),
            slot_end: Set(draft.slot_end),
            table_number: Set(draft.table_number as i32),
            order_id: Set(draft.order_id.clone()),
            user_id: Set(draft.user_id.clone()),
            created_at: Set(Utc::now()),
        };
        let saved = model
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, &draft))?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_for_slot(
        &self,
        date: NaiveDate,
        slot_start: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Date.eq(date))
            .filter(reservation::Column::SlotStart.eq(slot_start))
            .order_by_asc(reservation::Column::TableNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_for_date(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Date.eq(date))
            .order_by_asc(reservation::Column::SlotStart)
            .order_by_asc(reservation::Column::TableNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find();
        if let Some(date) = filter.date {
            query = query.filter(reservation::Column::Date.eq(date));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(reservation::Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_asc(reservation::Column::SlotStart)
            .order_by_asc(reservation::Column::TableNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;

    async fn repo() -> SeaOrmReservationRepository {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmReservationRepository::new(db)
    }

    fn draft(table_number: u32, hour: u32) -> ReservationDraft {
        let slot_start = Utc.with_ymd_and_hms(2026, 10, 19, hour, 0, 0).unwrap();
        ReservationDraft {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            slot_start,
            slot_end: slot_start + Duration::minutes(30),
            table_number,
            order_id: format!("ORD-{table_number}-{hour}"),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let repo = repo().await;
        let created = repo.create(draft(2, 12)).await.unwrap();
        assert!(created.id > 0);

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.table_number, 2);
        assert_eq!(found.slot_start, created.slot_start);

        let d = draft(2, 12);
        let slot = repo.find_for_slot(d.date, d.slot_start).await.unwrap();
        assert_eq!(slot.len(), 1);
    }

    #[tokio::test]
    async fn unique_index_reports_conflict() {
        let repo = repo().await;
        repo.create(draft(1, 12)).await.unwrap();
        let err = repo.create(draft(1, 12)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)), "got {err:?}");

        // Same table, different slot is fine
        repo.create(draft(1, 13)).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_have_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("race.db").display());
        let mut opts = ConnectOptions::new(url);
        opts.max_connections(4).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repo = Arc::new(SeaOrmReservationRepository::new(db));

        let attempts: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let mut d = draft(4, 12);
                    d.order_id = format!("ORD-{i}");
                    repo.create(d).await
                })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => successes += 1,
                Err(DomainError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);

        let d = draft(4, 12);
        assert_eq!(repo.find_for_slot(d.date, d.slot_start).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn date_listing_is_ordered() {
        let repo = repo().await;
        repo.create(draft(3, 13)).await.unwrap();
        repo.create(draft(2, 12)).await.unwrap();
        repo.create(draft(1, 13)).await.unwrap();

        let day = repo
            .find_for_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
            .await
            .unwrap();
        let order: Vec<_> = day
            .iter()
            .map(|r| (r.slot_start.format("%H").to_string(), r.table_number))
            .collect();
        assert_eq!(
            order,
            vec![("12".to_string(), 2), ("13".to_string(), 1), ("13".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn missing_schema_surfaces_unavailable() {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        let repo = SeaOrmReservationRepository::new(db);
        // No migrations: the table does not exist, every query fails.
        let err = repo.find_by_id(1).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
