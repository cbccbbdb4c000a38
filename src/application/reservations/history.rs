//! Read access to stored reservations

use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Reservation, ReservationFilter};

pub struct ReservationHistory {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReservationHistory {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn get(&self, id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn list(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_all(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::application::reservations::testing::book;
    use crate::infrastructure::InMemoryRepositoryProvider;

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let history = ReservationHistory::new(Arc::new(InMemoryRepositoryProvider::new()));
        let err = history.get(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_filters_by_date() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let monday = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap();
        book(&repos, monday, &[1, 2]).await;
        book(&repos, tuesday, &[1]).await;
        let history = ReservationHistory::new(repos);

        let on_monday = history
            .list(ReservationFilter {
                date: Some(monday.date_naive()),
                user_id: None,
            })
            .await
            .unwrap();
        assert_eq!(on_monday.len(), 2);

        let first = history.get(on_monday[0].id).await.unwrap();
        assert_eq!(first, on_monday[0]);
    }
}
