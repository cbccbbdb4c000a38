//! Booking creation.
//!
//! The only write path of the reservation subsystem. Validation happens
//! before the store is touched; the occupancy check itself is left to the
//! store's atomic insert so two racing callers cannot both win.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationDraft,
    ServiceSchedule, TableFleet,
};

/// Request to book one table for one slot
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub slot_start: DateTime<Utc>,
    pub table_number: u32,
    pub order_id: String,
    pub user_id: Option<String>,
}

pub struct ReservationWriter {
    repos: Arc<dyn RepositoryProvider>,
    schedule: Arc<ServiceSchedule>,
    fleet: TableFleet,
}

impl ReservationWriter {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        schedule: Arc<ServiceSchedule>,
        fleet: TableFleet,
    ) -> Self {
        Self {
            repos,
            schedule,
            fleet,
        }
    }

    /// Book `request.table_number` for the slot starting at
    /// `request.slot_start`.
    ///
    /// Errors:
    /// - `InvalidArgument` for an unknown table, a time that is not a slot
    ///   start, a slot that already started at `now`, or an empty order id;
    /// - `Conflict` when the table is already reserved for that slot;
    /// - `Unavailable` when the store cannot be reached.
    pub async fn reserve(
        &self,
        request: NewReservation,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let draft = self.validate(request, now)?;
        let table_number = draft.table_number;
        let slot_start = draft.slot_start;

        match self.repos.reservations().create(draft).await {
            Ok(reservation) => {
                metrics::counter!("reservations_created_total").increment(1);
                info!(
                    reservation_id = reservation.id,
                    table_number,
                    slot_start = %slot_start,
                    "Table reserved"
                );
                Ok(reservation)
            }
            Err(e @ DomainError::Conflict(_)) => {
                metrics::counter!("reservation_conflicts_total").increment(1);
                warn!(table_number, slot_start = %slot_start, "Reservation conflict");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn validate(&self, request: NewReservation, now: DateTime<Utc>) -> DomainResult<ReservationDraft> {
        if !self.fleet.contains(request.table_number) {
            return Err(DomainError::InvalidArgument(format!(
                "table {} does not exist (tables 1-{})",
                request.table_number,
                self.fleet.size()
            )));
        }

        let order_id = request.order_id.trim();
        if order_id.is_empty() {
            return Err(DomainError::InvalidArgument("order id is required".into()));
        }

        let slot = self.schedule.slot_at(request.slot_start).ok_or_else(|| {
            DomainError::InvalidArgument(format!(
                "{} is not the start of a reservable slot",
                request.slot_start.to_rfc3339()
            ))
        })?;

        if slot.starts_at < now {
            return Err(DomainError::InvalidArgument(format!(
                "slot {} on {} has already started",
                slot.label, slot.date
            )));
        }

        Ok(ReservationDraft::for_slot(
            &slot,
            request.table_number,
            order_id,
            request.user_id,
        ))
    }
}
