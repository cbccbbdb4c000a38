//! Reservation domain entity

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::schedule::Slot;

/// Identity of one bookable unit: a table in a slot on a date.
/// At most one reservation may exist per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub slot_start: DateTime<Utc>,
    pub table_number: u32,
}

/// Confirmed table booking, created when a checkout completes with the
/// "reserve table" delivery type. Never updated once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    /// Venue-local date of the slot
    pub date: NaiveDate,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub table_number: u32,
    /// Checkout order this booking belongs to
    pub order_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            slot_start: self.slot_start,
            table_number: self.table_number,
        }
    }
}

/// A validated booking not yet persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationDraft {
    pub date: NaiveDate,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub table_number: u32,
    pub order_id: String,
    pub user_id: Option<String>,
}

impl ReservationDraft {
    pub fn for_slot(
        slot: &Slot,
        table_number: u32,
        order_id: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            date: slot.date,
            slot_start: slot.starts_at,
            slot_end: slot.ends_at,
            table_number,
            order_id: order_id.into(),
            user_id,
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            slot_start: self.slot_start,
            table_number: self.table_number,
        }
    }

    pub fn into_reservation(self, id: i32, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            date: self.date,
            slot_start: self.slot_start,
            slot_end: self.slot_end,
            table_number: self.table_number,
            order_id: self.order_id,
            user_id: self.user_id,
            created_at,
        }
    }
}

/// Criteria for listing reservation history. Empty filter lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub date: Option<NaiveDate>,
    pub user_id: Option<String>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.date.map_or(true, |d| reservation.date == d)
            && self
                .user_id
                .as_deref()
                .map_or(true, |u| reservation.user_id.as_deref() == Some(u))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_slot() -> Slot {
        let starts_at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        Slot {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            starts_at,
            ends_at: starts_at + Duration::minutes(30),
            label: "12:00 - 12:30".into(),
        }
    }

    #[test]
    fn draft_carries_slot_identity() {
        let draft = ReservationDraft::for_slot(&sample_slot(), 3, "ORD-1", None);
        let r = draft.clone().into_reservation(9, Utc::now());
        assert_eq!(r.id, 9);
        assert_eq!(r.key(), draft.key());
        assert_eq!(r.table_number, 3);
    }

    #[test]
    fn filter_matches_date_and_user() {
        let r = ReservationDraft::for_slot(&sample_slot(), 1, "ORD-1", Some("u-1".into()))
            .into_reservation(1, Utc::now());

        assert!(ReservationFilter::default().matches(&r));
        assert!(ReservationFilter {
            date: Some(r.date),
            user_id: Some("u-1".into()),
        }
        .matches(&r));
        assert!(!ReservationFilter {
            date: None,
            user_id: Some("u-2".into()),
        }
        .matches(&r));
        assert!(!ReservationFilter {
            date: r.date.succ_opt(),
            user_id: None,
        }
        .matches(&r));
    }
}
