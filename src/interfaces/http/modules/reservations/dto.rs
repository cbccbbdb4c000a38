//! Reservation DTOs

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{NextAvailable, SlotAvailability, SlotTables};
use crate::domain::{DomainError, DomainResult, Reservation};

// ── Query parameters ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Venue-local date, `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NextAvailableQuery {
    /// Search origin (RFC 3339). Defaults to now.
    pub from: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TablesQuery {
    /// Start of the slot (RFC 3339)
    pub slot_start: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReservationListQuery {
    /// Only reservations on this venue-local date, `YYYY-MM-DD`
    pub date: Option<String>,
    pub user_id: Option<String>,
}

/// Years accepted in date parameters
const DATE_YEARS: std::ops::RangeInclusive<i32> = 1970..=9999;

pub fn parse_date(field: &str, raw: &str) -> DomainResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        DomainError::InvalidArgument(format!("{field} must be a YYYY-MM-DD date, got '{raw}'"))
    })?;
    if !DATE_YEARS.contains(&date.year()) {
        return Err(DomainError::InvalidArgument(format!(
            "{field} year must be between {} and {}, got '{raw}'",
            DATE_YEARS.start(),
            DATE_YEARS.end()
        )));
    }
    Ok(date)
}

pub fn parse_instant(field: &str, raw: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            DomainError::InvalidArgument(format!("{field} must be an RFC 3339 timestamp, got '{raw}'"))
        })
}

// ── Request bodies ─────────────────────────────────────────────

/// Book one table for one slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Start of the slot (RFC 3339)
    pub slot_start: DateTime<Utc>,
    #[validate(range(min = 1, message = "Table number must be positive"))]
    pub table_number: u32,
    /// Checkout order the booking belongs to
    #[validate(length(min = 1, max = 64, message = "Order id must be 1-64 characters"))]
    pub order_id: String,
    /// Falls back to the `X-User-Id` header when omitted
    #[validate(length(min = 1, max = 128))]
    pub user_id: Option<String>,
}

// ── Responses ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotDto {
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    /// Venue-local "HH:MM - HH:MM"
    pub label: String,
    pub remaining_tables: u32,
    pub is_full: bool,
}

impl From<SlotAvailability> for TimeSlotDto {
    fn from(s: SlotAvailability) -> Self {
        Self {
            slot_start: s.slot.starts_at,
            slot_end: s.slot.ends_at,
            label: s.slot.label,
            remaining_tables: s.remaining_tables,
            is_full: s.is_full,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDto {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlotDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextAvailableDto {
    /// "Today, 12:00 - 12:30", "Tomorrow, ..." or "No tables available in the next N days"
    pub label: String,
    pub is_today: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_tables: Option<u32>,
}

impl From<NextAvailable> for NextAvailableDto {
    fn from(next: NextAvailable) -> Self {
        Self {
            label: next.label(),
            is_today: next.is_today(),
            slot_start: next.slot().map(|s| s.slot.starts_at),
            remaining_tables: next.slot().map(|s| s.remaining_tables),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotTablesDto {
    pub slot_start: DateTime<Utc>,
    pub label: String,
    pub available_tables: Vec<u32>,
    pub taken_tables: Vec<u32>,
}

impl From<SlotTables> for SlotTablesDto {
    fn from(t: SlotTables) -> Self {
        Self {
            slot_start: t.slot.starts_at,
            label: t.slot.label,
            available_tables: t.occupancy.available,
            taken_tables: t.occupancy.taken,
        }
    }
}

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: i32,
    pub date: NaiveDate,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub table_number: u32,
    pub order_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            date: r.date,
            slot_start: r.slot_start,
            slot_end: r.slot_end,
            table_number: r.table_number,
            order_id: r.order_id,
            user_id: r.user_id,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_iso_only() {
        assert_eq!(
            parse_date("date", "2026-10-19").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert!(matches!(
            parse_date("date", "19-10-2026"),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn out_of_range_years_are_rejected() {
        for raw in ["+262142-12-31", "-0001-01-01", "1969-12-31"] {
            assert!(
                matches!(parse_date("date", raw), Err(DomainError::InvalidArgument(_))),
                "{raw}"
            );
        }
        assert!(parse_date("date", "9999-12-31").is_ok());
    }

    #[test]
    fn instants_accept_offsets() {
        let parsed = parse_instant("from", "2026-10-19T14:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-10-19T12:00:00+00:00");
        assert!(parse_instant("from", "noon").is_err());
    }

    #[test]
    fn none_found_omits_slot_fields() {
        let dto = NextAvailableDto::from(NextAvailable::NoneFound { horizon_days: 7 });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["label"], "No tables available in the next 7 days");
        assert_eq!(json["isToday"], false);
        assert!(json.get("slotStart").is_none());
    }
}
