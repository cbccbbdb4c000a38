//! Slot listing and next-available search.
//!
//! Pure queries over the schedule and the capacity tracker: nothing here
//! writes to the store or holds a table for the caller.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::debug;

use super::capacity::{CapacityTracker, Occupancy};
use crate::domain::{DomainError, DomainResult, ServiceSchedule, Slot};

/// A generated slot with its derived capacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: Slot,
    pub remaining_tables: u32,
    pub is_full: bool,
}

/// Table-level detail for one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTables {
    pub slot: Slot,
    pub occupancy: Occupancy,
}

/// Outcome of a next-available search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAvailable {
    Found {
        slot: SlotAvailability,
        /// Slot falls on the venue-local date of the search origin
        is_today: bool,
        label: String,
    },
    NoneFound {
        horizon_days: u32,
    },
}

impl NextAvailable {
    pub fn label(&self) -> String {
        match self {
            Self::Found { label, .. } => label.clone(),
            Self::NoneFound { horizon_days } => {
                format!("No tables available in the next {} days", horizon_days)
            }
        }
    }

    pub fn is_today(&self) -> bool {
        matches!(self, Self::Found { is_today: true, .. })
    }

    pub fn slot(&self) -> Option<&SlotAvailability> {
        match self {
            Self::Found { slot, .. } => Some(slot),
            Self::NoneFound { .. } => None,
        }
    }
}

pub struct AvailabilityResolver {
    schedule: Arc<ServiceSchedule>,
    capacity: CapacityTracker,
    horizon_days: u32,
}

impl AvailabilityResolver {
    pub fn new(schedule: Arc<ServiceSchedule>, capacity: CapacityTracker, horizon_days: u32) -> Self {
        Self {
            schedule,
            capacity,
            horizon_days,
        }
    }

    /// Every generated slot of `date` with its remaining table count,
    /// full ones included, in chronological order.
    pub async fn list_slots(&self, date: NaiveDate) -> DomainResult<Vec<SlotAvailability>> {
        let slots = self.schedule.slots_for(date);
        if slots.is_empty() {
            return Ok(Vec::new());
        }

        let occupancy = self.capacity.occupancy_for_date(date).await?;
        Ok(slots
            .into_iter()
            .map(|slot| {
                let remaining_tables = self.capacity.remaining(occupancy.get(&slot.starts_at));
                SlotAvailability {
                    slot,
                    remaining_tables,
                    is_full: remaining_tables == 0,
                }
            })
            .collect())
    }

    /// Free and taken tables of the slot starting at `slot_start`
    pub async fn tables_for(&self, slot_start: DateTime<Utc>) -> DomainResult<SlotTables> {
        let slot = self.schedule.slot_at(slot_start).ok_or_else(|| {
            DomainError::InvalidArgument(format!(
                "{} is not the start of a reservable slot",
                slot_start.to_rfc3339()
            ))
        })?;

        let occupancy = self.capacity.occupancy(slot.date, slot.starts_at).await?;
        Ok(SlotTables { slot, occupancy })
    }

    /// Earliest bookable slot starting at or after `from` with a free table.
    ///
    /// A `from` earlier than `now` is moved up to `now`, so a slot that has
    /// already started is never offered. Scans the venue-local date of that
    /// origin and the following days, up to `horizon_days` dates in total.
    /// Slots are visited in chronological order and the first one with
    /// capacity wins.
    pub async fn next_available(
        &self,
        from: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> DomainResult<NextAvailable> {
        let from = from.max(now);
        let origin = self.schedule.local_date(from);

        for offset in 0..self.horizon_days {
            let Some(date) = origin.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };

            let candidates: Vec<Slot> = self
                .schedule
                .slots_for(date)
                .into_iter()
                .filter(|slot| slot.starts_at >= from)
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let occupancy = self.capacity.occupancy_for_date(date).await?;
            for slot in candidates {
                let remaining_tables = self.capacity.remaining(occupancy.get(&slot.starts_at));
                if remaining_tables == 0 {
                    continue;
                }

                let label = describe(origin, &slot);
                debug!(date = %date, slot = %slot.label, remaining_tables, "Next available slot");
                return Ok(NextAvailable::Found {
                    is_today: date == origin,
                    label,
                    slot: SlotAvailability {
                        slot,
                        remaining_tables,
                        is_full: false,
                    },
                });
            }
        }

        Ok(NextAvailable::NoneFound {
            horizon_days: self.horizon_days,
        })
    }
}

/// "Today, 12:00 - 12:30", "Tomorrow, ..." or "Wed 21 Oct, ..."
fn describe(origin: NaiveDate, slot: &Slot) -> String {
    if slot.date == origin {
        format!("Today, {}", slot.label)
    } else if origin.succ_opt() == Some(slot.date) {
        format!("Tomorrow, {}", slot.label)
    } else {
        format!("{}, {}", slot.date.format("%a %d %b"), slot.label)
    }
}
