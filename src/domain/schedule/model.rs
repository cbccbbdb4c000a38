//! Service schedule and slot generation

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc, Weekday,
};

use crate::domain::{DomainError, DomainResult};

/// A fixed-duration reservable window on a venue-local date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Venue-local calendar date the slot belongs to
    pub date: NaiveDate,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Venue-local "HH:MM - HH:MM"
    pub label: String,
}

/// Daily schedule of the venue: service hours, slot length and the days the
/// venue takes reservations at all.
#[derive(Debug, Clone)]
pub struct ServiceSchedule {
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    slot_minutes: u32,
    operating_days: Vec<Weekday>,
    closed_dates: Vec<NaiveDate>,
    offset: FixedOffset,
}

impl ServiceSchedule {
    pub fn new(
        opens_at: NaiveTime,
        closes_at: NaiveTime,
        slot_minutes: u32,
        operating_days: Vec<Weekday>,
        closed_dates: Vec<NaiveDate>,
        offset: FixedOffset,
    ) -> DomainResult<Self> {
        if slot_minutes == 0 {
            return Err(DomainError::InvalidArgument(
                "slot length must be greater than zero".into(),
            ));
        }
        if opens_at >= closes_at {
            return Err(DomainError::InvalidArgument(format!(
                "opening time {} must be before closing time {}",
                opens_at.format("%H:%M"),
                closes_at.format("%H:%M")
            )));
        }

        Ok(Self {
            opens_at,
            closes_at,
            slot_minutes,
            operating_days,
            closed_dates,
            offset,
        })
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Whether the venue takes reservations on `date` at all
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.operating_days.contains(&date.weekday()) && !self.closed_dates.contains(&date)
    }

    /// Venue-local calendar date of an instant
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Ordered slots for `date`. Empty when the venue is closed that day.
    ///
    /// A trailing window shorter than `slot_minutes` is not emitted.
    pub fn slots_for(&self, date: NaiveDate) -> Vec<Slot> {
        if !self.is_open_on(date) {
            return Vec::new();
        }

        let step = Duration::minutes(i64::from(self.slot_minutes));
        let close = date.and_time(self.closes_at);
        let mut start = date.and_time(self.opens_at);
        let mut slots = Vec::new();

        while let Some(end) = start.checked_add_signed(step).filter(|end| *end <= close) {
            // Dates at the edge of the calendar have no UTC counterpart
            if let (Some(starts_at), Some(ends_at)) = (self.to_utc(start), self.to_utc(end)) {
                slots.push(Slot {
                    date,
                    starts_at,
                    ends_at,
                    label: format!("{} - {}", start.format("%H:%M"), end.format("%H:%M")),
                });
            }
            start = end;
        }

        slots
    }

    /// The generated slot starting exactly at `instant`, if any
    pub fn slot_at(&self, instant: DateTime<Utc>) -> Option<Slot> {
        self.slots_for(self.local_date(instant))
            .into_iter()
            .find(|slot| slot.starts_at == instant)
    }

    fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        local
            .checked_sub_signed(Duration::seconds(i64::from(self.offset.local_minus_utc())))
            .map(|utc| Utc.from_utc_datetime(&utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn weekdays() -> Vec<Weekday> {
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
    }

    fn schedule() -> ServiceSchedule {
        ServiceSchedule::new(
            time(12, 0),
            time(14, 0),
            30,
            weekdays(),
            vec![NaiveDate::from_ymd_opt(2026, 10, 21).unwrap()],
            FixedOffset::east_opt(0).unwrap(),
        )
        .unwrap()
    }

    // 2026-10-19 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn generates_ordered_half_hour_slots() {
        let slots = schedule().slots_for(monday());
        let labels: Vec<_> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            ["12:00 - 12:30", "12:30 - 13:00", "13:00 - 13:30", "13:30 - 14:00"]
        );
        assert!(slots.windows(2).all(|w| w[0].ends_at == w[1].starts_at));
        assert_eq!(
            slots[0].starts_at,
            Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let s = schedule();
        assert_eq!(s.slots_for(monday()), s.slots_for(monday()));
    }

    #[test]
    fn weekend_and_closed_dates_are_empty() {
        let s = schedule();
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        let closed_wednesday = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        assert!(s.slots_for(saturday).is_empty());
        assert!(s.slots_for(closed_wednesday).is_empty());
    }

    #[test]
    fn partial_trailing_window_is_dropped() {
        let s = ServiceSchedule::new(
            time(12, 0),
            time(13, 15),
            30,
            weekdays(),
            vec![],
            FixedOffset::east_opt(0).unwrap(),
        )
        .unwrap();
        assert_eq!(s.slots_for(monday()).len(), 2);
    }

    #[test]
    fn local_offset_shifts_utc_instants() {
        // UTC+05:30
        let s = ServiceSchedule::new(
            time(12, 0),
            time(13, 0),
            30,
            weekdays(),
            vec![],
            FixedOffset::east_opt(5 * 3600 + 1800).unwrap(),
        )
        .unwrap();
        let slots = s.slots_for(monday());
        assert_eq!(
            slots[0].starts_at,
            Utc.with_ymd_and_hms(2026, 10, 19, 6, 30, 0).unwrap()
        );
        assert_eq!(slots[0].label, "12:00 - 12:30");
        assert_eq!(s.local_date(slots[0].starts_at), monday());
    }

    #[test]
    fn calendar_edges_yield_no_slots() {
        let every_day = vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        let west = ServiceSchedule::new(
            time(12, 0),
            time(14, 0),
            30,
            every_day.clone(),
            vec![],
            FixedOffset::west_opt(12 * 3600).unwrap(),
        )
        .unwrap();
        assert!(west.slots_for(NaiveDate::MAX).is_empty());

        let east = ServiceSchedule::new(
            time(0, 0),
            time(1, 0),
            30,
            every_day,
            vec![],
            FixedOffset::east_opt(14 * 3600).unwrap(),
        )
        .unwrap();
        assert!(east.slots_for(NaiveDate::MIN).is_empty());
    }

    #[test]
    fn slot_at_only_matches_generated_starts() {
        let s = schedule();
        let aligned = Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 0).unwrap();
        let misaligned = Utc.with_ymd_and_hms(2026, 10, 19, 12, 40, 0).unwrap();
        let after_close = Utc.with_ymd_and_hms(2026, 10, 19, 14, 0, 0).unwrap();

        assert_eq!(s.slot_at(aligned).unwrap().label, "12:30 - 13:00");
        assert!(s.slot_at(misaligned).is_none());
        assert!(s.slot_at(after_close).is_none());
    }

    #[test]
    fn rejects_invalid_schedules() {
        let offset = FixedOffset::east_opt(0).unwrap();
        assert!(ServiceSchedule::new(time(12, 0), time(14, 0), 0, weekdays(), vec![], offset)
            .is_err());
        assert!(ServiceSchedule::new(time(14, 0), time(12, 0), 30, weekdays(), vec![], offset)
            .is_err());
    }
}
