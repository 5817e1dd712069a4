//! # Slot Generation
//!
//! Candidate slots are recomputed on every read from a fixed rule: business
//! days × opening hours × horizon, laid out in the business timezone and
//! emitted as normalized UTC instants.
//!
//! The business timezone observes DST. Wall-clock times that do not exist on a
//! spring-forward day are skipped; wall-clock times that occur twice on a
//! fall-back day resolve to their first occurrence.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};

use crate::models::booking::SLOT_MINUTES;
use crate::normalize::normalize;

pub fn slot_length() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// Which business-local calendar days are offered for booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// `n` consecutive days starting today.
    RollingDays(u32),
    /// Every day of the given month (1-12): this year's when it is the current
    /// or a later month, otherwise next year's.
    CalendarMonth(u32),
}

impl Horizon {
    pub fn days(&self, today: NaiveDate) -> Vec<NaiveDate> {
        match *self {
            Horizon::RollingDays(count) => today.iter_days().take(count as usize).collect(),
            Horizon::CalendarMonth(month) => {
                let year = if today.month() <= month {
                    today.year()
                } else {
                    today.year() + 1
                };
                let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
                    return Vec::new();
                };
                first
                    .iter_days()
                    .take_while(|day| day.month() == month)
                    .collect()
            }
        }
    }
}

impl FromStr for Horizon {
    type Err = eyre::Report;

    /// Accepts `days:<n>`, `month:<m>`, or a bare day count.
    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim().to_lowercase();
        let (kind, value) = raw.split_once(':').unwrap_or(("days", raw.as_str()));
        let value: u32 = value
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid booking horizon value: {}", raw))?;

        match kind.trim() {
            "days" => Ok(Horizon::RollingDays(value)),
            "month" => Ok(Horizon::CalendarMonth(value)),
            other => Err(eyre!("Unknown booking horizon kind: {}", other)),
        }
    }
}

/// The rule candidate slots are generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSchedule {
    timezone: Tz,
    opens: NaiveTime,
    closes: NaiveTime,
    days: Vec<Weekday>,
    horizon: Horizon,
}

impl SlotSchedule {
    pub fn new(
        timezone: Tz,
        opens: NaiveTime,
        closes: NaiveTime,
        days: Vec<Weekday>,
        horizon: Horizon,
    ) -> Result<Self> {
        if closes < opens {
            return Err(eyre!(
                "Closing time {} is before opening time {}",
                closes,
                opens
            ));
        }
        if (closes - opens).num_minutes() % SLOT_MINUTES != 0 {
            return Err(eyre!(
                "Opening hours {}-{} are not a whole number of {}-minute slots",
                opens,
                closes,
                SLOT_MINUTES
            ));
        }
        if days.is_empty() {
            return Err(eyre!("At least one business day is required"));
        }
        match horizon {
            Horizon::RollingDays(0) => return Err(eyre!("Booking horizon must cover at least one day")),
            Horizon::CalendarMonth(month) if !(1..=12).contains(&month) => {
                return Err(eyre!("Invalid horizon month: {}", month));
            }
            _ => {}
        }

        Ok(Self {
            timezone,
            opens,
            closes,
            days,
            horizon,
        })
    }

    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }

    pub fn opens(&self) -> NaiveTime {
        self.opens
    }

    pub fn closes(&self) -> NaiveTime {
        self.closes
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn is_business_day(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }

    /// Slots on one business day; the last one starts at closing time.
    pub fn slots_per_day(&self) -> usize {
        ((self.closes - self.opens).num_minutes() / SLOT_MINUTES) as usize + 1
    }

    /// Ordered, duplicate-free candidate instants strictly after `now`.
    pub fn generate(&self, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let today = now.with_timezone(&self.timezone).date_naive();

        let mut slots: Vec<DateTime<Utc>> = self
            .horizon
            .days(today)
            .into_iter()
            .filter(|day| self.is_business_day(day.weekday()))
            .flat_map(|day| wall_clock_slots(&self.timezone, day, self.opens, self.closes))
            .filter(|slot| *slot > now)
            .collect();

        slots.sort_unstable();
        slots.dedup();
        slots
    }
}

impl Default for SlotSchedule {
    /// Europe/Amsterdam, 09:00-20:00 every day, 30 days ahead.
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Amsterdam,
            opens: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            closes: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
            days: ALL_WEEKDAYS.to_vec(),
            horizon: Horizon::RollingDays(30),
        }
    }
}

pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Every slot start from `from` to `to` inclusive on `date`, in `timezone`.
pub fn wall_clock_slots(
    timezone: &Tz,
    date: NaiveDate,
    from: NaiveTime,
    to: NaiveTime,
) -> Vec<DateTime<Utc>> {
    let mut slots = Vec::new();
    let mut wall = date.and_time(from);
    let last = date.and_time(to);

    while wall <= last {
        if let Some(local) = timezone.from_local_datetime(&wall).earliest() {
            slots.push(normalize(&local));
        }
        wall += slot_length();
    }

    slots
}

pub fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|e| eyre!("Unknown timezone '{}': {}", raw, e))
}

/// Parses `HH:MM` business-local wall-clock time.
pub fn parse_wall_clock(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .wrap_err_with(|| format!("Invalid time of day '{}', expected HH:MM", raw))
}

/// Parses a comma-separated weekday list such as `mon,tue,wed`.
pub fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let day = part
            .parse::<Weekday>()
            .map_err(|_| eyre!("Invalid weekday '{}'", part))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}
