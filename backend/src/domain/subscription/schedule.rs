//! Daily meal times and the skip notice window.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Meal slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed daily meal times, interpreted in one local offset.
///
/// Dates handed to the engine (subscription start, skip date) are calendar
/// dates in this offset; "today" is derived from the clock in the same
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealSchedule {
    breakfast: NaiveTime,
    lunch: NaiveTime,
    dinner: NaiveTime,
    notice: TimeDelta,
    offset: FixedOffset,
}

impl MealSchedule {
    pub fn new(
        breakfast: NaiveTime,
        lunch: NaiveTime,
        dinner: NaiveTime,
        notice: TimeDelta,
        offset: FixedOffset,
    ) -> Self {
        Self {
            breakfast,
            lunch,
            dinner,
            notice,
            offset,
        }
    }

    pub fn meal_time(&self, meal: MealType) -> NaiveTime {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }

    /// Minimum lead time before a meal for it to be skipped.
    pub fn notice(&self) -> TimeDelta {
        self.notice
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Instant at which `meal` is served on `date`.
    pub fn scheduled_at(&self, date: NaiveDate, meal: MealType) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&date.and_time(self.meal_time(meal)))
            .single()
            .map(|local| local.with_timezone(&Utc))
    }

    /// Calendar date of `now` in the schedule's offset.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }
}
