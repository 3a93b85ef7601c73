//! Weekly menu published by a mess.

use std::collections::HashSet;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::MessValidationError;

/// Meals offered on one weekday. Absent text means the meal is not listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMenu {
    pub day: Weekday,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<String>,
}

impl DayMenu {
    fn normalised(self) -> Self {
        Self {
            day: self.day,
            breakfast: normalise_text(self.breakfast),
            lunch: normalise_text(self.lunch),
            dinner: normalise_text(self.dinner),
        }
    }
}

fn normalise_text(text: Option<String>) -> Option<String> {
    text.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Seven-day menu, Monday first.
///
/// ## Invariants
/// - Either empty (nothing published yet) or exactly one entry per weekday.
/// - Meal text is trimmed; blank text is stored as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayMenu>", into = "Vec<DayMenu>")]
pub struct WeeklyMenu(Vec<DayMenu>);

impl WeeklyMenu {
    /// Validate a whole-week replacement.
    pub fn new(days: Vec<DayMenu>) -> Result<Self, MessValidationError> {
        if days.len() != 7 {
            return Err(MessValidationError::IncompleteMenu { days: days.len() });
        }
        let mut seen = HashSet::new();
        for entry in &days {
            if !seen.insert(entry.day) {
                return Err(MessValidationError::DuplicateMenuDay { day: entry.day });
            }
        }

        let mut days: Vec<DayMenu> = days.into_iter().map(DayMenu::normalised).collect();
        days.sort_by_key(|entry| entry.day.num_days_from_monday());
        Ok(Self(days))
    }

    /// Menu of a mess that has not published one yet.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn days(&self) -> &[DayMenu] {
        self.0.as_slice()
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DayMenu> {
        self.0.iter().find(|entry| entry.day == weekday)
    }
}

impl TryFrom<Vec<DayMenu>> for WeeklyMenu {
    type Error = MessValidationError;

    fn try_from(value: Vec<DayMenu>) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self::empty());
        }
        Self::new(value)
    }
}

impl From<WeeklyMenu> for Vec<DayMenu> {
    fn from(value: WeeklyMenu) -> Self {
        value.0
    }
}
