//! Engine configuration loaded via OrthoConfig.
//!
//! Every field can come from the command line, a configuration file or a
//! `SMART_MESS_*` environment variable. Unset values fall back to the
//! defaults below.

use chrono::{FixedOffset, NaiveTime, TimeDelta};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{MealSchedule, MealType, SubscriptionPolicy};

const DEFAULT_BREAKFAST: &str = "08:00";
const DEFAULT_LUNCH: &str = "13:00";
const DEFAULT_DINNER: &str = "20:00";
const DEFAULT_SKIP_NOTICE_MINUTES: i64 = 120;
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;
const DEFAULT_CURRENCY: &str = "INR";
/// Signing secret used when none is configured. Only suitable for demos.
pub const DEFAULT_PAYMENT_SECRET: &str = "sandbox-secret";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{meal} time {value:?} is not a valid HH:MM time")]
    InvalidMealTime { meal: MealType, value: String },
    #[error("meal times must be strictly increasing: breakfast, lunch, dinner")]
    MealOrder,
    #[error("skip notice must be between 0 and 1440 minutes, got {minutes}")]
    SkipNoticeOutOfRange { minutes: i64 },
    #[error("UTC offset must be within ±1439 minutes, got {minutes}")]
    OffsetOutOfRange { minutes: i32 },
    #[error("currency must be a three-letter ISO code, got {value:?}")]
    InvalidCurrency { value: String },
}

/// Configuration values for the mess engine.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SMART_MESS")]
pub struct EngineSettings {
    /// Local breakfast time, `HH:MM`.
    pub breakfast_time: Option<String>,
    /// Local lunch time, `HH:MM`.
    pub lunch_time: Option<String>,
    /// Local dinner time, `HH:MM`.
    pub dinner_time: Option<String>,
    /// Minimum notice, in minutes, for skipping a meal.
    pub skip_notice_minutes: Option<i64>,
    /// Offset from UTC in which dates and meal times are interpreted.
    pub utc_offset_minutes: Option<i32>,
    /// ISO currency code for payment orders.
    pub currency: Option<String>,
    /// Shared secret for the sandbox payment gateway.
    pub payment_secret: Option<String>,
    /// Seed a demo dataset on startup.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
}

fn parse_meal_time(
    meal: MealType,
    value: Option<&str>,
    default: &str,
) -> Result<NaiveTime, SettingsError> {
    let raw = value.unwrap_or(default).trim();
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| SettingsError::InvalidMealTime {
        meal,
        value: raw.to_owned(),
    })
}

impl EngineSettings {
    /// Build the meal schedule, validating every time-related field.
    pub fn meal_schedule(&self) -> Result<MealSchedule, SettingsError> {
        let breakfast = parse_meal_time(
            MealType::Breakfast,
            self.breakfast_time.as_deref(),
            DEFAULT_BREAKFAST,
        )?;
        let lunch = parse_meal_time(MealType::Lunch, self.lunch_time.as_deref(), DEFAULT_LUNCH)?;
        let dinner = parse_meal_time(
            MealType::Dinner,
            self.dinner_time.as_deref(),
            DEFAULT_DINNER,
        )?;
        if !(breakfast < lunch && lunch < dinner) {
            return Err(SettingsError::MealOrder);
        }

        let minutes = self
            .skip_notice_minutes
            .unwrap_or(DEFAULT_SKIP_NOTICE_MINUTES);
        if !(0..=1440).contains(&minutes) {
            return Err(SettingsError::SkipNoticeOutOfRange { minutes });
        }

        let offset_minutes = self.utc_offset_minutes.unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(SettingsError::OffsetOutOfRange {
                minutes: offset_minutes,
            })?;

        Ok(MealSchedule::new(
            breakfast,
            lunch,
            dinner,
            TimeDelta::minutes(minutes),
            offset,
        ))
    }

    /// Upper-cased currency code, falling back to `INR`.
    pub fn currency(&self) -> Result<String, SettingsError> {
        let value = self
            .currency
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY)
            .trim()
            .to_ascii_uppercase();
        if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SettingsError::InvalidCurrency { value });
        }
        Ok(value)
    }

    /// Configured payment secret, or the demo default.
    pub fn payment_secret(&self) -> &str {
        self.payment_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .unwrap_or(DEFAULT_PAYMENT_SECRET)
    }

    /// Schedule and currency bundled for the subscription service.
    pub fn subscription_policy(&self) -> Result<SubscriptionPolicy, SettingsError> {
        Ok(SubscriptionPolicy {
            schedule: self.meal_schedule()?,
            currency: self.currency()?,
        })
    }
}
