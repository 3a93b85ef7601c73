//! Student ratings and the per-mess aggregate.
//!
//! The aggregate keeps the running sum and count instead of a floating mean,
//! so `average = total / count` reproduces the arithmetic mean of every
//! recorded value exactly, whatever order the inserts arrived in.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DisplayName, MessId, RatingId, UserId};

/// Inclusive bounds of a rating value.
pub const RATING_MIN: u8 = 1;
/// Inclusive upper bound of a rating value.
pub const RATING_MAX: u8 = 5;

/// Validation errors for rating input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    #[error("rating must be between {RATING_MIN} and {RATING_MAX} (got {value})")]
    OutOfRange { value: i64 },
}

/// Whole-star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    /// Validate a raw rating value.
    ///
    /// # Examples
    /// ```
    /// use smart_mess::domain::RatingValue;
    ///
    /// assert!(RatingValue::new(5).is_ok());
    /// assert!(RatingValue::new(0).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, RatingValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (RATING_MIN..=RATING_MAX).contains(v))
            .map(Self)
            .ok_or(RatingValidationError::OutOfRange { value })
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

/// Running sum and count of a mess's ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAggregate {
    total: u64,
    count: u32,
}

impl RatingAggregate {
    /// Fold one more value into the aggregate.
    pub fn record(&mut self, value: RatingValue) {
        self.total = self.total.saturating_add(u64::from(value.get()));
        self.count = self.count.saturating_add(1);
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Exact mean of all recorded values; zero when unrated.
    ///
    /// Rounding is left to whoever displays the figure.
    pub fn average(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.total) / Decimal::from(self.count)
    }
}

/// One submitted rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    pub mess_id: MessId,
    pub student_id: UserId,
    pub student_name: DisplayName,
    pub value: RatingValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    #[case(-3, false)]
    #[case(300, false)]
    fn rating_value_bounds(#[case] raw: i64, #[case] valid: bool) {
        assert_eq!(RatingValue::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn empty_aggregate_averages_to_zero() {
        let aggregate = RatingAggregate::default();
        assert_eq!(aggregate.average(), Decimal::ZERO);
        assert_eq!(aggregate.count(), 0);
    }

    #[rstest]
    #[case(&[5, 3], dec!(4))]
    #[case(&[5, 4, 4], dec!(13) / dec!(3))]
    #[case(&[1], dec!(1))]
    fn aggregate_tracks_arithmetic_mean(#[case] values: &[i64], #[case] expected: Decimal) {
        let mut aggregate = RatingAggregate::default();
        for value in values {
            aggregate.record(RatingValue::new(*value).expect("valid rating"));
        }
        assert_eq!(aggregate.average(), expected);
        assert_eq!(aggregate.count() as usize, values.len());
    }

    #[rstest]
    fn rating_value_rejects_out_of_range_json() {
        let result: Result<RatingValue, _> = serde_json::from_value(serde_json::json!(7));
        assert!(result.is_err());
    }
}
