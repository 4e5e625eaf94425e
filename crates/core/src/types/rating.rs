//! Bounded store ratings and the incremental running mean.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RatingError {
    /// The value is outside the allowed 0-5 range (or not a number).
    #[error("rating must be between 0 and 5, got {value}")]
    OutOfRange {
        /// The rejected value.
        value: f64,
    },
}

/// A single rating submission, guaranteed to lie in `[0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: f64 = 0.0;
    /// Highest accepted rating.
    pub const MAX: f64 = 5.0;

    /// Validate a raw rating value.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::OutOfRange`] for values outside `[0, 5]`,
    /// including NaN.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if value.is_nan() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Get the raw rating value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// A running weighted mean of ratings.
///
/// The average is recomputed incrementally from the previous average and
/// the count of folded ratings; no history of individual submissions is
/// kept, so a rating can never be retracted. The average stays within
/// `[0, 5]` because every folded [`Rating`] does.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingAverage {
    /// Current mean of all folded ratings.
    pub average: f64,
    /// Number of ratings folded into `average`.
    pub count: u64,
}

impl RatingAverage {
    /// An average with no ratings folded in yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }

    /// Reconstruct a running average from persisted fields.
    #[must_use]
    pub const fn from_parts(average: f64, count: u64) -> Self {
        Self { average, count }
    }

    /// Fold one more rating into the running mean.
    ///
    /// `average' = (average * count + rating) / (count + 1)`
    pub fn fold(&mut self, rating: Rating) {
        // f64 holds the running sum exactly for any realistic count; the
        // cast loses precision only beyond 2^53 ratings.
        #[allow(clippy::cast_precision_loss)]
        let count = self.count as f64;
        self.average = count.mul_add(self.average, rating.value()) / (count + 1.0);
        self.count += 1;
    }
}
