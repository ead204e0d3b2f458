//! Non-negative hour quantities.

#![expect(
    clippy::float_arithmetic,
    reason = "hour totals are fractional by nature"
)]

use super::SchedulingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A finite, non-negative amount of working time in hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Hours(f64);

impl Hours {
    /// Zero hours.
    pub const ZERO: Self = Self(0.0);

    /// Creates a validated hour quantity.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidHours`] when the value is
    /// negative, NaN or infinite.
    pub fn new(value: f64) -> Result<Self, SchedulingDomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(SchedulingDomainError::InvalidHours(value));
        }
        Ok(Self(value))
    }

    /// Creates a validated, strictly positive task duration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidHours`] for invalid values and
    /// [`SchedulingDomainError::NonPositiveDuration`] for zero.
    pub fn duration(value: f64) -> Result<Self, SchedulingDomainError> {
        let hours = Self::new(value)?;
        if hours.0 <= 0.0 {
            return Err(SchedulingDomainError::NonPositiveDuration(value));
        }
        Ok(hours)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `self - other`, clamped at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self((self.0 - other.0).max(0.0))
    }
}

impl Add for Hours {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Hours {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl TryFrom<f64> for Hours {
    type Error = SchedulingDomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hours> for f64 {
    fn from(hours: Hours) -> Self {
        hours.0
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}h", self.0)
    }
}
