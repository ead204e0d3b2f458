//! Worker capability categories.

use super::ParseSpecializationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of work a task requires and a worker can perform.
///
/// Eligibility is plain equality between two values of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    /// Engine, drivetrain and general mechanical repair.
    Mechanic,
    /// Vehicle electrics and wiring.
    Electrician,
    /// Panel and frame repair.
    BodyWork,
    /// Paint and finishing.
    Painter,
    /// Fault diagnosis and inspection.
    Diagnostics,
    /// Tyre fitting, balancing and alignment.
    TireService,
}

impl Specialization {
    /// Every supported specialization, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Mechanic,
        Self::Electrician,
        Self::BodyWork,
        Self::Painter,
        Self::Diagnostics,
        Self::TireService,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mechanic => "mechanic",
            Self::Electrician => "electrician",
            Self::BodyWork => "body_work",
            Self::Painter => "painter",
            Self::Diagnostics => "diagnostics",
            Self::TireService => "tire_service",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Specialization {
    type Error = ParseSpecializationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
            .ok_or_else(|| ParseSpecializationError(value.to_owned()))
    }
}

impl std::str::FromStr for Specialization {
    type Err = ParseSpecializationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}
