//! Budget tiers and the table-driven budget resolver

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanningError;

/// Fixed set of accepted budget tiers
///
/// Any other label is rejected at request validation; there is no
/// fallback tier because silently substituting a budget would corrupt
/// the spending guidance handed to synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Budget,
    Mid,
    Premium,
    Luxury,
}

impl FromStr for BudgetTier {
    type Err = PlanningError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_lowercase().as_str() {
            "budget" => Ok(Self::Budget),
            "mid" => Ok(Self::Mid),
            "premium" => Ok(Self::Premium),
            "luxury" => Ok(Self::Luxury),
            _ => Err(PlanningError::unknown_tier(label.trim())),
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetTier::Budget => write!(f, "budget"),
            BudgetTier::Mid => write!(f, "mid"),
            BudgetTier::Premium => write!(f, "premium"),
            BudgetTier::Luxury => write!(f, "luxury"),
        }
    }
}

/// Resolved spending ceiling and per-category guidance for a tier
///
/// A pure function of the tier; carries no persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetProfile {
    /// Tier this profile was resolved from
    pub tier: BudgetTier,
    /// Total trip ceiling in currency units
    pub ceiling: u32,
    /// Suggested nightly accommodation spend
    pub nightly_stay: u32,
    /// Suggested daily meal spend
    pub daily_meals: u32,
    /// Suggested daily local transport spend
    pub daily_transport: u32,
    /// Suggested daily activity/entry spend
    pub daily_activities: u32,
}

impl BudgetTier {
    /// Resolve the tier into its spending profile
    #[must_use]
    pub fn resolve(self) -> BudgetProfile {
        let (ceiling, nightly_stay, daily_meals, daily_transport, daily_activities) = match self {
            BudgetTier::Budget => (10_000, 1_500, 600, 300, 400),
            BudgetTier::Mid => (25_000, 3_500, 1_200, 800, 1_000),
            BudgetTier::Premium => (55_000, 8_000, 2_500, 1_500, 2_500),
            BudgetTier::Luxury => (100_000, 15_000, 5_000, 3_000, 5_000),
        };

        BudgetProfile {
            tier: self,
            ceiling,
            nightly_stay,
            daily_meals,
            daily_transport,
            daily_activities,
        }
    }
}
