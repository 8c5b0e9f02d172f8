use serde::{Deserialize, Serialize};

/// Loyalty tier labels. Tiers are never stored: the displayed tier is always
/// re-derived from the account's current point balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Ascending threshold table: a tier applies from its threshold up to
/// (but excluding) the next one.
const TIER_THRESHOLDS: [(i64, Tier); 4] = [
    (0, Tier::Bronze),
    (500, Tier::Silver),
    (1500, Tier::Gold),
    (5000, Tier::Platinum),
];

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }

    /// The highest tier whose threshold does not exceed the given points.
    pub fn for_points(points: i64) -> Self {
        let mut current = Tier::Bronze;
        for (threshold, tier) in TIER_THRESHOLDS {
            if points >= threshold {
                current = tier;
            }
        }
        current
    }

    /// Points needed to reach the next tier, or None at the top tier.
    pub fn points_to_next(points: i64) -> Option<i64> {
        TIER_THRESHOLDS
            .iter()
            .map(|(threshold, _)| *threshold)
            .find(|threshold| points < *threshold)
            .map(|threshold| threshold - points)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
