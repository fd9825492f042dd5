//! Monthly demand seasonality

use std::collections::BTreeMap;

/// Demand multiplier per calendar month, January first
const MONTHLY_MULTIPLIERS: [(&str, f64); 12] = [
    ("January", 0.90),
    ("February", 0.85),
    ("March", 0.95),
    ("April", 1.00),
    ("May", 1.05),
    ("June", 1.10),
    ("July", 1.20),
    ("August", 1.05),
    ("September", 0.95),
    ("October", 1.00),
    ("November", 1.15),
    ("December", 1.40),
];

/// Fixed month-to-multiplier table shared by every forecast path
pub struct SeasonalityTable;

impl SeasonalityTable {
    /// Multiplier for a 1-based month. Out-of-range months are neutral.
    pub fn multiplier(month: u32) -> f64 {
        month
            .checked_sub(1)
            .and_then(|i| MONTHLY_MULTIPLIERS.get(i as usize))
            .map(|(_, m)| *m)
            .unwrap_or(1.0)
    }

    /// Adjustment applied on top of base demand: `multiplier - 1`
    pub fn factor(month: u32) -> f64 {
        Self::multiplier(month) - 1.0
    }

    /// Month name to multiplier, as reported on advanced forecasts
    pub fn as_map() -> BTreeMap<String, f64> {
        MONTHLY_MULTIPLIERS
            .iter()
            .map(|(name, m)| (name.to_string(), *m))
            .collect()
    }
}
