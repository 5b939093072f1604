//! Health Advice
//!
//! Static category → advisory text lookup, plus presentation helpers that
//! stay outside the engine's result type.

use crate::category::AqiCategory;

/// Scores at or above this level get the emergency notice
pub const HAZARD_THRESHOLD: f64 = 400.0;

pub const HAZARD_NOTICE: &str = "This AQI level indicates extremely hazardous air quality. \
                                 All individuals should avoid outdoor exposure.";

/// Advice for a category name.
///
/// Unknown names yield an empty string, which callers treat as "no advice".
pub fn advise_for(category: &str) -> &'static str {
    AqiCategory::from_name(category)
        .map(|c| c.profile().advice)
        .unwrap_or("")
}

/// Advice text prefixed with the category's icon
pub fn display_advice(category: AqiCategory, advice: &str) -> String {
    if advice.is_empty() {
        return String::new();
    }
    format!("{} {}", category.profile().display_icon, advice)
}

pub fn is_hazardous(score: f64) -> bool {
    score >= HAZARD_THRESHOLD
}

/// Emergency notice shown alongside the advice for hazardous scores
pub fn hazard_notice(score: f64) -> Option<&'static str> {
    is_hazardous(score).then_some(HAZARD_NOTICE)
}
