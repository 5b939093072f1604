//! AQI Categories
//!
//! Six ordered severity bands with their associated display data. Every
//! per-category value (advice, icon, style class) lives in one table so the
//! mappings cannot drift apart.

use serde::Serialize;
use std::fmt;

/// AQI severity band, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
}

/// Data attached to each category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryProfile {
    pub name: &'static str,
    /// Inclusive upper bound of the band (`None` for the open-ended top band)
    pub upper_bound: Option<f64>,
    pub advice: &'static str,
    pub display_icon: &'static str,
    pub style_class: &'static str,
}

static PROFILES: [CategoryProfile; 6] = [
    CategoryProfile {
        name: "Good",
        upper_bound: Some(50.0),
        advice: "Air quality is good. It is safe to enjoy outdoor \
                 activities and no special precautions are needed.",
        display_icon: "🟢",
        style_class: "aqi-good",
    },
    CategoryProfile {
        name: "Satisfactory",
        upper_bound: Some(100.0),
        advice: "Air quality is generally acceptable. People with asthma, \
                 children, and the elderly may experience minor breathing \
                 discomfort during prolonged outdoor activity.",
        display_icon: "🟡",
        style_class: "aqi-satisfactory",
    },
    CategoryProfile {
        name: "Moderate",
        upper_bound: Some(200.0),
        advice: "Air quality may cause discomfort after long exposure. \
                 Reduce prolonged or heavy outdoor exertion, especially \
                 for sensitive groups.",
        display_icon: "🟠",
        style_class: "aqi-moderate",
    },
    CategoryProfile {
        name: "Poor",
        upper_bound: Some(300.0),
        advice: "Air quality is unhealthy. Avoid outdoor activities where \
                 possible, wear a mask if you must go outside, and keep \
                 windows closed to limit indoor pollution.",
        display_icon: "🔴",
        style_class: "aqi-poor",
    },
    CategoryProfile {
        name: "Very Poor",
        upper_bound: Some(400.0),
        advice: "Air quality can have serious health impacts. Stay indoors \
                 as much as possible, avoid any outdoor exercise, and \
                 consider using air purifiers or well-fitting masks.",
        display_icon: "🟣",
        style_class: "aqi-very-poor",
    },
    CategoryProfile {
        name: "Severe",
        upper_bound: None,
        advice: "Air quality is at emergency levels. Everyone may experience \
                 serious health effects. Remain indoors with doors and \
                 windows closed, avoid all outdoor exposure, and follow \
                 medical advice or public health alerts.",
        display_icon: "🟤",
        style_class: "aqi-severe",
    },
];

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Satisfactory,
        AqiCategory::Moderate,
        AqiCategory::Poor,
        AqiCategory::VeryPoor,
        AqiCategory::Severe,
    ];

    /// Classify a score. Upper band edges are inclusive: 50.0 is Good,
    /// anything above it is Satisfactory.
    pub fn classify(score: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.profile().upper_bound.map_or(true, |upper| score <= upper))
            .unwrap_or(AqiCategory::Severe)
    }

    pub fn profile(&self) -> &'static CategoryProfile {
        &PROFILES[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category name for a score
pub fn classify(score: f64) -> &'static str {
    AqiCategory::classify(score).name()
}
