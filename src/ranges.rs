//! Range Catalog
//!
//! Permitted `[min, max]` bounds for each pollutant. This is the single table
//! used both for server-side validation and for the advisory configuration
//! handed to the input form.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Pollutants
// ============================================================================

/// The six pollutants, in declaration order.
///
/// The order is significant: it drives validation order and breaks ties
/// when two pollutants share the highest sub-index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    Co,
    No2,
    So2,
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::Co,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::O3,
    ];

    /// Wire key used in requests and responses
    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::Co => "co",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::O3 => "o3",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Position in declaration order (array index into readings and tables)
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Range specifications
// ============================================================================

/// Inclusive bounds for one pollutant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

impl RangeSpec {
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Message shown when a value falls outside the bounds.
    /// Bounds keep their decimal point (`0.0`, `500.0`).
    pub fn out_of_range_message(&self) -> String {
        format!("Value must be between {:?} and {:?}.", self.min, self.max)
    }
}

/// Process-wide range table, indexed by `Pollutant::index()`
static RANGES: [RangeSpec; 6] = [
    RangeSpec { label: "PM2.5", min: 0.0, max: 500.0 },
    RangeSpec { label: "PM10", min: 0.0, max: 600.0 },
    RangeSpec { label: "CO", min: 0.0, max: 5.0 },
    RangeSpec { label: "NO₂", min: 0.0, max: 200.0 },
    RangeSpec { label: "SO₂", min: 0.0, max: 200.0 },
    RangeSpec { label: "O₃", min: 0.0, max: 200.0 },
];

/// Read-only view over the range table.
///
/// Cheap to copy; every instance points at the same static data.
#[derive(Debug, Clone, Copy)]
pub struct RangeCatalog {
    ranges: &'static [RangeSpec; 6],
}

impl Default for RangeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RangeCatalog {
    pub fn standard() -> Self {
        Self { ranges: &RANGES }
    }

    pub fn spec(&self, pollutant: Pollutant) -> &RangeSpec {
        &self.ranges[pollutant.index()]
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, &RangeSpec)> + '_ {
        Pollutant::ALL.into_iter().map(move |p| (p, self.spec(p)))
    }

    /// Range check for already-numeric values (dataset rows).
    ///
    /// Applies exactly the same rule as form validation, so there is no
    /// way to obtain a `PollutantReading` that skipped the bounds.
    pub fn check_values(
        &self,
        values: [f64; 6],
    ) -> Result<PollutantReading, crate::validation::FieldErrors> {
        let mut errors = crate::validation::FieldErrors::default();
        for (pollutant, spec) in self.iter() {
            let value = values[pollutant.index()];
            if value.is_nan() {
                errors.insert(pollutant, crate::validation::NOT_A_NUMBER);
            } else if !spec.contains(value) {
                errors.insert(pollutant, spec.out_of_range_message());
            }
        }

        if errors.is_empty() {
            // -0.0 + 0.0 == +0.0, so "-0" is echoed as 0.0
            Ok(PollutantReading { values: values.map(|v| v + 0.0) })
        } else {
            Err(errors)
        }
    }

    /// Advisory configuration for the input-producing side
    pub fn client_config(&self) -> BTreeMap<&'static str, RangeSpec> {
        self.iter().map(|(p, spec)| (p.key(), *spec)).collect()
    }
}

// ============================================================================
// Readings
// ============================================================================

/// Validated concentrations for all six pollutants.
///
/// Fields are private: the only constructors run the range checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PollutantReading {
    values: [f64; 6],
}

impl PollutantReading {
    #[inline]
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        self.values[pollutant.index()]
    }

    pub fn values(&self) -> &[f64; 6] {
        &self.values
    }

    /// Values keyed by wire name (echoed back as `inputs`)
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        Pollutant::ALL
            .into_iter()
            .map(|p| (p.key(), self.get(p)))
            .collect()
    }
}
