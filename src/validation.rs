//! Input Validation
//!
//! Server-side validation for the six pollutant inputs. Checks presence,
//! numeric type and range for every field independently and reports all
//! failures together.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::ranges::{Pollutant, PollutantReading, RangeCatalog};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_A_NUMBER: &str = "Value must be a number.";

/// Field → message mapping, kept in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<Pollutant, String>,
}

impl FieldErrors {
    pub fn insert(&mut self, pollutant: Pollutant, message: impl Into<String>) {
        self.errors.insert(pollutant, message.into());
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<&str> {
        self.errors.get(&pollutant).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, &str)> {
        self.errors.iter().map(|(p, m)| (*p, m.as_str()))
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (pollutant, message) in &self.errors {
            map.serialize_entry(pollutant.key(), message)?;
        }
        map.end()
    }
}

/// Aggregate failure: at least one field was rejected
#[derive(Debug, Clone, Error)]
#[error("Validation failed.")]
pub struct ValidationFailure {
    pub errors: FieldErrors,
}

/// Source of raw (string) field values
pub trait RawRecord {
    fn field(&self, key: &str) -> Option<&str>;
}

impl RawRecord for HashMap<String, String> {
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key).map(|s| s.as_str())
    }
}

impl RawRecord for BTreeMap<String, String> {
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key).map(|s| s.as_str())
    }
}

impl<'a> RawRecord for [(&'a str, &'a str)] {
    fn field(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// Validates raw records against a range catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    catalog: RangeCatalog,
}

impl Validator {
    pub fn new(catalog: RangeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RangeCatalog {
        &self.catalog
    }

    /// Validate all six fields.
    ///
    /// Presence and numeric checks happen here; the range rule is delegated
    /// to `RangeCatalog::check_values` so numeric callers share it.
    pub fn validate<R: RawRecord + ?Sized>(
        &self,
        raw: &R,
    ) -> Result<PollutantReading, ValidationFailure> {
        let mut errors = FieldErrors::default();
        let mut values = [0.0_f64; 6];

        for (pollutant, _) in self.catalog.iter() {
            let raw_value = raw.field(pollutant.key()).unwrap_or("").trim();

            if raw_value.is_empty() {
                errors.insert(pollutant, REQUIRED);
                continue;
            }

            match parse_number(raw_value) {
                Some(value) => values[pollutant.index()] = value,
                None => errors.insert(pollutant, NOT_A_NUMBER),
            }
        }

        // Fields that failed above hold 0.0, which is in range; their
        // earlier message is kept since range errors never overwrite.
        match self.catalog.check_values(values) {
            Ok(reading) if errors.is_empty() => Ok(reading),
            Ok(_) => Err(ValidationFailure { errors }),
            Err(range_errors) => {
                for (pollutant, message) in range_errors.iter() {
                    if errors.get(pollutant).is_none() {
                        errors.insert(pollutant, message);
                    }
                }
                Err(ValidationFailure { errors })
            }
        }
    }
}

/// Parse a decimal number. `NaN` is not a number here; infinities (including
/// overflowing literals such as `1e400`) parse and fail the range rule.
fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| !v.is_nan())
}
