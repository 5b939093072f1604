//! AQI Engine
//!
//! Converts a validated reading into an overall AQI score: the maximum of the
//! six pollutant sub-indices, with the pollutant achieving it reported as
//! dominant.

use serde::Serialize;

use crate::breakpoints::BreakpointTable;
use crate::category::AqiCategory;
use crate::ranges::{Pollutant, PollutantReading};

/// Overall AQI for one reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiResult {
    pub score: f64,
    pub dominant_pollutant: Pollutant,
    pub category: AqiCategory,
}

/// Stateless AQI calculator over a breakpoint table
#[derive(Debug, Clone, Copy, Default)]
pub struct AqiEngine {
    table: BreakpointTable,
}

impl AqiEngine {
    pub fn new(table: BreakpointTable) -> Self {
        Self { table }
    }

    /// Sub-index per pollutant, in declaration order
    pub fn compute_sub_indices(&self, reading: &PollutantReading) -> [f64; 6] {
        Pollutant::ALL.map(|p| self.table.sub_index(p, reading.get(p)))
    }

    /// Overall score only (used by the city ranker)
    #[inline]
    pub fn score(&self, reading: &PollutantReading) -> f64 {
        self.dominant(reading).1
    }

    pub fn compute(&self, reading: &PollutantReading) -> AqiResult {
        let (dominant_pollutant, score) = self.dominant(reading);
        AqiResult {
            score,
            dominant_pollutant,
            category: AqiCategory::classify(score),
        }
    }

    /// Highest sub-index; ties keep the earlier pollutant
    fn dominant(&self, reading: &PollutantReading) -> (Pollutant, f64) {
        let sub_indices = self.compute_sub_indices(reading);
        let mut best = (Pollutant::ALL[0], sub_indices[0]);
        for pollutant in &Pollutant::ALL[1..] {
            let value = sub_indices[pollutant.index()];
            if value > best.1 {
                best = (*pollutant, value);
            }
        }
        best
    }
}
