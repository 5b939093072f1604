//! City Ranking
//!
//! Average AQI per city over a historical dataset, most polluted first.
//! Cities are scored in parallel (Rayon); sorting and truncation are
//! sequential and deterministic.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cmp::Ordering;

use crate::engine::AqiEngine;
use crate::ranges::PollutantReading;

/// Number of cities returned when the caller does not ask for a limit
pub const DEFAULT_TOP_N: usize = 5;

/// One dataset entry: a city and its validated readings
#[derive(Debug, Clone, PartialEq)]
pub struct CityReadings {
    pub city: String,
    pub readings: Vec<PollutantReading>,
}

/// Ranked output row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityAirQualityRecord {
    pub city: String,
    pub avg_aqi: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CityRanker {
    engine: AqiEngine,
}

impl CityRanker {
    pub fn new(engine: AqiEngine) -> Self {
        Self { engine }
    }

    /// Rank cities by mean AQI, descending, ties by name ascending.
    ///
    /// Entries sharing a city name are merged before averaging. Cities with
    /// no readings are dropped, so an empty or fully invalid dataset gives
    /// an empty ranking.
    pub fn rank(&self, dataset: &[CityReadings], top_n: usize) -> Vec<CityAirQualityRecord> {
        let mut by_city: FxHashMap<&str, Vec<&PollutantReading>> = FxHashMap::default();
        for entry in dataset {
            by_city
                .entry(entry.city.as_str())
                .or_default()
                .extend(entry.readings.iter());
        }

        let mut records: Vec<CityAirQualityRecord> = by_city
            .into_par_iter()
            .filter(|(_, readings)| !readings.is_empty())
            .map(|(city, readings)| {
                let total: f64 = readings.iter().map(|r| self.engine.score(r)).sum();
                CityAirQualityRecord {
                    city: city.to_string(),
                    avg_aqi: total / readings.len() as f64,
                }
            })
            .collect();

        records.sort_by(compare_records);
        records.truncate(top_n);

        tracing::debug!(
            "Ranked {} dataset entries into {} cities",
            dataset.len(),
            records.len()
        );
        records
    }
}

/// Descending by average, then ascending by city name
fn compare_records(a: &CityAirQualityRecord, b: &CityAirQualityRecord) -> Ordering {
    b.avg_aqi
        .total_cmp(&a.avg_aqi)
        .then_with(|| a.city.cmp(&b.city))
}
