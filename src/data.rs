//! Historical Dataset Loading
//!
//! Reads the merged city AQI CSV with Polars and groups rows into per-city
//! validated readings. Rows are range-checked through the same catalog as
//! form input; rows with missing or out-of-range values are skipped and
//! counted, never silently accepted.

use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ranges::{Pollutant, RangeCatalog};
use crate::ranking::CityReadings;

pub const CITY_COLUMN: &str = "City";

/// Accepted header spellings per pollutant, first match wins
fn column_candidates(pollutant: Pollutant) -> &'static [&'static str] {
    match pollutant {
        Pollutant::Pm25 => &["PM2_5", "PM2.5", "pm25"],
        Pollutant::Pm10 => &["PM10", "pm10"],
        Pollutant::Co => &["CO", "co"],
        Pollutant::No2 => &["NO2", "no2"],
        Pollutant::So2 => &["SO2", "so2"],
        Pollutant::O3 => &["O3", "o3"],
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Row accounting for one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub accepted: usize,
    pub incomplete: usize,
    pub out_of_range: usize,
}

#[derive(Debug)]
pub struct LoadedDataset {
    pub cities: Vec<CityReadings>,
    pub stats: LoadStats,
}

/// Load the dataset from a CSV file
pub fn load_csv(path: &Path, catalog: &RangeCatalog) -> Result<LoadedDataset, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    tracing::info!("Loading city dataset from {:?}", path);
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let loaded = from_dataframe(&df, catalog)?;
    tracing::info!(
        "Loaded {} cities: {} of {} rows accepted ({} incomplete, {} out of range)",
        loaded.cities.len(),
        loaded.stats.accepted,
        loaded.stats.rows,
        loaded.stats.incomplete,
        loaded.stats.out_of_range
    );
    Ok(loaded)
}

/// Group a loaded frame into per-city readings, sorted by city name.
///
/// Cities whose rows were all rejected are kept with no readings.
pub fn from_dataframe(df: &DataFrame, catalog: &RangeCatalog) -> Result<LoadedDataset, DatasetError> {
    let city_col = df
        .column(CITY_COLUMN)
        .map_err(|_| DatasetError::MissingColumn(CITY_COLUMN.to_string()))?
        .str()?;

    let mut pollutant_cols: Vec<Float64Chunked> = Vec::with_capacity(Pollutant::ALL.len());
    for pollutant in Pollutant::ALL {
        let name = column_candidates(pollutant)
            .iter()
            .find(|name| df.column(name).is_ok())
            .ok_or_else(|| DatasetError::MissingColumn(column_candidates(pollutant)[0].to_string()))?;
        let values = df.column(name)?.cast(&DataType::Float64)?;
        pollutant_cols.push(values.f64()?.clone());
    }

    let mut stats = LoadStats { rows: df.height(), ..Default::default() };
    let mut grouped: FxHashMap<String, CityReadings> = FxHashMap::default();

    for idx in 0..df.height() {
        let Some(city) = city_col.get(idx).map(str::trim).filter(|c| !c.is_empty()) else {
            stats.incomplete += 1;
            continue;
        };

        let entry = grouped.entry(city.to_string()).or_insert_with(|| CityReadings {
            city: city.to_string(),
            readings: Vec::new(),
        });

        let mut values = [0.0_f64; 6];
        let mut complete = true;
        for (slot, col) in values.iter_mut().zip(&pollutant_cols) {
            match col.get(idx) {
                Some(v) => *slot = v,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            stats.incomplete += 1;
            continue;
        }

        match catalog.check_values(values) {
            Ok(reading) => {
                entry.readings.push(reading);
                stats.accepted += 1;
            }
            Err(_) => stats.out_of_range += 1,
        }
    }

    let mut cities: Vec<CityReadings> = grouped.into_values().collect();
    cities.sort_by(|a, b| a.city.cmp(&b.city));

    Ok(LoadedDataset { cities, stats })
}
