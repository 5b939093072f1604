//! Air Quality Engine
//!
//! Converts raw pollutant concentrations into an Air Quality Index score,
//! classifies it, attaches health advice and ranks the most polluted cities
//! of a historical dataset.
//!
//! Module layout:
//! - `ranges`, `validation`: permitted input bounds and the validator
//! - `breakpoints`, `engine`: CPCB breakpoint interpolation and the overall score
//! - `category`, `advice`: severity bands and advisory text
//! - `ranking`, `snapshot`: per-city averages, versioned dataset snapshots, cache
//! - `data`: CSV loading with Polars
//! - `assessment`: end-to-end pipeline and wire response
//! - `api_server`: Axum HTTP surface (feature `api`)

pub mod utils;
pub mod ranges;
pub mod validation;
pub mod breakpoints;
pub mod engine;
pub mod category;
pub mod advice;
pub mod ranking;
pub mod snapshot;
pub mod data;
pub mod config;
pub mod assessment;
pub mod api_server;

// Re-export commonly used types
pub use ranges::{Pollutant, PollutantReading, RangeCatalog, RangeSpec};
pub use validation::{FieldErrors, ValidationFailure, Validator};
pub use breakpoints::{BreakpointSegment, BreakpointTable};
pub use engine::{AqiEngine, AqiResult};
pub use category::{classify, AqiCategory, CategoryProfile};
pub use advice::{advise_for, display_advice, hazard_notice, is_hazardous};
pub use ranking::{CityAirQualityRecord, CityRanker, CityReadings, DEFAULT_TOP_N};
pub use snapshot::{DatasetSnapshot, DatasetStore, RankingService};
pub use config::EngineConfig;
pub use assessment::{Assessment, Assessor, PollutionResponse};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
