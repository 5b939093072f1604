//! Assessment Pipeline
//!
//! raw input → Validator → AqiEngine → category → advice, plus the wire
//! response handed to the presentation layer.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::advice::{advise_for, hazard_notice, is_hazardous};
use crate::engine::{AqiEngine, AqiResult};
use crate::ranges::{Pollutant, PollutantReading};
use crate::ranking::CityAirQualityRecord;
use crate::utils::round_to;
use crate::validation::{FieldErrors, RawRecord, ValidationFailure, Validator};

/// Decimal places for scores on the wire
const SCORE_DECIMALS: i32 = 2;

/// Everything computed for one valid submission
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub reading: PollutantReading,
    pub result: AqiResult,
    pub sub_indices: [f64; 6],
    pub advice: &'static str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Assessor {
    validator: Validator,
    engine: AqiEngine,
}

impl Assessor {
    pub fn new(validator: Validator, engine: AqiEngine) -> Self {
        Self { validator, engine }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate and score a submission.
    ///
    /// A failure carries every field error and no score.
    pub fn assess<R: RawRecord + ?Sized>(&self, raw: &R) -> Result<Assessment, ValidationFailure> {
        let reading = self.validator.validate(raw)?;
        let result = self.engine.compute(&reading);
        Ok(Assessment {
            reading,
            result,
            sub_indices: self.engine.compute_sub_indices(&reading),
            advice: advise_for(result.category.name()),
        })
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
    pub inputs: BTreeMap<&'static str, f64>,
    pub pollution_score: f64,
    pub category: &'static str,
    pub dominant_pollutant: Pollutant,
    pub sub_indices: BTreeMap<&'static str, f64>,
    pub advice: &'static str,
    pub hazardous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_notice: Option<&'static str>,
    pub most_polluted: Vec<CityAirQualityRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub errors: FieldErrors,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PollutionResponse {
    Success(SuccessResponse),
    Failure(FailureResponse),
}

impl PollutionResponse {
    pub fn success(assessment: &Assessment, most_polluted: &[CityAirQualityRecord]) -> Self {
        let result = &assessment.result;
        PollutionResponse::Success(SuccessResponse {
            success: true,
            inputs: assessment.reading.to_map(),
            pollution_score: round_to(result.score, SCORE_DECIMALS),
            category: result.category.name(),
            dominant_pollutant: result.dominant_pollutant,
            sub_indices: Pollutant::ALL
                .into_iter()
                .map(|p| (p.key(), round_to(assessment.sub_indices[p.index()], SCORE_DECIMALS)))
                .collect(),
            advice: assessment.advice,
            hazardous: is_hazardous(result.score),
            hazard_notice: hazard_notice(result.score),
            most_polluted: most_polluted
                .iter()
                .map(|r| CityAirQualityRecord {
                    city: r.city.clone(),
                    avg_aqi: round_to(r.avg_aqi, SCORE_DECIMALS),
                })
                .collect(),
        })
    }

    pub fn failure(failure: ValidationFailure) -> Self {
        PollutionResponse::Failure(FailureResponse {
            success: false,
            message: failure.to_string(),
            errors: failure.errors,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PollutionResponse::Success(_))
    }
}
