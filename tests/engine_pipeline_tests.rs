// Engine Pipeline Tests
//
// Purpose: CSV dataset → snapshot → ranking, alongside form scoring
// Run with: cargo test --test engine_pipeline_tests

use air_quality_engine::data::load_csv;
use air_quality_engine::{
    AqiCategory, Assessor, CityRanker, DatasetStore, Pollutant, PollutionResponse, RangeCatalog,
    RankingService,
};
use approx::assert_relative_eq;
use std::path::PathBuf;
use std::sync::Arc;

fn write_dataset(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("aqi_pipeline_{}_{}.csv", tag, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

const DATASET: &str = "City,Date,PM2_5,PM10,CO,NO2,SO2,O3\n\
Delhi,2020-01-01,250,300,2,80,20,50\n\
Delhi,2020-01-02,185,200,1,40,10,30\n\
Kolkata,2020-01-01,60,100,1,40,10,50\n\
Bengaluru,2020-01-01,20,30,0.5,15,5,25\n\
Bengaluru,2020-01-02,,30,0.5,15,5,25\n\
Lucknow,2020-01-01,700,300,2,80,20,50\n";

#[test]
fn test_dataset_ranking_end_to_end() {
    let path = write_dataset("rank", DATASET);
    let loaded = load_csv(&path, &RangeCatalog::standard()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.stats.rows, 6);
    assert_eq!(loaded.stats.accepted, 4);
    assert_eq!(loaded.stats.incomplete, 1);
    assert_eq!(loaded.stats.out_of_range, 1);

    let store = Arc::new(DatasetStore::new(loaded.cities));
    let service = RankingService::new(store, CityRanker::default(), 16);
    let ranked = service.most_polluted(5);

    // Delhi: (400 + 350) / 2, pm25 dominates both rows
    // Kolkata: pm25 60 → 100 ties pm10 100 → 100
    // Bengaluru: pm25 20 → 33.33
    // Lucknow: only row rejected, excluded
    let names: Vec<&str> = ranked.iter().map(|r| r.city.as_str()).collect();
    assert_eq!(names, vec!["Delhi", "Kolkata", "Bengaluru"]);
    assert_relative_eq!(ranked[0].avg_aqi, 375.0, epsilon = 1e-9);
    assert_relative_eq!(ranked[1].avg_aqi, 100.0, epsilon = 1e-9);
    assert_relative_eq!(ranked[2].avg_aqi, 100.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_refresh_replaces_ranking() {
    let path = write_dataset("refresh", DATASET);
    let loaded = load_csv(&path, &RangeCatalog::standard()).unwrap();
    std::fs::remove_file(&path).ok();

    let service = RankingService::new(Arc::new(DatasetStore::new(loaded.cities)), CityRanker::default(), 16);
    assert_eq!(service.most_polluted(1)[0].city, "Delhi");

    let path = write_dataset("refresh_next", "City,PM2_5,PM10,CO,NO2,SO2,O3\nChennai,30,20,0.2,10,5,10\n");
    let reloaded = load_csv(&path, &RangeCatalog::standard()).unwrap();
    std::fs::remove_file(&path).ok();

    let version = service.refresh(reloaded.cities);
    assert_eq!(version, 1);

    let ranked = service.most_polluted(5);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].city, "Chennai");
    assert_relative_eq!(ranked[0].avg_aqi, 50.0, epsilon = 1e-9);
}

#[test]
fn test_form_submission_with_ranking() {
    let raw: &[(&str, &str)] = &[
        ("pm25", "25"),
        ("pm10", "180"),
        ("co", "0.5"),
        ("no2", "20"),
        ("so2", "10"),
        ("o3", "30"),
    ];
    let assessment = Assessor::default().assess(raw).unwrap();

    // pm10 180 → 100 + 80 * 100 / 150
    assert_relative_eq!(assessment.result.score, 100.0 + 80.0 * 100.0 / 150.0, epsilon = 1e-9);
    assert_eq!(assessment.result.dominant_pollutant, Pollutant::Pm10);
    assert_eq!(assessment.result.category, AqiCategory::Moderate);

    let path = write_dataset("form", DATASET);
    let loaded = load_csv(&path, &RangeCatalog::standard()).unwrap();
    std::fs::remove_file(&path).ok();
    let ranked = CityRanker::default().rank(&loaded.cities, 2);

    let response = PollutionResponse::success(&assessment, &ranked);
    assert!(response.is_success());
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["pollutionScore"], 153.33);
    assert_eq!(json["category"], "Moderate");
    assert_eq!(json["hazardous"], false);
    assert_eq!(json["mostPolluted"].as_array().unwrap().len(), 2);
}
