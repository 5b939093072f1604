// API Integration Tests
//
// Purpose: Exercise every endpoint against an in-memory dataset
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use air_quality_engine::{create_router, AppState, CityReadings, EngineConfig, RangeCatalog};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt; // for oneshot

    fn city(name: &str, pm25_values: &[f64]) -> CityReadings {
        let catalog = RangeCatalog::standard();
        CityReadings {
            city: name.to_string(),
            readings: pm25_values
                .iter()
                .map(|&pm25| catalog.check_values([pm25, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap())
                .collect(),
        }
    }

    // Helper: Create test app with a small fixed dataset
    fn create_test_app() -> axum::Router {
        let config = EngineConfig {
            data_path: "does/not/exist.csv".into(),
            ..EngineConfig::default()
        };
        let cities = vec![
            city("Delhi", &[120.0, 120.0]), // 300
            city("Patna", &[120.0]),        // 300
            city("Pune", &[30.0]),          // 50
            city("Kochi", &[]),             // no readings
        ];
        create_router(AppState::from_parts(config, cities))
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/pollution")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // =========================================================================
    // Section 1: Health and configuration
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_ranges_mirror_catalog() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/api/ranges").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["pm25"]["min"], 0.0);
        assert_eq!(body["pm25"]["max"], 500.0);
        assert_eq!(body["co"]["max"], 5.0);
        assert_eq!(body["o3"]["label"], "O₃");
    }

    // =========================================================================
    // Section 2: Scoring
    // =========================================================================

    #[tokio::test]
    async fn test_reference_submission_json() {
        let request = post_json(serde_json::json!({
            "pm25": "250", "pm10": "50", "co": "1", "no2": "20", "so2": "10", "o3": "30"
        }));
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["pollutionScore"], 400.0);
        assert_eq!(body["category"], "Very Poor");
        assert_eq!(body["dominantPollutant"], "pm25");
        assert!(body["advice"].as_str().unwrap().starts_with("Air quality can have serious"));
        assert_eq!(body["hazardous"], true);
        assert!(body["hazardNotice"].is_string());

        let most_polluted = body["mostPolluted"].as_array().unwrap();
        let names: Vec<&str> = most_polluted.iter().map(|c| c["city"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Delhi", "Patna", "Pune"]);
        assert_eq!(most_polluted[0]["avgAqi"], 300.0);
    }

    #[tokio::test]
    async fn test_numeric_json_values_accepted() {
        let request = post_json(serde_json::json!({
            "pm25": 12, "pm10": 20.5, "co": 0.3, "no2": 10, "so2": 5, "o3": 15
        }));
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["category"], "Good");
        assert_eq!(body["inputs"]["pm10"], 20.5);
    }

    #[tokio::test]
    async fn test_form_submission() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/pollution")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("pm25=95&pm10=80&co=1.1&no2=30&so2=10&o3=40"))
            .unwrap();
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        // pm25 = 95 -> 200 + 5 * 100 / 30
        assert_eq!(body["pollutionScore"], 216.67);
        assert_eq!(body["category"], "Poor");
    }

    #[tokio::test]
    async fn test_validation_failure_lists_every_field() {
        let request = post_json(serde_json::json!({
            "pm25": "", "pm10": "lots", "co": "5.01", "no2": "20", "so2": "10"
        }));
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_response(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation failed.");
        assert_eq!(body["errors"]["pm25"], "This field is required.");
        assert_eq!(body["errors"]["pm10"], "Value must be a number.");
        assert_eq!(body["errors"]["co"], "Value must be between 0.0 and 5.0.");
        assert_eq!(body["errors"]["o3"], "This field is required.");
        assert!(body["errors"].get("no2").is_none());
        assert!(body.get("pollutionScore").is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/pollution")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = create_test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // =========================================================================
    // Section 3: Ranking
    // =========================================================================

    #[tokio::test]
    async fn test_most_polluted_limit() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/cities/most-polluted?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["rows"], 2);
        assert_eq!(body["data"][0]["city"], "Delhi");
        assert_eq!(body["data"][1]["city"], "Patna");
    }

    #[tokio::test]
    async fn test_reload_with_missing_dataset_publishes_empty_snapshot() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/dataset/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["version"], 1);
        assert_eq!(body["cities"], 0);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cities/most-polluted")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_response(response).await;
        assert_eq!(body["rows"], 0);
    }
}
