//! Request handlers for the API endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::AppState;
use super::types::{AnalyzeRequest, ErrorResponse};
use crate::chart::{self, ChartReport, ChartSeries};
use crate::trend::{TrendAnalysis, TrendParams};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: impl ToString) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Analyzes one series.
///
/// `POST /analyze` → 200 + `TrendAnalysis` JSON
/// Mismatched `series`/`labels` lengths → 400 + `ErrorResponse`
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<TrendAnalysis>, ApiError> {
    state
        .analyzer
        .analyze(&req.series, &req.labels, req.alarm_threshold)
        .map(Json)
        .map_err(bad_request)
}

/// Analyzes every series of a chart payload, in id order.
///
/// `POST /charts` → 200 + `Vec<ChartReport>` JSON
pub async fn analyze_charts(
    State(state): State<Arc<AppState>>,
    Json(charts): Json<BTreeMap<String, ChartSeries>>,
) -> Result<Json<Vec<ChartReport>>, ApiError> {
    chart::analyze_charts(&charts, &state.analyzer, state.decimals)
        .map(Json)
        .map_err(bad_request)
}

/// Returns the analyzer parameters in effect.
///
/// `GET /params` → 200 + `TrendParams` JSON
pub async fn get_params(State(state): State<Arc<AppState>>) -> Json<TrendParams> {
    Json(*state.analyzer.params())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::trend::TrendAnalyzer;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            analyzer: TrendAnalyzer::default(),
            decimals: 2,
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn analyze_returns_200() {
        let app = router(make_test_state());
        let body = r#"{
            "series": [10, 9, 8, 7],
            "labels": ["2024-01-01T08:00:00", "2024-01-01T08:30:00",
                       "2024-01-01T09:00:00", "2024-01-01T09:30:00"],
            "alarmThreshold": 5.5
        }"#;
        let resp = app.oneshot(post_json("/analyze", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["trendDirection"], "down");
        assert_eq!(json["trendline"].as_array().map(Vec::len), Some(7));
        assert_eq!(json["labels"][4], "+30min");
        assert_eq!(json["crossingPoints"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn analyze_length_mismatch_returns_400() {
        let app = router(make_test_state());
        let body = r#"{"series": [1, 2], "labels": ["2024-01-01T08:00:00"], "alarmThreshold": 1}"#;
        let resp = app.oneshot(post_json("/analyze", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn charts_returns_one_report_per_series() {
        let app = router(make_test_state());
        let body = r#"{
            "1": {"labels": ["2024-01-01T08:00:00"], "data": [3], "alarm_minimum": 2},
            "2": {"labels": ["2024-01-01T08:00:00", "2024-01-01T09:00:00"], "data": [3, 4]}
        }"#;
        let resp = app.oneshot(post_json("/charts", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 2);
        assert_eq!(json[0]["id"], "1");
    }

    #[tokio::test]
    async fn params_returns_defaults() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/params")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["window_size"], 3);
        assert_eq!(json["forecast_horizon"], 3);
    }
}
