// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are read-only. The chart endpoint
// returns the columnar payload consumed by the browser chart.
//
// CORS is configured permissively so a locally served chart page can call the
// API from another origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analysis::{normalize_symbol, run_analysis};
use crate::app_state::AppState;
use crate::report::ChartPayload;
use crate::types::Period;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/chart/:symbol", get(chart))
        .route("/api/v1/errors", get(errors))
        .route("/api/v1/config", get(config))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    analyses_served: u64,
    cached_series: usize,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        analyses_served: state.analyses_served(),
        cached_series: state.series_cache.len(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Chart
// =============================================================================

#[derive(Deserialize)]
struct ChartQuery {
    #[serde(default)]
    period: Option<String>,
}

async fn chart(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartPayload>, ApiError> {
    let period = match query.period.as_deref() {
        Some(p) => p
            .parse::<Period>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => state.config.default_period,
    };

    let symbol =
        normalize_symbol(&symbol).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    match run_analysis(&state, &symbol, period).await {
        Ok(Some(analysis)) => {
            info!(symbol = %symbol, period = %period, rows = analysis.series.len(), "chart served");
            Ok(Json(ChartPayload::from(&analysis)))
        }
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("No data found for ticker symbol: {symbol}"),
        )),
        Err(e) => Err(api_error(StatusCode::BAD_GATEWAY, format!("{e:#}"))),
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

async fn errors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.recent_errors())
}

async fn config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.clone())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{Datelike, Duration, NaiveDate, Weekday};
    use tower::ServiceExt;

    use crate::market_data::series::Bar;
    use crate::market_data::{SeriesKey, TimeSeries};
    use crate::runtime_config::RuntimeConfig;

    fn state_with(symbol: &str, period: Period, n: usize) -> Arc<AppState> {
        let state = AppState::new(RuntimeConfig::default()).unwrap();
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut bars = Vec::with_capacity(n);
        for i in 0..n {
            while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                date += Duration::days(1);
            }
            let c = 50.0 + i as f64;
            bars.push(Bar::new(date, c, c + 1.0, c - 1.0, c, 500));
            date += Duration::days(1);
        }
        let series = TimeSeries::new(symbol, bars).unwrap();
        state.series_cache.insert(SeriesKey::new(symbol, period), series);
        Arc::new(state)
    }

    async fn state_with_provider(status: StatusCode, body: &'static str) -> Arc<AppState> {
        let upstream: Router = Router::new().fallback(move || async move { (status, body) });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let config = RuntimeConfig {
            yahoo_base_url: format!("http://{addr}"),
            ..RuntimeConfig::default()
        };
        Arc::new(AppState::new(config).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(state_with("TEST", Period::OneYear, 3));
        let (status, body) = get_json(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cached_series"], 1);
    }

    #[tokio::test]
    async fn chart_serves_cached_series() {
        let app = router(state_with("TEST", Period::SixMonths, 30));
        let (status, body) = get_json(app, "/api/v1/chart/test?period=6mo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "TEST");
        assert_eq!(body["dates"].as_array().unwrap().len(), 30);
        assert_eq!(body["indicators"]["MACD"].as_array().unwrap().len(), 30);
        assert_eq!(body["indicators"]["RSI"][29], 100.0);
    }

    #[tokio::test]
    async fn chart_uses_default_period() {
        let app = router(state_with("TEST", Period::OneYear, 5));
        let (status, body) = get_json(app, "/api/v1/chart/TEST").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"], "1y");
    }

    #[tokio::test]
    async fn unknown_period_is_bad_request() {
        let app = router(state_with("TEST", Period::OneYear, 5));
        let (status, body) = get_json(app, "/api/v1/chart/TEST?period=7w").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("unknown period"));
    }

    #[tokio::test]
    async fn invalid_symbol_is_bad_request() {
        let app = router(state_with("TEST", Period::OneYear, 5));
        let (status, _) = get_json(app, "/api/v1/chart/TE$T").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_ticker_is_not_found() {
        let state = state_with_provider(StatusCode::NOT_FOUND, "{}").await;
        let (status, body) = get_json(router(state), "/api/v1/chart/NOSUCH").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No data found for ticker symbol: NOSUCH");
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let state = state_with_provider(StatusCode::INTERNAL_SERVER_ERROR, "upstream down").await;
        let (status, body) = get_json(router(state.clone()), "/api/v1/chart/AAPL").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("AAPL"));

        let (status, errors) = get_json(router(state), "/api/v1/errors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(errors.as_array().unwrap().len(), 1);
        assert_eq!(errors[0]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn config_is_exposed() {
        let app = router(state_with("TEST", Period::OneYear, 5));
        let (status, body) = get_json(app, "/api/v1/config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default_period"], "1y");
        assert_eq!(body["indicator_params"]["rsi_period"], 14);
    }

    #[tokio::test]
    async fn errors_start_empty() {
        let app = router(state_with("TEST", Period::OneYear, 5));
        let (status, body) = get_json(app, "/api/v1/errors").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }
}
