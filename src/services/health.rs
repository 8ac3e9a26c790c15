use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::database::{connection::DatabaseManager, models::Employee};
use crate::services::birthday::{ScanReport, ScanStatusHandle};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub birthday_scan: ScanHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub employee_count: i64,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanHealth {
    pub running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub last_scan_date: Option<chrono::NaiveDate>,
    pub last_matches: Option<usize>,
    pub last_delivered: Option<usize>,
    pub last_failed: Option<usize>,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub scan_status: ScanStatusHandle,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>, scan_status: ScanStatusHandle) -> Self {
        let state = AppState {
            db,
            scan_status,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let employee_count = match state.db.ping().await {
        Ok(()) => Employee::count(&state.db.pool).await.ok(),
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            None
        }
    };
    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    let scan = state.scan_status.read().await.clone();
    let last_report: Option<&ScanReport> = scan.last_report.as_ref();

    let healthy = employee_count.is_some();
    let health_response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            connection_pool_size: state.db.pool.size(),
            employee_count: employee_count.unwrap_or(0),
            response_time_ms,
        },
        birthday_scan: ScanHealth {
            running: scan.running,
            last_run: scan.last_run,
            last_scan_date: last_report.map(|r| r.date),
            last_matches: last_report.map(|r| r.matches),
            last_delivered: last_report.map(|r| r.delivered),
            last_failed: last_report.map(|r| r.failed),
        },
        uptime_seconds: uptime,
    };

    if healthy {
        Ok(Json(health_response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match state.db.ping().await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}
