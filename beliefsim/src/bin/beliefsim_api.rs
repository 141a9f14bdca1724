use std::net::SocketAddr;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use beliefsim::io::presets::contact_by_name;
use beliefsim::sweep::{AdmissionSweep, Execution, RateSweep, SweepGrid};
use beliefsim::{Belief, ModelError, ResultsTimeSeries, Scenario};

#[derive(Clone)]
struct AppState {
    started_millis: u64,
}

#[derive(Debug, Deserialize)]
struct RunRequest {
    #[serde(default)]
    run_id: Option<String>,
    #[serde(default)]
    scenario: Scenario,
    /// Named contact matrix used when the scenario carries no influence matrix.
    #[serde(default)]
    contact_preset: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunResponse {
    return_code: i32,
    run_id: String,
    policy: &'static str,
    periods: usize,
    final_committed: f64,
    final_susceptible: f64,
    final_denying: f64,
    /// Cohort means per period, ordered (C, S, D).
    means: Vec<[f64; 3]>,
    /// `[period][cohort][belief]`.
    states: ResultsTimeSeries,
}

type ApiError = (StatusCode, serde_json::Value);

fn model_error(e: ModelError) -> ApiError {
    (StatusCode::BAD_REQUEST, json!({"return_code": 1, "error": e.to_string()}))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let state = AppState { started_millis: now_millis() };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/run_simulation", post(run_simulation))
        .route("/sweep/rates", post(sweep_rates))
        .route("/sweep/admission", post(sweep_admission))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse().expect("invalid HOST/PORT");
    info!(%addr, "beliefsim-api listening");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");
    axum::serve(listener, app).await.expect("server failed");
}

async fn healthz(State(st): State<AppState>) -> impl IntoResponse {
    Json(json!({"ok": true, "uptime_ms": now_millis().saturating_sub(st.started_millis)}))
}

/// Run CPU-bound work on the blocking pool and shape the reply.
async fn blocking<T, F>(what: &'static str, f: F) -> axum::response::Response
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Err((code, body))) => {
            let msg = body["error"].to_string();
            warn!(what, %code, error = %msg, "request rejected");
            (code, Json(body)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"return_code": 2, "error": format!("join error: {e}")})),
        )
            .into_response(),
    }
}

async fn run_simulation(Json(req): Json<RunRequest>) -> impl IntoResponse {
    blocking("run_simulation", move || run_simulation_sync(req)).await
}

async fn sweep_rates(Json(req): Json<RateSweep>) -> impl IntoResponse {
    blocking("sweep_rates", move || -> Result<SweepGrid, ApiError> { req.run(Execution::Parallel).map_err(model_error) })
        .await
}

async fn sweep_admission(Json(req): Json<AdmissionSweep>) -> impl IntoResponse {
    blocking("sweep_admission", move || -> Result<SweepGrid, ApiError> {
        req.run(Execution::Parallel).map_err(model_error)
    })
    .await
}

fn run_simulation_sync(req: RunRequest) -> Result<RunResponse, ApiError> {
    let mut scenario = req.scenario;
    if let Some(name) = req.contact_preset.as_deref() {
        let preset = contact_by_name(name).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                json!({"return_code": 1, "error": format!("unknown contact preset: {name}")}),
            )
        })?;
        if scenario.parameters.influence.is_none() {
            scenario.parameters = scenario.parameters.with_influence(preset);
        }
    }

    let run_id = req.run_id.unwrap_or_else(|| format!("run-{}", now_millis()));
    let results = scenario.run().map_err(model_error)?;

    let final_of = |b: Belief| results.final_mean(b).unwrap_or(0.0);
    let means = results
        .iter()
        .map(|s| Belief::ALL.map(|b| s.cohort_mean(b)))
        .collect();

    info!(%run_id, periods = results.len() - 1, "simulation finished");

    Ok(RunResponse {
        return_code: 0,
        run_id,
        policy: scenario.parameters.policy.name(),
        periods: results.len() - 1,
        final_committed: final_of(Belief::Committed),
        final_susceptible: final_of(Belief::Susceptible),
        final_denying: final_of(Belief::Denying),
        means,
        states: results,
    })
}

fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
