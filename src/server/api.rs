//! JSON payload builders for the HTTP API. Each function returns the response
//! body string; routing and status codes live in routes.rs.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::balance::{run_batch_parallel, BatchSummary};
use crate::combat::generator::DifficultyMultipliers;
use crate::data::pilot::ModuleKind;
use crate::data::registry::GameData;
use crate::data::run_state::RunState;
use crate::data::validate::validate_game_data;
use crate::sim::engine::CombatConfig;
use crate::sim::headless::{run_headless, DEFAULT_MAX_TICKS};
use crate::sim::state::{Hazard, Mission};

const DEFAULT_BATCH_ITERATIONS: usize = 1000;
const MAX_BATCH_ITERATIONS: usize = 20_000;
const MAX_REQUEST_TICKS: u64 = 60_000;

#[derive(Debug)]
pub enum SimulatePayloadError {
    Parse(serde_json::Error),
    Validation(String),
}

impl fmt::Display for SimulatePayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for SimulatePayloadError {}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub pilot: Option<String>,
    pub module: Option<String>,
    pub stage: Option<u32>,
    pub mission: Option<String>,
    pub hazard: Option<String>,
    pub seed: Option<u64>,
    pub max_ticks: Option<u64>,
    #[serde(default)]
    pub augmentations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    #[serde(flatten)]
    pub scenario: SimulateRequest,
    pub iterations: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct BatchResponse {
    scenario: ScenarioSummary,
    summary: BatchSummary,
}

#[derive(Debug, Clone, Serialize)]
struct ScenarioSummary {
    pilot: String,
    module: String,
    stage: u32,
    seed: u64,
    iterations: usize,
}

fn build_scenario(
    data: &GameData,
    request: &SimulateRequest,
) -> Result<(CombatConfig, RunState, u64), SimulatePayloadError> {
    let pilot_id = request.pilot.clone().unwrap_or_else(|| "vanguard".to_string());
    let pilot = data
        .pilot(&pilot_id)
        .ok_or_else(|| SimulatePayloadError::Validation(format!("unknown pilot: {pilot_id}")))?;

    let module = match &request.module {
        Some(value) => ModuleKind::parse(value)
            .ok_or_else(|| SimulatePayloadError::Validation(format!("unknown module: {value}")))?,
        None => ModuleKind::Balanced,
    };
    let mission = match &request.mission {
        Some(value) => Mission::parse(value)
            .ok_or_else(|| SimulatePayloadError::Validation(format!("unknown mission: {value}")))?,
        None => Mission::Standard,
    };
    let hazard = match &request.hazard {
        Some(value) => Some(
            Hazard::parse(value).ok_or_else(|| {
                SimulatePayloadError::Validation(format!("unknown hazard: {value}"))
            })?,
        ),
        None => None,
    };
    let stage = request.stage.unwrap_or(1).max(1);
    let max_ticks = request
        .max_ticks
        .unwrap_or(DEFAULT_MAX_TICKS)
        .min(MAX_REQUEST_TICKS);

    let config = CombatConfig {
        pilot_id,
        module,
        stage,
        difficulty: DifficultyMultipliers::default(),
        difficulty_name: "normal".to_string(),
        mission,
        hazard,
        daily: None,
        seed: request.seed.unwrap_or(0),
    };
    let mut run = RunState::new(pilot.base_hp);
    run.augmentations = request.augmentations.iter().cloned().collect();
    Ok((config, run, max_ticks))
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "scrapfall-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn pilots_payload(data: &GameData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&data.pilots)
}

pub fn enemies_payload(data: &GameData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&data.enemy_templates)
}

pub fn bosses_payload(data: &GameData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&data.boss_templates)
}

pub fn validate_payload(data: &GameData) -> Result<String, serde_json::Error> {
    let report = validate_game_data(data);
    let issues: Vec<serde_json::Value> = report
        .diagnostics
        .iter()
        .map(|diag| {
            serde_json::json!({
                "severity": diag.severity.as_str(),
                "context": diag.context,
                "message": diag.message,
            })
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "status": if report.has_errors() { "errors" } else { "ok" },
        "issues": issues,
    }))
}

pub fn simulate_payload(
    data: &Arc<GameData>,
    body: &str,
) -> Result<String, SimulatePayloadError> {
    let request: SimulateRequest =
        serde_json::from_str(body).map_err(SimulatePayloadError::Parse)?;
    let (config, run, max_ticks) = build_scenario(data, &request)?;
    let replay = run_headless(Arc::clone(data), config, run, max_ticks)
        .map_err(|err| SimulatePayloadError::Validation(err.to_string()))?;
    serde_json::to_string_pretty(&replay).map_err(SimulatePayloadError::Parse)
}

pub fn batch_payload(data: &Arc<GameData>, body: &str) -> Result<String, SimulatePayloadError> {
    let request: BatchRequest = serde_json::from_str(body).map_err(SimulatePayloadError::Parse)?;
    let iterations = request
        .iterations
        .unwrap_or(DEFAULT_BATCH_ITERATIONS)
        .min(MAX_BATCH_ITERATIONS);
    let (config, run, max_ticks) = build_scenario(data, &request.scenario)?;
    let summary = run_batch_parallel(Arc::clone(data), &config, &run, iterations, max_ticks)
        .map_err(|err| SimulatePayloadError::Validation(err.to_string()))?;
    let response = BatchResponse {
        scenario: ScenarioSummary {
            pilot: config.pilot_id.clone(),
            module: config.module.as_str().to_string(),
            stage: config.stage,
            seed: config.seed,
            iterations,
        },
        summary,
    };
    serde_json::to_string_pretty(&response).map_err(SimulatePayloadError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_rejects_unknown_pilot() {
        let data = GameData::builtin();
        let err = simulate_payload(&data, r#"{"pilot": "nobody"}"#).expect_err("bad pilot");
        assert!(matches!(err, SimulatePayloadError::Validation(_)));
    }

    #[test]
    fn simulate_returns_a_replay_document() {
        let data = GameData::builtin();
        let payload =
            simulate_payload(&data, r#"{"seed": 5, "max_ticks": 1500}"#).expect("payload");
        let value: serde_json::Value = serde_json::from_str(&payload).expect("valid json");
        assert!(value.get("outcome").is_some());
        assert!(value.get("final_stats").is_some());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let data = GameData::builtin();
        let err = simulate_payload(&data, "{not json").expect_err("parse failure");
        assert!(matches!(err, SimulatePayloadError::Parse(_)));
    }
}
