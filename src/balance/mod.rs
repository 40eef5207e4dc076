//! Batch simulation harness for balance tuning: run many seeded headless
//! combats and aggregate win rate and pacing numbers. The parallel variant
//! fans iterations out over rayon with per-iteration derived seeds, so the
//! sequential and parallel paths aggregate identical replays.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::replay::{CombatOutcome, CombatReplay};
use crate::data::registry::GameData;
use crate::data::run_state::RunState;
use crate::sim::engine::{CombatConfig, EngineError};
use crate::sim::headless::run_headless;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub iterations: usize,
    pub victories: usize,
    pub win_rate: f64,
    pub avg_ticks: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
    pub avg_kills: f64,
}

fn summarize(replays: &[CombatReplay]) -> BatchSummary {
    let iterations = replays.len();
    let victories = replays
        .iter()
        .filter(|r| r.outcome == CombatOutcome::Victory)
        .count();
    let denom = iterations.max(1) as f64;
    BatchSummary {
        iterations,
        victories,
        win_rate: victories as f64 / denom,
        avg_ticks: replays.iter().map(|r| r.final_stats.ticks as f64).sum::<f64>() / denom,
        avg_damage_dealt: replays
            .iter()
            .map(|r| r.final_stats.damage_dealt as f64)
            .sum::<f64>()
            / denom,
        avg_damage_taken: replays
            .iter()
            .map(|r| r.final_stats.damage_taken as f64)
            .sum::<f64>()
            / denom,
        avg_kills: replays.iter().map(|r| f64::from(r.final_stats.kills)).sum::<f64>() / denom,
    }
}

fn iteration_config(base: &CombatConfig, iteration: usize) -> CombatConfig {
    CombatConfig {
        seed: base.seed.wrapping_add(iteration as u64),
        ..base.clone()
    }
}

/// Sequential batch run.
pub fn run_batch(
    data: Arc<GameData>,
    config: &CombatConfig,
    run: &RunState,
    iterations: usize,
    max_ticks: u64,
) -> Result<BatchSummary, EngineError> {
    let mut replays = Vec::with_capacity(iterations);
    for iteration in 0..iterations {
        let replay = run_headless(
            Arc::clone(&data),
            iteration_config(config, iteration),
            run.clone(),
            max_ticks,
        )?;
        replays.push(replay);
    }
    Ok(summarize(&replays))
}

/// Parallel batch run over the rayon pool. Same derived seeds as the
/// sequential path.
pub fn run_batch_parallel(
    data: Arc<GameData>,
    config: &CombatConfig,
    run: &RunState,
    iterations: usize,
    max_ticks: u64,
) -> Result<BatchSummary, EngineError> {
    let replays: Result<Vec<CombatReplay>, EngineError> = (0..iterations)
        .into_par_iter()
        .map(|iteration| {
            run_headless(
                Arc::clone(&data),
                iteration_config(config, iteration),
                run.clone(),
                max_ticks,
            )
        })
        .collect();
    Ok(summarize(&replays?))
}
