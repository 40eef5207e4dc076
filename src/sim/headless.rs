//! Headless combat runner: drives the engine with a scripted pilot policy
//! until a terminal state. Used by the CLI, the server's simulate endpoint,
//! and the batch balancing harness.

use std::sync::Arc;

use crate::combat::damage::ConsumableKind;
use crate::combat::replay::CombatReplay;
use crate::data::pilot::ResourceKind;
use crate::data::registry::GameData;
use crate::data::run_state::RunState;
use crate::sim::engine::{CombatConfig, CombatEngine, EngineError, TICK_MS};

/// Default cap: ten simulated minutes. Hitting it counts as a defeat.
pub const DEFAULT_MAX_TICKS: u64 = 6000;

const STIM_HP_FRACTION: f64 = 0.35;

/// Run one combat to completion with a simple scripted policy: cast the
/// first ready, affordable ability whenever the gauge fills, and stim when
/// the hull drops low.
pub fn run_headless(
    data: Arc<GameData>,
    config: CombatConfig,
    run: RunState,
    max_ticks: u64,
) -> Result<CombatReplay, EngineError> {
    let mut engine = CombatEngine::new(data, config, run)?;
    let resource = engine.pilot().archetype.profile().resource;

    let mut ticks = 0u64;
    while engine.outcome().is_none() && ticks < max_ticks {
        engine.advance(TICK_MS);
        ticks += 1;
        if engine.outcome().is_some() {
            break;
        }

        let state = engine.state();
        if state.player.hp_fraction() < STIM_HP_FRACTION
            && engine.run_state().consumable_count(ConsumableKind::NanoStim) > 0
        {
            engine.use_consumable(ConsumableKind::NanoStim);
            continue;
        }

        let state = engine.state();
        if state.player.charge >= 100.0 {
            let ready = engine.pilot().abilities.iter().find(|ability| {
                let off_cooldown = !state
                    .player
                    .cooldowns
                    .get(&ability.id)
                    .is_some_and(|ms| *ms > 0.0);
                let affordable = match resource {
                    ResourceKind::Energy => ability.energy_cost <= state.player.energy,
                    ResourceKind::Heat => !state.player.jammed,
                };
                off_cooldown && affordable
            });
            if let (Some(ability), Some(target)) =
                (ready.map(|a| a.id.clone()), state.first_alive_enemy())
            {
                let _ = engine.use_ability(&ability, target);
            }
        }
    }

    Ok(engine.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::replay::CombatOutcome;

    #[test]
    fn headless_run_terminates_and_produces_a_replay() {
        let replay = run_headless(
            GameData::builtin(),
            CombatConfig {
                seed: 11,
                ..CombatConfig::default()
            },
            RunState::new(150),
            DEFAULT_MAX_TICKS,
        )
        .expect("runs");
        assert!(replay.final_stats.ticks > 0);
        assert!(!replay.actions.is_empty());
        assert!(matches!(
            replay.outcome,
            CombatOutcome::Victory | CombatOutcome::Defeat
        ));
    }

    #[test]
    fn same_seed_same_replay_body() {
        let config = CombatConfig {
            seed: 42,
            ..CombatConfig::default()
        };
        let run = RunState::new(150);
        let a = run_headless(GameData::builtin(), config.clone(), run.clone(), 2000).expect("a");
        let b = run_headless(GameData::builtin(), config, run, 2000).expect("b");
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.final_stats, b.final_stats);
        assert_eq!(a.actions, b.actions);
    }
}
