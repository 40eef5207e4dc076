//! Immutable per-tick view handed to the UI layer. The UI never touches live
//! state; it reads committed snapshots after each tick.

use serde::{Deserialize, Serialize};

use crate::combat::enemy::Enemy;
use crate::combat::log::CombatLogEntry;
use crate::combat::replay::CombatOutcome;
use crate::combat::status::ActiveStatus;
use crate::sim::state::{CombatState, MissionState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub hp: f64,
    pub max_hp: f64,
    pub charge: f64,
    pub energy: f64,
    pub heat: f64,
    pub jammed: bool,
    pub burrowed: bool,
    pub statuses: Vec<ActiveStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub tick: u64,
    pub elapsed_ms: f64,
    pub player: PlayerSnapshot,
    pub enemies: Vec<Enemy>,
    pub mission: MissionState,
    pub log: Vec<CombatLogEntry>,
    pub outcome: Option<CombatOutcome>,
}

impl CombatSnapshot {
    pub fn capture(state: &CombatState) -> Self {
        Self {
            tick: state.tick,
            elapsed_ms: state.elapsed_ms,
            player: PlayerSnapshot {
                hp: state.player.current_hp,
                max_hp: state.player.max_hp,
                charge: state.player.charge,
                energy: state.player.energy,
                heat: state.player.heat,
                jammed: state.player.jammed,
                burrowed: state.player.burrowed,
                statuses: state.player.statuses.clone(),
            },
            enemies: state.enemies.clone(),
            mission: state.mission,
            log: state.log.clone(),
            outcome: state.outcome,
        }
    }
}
