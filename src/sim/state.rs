//! Authoritative combat state. One instance per fight, owned exclusively by
//! the engine; collaborators only ever see immutable snapshots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::combat::enemy::Enemy;
use crate::combat::log::CombatLogEntry;
use crate::combat::replay::{CombatAction, CombatOutcome, FinalStats};
use crate::combat::status::ActiveStatus;
use crate::combat::synergy::{ComboTracker, SynergySet};

/// Mission flavors. Defense adds a second HP pool to protect; survival runs
/// on a timer with periodic wave spawns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Mission {
    Standard,
    Defense { core_max_hp: f64 },
    Survival { duration_ms: f64, wave_interval_ms: f64 },
}

impl Mission {
    pub fn parse(value: &str) -> Option<Mission> {
        match value {
            "standard" => Some(Mission::Standard),
            "defense" => Some(Mission::Defense { core_max_hp: 200.0 }),
            "survival" => Some(Mission::Survival {
                duration_ms: 60_000.0,
                wave_interval_ms: 12_000.0,
            }),
            _ => None,
        }
    }
}

/// Environmental hazards rolled into the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    /// Tremors throw off enemy aim and occasionally shake debris loose.
    Seismic,
    /// Ambient heat creeps up every tick.
    ThermalVents,
    /// Capacitors bleed energy every tick.
    IonStorm,
}

impl Hazard {
    pub fn parse(value: &str) -> Option<Hazard> {
        match value {
            "seismic" => Some(Hazard::Seismic),
            "thermal_vents" => Some(Hazard::ThermalVents),
            "ion_storm" => Some(Hazard::IonStorm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub max_hp: f64,
    pub current_hp: f64,
    pub speed: f64,
    /// Action gauge, 0-100. Abilities require a full gauge and consume it.
    pub charge: f64,
    pub energy: f64,
    pub heat: f64,
    pub jammed: bool,
    /// Stealth/burrowed: unhittable, and the next strike can be an ambush.
    pub burrowed: bool,
    pub statuses: Vec<ActiveStatus>,
    /// Ability id -> remaining cooldown ms.
    pub cooldowns: HashMap<String, f64>,
    /// Gravity-well debuff: charge accrual is halved while positive.
    pub charge_debuff_ms: f64,
}

impl PlayerState {
    pub fn new(max_hp: f64, current_hp: f64, speed: f64, starting_energy: f64) -> Self {
        Self {
            max_hp,
            current_hp: current_hp.min(max_hp),
            speed,
            charge: 0.0,
            energy: starting_energy,
            heat: 0.0,
            jammed: false,
            burrowed: false,
            statuses: Vec::new(),
            cooldowns: HashMap::new(),
            charge_debuff_ms: 0.0,
        }
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            (self.current_hp / self.max_hp).clamp(0.0, 1.0)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }
}

/// Mission-specific counters surfaced in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MissionState {
    pub core_hp: Option<f64>,
    pub core_max_hp: Option<f64>,
    pub wave: u32,
    pub time_remaining_ms: Option<f64>,
    /// Countdown to the next survival wave spawn.
    pub wave_timer_ms: f64,
}

#[derive(Debug, Clone)]
pub struct CombatState {
    pub tick: u64,
    pub elapsed_ms: f64,
    pub player: PlayerState,
    pub enemies: Vec<Enemy>,
    pub mission: MissionState,
    pub combo: ComboTracker,
    pub synergies: SynergySet,
    pub log: Vec<CombatLogEntry>,
    pub actions: Vec<CombatAction>,
    /// Resolved-action counter for replay ordering.
    pub turn: u32,
    pub stats: FinalStats,
    /// One-shot terminal flag. Once set, the tick function is a no-op.
    pub outcome: Option<CombatOutcome>,
}

impl CombatState {
    pub fn alive_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn first_alive_enemy(&self) -> Option<usize> {
        self.enemies.iter().position(|e| e.is_alive())
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}
