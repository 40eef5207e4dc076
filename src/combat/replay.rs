//! Combat replay record: the immutable artifact handed to persistence once a
//! fight ends. Also carries the aggregate stat deltas the profile layer folds
//! into lifetime totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::pilot::ModuleKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Player,
    Enemy,
    Boss,
    System,
}

/// One replayable event. `turn` counts resolved actions, `timestamp_ms` is
/// simulation time from combat start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatAction {
    pub turn: u32,
    pub timestamp_ms: f64,
    pub actor: Actor,
    pub action_type: String,
    pub result: String,
    pub player_hp: f64,
    pub player_max_hp: f64,
    pub enemy_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healing: Option<f64>,
}

/// Aggregate per-combat stats, persisted alongside the action list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinalStats {
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub kills: u32,
    pub items_used: u32,
    pub crits: u32,
    pub scrap_earned: i64,
    pub ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReplay {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub pilot_id: String,
    pub module: ModuleKind,
    pub stage: u32,
    pub difficulty: String,
    pub duration_ms: f64,
    pub actions: Vec<CombatAction>,
    pub outcome: CombatOutcome,
    pub final_stats: FinalStats,
}

impl CombatReplay {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pilot_id: impl Into<String>,
        module: ModuleKind,
        stage: u32,
        difficulty: impl Into<String>,
        duration_ms: f64,
        actions: Vec<CombatAction>,
        outcome: CombatOutcome,
        final_stats: FinalStats,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            pilot_id: pilot_id.into(),
            module,
            stage,
            difficulty: difficulty.into(),
            duration_ms,
            actions,
            outcome,
            final_stats,
        }
    }
}
