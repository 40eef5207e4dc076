//! Tagged combat log lines, surfaced in per-tick snapshots and replays.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Player,
    Enemy,
    Boss,
    Status,
    Hazard,
    Item,
    System,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub tick: u64,
    pub category: LogCategory,
    pub message: String,
}

impl CombatLogEntry {
    pub fn new(tick: u64, category: LogCategory, message: impl Into<String>) -> Self {
        Self {
            tick,
            category,
            message: message.into(),
        }
    }
}
