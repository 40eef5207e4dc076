//! Duration-based status effects and the per-tick processor.

use serde::{Deserialize, Serialize};

use crate::combat::synergy::SynergySet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    Stunned,
    Burning,
    Overdrive,
    Shielded,
}

impl StatusKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stunned => "STUNNED",
            Self::Burning => "BURNING",
            Self::Overdrive => "OVERDRIVE",
            Self::Shielded => "SHIELDED",
        }
    }
}

/// A status attached to the player or an enemy. `value` is the per-tick
/// magnitude for damage-over-time kinds; zero for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub id: String,
    pub kind: StatusKind,
    pub duration_ms: f64,
    #[serde(default)]
    pub value: f64,
}

impl ActiveStatus {
    pub fn new(id: impl Into<String>, kind: StatusKind, duration_ms: f64, value: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            duration_ms,
            value,
        }
    }

    pub fn stun(duration_ms: f64) -> Self {
        Self::new("stun", StatusKind::Stunned, duration_ms, 0.0)
    }

    pub fn burning(duration_ms: f64, per_tick: f64) -> Self {
        Self::new("burn", StatusKind::Burning, duration_ms, per_tick)
    }

    pub fn shield(duration_ms: f64) -> Self {
        Self::new("shield", StatusKind::Shielded, duration_ms, 0.0)
    }

    pub fn overdrive(duration_ms: f64, self_damage_per_tick: f64) -> Self {
        Self::new("overdrive", StatusKind::Overdrive, duration_ms, self_damage_per_tick)
    }
}

pub fn has_status(statuses: &[ActiveStatus], kind: StatusKind) -> bool {
    statuses.iter().any(|s| s.kind == kind && s.duration_ms > 0.0)
}

/// Outcome of one processing pass: surviving statuses and the damage the
/// carrier takes this tick (BURNING dots plus OVERDRIVE overclock strain).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTickResult {
    pub statuses: Vec<ActiveStatus>,
    pub damage_taken: f64,
}

/// Advance every status by one tick of `tick_ms`.
///
/// Durations strictly decrease; a status whose remaining duration reaches
/// `<= 0` is dropped the same tick, so stored durations are never negative.
/// Under an inferno-class synergy BURNING drains at 2/3 rate, which works out
/// to +50% effective duration. Order-independent across statuses and free of
/// hidden state: calling with identical inputs yields identical results.
pub fn process_status_effects(
    statuses: &[ActiveStatus],
    tick_ms: f64,
    synergies: &SynergySet,
) -> StatusTickResult {
    let mut damage_taken = 0.0;
    let mut remaining = Vec::with_capacity(statuses.len());

    for status in statuses {
        let drain = if status.kind == StatusKind::Burning && synergies.inferno {
            tick_ms / 1.5
        } else {
            tick_ms
        };

        if matches!(status.kind, StatusKind::Burning | StatusKind::Overdrive) {
            damage_taken += status.value;
        }

        let after = status.duration_ms - drain;
        if after > 0.0 {
            let mut kept = status.clone();
            kept.duration_ms = after;
            remaining.push(kept);
        }
    }

    StatusTickResult {
        statuses: remaining,
        damage_taken,
    }
}
