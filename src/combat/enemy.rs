//! Combatant-side types: enemies, elite affixes, weak points, and the runtime
//! state a boss carries on top of a regular enemy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::combat::boss::BossAbilityKind;
use crate::combat::status::ActiveStatus;
use crate::data::pilot::AbilityTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyIntent {
    Attack,
    Heal,
    Charge,
}

/// Elite affixes. Multipliers are applied at generation time; behavioral
/// effects (lifesteal, pre-attached shield) are read at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affix {
    Volatile,
    Shielded,
    Vampiric,
    Swift,
    Armored,
}

impl Affix {
    pub const ALL: [Affix; 5] = [
        Affix::Volatile,
        Affix::Shielded,
        Affix::Vampiric,
        Affix::Swift,
        Affix::Armored,
    ];

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Volatile => "Volatile",
            Self::Shielded => "Shielded",
            Self::Vampiric => "Vampiric",
            Self::Swift => "Swift",
            Self::Armored => "Armored",
        }
    }

    /// (hp, damage, speed, scrap) multipliers applied when promoting to elite.
    pub const fn multipliers(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Volatile => (0.8, 1.5, 1.0, 1.3),
            Self::Shielded => (1.0, 1.0, 1.0, 1.4),
            Self::Vampiric => (1.1, 1.0, 1.0, 1.5),
            Self::Swift => (0.9, 1.0, 1.5, 1.3),
            Self::Armored => (1.6, 0.9, 0.9, 1.5),
        }
    }
}

/// Exploitable weak point: abilities carrying the matching tag deal extra
/// damage (never less than 1.0x).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakPoint {
    pub tag: AbilityTag,
    pub damage_multiplier: f64,
    pub description: String,
}

/// Boss-only runtime state layered on a regular enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub template_id: String,
    pub current_phase_index: usize,
    /// One-shot phase markers. Grows monotonically, never re-triggers.
    pub phases_triggered: BTreeSet<usize>,
    pub last_ability_used: Option<BossAbilityKind>,
}

impl BossState {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            current_phase_index: 0,
            phases_triggered: BTreeSet::new(),
            last_ability_used: None,
        }
    }
}

/// One combatant in the roster. Created by the generator at combat start or
/// mid-combat (summons); stays in the roster when destroyed so indices remain
/// stable, and the tick loop skips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub max_hp: f64,
    pub current_hp: f64,
    pub speed: f64,
    pub damage: f64,
    pub scrap_value: i64,
    pub intent: EnemyIntent,
    pub is_charged: bool,
    /// ATB gauge, 0 to 100. Reaching 100 resolves exactly one action.
    pub action_charge: f64,
    #[serde(default)]
    pub statuses: Vec<ActiveStatus>,
    /// Remaining phase-shift evasion time. While positive, player attacks
    /// cannot connect.
    #[serde(default)]
    pub evade_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affix: Option<Affix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weak_point: Option<WeakPoint>,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss: Option<BossState>,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            (self.current_hp / self.max_hp).clamp(0.0, 1.0)
        }
    }

    /// Apply damage, clamping into `[0, max_hp]` before the next read.
    pub fn take_damage(&mut self, amount: f64) {
        self.current_hp = (self.current_hp - amount.max(0.0)).clamp(0.0, self.max_hp);
    }

    /// Heal, capped at max HP.
    pub fn heal(&mut self, amount: f64) {
        self.current_hp = (self.current_hp + amount.max(0.0)).min(self.max_hp);
    }

    pub fn is_elite(&self) -> bool {
        self.affix.is_some()
    }
}
