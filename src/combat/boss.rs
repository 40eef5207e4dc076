//! Boss subsystem: one-shot phase transitions and special-ability outcome
//! packages. Ability selection and telegraph timing live at the call site
//! (the simulation's scheduled-event queue); everything here is pure
//! computation over the current state.

use serde::{Deserialize, Serialize};

use crate::combat::enemy::{BossState, Enemy};
use crate::combat::status::{ActiveStatus, StatusKind};
use crate::data::boss_template::BossTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BossAbilityKind {
    AoeLaserBarrage,
    ShieldWall,
    SummonAdds,
    Overload,
    Regenerate,
    PhaseShift,
    GravityWell,
    CorruptedData,
    EnergyDrain,
    HeatSurge,
}

impl BossAbilityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AoeLaserBarrage => "Laser Barrage",
            Self::ShieldWall => "Shield Wall",
            Self::SummonAdds => "Summon Adds",
            Self::Overload => "Overload",
            Self::Regenerate => "Regenerate",
            Self::PhaseShift => "Phase Shift",
            Self::GravityWell => "Gravity Well",
            Self::CorruptedData => "Corrupted Data",
            Self::EnergyDrain => "Energy Drain",
            Self::HeatSurge => "Heat Surge",
        }
    }
}

/// Find the phase that should fire for the boss's current HP fraction.
///
/// Scans the phase list from last to first and returns the first phase whose
/// threshold is at or above the current fraction and whose index has not
/// already fired. One-shot per index: `phases_triggered` only grows.
pub fn check_boss_phase_transition(
    hp_fraction: f64,
    template: &BossTemplate,
    state: &BossState,
) -> Option<usize> {
    for index in (0..template.phases.len()).rev() {
        let phase = &template.phases[index];
        if phase.hp_threshold >= hp_fraction && !state.phases_triggered.contains(&index) {
            return Some(index);
        }
    }
    None
}

/// Deterministic effect package for one boss ability. The caller applies the
/// fields to player and roster, skipping pieces that no longer apply (dead
/// boss, missing minion template).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BossAbilityOutcome {
    pub player_damage: f64,
    pub player_status: Option<ActiveStatus>,
    /// Number of minions cloned from the template's `minions_template`.
    pub summons: u32,
    /// Fraction of the boss's max HP restored.
    pub self_heal_fraction: f64,
    pub self_status: Option<ActiveStatus>,
    /// Boss dodges player attacks for this long.
    pub evade_ms: f64,
    /// Player charge accrual halved for this long.
    pub charge_debuff_ms: f64,
    pub energy_drain: f64,
    pub heat_gain: f64,
    pub log: String,
}

pub const BOSS_SHIELD_MS: f64 = 6000.0;
pub const BOSS_EVADE_MS: f64 = 4000.0;
pub const GRAVITY_WELL_MS: f64 = 5000.0;
pub const BOSS_REGEN_FRACTION: f64 = 0.15;
pub const ENERGY_DRAIN_AMOUNT: f64 = 30.0;
pub const HEAT_SURGE_AMOUNT: f64 = 30.0;

/// Compute the outcome of one boss ability. Pure; no RNG, no mutation.
pub fn execute_boss_ability(ability: BossAbilityKind, boss: &Enemy) -> BossAbilityOutcome {
    let name = boss.name.as_str();
    match ability {
        BossAbilityKind::AoeLaserBarrage => BossAbilityOutcome {
            player_damage: boss.damage * 1.5,
            log: format!("{name} sweeps the field with a laser barrage"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::ShieldWall => BossAbilityOutcome {
            self_status: Some(ActiveStatus::new(
                "boss_shield",
                StatusKind::Shielded,
                BOSS_SHIELD_MS,
                0.0,
            )),
            log: format!("{name} raises a shield wall"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::SummonAdds => BossAbilityOutcome {
            summons: 2,
            log: format!("{name} calls in reinforcements"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::Overload => BossAbilityOutcome {
            player_damage: boss.damage,
            player_status: Some(ActiveStatus::burning(4000.0, 2.0)),
            log: format!("{name} overloads your heat sinks"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::Regenerate => BossAbilityOutcome {
            self_heal_fraction: BOSS_REGEN_FRACTION,
            log: format!("{name} reroutes power to self-repair"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::PhaseShift => BossAbilityOutcome {
            evade_ms: BOSS_EVADE_MS,
            log: format!("{name} shifts out of phase"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::GravityWell => BossAbilityOutcome {
            charge_debuff_ms: GRAVITY_WELL_MS,
            log: format!("{name} opens a gravity well — servos straining"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::CorruptedData => BossAbilityOutcome {
            player_damage: boss.damage * 0.5,
            player_status: Some(ActiveStatus::stun(1500.0)),
            log: format!("{name} floods your HUD with corrupted data"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::EnergyDrain => BossAbilityOutcome {
            energy_drain: ENERGY_DRAIN_AMOUNT,
            log: format!("{name} siphons your capacitors"),
            ..BossAbilityOutcome::default()
        },
        BossAbilityKind::HeatSurge => BossAbilityOutcome {
            player_damage: 5.0,
            heat_gain: HEAT_SURGE_AMOUNT,
            log: format!("{name} vents plasma across your hull"),
            ..BossAbilityOutcome::default()
        },
    }
}
