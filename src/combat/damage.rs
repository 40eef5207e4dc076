//! Resource and damage model: max HP, base damage, ability resolution, and
//! consumable effects. The stat math is pure; ability resolution rolls chance
//! through an injected [Dice] and reports failures as typed fields, never as
//! panics or exceptions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::enemy::Enemy;
use crate::combat::rng::Dice;
use crate::combat::status::{has_status, ActiveStatus, StatusKind};
use crate::combat::synergy::{SynergySet, INFERNO_DAMAGE_MULTIPLIER};
use crate::data::pilot::{Ability, ModuleKind, PilotConfig, ResourceKind};
use crate::data::run_state::RunState;

pub const OVERDRIVE_DAMAGE_MULTIPLIER: f64 = 1.5;
pub const CRIT_CHANCE: f64 = 0.10;
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const HEAT_JAM_THRESHOLD: f64 = 100.0;
pub const MAX_ENERGY: f64 = 100.0;

const DEFENSE_HP_BONUS: i32 = 30;
const ASSAULT_HP_PENALTY: i32 = 20;
const ASSAULT_DAMAGE_BONUS: i32 = 3;
const DEFENSE_DAMAGE_PENALTY: i32 = 2;

/// Max hull for a pilot/module/run combination. Pure and total.
pub fn calculate_max_hp(pilot: &PilotConfig, module: ModuleKind, run: &RunState) -> i32 {
    let module_delta = match module {
        ModuleKind::Defense => DEFENSE_HP_BONUS,
        ModuleKind::Assault => -ASSAULT_HP_PENALTY,
        ModuleKind::Balanced => 0,
    };
    pilot.base_hp + module_delta + run.max_hp_upgrade
}

/// Base damage for one hit before ability multipliers. Pure; never below 1.
pub fn calculate_damage(
    pilot: &PilotConfig,
    module: ModuleKind,
    statuses: &[ActiveStatus],
    run: &RunState,
    heat: f64,
    synergies: &SynergySet,
) -> i32 {
    let module_delta = match module {
        ModuleKind::Assault => ASSAULT_DAMAGE_BONUS,
        ModuleKind::Defense => -DEFENSE_DAMAGE_PENALTY,
        ModuleKind::Balanced => 0,
    };

    let mut damage = (pilot.base_damage + module_delta + run.damage_upgrade) as f64;
    if has_status(statuses, StatusKind::Overdrive) {
        damage *= OVERDRIVE_DAMAGE_MULTIPLIER;
    }
    if synergies.thermal_conversion {
        damage += (heat / 10.0).floor();
    }
    if synergies.inferno {
        damage *= INFERNO_DAMAGE_MULTIPLIER;
    }

    (damage.floor() as i32).max(1)
}

/// Recoverable validation failures. Surfaced to the UI as a warning line and
/// an audio cue; combat continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbilityError {
    LowEnergy,
    Jammed,
    OnCooldown,
    NotCharged,
    UnknownAbility,
}

impl fmt::Display for AbilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LowEnergy => "insufficient energy",
            Self::Jammed => "weapons jammed",
            Self::OnCooldown => "ability on cooldown",
            Self::NotCharged => "gauge not charged",
            Self::UnknownAbility => "unknown ability",
        };
        f.write_str(text)
    }
}

impl std::error::Error for AbilityError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetHit {
    pub index: usize,
    pub damage: i32,
    pub weak_point: bool,
}

/// Full outcome of one ability use. On failure `resource_consumed` is false
/// and `energy_after`/`heat_after` echo the inputs unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityResult {
    pub error: Option<AbilityError>,
    pub resource_consumed: bool,
    pub energy_after: f64,
    pub heat_after: f64,
    pub jammed_after: bool,
    pub targets: Vec<TargetHit>,
    pub applies_stun: bool,
    pub weak_point_hit: bool,
    pub critical: bool,
    pub ambush: bool,
    pub exits_stealth: bool,
    pub enters_stealth: bool,
    pub self_shield_ms: f64,
    pub log: String,
}

impl AbilityResult {
    fn failure(error: AbilityError, energy: f64, heat: f64, jammed: bool, log: String) -> Self {
        Self {
            error: Some(error),
            resource_consumed: false,
            energy_after: energy,
            heat_after: heat,
            jammed_after: jammed,
            targets: Vec::new(),
            applies_stun: false,
            weak_point_hit: false,
            critical: false,
            ambush: false,
            exits_stealth: false,
            enters_stealth: false,
            self_shield_ms: 0.0,
            log,
        }
    }
}

/// Resolve one ability use against the live roster.
///
/// Validation happens before anything is spent: a failed check returns with
/// all resource fields unchanged. On success the multiplier order is fixed:
/// ability multiplier, then the ambush burst (which replaces the crit roll),
/// then the per-target weak-point multiplier (never below 1.0), then one
/// independent 10% crit roll for the cast.
#[allow(clippy::too_many_arguments)]
pub fn calculate_ability_result(
    pilot: &PilotConfig,
    ability: &Ability,
    base_damage: i32,
    energy: f64,
    heat: f64,
    jammed: bool,
    burrowed: bool,
    target_index: usize,
    enemies: &[Enemy],
    dice: &mut impl Dice,
) -> AbilityResult {
    let profile = pilot.archetype.profile();

    if profile.resource == ResourceKind::Heat && jammed {
        return AbilityResult::failure(
            AbilityError::Jammed,
            energy,
            heat,
            jammed,
            format!("{} is jammed — vent heat first", pilot.name),
        );
    }
    if profile.resource == ResourceKind::Energy && ability.energy_cost > energy {
        return AbilityResult::failure(
            AbilityError::LowEnergy,
            energy,
            heat,
            jammed,
            format!("Not enough energy for {}", ability.name),
        );
    }

    let energy_after = if profile.resource == ResourceKind::Energy {
        energy - ability.energy_cost
    } else {
        energy
    };
    let heat_after = if profile.resource == ResourceKind::Heat {
        heat + ability.heat_cost
    } else {
        heat
    };
    let jammed_after = heat_after >= HEAT_JAM_THRESHOLD;

    // Utility abilities resolve without touching the roster.
    if ability.enters_stealth || ability.self_shield_ms > 0.0 {
        return AbilityResult {
            error: None,
            resource_consumed: true,
            energy_after,
            heat_after,
            jammed_after,
            targets: Vec::new(),
            applies_stun: false,
            weak_point_hit: false,
            critical: false,
            ambush: false,
            exits_stealth: false,
            enters_stealth: ability.enters_stealth,
            self_shield_ms: ability.self_shield_ms,
            log: format!("{} activates {}", pilot.name, ability.name),
        };
    }

    let mut damage = base_damage as f64 * ability.damage_mult;

    let ambush = burrowed && profile.ambush_multiplier.is_some();
    let mut exits_stealth = false;
    if ambush {
        // Striking from hiding: fixed burst, and the pilot is revealed.
        damage *= profile.ambush_multiplier.unwrap_or(1.0);
        exits_stealth = true;
    }

    let target_indices: Vec<usize> = if ability.is_aoe {
        enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_alive())
            .map(|(i, _)| i)
            .collect()
    } else if target_index < enemies.len() && enemies[target_index].is_alive() {
        vec![target_index]
    } else {
        // Stale target index: skip the hit rather than abort the tick.
        Vec::new()
    };

    let critical = !ambush && dice.chance(CRIT_CHANCE);

    let mut weak_point_hit = false;
    let targets: Vec<TargetHit> = target_indices
        .into_iter()
        .map(|index| {
            let mut hit = damage;
            let mut weak_point = false;
            if let Some(wp) = &enemies[index].weak_point {
                if wp.tag == ability.tag {
                    hit *= wp.damage_multiplier.max(1.0);
                    weak_point = true;
                    weak_point_hit = true;
                }
            }
            if critical {
                hit *= CRIT_MULTIPLIER;
            }
            TargetHit {
                index,
                damage: (hit.floor() as i32).max(1),
                weak_point,
            }
        })
        .collect();

    let mut log = format!("{} uses {}", pilot.name, ability.name);
    if ambush {
        log.push_str(" from the shadows");
    } else if critical {
        log.push_str(" — critical hit!");
    }
    if weak_point_hit {
        log.push_str(" (weak point)");
    }

    AbilityResult {
        error: None,
        resource_consumed: true,
        energy_after,
        heat_after,
        jammed_after,
        targets,
        applies_stun: ability.stuns,
        weak_point_hit,
        critical,
        ambush,
        exits_stealth,
        enters_stealth: false,
        self_shield_ms: 0.0,
        log,
    }
}

/// Consumable items carried into combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableKind {
    NanoStim,
    ShieldMatrix,
    CoolantFlush,
    EmpCharge,
}

impl ConsumableKind {
    pub const ALL: [ConsumableKind; 4] = [
        ConsumableKind::NanoStim,
        ConsumableKind::ShieldMatrix,
        ConsumableKind::CoolantFlush,
        ConsumableKind::EmpCharge,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::NanoStim => "nano_stim",
            Self::ShieldMatrix => "shield_matrix",
            Self::CoolantFlush => "coolant_flush",
            Self::EmpCharge => "emp_charge",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

pub const NANO_STIM_HEAL: f64 = 50.0;
pub const SHIELD_MATRIX_MS: f64 = 5000.0;
pub const EMP_DAMAGE: f64 = 10.0;
pub const EMP_STUN_MS: f64 = 1500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumableEffect {
    pub new_hp: f64,
    pub applies_status: Option<ActiveStatus>,
    pub clears_heat: bool,
    pub damage_all: f64,
    pub stuns_all_ms: f64,
    pub log: String,
}

/// Effect package for one consumable use. Pure: the caller applies it.
pub fn apply_consumable_effect(
    kind: ConsumableKind,
    current_hp: f64,
    max_hp: f64,
) -> ConsumableEffect {
    match kind {
        ConsumableKind::NanoStim => ConsumableEffect {
            new_hp: (current_hp + NANO_STIM_HEAL).min(max_hp),
            applies_status: None,
            clears_heat: false,
            damage_all: 0.0,
            stuns_all_ms: 0.0,
            log: "Nano-stim injected — hull knitting".to_string(),
        },
        ConsumableKind::ShieldMatrix => ConsumableEffect {
            new_hp: current_hp,
            applies_status: Some(ActiveStatus::shield(SHIELD_MATRIX_MS)),
            clears_heat: false,
            damage_all: 0.0,
            stuns_all_ms: 0.0,
            log: "Shield matrix deployed".to_string(),
        },
        ConsumableKind::CoolantFlush => ConsumableEffect {
            new_hp: current_hp,
            applies_status: None,
            clears_heat: true,
            damage_all: 0.0,
            stuns_all_ms: 0.0,
            log: "Coolant flush — heat purged".to_string(),
        },
        ConsumableKind::EmpCharge => ConsumableEffect {
            new_hp: current_hp,
            applies_status: None,
            clears_heat: false,
            damage_all: EMP_DAMAGE,
            stuns_all_ms: EMP_STUN_MS,
            log: "EMP charge detonated".to_string(),
        },
    }
}
