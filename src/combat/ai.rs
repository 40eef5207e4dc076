//! Enemy AI: per-tick intent selection, action resolution, and
//! defense-mission target choice. Every roll goes through the injected
//! [Dice] so whole fights replay from a seed.

use serde::{Deserialize, Serialize};

use crate::combat::enemy::{Affix, Enemy, EnemyIntent};
use crate::combat::rng::Dice;
use crate::combat::status::{has_status, StatusKind};
use crate::combat::synergy::{SynergySet, BULWARK_DAMAGE_REDUCTION};

pub const HEAL_HP_THRESHOLD: f64 = 0.3;
pub const HEAL_CHANCE: f64 = 0.40;
pub const CHARGE_CHANCE: f64 = 0.20;
pub const ENEMY_HEAL_AMOUNT: f64 = 15.0;

pub const BASE_HIT_CHANCE: f64 = 0.9;
pub const SEISMIC_HIT_PENALTY: f64 = 0.3;
pub const ENEMY_CRIT_CHANCE: f64 = 0.15;
pub const ENEMY_CRIT_MULTIPLIER: f64 = 1.5;
pub const CHARGED_ATTACK_MULTIPLIER: f64 = 2.5;
pub const GRAZE_CHANCE: f64 = 0.20;
pub const GRAZE_MULTIPLIER: f64 = 0.5;
pub const VAMPIRIC_LIFESTEAL: f64 = 0.30;
pub const SWIFT_DODGE_CHANCE: f64 = 0.25;

/// Swift elites roll to sidestep each incoming player hit. Non-Swift enemies
/// never dodge and the roll is not consumed.
pub fn swift_dodge(enemy: &Enemy, dice: &mut impl Dice) -> bool {
    enemy.affix == Some(Affix::Swift) && dice.chance(SWIFT_DODGE_CHANCE)
}

/// Pick what the enemy does when its gauge next fills.
///
/// A charged enemy always attacks; the charge is spent on the swing. Below
/// 30% HP there is a 40% heal roll, then a 20% charge roll, then attack.
/// Each roll is an independent uniform draw.
pub fn determine_enemy_intent(enemy: &Enemy, dice: &mut impl Dice) -> EnemyIntent {
    if enemy.is_charged {
        return EnemyIntent::Attack;
    }
    if enemy.hp_fraction() < HEAL_HP_THRESHOLD && dice.chance(HEAL_CHANCE) {
        return EnemyIntent::Heal;
    }
    if dice.chance(CHARGE_CHANCE) {
        return EnemyIntent::Charge;
    }
    EnemyIntent::Attack
}

/// Battlefield context an enemy action resolves against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionContext {
    /// Player is in a stealth/burrowed state: attacks cannot connect.
    pub player_burrowed: bool,
    /// Seismic hazard active: hit chance drops by 0.3.
    pub seismic: bool,
    pub bulwark: bool,
}

impl ActionContext {
    pub fn from_synergies(synergies: &SynergySet, player_burrowed: bool, seismic: bool) -> Self {
        Self {
            player_burrowed,
            seismic,
            bulwark: synergies.bulwark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyActionResult {
    pub damage_to_player: f64,
    pub healed: f64,
    pub lifesteal: f64,
    pub missed: bool,
    pub grazed: bool,
    pub critical: bool,
    pub charged_attack: bool,
    pub began_charging: bool,
    pub log: String,
}

/// Resolve one gauge-full action for `enemy`, mutating its charge flag, HP
/// (heals and lifesteal) and next intent. Damage to the player is returned,
/// not applied; the simulation owns the player side.
pub fn resolve_enemy_action(
    enemy: &mut Enemy,
    ctx: ActionContext,
    dice: &mut impl Dice,
) -> EnemyActionResult {
    let name = enemy.name.clone();
    let mut result = EnemyActionResult {
        damage_to_player: 0.0,
        healed: 0.0,
        lifesteal: 0.0,
        missed: false,
        grazed: false,
        critical: false,
        charged_attack: false,
        began_charging: false,
        log: String::new(),
    };

    match enemy.intent {
        EnemyIntent::Heal => {
            enemy.heal(ENEMY_HEAL_AMOUNT);
            result.healed = ENEMY_HEAL_AMOUNT;
            result.log = format!("{name} patches itself up");
        }
        EnemyIntent::Charge => {
            enemy.is_charged = true;
            result.began_charging = true;
            result.log = format!("{name} is winding up a heavy strike!");
        }
        EnemyIntent::Attack => {
            let was_charged = enemy.is_charged;
            enemy.is_charged = false;

            if has_status(&enemy.statuses, StatusKind::Stunned) {
                result.missed = true;
                result.log = format!("{name} is stunned and flails harmlessly");
            } else {
                let hit_chance = if ctx.player_burrowed {
                    0.0
                } else if ctx.seismic {
                    BASE_HIT_CHANCE - SEISMIC_HIT_PENALTY
                } else {
                    BASE_HIT_CHANCE
                };

                if !dice.chance(hit_chance) {
                    result.missed = true;
                    result.log = if ctx.player_burrowed {
                        format!("{name} swipes at empty ground")
                    } else {
                        format!("{name} misses")
                    };
                } else {
                    let mut damage = enemy.damage;
                    if was_charged {
                        damage = (damage * CHARGED_ATTACK_MULTIPLIER).ceil();
                        result.charged_attack = true;
                        result.log = format!("{name} unleashes its charged strike!");
                    } else if dice.chance(ENEMY_CRIT_CHANCE) {
                        damage = (damage * ENEMY_CRIT_MULTIPLIER).ceil();
                        result.critical = true;
                        result.log = format!("{name} lands a critical hit!");
                    } else if dice.chance(GRAZE_CHANCE) {
                        damage *= GRAZE_MULTIPLIER;
                        result.grazed = true;
                        result.log = format!("{name} grazes you");
                    } else {
                        result.log = format!("{name} hits you");
                    }

                    if ctx.bulwark {
                        damage *= 1.0 - BULWARK_DAMAGE_REDUCTION;
                    }

                    if enemy.affix == Some(Affix::Vampiric) {
                        let heal = damage * VAMPIRIC_LIFESTEAL;
                        let before = enemy.current_hp;
                        enemy.heal(heal);
                        result.lifesteal = enemy.current_hp - before;
                    }

                    result.damage_to_player = damage;
                }
            }
        }
    }

    enemy.intent = determine_enemy_intent(enemy, dice);
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefenseTarget {
    Player,
    Core,
}

pub const CORE_PANIC_THRESHOLD: f64 = 0.25;
pub const PLAYER_FOCUS_THRESHOLD: f64 = 0.20;
pub const PLAYER_FOCUS_CHANCE: f64 = 0.85;
pub const CORE_DEFAULT_CHANCE: f64 = 0.60;

/// Defense-mission target choice for one enemy action.
///
/// Bosses always go for the player. A nearly-destroyed core pulls every
/// regular enemy onto it; a nearly-dead player draws most fire. Elites
/// weight their pick toward whichever candidate has lost more HP. Everyone
/// else splits 60% core / 40% player.
pub fn calculate_defense_target(
    enemy: &Enemy,
    player_hp_fraction: f64,
    core_hp_fraction: f64,
    dice: &mut impl Dice,
) -> DefenseTarget {
    if enemy.is_boss {
        return DefenseTarget::Player;
    }
    if core_hp_fraction < CORE_PANIC_THRESHOLD {
        return DefenseTarget::Core;
    }
    if player_hp_fraction < PLAYER_FOCUS_THRESHOLD {
        return if dice.chance(PLAYER_FOCUS_CHANCE) {
            DefenseTarget::Player
        } else {
            DefenseTarget::Core
        };
    }
    if enemy.is_elite() {
        let weights = [
            100.0 - player_hp_fraction * 100.0,
            100.0 - core_hp_fraction * 100.0,
        ];
        return if dice.weighted_pick(&weights) == 0 {
            DefenseTarget::Player
        } else {
            DefenseTarget::Core
        };
    }
    if dice.chance(CORE_DEFAULT_CHANCE) {
        DefenseTarget::Core
    } else {
        DefenseTarget::Player
    }
}
