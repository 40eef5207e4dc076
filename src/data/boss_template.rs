//! Boss template table: phase ladders, allowed abilities, and minion specs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::boss::BossAbilityKind;
use crate::combat::status::StatusKind;
use crate::data::enemy_template::EnemyTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhasePattern {
    Steady,
    Aggressive,
    Desperate,
}

/// One phase of a boss fight. `hp_threshold` is the HP fraction at or below
/// which the phase arms; templates order phases by descending threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossPhase {
    pub hp_threshold: f64,
    pub abilities: Vec<BossAbilityKind>,
    pub pattern: PhasePattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_multiplier: Option<f64>,
    #[serde(default)]
    pub status_immunities: Vec<StatusKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossTemplate {
    pub id: String,
    pub name: String,
    pub max_hp: f64,
    pub speed: f64,
    pub damage: f64,
    pub scrap_value: i64,
    pub phases: Vec<BossPhase>,
    #[serde(default)]
    pub dialogue: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minions_template: Option<EnemyTemplate>,
}

fn phase(
    hp_threshold: f64,
    abilities: Vec<BossAbilityKind>,
    pattern: PhasePattern,
    dialogue: Option<&str>,
) -> BossPhase {
    BossPhase {
        hp_threshold,
        abilities,
        pattern,
        dialogue: dialogue.map(str::to_string),
        damage_multiplier: None,
        speed_multiplier: None,
        status_immunities: Vec::new(),
    }
}

/// Builtin boss roster used when no JSON override is present.
pub fn builtin_boss_templates() -> Vec<BossTemplate> {
    use BossAbilityKind::*;

    vec![
        BossTemplate {
            id: "dreadnought_husk".to_string(),
            name: "Dreadnought Husk".to_string(),
            max_hp: 400.0,
            speed: 6.0,
            damage: 16.0,
            scrap_value: 120,
            phases: vec![
                phase(1.0, vec![AoeLaserBarrage, ShieldWall], PhasePattern::Steady, None),
                BossPhase {
                    damage_multiplier: Some(1.25),
                    ..phase(
                        0.6,
                        vec![AoeLaserBarrage, Overload, GravityWell],
                        PhasePattern::Aggressive,
                        Some("TARGETING ARRAY RECALIBRATED."),
                    )
                },
                BossPhase {
                    speed_multiplier: Some(1.3),
                    status_immunities: vec![StatusKind::Stunned],
                    ..phase(
                        0.25,
                        vec![Overload, EnergyDrain, AoeLaserBarrage],
                        PhasePattern::Desperate,
                        Some("CORE BREACH IMMINENT. YOU FIRST."),
                    )
                },
            ],
            dialogue: vec!["HULL INTEGRITY IS A SUGGESTION.".to_string()],
            minions_template: None,
        },
        BossTemplate {
            id: "hive_mother".to_string(),
            name: "Hive Mother".to_string(),
            max_hp: 320.0,
            speed: 8.0,
            damage: 12.0,
            scrap_value: 110,
            phases: vec![
                phase(1.0, vec![SummonAdds, CorruptedData], PhasePattern::Steady, None),
                phase(
                    0.5,
                    vec![SummonAdds, PhaseShift, CorruptedData],
                    PhasePattern::Aggressive,
                    Some("The brood hungers."),
                ),
                BossPhase {
                    damage_multiplier: Some(1.2),
                    ..phase(
                        0.2,
                        vec![SummonAdds, Regenerate],
                        PhasePattern::Desperate,
                        Some("ALL of my children, then."),
                    )
                },
            ],
            dialogue: vec!["You walked into the nest.".to_string()],
            minions_template: Some(EnemyTemplate {
                id: "hive_spawnling".to_string(),
                name: "Hive Spawnling".to_string(),
                hp: 20.0,
                speed: 14.0,
                damage: 4.0,
                scrap_value: 4,
            }),
        },
        BossTemplate {
            id: "forge_tyrant".to_string(),
            name: "Forge Tyrant".to_string(),
            max_hp: 450.0,
            speed: 5.0,
            damage: 18.0,
            scrap_value: 140,
            phases: vec![
                phase(1.0, vec![HeatSurge, ShieldWall], PhasePattern::Steady, None),
                phase(
                    0.55,
                    vec![HeatSurge, Overload, Regenerate],
                    PhasePattern::Aggressive,
                    Some("Your reactor will sing for me."),
                ),
                BossPhase {
                    damage_multiplier: Some(1.4),
                    status_immunities: vec![StatusKind::Burning],
                    ..phase(
                        0.2,
                        vec![HeatSurge, AoeLaserBarrage, EnergyDrain],
                        PhasePattern::Desperate,
                        Some("BURN WITH ME."),
                    )
                },
            ],
            dialogue: vec!["The forge takes all metal back.".to_string()],
            minions_template: None,
        },
    ]
}

/// Load a boss template table from JSON. None when missing or malformed;
/// callers fall back to [builtin_boss_templates].
pub fn load_boss_templates(path: &Path) -> Option<Vec<BossTemplate>> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}
