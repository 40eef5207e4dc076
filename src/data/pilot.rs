//! Pilot table: static configs, ability definitions, and the archetype
//! capability profiles that replace scattered pilot-id checks.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleKind {
    Assault,
    Defense,
    Balanced,
}

impl ModuleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assault => "ASSAULT",
            Self::Defense => "DEFENSE",
            Self::Balanced => "BALANCED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ASSAULT" => Some(Self::Assault),
            "DEFENSE" => Some(Self::Defense),
            "BALANCED" => Some(Self::Balanced),
            _ => None,
        }
    }
}

/// Damage-type tag on an ability; weak points match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityTag {
    Kinetic,
    Thermal,
    Arc,
    Stealth,
}

impl AbilityTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kinetic => "kinetic",
            Self::Thermal => "thermal",
            Self::Arc => "arc",
            Self::Stealth => "stealth",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub tag: AbilityTag,
    pub damage_mult: f64,
    pub cooldown_ms: f64,
    #[serde(default)]
    pub energy_cost: f64,
    #[serde(default)]
    pub heat_cost: f64,
    #[serde(default)]
    pub is_aoe: bool,
    #[serde(default)]
    pub stuns: bool,
    /// Utility: drops the pilot into the burrowed/stealth state instead of attacking.
    #[serde(default)]
    pub enters_stealth: bool,
    /// Utility: applies a SHIELDED status to the pilot for this many ms.
    #[serde(default)]
    pub self_shield_ms: f64,
}

/// Which resource pool the archetype spends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Energy,
    Heat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PilotArchetype {
    /// Balanced energy frame.
    Vanguard,
    /// Heat engine: abilities build heat, jams at 100, heat bleeds off over time.
    Cinder,
    /// Ambusher: strikes from a burrowed state for a burst multiplier.
    Spectre,
    /// Defensive frame with strong passive regen.
    Aegis,
}

/// Per-archetype behavior parameters, looked up once at combat start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    pub resource: ResourceKind,
    /// Energy restored per second of combat time.
    pub energy_regen_per_sec: f64,
    /// Heat dissipated per second of combat time.
    pub heat_decay_per_sec: f64,
    /// Passive hull repair per second.
    pub hull_regen_per_sec: f64,
    /// Burst multiplier applied when attacking out of a burrowed state.
    pub ambush_multiplier: Option<f64>,
}

impl PilotArchetype {
    pub const fn profile(self) -> ArchetypeProfile {
        match self {
            Self::Vanguard => ArchetypeProfile {
                resource: ResourceKind::Energy,
                energy_regen_per_sec: 4.0,
                heat_decay_per_sec: 0.0,
                hull_regen_per_sec: 0.0,
                ambush_multiplier: None,
            },
            Self::Cinder => ArchetypeProfile {
                resource: ResourceKind::Heat,
                energy_regen_per_sec: 0.0,
                heat_decay_per_sec: 2.5,
                hull_regen_per_sec: 0.0,
                ambush_multiplier: None,
            },
            Self::Spectre => ArchetypeProfile {
                resource: ResourceKind::Energy,
                energy_regen_per_sec: 3.0,
                heat_decay_per_sec: 0.0,
                hull_regen_per_sec: 0.0,
                ambush_multiplier: Some(2.5),
            },
            Self::Aegis => ArchetypeProfile {
                resource: ResourceKind::Energy,
                energy_regen_per_sec: 3.0,
                heat_decay_per_sec: 0.0,
                hull_regen_per_sec: 0.5,
                ambush_multiplier: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotConfig {
    pub id: String,
    pub name: String,
    pub archetype: PilotArchetype,
    pub base_hp: i32,
    pub base_speed: f64,
    pub base_damage: i32,
    pub abilities: Vec<Ability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_condition: Option<String>,
}

fn ability(
    id: &str,
    name: &str,
    tag: AbilityTag,
    damage_mult: f64,
    cooldown_ms: f64,
) -> Ability {
    Ability {
        id: id.to_string(),
        name: name.to_string(),
        tag,
        damage_mult,
        cooldown_ms,
        energy_cost: 0.0,
        heat_cost: 0.0,
        is_aoe: false,
        stuns: false,
        enters_stealth: false,
        self_shield_ms: 0.0,
    }
}

/// Builtin pilot roster, used when no JSON override is present.
pub fn builtin_pilots() -> Vec<PilotConfig> {
    vec![
        PilotConfig {
            id: "vanguard".to_string(),
            name: "Vanguard".to_string(),
            archetype: PilotArchetype::Vanguard,
            base_hp: 150,
            base_speed: 10.0,
            base_damage: 12,
            abilities: vec![
                Ability {
                    energy_cost: 10.0,
                    ..ability("kinetic_slam", "Kinetic Slam", AbilityTag::Kinetic, 1.0, 2000.0)
                },
                Ability {
                    energy_cost: 30.0,
                    is_aoe: true,
                    ..ability("arc_burst", "Arc Burst", AbilityTag::Arc, 1.5, 6000.0)
                },
                Ability {
                    energy_cost: 20.0,
                    stuns: true,
                    ..ability(
                        "concussive_round",
                        "Concussive Round",
                        AbilityTag::Kinetic,
                        0.8,
                        5000.0,
                    )
                },
            ],
            unlock_condition: None,
        },
        PilotConfig {
            id: "cinder".to_string(),
            name: "Cinder".to_string(),
            archetype: PilotArchetype::Cinder,
            base_hp: 130,
            base_speed: 11.0,
            base_damage: 14,
            abilities: vec![
                Ability {
                    heat_cost: 15.0,
                    ..ability("flame_lash", "Flame Lash", AbilityTag::Thermal, 1.2, 2500.0)
                },
                Ability {
                    heat_cost: 40.0,
                    is_aoe: true,
                    ..ability("meltdown_beam", "Meltdown Beam", AbilityTag::Thermal, 2.0, 8000.0)
                },
                Ability {
                    heat_cost: 25.0,
                    ..ability("slag_mortar", "Slag Mortar", AbilityTag::Thermal, 1.5, 5000.0)
                },
            ],
            unlock_condition: Some("reach_stage_5".to_string()),
        },
        PilotConfig {
            id: "spectre".to_string(),
            name: "Spectre".to_string(),
            archetype: PilotArchetype::Spectre,
            base_hp: 110,
            base_speed: 13.0,
            base_damage: 13,
            abilities: vec![
                Ability {
                    energy_cost: 15.0,
                    ..ability("shadow_strike", "Shadow Strike", AbilityTag::Stealth, 1.3, 3000.0)
                },
                Ability {
                    energy_cost: 25.0,
                    enters_stealth: true,
                    ..ability("phase_cloak", "Phase Cloak", AbilityTag::Stealth, 0.0, 9000.0)
                },
                Ability {
                    energy_cost: 20.0,
                    ..ability("rail_needle", "Rail Needle", AbilityTag::Kinetic, 1.6, 5500.0)
                },
            ],
            unlock_condition: Some("reach_stage_10".to_string()),
        },
        PilotConfig {
            id: "aegis".to_string(),
            name: "Aegis".to_string(),
            archetype: PilotArchetype::Aegis,
            base_hp: 170,
            base_speed: 8.0,
            base_damage: 10,
            abilities: vec![
                Ability {
                    energy_cost: 12.0,
                    ..ability("breach_hammer", "Breach Hammer", AbilityTag::Kinetic, 1.1, 2500.0)
                },
                Ability {
                    energy_cost: 30.0,
                    self_shield_ms: 6000.0,
                    ..ability("bastion_field", "Bastion Field", AbilityTag::Arc, 0.0, 10000.0)
                },
                Ability {
                    energy_cost: 25.0,
                    is_aoe: true,
                    stuns: true,
                    ..ability("shock_pulse", "Shock Pulse", AbilityTag::Arc, 0.6, 7000.0)
                },
            ],
            unlock_condition: Some("clear_defense_mission".to_string()),
        },
    ]
}

/// Load a pilot table from JSON. Returns None if the file is missing or
/// malformed, in which case callers fall back to [builtin_pilots].
pub fn load_pilots(path: &Path) -> Option<Vec<PilotConfig>> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_has_unique_ids() {
        let pilots = builtin_pilots();
        let mut ids: Vec<_> = pilots.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), pilots.len());
    }

    #[test]
    fn heat_archetype_spends_heat_and_cools_down() {
        let profile = PilotArchetype::Cinder.profile();
        assert_eq!(profile.resource, ResourceKind::Heat);
        assert!(profile.heat_decay_per_sec > 0.0);
    }

    #[test]
    fn only_spectre_carries_an_ambush_multiplier() {
        for archetype in [
            PilotArchetype::Vanguard,
            PilotArchetype::Cinder,
            PilotArchetype::Aegis,
        ] {
            assert!(archetype.profile().ambush_multiplier.is_none());
        }
        assert_eq!(PilotArchetype::Spectre.profile().ambush_multiplier, Some(2.5));
    }
}
