//! Enemy template table: normalized base stats for roster generation.
//! Builtin table with optional JSON override (moddable).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::pilot::AbilityTag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub hp: f64,
    pub speed: f64,
    pub damage: f64,
    pub scrap_value: i64,
}

fn template(id: &str, name: &str, hp: f64, speed: f64, damage: f64, scrap: i64) -> EnemyTemplate {
    EnemyTemplate {
        id: id.to_string(),
        name: name.to_string(),
        hp,
        speed,
        damage,
        scrap_value: scrap,
    }
}

/// Builtin enemy roster used when no JSON override is present.
pub fn builtin_enemy_templates() -> Vec<EnemyTemplate> {
    vec![
        template("scavenger_drone", "Scavenger Drone", 35.0, 12.0, 6.0, 8),
        template("rust_hound", "Rust Hound", 50.0, 10.0, 8.0, 12),
        template("breaker_mech", "Breaker Mech", 80.0, 7.0, 12.0, 20),
        template("sentry_turret", "Sentry Turret", 60.0, 6.0, 10.0, 15),
        template("hive_swarm", "Hive Swarm", 40.0, 14.0, 5.0, 10),
        template("lance_trooper", "Lance Trooper", 55.0, 9.0, 9.0, 14),
    ]
}

/// Known weak points by enemy family. Matching stays substring-based because
/// template names are free-form modded data.
pub fn weak_point_for_name(name: &str) -> Option<(AbilityTag, f64, &'static str)> {
    let lower = name.to_lowercase();
    if lower.contains("drone") || lower.contains("turret") {
        Some((AbilityTag::Arc, 1.5, "Exposed servo bus"))
    } else if lower.contains("mech") || lower.contains("trooper") {
        Some((AbilityTag::Kinetic, 1.4, "Cracked plating seam"))
    } else if lower.contains("swarm") || lower.contains("hound") {
        Some((AbilityTag::Thermal, 1.6, "Flammable carapace"))
    } else {
        None
    }
}

/// Pool for random weak-point assignment (elites, and 40% of regulars).
pub const RANDOM_WEAK_POINTS: [(AbilityTag, f64, &str); 3] = [
    (AbilityTag::Kinetic, 1.4, "Stressed joint"),
    (AbilityTag::Thermal, 1.5, "Leaking fuel line"),
    (AbilityTag::Arc, 1.5, "Unshielded relay"),
];

/// Load an enemy template table from JSON. None when missing or malformed;
/// callers fall back to [builtin_enemy_templates].
pub fn load_enemy_templates(path: &Path) -> Option<Vec<EnemyTemplate>> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}
