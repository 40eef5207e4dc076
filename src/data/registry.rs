//! Startup-loaded game data registry. Load once, share via Arc into the
//! engine, server handlers, and batch workers; no module-level caches.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::data::boss_template::{builtin_boss_templates, load_boss_templates, BossTemplate};
use crate::data::enemy_template::{
    builtin_enemy_templates, load_enemy_templates, EnemyTemplate,
};
use crate::data::pilot::{builtin_pilots, load_pilots, PilotConfig};

pub const DATA_DIR_ENV: &str = "SCRAPFALL_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

const PILOTS_FILE: &str = "pilots.json";
const ENEMIES_FILE: &str = "enemies.json";
const BOSSES_FILE: &str = "bosses.json";

/// Read-only registry of static game data.
#[derive(Debug, Clone)]
pub struct GameData {
    pub pilots: Vec<PilotConfig>,
    pub enemy_templates: Vec<EnemyTemplate>,
    pub boss_templates: Vec<BossTemplate>,
}

impl GameData {
    /// Builtin tables only, no disk access. Used by tests and benches.
    pub fn builtin() -> Arc<GameData> {
        Arc::new(GameData {
            pilots: builtin_pilots(),
            enemy_templates: builtin_enemy_templates(),
            boss_templates: builtin_boss_templates(),
        })
    }

    /// Load tables from the data directory (`SCRAPFALL_DATA_DIR`, default
    /// `data/`). Any missing or malformed table falls back to its builtin.
    pub fn load() -> Arc<GameData> {
        let dir = PathBuf::from(
            env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        );
        let pilots = load_pilots(&dir.join(PILOTS_FILE)).unwrap_or_else(builtin_pilots);
        let enemy_templates =
            load_enemy_templates(&dir.join(ENEMIES_FILE)).unwrap_or_else(builtin_enemy_templates);
        let boss_templates =
            load_boss_templates(&dir.join(BOSSES_FILE)).unwrap_or_else(builtin_boss_templates);
        Arc::new(GameData {
            pilots,
            enemy_templates,
            boss_templates,
        })
    }

    pub fn pilot(&self, id: &str) -> Option<&PilotConfig> {
        self.pilots.iter().find(|p| p.id == id)
    }

    pub fn enemy_template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemy_templates.iter().find(|t| t.id == id)
    }

    pub fn boss_template(&self, id: &str) -> Option<&BossTemplate> {
        self.boss_templates.iter().find(|t| t.id == id)
    }
}
