pub mod boss_template;
pub mod enemy_template;
pub mod pilot;
pub mod registry;
pub mod run_state;
pub mod validate;

pub use boss_template::{BossPhase, BossTemplate, PhasePattern};
pub use enemy_template::EnemyTemplate;
pub use pilot::{
    Ability, AbilityTag, ArchetypeProfile, ModuleKind, PilotArchetype, PilotConfig, ResourceKind,
};
pub use registry::GameData;
pub use run_state::{Consumable, RunState};
pub use validate::{validate_game_data, ValidationReport, ValidationSeverity};
