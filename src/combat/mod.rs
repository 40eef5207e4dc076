pub mod ai;
pub mod boss;
pub mod damage;
pub mod enemy;
pub mod generator;
pub mod log;
pub mod replay;
pub mod rng;
pub mod status;
pub mod synergy;

pub use ai::{
    calculate_defense_target, determine_enemy_intent, resolve_enemy_action, swift_dodge,
    ActionContext, DefenseTarget, EnemyActionResult,
};
pub use boss::{
    check_boss_phase_transition, execute_boss_ability, BossAbilityKind, BossAbilityOutcome,
};
pub use damage::{
    apply_consumable_effect, calculate_ability_result, calculate_damage, calculate_max_hp,
    AbilityError, AbilityResult, ConsumableEffect, ConsumableKind, TargetHit,
    HEAT_JAM_THRESHOLD, MAX_ENERGY,
};
pub use enemy::{Affix, BossState, Enemy, EnemyIntent, WeakPoint};
pub use generator::{
    apply_survival_scaling, generate_endless_wave_enemies, generate_enemies, DailyModifier,
    DifficultyMultipliers,
};
pub use log::{CombatLogEntry, LogCategory};
pub use replay::{Actor, CombatAction, CombatOutcome, CombatReplay, FinalStats};
pub use rng::{Dice, Rng, ScriptedDice};
pub use status::{has_status, process_status_effects, ActiveStatus, StatusKind, StatusTickResult};
pub use synergy::{active_synergies, ComboTracker, SynergySet};
