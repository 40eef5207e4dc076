//! Enemy roster generation: stage rosters, boss injection, elite promotion,
//! weak-point assignment, and survival/endless scaling.

use serde::{Deserialize, Serialize};

use crate::combat::enemy::{Affix, BossState, Enemy, EnemyIntent, WeakPoint};
use crate::combat::rng::Dice;
use crate::combat::status::ActiveStatus;
use crate::data::boss_template::BossTemplate;
use crate::data::enemy_template::{
    weak_point_for_name, EnemyTemplate, RANDOM_WEAK_POINTS,
};

pub const BOSS_STAGE_INTERVAL: u32 = 5;
pub const ELITE_CHANCE: f64 = 0.20;
pub const REGULAR_WEAK_POINT_CHANCE: f64 = 0.40;
const HP_VARIANCE: i32 = 5;
/// Long enough to outlast any combat; elite shields do not expire on a timer.
const ELITE_SHIELD_MS: f64 = 600_000.0;

/// Difficulty-tier multipliers composed on top of stage scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyMultipliers {
    pub hp: f64,
    pub damage: f64,
    pub scrap: f64,
}

impl Default for DifficultyMultipliers {
    fn default() -> Self {
        Self {
            hp: 1.0,
            damage: 1.0,
            scrap: 1.0,
        }
    }
}

/// Daily run modifiers that bend generation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DailyModifier {
    /// Every non-elite spawn is promoted to an armored elite.
    BossRush,
}

fn spawn_from_template(template: &EnemyTemplate, index: usize) -> Enemy {
    Enemy {
        id: format!("{}_{index}", template.id),
        name: template.name.clone(),
        max_hp: template.hp,
        current_hp: template.hp,
        speed: template.speed,
        damage: template.damage,
        scrap_value: template.scrap_value,
        intent: EnemyIntent::Attack,
        is_charged: false,
        action_charge: 0.0,
        statuses: Vec::new(),
        evade_ms: 0.0,
        affix: None,
        weak_point: None,
        is_boss: false,
        boss: None,
    }
}

fn promote_to_elite(enemy: &mut Enemy, affix: Affix) {
    let (hp, damage, speed, scrap) = affix.multipliers();
    enemy.max_hp = (enemy.max_hp * hp).floor().max(1.0);
    enemy.current_hp = enemy.max_hp;
    enemy.damage = (enemy.damage * damage).floor().max(1.0);
    enemy.speed *= speed;
    enemy.scrap_value = ((enemy.scrap_value as f64) * scrap).floor() as i64;
    enemy.name = format!("{} {}", affix.prefix(), enemy.name);
    enemy.affix = Some(affix);
    if affix == Affix::Shielded {
        enemy
            .statuses
            .push(ActiveStatus::shield(ELITE_SHIELD_MS));
    }
}

fn assign_weak_point(enemy: &mut Enemy, dice: &mut impl Dice) {
    if let Some((tag, mult, description)) = weak_point_for_name(&enemy.name) {
        enemy.weak_point = Some(WeakPoint {
            tag,
            damage_multiplier: mult,
            description: description.to_string(),
        });
        return;
    }
    let random_roll = enemy.is_elite() || dice.chance(REGULAR_WEAK_POINT_CHANCE);
    if random_roll {
        let (tag, mult, description) = RANDOM_WEAK_POINTS[dice.pick(RANDOM_WEAK_POINTS.len())];
        enemy.weak_point = Some(WeakPoint {
            tag,
            damage_multiplier: mult,
            description: description.to_string(),
        });
    }
}

fn spawn_boss(template: &BossTemplate, hp_scale: f64, difficulty: &DifficultyMultipliers) -> Enemy {
    let hp = (template.max_hp * hp_scale * difficulty.hp).floor().max(1.0);
    Enemy {
        id: template.id.clone(),
        name: template.name.clone(),
        max_hp: hp,
        current_hp: hp,
        speed: template.speed,
        damage: (template.damage * difficulty.damage).floor().max(1.0),
        scrap_value: ((template.scrap_value as f64) * difficulty.scrap).floor() as i64,
        intent: EnemyIntent::Attack,
        is_charged: false,
        action_charge: 0.0,
        statuses: Vec::new(),
        evade_ms: 0.0,
        affix: None,
        weak_point: None,
        is_boss: true,
        boss: Some(BossState::new(&template.id)),
    }
}

fn spawn_regulars(
    count: usize,
    hp_scale: f64,
    damage_scale: f64,
    elite_chance: f64,
    difficulty: &DifficultyMultipliers,
    daily: Option<DailyModifier>,
    templates: &[EnemyTemplate],
    dice: &mut impl Dice,
) -> Vec<Enemy> {
    let mut roster = Vec::with_capacity(count);
    for index in 0..count {
        let template = &templates[dice.pick(templates.len())];
        let mut enemy = spawn_from_template(template, index);

        let variance = dice.range_i32(-HP_VARIANCE, HP_VARIANCE) as f64;
        enemy.max_hp = (enemy.max_hp * hp_scale * difficulty.hp + variance)
            .floor()
            .max(1.0);
        enemy.current_hp = enemy.max_hp;
        enemy.damage = (enemy.damage * damage_scale * difficulty.damage)
            .floor()
            .max(1.0);
        enemy.scrap_value = ((enemy.scrap_value as f64) * difficulty.scrap).floor() as i64;

        if dice.chance(elite_chance) {
            let affix = Affix::ALL[dice.pick(Affix::ALL.len())];
            promote_to_elite(&mut enemy, affix);
        } else if daily == Some(DailyModifier::BossRush) {
            promote_to_elite(&mut enemy, Affix::Armored);
        }

        assign_weak_point(&mut enemy, dice);
        roster.push(enemy);
    }
    roster
}

/// Build the roster for a campaign stage.
///
/// Boss stages (multiples of 5) get a single scaled boss; other stages get
/// 2 or 3 scaled template picks with elite and weak-point rolls. An empty
/// template table yields an empty roster rather than a panic.
pub fn generate_enemies(
    stage: u32,
    difficulty: &DifficultyMultipliers,
    daily: Option<DailyModifier>,
    templates: &[EnemyTemplate],
    bosses: &[BossTemplate],
    dice: &mut impl Dice,
) -> Vec<Enemy> {
    if stage >= BOSS_STAGE_INTERVAL && stage % BOSS_STAGE_INTERVAL == 0 {
        if bosses.is_empty() {
            return Vec::new();
        }
        let template = &bosses[dice.pick(bosses.len())];
        // Repeat boss cycles get tougher: +10% HP per stage past the first
        // boss stage.
        let hp_scale = 1.0 + 0.1 * f64::from(stage - BOSS_STAGE_INTERVAL);
        return vec![spawn_boss(template, hp_scale, difficulty)];
    }

    if templates.is_empty() {
        return Vec::new();
    }
    let count = dice.range_i32(2, 3) as usize;
    let hp_scale = 1.0 + f64::from(stage.saturating_sub(1)) * 0.2;
    let damage_scale = 1.0 + f64::from(stage.saturating_sub(1)) * 0.15;
    spawn_regulars(
        count,
        hp_scale,
        damage_scale,
        ELITE_CHANCE,
        difficulty,
        daily,
        templates,
        dice,
    )
}

/// Scale one enemy for a survival wave. Wave 0 is the identity transform.
pub fn apply_survival_scaling(enemy: &mut Enemy, wave: u32) {
    if wave == 0 {
        return;
    }
    let hp_scale = 1.0 + 0.1 * f64::from(wave);
    let damage_scale = 1.0 + 0.05 * f64::from(wave);
    enemy.max_hp = (enemy.max_hp * hp_scale).floor();
    enemy.current_hp = enemy.max_hp;
    enemy.damage = (enemy.damage * damage_scale).floor();
}

pub const ENDLESS_MAX_COUNT: usize = 6;
pub const ENDLESS_MAX_ELITE_CHANCE: f64 = 0.60;

/// Build the roster for one endless-mode wave. Every `boss_interval` waves a
/// scaled boss spawns; otherwise the pack grows with the wave number, capped,
/// with an elite chance that climbs alongside it.
pub fn generate_endless_wave_enemies(
    wave: u32,
    boss_interval: u32,
    difficulty: &DifficultyMultipliers,
    templates: &[EnemyTemplate],
    bosses: &[BossTemplate],
    dice: &mut impl Dice,
) -> Vec<Enemy> {
    let interval = boss_interval.max(1);
    if wave > 0 && wave % interval == 0 && !bosses.is_empty() {
        let template = &bosses[dice.pick(bosses.len())];
        let hp_scale = 1.0 + 0.08 * f64::from(wave);
        let mut boss = spawn_boss(template, hp_scale, difficulty);
        boss.damage = (boss.damage * (1.0 + 0.04 * f64::from(wave))).floor().max(1.0);
        return vec![boss];
    }

    if templates.is_empty() {
        return Vec::new();
    }
    let count = ((2 + wave / 3) as usize).min(ENDLESS_MAX_COUNT);
    let elite_chance = (ELITE_CHANCE + 0.03 * f64::from(wave)).min(ENDLESS_MAX_ELITE_CHANCE);
    let hp_scale = 1.0 + 0.1 * f64::from(wave);
    let damage_scale = 1.0 + 0.05 * f64::from(wave);
    spawn_regulars(
        count,
        hp_scale,
        damage_scale,
        elite_chance,
        difficulty,
        None,
        templates,
        dice,
    )
}
