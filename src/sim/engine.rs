//! Fixed-timestep combat engine. One instance per fight; owns the whole
//! combat state, advances it in 100 ms logic ticks, and hands out snapshots
//! and a final replay record.

use std::fmt;
use std::sync::Arc;

use crate::combat::ai::{
    calculate_defense_target, resolve_enemy_action, swift_dodge, ActionContext, DefenseTarget,
};
use crate::combat::boss::{check_boss_phase_transition, execute_boss_ability, BossAbilityKind};
use crate::combat::damage::{
    apply_consumable_effect, calculate_ability_result, calculate_damage, calculate_max_hp,
    AbilityError, ConsumableKind, HEAT_JAM_THRESHOLD, MAX_ENERGY,
};
use crate::combat::enemy::{Enemy, EnemyIntent};
use crate::combat::generator::{
    apply_survival_scaling, generate_enemies, DailyModifier, DifficultyMultipliers,
    BOSS_STAGE_INTERVAL,
};
use crate::combat::log::{CombatLogEntry, LogCategory};
use crate::combat::replay::{
    Actor, CombatAction, CombatOutcome, CombatReplay, FinalStats,
};
use crate::combat::rng::{Dice, Rng};
use crate::combat::status::{has_status, process_status_effects, ActiveStatus, StatusKind};
use crate::combat::synergy::{active_synergies, ComboTracker};
use crate::data::pilot::{ModuleKind, PilotConfig, ResourceKind};
use crate::data::registry::GameData;
use crate::data::run_state::RunState;
use crate::sim::schedule::{EventQueue, ScheduledEventKind};
use crate::sim::snapshot::CombatSnapshot;
use crate::sim::state::{CombatState, Hazard, Mission, MissionState, PlayerState};

pub const TICK_MS: f64 = 100.0;
pub const MAX_TICKS_PER_FRAME: u32 = 10;

/// Gauge points gained per second per point of speed, both sides.
const CHARGE_RATE: f64 = 2.0;
const MAX_CHARGE: f64 = 100.0;
/// Telegraph wind-up before a boss special resolves.
const TELEGRAPH_MS: f64 = 800.0;
const BOSS_SPECIAL_CHANCE: f64 = 0.5;
/// A SHIELDED status halves incoming hits.
const SHIELD_ABSORB: f64 = 0.5;
/// A jam clears once heat decays to half the jam threshold.
const JAM_CLEAR_HEAT: f64 = HEAT_JAM_THRESHOLD * 0.5;
const ABILITY_STUN_MS: f64 = 2000.0;
const COMBO_WINDOW_TICKS: u64 = 30;
const MAX_ROSTER: usize = 8;

const SEISMIC_DEBRIS_CHANCE: f64 = 0.01;
const SEISMIC_DEBRIS_DAMAGE: f64 = 3.0;
const THERMAL_VENT_HEAT_PER_SEC: f64 = 6.0;
const ION_STORM_DRAIN_PER_SEC: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    UnknownPilot(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPilot(id) => write!(f, "unknown pilot id: {id}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Everything needed to start one combat.
#[derive(Debug, Clone)]
pub struct CombatConfig {
    pub pilot_id: String,
    pub module: ModuleKind,
    pub stage: u32,
    pub difficulty: DifficultyMultipliers,
    pub difficulty_name: String,
    pub mission: Mission,
    pub hazard: Option<Hazard>,
    pub daily: Option<DailyModifier>,
    pub seed: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            pilot_id: "vanguard".to_string(),
            module: ModuleKind::Balanced,
            stage: 1,
            difficulty: DifficultyMultipliers::default(),
            difficulty_name: "normal".to_string(),
            mission: Mission::Standard,
            hazard: None,
            daily: None,
            seed: 0,
        }
    }
}

#[derive(Debug)]
pub struct CombatEngine {
    data: Arc<GameData>,
    pilot: PilotConfig,
    config: CombatConfig,
    run: RunState,
    state: CombatState,
    dice: Rng,
    queue: EventQueue,
    accumulator: f64,
}

impl CombatEngine {
    pub fn new(
        data: Arc<GameData>,
        config: CombatConfig,
        run: RunState,
    ) -> Result<Self, EngineError> {
        let pilot = data
            .pilot(&config.pilot_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownPilot(config.pilot_id.clone()))?;

        let mut dice = Rng::new(config.seed);
        let max_hp = f64::from(calculate_max_hp(&pilot, config.module, &run));
        let starting_energy = match pilot.archetype.profile().resource {
            ResourceKind::Energy => MAX_ENERGY,
            ResourceKind::Heat => 0.0,
        };
        let player = PlayerState::new(
            max_hp,
            f64::from(run.current_hp),
            pilot.base_speed,
            starting_energy,
        );

        let enemies = generate_enemies(
            config.stage,
            &config.difficulty,
            config.daily,
            &data.enemy_templates,
            &data.boss_templates,
            &mut dice,
        );

        let mission = match config.mission {
            Mission::Standard => MissionState::default(),
            Mission::Defense { core_max_hp } => MissionState {
                core_hp: Some(core_max_hp),
                core_max_hp: Some(core_max_hp),
                ..MissionState::default()
            },
            Mission::Survival {
                duration_ms,
                wave_interval_ms,
            } => MissionState {
                time_remaining_ms: Some(duration_ms),
                wave_timer_ms: wave_interval_ms,
                ..MissionState::default()
            },
        };

        let synergies = active_synergies(&run.augmentations);
        let mut state = CombatState {
            tick: 0,
            elapsed_ms: 0.0,
            player,
            enemies,
            mission,
            combo: ComboTracker::new(COMBO_WINDOW_TICKS),
            synergies,
            log: Vec::new(),
            actions: Vec::new(),
            turn: 0,
            stats: FinalStats::default(),
            outcome: None,
        };
        state.log.push(CombatLogEntry::new(
            0,
            LogCategory::System,
            format!(
                "{} deploys to stage {} ({} hostiles)",
                pilot.name,
                config.stage,
                state.enemies.len()
            ),
        ));
        for enemy in &state.enemies {
            let opener = enemy
                .boss
                .as_ref()
                .and_then(|b| data.boss_template(&b.template_id))
                .and_then(|t| t.dialogue.first());
            if let Some(line) = opener {
                state.log.push(CombatLogEntry::new(
                    0,
                    LogCategory::Boss,
                    format!("{}: \"{line}\"", enemy.name),
                ));
            }
        }

        Ok(Self {
            data,
            pilot,
            config,
            run,
            state,
            dice,
            queue: EventQueue::default(),
            accumulator: 0.0,
        })
    }

    /// Feed elapsed real time into the accumulator and run whole logic ticks.
    /// At most [MAX_TICKS_PER_FRAME] ticks run per call; any backlog beyond
    /// that is discarded, not deferred.
    pub fn advance(&mut self, elapsed_ms: f64) {
        self.accumulator += elapsed_ms.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= TICK_MS && ticks < MAX_TICKS_PER_FRAME {
            self.tick();
            self.accumulator -= TICK_MS;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= TICK_MS {
            self.accumulator = 0.0;
        }
    }

    /// One logic tick. No-op once the fight is over.
    pub fn tick(&mut self) {
        if self.state.is_over() {
            return;
        }
        self.state.tick += 1;
        self.state.elapsed_ms += TICK_MS;

        self.mission_tick();
        self.cooldown_tick();
        self.player_status_tick();
        self.regen_tick();
        self.hazard_tick();
        self.player_charge_tick();
        self.scheduled_events_tick();
        self.enemy_tick();
        self.check_termination();
    }

    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot::capture(&self.state)
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.state.outcome
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn pilot(&self) -> &PilotConfig {
        &self.pilot
    }

    /// Consume the engine into the immutable replay record. An unfinished
    /// fight (torn-down view, headless tick cap) counts as a defeat.
    pub fn finish(self) -> CombatReplay {
        let outcome = self.state.outcome.unwrap_or(CombatOutcome::Defeat);
        let mut stats = self.state.stats;
        stats.ticks = self.state.tick;
        CombatReplay::new(
            self.pilot.id,
            self.config.module,
            self.config.stage,
            self.config.difficulty_name,
            self.state.elapsed_ms,
            self.state.actions,
            outcome,
            stats,
        )
    }

    /// Player ability use. Executes synchronously between ticks; validation
    /// failures leave all state untouched and surface as a warning line.
    pub fn use_ability(&mut self, ability_id: &str, target_index: usize) -> Result<(), AbilityError> {
        if self.state.is_over() {
            return Err(AbilityError::OnCooldown);
        }
        let Some(ability) = self
            .pilot
            .abilities
            .iter()
            .find(|a| a.id == ability_id)
            .cloned()
        else {
            // Unknown id is a caller bug; skip rather than corrupt the tick.
            self.warn(format!("unknown ability id: {ability_id}"));
            return Err(AbilityError::UnknownAbility);
        };

        if self
            .state
            .player
            .cooldowns
            .get(ability_id)
            .is_some_and(|ms| *ms > 0.0)
        {
            self.warn(format!("{} is still on cooldown", ability.name));
            return Err(AbilityError::OnCooldown);
        }
        if self.state.player.charge < MAX_CHARGE {
            self.warn(format!("{} needs a full gauge", ability.name));
            return Err(AbilityError::NotCharged);
        }

        let base_damage = calculate_damage(
            &self.pilot,
            self.config.module,
            &self.state.player.statuses,
            &self.run,
            self.state.player.heat,
            &self.state.synergies,
        );
        let result = calculate_ability_result(
            &self.pilot,
            &ability,
            base_damage,
            self.state.player.energy,
            self.state.player.heat,
            self.state.player.jammed,
            self.state.player.burrowed,
            target_index,
            &self.state.enemies,
            &mut self.dice,
        );
        if let Some(error) = result.error {
            self.warn(result.log);
            return Err(error);
        }

        let player = &mut self.state.player;
        player.energy = result.energy_after;
        player.heat = result.heat_after;
        player.jammed = result.jammed_after;
        if result.exits_stealth {
            player.burrowed = false;
        }
        if result.enters_stealth {
            player.burrowed = true;
        }
        if result.self_shield_ms > 0.0 {
            player.statuses.push(ActiveStatus::shield(result.self_shield_ms));
        }
        player.cooldowns.insert(ability.id.clone(), ability.cooldown_ms);
        player.charge = 0.0;

        let combo_mult = self.state.combo.multiplier();
        let mut total_damage = 0i64;
        let mut landed = false;
        for hit in &result.targets {
            if hit.index >= self.state.enemies.len() {
                continue;
            }
            if self.state.enemies[hit.index].evade_ms > 0.0 {
                let name = self.state.enemies[hit.index].name.clone();
                self.push_log(LogCategory::Player, format!("{name} phases through the hit"));
                continue;
            }
            if swift_dodge(&self.state.enemies[hit.index], &mut self.dice) {
                let name = self.state.enemies[hit.index].name.clone();
                self.push_log(LogCategory::Player, format!("{name} darts aside"));
                continue;
            }
            let mut damage = (f64::from(hit.damage) * combo_mult).floor().max(1.0);
            if has_status(&self.state.enemies[hit.index].statuses, StatusKind::Shielded) {
                damage = (damage * SHIELD_ABSORB).floor().max(1.0);
            }
            self.state.enemies[hit.index].take_damage(damage);
            total_damage += damage as i64;
            landed = true;
            if result.applies_stun {
                self.apply_status_to_enemy(hit.index, ActiveStatus::stun(ABILITY_STUN_MS));
            }
            if !self.state.enemies[hit.index].is_alive() {
                self.on_enemy_killed(hit.index);
            }
        }

        if landed {
            self.state.combo.register_hit(self.state.tick);
        }
        if result.critical {
            self.state.stats.crits += 1;
        }
        self.state.stats.damage_dealt += total_damage;
        self.push_log(LogCategory::Player, result.log.clone());
        self.record_action(
            Actor::Player,
            "ability",
            result.log,
            (total_damage > 0).then_some(total_damage as i32),
            Some(result.critical),
            None,
        );
        self.check_termination();
        Ok(())
    }

    /// Consumable use. Returns false when the run has no charges left.
    pub fn use_consumable(&mut self, kind: ConsumableKind) -> bool {
        if self.state.is_over() {
            return false;
        }
        if !self.run.spend_consumable(kind) {
            self.warn(format!("no {} charges left", kind.id()));
            return false;
        }

        let effect =
            apply_consumable_effect(kind, self.state.player.current_hp, self.state.player.max_hp);
        let healing = effect.new_hp - self.state.player.current_hp;
        self.state.player.current_hp = effect.new_hp;
        if let Some(status) = effect.applies_status {
            self.state.player.statuses.push(status);
        }
        if effect.clears_heat {
            self.state.player.heat = 0.0;
            self.state.player.jammed = false;
        }
        if effect.damage_all > 0.0 || effect.stuns_all_ms > 0.0 {
            for index in 0..self.state.enemies.len() {
                if !self.state.enemies[index].is_alive() {
                    continue;
                }
                if effect.damage_all > 0.0 {
                    self.state.enemies[index].take_damage(effect.damage_all);
                    self.state.stats.damage_dealt += effect.damage_all as i64;
                }
                if effect.stuns_all_ms > 0.0 {
                    self.apply_status_to_enemy(index, ActiveStatus::stun(effect.stuns_all_ms));
                }
                if !self.state.enemies[index].is_alive() {
                    self.on_enemy_killed(index);
                }
            }
        }

        self.state.stats.items_used += 1;
        self.push_log(LogCategory::Item, effect.log.clone());
        self.record_action(
            Actor::Player,
            "consumable",
            effect.log,
            None,
            None,
            (healing > 0.0).then_some(healing),
        );
        self.check_termination();
        true
    }

    fn mission_tick(&mut self) {
        if let Mission::Survival {
            wave_interval_ms, ..
        } = self.config.mission
        {
            if let Some(remaining) = self.state.mission.time_remaining_ms.as_mut() {
                *remaining = (*remaining - TICK_MS).max(0.0);
            }
            self.state.mission.wave_timer_ms -= TICK_MS;
            let timed_out = self.state.mission.time_remaining_ms == Some(0.0);
            if self.state.mission.wave_timer_ms <= 0.0 && !timed_out {
                self.state.mission.wave_timer_ms = wave_interval_ms;
                self.state.mission.wave += 1;
                self.spawn_survival_wave();
            }
        }
    }

    fn spawn_survival_wave(&mut self) {
        // Waves are regular packs; the boss-stage rule stays out of survival.
        let stage = if self.config.stage % BOSS_STAGE_INTERVAL == 0 {
            self.config.stage + 1
        } else {
            self.config.stage
        };
        let data = Arc::clone(&self.data);
        let mut spawned = generate_enemies(
            stage,
            &self.config.difficulty,
            self.config.daily,
            &data.enemy_templates,
            &data.boss_templates,
            &mut self.dice,
        );
        let wave = self.state.mission.wave;
        for enemy in &mut spawned {
            apply_survival_scaling(enemy, wave);
            enemy.id = format!("w{wave}_{}", enemy.id);
        }
        let room = MAX_ROSTER.saturating_sub(self.state.alive_enemy_count());
        spawned.truncate(room);
        let count = spawned.len();
        self.state.enemies.extend(spawned);
        if count > 0 {
            self.push_log(
                LogCategory::System,
                format!("Wave {wave} incoming: {count} hostiles"),
            );
        }
    }

    fn cooldown_tick(&mut self) {
        let player = &mut self.state.player;
        player
            .cooldowns
            .retain(|_, remaining| {
                *remaining -= TICK_MS;
                *remaining > 0.0
            });
        player.charge_debuff_ms = (player.charge_debuff_ms - TICK_MS).max(0.0);
    }

    fn player_status_tick(&mut self) {
        let result = process_status_effects(
            &self.state.player.statuses,
            TICK_MS,
            &self.state.synergies,
        );
        self.state.player.statuses = result.statuses;
        if result.damage_taken > 0.0 {
            // Internal damage (burn, overclock strain) bypasses shields.
            self.state.player.current_hp =
                (self.state.player.current_hp - result.damage_taken).max(0.0);
            self.state.stats.damage_taken += result.damage_taken as i64;
        }
    }

    fn regen_tick(&mut self) {
        let dt = TICK_MS / 1000.0;
        let profile = self.pilot.archetype.profile();
        let player = &mut self.state.player;
        match profile.resource {
            ResourceKind::Energy => {
                player.energy = (player.energy + profile.energy_regen_per_sec * dt).min(MAX_ENERGY);
            }
            ResourceKind::Heat => {
                player.heat = (player.heat - profile.heat_decay_per_sec * dt).max(0.0);
                if player.jammed && player.heat <= JAM_CLEAR_HEAT {
                    player.jammed = false;
                    self.push_log(LogCategory::Player, "Weapons back online".to_string());
                }
            }
        }
        if profile.hull_regen_per_sec > 0.0 && self.state.player.is_alive() {
            let player = &mut self.state.player;
            player.current_hp = (player.current_hp + profile.hull_regen_per_sec * dt)
                .min(player.max_hp);
        }
    }

    fn hazard_tick(&mut self) {
        let dt = TICK_MS / 1000.0;
        match self.config.hazard {
            Some(Hazard::ThermalVents) => {
                let player = &mut self.state.player;
                player.heat = (player.heat + THERMAL_VENT_HEAT_PER_SEC * dt)
                    .min(HEAT_JAM_THRESHOLD);
                if self.pilot.archetype.profile().resource == ResourceKind::Heat
                    && self.state.player.heat >= HEAT_JAM_THRESHOLD
                    && !self.state.player.jammed
                {
                    self.state.player.jammed = true;
                    self.push_log(LogCategory::Hazard, "Vent heat jams your weapons".to_string());
                }
            }
            Some(Hazard::IonStorm) => {
                let player = &mut self.state.player;
                player.energy = (player.energy - ION_STORM_DRAIN_PER_SEC * dt).max(0.0);
            }
            Some(Hazard::Seismic) => {
                if self.dice.chance(SEISMIC_DEBRIS_CHANCE) {
                    self.apply_player_damage(SEISMIC_DEBRIS_DAMAGE);
                    self.push_log(LogCategory::Hazard, "Falling debris batters your hull".to_string());
                }
            }
            None => {}
        }
    }

    fn player_charge_tick(&mut self) {
        self.state.combo.decay(self.state.tick);
        if has_status(&self.state.player.statuses, StatusKind::Stunned) {
            return;
        }
        let dt = TICK_MS / 1000.0;
        let mut gain = self.state.player.speed * CHARGE_RATE * dt;
        if self.state.player.charge_debuff_ms > 0.0 {
            gain *= 0.5;
        }
        self.state.player.charge = (self.state.player.charge + gain).min(MAX_CHARGE);
    }

    fn scheduled_events_tick(&mut self) {
        let due = self.queue.drain_due(self.state.elapsed_ms);
        for event in due {
            // Telegraphs re-validate terminal state; stale ones lapse.
            if self.state.is_over() {
                break;
            }
            match event.kind {
                ScheduledEventKind::BossAbility {
                    enemy_index,
                    ability,
                } => self.resolve_boss_ability(enemy_index, ability),
            }
        }
    }

    fn resolve_boss_ability(&mut self, enemy_index: usize, ability: BossAbilityKind) {
        if enemy_index >= self.state.enemies.len()
            || !self.state.enemies[enemy_index].is_alive()
            || !self.state.enemies[enemy_index].is_boss
        {
            return;
        }
        let outcome = execute_boss_ability(ability, &self.state.enemies[enemy_index]);
        let boss_name = self.state.enemies[enemy_index].name.clone();

        if outcome.player_damage > 0.0 {
            self.apply_player_damage(outcome.player_damage);
        }
        if let Some(status) = outcome.player_status {
            self.state.player.statuses.push(status);
        }
        if outcome.summons > 0 {
            self.summon_minions(enemy_index, outcome.summons);
        }
        if outcome.self_heal_fraction > 0.0 {
            let boss = &mut self.state.enemies[enemy_index];
            let amount = boss.max_hp * outcome.self_heal_fraction;
            boss.heal(amount);
        }
        if let Some(status) = outcome.self_status {
            self.apply_status_to_enemy(enemy_index, status);
        }
        if outcome.evade_ms > 0.0 {
            self.state.enemies[enemy_index].evade_ms = outcome.evade_ms;
        }
        if outcome.charge_debuff_ms > 0.0 {
            self.state.player.charge_debuff_ms = outcome.charge_debuff_ms;
        }
        if outcome.energy_drain > 0.0 {
            self.state.player.energy = (self.state.player.energy - outcome.energy_drain).max(0.0);
        }
        if outcome.heat_gain > 0.0 {
            self.state.player.heat += outcome.heat_gain;
            if self.pilot.archetype.profile().resource == ResourceKind::Heat
                && self.state.player.heat >= HEAT_JAM_THRESHOLD
            {
                self.state.player.jammed = true;
            }
        }
        if let Some(boss_state) = self.state.enemies[enemy_index].boss.as_mut() {
            boss_state.last_ability_used = Some(ability);
        }

        let damage = outcome.player_damage;
        self.push_log(LogCategory::Boss, outcome.log.clone());
        self.record_action(
            Actor::Boss,
            "boss_ability",
            format!("{boss_name}: {}", ability.label()),
            (damage > 0.0).then_some(damage as i32),
            None,
            None,
        );
        self.check_termination();
    }

    fn summon_minions(&mut self, boss_index: usize, count: u32) {
        let template_id = match self.state.enemies[boss_index].boss.as_ref() {
            Some(boss_state) => boss_state.template_id.clone(),
            None => return,
        };
        let data = Arc::clone(&self.data);
        let Some(minion) = data
            .boss_template(&template_id)
            .and_then(|t| t.minions_template.as_ref())
        else {
            return;
        };
        let room = MAX_ROSTER.saturating_sub(self.state.alive_enemy_count());
        let spawning = (count as usize).min(room);
        for n in 0..spawning {
            let tick = self.state.tick;
            self.state.enemies.push(Enemy {
                id: format!("{}_minion_{tick}_{n}", minion.id),
                name: minion.name.clone(),
                max_hp: minion.hp,
                current_hp: minion.hp,
                speed: minion.speed,
                damage: minion.damage,
                scrap_value: minion.scrap_value,
                intent: EnemyIntent::Attack,
                is_charged: false,
                action_charge: 0.0,
                statuses: Vec::new(),
                evade_ms: 0.0,
                affix: None,
                weak_point: None,
                is_boss: false,
                boss: None,
            });
        }
        if spawning > 0 {
            self.push_log(
                LogCategory::Boss,
                format!("{spawning} {} join the fight", minion.name),
            );
        }
    }

    fn enemy_tick(&mut self) {
        let dt = TICK_MS / 1000.0;
        for index in 0..self.state.enemies.len() {
            if self.state.is_over() {
                break;
            }
            if !self.state.enemies[index].is_alive() {
                continue;
            }

            {
                let synergies = self.state.synergies;
                let enemy = &mut self.state.enemies[index];
                let result = process_status_effects(&enemy.statuses, TICK_MS, &synergies);
                enemy.statuses = result.statuses;
                if result.damage_taken > 0.0 {
                    enemy.take_damage(result.damage_taken);
                    self.state.stats.damage_dealt += result.damage_taken as i64;
                }
                enemy.evade_ms = (enemy.evade_ms - TICK_MS).max(0.0);
            }
            if !self.state.enemies[index].is_alive() {
                let name = self.state.enemies[index].name.clone();
                self.push_log(LogCategory::Status, format!("{name} burns out"));
                self.on_enemy_killed(index);
                continue;
            }

            if self.state.enemies[index].is_boss {
                self.boss_phase_tick(index);
            }

            if !has_status(&self.state.enemies[index].statuses, StatusKind::Stunned) {
                let enemy = &mut self.state.enemies[index];
                enemy.action_charge =
                    (enemy.action_charge + enemy.speed * CHARGE_RATE * dt).min(MAX_CHARGE);
            }
            if self.state.enemies[index].action_charge >= MAX_CHARGE {
                self.state.enemies[index].action_charge = 0.0;
                self.enemy_act(index);
            }
        }
    }

    fn boss_phase_tick(&mut self, index: usize) {
        let data = Arc::clone(&self.data);
        let Some(boss_state) = self.state.enemies[index].boss.clone() else {
            return;
        };
        let Some(template) = data.boss_template(&boss_state.template_id) else {
            // Boss-flagged enemy without a template acts as a regular enemy.
            return;
        };
        let hp_fraction = self.state.enemies[index].hp_fraction();
        let Some(phase_index) = check_boss_phase_transition(hp_fraction, template, &boss_state)
        else {
            return;
        };
        let phase = &template.phases[phase_index];

        {
            let enemy = &mut self.state.enemies[index];
            enemy.damage = (template.damage
                * phase.damage_multiplier.unwrap_or(1.0)
                * self.config.difficulty.damage)
                .floor()
                .max(1.0);
            enemy.speed = template.speed * phase.speed_multiplier.unwrap_or(1.0);
            if let Some(boss) = enemy.boss.as_mut() {
                boss.current_phase_index = phase_index;
                boss.phases_triggered.insert(phase_index);
            }
        }

        let name = self.state.enemies[index].name.clone();
        let line = match &phase.dialogue {
            Some(dialogue) => format!("{name}: \"{dialogue}\""),
            None => format!("{name} shifts its stance"),
        };
        self.push_log(LogCategory::Boss, line);
    }

    fn enemy_act(&mut self, index: usize) {
        if self.state.enemies[index].is_boss {
            let data = Arc::clone(&self.data);
            let abilities: Vec<BossAbilityKind> = self.state.enemies[index]
                .boss
                .as_ref()
                .and_then(|b| {
                    data.boss_template(&b.template_id)
                        .and_then(|t| t.phases.get(b.current_phase_index))
                        .map(|p| p.abilities.clone())
                })
                .unwrap_or_default();
            if !abilities.is_empty() && self.dice.chance(BOSS_SPECIAL_CHANCE) {
                let ability = abilities[self.dice.pick(abilities.len())];
                self.queue.schedule(
                    self.state.elapsed_ms + TELEGRAPH_MS,
                    ScheduledEventKind::BossAbility {
                        enemy_index: index,
                        ability,
                    },
                );
                let name = self.state.enemies[index].name.clone();
                self.push_log(
                    LogCategory::Boss,
                    format!("{name} charges up: {}", ability.label()),
                );
                return;
            }
        }

        let target = match self.config.mission {
            Mission::Defense { .. } => {
                let player_fraction = self.state.player.hp_fraction();
                let core_fraction = match (self.state.mission.core_hp, self.state.mission.core_max_hp)
                {
                    (Some(hp), Some(max)) if max > 0.0 => hp / max,
                    _ => 1.0,
                };
                calculate_defense_target(
                    &self.state.enemies[index],
                    player_fraction,
                    core_fraction,
                    &mut self.dice,
                )
            }
            _ => DefenseTarget::Player,
        };

        let ctx = ActionContext::from_synergies(
            &self.state.synergies,
            self.state.player.burrowed,
            self.config.hazard == Some(Hazard::Seismic),
        );
        let result = resolve_enemy_action(&mut self.state.enemies[index], ctx, &mut self.dice);

        if result.damage_to_player > 0.0 {
            match target {
                DefenseTarget::Player => self.apply_player_damage(result.damage_to_player),
                DefenseTarget::Core => {
                    if let Some(core_hp) = self.state.mission.core_hp.as_mut() {
                        *core_hp = (*core_hp - result.damage_to_player).max(0.0);
                    }
                }
            }
        }

        let actor = if self.state.enemies[index].is_boss {
            Actor::Boss
        } else {
            Actor::Enemy
        };
        self.push_log(LogCategory::Enemy, result.log.clone());
        let action_type = if result.healed > 0.0 {
            "enemy_heal"
        } else if result.began_charging {
            "enemy_charge"
        } else {
            "enemy_attack"
        };
        self.record_action(
            actor,
            action_type,
            result.log,
            (result.damage_to_player > 0.0).then_some(result.damage_to_player as i32),
            Some(result.critical),
            (result.healed > 0.0).then_some(result.healed),
        );
    }

    fn apply_player_damage(&mut self, amount: f64) {
        let mut damage = amount;
        if has_status(&self.state.player.statuses, StatusKind::Shielded) {
            damage *= SHIELD_ABSORB;
        }
        self.state.player.current_hp = (self.state.player.current_hp - damage).max(0.0);
        self.state.stats.damage_taken += damage as i64;
    }

    fn apply_status_to_enemy(&mut self, index: usize, status: ActiveStatus) {
        if let Some(boss_state) = self.state.enemies[index].boss.as_ref() {
            let data = Arc::clone(&self.data);
            let immune = data
                .boss_template(&boss_state.template_id)
                .and_then(|t| t.phases.get(boss_state.current_phase_index))
                .is_some_and(|p| p.status_immunities.contains(&status.kind));
            if immune {
                let name = self.state.enemies[index].name.clone();
                self.push_log(
                    LogCategory::Status,
                    format!("{name} shrugs off {}", status.kind.as_str()),
                );
                return;
            }
        }
        self.state.enemies[index].statuses.push(status);
    }

    fn on_enemy_killed(&mut self, index: usize) {
        let (name, scrap) = {
            let enemy = &self.state.enemies[index];
            (enemy.name.clone(), enemy.scrap_value)
        };
        self.state.stats.kills += 1;
        self.state.stats.scrap_earned += scrap;
        self.run.scrap += scrap;
        self.push_log(LogCategory::Player, format!("{name} destroyed (+{scrap} scrap)"));
    }

    fn check_termination(&mut self) {
        if self.state.is_over() {
            return;
        }
        if !self.state.player.is_alive() {
            self.set_outcome(CombatOutcome::Defeat, "Hull breached. Mission failed");
            return;
        }
        if self.state.mission.core_hp == Some(0.0) {
            self.set_outcome(CombatOutcome::Defeat, "The core is destroyed");
            return;
        }
        match self.config.mission {
            Mission::Survival { .. } => {
                if self.state.mission.time_remaining_ms == Some(0.0) {
                    self.set_outcome(CombatOutcome::Victory, "You held the line");
                }
            }
            _ => {
                if self.state.alive_enemy_count() == 0 {
                    self.set_outcome(CombatOutcome::Victory, "All hostiles destroyed");
                }
            }
        }
    }

    fn set_outcome(&mut self, outcome: CombatOutcome, message: &str) {
        self.state.outcome = Some(outcome);
        self.state.stats.ticks = self.state.tick;
        self.run.current_hp = (self.state.player.current_hp as i32).max(1);
        self.push_log(LogCategory::System, message.to_string());
        self.record_action(Actor::System, "combat_end", message.to_string(), None, None, None);
    }

    fn warn(&mut self, message: String) {
        self.push_log(LogCategory::Warning, message);
    }

    fn push_log(&mut self, category: LogCategory, message: String) {
        self.state
            .log
            .push(CombatLogEntry::new(self.state.tick, category, message));
    }

    fn record_action(
        &mut self,
        actor: Actor,
        action_type: &str,
        result: String,
        damage: Option<i32>,
        is_critical: Option<bool>,
        healing: Option<f64>,
    ) {
        self.state.turn += 1;
        let action = CombatAction {
            turn: self.state.turn,
            timestamp_ms: self.state.elapsed_ms,
            actor,
            action_type: action_type.to_string(),
            result,
            player_hp: self.state.player.current_hp,
            player_max_hp: self.state.player.max_hp,
            enemy_count: self.state.alive_enemy_count(),
            damage,
            is_critical,
            healing,
        };
        self.state.actions.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_seed(seed: u64) -> CombatEngine {
        let config = CombatConfig {
            seed,
            ..CombatConfig::default()
        };
        CombatEngine::new(GameData::builtin(), config, RunState::new(150))
            .expect("builtin pilot exists")
    }

    #[test]
    fn unknown_pilot_is_a_typed_error() {
        let config = CombatConfig {
            pilot_id: "missing".to_string(),
            ..CombatConfig::default()
        };
        let err = CombatEngine::new(GameData::builtin(), config, RunState::default())
            .expect_err("should fail");
        assert_eq!(err, EngineError::UnknownPilot("missing".to_string()));
    }

    #[test]
    fn advance_caps_ticks_per_frame_and_discards_backlog() {
        let mut engine = engine_with_seed(1);
        engine.advance(10_000.0);
        assert_eq!(engine.state().tick, u64::from(MAX_TICKS_PER_FRAME));
        assert_eq!(engine.accumulator, 0.0);
    }

    #[test]
    fn advance_banks_partial_ticks() {
        let mut engine = engine_with_seed(1);
        engine.advance(50.0);
        assert_eq!(engine.state().tick, 0);
        engine.advance(50.0);
        assert_eq!(engine.state().tick, 1);
    }

    #[test]
    fn ability_requires_a_full_gauge() {
        let mut engine = engine_with_seed(2);
        let err = engine.use_ability("kinetic_slam", 0).expect_err("gauge empty");
        assert_eq!(err, AbilityError::NotCharged);
    }

    #[test]
    fn unknown_ability_id_is_rejected_without_side_effects() {
        let mut engine = engine_with_seed(2);
        engine.state.player.charge = MAX_CHARGE;
        let err = engine.use_ability("plasma_lance", 0).expect_err("no such ability");
        assert_eq!(err, AbilityError::UnknownAbility);
        assert_eq!(engine.state().player.charge, MAX_CHARGE);
        assert!(engine.state().player.cooldowns.is_empty());
    }

    #[test]
    fn full_gauge_ability_damages_a_target_and_resets_the_gauge() {
        let mut engine = engine_with_seed(3);
        engine.state.player.charge = MAX_CHARGE;
        // Pin the outcome: no elite dodge rolls in this scenario.
        for enemy in &mut engine.state.enemies {
            enemy.affix = None;
        }
        let target = engine.state().first_alive_enemy().expect("roster");
        let hp_before = engine.state().enemies[target].current_hp;
        engine.use_ability("kinetic_slam", target).expect("cast");
        assert!(engine.state().enemies[target].current_hp < hp_before);
        assert_eq!(engine.state().player.charge, 0.0);
        assert!(engine.state().player.cooldowns.contains_key("kinetic_slam"));
        assert!(engine.state().stats.damage_dealt > 0);
    }

    #[test]
    fn failed_cast_spends_nothing() {
        let mut engine = engine_with_seed(4);
        engine.state.player.charge = MAX_CHARGE;
        engine.state.player.energy = 0.0;
        let err = engine.use_ability("arc_burst", 0).expect_err("no energy");
        assert_eq!(err, AbilityError::LowEnergy);
        assert_eq!(engine.state().player.energy, 0.0);
        assert_eq!(engine.state().player.charge, MAX_CHARGE);
        assert!(!engine.state().player.cooldowns.contains_key("arc_burst"));
    }

    #[test]
    fn game_over_flag_stops_future_ticks() {
        let mut engine = engine_with_seed(5);
        engine.state.player.current_hp = 0.0;
        engine.tick();
        assert_eq!(engine.outcome(), Some(CombatOutcome::Defeat));
        let tick_at_end = engine.state().tick;
        engine.tick();
        engine.tick();
        assert_eq!(engine.state().tick, tick_at_end);
    }

    #[test]
    fn nano_stim_heals_and_spends_a_charge() {
        let mut engine = engine_with_seed(6);
        engine.run.grant_consumable(ConsumableKind::NanoStim, 1, 3);
        engine.state.player.current_hp = 50.0;
        assert!(engine.use_consumable(ConsumableKind::NanoStim));
        assert_eq!(engine.state().player.current_hp, 100.0);
        assert!(!engine.use_consumable(ConsumableKind::NanoStim));
        assert_eq!(engine.state().stats.items_used, 1);
    }

    #[test]
    fn survival_waves_spawn_on_the_interval() {
        let config = CombatConfig {
            mission: Mission::Survival {
                duration_ms: 10_000.0,
                wave_interval_ms: 1000.0,
            },
            seed: 7,
            ..CombatConfig::default()
        };
        let mut engine =
            CombatEngine::new(GameData::builtin(), config, RunState::new(150)).expect("engine");
        let initial = engine.state().enemies.len();
        for _ in 0..10 {
            engine.tick();
        }
        assert!(engine.state().mission.wave >= 1);
        assert!(engine.state().enemies.len() > initial || engine.state().alive_enemy_count() == MAX_ROSTER);
    }

    #[test]
    fn survival_timeout_is_a_victory() {
        let config = CombatConfig {
            mission: Mission::Survival {
                duration_ms: 500.0,
                wave_interval_ms: 100_000.0,
            },
            seed: 8,
            ..CombatConfig::default()
        };
        let mut engine =
            CombatEngine::new(GameData::builtin(), config, RunState::new(1500)).expect("engine");
        for _ in 0..20 {
            engine.tick();
        }
        assert_eq!(engine.outcome(), Some(CombatOutcome::Victory));
    }

    #[test]
    fn core_destruction_is_a_defeat() {
        let config = CombatConfig {
            mission: Mission::Defense { core_max_hp: 50.0 },
            seed: 9,
            ..CombatConfig::default()
        };
        let mut engine =
            CombatEngine::new(GameData::builtin(), config, RunState::new(150)).expect("engine");
        engine.state.mission.core_hp = Some(0.0);
        engine.tick();
        assert_eq!(engine.outcome(), Some(CombatOutcome::Defeat));
    }

    #[test]
    fn telegraphs_lapse_once_the_fight_is_over() {
        let mut engine = engine_with_seed(10);
        engine.queue.schedule(
            0.0,
            ScheduledEventKind::BossAbility {
                enemy_index: 0,
                ability: BossAbilityKind::AoeLaserBarrage,
            },
        );
        engine.state.player.current_hp = 0.0;
        engine.check_termination();
        engine.scheduled_events_tick();
        assert!(engine.queue.is_empty());
        assert!(engine.state.actions.iter().all(|a| a.actor != Actor::Boss));
    }

    #[test]
    fn a_dead_boss_forfeits_its_telegraphed_ability() {
        let config = CombatConfig {
            stage: 5,
            seed: 11,
            ..CombatConfig::default()
        };
        let mut engine =
            CombatEngine::new(GameData::builtin(), config, RunState::new(150)).expect("engine");
        // A straggler keeps the fight alive after the boss drops.
        engine.state.enemies.push(Enemy {
            id: "scrap_drone_9".to_string(),
            name: "Scrap Drone".to_string(),
            max_hp: 30.0,
            current_hp: 30.0,
            speed: 8.0,
            damage: 4.0,
            scrap_value: 10,
            intent: EnemyIntent::Attack,
            is_charged: false,
            action_charge: 0.0,
            statuses: Vec::new(),
            evade_ms: 0.0,
            affix: None,
            weak_point: None,
            is_boss: false,
            boss: None,
        });
        engine.queue.schedule(
            0.0,
            ScheduledEventKind::BossAbility {
                enemy_index: 0,
                ability: BossAbilityKind::AoeLaserBarrage,
            },
        );
        engine.state.enemies[0].current_hp = 0.0;
        let hp_before = engine.state.player.current_hp;
        engine.scheduled_events_tick();
        assert!(engine.queue.is_empty());
        assert_eq!(engine.state.player.current_hp, hp_before);
        assert!(engine.state.actions.iter().all(|a| a.actor != Actor::Boss));
        assert!(!engine.state.is_over());
    }

    #[test]
    fn gravity_well_halves_gauge_accrual() {
        let mut engine = engine_with_seed(12);
        engine.state.player.charge = 0.0;
        engine.player_charge_tick();
        let normal_gain = engine.state.player.charge;
        assert!(normal_gain > 0.0);

        engine.state.player.charge = 0.0;
        engine.state.player.charge_debuff_ms = crate::combat::boss::GRAVITY_WELL_MS;
        engine.player_charge_tick();
        assert!((engine.state.player.charge - normal_gain * 0.5).abs() < 1e-9);
    }
}
