//! Resource and damage model contract tests: purity, floors, resource
//! validation, and the multiplier stack.

use std::collections::BTreeSet;

use scrapfall::combat::damage::{
    apply_consumable_effect, calculate_ability_result, calculate_damage, calculate_max_hp,
    AbilityError, ConsumableKind,
};
use scrapfall::combat::enemy::{Enemy, EnemyIntent, WeakPoint};
use scrapfall::combat::rng::ScriptedDice;
use scrapfall::combat::status::ActiveStatus;
use scrapfall::combat::synergy::{active_synergies, SynergySet};
use scrapfall::data::pilot::{builtin_pilots, AbilityTag, ModuleKind, PilotConfig};
use scrapfall::data::run_state::RunState;

fn pilot(id: &str) -> PilotConfig {
    builtin_pilots()
        .into_iter()
        .find(|p| p.id == id)
        .expect("builtin pilot")
}

fn target(hp: f64) -> Enemy {
    Enemy {
        id: "target".to_string(),
        name: "Training Dummy".to_string(),
        max_hp: hp,
        current_hp: hp,
        speed: 8.0,
        damage: 5.0,
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
    }
}

#[test]
fn max_hp_and_damage_are_pure() {
    let vanguard = pilot("vanguard");
    let run = RunState::new(150);
    let synergies = SynergySet::default();
    for _ in 0..2 {
        assert_eq!(
            calculate_max_hp(&vanguard, ModuleKind::Defense, &run),
            calculate_max_hp(&vanguard, ModuleKind::Defense, &run)
        );
        assert_eq!(
            calculate_damage(&vanguard, ModuleKind::Defense, &[], &run, 0.0, &synergies),
            calculate_damage(&vanguard, ModuleKind::Defense, &[], &run, 0.0, &synergies)
        );
    }
}

#[test]
fn vanguard_assault_max_hp_is_130() {
    let vanguard = pilot("vanguard");
    let run = RunState::new(150);
    assert_eq!(calculate_max_hp(&vanguard, ModuleKind::Assault, &run), 130);
}

#[test]
fn upgrades_raise_max_hp_and_damage() {
    let vanguard = pilot("vanguard");
    let mut run = RunState::new(150);
    run.max_hp_upgrade = 50;
    run.damage_upgrade = 5;
    assert_eq!(calculate_max_hp(&vanguard, ModuleKind::Assault, &run), 180);
    assert_eq!(
        calculate_damage(
            &vanguard,
            ModuleKind::Assault,
            &[],
            &run,
            0.0,
            &SynergySet::default()
        ),
        20
    );
}

#[test]
fn damage_never_drops_below_one() {
    let vanguard = pilot("vanguard");
    let mut run = RunState::new(150);
    run.damage_upgrade = -1000;
    let damage = calculate_damage(
        &vanguard,
        ModuleKind::Defense,
        &[],
        &run,
        0.0,
        &SynergySet::default(),
    );
    assert_eq!(damage, 1);
}

#[test]
fn overdrive_and_inferno_multiply_damage() {
    let vanguard = pilot("vanguard");
    let run = RunState::new(150);
    let statuses = vec![ActiveStatus::overdrive(3000.0, 0.0)];
    let augments: BTreeSet<String> = ["thermal_core", "thermal_lattice"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let synergies = active_synergies(&augments);
    assert!(synergies.inferno);
    // 12 * 1.5 overdrive * 1.5 inferno = 27
    let damage = calculate_damage(
        &vanguard,
        ModuleKind::Balanced,
        &statuses,
        &run,
        0.0,
        &synergies,
    );
    assert_eq!(damage, 27);
}

#[test]
fn thermal_conversion_adds_stored_heat() {
    let cinder = pilot("cinder");
    let run = RunState::new(130);
    let augments: BTreeSet<String> = ["thermal_conv".to_string()].into_iter().collect();
    let synergies = active_synergies(&augments);
    let cold = calculate_damage(&cinder, ModuleKind::Balanced, &[], &run, 0.0, &synergies);
    let hot = calculate_damage(&cinder, ModuleKind::Balanced, &[], &run, 47.0, &synergies);
    assert_eq!(hot - cold, 4);
}

#[test]
fn low_energy_cast_consumes_nothing() {
    let vanguard = pilot("vanguard");
    let ability = vanguard
        .abilities
        .iter()
        .find(|a| a.energy_cost > 0.0)
        .expect("costed ability");
    let enemies = vec![target(50.0)];
    let mut dice = ScriptedDice::new(vec![0.5]);
    let result = calculate_ability_result(
        &vanguard, ability, 12, 0.0, 0.0, false, false, 0, &enemies, &mut dice,
    );
    assert_eq!(result.error, Some(AbilityError::LowEnergy));
    assert!(!result.resource_consumed);
    assert_eq!(result.energy_after, 0.0);
    assert_eq!(result.heat_after, 0.0);
    assert!(result.targets.is_empty());
}

#[test]
fn jammed_heat_pilot_cannot_fire() {
    let cinder = pilot("cinder");
    let ability = &cinder.abilities[0];
    let enemies = vec![target(50.0)];
    let mut dice = ScriptedDice::new(vec![0.5]);
    let result = calculate_ability_result(
        &cinder, ability, 14, 0.0, 100.0, true, false, 0, &enemies, &mut dice,
    );
    assert_eq!(result.error, Some(AbilityError::Jammed));
    assert!(!result.resource_consumed);
    assert_eq!(result.heat_after, 100.0);
}

#[test]
fn aoe_ability_hits_every_live_enemy() {
    let vanguard = pilot("vanguard");
    let aoe = vanguard
        .abilities
        .iter()
        .find(|a| a.is_aoe)
        .expect("aoe ability");
    let mut enemies = vec![target(50.0), target(50.0), target(50.0), target(50.0)];
    enemies[2].current_hp = 0.0;
    let mut dice = ScriptedDice::new(vec![0.9]);
    let result = calculate_ability_result(
        &vanguard, aoe, 12, 100.0, 0.0, false, false, 0, &enemies, &mut dice,
    );
    assert!(result.error.is_none());
    assert_eq!(result.targets.len(), 3);
    assert!(result.targets.iter().all(|t| t.index != 2));
}

#[test]
fn scripted_crit_multiplies_by_one_and_a_half() {
    let vanguard = pilot("vanguard");
    let slam = vanguard
        .abilities
        .iter()
        .find(|a| a.id == "kinetic_slam")
        .expect("kinetic_slam");
    let enemies = vec![target(500.0)];

    let mut crit_dice = ScriptedDice::new(vec![0.05]);
    let crit = calculate_ability_result(
        &vanguard, slam, 20, 100.0, 0.0, false, false, 0, &enemies, &mut crit_dice,
    );
    let mut flat_dice = ScriptedDice::new(vec![0.95]);
    let flat = calculate_ability_result(
        &vanguard, slam, 20, 100.0, 0.0, false, false, 0, &enemies, &mut flat_dice,
    );

    assert!(crit.critical);
    assert!(!flat.critical);
    let crit_damage = f64::from(crit.targets[0].damage);
    let flat_damage = f64::from(flat.targets[0].damage);
    assert_eq!(crit_damage, (flat_damage * 1.5).floor());
}

#[test]
fn matching_weak_point_amplifies_the_hit() {
    let vanguard = pilot("vanguard");
    let slam = vanguard
        .abilities
        .iter()
        .find(|a| a.id == "kinetic_slam")
        .expect("kinetic_slam");
    let mut enemies = vec![target(500.0)];
    enemies[0].weak_point = Some(WeakPoint {
        tag: AbilityTag::Kinetic,
        damage_multiplier: 1.4,
        description: "Cracked plating seam".to_string(),
    });
    let mut dice = ScriptedDice::new(vec![0.95]);
    let result = calculate_ability_result(
        &vanguard, slam, 20, 100.0, 0.0, false, false, 0, &enemies, &mut dice,
    );
    assert!(result.weak_point_hit);
    assert!(result.targets[0].weak_point);
}

#[test]
fn spectre_ambush_bursts_and_skips_the_crit_roll() {
    let spectre = pilot("spectre");
    let strike = spectre
        .abilities
        .iter()
        .find(|a| a.damage_mult > 0.0 && !a.enters_stealth)
        .expect("strike");
    let enemies = vec![target(500.0)];
    // A roll this low would crit if the roll were made.
    let mut dice = ScriptedDice::new(vec![0.01]);
    let result = calculate_ability_result(
        &spectre, strike, 13, 100.0, 0.0, false, true, 0, &enemies, &mut dice,
    );
    assert!(result.ambush);
    assert!(result.exits_stealth);
    assert!(!result.critical);
    let expected = (13.0 * strike.damage_mult * 2.5).floor();
    assert_eq!(f64::from(result.targets[0].damage), expected);
}

#[test]
fn stale_target_index_is_a_no_op_hit() {
    let vanguard = pilot("vanguard");
    let slam = &vanguard.abilities[0];
    let enemies = vec![target(50.0)];
    let mut dice = ScriptedDice::new(vec![0.9]);
    let result = calculate_ability_result(
        &vanguard, slam, 12, 100.0, 0.0, false, false, 9, &enemies, &mut dice,
    );
    assert!(result.error.is_none());
    assert!(result.targets.is_empty());
}

#[test]
fn nano_stim_heals_to_the_cap() {
    let effect = apply_consumable_effect(ConsumableKind::NanoStim, 50.0, 100.0);
    assert_eq!(effect.new_hp, 100.0);
    let overheal = apply_consumable_effect(ConsumableKind::NanoStim, 80.0, 100.0);
    assert_eq!(overheal.new_hp, 100.0);
}
