//! Completeness checks for the static data tables. Gaps are reported as
//! diagnostics, never panics; the engine no-ops around bad records, but
//! surfacing them before a run starts saves debugging mid-combat.

use std::collections::HashSet;
use std::fmt;

use crate::combat::boss::BossAbilityKind;
use crate::data::pilot::ResourceKind;
use crate::data::registry::GameData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    fn error(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.push(ValidationSeverity::Error, context, message);
    }

    fn warning(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.push(ValidationSeverity::Warning, context, message);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Validate all loaded tables. Returns every finding; callers decide whether
/// warnings block anything.
pub fn validate_game_data(data: &GameData) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut pilot_ids = HashSet::new();
    for pilot in &data.pilots {
        let ctx = format!("pilot/{}", pilot.id);
        if !pilot_ids.insert(pilot.id.clone()) {
            report.error(&ctx, "duplicate pilot id");
        }
        if pilot.base_hp <= 0 {
            report.error(&ctx, "base_hp must be positive");
        }
        if pilot.base_damage <= 0 {
            report.error(&ctx, "base_damage must be positive");
        }
        if pilot.abilities.is_empty() {
            report.error(&ctx, "pilot has no abilities");
        }
        let resource = pilot.archetype.profile().resource;
        for ability in &pilot.abilities {
            let actx = format!("{ctx}/ability/{}", ability.id);
            if ability.cooldown_ms < 0.0 {
                report.error(&actx, "negative cooldown");
            }
            if ability.damage_mult <= 0.0 && !ability.enters_stealth && ability.self_shield_ms <= 0.0
            {
                report.warning(&actx, "damage ability with non-positive multiplier");
            }
            match resource {
                ResourceKind::Energy if ability.energy_cost <= 0.0 => {
                    report.warning(&actx, "energy pilot ability with no energy cost")
                }
                ResourceKind::Heat if ability.heat_cost <= 0.0 => {
                    report.warning(&actx, "heat pilot ability with no heat cost")
                }
                _ => {}
            }
        }
    }

    let mut template_ids = HashSet::new();
    for template in &data.enemy_templates {
        let ctx = format!("enemy/{}", template.id);
        if !template_ids.insert(template.id.clone()) {
            report.error(&ctx, "duplicate enemy template id");
        }
        if template.hp <= 0.0 {
            report.error(&ctx, "hp must be positive");
        }
        if template.damage <= 0.0 {
            report.error(&ctx, "damage must be positive");
        }
        if template.speed <= 0.0 {
            report.error(&ctx, "speed must be positive");
        }
        if template.scrap_value < 0 {
            report.warning(&ctx, "negative scrap value");
        }
    }

    let mut boss_ids = HashSet::new();
    for boss in &data.boss_templates {
        let ctx = format!("boss/{}", boss.id);
        if !boss_ids.insert(boss.id.clone()) {
            report.error(&ctx, "duplicate boss template id");
        }
        if boss.phases.is_empty() {
            report.error(&ctx, "boss has no phases");
            continue;
        }
        for pair in boss.phases.windows(2) {
            if pair[0].hp_threshold <= pair[1].hp_threshold {
                report.error(&ctx, "phase thresholds must strictly descend");
            }
        }
        let mut summons = false;
        for (index, phase) in boss.phases.iter().enumerate() {
            if phase.abilities.is_empty() {
                report.error(format!("{ctx}/phase/{index}"), "phase has no abilities");
            }
            summons |= phase.abilities.contains(&BossAbilityKind::SummonAdds);
        }
        if summons && boss.minions_template.is_none() {
            report.warning(&ctx, "SUMMON_ADDS phase without a minions template");
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::boss_template::builtin_boss_templates;

    #[test]
    fn builtin_tables_have_no_errors() {
        let data = GameData::builtin();
        let report = validate_game_data(&data);
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
    }

    #[test]
    fn empty_boss_phase_list_is_an_error() {
        let mut data = (*GameData::builtin()).clone();
        let mut broken = builtin_boss_templates().remove(0);
        broken.id = "broken_boss".to_string();
        broken.phases.clear();
        data.boss_templates.push(broken);
        assert!(validate_game_data(&data).has_errors());
    }

    #[test]
    fn duplicate_pilot_id_is_an_error() {
        let mut data = (*GameData::builtin()).clone();
        let dup = data.pilots[0].clone();
        data.pilots.push(dup);
        assert!(validate_game_data(&data).has_errors());
    }
}
