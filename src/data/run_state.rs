//! Mutable per-run player state. Created on run start by the profile
//! collaborator, mutated by shop/hangar actions and combat outcomes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::combat::damage::ConsumableKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub kind: ConsumableKind,
    pub count: u32,
    pub max_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub current_stage: u32,
    pub scrap: i64,
    /// Always >= 1 while the run is active; defeat ends the run instead of
    /// persisting a dead state.
    pub current_hp: i32,
    pub max_hp_upgrade: i32,
    pub damage_upgrade: i32,
    #[serde(default)]
    pub consumables: Vec<Consumable>,
    #[serde(default)]
    pub augmentations: BTreeSet<String>,
}

impl RunState {
    pub fn new(starting_hp: i32) -> Self {
        Self {
            current_stage: 1,
            scrap: 0,
            current_hp: starting_hp.max(1),
            max_hp_upgrade: 0,
            damage_upgrade: 0,
            consumables: Vec::new(),
            augmentations: BTreeSet::new(),
        }
    }

    pub fn consumable_count(&self, kind: ConsumableKind) -> u32 {
        self.consumables
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Spend one charge of a consumable. Returns false when none are left.
    pub fn spend_consumable(&mut self, kind: ConsumableKind) -> bool {
        if let Some(slot) = self.consumables.iter_mut().find(|c| c.kind == kind) {
            if slot.count > 0 {
                slot.count -= 1;
                return true;
            }
        }
        false
    }

    /// Add charges, clamped at the slot's max. Creates the slot when missing.
    pub fn grant_consumable(&mut self, kind: ConsumableKind, amount: u32, max_count: u32) {
        if let Some(slot) = self.consumables.iter_mut().find(|c| c.kind == kind) {
            slot.count = (slot.count + amount).min(slot.max_count);
        } else {
            self.consumables.push(Consumable {
                kind,
                count: amount.min(max_count),
                max_count,
            });
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_consumable_decrements_and_bottoms_out() {
        let mut run = RunState::default();
        run.grant_consumable(ConsumableKind::NanoStim, 2, 3);
        assert!(run.spend_consumable(ConsumableKind::NanoStim));
        assert!(run.spend_consumable(ConsumableKind::NanoStim));
        assert!(!run.spend_consumable(ConsumableKind::NanoStim));
        assert_eq!(run.consumable_count(ConsumableKind::NanoStim), 0);
    }

    #[test]
    fn grant_consumable_clamps_at_slot_max() {
        let mut run = RunState::default();
        run.grant_consumable(ConsumableKind::EmpCharge, 5, 2);
        assert_eq!(run.consumable_count(ConsumableKind::EmpCharge), 2);
    }
}
