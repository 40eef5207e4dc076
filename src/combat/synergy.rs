//! Cross-cutting multiplier computation: combo counters and
//! augmentation-derived synergies consumed by the damage model, the enemy AI
//! and the boss subsystem.

use std::collections::BTreeSet;

pub const INFERNO_DAMAGE_MULTIPLIER: f64 = 1.5;
pub const BULWARK_DAMAGE_REDUCTION: f64 = 0.10;
pub const COMBO_STEP: f64 = 0.05;
pub const COMBO_CAP: u32 = 10;

/// Augmentations installed on the current run. Ids are data (shop inventory),
/// so they stay strings at the edge; synergies derived from them are typed.
pub fn active_synergies(augmentations: &BTreeSet<String>) -> SynergySet {
    let thermal_count = augmentations
        .iter()
        .filter(|id| id.starts_with("thermal_") || id.as_str() == "ignition_coil")
        .count();
    let defensive_count = augmentations
        .iter()
        .filter(|id| id.starts_with("plating_") || id.as_str() == "aegis_core")
        .count();

    SynergySet {
        inferno: thermal_count >= 2,
        bulwark: defensive_count >= 2,
        thermal_conversion: augmentations.contains("thermal_conv"),
    }
}

/// Synergies active for the current loadout. Computed once per combat from the
/// run's augmentation set and passed down; nothing re-derives it mid-tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynergySet {
    /// Two or more thermal augments: +50% damage, BURNING lasts 50% longer.
    pub inferno: bool,
    /// Two or more defensive augments: incoming enemy damage reduced 10%.
    pub bulwark: bool,
    /// `thermal_conv` augment: stored heat converts to bonus damage.
    pub thermal_conversion: bool,
}

/// Consecutive-hit tracker. Every player hit within the window bumps the
/// counter; a miss or an idle window resets it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboTracker {
    pub count: u32,
    pub last_hit_tick: u64,
    pub window_ticks: u64,
}

impl ComboTracker {
    pub fn new(window_ticks: u64) -> Self {
        Self {
            count: 0,
            last_hit_tick: 0,
            window_ticks,
        }
    }

    pub fn register_hit(&mut self, tick: u64) {
        if self.count > 0 && tick.saturating_sub(self.last_hit_tick) > self.window_ticks {
            self.count = 0;
        }
        self.count = self.count.saturating_add(1);
        self.last_hit_tick = tick;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Expire the combo if the window lapsed without a hit.
    pub fn decay(&mut self, tick: u64) {
        if self.count > 0 && tick.saturating_sub(self.last_hit_tick) > self.window_ticks {
            self.count = 0;
        }
    }

    /// 1.0 at no combo, +5% per consecutive hit, capped at +50%.
    pub fn multiplier(&self) -> f64 {
        1.0 + COMBO_STEP * self.count.min(COMBO_CAP) as f64
    }
}
