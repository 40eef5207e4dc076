//! Scheduled-event queue for delayed effects (boss ability telegraphs).
//! Events re-enter the single mutation path inside the tick function and are
//! re-validated against the game-over flag when they come due; stale events
//! lapse instead of being cancelled.

use crate::combat::boss::BossAbilityKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledEventKind {
    /// A telegraphed boss ability resolving after its wind-up.
    BossAbility {
        enemy_index: usize,
        ability: BossAbilityKind,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub due_ms: f64,
    pub kind: ScheduledEventKind,
}

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<ScheduledEvent>,
}

impl EventQueue {
    pub fn schedule(&mut self, due_ms: f64, kind: ScheduledEventKind) {
        self.events.push(ScheduledEvent { due_ms, kind });
    }

    /// Remove and return every event due at or before `now_ms`, in due order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<ScheduledEvent> {
        let mut due: Vec<ScheduledEvent> = Vec::new();
        let mut index = 0;
        while index < self.events.len() {
            if self.events[index].due_ms <= now_ms {
                due.push(self.events.remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
