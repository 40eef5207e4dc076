pub mod engine;
pub mod headless;
pub mod schedule;
pub mod snapshot;
pub mod state;

pub use engine::{CombatConfig, CombatEngine, EngineError, MAX_TICKS_PER_FRAME, TICK_MS};
pub use headless::{run_headless, DEFAULT_MAX_TICKS};
pub use schedule::{EventQueue, ScheduledEvent, ScheduledEventKind};
pub use snapshot::{CombatSnapshot, PlayerSnapshot};
pub use state::{CombatState, Hazard, Mission, MissionState, PlayerState};
