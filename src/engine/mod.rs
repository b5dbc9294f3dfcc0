mod allocator;
mod availability;
mod capacity;
mod conflict;
mod error;
mod store;
mod validator;

pub use error::EngineError;
pub use store::{Instructor, Registry, Resource, Room, SessionSource};
pub use validator::BookingRequest;

use serde::{Deserialize, Serialize};

use crate::limits::{MAX_SUGGESTED_ALTERNATIVES, NEAR_CAPACITY_PERCENT};

/// Product-tuning knobs. Defaults come from [`crate::limits`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Percentage of `max_capacity` at which a "nearly full" warning fires.
    pub near_capacity_percent: u32,
    /// How many alternative rooms/instructors a suggestion lists at most.
    pub max_suggested_alternatives: usize,
    /// Report participants already booked in an overlapping session.
    pub check_participant_overlap: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            near_capacity_percent: NEAR_CAPACITY_PERCENT,
            max_suggested_alternatives: MAX_SUGGESTED_ALTERNATIVES,
            check_participant_overlap: false,
        }
    }
}

impl EngineConfig {
    pub fn with_near_capacity_percent(mut self, percent: u32) -> Self {
        self.near_capacity_percent = percent;
        self
    }

    pub fn with_max_suggested_alternatives(mut self, max: usize) -> Self {
        self.max_suggested_alternatives = max;
        self
    }

    pub fn with_participant_overlap(mut self, enabled: bool) -> Self {
        self.check_participant_overlap = enabled;
        self
    }
}

/// Stateless conflict engine. Every method is a pure function of its
/// arguments and the immutable config, so one `Engine` can be shared freely
/// across request handlers.
///
/// Callers must read `rooms`, `instructors` and sessions from one consistent
/// snapshot, and re-validate right before persisting a booking: the engine
/// only advises, it never reserves anything.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
