use chrono::NaiveTime;

use crate::model::{format_minute, DayMinute, SessionStatus};

/// Contract violations. Business outcomes (collisions, capacity) are
/// [`Conflict`](crate::model::Conflict) values, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidInterval {
        start: DayMinute,
        end: DayMinute,
    },
    SpansMidnight {
        start: NaiveTime,
        duration_minutes: u32,
    },
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidInterval { start, end } => write!(
                f,
                "invalid interval: {}–{} is empty or runs past midnight",
                format_minute(*start),
                format_minute(*end)
            ),
            EngineError::SpansMidnight {
                start,
                duration_minutes,
            } => write!(
                f,
                "session starting at {} lasting {duration_minutes} min crosses midnight",
                start.format("%H:%M")
            ),
            EngineError::InvalidTransition { from, to } => {
                write!(f, "cannot move session from {from} to {to}")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
