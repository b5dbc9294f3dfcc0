//! Conflict detection and room allocation for group lesson scheduling.
//!
//! Everything here is a pure function of its arguments: callers hand in
//! snapshots of rooms, instructors and sessions, and get back either a
//! [`model::ConflictResult`] or a best-fit room. Nothing is cached and nothing
//! is written, so re-validating on every form change is cheap and safe.

pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;

pub use engine::{
    BookingRequest, Engine, EngineConfig, EngineError, Instructor, Registry, Resource, Room,
    SessionSource,
};
pub use model::{
    compute_end_time, minute_of_day, overlaps, Conflict, ConflictDetail, ConflictKind,
    ConflictResult, DayMinute, Interval, ResourceKind, Session, SessionStatus, Severity,
};
