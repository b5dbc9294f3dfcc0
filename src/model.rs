use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::limits::{MAX_SESSION_DURATION_MINUTES, MINUTES_PER_DAY};

/// Minutes since midnight, `0..=1440`. `1440` is end of day and only valid
/// as an interval end.
pub type DayMinute = u32;

/// Minute of the day `time` falls in. Seconds are dropped.
pub fn minute_of_day(time: NaiveTime) -> DayMinute {
    time.hour() * 60 + time.minute()
}

/// `HH:MM`; end of day renders as `24:00`.
pub fn format_minute(minute: DayMinute) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// A same-day time range `[start, end)` at minute granularity.
///
/// Bounds are minutes since midnight so a session may run until 24:00.
/// Intervals on different dates never overlap; there is no multi-day span.
/// Deserialization goes through [`Interval::from_minutes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    date: NaiveDate,
    start: DayMinute,
    end: DayMinute,
}

#[derive(Deserialize)]
struct RawInterval {
    date: NaiveDate,
    start: DayMinute,
    end: DayMinute,
}

impl TryFrom<RawInterval> for Interval {
    type Error = EngineError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::from_minutes(raw.date, raw.start, raw.end)
    }
}

impl Interval {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<Self, EngineError> {
        Self::from_minutes(date, minute_of_day(start), minute_of_day(end))
    }

    /// Requires `start < end <= 1440`.
    pub fn from_minutes(date: NaiveDate, start: DayMinute, end: DayMinute) -> Result<Self, EngineError> {
        if start >= end || end > MINUTES_PER_DAY {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Self { date, start, end })
    }

    /// Interval beginning at `start` and lasting `duration_minutes`.
    pub fn starting_at(
        date: NaiveDate,
        start: NaiveTime,
        duration_minutes: u32,
    ) -> Result<Self, EngineError> {
        let end = compute_end_time(start, duration_minutes)?;
        Self::from_minutes(date, minute_of_day(start), end)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> DayMinute {
        self.start
    }

    pub fn end(&self) -> DayMinute {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}–{}",
            self.date,
            format_minute(self.start),
            format_minute(self.end)
        )
    }
}

/// Free-function form of [`Interval::overlaps`].
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.overlaps(b)
}

/// Minute of the day at which a session starting at `start` ends. The start
/// is truncated to the minute; `1440` means the session runs until midnight.
///
/// Fails for zero-length sessions and for anything that would cross midnight.
pub fn compute_end_time(start: NaiveTime, duration_minutes: u32) -> Result<DayMinute, EngineError> {
    let start_minute = minute_of_day(start);
    if duration_minutes == 0 {
        return Err(EngineError::InvalidInterval {
            start: start_minute,
            end: start_minute,
        });
    }
    if duration_minutes > MAX_SESSION_DURATION_MINUTES {
        return Err(EngineError::LimitExceeded("session longer than one day"));
    }
    let end = start_minute + duration_minutes;
    if end > MINUTES_PER_DAY {
        return Err(EngineError::SpansMidnight {
            start,
            duration_minutes,
        });
    }
    Ok(end)
}

// ── Sessions ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Draft,
    Confirmed,
    Cancelled,
    Completed,
}

impl SessionStatus {
    /// draft → confirmed → completed, and → cancelled from anything not yet
    /// completed.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Draft, Confirmed) | (Confirmed, Completed) | (Draft, Cancelled) | (Confirmed, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Confirmed => "confirmed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kind of bookable resource a check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Room,
    Instructor,
}

impl ResourceKind {
    pub fn conflict_kind(self) -> ConflictKind {
        match self {
            ResourceKind::Room => ConflictKind::Room,
            ResourceKind::Instructor => ConflictKind::Instructor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Room => "Room",
            ResourceKind::Instructor => "Instructor",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Room => "rooms",
            ResourceKind::Instructor => "instructors",
        }
    }
}

/// A scheduled group lesson. The end time is always derived from
/// `start_time + duration_minutes`, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub type_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub participant_ids: BTreeSet<String>,
    pub max_capacity: u32,
    pub status: SessionStatus,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        type_id: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: u32,
        max_capacity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            type_id: type_id.into(),
            date,
            start_time,
            duration_minutes,
            room_id: None,
            instructor_id: None,
            participant_ids: BTreeSet::new(),
            max_capacity,
            status: SessionStatus::Draft,
        }
    }

    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn with_instructor(mut self, instructor_id: impl Into<String>) -> Self {
        self.instructor_id = Some(instructor_id.into());
        self
    }

    pub fn with_participant(mut self, participant_id: impl Into<String>) -> Self {
        self.participant_ids.insert(participant_id.into());
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Cancelled sessions release their resources and are ignored by every check.
    pub fn is_active(&self) -> bool {
        self.status != SessionStatus::Cancelled
    }

    pub fn end_time(&self) -> Result<DayMinute, EngineError> {
        compute_end_time(self.start_time, self.duration_minutes)
    }

    pub fn interval(&self) -> Result<Interval, EngineError> {
        Interval::starting_at(self.date, self.start_time, self.duration_minutes)
    }

    /// The resource id this session holds for `kind`, if any.
    pub fn resource_id(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Room => self.room_id.as_deref(),
            ResourceKind::Instructor => self.instructor_id.as_deref(),
        }
    }

    pub fn transition_to(&mut self, next: SessionStatus) -> Result<(), EngineError> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

// ── Conflicts ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Room,
    Instructor,
    Capacity,
    Overlap,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::Room => "room",
            ConflictKind::Instructor => "instructor",
            ConflictKind::Capacity => "capacity",
            ConflictKind::Overlap => "overlap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Structured payload attached to a conflict. Capacity conflicts carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConflictDetail {
    #[serde(rename_all = "camelCase")]
    NotFound { resource_id: String },
    #[serde(rename_all = "camelCase")]
    Unavailable { resource_id: String },
    Collision { session: Box<Session> },
    #[serde(rename_all = "camelCase")]
    ParticipantOverlap {
        participant_id: String,
        session: Box<Session>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ConflictDetail>,
}

impl Conflict {
    pub fn error(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            details: None,
        }
    }

    pub fn warning(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: ConflictDetail) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The colliding session, for room/instructor/overlap conflicts.
    pub fn session(&self) -> Option<&Session> {
        match &self.details {
            Some(ConflictDetail::Collision { session })
            | Some(ConflictDetail::ParticipantOverlap { session, .. }) => Some(session.as_ref()),
            _ => None,
        }
    }
}

/// Outcome of a check. `has_conflict` is true iff some conflict is an error;
/// `suggestions` is either absent or non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResult {
    pub has_conflict: bool,
    pub conflicts: Vec<Conflict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ConflictResult {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn from_conflicts(conflicts: Vec<Conflict>, suggestions: Vec<String>) -> Self {
        let has_conflict = conflicts.iter().any(Conflict::is_error);
        Self {
            has_conflict,
            conflicts,
            suggestions: if suggestions.is_empty() {
                None
            } else {
                Some(suggestions)
            },
        }
    }

    pub fn push(&mut self, conflict: Conflict) {
        self.has_conflict |= conflict.is_error();
        self.conflicts.push(conflict);
    }

    pub fn add_suggestion(&mut self, suggestion: String) {
        self.suggestions.get_or_insert_with(Vec::new).push(suggestion);
    }

    /// Append `other`'s conflicts and suggestions after ours.
    pub fn merge(&mut self, other: ConflictResult) {
        for conflict in other.conflicts {
            self.push(conflict);
        }
        for suggestion in other.suggestions.into_iter().flatten() {
            self.add_suggestion(suggestion);
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.has_conflict
    }

    pub fn errors(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(|c| c.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(|c| c.severity == Severity::Warning)
    }
}
