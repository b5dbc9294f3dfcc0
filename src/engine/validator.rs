use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::*;
use crate::observability;

use super::conflict;
use super::store::{Instructor, Registry, Resource, Room, SessionSource};
use super::{Engine, EngineError};

/// A proposed session as the scheduling form sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
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
    /// Session being edited. Its stored copy must not collide with itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_session_id: Option<String>,
}

impl BookingRequest {
    pub fn new(date: NaiveDate, start_time: NaiveTime, duration_minutes: u32, max_capacity: u32) -> Self {
        Self {
            date,
            start_time,
            duration_minutes,
            room_id: None,
            instructor_id: None,
            participant_ids: BTreeSet::new(),
            max_capacity,
            ignore_session_id: None,
        }
    }

    /// Re-validation request for an existing session, ignoring its own slot.
    pub fn for_session(session: &Session) -> Self {
        Self {
            date: session.date,
            start_time: session.start_time,
            duration_minutes: session.duration_minutes,
            room_id: session.room_id.clone(),
            instructor_id: session.instructor_id.clone(),
            participant_ids: session.participant_ids.clone(),
            max_capacity: session.max_capacity,
            ignore_session_id: Some(session.id.clone()),
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

    pub fn with_participants<I, P>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.participant_ids.extend(participants.into_iter().map(Into::into));
        self
    }

    pub fn ignoring(mut self, session_id: impl Into<String>) -> Self {
        self.ignore_session_id = Some(session_id.into());
        self
    }

    pub fn interval(&self) -> Result<Interval, EngineError> {
        Interval::starting_at(self.date, self.start_time, self.duration_minutes)
    }

    pub fn participant_count(&self) -> u32 {
        u32::try_from(self.participant_ids.len()).unwrap_or(u32::MAX)
    }
}

impl Engine {
    /// Full booking check: room, instructor, capacity, and (if enabled)
    /// participant double-booking, reported in that order.
    ///
    /// Returns `Err` only when the request's own interval is malformed.
    pub fn validate<S>(
        &self,
        request: &BookingRequest,
        sessions: &S,
        rooms: &[Room],
        instructors: &[Instructor],
    ) -> Result<ConflictResult, EngineError>
    where
        S: SessionSource + ?Sized,
    {
        let started = Instant::now();
        let interval = request.interval()?;
        let ignore = request.ignore_session_id.as_deref();
        let rooms = Registry::new(rooms);
        let instructors = Registry::new(instructors);

        let mut result = ConflictResult::clear();

        if let Some(room_id) = request.room_id.as_deref() {
            self.check_with_alternatives(&mut result, &rooms, room_id, &interval, sessions, ignore);
        }
        if let Some(instructor_id) = request.instructor_id.as_deref() {
            self.check_with_alternatives(
                &mut result,
                &instructors,
                instructor_id,
                &interval,
                sessions,
                ignore,
            );
        }

        let room_capacity = request
            .room_id
            .as_deref()
            .and_then(|id| rooms.get(id))
            .map(|room| room.capacity);
        result.merge(self.check_capacity(request.participant_count(), request.max_capacity, room_capacity));

        if self.config.check_participant_overlap {
            result.merge(self.participant_conflicts(request, &interval, sessions, ignore));
        }

        debug!(
            %interval,
            blocking = result.has_conflict,
            conflicts = result.conflicts.len(),
            "booking validated"
        );
        observability::record_validation(&result, started.elapsed());
        Ok(result)
    }

    /// Positional form of [`Engine::validate`].
    #[allow(clippy::too_many_arguments)]
    pub fn validate_booking<S>(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: u32,
        room_id: Option<&str>,
        instructor_id: Option<&str>,
        participant_ids: &BTreeSet<String>,
        max_capacity: u32,
        sessions: &S,
        rooms: &[Room],
        instructors: &[Instructor],
    ) -> Result<ConflictResult, EngineError>
    where
        S: SessionSource + ?Sized,
    {
        let request = BookingRequest {
            date,
            start_time,
            duration_minutes,
            room_id: room_id.map(str::to_string),
            instructor_id: instructor_id.map(str::to_string),
            participant_ids: participant_ids.clone(),
            max_capacity,
            ignore_session_id: None,
        };
        self.validate(&request, sessions, rooms, instructors)
    }

    fn check_with_alternatives<R, S>(
        &self,
        result: &mut ConflictResult,
        registry: &Registry<'_, R>,
        resource_id: &str,
        interval: &Interval,
        sessions: &S,
        ignore: Option<&str>,
    ) where
        R: Resource,
        S: SessionSource + ?Sized,
    {
        let own = self.resource_conflicts(registry, resource_id, interval, sessions, ignore);
        let blocked = own.has_conflict;
        result.merge(own);
        if !blocked {
            return;
        }

        let names: Vec<&str> = self
            .free_alternatives(registry, resource_id, interval, sessions, ignore)
            .into_iter()
            .map(|r| r.name())
            .collect();
        if let Some(line) = conflict::alternatives_line(R::KIND, &names) {
            result.add_suggestion(line);
        }
    }

    fn participant_conflicts<S>(
        &self,
        request: &BookingRequest,
        interval: &Interval,
        sessions: &S,
        ignore: Option<&str>,
    ) -> ConflictResult
    where
        S: SessionSource + ?Sized,
    {
        let mut result = ConflictResult::clear();
        if request.participant_ids.is_empty() {
            return result;
        }

        for session in sessions.active_sessions() {
            if ignore == Some(session.id.as_str()) {
                continue;
            }
            let existing = match session.interval() {
                Ok(existing) if existing.overlaps(interval) => existing,
                Ok(_) => continue,
                Err(e) if session.date == interval.date() => {
                    warn!(session_id = %session.id, "same-day session with bad interval: {e}");
                    for participant in request.participant_ids.intersection(&session.participant_ids) {
                        result.push(conflict::participant_in_unreadable_booking(participant, session, &e));
                    }
                    continue;
                }
                Err(_) => continue,
            };
            for participant in request.participant_ids.intersection(&session.participant_ids) {
                result.push(conflict::participant_overlap(participant, session, &existing));
            }
        }
        result
    }
}
