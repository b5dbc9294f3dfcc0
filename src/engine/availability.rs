use tracing::{debug, trace, warn};

use crate::model::*;

use super::conflict;
use super::store::{Registry, Resource, SessionSource};
use super::Engine;

// ── Availability ──────────────────────────────────────────────────

impl Engine {
    /// Is `resource_id` free over `interval`?
    ///
    /// Unknown ids fail closed with a single error. An unavailable resource
    /// is reported and the schedule is still scanned, so both problems can
    /// show up together. Collisions come out in `sessions` order. A booking
    /// on the same date whose slot cannot be derived counts as a collision.
    pub fn check_resource_availability<R, S>(
        &self,
        resource_id: &str,
        interval: &Interval,
        sessions: &S,
        resources: &[R],
    ) -> ConflictResult
    where
        R: Resource,
        S: SessionSource + ?Sized,
    {
        let registry = Registry::new(resources);
        self.resource_conflicts(&registry, resource_id, interval, sessions, None)
    }

    pub(super) fn resource_conflicts<R, S>(
        &self,
        registry: &Registry<'_, R>,
        resource_id: &str,
        interval: &Interval,
        sessions: &S,
        ignore_session: Option<&str>,
    ) -> ConflictResult
    where
        R: Resource,
        S: SessionSource + ?Sized,
    {
        let kind = R::KIND;
        let Some(resource) = registry.get(resource_id) else {
            debug!(kind = kind.label(), resource_id, "resource not in snapshot");
            return ConflictResult::from_conflicts(
                vec![conflict::not_found(kind, resource_id)],
                Vec::new(),
            );
        };

        let mut result = ConflictResult::clear();
        if !resource.is_available() {
            debug!(kind = kind.label(), resource_id, "resource flagged unavailable");
            result.push(conflict::unavailable(resource));
        }

        for session in sessions.sessions_holding(kind, resource_id) {
            if ignore_session == Some(session.id.as_str()) {
                continue;
            }
            let existing = match session.interval() {
                Ok(existing) => existing,
                Err(e) if session.date == interval.date() => {
                    warn!(session_id = %session.id, "booking with bad interval blocks {resource_id}: {e}");
                    result.push(conflict::unreadable_booking(resource, session, &e));
                    continue;
                }
                Err(e) => {
                    warn!(session_id = %session.id, "ignoring other-day session with bad interval: {e}");
                    continue;
                }
            };
            trace!(session_id = %session.id, %existing, candidate = %interval, "comparing");
            if existing.overlaps(interval) {
                debug!(
                    kind = kind.label(),
                    resource_id,
                    session_id = %session.id,
                    "schedule collision"
                );
                result.push(conflict::collision(resource, session, &existing));
            }
        }

        result
    }

    /// True when the resource exists, is available and has no collision.
    pub(super) fn is_free<R, S>(
        &self,
        registry: &Registry<'_, R>,
        resource_id: &str,
        interval: &Interval,
        sessions: &S,
        ignore_session: Option<&str>,
    ) -> bool
    where
        R: Resource,
        S: SessionSource + ?Sized,
    {
        !self
            .resource_conflicts(registry, resource_id, interval, sessions, ignore_session)
            .has_conflict
    }

    /// Available resources other than `requested_id` that are free over
    /// `interval`, in snapshot order, capped by config.
    pub(super) fn free_alternatives<'a, R, S>(
        &self,
        registry: &Registry<'a, R>,
        requested_id: &str,
        interval: &Interval,
        sessions: &S,
        ignore_session: Option<&str>,
    ) -> Vec<&'a R>
    where
        R: Resource,
        S: SessionSource + ?Sized,
    {
        registry
            .available()
            .filter(|r| r.id() != requested_id)
            .filter(|r| self.is_free(registry, r.id(), interval, sessions, ignore_session))
            .take(self.config.max_suggested_alternatives)
            .collect()
    }
}
