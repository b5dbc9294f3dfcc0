use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::model::Interval;
use crate::observability;

use super::store::{Registry, Room, SessionSource};
use super::{Engine, EngineError};

// ── Best-fit room allocation ──────────────────────────────────────

impl Engine {
    /// Every room that could host the session, smallest sufficient capacity
    /// first. Rooms of equal capacity keep snapshot order.
    pub fn rank_rooms<'r, S>(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: u32,
        required_capacity: u32,
        sessions: &S,
        rooms: &'r [Room],
    ) -> Result<Vec<&'r Room>, EngineError>
    where
        S: SessionSource + ?Sized,
    {
        let interval = Interval::starting_at(date, start_time, duration_minutes)?;
        let registry = Registry::new(rooms);

        let mut candidates: Vec<&'r Room> = registry
            .available()
            .filter(|room| room.capacity > 0 && room.capacity >= required_capacity)
            .filter(|room| self.is_free(&registry, &room.id, &interval, sessions, None))
            .collect();
        candidates.sort_by_key(|room| room.capacity);
        Ok(candidates)
    }

    /// Smallest free room seating `required_capacity`, or `None` when no room
    /// qualifies. Which of several equally sized rooms wins is unspecified.
    pub fn find_optimal_room<'r, S>(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: u32,
        required_capacity: u32,
        sessions: &S,
        rooms: &'r [Room],
    ) -> Result<Option<&'r Room>, EngineError>
    where
        S: SessionSource + ?Sized,
    {
        let choice = self
            .rank_rooms(date, start_time, duration_minutes, required_capacity, sessions, rooms)?
            .into_iter()
            .next();

        match choice {
            Some(room) => debug!(
                room_id = %room.id,
                capacity = room.capacity,
                required_capacity,
                "allocated room"
            ),
            None => debug!(required_capacity, %date, %start_time, "no room fits"),
        }
        observability::record_allocation(choice.is_some());
        Ok(choice)
    }
}
