use crate::model::*;

use super::store::Resource;
use super::EngineError;

fn hhmm(interval: &Interval) -> (String, String) {
    (format_minute(interval.start()), format_minute(interval.end()))
}

pub(super) fn not_found(kind: ResourceKind, resource_id: &str) -> Conflict {
    Conflict::error(
        kind.conflict_kind(),
        format!("{} \"{resource_id}\" not found", kind.label()),
    )
    .with_details(ConflictDetail::NotFound {
        resource_id: resource_id.to_string(),
    })
}

pub(super) fn unavailable<R: Resource>(resource: &R) -> Conflict {
    Conflict::error(
        R::KIND.conflict_kind(),
        format!("{} \"{}\" is not available", R::KIND.label(), resource.name()),
    )
    .with_details(ConflictDetail::Unavailable {
        resource_id: resource.id().to_string(),
    })
}

pub(super) fn collision<R: Resource>(resource: &R, session: &Session, existing: &Interval) -> Conflict {
    let (start, end) = hhmm(existing);
    Conflict::error(
        R::KIND.conflict_kind(),
        format!(
            "{} \"{}\" is already booked from {start} to {end} (session {})",
            R::KIND.label(),
            resource.name(),
            session.id
        ),
    )
    .with_details(ConflictDetail::Collision {
        session: Box::new(session.clone()),
    })
}

/// A same-day booking whose own slot cannot be derived. Its true extent is
/// unknown, so it blocks the resource.
pub(super) fn unreadable_booking<R: Resource>(resource: &R, session: &Session, err: &EngineError) -> Conflict {
    Conflict::error(
        R::KIND.conflict_kind(),
        format!(
            "{} \"{}\" has a booking with an invalid time slot (session {}): {err}",
            R::KIND.label(),
            resource.name(),
            session.id
        ),
    )
    .with_details(ConflictDetail::Collision {
        session: Box::new(session.clone()),
    })
}

pub(super) fn session_capacity_exceeded(participants: u32, max_capacity: u32) -> Conflict {
    Conflict::error(
        ConflictKind::Capacity,
        format!("{participants} participants exceed the session capacity of {max_capacity}"),
    )
}

pub(super) fn room_capacity_exceeded(participants: u32, room_capacity: u32) -> Conflict {
    Conflict::error(
        ConflictKind::Capacity,
        format!("{participants} participants exceed the room capacity of {room_capacity}"),
    )
}

pub(super) fn nearly_full(participants: u32, max_capacity: u32) -> Conflict {
    Conflict::warning(
        ConflictKind::Capacity,
        format!("Session is nearly full ({participants}/{max_capacity})"),
    )
}

pub(super) fn participant_overlap(participant_id: &str, session: &Session, existing: &Interval) -> Conflict {
    let (start, end) = hhmm(existing);
    Conflict::error(
        ConflictKind::Overlap,
        format!(
            "Participant \"{participant_id}\" is already booked from {start} to {end} (session {})",
            session.id
        ),
    )
    .with_details(ConflictDetail::ParticipantOverlap {
        participant_id: participant_id.to_string(),
        session: Box::new(session.clone()),
    })
}

pub(super) fn participant_in_unreadable_booking(
    participant_id: &str,
    session: &Session,
    err: &EngineError,
) -> Conflict {
    Conflict::error(
        ConflictKind::Overlap,
        format!(
            "Participant \"{participant_id}\" is booked the same day in a session with an invalid time slot (session {}): {err}",
            session.id
        ),
    )
    .with_details(ConflictDetail::ParticipantOverlap {
        participant_id: participant_id.to_string(),
        session: Box::new(session.clone()),
    })
}

/// One suggestion line, e.g. `Available rooms: Hall B, Hall C`.
pub(super) fn alternatives_line(kind: ResourceKind, names: &[&str]) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    Some(format!("Available {}: {}", kind.plural(), names.join(", ")))
}
