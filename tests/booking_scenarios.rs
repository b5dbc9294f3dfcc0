use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use schedcheck::{
    BookingRequest, ConflictKind, ConflictResult, Engine, EngineConfig, Instructor, Room, Session,
    SessionStatus, Severity,
};

// ── Test infrastructure ──────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn school_rooms() -> Vec<Room> {
    vec![
        Room::new("R1", "Theory Room 1", 8),
        Room::new("R2", "Theory Room 2", 8),
        Room::new("R3", "Workshop", 16),
        Room::new("R4", "Closed Wing", 20).unavailable(),
    ]
}

fn school_instructors() -> Vec<Instructor> {
    vec![
        Instructor::new("I1", "Nadia"),
        Instructor::new("I2", "Tom"),
        Instructor::new("I3", "Jonas").unavailable(),
    ]
}

// ── Scenarios ────────────────────────────────────────────────

#[test]
fn room_collision_end_to_end() {
    init_tracing();
    let engine = Engine::default();
    let sessions = vec![Session::new("S1", "first-aid", monday(), at(9, 0), 90, 8)
        .with_room("R1")
        .with_status(SessionStatus::Confirmed)];

    let request = BookingRequest::new(monday(), at(10, 0), 60, 8)
        .with_room("R1")
        .with_participants(["s-01", "s-02", "s-03", "s-04", "s-05"]);
    let result = engine
        .validate(&request, &sessions, &school_rooms(), &school_instructors())
        .unwrap();

    assert!(result.has_conflict);
    assert_eq!(result.conflicts.len(), 1);
    let conflict = &result.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::Room);
    assert_eq!(conflict.severity, Severity::Error);
    assert_eq!(conflict.session().map(|s| s.id.as_str()), Some("S1"));

    let suggestions = result.suggestions.expect("alternative rooms exist");
    assert_eq!(suggestions, vec!["Available rooms: Theory Room 2, Workshop".to_string()]);
}

#[test]
fn confirm_then_cancel_frees_the_room() {
    init_tracing();
    let engine = Engine::default();
    let mut booked = Session::new("S1", "theory", monday(), at(14, 0), 60, 8).with_room("R2");
    booked.transition_to(SessionStatus::Confirmed).unwrap();

    let request = BookingRequest::new(monday(), at(14, 30), 45, 8).with_room("R2");
    let rooms = school_rooms();
    let instructors = school_instructors();

    let blocked = engine.validate(&request, &[booked.clone()][..], &rooms, &instructors).unwrap();
    assert!(blocked.has_conflict);

    booked.transition_to(SessionStatus::Cancelled).unwrap();
    let clear = engine.validate(&request, &[booked][..], &rooms, &instructors).unwrap();
    assert!(!clear.has_conflict);
    assert_eq!(clear.suggestions, None);
}

#[test]
fn unavailable_instructor_gets_alternatives() {
    init_tracing();
    let engine = Engine::default();
    let sessions = vec![Session::new("S1", "theory", monday(), at(9, 0), 60, 8)
        .with_instructor("I1")
        .with_status(SessionStatus::Confirmed)];
    let request = BookingRequest::new(monday(), at(9, 0), 60, 8).with_instructor("I3");

    let result = engine
        .validate(&request, &sessions, &school_rooms(), &school_instructors())
        .unwrap();
    assert!(result.has_conflict);
    assert_eq!(result.conflicts[0].kind, ConflictKind::Instructor);
    assert!(result.conflicts[0].message.contains("Jonas"));
    assert_eq!(result.suggestions, Some(vec!["Available instructors: Tom".to_string()]));
}

#[test]
fn allocate_then_validate_agrees() {
    init_tracing();
    let engine = Engine::default();
    let rooms = school_rooms();
    let sessions = vec![Session::new("S1", "theory", monday(), at(18, 0), 120, 8)
        .with_room("R1")
        .with_status(SessionStatus::Confirmed)];

    let room = engine
        .find_optimal_room(monday(), at(19, 0), 60, 6, &sessions, &rooms)
        .unwrap()
        .expect("a room is free");
    assert_eq!(room.id, "R2");

    let request = BookingRequest::new(monday(), at(19, 0), 60, 6)
        .with_room(room.id.clone())
        .with_participants(["a", "b", "c"]);
    let result = engine.validate(&request, &sessions, &rooms, &[]).unwrap();
    assert!(!result.has_conflict);
}

#[test]
fn nothing_fits_is_not_an_error() {
    let engine = Engine::default();
    let rooms = school_rooms();
    let sessions: Vec<Session> = Vec::new();
    // Only the closed wing seats 20.
    let choice = engine
        .find_optimal_room(monday(), at(10, 0), 60, 18, &sessions, &rooms)
        .unwrap();
    assert!(choice.is_none());
}

#[test]
fn shared_engine_across_threads() {
    let engine = Arc::new(Engine::new(EngineConfig::default().with_participant_overlap(true)));
    let sessions = Arc::new(vec![Session::new("S1", "theory", monday(), at(9, 0), 60, 8)
        .with_room("R1")
        .with_participant("s-01")
        .with_status(SessionStatus::Confirmed)]);
    let rooms = Arc::new(school_rooms());
    let request = BookingRequest::new(monday(), at(9, 30), 60, 8)
        .with_room("R1")
        .with_participants(["s-01"]);

    let results: Vec<ConflictResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let sessions = Arc::clone(&sessions);
                let rooms = Arc::clone(&rooms);
                let request = &request;
                scope.spawn(move || engine.validate(request, &*sessions, &rooms, &[]).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    let kinds: Vec<ConflictKind> = results[0].conflicts.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConflictKind::Room, ConflictKind::Overlap]);
}

// ── Wire shape ───────────────────────────────────────────────

#[test]
fn result_serializes_camel_case_without_empty_suggestions() {
    let engine = Engine::default();
    let sessions: Vec<Session> = Vec::new();
    let request = BookingRequest::new(monday(), at(9, 0), 60, 10)
        .with_participants((0..9).map(|i| format!("s-{i:02}")));
    let result = engine.validate(&request, &sessions, &[], &[]).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["hasConflict"], false);
    assert_eq!(json["conflicts"][0]["kind"], "capacity");
    assert_eq!(json["conflicts"][0]["severity"], "warning");
    assert!(json.get("suggestions").is_none());
    assert!(json["conflicts"][0].get("details").is_none());
}

#[test]
fn collision_details_carry_the_session() {
    let engine = Engine::default();
    let sessions = vec![Session::new("S7", "theory", monday(), at(9, 0), 60, 8)
        .with_room("R1")
        .with_status(SessionStatus::Confirmed)];
    let request = BookingRequest::new(monday(), at(9, 0), 60, 8).with_room("R1");
    let result = engine.validate(&request, &sessions, &school_rooms(), &[]).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    let details = &json["conflicts"][0]["details"];
    assert_eq!(details["type"], "collision");
    assert_eq!(details["session"]["id"], "S7");
    assert_eq!(details["session"]["startTime"], "09:00:00");
    assert_eq!(details["session"]["status"], "confirmed");

    let back: ConflictResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn request_and_config_deserialize_from_ui_json() {
    let request: BookingRequest = serde_json::from_str(
        r#"{
            "date": "2025-06-02",
            "startTime": "10:00:00",
            "durationMinutes": 45,
            "roomId": "R3",
            "participantIds": ["s-01", "s-02"],
            "maxCapacity": 12
        }"#,
    )
    .unwrap();
    assert_eq!(request.instructor_id, None);
    assert_eq!(request.participant_count(), 2);
    assert_eq!(request.interval().unwrap().end(), 10 * 60 + 45);

    let config: EngineConfig = serde_json::from_str(r#"{ "nearCapacityPercent": 75 }"#).unwrap();
    assert_eq!(config.near_capacity_percent, 75);
    assert_eq!(config.max_suggested_alternatives, 3);
}
