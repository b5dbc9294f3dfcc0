use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{ResourceKind, Session};

// ── Resources ────────────────────────────────────────────────────

/// Something a session can hold: a room or an instructor.
pub trait Resource {
    const KIND: ResourceKind;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    /// Seats. Always positive for a well-formed room.
    pub capacity: u32,
    pub available: bool,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            available: true,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl Resource for Room {
    const KIND: ResourceKind = ResourceKind::Room;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: String,
    pub name: String,
    pub available: bool,
}

impl Instructor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            available: true,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl Resource for Instructor {
    const KIND: ResourceKind = ResourceKind::Instructor;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Read-only view over a resource snapshot with an id index.
///
/// Iteration keeps snapshot order. If an id appears twice the first entry
/// wins, same as a linear `find`.
pub struct Registry<'a, R> {
    items: &'a [R],
    by_id: HashMap<&'a str, usize>,
}

impl<'a, R: Resource> Registry<'a, R> {
    pub fn new(items: &'a [R]) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            by_id.entry(item.id()).or_insert(idx);
        }
        Self { items, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a R> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, R> {
        self.items.iter()
    }

    pub fn available(&self) -> impl Iterator<Item = &'a R> + use<'a, R> {
        self.items.iter().filter(|r| r.is_available())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ── Sessions ─────────────────────────────────────────────────────

/// Query side of the session store.
///
/// Implementors hand back sessions in a stable order; conflicts are reported
/// in that order. Passing every session is correct, passing only the ones on
/// or near the candidate date is just faster.
pub trait SessionSource {
    fn sessions(&self) -> impl Iterator<Item = &Session>;

    /// Sessions that still hold their resources.
    fn active_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions().filter(|s| s.is_active())
    }

    /// Non-cancelled sessions holding `resource_id` as their room or instructor.
    fn sessions_holding<'a>(
        &'a self,
        kind: ResourceKind,
        resource_id: &'a str,
    ) -> impl Iterator<Item = &'a Session> {
        self.active_sessions()
            .filter(move |s| s.resource_id(kind) == Some(resource_id))
    }
}

impl SessionSource for [Session] {
    fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.iter()
    }
}

impl SessionSource for Vec<Session> {
    fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.iter()
    }
}
