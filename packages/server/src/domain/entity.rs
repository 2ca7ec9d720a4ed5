//! Domain entities.
//!
//! `Room` owns every rule about who may mutate the shape log and how
//! membership changes; the repositories only provide atomic access to it.

use std::collections::HashSet;

use super::{
    error::{RoomInvariantError, ValueObjectError},
    value_object::{ConnectionId, RoomId, Timestamp},
};

/// Canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Freehand,
}

/// One completed drawing operation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: String,
    kind: ShapeKind,
    points: Vec<Point>,
    color: String,
    stroke_width: f64,
}

impl Shape {
    pub fn new(
        id: String,
        kind: ShapeKind,
        points: Vec<Point>,
        color: String,
        stroke_width: f64,
    ) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::EmptyShapeId);
        }
        if !stroke_width.is_finite() || stroke_width <= 0.0 {
            return Err(ValueObjectError::InvalidStrokeWidth(stroke_width));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ValueObjectError::NonFinitePoint { index });
        }

        Ok(Self {
            id,
            kind,
            points,
            color,
            stroke_width,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}

/// Role a connection holds inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Viewer,
}

/// Result of removing a connection from a room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// The connection was a member and has been removed
    pub departed: bool,
    /// The departing connection was the host
    pub host_left: bool,
    /// The room no longer exists
    pub room_deleted: bool,
    /// Members still attached to the room when it was deleted
    pub remaining: Vec<ConnectionId>,
}

/// Room: host, ordered shape log, and viewer set.
///
/// `connection_count` always equals `viewers.len() + 1`: the host is present
/// for the whole lifetime of the room, because host departure deletes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    /// Distinguishes rooms created under the same id over time
    pub generation: u64,
    pub host: ConnectionId,
    pub shapes: Vec<Shape>,
    pub viewers: HashSet<ConnectionId>,
    pub connection_count: usize,
    pub created_at: Timestamp,
}

impl Room {
    /// Create a room whose host is its first joiner.
    pub fn new(id: RoomId, generation: u64, host: ConnectionId, created_at: Timestamp) -> Self {
        Self {
            id,
            generation,
            host,
            shapes: Vec::new(),
            viewers: HashSet::new(),
            connection_count: 1,
            created_at,
        }
    }

    /// Authorization check for every mutation of the shape log.
    pub fn is_host(&self, connection_id: &ConnectionId) -> bool {
        &self.host == connection_id
    }

    pub fn role_of(&self, connection_id: &ConnectionId) -> Option<Role> {
        if self.is_host(connection_id) {
            Some(Role::Host)
        } else if self.viewers.contains(connection_id) {
            Some(Role::Viewer)
        } else {
            None
        }
    }

    /// Back-reference for a member, `None` for non-members.
    pub fn membership_of(&self, connection_id: &ConnectionId) -> Option<RoomMembership> {
        self.role_of(connection_id).map(|role| RoomMembership {
            room_id: self.id.clone(),
            generation: self.generation,
            role,
        })
    }

    /// Add a connection to an existing room.
    ///
    /// Already-present members keep their role and are not counted twice.
    pub fn add_member(&mut self, connection_id: ConnectionId) -> Role {
        if let Some(role) = self.role_of(&connection_id) {
            return role;
        }
        self.viewers.insert(connection_id);
        self.connection_count += 1;
        Role::Viewer
    }

    /// Append a shape if `by` is the host. Returns whether it was accepted.
    pub fn append_shape(&mut self, by: &ConnectionId, shape: Shape) -> bool {
        if !self.is_host(by) {
            return false;
        }
        self.shapes.push(shape);
        true
    }

    /// Empty the shape log if `by` is the host. Returns whether it was accepted.
    pub fn clear_shapes(&mut self, by: &ConnectionId) -> bool {
        if !self.is_host(by) {
            return false;
        }
        self.shapes.clear();
        true
    }

    /// Host first, then viewers in identifier order.
    pub fn members(&self) -> Vec<ConnectionId> {
        let mut viewers = self.sorted_viewers();
        viewers.insert(0, self.host.clone());
        viewers
    }

    fn sorted_viewers(&self) -> Vec<ConnectionId> {
        let mut viewers: Vec<ConnectionId> = self.viewers.iter().cloned().collect();
        viewers.sort();
        viewers
    }

    /// Remove a connection from the room.
    ///
    /// Host departure always deletes the room, whatever the number of viewers.
    /// Removing a non-member is a no-op (`departed == false`).
    pub fn remove_member(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<LeaveOutcome, RoomInvariantError> {
        if self.is_host(connection_id) {
            self.connection_count = self.connection_count.saturating_sub(1);
            return Ok(LeaveOutcome {
                departed: true,
                host_left: true,
                room_deleted: true,
                remaining: self.sorted_viewers(),
            });
        }

        if !self.viewers.remove(connection_id) {
            return Ok(LeaveOutcome::default());
        }

        self.connection_count = self.connection_count.checked_sub(1).ok_or_else(|| {
            RoomInvariantError::ConnectionCountUnderflow {
                room_id: self.id.as_str().to_string(),
            }
        })?;
        self.check_invariant()?;

        let room_deleted = self.connection_count == 0;
        Ok(LeaveOutcome {
            departed: true,
            host_left: false,
            room_deleted,
            remaining: if room_deleted {
                self.members()
            } else {
                Vec::new()
            },
        })
    }

    pub fn check_invariant(&self) -> Result<(), RoomInvariantError> {
        let expected = self.viewers.len() + 1;
        if self.connection_count != expected {
            return Err(RoomInvariantError::ConnectionCountMismatch {
                room_id: self.id.as_str().to_string(),
                expected,
                actual: self.connection_count,
            });
        }
        Ok(())
    }
}

/// A connection's reference to the one room instance it joined.
///
/// Room ids are reused once a room is deleted, so the id alone cannot tell a
/// deleted room from its successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMembership {
    pub room_id: RoomId,
    pub generation: u64,
    pub role: Role,
}

impl RoomMembership {
    /// Same room instance, whatever the role.
    pub fn is_same_room(&self, other: &RoomMembership) -> bool {
        self.room_id == other.room_id && self.generation == other.generation
    }
}

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport is up, no room joined yet (or the room was left)
    Connecting,
    Joined(RoomId),
    /// Terminal: no longer registered
    Disconnected,
}

/// Connection registry entry. Holds a reference to the room, never the room itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    pub current_room: Option<RoomMembership>,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            current_room: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        match &self.current_room {
            Some(membership) => ConnectionState::Joined(membership.room_id.clone()),
            None => ConnectionState::Connecting,
        }
    }
}
