//! Conversion logic between DTOs and domain entities.

use easel_shared::time::timestamp_to_rfc3339;

use crate::domain::{IceServer, IceServerSet, Point, Role, Room, Shape, ShapeKind, ValueObjectError};
use crate::infrastructure::dto::{
    http::{IceServerDto, IceServersDto, RoomSummaryDto},
    websocket::{PointDto, RoleDto, ShapeDto, ShapeKindDto},
};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<ShapeKindDto> for ShapeKind {
    fn from(dto: ShapeKindDto) -> Self {
        match dto {
            ShapeKindDto::Rectangle => ShapeKind::Rectangle,
            ShapeKindDto::Circle => ShapeKind::Circle,
            ShapeKindDto::Line => ShapeKind::Line,
            ShapeKindDto::Freehand => ShapeKind::Freehand,
        }
    }
}

impl TryFrom<ShapeDto> for Shape {
    type Error = ValueObjectError;

    fn try_from(dto: ShapeDto) -> Result<Self, Self::Error> {
        Shape::new(
            dto.id,
            dto.r#type.into(),
            dto.points.into_iter().map(|p| Point::new(p.x, p.y)).collect(),
            dto.color,
            dto.stroke_width,
        )
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ShapeKind> for ShapeKindDto {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rectangle => ShapeKindDto::Rectangle,
            ShapeKind::Circle => ShapeKindDto::Circle,
            ShapeKind::Line => ShapeKindDto::Line,
            ShapeKind::Freehand => ShapeKindDto::Freehand,
        }
    }
}

impl From<&Shape> for ShapeDto {
    fn from(shape: &Shape) -> Self {
        Self {
            id: shape.id().to_string(),
            r#type: shape.kind().into(),
            points: shape
                .points()
                .iter()
                .map(|p| PointDto { x: p.x, y: p.y })
                .collect(),
            color: shape.color().to_string(),
            stroke_width: shape.stroke_width(),
        }
    }
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::Host => RoleDto::Host,
            Role::Viewer => RoleDto::Viewer,
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            host: room.host.as_str().to_string(),
            viewers: room.viewers.len(),
            shapes: room.shapes.len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<IceServer> for IceServerDto {
    fn from(server: IceServer) -> Self {
        Self {
            urls: server.urls,
            username: server.username,
            credential: server.credential,
        }
    }
}

impl From<IceServerSet> for IceServersDto {
    fn from(set: IceServerSet) -> Self {
        Self {
            ice_servers: set.ice_servers.into_iter().map(Into::into).collect(),
            ice_candidate_pool_size: set.ice_candidate_pool_size,
        }
    }
}
