use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Polygon,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Circle => write!(f, "circle"),
            Self::Rectangle => write!(f, "rectangle"),
            Self::Polygon => write!(f, "polygon"),
        }
    }
}

/// Raw shape as emitted by a drawing surface, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawnPrimitive {
    Circle {
        center: Point,
        #[serde(rename = "radiusMeters")]
        radius_meters: f64,
    },
    Rectangle {
        corner1: Point,
        corner2: Point,
    },
    Polygon {
        vertices: Vec<Point>,
    },
}

impl DrawnPrimitive {
    pub fn circle(center: Point, radius_meters: f64) -> Self {
        Self::Circle {
            center,
            radius_meters,
        }
    }

    pub fn rectangle(corner1: Point, corner2: Point) -> Self {
        Self::Rectangle { corner1, corner2 }
    }

    pub fn polygon(vertices: Vec<Point>) -> Self {
        Self::Polygon { vertices }
    }

    pub fn shape_kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Polygon { .. } => ShapeKind::Polygon,
        }
    }
}
