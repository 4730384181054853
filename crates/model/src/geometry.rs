use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

/// Areas below this (in square degrees, roughly 0.01 m² at the equator) are
/// treated as zero.
pub const AREA_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn distance_meters(&self, other: &Point) -> f64 {
        geo::haversine_distance_meters(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Great-circle destination from this point.
    pub fn destination(&self, bearing_deg: f64, distance_m: f64) -> Point {
        let (latitude, longitude) = geo::destination_point(
            self.latitude,
            self.longitude,
            bearing_deg,
            distance_m,
        );
        Point::new(latitude, longitude)
    }

    /// Key used to compare points for exact equality in hash sets.
    /// `+ 0.0` folds negative zero into positive zero.
    fn bits(&self) -> (u64, u64) {
        (
            (self.latitude + 0.0).to_bits(),
            (self.longitude + 0.0).to_bits(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Inclusive on all sides.
    pub fn contains(&self, point: &Point) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

/// Closed boundary of a zone. The last point connects back to the first, the
/// closing point is not repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn distinct_points(&self) -> usize {
        self.points
            .iter()
            .map(Point::bits)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Consecutive vertex pairs including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }

    /// Shoelace area in square degrees (longitude as x, latitude as y).
    /// Positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.longitude * b.latitude - b.longitude * a.latitude)
            .sum::<f64>()
            / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.signed_area().abs() <= AREA_EPSILON
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let init = BoundingBox {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        Some(self.points.iter().fold(init, |bbox, point| BoundingBox {
            south: bbox.south.min(point.latitude),
            west: bbox.west.min(point.longitude),
            north: bbox.north.max(point.latitude),
            east: bbox.east.max(point.longitude),
        }))
    }

    /// Area centroid in degree space, falling back to the vertex mean for
    /// degenerate rings.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let area = self.signed_area();
        if area.abs() <= AREA_EPSILON {
            let n = self.points.len() as f64;
            let (lat, lon) = self.points.iter().fold((0.0, 0.0), |(lat, lon), p| {
                (lat + p.latitude, lon + p.longitude)
            });
            return Some(Point::new(lat / n, lon / n));
        }
        let (cx, cy) = self.edges().fold((0.0, 0.0), |(cx, cy), (a, b)| {
            let cross = a.longitude * b.latitude - b.longitude * a.latitude;
            (
                cx + (a.longitude + b.longitude) * cross,
                cy + (a.latitude + b.latitude) * cross,
            )
        });
        Some(Point::new(cy / (6.0 * area), cx / (6.0 * area)))
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}
