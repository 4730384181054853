//! Point-in-zone queries.
//!
//! Containment uses the even-odd rule on the planar (longitude, latitude)
//! projection of each ring. Points on an edge or vertex are outside.

use model::{
    geometry::{Point, Ring},
    zone::ServiceZone,
};
use utility::id::Id;

/// Tolerance for the edge test, as a cross product in square degrees.
const EDGE_EPSILON: f64 = 1e-12;

pub fn ring_contains(ring: &Ring, point: &Point) -> bool {
    if ring.len() < 3 {
        return false;
    }
    match ring.bounding_box() {
        Some(bbox) if bbox.contains(point) => {}
        _ => return false,
    }
    if ring.edges().any(|(a, b)| on_segment(point, a, b)) {
        return false;
    }

    let (x, y) = (point.longitude, point.latitude);
    ring.edges().fold(false, |inside, (a, b)| {
        let (xi, yi) = (a.longitude, a.latitude);
        let (xj, yj) = (b.longitude, b.latitude);
        let crosses = (yi > y) != (yj > y)
            && x < (xj - xi) * (y - yi) / (yj - yi) + xi;
        inside ^ crosses
    })
}

fn on_segment(point: &Point, a: &Point, b: &Point) -> bool {
    let cross = (b.longitude - a.longitude) * (point.latitude - a.latitude)
        - (b.latitude - a.latitude) * (point.longitude - a.longitude);
    if cross.abs() > EDGE_EPSILON {
        return false;
    }
    let within = |value: f64, bound1: f64, bound2: f64| {
        value >= bound1.min(bound2) - EDGE_EPSILON
            && value <= bound1.max(bound2) + EDGE_EPSILON
    };
    within(point.longitude, a.longitude, b.longitude)
        && within(point.latitude, a.latitude, b.latitude)
}

/// Ids of all zones whose boundary contains `point`, in iteration order of
/// `zones` (registry insertion order when fed from a registry).
pub fn zones_containing<'a, I>(point: &Point, zones: I) -> Vec<Id<ServiceZone>>
where
    I: IntoIterator<Item = &'a ServiceZone>,
{
    zones
        .into_iter()
        .filter(|zone| ring_contains(&zone.boundary, point))
        .map(|zone| zone.id)
        .collect()
}

/// Containing zones that are active and offer `service`.
pub fn eligible_zones<'a, I>(
    point: &Point,
    zones: I,
    service: &str,
) -> Vec<Id<ServiceZone>>
where
    I: IntoIterator<Item = &'a ServiceZone>,
{
    zones_containing(
        point,
        zones
            .into_iter()
            .filter(|zone| zone.active && zone.offers(service)),
    )
}
