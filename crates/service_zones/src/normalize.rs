//! Conversion of drawn shapes into canonical rings.

use std::f64::consts::PI;

use model::{
    geometry::{Point, Ring},
    primitive::DrawnPrimitive,
};
use utility::geo;

use crate::GeometryError;

/// Number of points a circle is sampled into.
pub const CIRCLE_SAMPLES: usize = 32;

/// Half the earth's circumference. Circles at least this large wrap onto
/// themselves.
pub const MAX_RADIUS_METERS: f64 = PI * geo::EARTH_RADIUS_M;

/// Rejects primitives that have no meaningful ring: out-of-range coordinates,
/// non-positive or oversized radii, rectangles whose corners coincide, and
/// circles or rectangles that would cross the antimeridian or reach a pole.
/// Containment works on the planar (longitude, latitude) projection, which
/// can not represent either of the latter.
///
/// Rectangles spanning more than 180° of longitude are read as drawn across
/// the antimeridian.
pub fn validate_primitive(primitive: &DrawnPrimitive) -> Result<(), GeometryError> {
    match primitive {
        DrawnPrimitive::Circle {
            center,
            radius_meters,
        } => {
            ensure_valid(center)?;
            let radius = *radius_meters;
            if !radius.is_finite() || radius <= 0.0 {
                return Err(GeometryError::NonPositiveRadius(radius));
            }
            if radius >= MAX_RADIUS_METERS {
                return Err(GeometryError::RadiusTooLarge(radius));
            }
            if radius >= distance_to_nearest_pole(center) {
                return Err(GeometryError::ReachesPole);
            }
            if crosses_antimeridian(&circle_ring(*center, radius)) {
                return Err(GeometryError::CrossesAntimeridian);
            }
        }
        DrawnPrimitive::Rectangle { corner1, corner2 } => {
            ensure_valid(corner1)?;
            ensure_valid(corner2)?;
            if corner1 == corner2 {
                return Err(GeometryError::IdenticalCorners(*corner1));
            }
            if corner1.latitude.abs() >= 90.0 || corner2.latitude.abs() >= 90.0 {
                return Err(GeometryError::ReachesPole);
            }
            if (corner1.longitude - corner2.longitude).abs() > 180.0 {
                return Err(GeometryError::CrossesAntimeridian);
            }
        }
        DrawnPrimitive::Polygon { vertices } => {
            vertices.iter().try_for_each(ensure_valid)?;
        }
    }
    Ok(())
}

fn ensure_valid(point: &Point) -> Result<(), GeometryError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(GeometryError::InvalidPoint(*point))
    }
}

fn distance_to_nearest_pole(point: &Point) -> f64 {
    geo::to_radians(90.0 - point.latitude.abs()) * geo::EARTH_RADIUS_M
}

/// Whether any edge jumps across the ±180° meridian.
fn crosses_antimeridian(ring: &Ring) -> bool {
    ring.edges().any(|(a, b)| (a.longitude - b.longitude).abs() > 180.0)
}

/// Turns a primitive into a ring. Assumes the primitive passed
/// [`validate_primitive`]; distinctness and area are checked on insert.
pub fn normalize(primitive: DrawnPrimitive) -> Ring {
    match primitive {
        DrawnPrimitive::Polygon { vertices } => Ring::new(vertices),
        DrawnPrimitive::Rectangle { corner1, corner2 } => {
            rectangle_ring(corner1, corner2)
        }
        DrawnPrimitive::Circle {
            center,
            radius_meters,
        } => circle_ring(center, radius_meters),
    }
}

/// Axis-aligned corners, clockwise starting at north-east.
fn rectangle_ring(corner1: Point, corner2: Point) -> Ring {
    let north = corner1.latitude.max(corner2.latitude);
    let south = corner1.latitude.min(corner2.latitude);
    let east = corner1.longitude.max(corner2.longitude);
    let west = corner1.longitude.min(corner2.longitude);
    Ring::new(vec![
        Point::new(north, east),
        Point::new(south, east),
        Point::new(south, west),
        Point::new(north, west),
    ])
}

fn circle_ring(center: Point, radius_meters: f64) -> Ring {
    let step = 360.0 / CIRCLE_SAMPLES as f64;
    (0..CIRCLE_SAMPLES)
        .map(|i| center.destination(i as f64 * step, radius_meters))
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use model::zone::{ZoneKind, ZoneMetadata};

    use super::*;
    use crate::{containment::ring_contains, registry::ZoneRegistry, ZoneError};

    #[test]
    fn polygon_is_kept_verbatim() {
        let vertices = vec![
            Point::new(17.0, 78.0),
            Point::new(17.1, 78.2),
            Point::new(16.9, 78.1),
        ];
        let ring = normalize(DrawnPrimitive::polygon(vertices.clone()));
        assert_eq!(ring.points(), &vertices[..]);
    }

    #[test]
    fn rectangle_expands_clockwise_from_north_east() {
        let ring = normalize(DrawnPrimitive::rectangle(
            Point::new(17.0, 78.5),
            Point::new(17.5, 78.0),
        ));
        assert_eq!(
            ring.points(),
            &[
                Point::new(17.5, 78.5),
                Point::new(17.0, 78.5),
                Point::new(17.0, 78.0),
                Point::new(17.5, 78.0),
            ]
        );
        // clockwise means negative shoelace area with longitude as x
        assert!(ring.signed_area() < 0.0);
    }

    #[test]
    fn rectangle_corner_order_does_not_matter() {
        let a = normalize(DrawnPrimitive::rectangle(
            Point::new(1.0, 1.0),
            Point::new(2.0, 3.0),
        ));
        let b = normalize(DrawnPrimitive::rectangle(
            Point::new(2.0, 1.0),
            Point::new(1.0, 3.0),
        ));
        assert_eq!(a, b);
    }

    #[test]
    fn circle_samples_32_points_at_radius() {
        let center = Point::new(17.0, 78.0);
        let ring = normalize(DrawnPrimitive::circle(center, 5000.0));
        assert_eq!(ring.len(), CIRCLE_SAMPLES);
        for point in ring.points() {
            assert_relative_eq!(center.distance_meters(point), 5000.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn circle_starts_due_north() {
        let center = Point::new(17.0, 78.0);
        let ring = normalize(DrawnPrimitive::circle(center, 1000.0));
        let first = ring.points()[0];
        assert!(first.latitude > center.latitude);
        assert_relative_eq!(first.longitude, center.longitude, epsilon = 1e-9);
        // second sample lies east of north (11.25 degrees clockwise)
        assert!(ring.points()[1].longitude > center.longitude);
    }

    #[test]
    fn circle_radii_of_many_sizes_stay_within_tolerance() {
        let center = Point::new(-33.86, 151.21);
        for radius in [1.0, 250.0, 5000.0, 80_000.0] {
            let ring = normalize(DrawnPrimitive::circle(center, radius));
            assert_eq!(ring.len(), 32);
            for point in ring.points() {
                assert_relative_eq!(
                    center.distance_meters(point),
                    radius,
                    max_relative = 1e-6
                );
            }
        }
    }

    #[test]
    fn validation_rejects_degenerate_primitives() {
        let center = Point::new(17.0, 78.0);
        assert_eq!(
            validate_primitive(&DrawnPrimitive::circle(center, 0.0)),
            Err(GeometryError::NonPositiveRadius(0.0))
        );
        assert_eq!(
            validate_primitive(&DrawnPrimitive::circle(center, -5.0)),
            Err(GeometryError::NonPositiveRadius(-5.0))
        );
        assert!(validate_primitive(&DrawnPrimitive::circle(center, f64::NAN)).is_err());
        assert_eq!(
            validate_primitive(&DrawnPrimitive::rectangle(center, center)),
            Err(GeometryError::IdenticalCorners(center))
        );
        let outside = Point::new(95.0, 78.0);
        assert_eq!(
            validate_primitive(&DrawnPrimitive::polygon(vec![center, outside])),
            Err(GeometryError::InvalidPoint(outside))
        );
        assert!(validate_primitive(&DrawnPrimitive::circle(center, 10.0)).is_ok());
    }

    #[test]
    fn circles_across_the_antimeridian_are_rejected() {
        // Fiji straddles the 180th meridian
        for (center, radius) in [
            (Point::new(-16.5, -179.98), 20_000.0),
            (Point::new(0.0, 179.99), 5000.0),
        ] {
            assert_eq!(
                validate_primitive(&DrawnPrimitive::circle(center, radius)),
                Err(GeometryError::CrossesAntimeridian)
            );
        }
    }

    #[test]
    fn circles_near_the_antimeridian_contain_their_centre() {
        let center = Point::new(-16.5, 178.0);
        let circle = DrawnPrimitive::circle(center, 20_000.0);
        assert!(validate_primitive(&circle).is_ok());
        assert!(ring_contains(&normalize(circle), &center));
    }

    #[test]
    fn circles_around_a_pole_are_rejected() {
        for center in [Point::new(89.99, 0.0), Point::new(-89.99, 120.0)] {
            assert_eq!(
                validate_primitive(&DrawnPrimitive::circle(center, 5000.0)),
                Err(GeometryError::ReachesPole)
            );
        }
        assert_eq!(
            validate_primitive(&DrawnPrimitive::circle(Point::new(90.0, 0.0), 1.0)),
            Err(GeometryError::ReachesPole)
        );
    }

    #[test]
    fn circles_near_a_pole_contain_their_centre() {
        let center = Point::new(89.0, 10.0);
        let circle = DrawnPrimitive::circle(center, 5000.0);
        assert!(validate_primitive(&circle).is_ok());
        assert!(ring_contains(&normalize(circle), &center));
    }

    #[test]
    fn radius_is_bounded_by_half_the_circumference() {
        let center = Point::new(17.0, 78.0);
        assert_eq!(
            validate_primitive(&DrawnPrimitive::circle(center, 25_000_000.0)),
            Err(GeometryError::RadiusTooLarge(25_000_000.0))
        );
        assert_eq!(
            validate_primitive(&DrawnPrimitive::circle(center, MAX_RADIUS_METERS)),
            Err(GeometryError::RadiusTooLarge(MAX_RADIUS_METERS))
        );
        // the pole is closer than half the circumference
        assert_eq!(
            validate_primitive(&DrawnPrimitive::circle(center, 9_000_000.0)),
            Err(GeometryError::ReachesPole)
        );
    }

    #[test]
    fn accepted_circles_contain_their_centre_once_stored() {
        let mut registry = ZoneRegistry::new();
        for (center, radius) in [
            (Point::new(17.0, 78.0), 5000.0),
            (Point::new(-33.86, 151.21), 80_000.0),
            (Point::new(64.0, -21.0), 200_000.0),
            (Point::new(0.0, 179.0), 5000.0),
        ] {
            let circle = DrawnPrimitive::circle(center, radius);
            assert!(validate_primitive(&circle).is_ok(), "{center:?}");
            let zone = registry
                .create(normalize(circle), ZoneMetadata::new("z", ZoneKind::Delivery))
                .unwrap();
            assert!(registry.zones_containing(&center).contains(&zone.id), "{center:?}");
        }
    }

    #[test]
    fn rectangles_reaching_a_pole_are_rejected() {
        assert_eq!(
            validate_primitive(&DrawnPrimitive::rectangle(
                Point::new(80.0, 10.0),
                Point::new(90.0, 20.0),
            )),
            Err(GeometryError::ReachesPole)
        );
        assert_eq!(
            validate_primitive(&DrawnPrimitive::rectangle(
                Point::new(-90.0, 10.0),
                Point::new(-80.0, 20.0),
            )),
            Err(GeometryError::ReachesPole)
        );
    }

    #[test]
    fn rectangles_wider_than_half_the_globe_are_rejected() {
        assert_eq!(
            validate_primitive(&DrawnPrimitive::rectangle(
                Point::new(-17.0, 179.0),
                Point::new(-16.0, -179.0),
            )),
            Err(GeometryError::CrossesAntimeridian)
        );
        assert!(validate_primitive(&DrawnPrimitive::rectangle(
            Point::new(-17.0, -90.0),
            Point::new(-16.0, 90.0),
        ))
        .is_ok());
    }

    #[test]
    fn flat_rectangles_pass_validation_but_not_the_registry() {
        let mut registry = ZoneRegistry::new();
        for flat in [
            DrawnPrimitive::rectangle(Point::new(17.0, 78.0), Point::new(17.0, 79.0)),
            DrawnPrimitive::rectangle(Point::new(17.0, 78.0), Point::new(18.0, 78.0)),
        ] {
            assert!(validate_primitive(&flat).is_ok());
            assert!(matches!(
                registry.create(normalize(flat), ZoneMetadata::new("flat", ZoneKind::Pickup)),
                Err(ZoneError::InvalidGeometry(GeometryError::TooFewPoints { distinct: 2 }))
            ));
        }
        assert!(registry.is_empty());
    }
}
