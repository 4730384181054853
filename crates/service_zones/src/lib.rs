use std::{error, fmt, sync::Arc};

use model::{
    geometry::Point,
    primitive::ShapeKind,
    zone::ServiceZone,
};
use utility::id::Id;

pub mod containment;
pub mod geocoding;
pub mod interaction;
pub mod lifecycle;
pub mod normalize;
pub mod registry;
pub mod render;
pub mod routing;
pub mod service;
mod supersede;

/// Why a shape or ring was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    InvalidPoint(Point),
    NonPositiveRadius(f64),
    /// Radius of at least half the earth's circumference.
    RadiusTooLarge(f64),
    IdenticalCorners(Point),
    /// The shape would wrap across the ±180° meridian.
    CrossesAntimeridian,
    /// The shape would touch or enclose a pole.
    ReachesPole,
    TooFewPoints { distinct: usize },
    ZeroArea,
    ShapeMismatch { expected: ShapeKind, actual: ShapeKind },
}

impl error::Error for GeometryError {}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidPoint(point) => write!(
                f,
                "coordinate out of range: ({}, {})",
                point.latitude, point.longitude
            ),
            Self::NonPositiveRadius(radius) => {
                write!(f, "circle radius must be positive, got {radius}")
            }
            Self::RadiusTooLarge(radius) => write!(
                f,
                "circle radius {radius} m reaches half the earth's circumference"
            ),
            Self::CrossesAntimeridian => write!(f, "shape crosses the antimeridian"),
            Self::ReachesPole => write!(f, "shape reaches a pole"),
            Self::IdenticalCorners(point) => write!(
                f,
                "rectangle corners are identical: ({}, {})",
                point.latitude, point.longitude
            ),
            Self::TooFewPoints { distinct } => {
                write!(f, "a ring needs at least 3 distinct points, got {distinct}")
            }
            Self::ZeroArea => write!(f, "ring encloses no area"),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "expected a {expected}, got a {actual}")
            }
        }
    }
}

/// Failure reported by an external geocoding or directions provider.
#[derive(Debug, Clone)]
pub enum ProviderError {
    Network(Arc<dyn error::Error + Send + Sync>),
    Timeout,
    Quota(String),
    InvalidResponse {
        status: String,
        message: Option<String>,
    },
    Other(String),
}

impl ProviderError {
    pub fn network<E: error::Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Network(Arc::new(why))
    }
}

impl error::Error for ProviderError {}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Network(why) => write!(f, "network error: {why}"),
            Self::Timeout => write!(f, "provider did not answer in time"),
            Self::Quota(message) => write!(f, "provider quota exceeded: {message}"),
            Self::InvalidResponse { status, message } => match message {
                Some(message) => write!(f, "invalid response ({status}): {message}"),
                None => write!(f, "invalid response ({status})"),
            },
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ZoneError {
    InvalidGeometry(GeometryError),
    NotFound(Id<ServiceZone>),
    Provider(ProviderError),
    /// The geocoder understood the query but found nothing.
    NoMatch,
    /// The directions provider found no drivable path.
    NoRoute,
    /// A newer request was issued before this one completed.
    Superseded,
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl ZoneError {
    /// `NoMatch` and `NoRoute` are regular outcomes, not faults.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoMatch | Self::NoRoute)
    }
}

impl error::Error for ZoneError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::InvalidGeometry(why) => Some(why),
            Self::Provider(why) => Some(why),
            _ => None,
        }
    }
}

impl fmt::Display for ZoneError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidGeometry(why) => write!(f, "invalid geometry: {why}"),
            Self::NotFound(id) => write!(f, "zone {id} does not exist"),
            Self::Provider(why) => write!(f, "provider error: {why}"),
            Self::NoMatch => write!(f, "no address matched the query"),
            Self::NoRoute => write!(f, "no route between the given points"),
            Self::Superseded => write!(f, "request was superseded by a newer one"),
            Self::InvalidTransition { state, action } => {
                write!(f, "can not {action} while {state}")
            }
        }
    }
}

impl From<GeometryError> for ZoneError {
    fn from(why: GeometryError) -> Self {
        Self::InvalidGeometry(why)
    }
}

impl From<ProviderError> for ZoneError {
    fn from(why: ProviderError) -> Self {
        Self::Provider(why)
    }
}

pub type ZoneResult<O> = Result<O, ZoneError>;

pub fn not_found_to_none<O>(result: ZoneResult<O>) -> ZoneResult<Option<O>> {
    if let Err(ZoneError::NotFound(_)) = result {
        Ok(None)
    } else {
        result.map(Some)
    }
}

pub mod prelude {
    pub use crate::{
        containment::{eligible_zones, ring_contains, zones_containing},
        geocoding::{Geocoder, GeocodingAdapter},
        interaction::{EditorState, InteractionMachine},
        lifecycle::{event_channel, ChannelLifecycle, ZoneEvent, ZoneLifecycle},
        normalize::{normalize, validate_primitive, CIRCLE_SAMPLES, MAX_RADIUS_METERS},
        registry::{validate_ring, ZoneRegistry},
        render::{RenderAdapter, RenderSurface},
        routing::{DirectionsProvider, ProviderRoute, RoutePlanner},
        service::{LocatedAddress, ZoneService},
        GeometryError, ProviderError, ZoneError, ZoneResult,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_are_not_faults() {
        assert!(ZoneError::NoMatch.is_empty_result());
        assert!(ZoneError::NoRoute.is_empty_result());
        assert!(!ZoneError::Provider(ProviderError::Timeout).is_empty_result());
    }

    #[test]
    fn not_found_maps_to_none() {
        let missing: ZoneResult<u8> = Err(ZoneError::NotFound(Id::new(3)));
        assert!(matches!(not_found_to_none(missing), Ok(None)));
        assert!(matches!(not_found_to_none(Ok(1)), Ok(Some(1))));
        assert!(not_found_to_none::<u8>(Err(ZoneError::NoMatch)).is_err());
    }

    #[test]
    fn errors_render_readable_messages() {
        let error = ZoneError::from(GeometryError::TooFewPoints { distinct: 2 });
        assert_eq!(
            error.to_string(),
            "invalid geometry: a ring needs at least 3 distinct points, got 2"
        );
        let transition = ZoneError::InvalidTransition {
            state: "drawing",
            action: "begin drawing",
        };
        assert_eq!(transition.to_string(), "can not begin drawing while drawing");
    }
}
