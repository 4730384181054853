use std::{env, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{geometry::Point, ExampleData};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options passed through to the directions provider without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteOptions {
    pub mode: TravelMode,
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
    pub avoid_ferries: bool,
}

/// What is sent to a directions provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: Point,
    pub destination: Point,
    #[serde(default)]
    pub waypoints: Vec<Point>,
    #[serde(default)]
    pub options: RouteOptions,
    /// Ask the provider to reorder waypoints for the shortest total path.
    #[serde(default)]
    pub optimize_waypoints: bool,
}

impl RouteRequest {
    pub fn new(origin: Point, destination: Point) -> Self {
        Self {
            origin,
            destination,
            waypoints: vec![],
            options: RouteOptions::default(),
            optimize_waypoints: false,
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        std::iter::once(&self.origin)
            .chain(self.waypoints.iter())
            .chain(std::iter::once(&self.destination))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub distance_meters: f64,
    pub travel_time_seconds: u64,
    /// For display only.
    pub polyline: Vec<Point>,
    pub estimated_cost: f64,
    pub currency: String,
    /// Indices into the requested waypoints in the order they are visited.
    pub waypoint_order: Vec<usize>,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

impl ExampleData for RouteResult {
    fn example_data() -> Self {
        RouteResult {
            distance_meters: 12000.0,
            travel_time_seconds: 1680,
            polyline: vec![Point::new(17.385, 78.4867), Point::new(17.4126, 78.4392)],
            estimated_cost: 120.0,
            currency: "INR".to_owned(),
            waypoint_order: vec![],
        }
    }
}

pub const DEFAULT_MINIMUM_FARE: f64 = 50.0;
pub const DEFAULT_PER_KM_RATE: f64 = 10.0;
pub const DEFAULT_CURRENCY: &str = "INR";

/// Linear rate table turning a route distance into an estimated cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    pub minimum_fare: f64,
    pub per_km_rate: f64,
    pub currency: String,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            minimum_fare: DEFAULT_MINIMUM_FARE,
            per_km_rate: DEFAULT_PER_KM_RATE,
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }
}

impl Tariff {
    pub fn new<S: Into<String>>(minimum_fare: f64, per_km_rate: f64, currency: S) -> Self {
        Self {
            minimum_fare,
            per_km_rate,
            currency: currency.into(),
        }
    }

    /// Reads `TARIFF_MINIMUM_FARE`, `TARIFF_PER_KM_RATE` and `TARIFF_CURRENCY`.
    /// Unset variables fall back to the defaults, unparsable ones yield `None`.
    pub fn from_env() -> Option<Self> {
        let defaults = Self::default();
        let minimum_fare = match env::var("TARIFF_MINIMUM_FARE") {
            Ok(value) => value.trim().parse().ok()?,
            Err(_) => defaults.minimum_fare,
        };
        let per_km_rate = match env::var("TARIFF_PER_KM_RATE") {
            Ok(value) => value.trim().parse().ok()?,
            Err(_) => defaults.per_km_rate,
        };
        let currency = env::var("TARIFF_CURRENCY").unwrap_or(defaults.currency);
        Some(Self {
            minimum_fare,
            per_km_rate,
            currency,
        })
    }

    /// `max(minimum_fare, distance_km * per_km_rate)`
    pub fn fare_for(&self, distance_meters: f64) -> f64 {
        let distance_km = distance_meters / 1000.0;
        self.minimum_fare.max(distance_km * self.per_km_rate)
    }
}
