use serde::{Deserialize, Serialize};

use crate::ApiError;

pub mod directions;
pub mod geocode;

/// Coordinate pair as used throughout the web services.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for ::model::geometry::Point {
    fn from(value: LatLng) -> Self {
        Self::new(value.lat, value.lng)
    }
}

/// How a response with HTTP 200 should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Results,
    Empty,
}

/// Interprets the `status` field every web service response carries.
pub fn check_status(status: &str, message: Option<&str>) -> Result<Outcome, ApiError> {
    match status {
        "OK" => Ok(Outcome::Results),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(Outcome::Empty),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(ApiError::QuotaExceeded {
            status: status.to_owned(),
            message: message.map(str::to_owned),
        }),
        _ => Err(ApiError::Status {
            status: status.to_owned(),
            message: message.map(str::to_owned),
        }),
    }
}
