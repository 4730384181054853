use serde::{Deserialize, Serialize};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
    pub overview_polyline: EncodedPolyline,
    /// Visiting order of the requested waypoints when optimized.
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsLeg {
    pub distance: TextValue<f64>,
    pub duration: TextValue<u64>,
}

/// A measured value together with its human readable rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue<T> {
    pub text: String,
    pub value: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

impl DirectionsRoute {
    pub fn distance_meters(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance.value).sum()
    }

    pub fn duration_seconds(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SAMPLE: &str = r#"{
        "geocoded_waypoints": [],
        "routes": [
            {
                "bounds": {},
                "legs": [
                    {
                        "distance": { "text": "7.4 km", "value": 7412 },
                        "duration": { "text": "18 mins", "value": 1071 },
                        "steps": []
                    },
                    {
                        "distance": { "text": "4.6 km", "value": 4588 },
                        "duration": { "text": "12 mins", "value": 702 },
                        "steps": []
                    }
                ],
                "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
                "summary": "Road No. 12",
                "warnings": [],
                "waypoint_order": [0]
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn legs_are_summed() {
        let response: DirectionsResponse = serde_json::from_str(SAMPLE).unwrap();
        let route = &response.routes[0];
        assert_relative_eq!(route.distance_meters(), 12000.0);
        assert_eq!(route.duration_seconds(), 1773);
        assert_eq!(route.waypoint_order, vec![0]);
    }
}
