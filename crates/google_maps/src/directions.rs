use std::sync::Arc;

use async_trait::async_trait;
use model::{geometry::Point, route::RouteRequest};
use service_zones::{
    routing::{DirectionsProvider, ProviderRoute},
    ProviderError,
};

use crate::{
    client::GoogleMapsClient,
    model::{check_status, directions::DirectionsResponse, Outcome},
    polyline, ApiError,
};

/// Routing through the Directions API. Only the first suggested route is
/// used.
pub struct GoogleDirections {
    client: Arc<GoogleMapsClient>,
}

impl GoogleDirections {
    pub fn new(client: Arc<GoogleMapsClient>) -> Self {
        Self { client }
    }

    pub async fn route(&self, request: &RouteRequest) -> Result<Option<ProviderRoute>, ApiError> {
        let response: DirectionsResponse = self
            .client
            .get("directions/json", &directions_params(request))
            .await?;

        if check_status(&response.status, response.error_message.as_deref())? == Outcome::Empty {
            return Ok(None);
        }
        let Some(route) = response.routes.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(ProviderRoute {
            distance_meters: route.distance_meters(),
            duration_seconds: route.duration_seconds(),
            polyline: polyline::decode(&route.overview_polyline.points)?,
            waypoint_order: route.waypoint_order,
        }))
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirections {
    async fn directions(
        &self,
        request: &RouteRequest,
    ) -> Result<Option<ProviderRoute>, ProviderError> {
        self.route(request).await.map_err(|why| {
            log::warn!("Directions request failed: {why}");
            why.into()
        })
    }
}

fn lat_lng(point: &Point) -> String {
    format!("{},{}", point.latitude, point.longitude)
}

pub fn directions_params(request: &RouteRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("origin", lat_lng(&request.origin)),
        ("destination", lat_lng(&request.destination)),
        ("mode", request.options.mode.as_str().to_owned()),
    ];

    if !request.waypoints.is_empty() {
        let optimize = request.optimize_waypoints.then_some("optimize:true".to_owned());
        let waypoints = optimize
            .into_iter()
            .chain(request.waypoints.iter().map(lat_lng))
            .collect::<Vec<_>>();
        params.push(("waypoints", waypoints.join("|")));
    }

    let avoid = [
        (request.options.avoid_tolls, "tolls"),
        (request.options.avoid_highways, "highways"),
        (request.options.avoid_ferries, "ferries"),
    ]
    .into_iter()
    .filter_map(|(enabled, feature)| enabled.then_some(feature))
    .collect::<Vec<_>>();
    if !avoid.is_empty() {
        params.push(("avoid", avoid.join("|")));
    }

    params
}
