use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use model::{
    geometry::Point,
    route::{RouteOptions, RouteRequest, RouteResult, Tariff},
};

use crate::{
    supersede::LatestRequest, GeometryError, ProviderError, ZoneError, ZoneResult,
};

/// Raw route as reported by a directions provider, before pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRoute {
    /// Sum over all legs.
    pub distance_meters: f64,
    pub duration_seconds: u64,
    pub polyline: Vec<Point>,
    pub waypoint_order: Vec<usize>,
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// `Ok(None)` when the provider knows no path between the points.
    async fn directions(
        &self,
        request: &RouteRequest,
    ) -> Result<Option<ProviderRoute>, ProviderError>;
}

#[async_trait]
impl<D: DirectionsProvider + ?Sized> DirectionsProvider for Arc<D> {
    async fn directions(
        &self,
        request: &RouteRequest,
    ) -> Result<Option<ProviderRoute>, ProviderError> {
        (**self).directions(request).await
    }
}

/// Plans priced routes. A new plan supersedes the one in flight.
pub struct RoutePlanner<D> {
    provider: D,
    tariff: Tariff,
    timeout: Option<Duration>,
    latest: LatestRequest,
}

impl<D: DirectionsProvider> RoutePlanner<D> {
    pub fn new(provider: D) -> Self {
        Self {
            provider,
            tariff: Tariff::default(),
            timeout: None,
            latest: LatestRequest::default(),
        }
    }

    pub fn with_tariff(mut self, tariff: Tariff) -> Self {
        self.tariff = tariff;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    /// Plans a route from `origin` to `destination` through `waypoints`.
    /// Waypoints are reordered by the provider when there are any.
    pub async fn plan(
        &self,
        origin: Point,
        destination: Point,
        waypoints: Vec<Point>,
        options: Option<RouteOptions>,
    ) -> ZoneResult<RouteResult> {
        let mut request = RouteRequest::new(origin, destination)
            .with_waypoints(waypoints)
            .with_options(options.unwrap_or_default());
        request.optimize_waypoints = !request.waypoints.is_empty();
        self.plan_request(request).await
    }

    pub async fn plan_request(&self, request: RouteRequest) -> ZoneResult<RouteResult> {
        if let Some(point) = request.points().find(|point| !point.is_valid()) {
            return Err(GeometryError::InvalidPoint(*point).into());
        }

        log::debug!(
            "planning route with {} waypoints ({})",
            request.waypoints.len(),
            request.options.mode
        );
        let route = self
            .latest
            .run(self.timeout, self.provider.directions(&request))
            .await?
            .ok_or(ZoneError::NoRoute)?;
        Ok(self.quote(route))
    }

    /// Prices a provider route with the configured tariff.
    pub fn quote(&self, route: ProviderRoute) -> RouteResult {
        RouteResult {
            estimated_cost: self.tariff.fare_for(route.distance_meters),
            currency: self.tariff.currency.clone(),
            distance_meters: route.distance_meters,
            travel_time_seconds: route.duration_seconds,
            polyline: route.polyline,
            waypoint_order: route.waypoint_order,
        }
    }

    pub fn cancel_pending(&self) {
        self.latest.cancel();
    }
}
