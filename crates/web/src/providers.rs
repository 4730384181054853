use std::sync::Arc;

use async_trait::async_trait;
use google_maps::{
    client::{GoogleMapsClient, GoogleMapsCredentials},
    directions::GoogleDirections,
    geocoding::GoogleGeocoder,
    ApiError,
};
use model::{
    geocode::{GeocodeCandidate, RegionBias},
    route::RouteRequest,
};
use service_zones::{
    geocoding::Geocoder,
    routing::{DirectionsProvider, ProviderRoute},
    ProviderError,
};

pub type DynGeocoder = Arc<dyn Geocoder>;
pub type DynDirections = Arc<dyn DirectionsProvider>;

/// Stands in for a provider when no credentials were configured, so zone
/// management keeps working without one.
pub struct Unconfigured;

impl Unconfigured {
    fn error() -> ProviderError {
        ProviderError::Other("no maps provider configured (set GOOGLE_MAPS_API_KEY)".to_owned())
    }
}

#[async_trait]
impl Geocoder for Unconfigured {
    async fn geocode(
        &self,
        _query: &str,
        _bias: &RegionBias,
    ) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        Err(Self::error())
    }
}

#[async_trait]
impl DirectionsProvider for Unconfigured {
    async fn directions(
        &self,
        _request: &RouteRequest,
    ) -> Result<Option<ProviderRoute>, ProviderError> {
        Err(Self::error())
    }
}

/// Google providers when credentials are present, [`Unconfigured`] otherwise.
pub fn from_env() -> Result<(DynGeocoder, DynDirections), ApiError> {
    match GoogleMapsCredentials::from_env() {
        Some(credentials) => {
            log::info!("Using Google Maps for geocoding and directions.");
            let client = Arc::new(GoogleMapsClient::new(&credentials)?);
            Ok((
                Arc::new(GoogleGeocoder::new(client.clone())),
                Arc::new(GoogleDirections::new(client)),
            ))
        }
        None => {
            log::warn!("GOOGLE_MAPS_API_KEY not set, geocoding and directions are disabled.");
            Ok((Arc::new(Unconfigured), Arc::new(Unconfigured)))
        }
    }
}
