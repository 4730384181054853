use std::sync::Arc;

use async_trait::async_trait;
use model::geocode::{GeocodeCandidate, RegionBias};
use service_zones::{geocoding::Geocoder, ProviderError};

use crate::{
    client::GoogleMapsClient,
    model::{check_status, geocode::GeocodeResponse, Outcome},
    ApiError,
};

/// Forward geocoding through the Geocoding API.
pub struct GoogleGeocoder {
    client: Arc<GoogleMapsClient>,
}

impl GoogleGeocoder {
    pub fn new(client: Arc<GoogleMapsClient>) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        query: &str,
        bias: &RegionBias,
    ) -> Result<Vec<GeocodeCandidate>, ApiError> {
        let response: GeocodeResponse = self
            .client
            .get("geocode/json", &geocode_params(query, bias))
            .await?;

        match check_status(&response.status, response.error_message.as_deref())? {
            Outcome::Empty => Ok(vec![]),
            Outcome::Results => Ok(response
                .results
                .into_iter()
                .map(|result| result.to_model())
                .collect()),
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(
        &self,
        query: &str,
        bias: &RegionBias,
    ) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        self.search(query, bias).await.map_err(|why| {
            log::warn!("Geocoding failed: {why}");
            why.into()
        })
    }
}

pub fn geocode_params(query: &str, bias: &RegionBias) -> Vec<(&'static str, String)> {
    let mut params = vec![("address", query.to_owned())];
    if let Some(region) = &bias.region {
        params.push(("region", region.to_lowercase()));
    }
    if let Some(country) = &bias.country {
        params.push(("components", format!("country:{}", country.to_uppercase())));
    }
    if let Some(language) = &bias.language {
        params.push(("language", language.clone()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_is_turned_into_query_parameters() {
        let bias = RegionBias::region("IN").with_country("in").with_language("en");
        assert_eq!(
            geocode_params("Banjara Hills", &bias),
            vec![
                ("address", "Banjara Hills".to_owned()),
                ("region", "in".to_owned()),
                ("components", "country:IN".to_owned()),
                ("language", "en".to_owned()),
            ]
        );
        assert_eq!(
            geocode_params("Kiel", &RegionBias::default()),
            vec![("address", "Kiel".to_owned())]
        );
    }
}
