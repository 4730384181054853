use model::geocode::{AddressComponent, GeocodeCandidate};
use serde::{Deserialize, Serialize};

use super::LatLng;

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub place_id: String,
    pub geometry: GeocodeGeometry,
    #[serde(default)]
    pub address_components: Vec<GeocodeAddressComponent>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeGeometry {
    pub location: LatLng,
    /// ROOFTOP, RANGE_INTERPOLATED, GEOMETRIC_CENTER or APPROXIMATE
    pub location_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeAddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl GeocodeResult {
    pub fn to_model(self) -> GeocodeCandidate {
        GeocodeCandidate {
            formatted_address: self.formatted_address,
            coordinate: self.geometry.location.into(),
            external_place_id: self.place_id,
            address_components: self
                .address_components
                .into_iter()
                .map(|component| AddressComponent {
                    short_text: (component.short_name != component.long_name)
                        .then_some(component.short_name),
                    text: component.long_name,
                    types: component.types,
                })
                .collect(),
            location_type: self.geometry.location_type,
        }
    }
}
