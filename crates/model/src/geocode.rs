use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{geometry::Point, ExampleData};

/// One typed fragment of a resolved address, e.g. a locality or postal code.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponent {
    pub text: String,
    pub short_text: Option<String>,
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, component_type: &str) -> bool {
        self.types.iter().any(|t| t == component_type)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub coordinate: Point,
    /// Provider specific, only meaningful when talking to the same provider again.
    pub external_place_id: String,
    pub address_components: Vec<AddressComponent>,
    pub location_type: Option<String>,
}

impl GeocodeCandidate {
    pub fn component(&self, component_type: &str) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|component| component.has_type(component_type))
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.component("postal_code")
            .map(|component| component.text.as_str())
    }
}

impl ExampleData for GeocodeCandidate {
    fn example_data() -> Self {
        GeocodeCandidate {
            formatted_address: "Road No. 12, Banjara Hills, Hyderabad, Telangana 500034, India"
                .to_owned(),
            coordinate: Point::new(17.4126, 78.4392),
            external_place_id: "ChIJx9Lr6tqZyzsRWa1sP3-Ke9A".to_owned(),
            address_components: vec![
                AddressComponent {
                    text: "Hyderabad".to_owned(),
                    short_text: Some("Hyderabad".to_owned()),
                    types: vec!["locality".to_owned(), "political".to_owned()],
                },
                AddressComponent {
                    text: "500034".to_owned(),
                    short_text: None,
                    types: vec!["postal_code".to_owned()],
                },
            ],
            location_type: Some("GEOMETRIC_CENTER".to_owned()),
        }
    }
}

/// Hints forwarded to the provider to prefer or restrict results to an area.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionBias {
    /// Two letter ccTLD used to bias (not restrict) results.
    pub region: Option<String>,
    /// ISO 3166-1 country code results are restricted to.
    pub country: Option<String>,
    pub language: Option<String>,
}

impl RegionBias {
    pub fn region<S: Into<String>>(region: S) -> Self {
        Self {
            region: Some(region.into()),
            ..Default::default()
        }
    }

    pub fn with_country<S: Into<String>>(mut self, country: S) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }
}
