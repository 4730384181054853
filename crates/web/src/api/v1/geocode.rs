use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Router,
};
use model::geocode::{GeocodeCandidate, RegionBias};
use serde::Deserialize;
use service_zones::service::LocatedAddress;

use crate::{
    common::{route_not_found, schema, schema_no_example, RouteErrorResponse, RouteResult, VecResponse, METHOD_FILTER_ALL},
    Zones,
};

pub(crate) fn routes(state: crate::WebState) -> Router {
    Router::new()
        .route("/", get(geocode))
        .route("/locate", get(locate))
        .route("/schema", get(schema::<GeocodeCandidate>))
        .route("/locate/schema", get(schema_no_example::<LocatedAddress>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeQuery {
    query: String,
    region: Option<String>,
    country: Option<String>,
    language: Option<String>,
}

impl GeocodeQuery {
    /// `None` lets the configured default bias apply.
    fn bias(&self) -> Option<RegionBias> {
        if self.region.is_none() && self.country.is_none() && self.language.is_none() {
            return None;
        }
        Some(RegionBias {
            region: self.region.clone(),
            country: self.country.clone(),
            language: self.language.clone(),
        })
    }
}

async fn geocode(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Query(params): Query<GeocodeQuery>,
) -> RouteResult<VecResponse<GeocodeCandidate>> {
    let bias = params.bias();
    zones
        .geocode(&params.query, bias.as_ref())
        .await
        .map(|candidates| VecResponse::new(candidates).json())
        .map_err(|why| RouteErrorResponse::from(why).at(Method::GET, &uri))
}

/// Geocodes and reports which zones each candidate falls into.
async fn locate(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Query(params): Query<GeocodeQuery>,
) -> RouteResult<VecResponse<LocatedAddress>> {
    let bias = params.bias();
    zones
        .locate_address(&params.query, bias.as_ref())
        .await
        .map(|located| VecResponse::new(located).json())
        .map_err(|why| RouteErrorResponse::from(why).at(Method::GET, &uri))
}
