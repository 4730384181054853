use std::collections::BTreeSet;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Json, Router,
};
use model::{
    geometry::Point,
    primitive::DrawnPrimitive,
    zone::{ServiceZone, ZoneFilter, ZoneKind, ZoneMetadata, ZonePatch, ZoneStyle},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, schema, schema_no_example, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    Zones,
};

pub(crate) fn routes(state: crate::WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<ServiceZone>))
        .route("/create/schema", get(schema_no_example::<CreateZoneDto>))
        .route("/containing", get(zones_containing))
        .route("/eligible", get(eligible_zones))
        .route("/:id", get(get_zone).patch(update_zone).delete(delete_zone))
        .route("/", get(get_zones).post(create_zone))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Body of a zone creation request.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneDto {
    pub shape: DrawnPrimitive,
    pub name: String,
    pub kind: ZoneKind,
    /// Defaults to the style of `kind`.
    pub style: Option<ZoneStyle>,
    #[serde(default)]
    pub applicable_services: BTreeSet<String>,
    pub active: Option<bool>,
}

impl CreateZoneDto {
    fn into_parts(self) -> (DrawnPrimitive, ZoneMetadata) {
        let metadata = ZoneMetadata::new(self.name, self.kind)
            .with_services(self.applicable_services)
            .also(|metadata| {
                if let Some(style) = self.style {
                    metadata.style = style;
                }
                if let Some(active) = self.active {
                    metadata.active = active;
                }
            });
        (self.shape, metadata)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointQuery {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityQuery {
    latitude: f64,
    longitude: f64,
    service: String,
}

async fn get_zones(
    State(zones): State<Zones>,
    Query(filter): Query<ZoneFilter>,
) -> RouteResult<VecResponse<ServiceZone>> {
    Ok(VecResponse::new(zones.zones(&filter).await).json())
}

async fn get_zone(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Path(id): Path<u64>,
) -> RouteResult<ServiceZone> {
    zones
        .zone(Id::new(id))
        .await
        .map(Json)
        .map_err(|why| RouteErrorResponse::from(why).at(Method::GET, &uri))
}

async fn create_zone(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Json(dto): Json<CreateZoneDto>,
) -> Result<(StatusCode, Json<ServiceZone>), RouteErrorResponse> {
    let (shape, metadata) = dto.into_parts();
    zones
        .create_zone(shape, metadata)
        .await
        .map(|zone| (StatusCode::CREATED, Json(zone)))
        .map_err(|why| RouteErrorResponse::from(why).at(Method::POST, &uri))
}

async fn update_zone(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Path(id): Path<u64>,
    Json(patch): Json<ZonePatch>,
) -> RouteResult<ServiceZone> {
    zones
        .update_zone(Id::new(id), patch)
        .await
        .map(Json)
        .map_err(|why| RouteErrorResponse::from(why).at(Method::PATCH, &uri))
}

async fn delete_zone(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Path(id): Path<u64>,
) -> Result<StatusCode, RouteErrorResponse> {
    zones
        .delete_zone(Id::new(id))
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|why| RouteErrorResponse::from(why).at(Method::DELETE, &uri))
}

async fn zones_containing(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Query(query): Query<PointQuery>,
) -> RouteResult<VecResponse<Id<ServiceZone>>> {
    zones
        .zones_containing(Point::new(query.latitude, query.longitude))
        .await
        .map(|ids| VecResponse::new(ids).json())
        .map_err(|why| RouteErrorResponse::from(why).at(Method::GET, &uri))
}

async fn eligible_zones(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Query(query): Query<EligibilityQuery>,
) -> RouteResult<VecResponse<Id<ServiceZone>>> {
    zones
        .eligible_zones(Point::new(query.latitude, query.longitude), &query.service)
        .await
        .map(|ids| VecResponse::new(ids).json())
        .map_err(|why| RouteErrorResponse::from(why).at(Method::GET, &uri))
}
