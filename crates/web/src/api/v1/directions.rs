use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on, post},
    Json, Router,
};
use model::{
    geometry::Point,
    route::{RouteOptions, RouteResult as PlannedRoute},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    common::{route_not_found, schema, schema_no_example, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    Zones,
};

pub(crate) fn routes(state: crate::WebState) -> Router {
    Router::new()
        .route("/", post(plan_route))
        .route("/schema", get(schema::<PlannedRoute>))
        .route("/request/schema", get(schema_no_example::<DirectionsDto>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsDto {
    pub origin: Point,
    pub destination: Point,
    #[serde(default)]
    pub waypoints: Vec<Point>,
    pub options: Option<RouteOptions>,
}

async fn plan_route(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Json(dto): Json<DirectionsDto>,
) -> RouteResult<PlannedRoute> {
    zones
        .plan_route(dto.origin, dto.destination, dto.waypoints, dto.options)
        .await
        .map(Json)
        .map_err(|why| RouteErrorResponse::from(why).at(Method::POST, &uri))
}
