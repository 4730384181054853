use axum::{
    extract::{OriginalUri, Path, State},
    http::Method,
    routing::{get, on, patch, post},
    Json, Router,
};
use model::{
    primitive::{DrawnPrimitive, ShapeKind},
    zone::{ServiceZone, ZoneKind, ZonePatch},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use service_zones::{interaction::EditorState, ZoneResult};
use utility::id::Id;

use crate::{
    common::{route_not_found, schema_no_example, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    Zones,
};

pub(crate) fn routes(state: crate::WebState) -> Router {
    Router::new()
        .route("/", get(editor_state))
        .route("/schema", get(schema_no_example::<EditorState>))
        .route("/draw", post(begin_draw))
        .route("/draw/complete", post(gesture_complete))
        .route("/draw/cancel", post(cancel_draw))
        .route("/select/:id", post(select))
        .route("/deselect", post(deselect))
        .route("/edit", post(edit))
        .route("/edit/begin", post(begin_edit))
        .route("/edit/commit", post(commit_edit))
        .route("/edit/cancel", post(cancel_edit))
        .route("/selected", patch(update_selected))
        .route("/zones/:id", axum::routing::delete(delete))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BeginDrawDto {
    pub shape: ShapeKind,
    pub zone_kind: ZoneKind,
}

fn respond<T>(result: ZoneResult<T>, method: Method, uri: &OriginalUri) -> RouteResult<T> {
    result
        .map(Json)
        .map_err(|why| RouteErrorResponse::from(why).at(method, uri))
}

async fn editor_state(State(zones): State<Zones>) -> Json<EditorState> {
    Json(zones.editor_state().await)
}

async fn begin_draw(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Json(dto): Json<BeginDrawDto>,
) -> RouteResult<EditorState> {
    respond(zones.begin_draw(dto.shape, dto.zone_kind).await, Method::POST, &uri)
}

async fn gesture_complete(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Json(primitive): Json<DrawnPrimitive>,
) -> RouteResult<ServiceZone> {
    respond(zones.gesture_complete(primitive).await, Method::POST, &uri)
}

async fn cancel_draw(uri: OriginalUri, State(zones): State<Zones>) -> RouteResult<EditorState> {
    respond(zones.cancel_draw().await, Method::POST, &uri)
}

async fn select(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Path(id): Path<u64>,
) -> RouteResult<EditorState> {
    respond(zones.select(Id::new(id)).await, Method::POST, &uri)
}

async fn deselect(State(zones): State<Zones>) -> Json<EditorState> {
    Json(zones.deselect().await)
}

async fn edit(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Json(primitive): Json<DrawnPrimitive>,
) -> RouteResult<ServiceZone> {
    respond(zones.edit(primitive).await, Method::POST, &uri)
}

async fn begin_edit(uri: OriginalUri, State(zones): State<Zones>) -> RouteResult<EditorState> {
    respond(zones.begin_edit().await, Method::POST, &uri)
}

async fn commit_edit(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Json(primitive): Json<DrawnPrimitive>,
) -> RouteResult<ServiceZone> {
    respond(zones.commit_edit(primitive).await, Method::POST, &uri)
}

async fn cancel_edit(uri: OriginalUri, State(zones): State<Zones>) -> RouteResult<EditorState> {
    respond(zones.cancel_edit().await, Method::POST, &uri)
}

async fn update_selected(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Json(patch): Json<ZonePatch>,
) -> RouteResult<ServiceZone> {
    respond(zones.update_selected(patch).await, Method::PATCH, &uri)
}

async fn delete(
    uri: OriginalUri,
    State(zones): State<Zones>,
    Path(id): Path<u64>,
) -> RouteResult<EditorState> {
    respond(
        zones.delete_zone_with_state(Id::new(id)).await,
        Method::DELETE,
        &uri,
    )
}
