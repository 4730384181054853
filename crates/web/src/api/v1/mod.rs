use axum::{routing::on, Router};

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

mod directions;
mod editor;
mod geocode;
mod zones;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .nest_service("/zones", zones::routes(state.clone()))
        .nest_service("/editor", editor::routes(state.clone()))
        .nest_service("/geocode", geocode::routes(state.clone()))
        .nest_service("/directions", directions::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
