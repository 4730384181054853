pub use crate::common::RouteResult;

use std::net::SocketAddr;

use axum::{extract::FromRef, routing::get_service, Router};
use providers::{DynDirections, DynGeocoder};
use service_zones::service::ZoneService;
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod api;
pub mod common;
pub mod config;
pub mod providers;

pub type Zones = ZoneService<DynGeocoder, DynDirections>;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub zones: Zones,
}

pub async fn start_web_server(state: WebState, bind_address: SocketAddr) -> std::io::Result<()> {
    let routes = Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router())
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(bind_address).await?;
    log::info!("Listening on {bind_address}.");
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

/// The console frontend, if one is deployed next to the binary.
fn static_content_router() -> Router {
    Router::new().nest_service(
        "/",
        get_service(
            ServeDir::new("./resources/www/")
                .not_found_service(ServeFile::new("./resources/www/error404.html")),
        ),
    )
}
