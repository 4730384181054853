use std::error::Error;

use database::{writer::run_zone_writer, DatabaseConnectionInfo, PgDatabase};
use model::route::Tariff;
use service_zones::{
    geocoding::GeocodingAdapter, interaction::InteractionMachine, lifecycle::event_channel,
    registry::ZoneRegistry, routing::RoutePlanner, service::ZoneService,
};
use tracing_subscriber::EnvFilter;
use web::{config::WebConfig, providers, start_web_server, WebState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )?;

    let config = WebConfig::from_env().ok_or("invalid web configuration in env.")?;
    let tariff = Tariff::from_env().ok_or("invalid tariff configuration in env.")?;

    // registry, persisted through the database if one is configured
    let mut registry = ZoneRegistry::new();
    let mut persisted = vec![];
    match DatabaseConnectionInfo::from_env() {
        Some(database_connection_info) => {
            let database = PgDatabase::connect(database_connection_info).await?;
            persisted = database.load_zones().await?;
            let (lifecycle, events) = event_channel();
            registry.add_observer(lifecycle);
            tokio::spawn(run_zone_writer(database, events));
        }
        None => log::warn!("No database configured, zones are kept in memory only."),
    }
    registry.restore(persisted);

    // providers
    let (geocoder, directions) = providers::from_env()?;
    let geocoder = GeocodingAdapter::new(geocoder)
        .with_default_bias(config.region_bias.clone())
        .with_timeout(config.provider_timeout());
    let planner = RoutePlanner::new(directions)
        .with_tariff(tariff)
        .with_timeout(config.provider_timeout());

    // web server
    let zones = ZoneService::new(InteractionMachine::new(registry), geocoder, planner);
    start_web_server(WebState { zones }, config.bind_address).await?;

    Ok(())
}
