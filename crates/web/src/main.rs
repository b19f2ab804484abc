use std::sync::Arc;

use busradar::client::BusradarClient;
use database::{DatabaseConnectionInfo, PgConnector};
use public_transport::{
    aggregator::Aggregator,
    connection::{Connection, RETRY_INTERVAL},
    memory::MemoryPointRepo,
    points::PointStore,
};
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = WebConfig::from_env().expect("invalid configuration in env.");

    // points
    let connection = match DatabaseConnectionInfo::from_env() {
        Some(info) => Connection::establish(PgConnector::new(info), RETRY_INTERVAL),
        None => {
            log::warn!("no database connection info in env, points are kept in memory.");
            Connection::connected(Arc::new(MemoryPointRepo::new()))
        }
    };
    let points = PointStore::new(connection, config.deletion_mode);

    // live feed
    let busradar = Arc::new(
        BusradarClient::new(config.busradar_url.as_str(), config.provider_timeout)
            .expect("could not build busradar client."),
    );
    let aggregator = Aggregator::new(busradar.clone(), busradar, config.provider_timeout);

    // web server
    let web_future = start_web_server(WebState { aggregator, points }, &config.bind_address);

    if let Err(why) = web_future.await {
        log::error!("web server stopped: {}", why);
    }
}
