pub use crate::common::RouteResult;

use axum::{extract::FromRef, routing::on, Router};
use common::{route_not_found, METHOD_FILTER_ALL};
use public_transport::{aggregator::Aggregator, points::PointStore};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod common;
pub mod config;
mod legacy;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub aggregator: Aggregator,
    pub points: PointStore,
}

pub fn routes(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state.clone()))
        .merge(legacy::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(state: WebState, bind_address: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    log::info!("listening on {}.", listener.local_addr()?);
    axum::serve(listener, routes(state).into_make_service()).await?;

    Ok(())
}
