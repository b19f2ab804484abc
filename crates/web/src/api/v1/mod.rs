use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Json, Router,
};
use model::{point::GeoPoint, ride::Ride, stop::RankedStop};
use public_transport::StageFailure;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    common::{
        route_not_found, schema_no_example, RouteErrorResponse, RouteResult,
        METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) mod points;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/nearby", get(nearby))
        .route("/nearby/schema", get(schema_no_example::<NearbyDto>))
        .nest_service("/points", points::routes(state.clone()))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct NearbyDto {
    longitude: f64,
    latitude: f64,
    ranked_stops: Vec<RankedStop>,
    nearest_stop_rides: Vec<RideDto>,
    rides_error: Option<StageErrorDto>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RideDto {
    #[serde(flatten)]
    ride: Ride,
    departure_text: Option<String>,
    delay_text: String,
}

impl From<Ride> for RideDto {
    fn from(ride: Ride) -> Self {
        Self {
            departure_text: ride.departure_text(),
            delay_text: ride.delay_text(),
            ride,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
struct StageErrorDto {
    stage: String,
    cause: String,
}

impl From<StageFailure> for StageErrorDto {
    fn from(failure: StageFailure) -> Self {
        Self {
            stage: failure.stage.to_string(),
            cause: failure.cause.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct NearbyQuery {
    longitude: f64,

    latitude: f64,

    /// Caps the number of ranked stops in the response.
    limit: Option<usize>,
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { aggregator, .. }): State<WebState>,
    Query(params): Query<NearbyQuery>,
) -> RouteResult<Json<NearbyDto>> {
    let reference = GeoPoint::checked(params.longitude, params.latitude).ok_or_else(|| {
        RouteErrorResponse::invalid_input(format!(
            "coordinates out of range: longitude {}, latitude {}",
            params.longitude, params.latitude
        ))
        .with_method(&Method::GET)
        .with_uri(original_uri.path())
    })?;

    let departures = aggregator.query(reference).await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;

    let mut ranked_stops = departures.ranked_stops;
    if let Some(limit) = params.limit {
        ranked_stops.truncate(limit);
    }

    Ok(Json(NearbyDto {
        longitude: reference.longitude,
        latitude: reference.latitude,
        ranked_stops,
        nearest_stop_rides: departures
            .nearest_stop_rides
            .into_iter()
            .map(RideDto::from)
            .collect(),
        rides_error: departures.rides_failure.map(StageErrorDto::from),
    }))
}
