use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on, post},
    Json, Router,
};
use model::point::{GeoPoint, PointGeometry, StoredPoint};
use public_transport::points::PointMatcher;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{
    common::{route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_points))
        .route("/ready", get(ready))
        .route("/add", post(add_point))
        .route("/delete", post(delete_point))
        .route("/update", post(update_point))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReadyDto {
    ready: bool,
    deletion_mode: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AffectedDto {
    affected: u64,
}

/// Either a GeoJSON point or `{"id": 3}`, depending on the deletion mode. A
/// GeoJSON point that also carries an `id` is still a point.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DeleteRequest {
    Geometry(PointGeometry),
    Id { id: Id<GeoPoint> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateRequest {
    old: PointGeometry,
    new: PointGeometry,
}

fn to_point(geometry: &PointGeometry, uri: &str) -> RouteResult<GeoPoint> {
    geometry.to_point().map_err(|why| {
        RouteErrorResponse::invalid_input(why.to_string())
            .with_method(&Method::POST)
            .with_uri(uri)
    })
}

pub(crate) async fn ready(
    State(WebState { points, .. }): State<WebState>,
) -> Json<ReadyDto> {
    Json(ReadyDto {
        ready: points.is_ready(),
        deletion_mode: points.deletion_mode().to_string(),
    })
}

pub(crate) async fn list_points(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { points, .. }): State<WebState>,
) -> RouteResult<Json<Vec<StoredPoint>>> {
    points.list_points().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

pub(crate) async fn add_point(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { points, .. }): State<WebState>,
    Json(geometry): Json<PointGeometry>,
) -> RouteResult<Json<StoredPoint>> {
    let point = to_point(&geometry, original_uri.path())?;
    points.add_point(point).await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })
}

pub(crate) async fn delete_point(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { points, .. }): State<WebState>,
    Json(request): Json<DeleteRequest>,
) -> RouteResult<Json<AffectedDto>> {
    let matcher = match request {
        DeleteRequest::Id { id } => PointMatcher::Id(id),
        DeleteRequest::Geometry(geometry) => {
            PointMatcher::Coordinates(to_point(&geometry, original_uri.path())?)
        }
    };
    points
        .delete_point(matcher)
        .await
        .map(|affected| Json(AffectedDto { affected }))
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

pub(crate) async fn update_point(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { points, .. }): State<WebState>,
    Json(request): Json<UpdateRequest>,
) -> RouteResult<Json<AffectedDto>> {
    let old = to_point(&request.old, original_uri.path())?;
    let new = to_point(&request.new, original_uri.path())?;
    points
        .update_point(old, new)
        .await
        .map(|affected| Json(AffectedDto { affected }))
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}
