//! The unversioned routes the map frontend was first written against.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api::v1::points, WebState};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/points", get(points::list_points))
        .route("/pointAdded", post(points::add_point))
        .route("/pointDeleted", post(points::delete_point))
        .route("/pointUpdated", post(points::update_point))
        .with_state(state)
}
