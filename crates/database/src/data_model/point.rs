use model::point::{GeoPoint, StoredPoint};
use sqlx::prelude::FromRow;
use utility::id::Id;

/// A user submitted point.
/// Table: points
#[derive(Debug, Clone, FromRow)]
pub struct PointRow {
    pub id: i64,
    pub longitude: f64,
    pub latitude: f64,
}

impl PointRow {
    pub fn to_model(self) -> StoredPoint {
        StoredPoint::new(Id::new(self.id), GeoPoint::new(self.longitude, self.latitude))
    }
}
