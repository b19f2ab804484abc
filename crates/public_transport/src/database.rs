use std::{error, fmt, result};

use async_trait::async_trait;
use model::point::{GeoPoint, StoredPoint};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    /// The backing store cannot be reached right now. Callers may retry.
    Unavailable(Box<dyn error::Error + Send + Sync>),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl error::Error for DatabaseError {}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unavailable(why) => write!(f, "database unavailable: {}", why),
            Self::Other(why) => write!(f, "database error: {}", why),
        }
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Persistence of user submitted points. Every method is a single atomic
/// operation on the backing store.
///
/// Coordinate matching is exact, points are never normalized. Methods that
/// match by coordinates affect at most one record, the first one in storage
/// order.
#[async_trait]
pub trait PointRepo: Send + Sync {
    async fn insert_point(&self, point: GeoPoint) -> Result<StoredPoint>;

    async fn delete_point(&self, id: &Id<GeoPoint>) -> Result<u64>;

    async fn delete_point_at(&self, point: &GeoPoint) -> Result<u64>;

    async fn update_point_at(&self, old: &GeoPoint, new: GeoPoint) -> Result<u64>;

    /// All points in storage order.
    async fn points(&self) -> Result<Vec<StoredPoint>>;
}
