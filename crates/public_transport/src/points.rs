use std::{fmt, str::FromStr, sync::Arc};

use model::point::{GeoPoint, StoredPoint};
use utility::id::Id;

use crate::{
    connection::Connection,
    database::{DatabaseError, PointRepo},
    RequestError, RequestResult,
};

/// How a deployment identifies the point to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionMode {
    /// Delete by the id the store assigned on insert.
    #[default]
    Id,
    /// Delete the first point with exactly matching coordinates. Legacy,
    /// prefer `Id`.
    Coordinates,
}

impl FromStr for DeletionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "coordinates" | "coordinate" => Ok(Self::Coordinates),
            other => Err(format!("unknown deletion mode '{}'", other)),
        }
    }
}

impl fmt::Display for DeletionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::Coordinates => write!(f, "coordinates"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointMatcher {
    Id(Id<GeoPoint>),
    Coordinates(GeoPoint),
}

/// Add, update, delete and list user submitted points.
#[derive(Clone)]
pub struct PointStore {
    connection: Connection,
    deletion_mode: DeletionMode,
}

impl PointStore {
    pub fn new(connection: Connection, deletion_mode: DeletionMode) -> Self {
        Self {
            connection,
            deletion_mode,
        }
    }

    pub fn deletion_mode(&self) -> DeletionMode {
        self.deletion_mode
    }

    pub fn is_ready(&self) -> bool {
        self.connection.is_ready()
    }

    fn repo(&self) -> RequestResult<Arc<dyn PointRepo>> {
        self.connection
            .repo()
            .ok_or(RequestError::PersistenceUnavailable)
    }

    pub async fn add_point(&self, point: GeoPoint) -> RequestResult<StoredPoint> {
        let stored = self
            .repo()?
            .insert_point(point)
            .await
            .map_err(report("insert point"))?;
        log::debug!("inserted point {}.", stored.id);
        Ok(stored)
    }

    /// Returns the number of deleted points. A matcher that does not fit the
    /// configured deletion mode is rejected.
    pub async fn delete_point(&self, matcher: PointMatcher) -> RequestResult<u64> {
        let repo = self.repo()?;
        let affected = match (self.deletion_mode, matcher) {
            (DeletionMode::Id, PointMatcher::Id(id)) => repo.delete_point(&id).await,
            (DeletionMode::Coordinates, PointMatcher::Coordinates(point)) => {
                repo.delete_point_at(&point).await
            }
            (mode, _) => {
                return Err(RequestError::invalid_input(format!(
                    "points are deleted by {} in this deployment",
                    mode
                )))
            }
        }
        .map_err(report("delete point"))?;
        log::debug!("deleted {} point(s).", affected);
        Ok(affected)
    }

    /// Replaces the first point at `old` with `new`. Returns the number of
    /// updated points.
    pub async fn update_point(&self, old: GeoPoint, new: GeoPoint) -> RequestResult<u64> {
        let affected = self
            .repo()?
            .update_point_at(&old, new)
            .await
            .map_err(report("update point"))?;
        log::debug!("updated {} point(s).", affected);
        Ok(affected)
    }

    pub async fn list_points(&self) -> RequestResult<Vec<StoredPoint>> {
        self.repo()?
            .points()
            .await
            .map_err(report("list points"))
    }
}

fn report(operation: &'static str) -> impl Fn(DatabaseError) -> RequestError {
    move |why| {
        log::warn!("could not {}: {}", operation, why);
        why.into()
    }
}
