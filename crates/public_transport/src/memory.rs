use async_trait::async_trait;
use model::point::{GeoPoint, StoredPoint};
use tokio::sync::RwLock;
use utility::id::Id;

use crate::database::{PointRepo, Result};

struct MemoryState {
    next_id: i64,
    points: Vec<StoredPoint>,
}

/// Keeps points in process memory. Used when no database is configured and
/// in tests.
pub struct MemoryPointRepo {
    state: RwLock<MemoryState>,
}

impl MemoryPointRepo {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                points: vec![],
            }),
        }
    }
}

impl Default for MemoryPointRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PointRepo for MemoryPointRepo {
    async fn insert_point(&self, point: GeoPoint) -> Result<StoredPoint> {
        let mut state = self.state.write().await;
        let stored = StoredPoint::new(Id::new(state.next_id), point);
        state.next_id += 1;
        state.points.push(stored.clone());
        Ok(stored)
    }

    async fn delete_point(&self, id: &Id<GeoPoint>) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.points.len();
        state.points.retain(|stored| stored.id != *id);
        Ok((before - state.points.len()) as u64)
    }

    async fn delete_point_at(&self, point: &GeoPoint) -> Result<u64> {
        let mut state = self.state.write().await;
        match state.points.iter().position(|stored| stored.content == *point) {
            Some(index) => {
                state.points.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_point_at(&self, old: &GeoPoint, new: GeoPoint) -> Result<u64> {
        let mut state = self.state.write().await;
        match state.points.iter_mut().find(|stored| stored.content == *old) {
            Some(stored) => {
                stored.content = new;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn points(&self) -> Result<Vec<StoredPoint>> {
        Ok(self.state.read().await.points.clone())
    }
}
