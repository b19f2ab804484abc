use std::time::Duration;

use async_trait::async_trait;
use model::{ride::Ride, stop::Stop, WithId};
use utility::id::Id;

use crate::ProviderError;

/// Lists every stop known to the stop directory.
#[async_trait]
pub trait StopListProvider: Send + Sync {
    async fn fetch_stops(&self) -> Result<Vec<WithId<Stop>>, ProviderError>;
}

/// Lists the departures at a stop within the next `lookahead`.
#[async_trait]
pub trait RideListProvider: Send + Sync {
    async fn fetch_rides(
        &self,
        stop: &Id<Stop>,
        lookahead: Duration,
    ) -> Result<Vec<Ride>, ProviderError>;
}
