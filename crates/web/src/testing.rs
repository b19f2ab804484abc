use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use model::{point::GeoPoint, ride::Ride, stop::Stop, WithId};
use public_transport::{
    aggregator::{Aggregator, DEFAULT_PROVIDER_TIMEOUT},
    connection::{Connection, Connector},
    database::{self, DatabaseError, PointRepo},
    memory::MemoryPointRepo,
    points::{DeletionMode, PointStore},
    provider::{RideListProvider, StopListProvider},
    ProviderError,
};
use utility::id::Id;

use crate::WebState;

type Fixed<T> = Mutex<Option<Result<Vec<T>, ProviderError>>>;

/// Answers the first call with the given result and every later one with an
/// empty list.
pub(crate) struct FixedStops(Fixed<WithId<Stop>>);

#[async_trait]
impl StopListProvider for FixedStops {
    async fn fetch_stops(&self) -> Result<Vec<WithId<Stop>>, ProviderError> {
        self.0.lock().unwrap().take().unwrap_or(Ok(vec![]))
    }
}

pub(crate) struct FixedRides {
    rides: Fixed<Ride>,
    requested: Mutex<Vec<String>>,
}

impl FixedRides {
    pub(crate) fn new(rides: Result<Vec<Ride>, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            rides: Mutex::new(Some(rides)),
            requested: Mutex::new(vec![]),
        })
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RideListProvider for FixedRides {
    async fn fetch_rides(
        &self,
        stop: &Id<Stop>,
        _lookahead: Duration,
    ) -> Result<Vec<Ride>, ProviderError> {
        self.requested.lock().unwrap().push(stop.raw());
        self.rides.lock().unwrap().take().unwrap_or(Ok(vec![]))
    }
}

/// Never connects.
struct Unreachable;

#[async_trait]
impl Connector for Unreachable {
    async fn connect(&self) -> database::Result<Arc<dyn PointRepo>> {
        Err(DatabaseError::Unavailable(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))))
    }

    fn name(&self) -> String {
        "nowhere".to_owned()
    }
}

pub(crate) fn stop(id: &str, name: &str, longitude: f64, latitude: f64) -> WithId<Stop> {
    WithId::new(
        Id::new(id.to_owned()),
        Stop {
            name: name.to_owned(),
            location: GeoPoint::new(longitude, latitude),
        },
    )
}

pub(crate) fn ride(departure_unix: i64, line: &str) -> Ride {
    Ride {
        departure_unix,
        delay_seconds: 0,
        line: line.to_owned(),
        destination: "Hbf".to_owned(),
    }
}

fn aggregator(
    stops: Result<Vec<WithId<Stop>>, ProviderError>,
    rides: Arc<FixedRides>,
) -> Aggregator {
    Aggregator::new(
        Arc::new(FixedStops(Mutex::new(Some(stops)))),
        rides,
        DEFAULT_PROVIDER_TIMEOUT,
    )
}

pub(crate) fn web_state(
    stops: Result<Vec<WithId<Stop>>, ProviderError>,
    rides: Arc<FixedRides>,
) -> WebState {
    WebState {
        aggregator: aggregator(stops, rides),
        points: point_state(DeletionMode::Id).points,
    }
}

/// A state backed by an in-memory point store.
pub(crate) fn point_state(deletion_mode: DeletionMode) -> WebState {
    let connection = Connection::connected(Arc::new(MemoryPointRepo::new()));
    WebState {
        aggregator: aggregator(Ok(vec![]), FixedRides::new(Ok(vec![]))),
        points: PointStore::new(connection, deletion_mode),
    }
}

/// A state whose point store never becomes ready. Needs a tokio runtime.
pub(crate) fn disconnected_state() -> WebState {
    let connection = Connection::establish(Unreachable, Duration::from_secs(3600));
    WebState {
        aggregator: aggregator(Ok(vec![]), FixedRides::new(Ok(vec![]))),
        points: PointStore::new(connection, DeletionMode::Id),
    }
}
