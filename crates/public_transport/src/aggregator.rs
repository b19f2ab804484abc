use std::{future::Future, sync::Arc, time::Duration};

use model::{
    point::GeoPoint,
    ride::Ride,
    stop::{RankedStop, Stop},
    WithId,
};
use tokio::time::timeout;

use crate::{
    provider::{RideListProvider, StopListProvider},
    ranker, ProviderError, Stage, StageFailure,
};

/// Departures are requested for this long after now.
pub const RIDE_LOOKAHEAD: Duration = Duration::from_secs(1200);

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a nearby query.
#[derive(Debug)]
pub struct NearbyDepartures {
    /// Every candidate stop, nearest first.
    pub ranked_stops: Vec<RankedStop>,
    /// Departures at the nearest stop, earliest first.
    pub nearest_stop_rides: Vec<Ride>,
    /// Set if the departures could not be fetched. The ranked stops are
    /// still valid in that case.
    pub rides_failure: Option<StageFailure>,
}

impl NearbyDepartures {
    pub fn empty() -> Self {
        Self {
            ranked_stops: vec![],
            nearest_stop_rides: vec![],
            rides_failure: None,
        }
    }

    pub fn nearest_stop(&self) -> Option<&RankedStop> {
        self.ranked_stops.first()
    }
}

#[derive(Debug)]
pub enum AggregatorState {
    FetchingStops,
    RankingStops(Vec<WithId<Stop>>),
    FetchingRides(Vec<RankedStop>),
    RankingRides(Vec<RankedStop>, Vec<Ride>),
    Done(NearbyDepartures),
    Failed(StageFailure),
}

impl AggregatorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }
}

/// Finds the stops around a point and the upcoming departures at the nearest
/// one.
#[derive(Clone)]
pub struct Aggregator {
    stops: Arc<dyn StopListProvider>,
    rides: Arc<dyn RideListProvider>,
    provider_timeout: Duration,
}

impl Aggregator {
    pub fn new(
        stops: Arc<dyn StopListProvider>,
        rides: Arc<dyn RideListProvider>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            stops,
            rides,
            provider_timeout,
        }
    }

    /// Runs the whole pipeline. Only a failure to fetch or rank the stops fails
    /// the query, see `NearbyDepartures::rides_failure` for the rides.
    pub async fn query(
        &self,
        reference: GeoPoint,
    ) -> Result<NearbyDepartures, StageFailure> {
        let mut state = AggregatorState::FetchingStops;
        loop {
            state = match self.step(&reference, state).await {
                AggregatorState::Done(result) => return Ok(result),
                AggregatorState::Failed(failure) => return Err(failure),
                next => next,
            };
        }
    }

    pub async fn step(
        &self,
        reference: &GeoPoint,
        state: AggregatorState,
    ) -> AggregatorState {
        log::debug!("nearby query for {:?}: {}", reference, state_name(&state));
        match state {
            AggregatorState::FetchingStops => {
                match self.fetch(Stage::Stops, self.stops.fetch_stops()).await {
                    Ok(stops) => AggregatorState::RankingStops(stops),
                    Err(failure) => AggregatorState::Failed(failure),
                }
            }
            AggregatorState::RankingStops(stops) => {
                match ranker::rank_by_distance(reference, stops) {
                    Ok(ranked) if ranked.is_empty() => {
                        AggregatorState::Done(NearbyDepartures::empty())
                    }
                    Ok(ranked) => AggregatorState::FetchingRides(ranked),
                    Err(why) => {
                        log::error!("ranking stops around {:?}: {}", reference, why);
                        AggregatorState::Failed(StageFailure::domain(Stage::Stops, why))
                    }
                }
            }
            AggregatorState::FetchingRides(ranked) => {
                let Some(nearest) = ranked.first().map(|stop| stop.id.clone()) else {
                    return AggregatorState::Done(NearbyDepartures::empty());
                };
                let request = self.rides.fetch_rides(&nearest, RIDE_LOOKAHEAD);
                match self.fetch(Stage::Rides, request).await {
                    Ok(rides) => AggregatorState::RankingRides(ranked, rides),
                    Err(failure) => AggregatorState::Done(NearbyDepartures {
                        ranked_stops: ranked,
                        nearest_stop_rides: vec![],
                        rides_failure: Some(failure),
                    }),
                }
            }
            AggregatorState::RankingRides(ranked, rides) => {
                AggregatorState::Done(NearbyDepartures {
                    ranked_stops: ranked,
                    nearest_stop_rides: ranker::rank_by_time(rides),
                    rides_failure: None,
                })
            }
            terminal @ (AggregatorState::Done(_) | AggregatorState::Failed(_)) => terminal,
        }
    }

    async fn fetch<T, F>(&self, stage: Stage, request: F) -> Result<T, StageFailure>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let failure = match timeout(self.provider_timeout, request).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(why)) => StageFailure::provider(stage, why),
            Err(_) => StageFailure::provider(stage, ProviderError::Timeout),
        };
        log::warn!("{}", failure);
        Err(failure)
    }
}

fn state_name(state: &AggregatorState) -> &'static str {
    match state {
        AggregatorState::FetchingStops => "fetching stops",
        AggregatorState::RankingStops(_) => "ranking stops",
        AggregatorState::FetchingRides(_) => "fetching rides",
        AggregatorState::RankingRides(..) => "ranking rides",
        AggregatorState::Done(_) => "done",
        AggregatorState::Failed(_) => "failed",
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use async_trait::async_trait;
    use utility::{geo::CompassDirection, id::Id};

    use super::*;
    use crate::FailureCause;

    struct FakeStops {
        stops: Option<Vec<WithId<Stop>>>,
        delay: Duration,
    }

    #[async_trait]
    impl StopListProvider for FakeStops {
        async fn fetch_stops(&self) -> Result<Vec<WithId<Stop>>, ProviderError> {
            tokio::time::sleep(self.delay).await;
            self.stops.clone().ok_or(ProviderError::unreachable(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    #[derive(Default)]
    struct FakeRides {
        rides: Option<Vec<Ride>>,
        calls: AtomicUsize,
        requested: Mutex<Vec<(String, Duration)>>,
    }

    #[async_trait]
    impl RideListProvider for FakeRides {
        async fn fetch_rides(
            &self,
            stop: &Id<Stop>,
            lookahead: Duration,
        ) -> Result<Vec<Ride>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push((stop.raw(), lookahead));
            self.rides
                .clone()
                .ok_or(ProviderError::Malformed("expected an array".to_owned()))
        }
    }

    fn stop(id: &str, name: &str, longitude: f64, latitude: f64) -> WithId<Stop> {
        WithId::new(
            Id::new(id.to_owned()),
            Stop {
                name: name.to_owned(),
                location: GeoPoint::new(longitude, latitude),
            },
        )
    }

    fn ride(departure_unix: i64, line: &str) -> Ride {
        Ride {
            departure_unix,
            delay_seconds: 60,
            line: line.to_owned(),
            destination: "Zoo".to_owned(),
        }
    }

    fn aggregator(stops: FakeStops, rides: Arc<FakeRides>) -> Aggregator {
        Aggregator::new(Arc::new(stops), rides, DEFAULT_PROVIDER_TIMEOUT)
    }

    fn stops(stops: Vec<WithId<Stop>>) -> FakeStops {
        FakeStops {
            stops: Some(stops),
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn fetches_rides_at_the_nearest_stop() {
        let rides = Arc::new(FakeRides {
            rides: Some(vec![ride(300, "2"), ride(100, "1"), ride(300, "3")]),
            ..Default::default()
        });
        let result = aggregator(
            stops(vec![stop("2", "B", 51.0, 5.0), stop("1", "A", 51.0, 6.0)]),
            rides.clone(),
        )
        .query(GeoPoint::new(51.0, 7.0))
        .await
        .unwrap();

        let names = result
            .ranked_stops
            .iter()
            .map(|stop| stop.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(result.nearest_stop().unwrap().direction, CompassDirection::S);
        let lines = result
            .nearest_stop_rides
            .iter()
            .map(|ride| ride.line.as_str())
            .collect::<Vec<_>>();
        assert_eq!(lines, ["1", "2", "3"]);
        assert!(result.rides_failure.is_none());
        assert_eq!(
            *rides.requested.lock().unwrap(),
            [("1".to_owned(), Duration::from_secs(1200))]
        );
    }

    #[tokio::test]
    async fn no_candidates_is_an_empty_result() {
        let rides = Arc::new(FakeRides::default());
        let result = aggregator(stops(vec![]), rides.clone())
            .query(GeoPoint::new(7.6, 51.9))
            .await
            .unwrap();
        assert!(result.ranked_stops.is_empty());
        assert!(result.nearest_stop_rides.is_empty());
        assert!(result.rides_failure.is_none());
        assert_eq!(rides.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_departures_is_not_a_failure() {
        let rides = Arc::new(FakeRides {
            rides: Some(vec![]),
            ..Default::default()
        });
        let result = aggregator(stops(vec![stop("1", "A", 7.6, 51.9)]), rides)
            .query(GeoPoint::new(7.6, 51.9))
            .await
            .unwrap();
        assert_eq!(result.ranked_stops.len(), 1);
        assert!(result.nearest_stop_rides.is_empty());
        assert!(result.rides_failure.is_none());
    }

    #[tokio::test]
    async fn failing_stop_feed_fails_the_query() {
        let rides = Arc::new(FakeRides::default());
        let failure = aggregator(
            FakeStops {
                stops: None,
                delay: Duration::ZERO,
            },
            rides.clone(),
        )
        .query(GeoPoint::new(7.6, 51.9))
        .await
        .unwrap_err();
        assert_eq!(failure.stage, Stage::Stops);
        assert!(matches!(
            failure.cause,
            FailureCause::Provider(ProviderError::Unreachable(_))
        ));
        assert_eq!(rides.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_ride_feed_keeps_the_ranked_stops() {
        let rides = Arc::new(FakeRides::default());
        let result = aggregator(stops(vec![stop("1", "A", 7.6, 51.9)]), rides.clone())
            .query(GeoPoint::new(7.6, 51.8))
            .await
            .unwrap();
        assert_eq!(result.ranked_stops.len(), 1);
        assert_eq!(result.ranked_stops[0].direction, CompassDirection::N);
        assert!(result.nearest_stop_rides.is_empty());
        let failure = result.rides_failure.unwrap();
        assert_eq!(failure.stage, Stage::Rides);
        assert!(matches!(
            failure.cause,
            FailureCause::Provider(ProviderError::Malformed(_))
        ));
        assert_eq!(rides.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_feeds_time_out() {
        let rides = Arc::new(FakeRides::default());
        let failure = Aggregator::new(
            Arc::new(FakeStops {
                stops: Some(vec![]),
                delay: Duration::from_secs(60),
            }),
            rides,
            Duration::from_secs(5),
        )
        .query(GeoPoint::new(7.6, 51.9))
        .await
        .unwrap_err();
        assert_eq!(failure.stage, Stage::Stops);
        assert!(failure.is_timeout());
        assert_eq!(failure.cause.to_string(), "timeout");
    }

    #[tokio::test]
    async fn walks_through_every_state() {
        let rides = Arc::new(FakeRides {
            rides: Some(vec![ride(1, "1")]),
            ..Default::default()
        });
        let aggregator = aggregator(stops(vec![stop("1", "A", 7.6, 51.9)]), rides);
        let reference = GeoPoint::new(7.6, 51.9);

        let mut visited = vec![];
        let mut state = AggregatorState::FetchingStops;
        while !state.is_terminal() {
            visited.push(state_name(&state));
            state = aggregator.step(&reference, state).await;
        }
        visited.push(state_name(&state));
        assert_eq!(
            visited,
            [
                "fetching stops",
                "ranking stops",
                "fetching rides",
                "ranking rides",
                "done"
            ]
        );
    }
}
