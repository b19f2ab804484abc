use model::{
    point::GeoPoint,
    ride::Ride,
    stop::{RankedStop, Stop},
    WithId,
};
use utility::geo::DomainError;

/// Computes distance and direction of every candidate as seen from
/// `reference` and orders them nearest first. Candidates with equal (rounded)
/// distance keep their input order.
pub fn rank_by_distance(
    reference: &GeoPoint,
    candidates: Vec<WithId<Stop>>,
) -> Result<Vec<RankedStop>, DomainError> {
    let mut ranked = candidates
        .into_iter()
        .map(|candidate| candidate.ranked_from(reference))
        .collect::<Result<Vec<_>, _>>()?;
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(ranked)
}

/// Orders rides by departure, earliest first. Rides departing at the same
/// second keep their feed order.
pub fn rank_by_time(mut rides: Vec<Ride>) -> Vec<Ride> {
    rides.sort_by_key(|ride| ride.departure_unix);
    rides
}
