use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::{CompassDirection, DomainError},
    id::{HasId, Id},
    math::round3,
};

use crate::{point::GeoPoint, WithId};

/// A bus stop as listed by the stop directory feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub location: GeoPoint,
}

impl HasId for Stop {
    type IdType = String;
}

/// A stop together with its distance and direction as seen from a reference
/// point. Only lives for the duration of a single query.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedStop {
    pub id: Id<Stop>,
    pub name: String,
    /// Rounded to three decimal places.
    pub distance_km: f64,
    pub direction: CompassDirection,
    pub coordinates: GeoPoint,
}

impl WithId<Stop> {
    pub fn ranked_from(self, reference: &GeoPoint) -> Result<RankedStop, DomainError> {
        let direction = reference.direction_to(&self.content.location)?;
        Ok(RankedStop {
            distance_km: round3(reference.distance_km_to(&self.content.location)),
            direction,
            coordinates: self.content.location,
            name: self.content.name,
            id: self.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_a_stop_against_a_reference_point() {
        let stop = WithId::new(
            Id::new("4711".to_owned()),
            Stop {
                name: "Domplatz".to_owned(),
                location: GeoPoint::new(51.0, 6.0),
            },
        );
        let ranked = stop.ranked_from(&GeoPoint::new(51.0, 7.0)).unwrap();
        assert_eq!(ranked.direction, CompassDirection::S);
        assert_eq!(ranked.distance_km, 111.195);
        assert_eq!(ranked.name, "Domplatz");
        assert_eq!(ranked.id.raw(), "4711");
    }
}
