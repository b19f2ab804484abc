use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::{self, CompassDirection, DomainError},
    id::HasId,
};

use crate::WithId;

/// A position on the earth's surface in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Like `new`, but rejects coordinates outside of the valid ranges.
    pub fn checked(longitude: f64, latitude: f64) -> Option<Self> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);
        valid.then(|| Self::new(longitude, latitude))
    }

    pub fn distance_km_to(&self, other: &GeoPoint) -> f64 {
        geo::distance_km(
            self.longitude,
            self.latitude,
            other.longitude,
            other.latitude,
        )
    }

    pub fn bearing_to(&self, other: &GeoPoint) -> Result<f64, DomainError> {
        geo::bearing_degrees(
            self.longitude,
            self.latitude,
            other.longitude,
            other.latitude,
        )
    }

    pub fn direction_to(
        &self,
        other: &GeoPoint,
    ) -> Result<CompassDirection, DomainError> {
        self.bearing_to(other).map(geo::compass_direction)
    }
}

/// Stored points are identified by an id assigned by the store.
impl HasId for GeoPoint {
    type IdType = i64;
}

pub type StoredPoint = WithId<GeoPoint>;

/// A GeoJSON point geometry, `{"type": "Point", "coordinates": [lon, lat]}`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidGeometry {
    NotAPoint(String),
    Dimension(usize),
    OutOfRange { longitude: f64, latitude: f64 },
}

impl error::Error for InvalidGeometry {}

impl fmt::Display for InvalidGeometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotAPoint(kind) => {
                write!(f, "expected geometry of type 'Point', got '{}'", kind)
            }
            Self::Dimension(len) => {
                write!(f, "expected 2 coordinates, got {}", len)
            }
            Self::OutOfRange {
                longitude,
                latitude,
            } => write!(
                f,
                "coordinates out of range: longitude {}, latitude {}",
                longitude, latitude
            ),
        }
    }
}

impl PointGeometry {
    pub fn to_point(&self) -> Result<GeoPoint, InvalidGeometry> {
        if self.kind != "Point" {
            return Err(InvalidGeometry::NotAPoint(self.kind.clone()));
        }
        match self.coordinates.as_slice() {
            &[longitude, latitude] => GeoPoint::checked(longitude, latitude).ok_or(
                InvalidGeometry::OutOfRange {
                    longitude,
                    latitude,
                },
            ),
            other => Err(InvalidGeometry::Dimension(other.len())),
        }
    }
}

impl From<GeoPoint> for PointGeometry {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point".to_owned(),
            coordinates: vec![point.longitude, point.latitude],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(json: &str) -> PointGeometry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_geojson_points() {
        let point = geometry(r#"{"type": "Point", "coordinates": [7.62, 51.96]}"#)
            .to_point()
            .unwrap();
        assert_eq!(point, GeoPoint::new(7.62, 51.96));
    }

    #[test]
    fn rejects_other_geometries() {
        let result = geometry(r#"{"type": "LineString", "coordinates": [7.6, 51.9]}"#)
            .to_point();
        assert_eq!(
            result,
            Err(InvalidGeometry::NotAPoint("LineString".to_owned()))
        );
        let result = geometry(r#"{"type": "Point", "coordinates": [7.6]}"#).to_point();
        assert_eq!(result, Err(InvalidGeometry::Dimension(1)));
        let result =
            geometry(r#"{"type": "Point", "coordinates": [7.6, 91.0]}"#).to_point();
        assert!(matches!(result, Err(InvalidGeometry::OutOfRange { .. })));
    }

    #[test]
    fn stored_points_flatten_their_coordinates() {
        let stored = StoredPoint::new(utility::id::Id::new(3), GeoPoint::new(7.0, 51.0));
        assert_eq!(
            serde_json::to_value(&stored).unwrap(),
            serde_json::json!({"id": 3, "longitude": 7.0, "latitude": 51.0})
        );
    }
}
