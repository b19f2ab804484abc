//! Payloads of the busradar REST API.

use std::fmt;

use model::{point::PointGeometry, ride::Ride, stop::Stop, WithId};
use serde::Deserialize;
use utility::id::Id;

use crate::ApiError;

/// `GET /haltestellen`, a GeoJSON feature collection of stops.
#[derive(Debug, Clone, Deserialize)]
pub struct StopCollection {
    pub features: Vec<StopFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopFeature {
    pub properties: StopProperties,
    pub geometry: PointGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopProperties {
    #[serde(rename = "lbez")]
    pub name: String,
    #[serde(rename = "nr")]
    pub number: StopNumber,
}

/// Stop numbers are integers in the feed, but are treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StopNumber {
    Integer(i64),
    Text(String),
}

impl fmt::Display for StopNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Integer(number) => write!(f, "{}", number),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

impl StopFeature {
    pub fn into_stop(self) -> Result<WithId<Stop>, ApiError> {
        let location = self.geometry.to_point().map_err(|why| {
            ApiError::InvalidStop(format!("stop {}: {}", self.properties.number, why))
        })?;
        Ok(WithId::new(
            Id::new(self.properties.number.to_string()),
            Stop {
                name: self.properties.name,
                location,
            },
        ))
    }
}

/// One entry of `GET /haltestellen/{nr}/abfahrten`.
#[derive(Debug, Clone, Deserialize)]
pub struct Departure {
    #[serde(rename = "abfahrtszeit")]
    pub departure_time: i64,
    #[serde(default)]
    pub delay: Option<i64>,
    #[serde(rename = "linientext")]
    pub line: String,
    #[serde(rename = "richtungstext")]
    pub destination: String,
}

impl From<Departure> for Ride {
    fn from(departure: Departure) -> Self {
        Ride {
            departure_unix: departure.departure_time,
            delay_seconds: departure.delay.unwrap_or(0),
            line: departure.line,
            destination: departure.destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use model::point::GeoPoint;

    use super::*;

    const STOPS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"nr": 4552102, "lbez": "Domplatz", "richtung": "einwärts"},
                "geometry": {"type": "Point", "coordinates": [7.6261, 51.9625]}
            },
            {
                "type": "Feature",
                "properties": {"nr": "4552101", "lbez": "Domplatz"},
                "geometry": {"type": "Point", "coordinates": [7.6258, 51.9627]}
            }
        ]
    }"#;

    #[test]
    fn parses_stops() {
        let collection: StopCollection = serde_json::from_str(STOPS).unwrap();
        let stops = collection
            .features
            .into_iter()
            .map(StopFeature::into_stop)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id.raw(), "4552102");
        assert_eq!(stops[0].content.name, "Domplatz");
        assert_eq!(stops[0].content.location, GeoPoint::new(7.6261, 51.9625));
        assert_eq!(stops[1].id.raw(), "4552101");
    }

    #[test]
    fn rejects_stops_without_a_point() {
        let feature: StopFeature = serde_json::from_str(
            r#"{
                "properties": {"nr": 1, "lbez": "Nowhere"},
                "geometry": {"type": "Point", "coordinates": []}
            }"#,
        )
        .unwrap();
        assert!(matches!(feature.into_stop(), Err(ApiError::InvalidStop(_))));
    }

    #[test]
    fn parses_departures() {
        let departures: Vec<Departure> = serde_json::from_str(
            r#"[
                {"abfahrtszeit": 1588851540, "delay": 8, "linientext": "9",
                 "richtungstext": "Von-Humboldt-Straße", "fahrtnummer": 1},
                {"abfahrtszeit": 1588851600, "linientext": "R22",
                 "richtungstext": "Hiltrup"}
            ]"#,
        )
        .unwrap();
        let rides = departures.into_iter().map(Ride::from).collect::<Vec<_>>();
        assert_eq!(
            rides[0],
            Ride {
                departure_unix: 1588851540,
                delay_seconds: 8,
                line: "9".to_owned(),
                destination: "Von-Humboldt-Straße".to_owned(),
            }
        );
        assert_eq!(rides[1].delay_seconds, 0);
    }
}
