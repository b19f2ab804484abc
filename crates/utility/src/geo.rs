use std::{error, f64::consts::PI, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6371e3;

fn to_radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

fn to_degrees(radians: f64) -> f64 {
    radians * (180.0 / PI)
}

/// The initial bearing left the `[0, 360)` interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainError {
    pub bearing: f64,
}

impl error::Error for DomainError {}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "bearing {} outside of [0, 360)", self.bearing)
    }
}

/// One of the eight 45° sectors of the compass rose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Great-circle distance in kilometres on a spherical earth (haversine).
pub fn distance_km(
    longitude_1: f64,
    latitude_1: f64,
    longitude_2: f64,
    latitude_2: f64,
) -> f64 {
    let phi_1 = to_radians(latitude_1);
    let phi_2 = to_radians(latitude_2);
    let delta_phi = to_radians(latitude_2 - latitude_1);
    let delta_lambda = to_radians(longitude_2 - longitude_1);

    let a = (delta_phi / 2.0).sin() * (delta_phi / 2.0).sin()
        + phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin() * (delta_lambda / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c * 0.001
}

/// Initial bearing from point 1 to point 2 in degrees, clockwise from true
/// north, normalized into `[0, 360)`.
pub fn bearing_degrees(
    longitude_1: f64,
    latitude_1: f64,
    longitude_2: f64,
    latitude_2: f64,
) -> Result<f64, DomainError> {
    let phi_1 = to_radians(latitude_1);
    let phi_2 = to_radians(latitude_2);
    let delta_lambda = to_radians(longitude_2 - longitude_1);

    let y = delta_lambda.sin() * phi_2.cos();
    let x = phi_1.cos() * phi_2.sin() - phi_1.sin() * phi_2.cos() * delta_lambda.cos();

    let bearing = (to_degrees(y.atan2(x)) + 360.0) % 360.0;
    if (0.0..360.0).contains(&bearing) {
        Ok(bearing)
    } else {
        Err(DomainError { bearing })
    }
}

/// Maps a bearing onto the compass rose. Every sector is centered on its
/// label, a bearing on a sector boundary belongs to the sector before it.
/// The wrap-around boundary at 337.5 belongs to N.
pub fn compass_direction(bearing: f64) -> CompassDirection {
    match bearing {
        b if b <= 22.5 || b >= 337.5 => CompassDirection::N,
        b if b <= 67.5 => CompassDirection::NE,
        b if b <= 112.5 => CompassDirection::E,
        b if b <= 157.5 => CompassDirection::SE,
        b if b <= 202.5 => CompassDirection::S,
        b if b <= 247.5 => CompassDirection::SW,
        b if b <= 292.5 => CompassDirection::W,
        _ => CompassDirection::NW,
    }
}

/// Compass direction in which point 2 lies as seen from point 1.
pub fn direction(
    longitude_1: f64,
    latitude_1: f64,
    longitude_2: f64,
    latitude_2: f64,
) -> Result<CompassDirection, DomainError> {
    bearing_degrees(longitude_1, latitude_1, longitude_2, latitude_2)
        .map(compass_direction)
}
