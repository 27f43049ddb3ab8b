use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} out of range")]
    Latitude(f64),

    #[error("longitude {0} out of range")]
    Longitude(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Initial compass bearing from `from` to `to`, in `[0, 360)`.
pub fn bearing_degrees(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}

pub fn eta_minutes(distance_km: f64, speed_kmh: f64) -> u32 {
    if distance_km <= 0.0 || speed_kmh <= 0.0 {
        return 0;
    }
    (distance_km / speed_kmh * 60.0).ceil() as u32
}
