use serde::Serialize;

use crate::predict::error::ConfigurationError;
use crate::predict::geometry::geodetic_to_ecef_km;

/// Lowest station altitude accepted, a little below the Dead Sea shore.
pub const MIN_ALTITUDE_KM: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl Default for Observer {
    fn default() -> Self {
        Self {
            latitude_deg: 40.0,
            longitude_deg: -88.0,
            altitude_km: 0.2,
        }
    }
}

impl Observer {
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_km: f64,
    ) -> Result<Self, ConfigurationError> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(ConfigurationError::Latitude(latitude_deg));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(ConfigurationError::Longitude(longitude_deg));
        }
        if !altitude_km.is_finite() || altitude_km < MIN_ALTITUDE_KM {
            return Err(ConfigurationError::Altitude(altitude_km));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_km,
        })
    }

    /// Parse `"lat, lon"` as written in station configs.
    pub fn from_coordinates(
        coordinates: &str,
        altitude_km: f64,
    ) -> Result<Self, ConfigurationError> {
        let invalid = || ConfigurationError::Coordinates(coordinates.to_string());
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(invalid());
        }
        let lat = parts[0].parse().map_err(|_| invalid())?;
        let lon = parts[1].parse().map_err(|_| invalid())?;
        Self::new(lat, lon, altitude_km)
    }

    /// Re-run range checks on a value built without [`Observer::new`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.latitude_deg, self.longitude_deg, self.altitude_km).map(|_| ())
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        geodetic_to_ecef_km(self.latitude_deg, self.longitude_deg, self.altitude_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_string() {
        let obs = Observer::from_coordinates(" 40.0 , -88.0", 0.2).unwrap();
        assert_eq!(obs.latitude_deg, 40.0);
        assert_eq!(obs.longitude_deg, -88.0);
        assert_eq!(obs.altitude_km, 0.2);
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(matches!(
            Observer::from_coordinates("40.0", 0.0),
            Err(ConfigurationError::Coordinates(_))
        ));
        assert!(matches!(
            Observer::from_coordinates("north, west", 0.0),
            Err(ConfigurationError::Coordinates(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            Observer::new(91.0, 0.0, 0.0),
            Err(ConfigurationError::Latitude(91.0))
        );
        assert_eq!(
            Observer::new(0.0, -180.5, 0.0),
            Err(ConfigurationError::Longitude(-180.5))
        );
        assert_eq!(
            Observer::new(0.0, 0.0, -2.0),
            Err(ConfigurationError::Altitude(-2.0))
        );
        assert!(Observer::new(f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn equator_station_sits_on_the_x_axis() {
        let obs = Observer::new(0.0, 0.0, 0.0).unwrap();
        let [x, y, z] = obs.position_ecef_km();
        assert!((x - 6378.137).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        assert!(z.abs() < 1e-9);
    }
}
