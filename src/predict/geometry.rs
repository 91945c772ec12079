use crate::predict::observer::Observer;
use crate::predict::types::{LookAngles, SatelliteState};

pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;

// WGS-84
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.006_694_379_990_14;

/// Turns an observer and a satellite snapshot into look angles.
pub trait Geometry {
    fn look_angles(&self, observer: &Observer, state: &SatelliteState) -> LookAngles;
}

/// Look angles over the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84Geometry;

impl Geometry for Wgs84Geometry {
    fn look_angles(&self, observer: &Observer, state: &SatelliteState) -> LookAngles {
        let sat_ecef =
            geodetic_to_ecef_km(state.latitude_deg, state.longitude_deg, state.altitude_km);
        let sta_ecef = observer.position_ecef_km();

        let dr = [
            sat_ecef[0] - sta_ecef[0],
            sat_ecef[1] - sta_ecef[1],
            sat_ecef[2] - sta_ecef[2],
        ];
        let range_km = norm(dr);

        let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
        let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation = if range_km > 0.0 {
            (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
        } else {
            90.0
        };

        LookAngles {
            timestamp: state.timestamp,
            azimuth_deg: azimuth,
            elevation_deg: elevation,
            range_km,
        }
    }
}

pub fn geodetic_to_ecef_km(lat_deg: f64, lon_deg: f64, alt_km: f64) -> [f64; 3] {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    [
        (n + alt_km) * cos_lat * lon.cos(),
        (n + alt_km) * cos_lat * lon.sin(),
        (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
    ]
}

/// Returns `(latitude_deg, longitude_deg, altitude_km)`.
pub fn ecef_to_geodetic(pos: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = pos;
    let lon = y.atan2(x);
    let p = x.hypot(y);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..6 {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (z + WGS84_E2 * n * sin_lat).atan2(p);
    }

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() - n * (1.0 - WGS84_E2)
    };

    (lat.to_degrees(), lon.to_degrees(), alt)
}

/// Rotate an inertial (TEME) vector into the Earth-fixed frame.
pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Inverse of [`teme_to_ecef_position`].
pub fn ecef_to_inertial(pos_ecef: [f64; 3], angle: f64) -> [f64; 3] {
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    [
        pos_ecef[0] * cos_a - pos_ecef[1] * sin_a,
        pos_ecef[0] * sin_a + pos_ecef[1] * cos_a,
        pos_ecef[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

pub fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn state(lat: f64, lon: f64, alt: f64) -> SatelliteState {
        SatelliteState {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap(),
            latitude_deg: lat,
            longitude_deg: lon,
            altitude_km: alt,
            velocity_km_s: 7.66,
        }
    }

    #[test]
    fn geodetic_round_trip() {
        for &(lat, lon, alt) in &[(40.0, -88.0, 0.2), (-63.5, 171.2, 550.0), (89.9, 10.0, 800.0)] {
            let (lat2, lon2, alt2) = ecef_to_geodetic(geodetic_to_ecef_km(lat, lon, alt));
            assert!((lat - lat2).abs() < 1e-9, "lat {lat} -> {lat2}");
            assert!((lon - lon2).abs() < 1e-9, "lon {lon} -> {lon2}");
            assert!((alt - alt2).abs() < 1e-6, "alt {alt} -> {alt2}");
        }
    }

    #[test]
    fn satellite_overhead_is_at_zenith() {
        let observer = Observer::new(40.0, -88.0, 0.2).unwrap();
        let look = Wgs84Geometry.look_angles(&observer, &state(40.0, -88.0, 420.2));
        assert!(look.elevation_deg > 89.99);
        assert!((look.range_km - 420.0).abs() < 1e-6);
    }

    #[test]
    fn satellite_on_far_side_is_below_horizon() {
        let observer = Observer::new(0.0, 0.0, 0.0).unwrap();
        let look = Wgs84Geometry.look_angles(&observer, &state(0.0, 180.0, 420.0));
        assert!(look.elevation_deg < -80.0);
    }

    #[test]
    fn azimuth_points_towards_satellite() {
        let observer = Observer::new(0.0, 0.0, 0.0).unwrap();
        let north = Wgs84Geometry.look_angles(&observer, &state(5.0, 0.0, 500.0));
        let east = Wgs84Geometry.look_angles(&observer, &state(0.0, 5.0, 500.0));
        assert!(north.azimuth_deg < 1.0 || north.azimuth_deg > 359.0);
        assert!((east.azimuth_deg - 90.0).abs() < 1.0);
    }

    #[test]
    fn inertial_rotation_inverts_teme_rotation() {
        let v = [6800.0, -120.0, 300.0];
        let back = ecef_to_inertial(teme_to_ecef_position(v, 1.3), 1.3);
        for i in 0..3 {
            assert!((v[i] - back[i]).abs() < 1e-9);
        }
    }
}
