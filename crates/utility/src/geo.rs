pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const EARTH_RADIUS_M: f64 = EARTH_RADIUS_KM * 1000.0;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Wraps a longitude in degrees into the range [-180, 180).
pub fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + 540.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance in kilometers.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn haversine_distance_meters(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    haversine_distance(latitude_1, longitude_1, latitude_2, longitude_2) * 1000.0
}

/// Point reached when travelling `distance_m` meters from the start along the
/// great circle with the initial `bearing_deg` (clockwise from north).
/// Returns `(latitude, longitude)` in degrees.
pub fn destination_point(
    latitude: f64,
    longitude: f64,
    bearing_deg: f64,
    distance_m: f64,
) -> (f64, f64) {
    let lat1 = to_radians(latitude);
    let lon1 = to_radians(longitude);
    let bearing = to_radians(bearing_deg);
    let angular = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos()
        + lat1.cos() * angular.sin() * bearing.cos())
    .asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    (to_degrees(lat2), normalize_longitude(to_degrees(lon2)))
}
