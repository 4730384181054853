//! Decoder for the encoded polyline algorithm format.

use model::geometry::Point;

use crate::ApiError;

const PRECISION: f64 = 1e5;

/// Decodes an encoded polyline with five decimal places of precision.
pub fn decode(encoded: &str) -> Result<Vec<Point>, ApiError> {
    let mut points = vec![];
    let mut bytes = encoded.bytes();
    let (mut latitude, mut longitude) = (0i64, 0i64);

    loop {
        let Some(delta_latitude) = next_value(&mut bytes, encoded, true)? else {
            break;
        };
        let Some(delta_longitude) = next_value(&mut bytes, encoded, false)? else {
            return Err(ApiError::InvalidPolyline(encoded.to_owned()));
        };
        latitude += delta_latitude;
        longitude += delta_longitude;
        points.push(Point::new(
            latitude as f64 / PRECISION,
            longitude as f64 / PRECISION,
        ));
    }
    Ok(points)
}

/// Reads one zig-zag encoded value. `None` at a clean end of input.
fn next_value(
    bytes: &mut impl Iterator<Item = u8>,
    encoded: &str,
    end_allowed: bool,
) -> Result<Option<i64>, ApiError> {
    let invalid = || ApiError::InvalidPolyline(encoded.to_owned());
    let mut result = 0i64;
    let mut shift = 0;

    loop {
        let Some(byte) = bytes.next() else {
            return if shift == 0 && end_allowed {
                Ok(None)
            } else {
                Err(invalid())
            };
        };
        if !(63..127).contains(&byte) || shift > 30 {
            return Err(invalid());
        }
        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    let value = if result & 1 == 1 { !(result >> 1) } else { result >> 1 };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn decodes_reference_example() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(points.len(), expected.len());
        for (point, (latitude, longitude)) in points.iter().zip(expected) {
            assert_relative_eq!(point.latitude, latitude, epsilon = 1e-9);
            assert_relative_eq!(point.longitude, longitude, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_polyline_has_no_points() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn truncated_polyline_is_rejected() {
        // latitude without longitude
        assert!(matches!(decode("_p~iF"), Err(ApiError::InvalidPolyline(_))));
        // continuation bit set on the last byte
        assert!(matches!(decode("_p~iF~ps|"), Err(ApiError::InvalidPolyline(_))));
        assert!(decode("_p~iF ~ps|U").is_err());
    }
}
