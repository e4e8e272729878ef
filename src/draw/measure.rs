//! Geodesic length/area of drawn geometries and their tooltip formatting.
//!
//! Coordinates are unprojected from Web Mercator to lon/lat before measuring, so
//! results are true distances on the sphere rather than projected ones.

use bevy::math::DVec2;
use geo::{ChamberlainDuquetteArea, Distance, Haversine};

use crate::constants::CIRCLE_MEASURE_SEGMENTS;
use crate::map::projection::EARTH_RADIUS;
use crate::map::to_lon_lat;

use super::geometry::Geometry;

/// Round to two decimals
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a length in metres: kilometres above 100 m, metres otherwise
pub fn format_length(metres: f64) -> String {
    if metres > 100.0 {
        format!("{} km", round2(metres / 1000.0))
    } else {
        format!("{} m", round2(metres))
    }
}

/// Format an area in square metres: km² above 10 000 m², m² otherwise
pub fn format_area(square_metres: f64) -> String {
    if square_metres > 10_000.0 {
        format!("{} km\u{b2}", round2(square_metres / 1_000_000.0))
    } else {
        format!("{} m\u{b2}", round2(square_metres))
    }
}

fn geo_point(mercator: DVec2) -> geo::Point<f64> {
    let lon_lat = to_lon_lat(mercator);
    geo::Point::new(lon_lat.x, lon_lat.y)
}

/// Sum of haversine distances between consecutive vertices, in metres.
/// `closed` adds the segment from the last vertex back to the first.
pub fn geodesic_length(coords: &[DVec2], closed: bool) -> f64 {
    let points: Vec<geo::Point<f64>> = coords.iter().copied().map(geo_point).collect();
    let open: f64 = points
        .windows(2)
        .map(|w| Haversine.distance(w[0], w[1]))
        .sum();

    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 2 => {
            open + Haversine.distance(*last, *first)
        }
        _ => open,
    }
}

/// Mean earth radius, shared with the haversine lengths
const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// Spherical area of a ring in square metres, on the mean earth radius.
/// Fewer than three vertices is zero.
pub fn geodesic_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let exterior: geo::LineString<f64> = ring.iter().copied().map(geo_point).collect();
    // geo sums on the equatorial radius
    let scale = (MEAN_EARTH_RADIUS / EARTH_RADIUS).powi(2);
    geo::Polygon::new(exterior, vec![]).chamberlain_duquette_unsigned_area() * scale
}

/// Approximate a circle by a regular polygon in Mercator space
pub fn circle_ring(center: DVec2, rim: DVec2, segments: usize) -> Vec<DVec2> {
    let radius = center.distance(rim);
    let start = (rim - center).to_angle();
    (0..segments)
        .map(|i| {
            let angle = start + std::f64::consts::TAU * i as f64 / segments as f64;
            center + DVec2::from_angle(angle) * radius
        })
        .collect()
}

/// Tooltip text for a geometry: length for lines, area then length for
/// polygons and circles. Points have no measurement.
pub fn measure_tooltip_text(geometry: &Geometry) -> Option<String> {
    match geometry {
        Geometry::Point(_) => None,
        Geometry::LineString(coords) => Some(format_length(geodesic_length(coords, false))),
        Geometry::Polygon(ring) => Some(ring_text(ring)),
        Geometry::Circle { center, rim } => {
            Some(ring_text(&circle_ring(*center, *rim, CIRCLE_MEASURE_SEGMENTS)))
        }
    }
}

fn ring_text(ring: &[DVec2]) -> String {
    format!(
        "{}\n{}",
        format_area(geodesic_area(ring)),
        format_length(geodesic_length(ring, true))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::from_lon_lat;

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(55.4), "55.4 m");
        assert_eq!(format_length(2450.0), "2.45 km");
        assert_eq!(format_length(100.0), "100 m");
        assert_eq!(format_length(100.004), "0.1 km");
        assert_eq!(format_length(0.0), "0 m");
        assert_eq!(format_length(2000.0), "2 km");
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(9999.99), "9999.99 m\u{b2}");
        assert_eq!(format_area(25_000.0), "0.03 km\u{b2}");
        assert_eq!(format_area(10_000.0), "10000 m\u{b2}");
        assert_eq!(format_area(2_500_000.0), "2.5 km\u{b2}");
    }

    #[test]
    fn test_one_degree_along_equator() {
        let coords = [from_lon_lat(0.0, 0.0), from_lon_lat(1.0, 0.0)];
        let length = geodesic_length(&coords, false);
        // Haversine on the mean earth radius
        assert!((length - 111_195.08).abs() < 1.0, "length {}", length);
        assert_eq!(format_length(length), "111.2 km");
    }

    #[test]
    fn test_closed_length_adds_closing_segment() {
        let ring = [
            from_lon_lat(0.0, 0.0),
            from_lon_lat(0.01, 0.0),
            from_lon_lat(0.01, 0.01),
        ];
        let open = geodesic_length(&ring, false);
        let closed = geodesic_length(&ring, true);
        let closing = geodesic_length(&[ring[2], ring[0]], false);
        assert!((closed - open - closing).abs() < 1e-6);
    }

    #[test]
    fn test_area_of_small_equatorial_square() {
        let ring = [
            from_lon_lat(0.0, 0.0),
            from_lon_lat(0.01, 0.0),
            from_lon_lat(0.01, 0.01),
            from_lon_lat(0.0, 0.01),
        ];
        let area = geodesic_area(&ring);
        // (6371008.8 m * 0.01 deg in radians)^2
        let expected = (MEAN_EARTH_RADIUS * 0.01f64.to_radians()).powi(2);
        assert!((area - expected).abs() / expected < 0.01, "area {}", area);
    }

    #[test]
    fn test_area_just_below_km2_threshold() {
        let side = 8.992e-4;
        let ring = [
            from_lon_lat(0.0, 0.0),
            from_lon_lat(side, 0.0),
            from_lon_lat(side, side),
            from_lon_lat(0.0, side),
        ];
        let area = geodesic_area(&ring);
        // a * sin(a) * R^2 with a in radians
        let a = f64::to_radians(side);
        let expected = a * a.sin() * MEAN_EARTH_RADIUS * MEAN_EARTH_RADIUS;
        assert!((area - 9997.32).abs() < 0.01, "area {}", area);
        assert!((area - expected).abs() < 1e-3, "area {} expected {}", area, expected);
        assert_eq!(format_area(area), "9997.32 m\u{b2}");
    }

    #[test]
    fn test_degenerate_ring_has_no_area() {
        assert_eq!(geodesic_area(&[]), 0.0);
        assert_eq!(geodesic_area(&[DVec2::ZERO, DVec2::new(100.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_circle_ring_starts_at_rim() {
        let center = DVec2::new(100.0, 100.0);
        let rim = DVec2::new(100.0, 150.0);
        let ring = circle_ring(center, rim, 64);
        assert_eq!(ring.len(), 64);
        assert!((ring[0] - rim).length() < 1e-9);
        assert!(ring.iter().all(|p| (p.distance(center) - 50.0).abs() < 1e-9));
    }

    #[test]
    fn test_tooltip_text() {
        assert_eq!(measure_tooltip_text(&Geometry::Point(DVec2::ZERO)), None);

        let line = Geometry::LineString(vec![from_lon_lat(0.0, 0.0), from_lon_lat(1.0, 0.0)]);
        assert_eq!(measure_tooltip_text(&line).as_deref(), Some("111.2 km"));

        let polygon = Geometry::Polygon(vec![
            from_lon_lat(0.0, 0.0),
            from_lon_lat(0.01, 0.0),
            from_lon_lat(0.01, 0.01),
            from_lon_lat(0.0, 0.01),
        ]);
        let text = measure_tooltip_text(&polygon).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("km\u{b2}"), "area first: {}", text);
        assert!(lines[1].ends_with(" km"), "length second: {}", text);
    }

    #[test]
    fn test_circle_tooltip_has_area_and_length() {
        let circle = Geometry::Circle {
            center: from_lon_lat(0.0, 0.0),
            rim: from_lon_lat(0.0, 0.0) + DVec2::new(0.0, 50.0),
        };
        let text = measure_tooltip_text(&circle).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // r = 50 m: area ~7850 m², circumference ~314 m
        assert!(lines[0].ends_with(" m\u{b2}"), "{}", text);
        assert!(lines[1].ends_with(" km"), "{}", text);
    }
}
