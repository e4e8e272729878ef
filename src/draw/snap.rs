//! Pointer snapping to existing feature vertices and edges.

use bevy::math::DVec2;

use super::geometry::Geometry;

/// Closest point to `point` on the segment `start..end`
pub fn closest_point_on_segment(point: DVec2, start: DVec2, end: DVec2) -> DVec2 {
    let segment = end - start;
    let length_sq = segment.length_squared();

    if length_sq < 1e-12 {
        // Segment is essentially a point
        return start;
    }

    // Project point onto line, clamped to segment
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    start + segment * t
}

/// Closest point on a geometry's outline (edges or circle rim)
fn closest_edge_point(point: DVec2, geometry: &Geometry) -> Option<DVec2> {
    if let (Geometry::Circle { center, .. }, Some(radius)) = (geometry, geometry.radius()) {
        let direction = (point - *center).try_normalize().unwrap_or(DVec2::X);
        return Some(*center + direction * radius);
    }

    geometry
        .edges()
        .into_iter()
        .map(|(a, b)| closest_point_on_segment(point, a, b))
        .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
}

/// Snap `pointer` to the nearest feature vertex within `tolerance` (Mercator metres),
/// falling back to the nearest edge point. `None` when nothing is in range.
pub fn snap_point<'a>(
    pointer: DVec2,
    geometries: impl IntoIterator<Item = &'a Geometry>,
    tolerance: f64,
) -> Option<DVec2> {
    let mut best_vertex: Option<(f64, DVec2)> = None;
    let mut best_edge: Option<(f64, DVec2)> = None;

    for geometry in geometries {
        for vertex in geometry.vertices() {
            let d = vertex.distance(pointer);
            if d <= tolerance && best_vertex.is_none_or(|(best, _)| d < best) {
                best_vertex = Some((d, *vertex));
            }
        }

        if let Some(edge_point) = closest_edge_point(pointer, geometry) {
            let d = edge_point.distance(pointer);
            if d <= tolerance && best_edge.is_none_or(|(best, _)| d < best) {
                best_edge = Some((d, edge_point));
            }
        }
    }

    best_vertex.or(best_edge).map(|(_, p)| p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point_on_segment() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(DVec2::new(5.0, 3.0), a, b), DVec2::new(5.0, 0.0));
        assert_eq!(closest_point_on_segment(DVec2::new(-4.0, 1.0), a, b), a);
        assert_eq!(closest_point_on_segment(DVec2::new(14.0, 1.0), a, b), b);
        assert_eq!(closest_point_on_segment(DVec2::new(3.0, 3.0), a, a), a);
    }

    #[test]
    fn test_vertex_wins_over_edge() {
        let line = Geometry::LineString(vec![DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0)]);
        // Edge point (3, 0) is closer, but the vertex is within tolerance too
        let snapped = snap_point(DVec2::new(3.0, 2.0), [&line], 10.0);
        assert_eq!(snapped, Some(DVec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_edge_snap() {
        let line = Geometry::LineString(vec![DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0)]);
        let snapped = snap_point(DVec2::new(50.0, 4.0), [&line], 10.0);
        assert_eq!(snapped, Some(DVec2::new(50.0, 0.0)));
    }

    #[test]
    fn test_out_of_range_does_not_snap() {
        let line = Geometry::LineString(vec![DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0)]);
        assert_eq!(snap_point(DVec2::new(50.0, 40.0), [&line], 10.0), None);
        assert_eq!(snap_point(DVec2::ZERO, std::iter::empty::<&Geometry>(), 10.0), None);
    }

    #[test]
    fn test_snap_to_circle_rim() {
        let circle = Geometry::Circle {
            center: DVec2::ZERO,
            rim: DVec2::new(100.0, 0.0),
        };
        let snapped = snap_point(DVec2::new(0.0, 95.0), [&circle], 10.0).unwrap();
        assert!((snapped - DVec2::new(0.0, 100.0)).length() < 1e-9);
    }

    #[test]
    fn test_snap_to_point_feature() {
        let point = Geometry::Point(DVec2::new(20.0, 20.0));
        assert_eq!(
            snap_point(DVec2::new(25.0, 20.0), [&point], 10.0),
            Some(DVec2::new(20.0, 20.0))
        );
    }
}
