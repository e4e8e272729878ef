//! Drawn geometries and the feature component that holds them.

use bevy::math::DVec2;
use bevy::prelude::*;
use geo::Centroid;

use super::mode::DrawMode;

/// A geometry in Web Mercator metres
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(DVec2),
    LineString(Vec<DVec2>),
    /// Exterior ring, stored open (first vertex is not repeated)
    Polygon(Vec<DVec2>),
    Circle { center: DVec2, rim: DVec2 },
}

impl Geometry {
    pub fn mode(&self) -> DrawMode {
        match self {
            Geometry::Point(_) => DrawMode::Point,
            Geometry::LineString(_) => DrawMode::LineString,
            Geometry::Polygon(_) => DrawMode::Polygon,
            Geometry::Circle { .. } => DrawMode::Circle,
        }
    }

    /// Most recently added coordinate: the last vertex, or the rim point of a circle
    pub fn last_coordinate(&self) -> Option<DVec2> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::LineString(coords) | Geometry::Polygon(coords) => coords.last().copied(),
            Geometry::Circle { rim, .. } => Some(*rim),
        }
    }

    /// Where the measurement tooltip is pinned: the last vertex of a line, the
    /// first vertex of a polygon (its ring closes there), or the rim point due
    /// east of a circle's center.
    pub fn measure_anchor(&self) -> Option<DVec2> {
        match self {
            Geometry::Polygon(coords) => coords.first().copied(),
            Geometry::Circle { center, rim } => {
                Some(*center + DVec2::X * center.distance(*rim))
            }
            _ => self.last_coordinate(),
        }
    }

    /// Circle radius in Mercator metres
    pub fn radius(&self) -> Option<f64> {
        match self {
            Geometry::Circle { center, rim } => Some(center.distance(*rim)),
            _ => None,
        }
    }

    /// Vertices that can be snapped to
    pub fn vertices(&self) -> &[DVec2] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::LineString(coords) | Geometry::Polygon(coords) => coords,
            Geometry::Circle { .. } => &[],
        }
    }

    /// Straight edges, including the closing edge of a polygon
    pub fn edges(&self) -> Vec<(DVec2, DVec2)> {
        match self {
            Geometry::LineString(coords) => coords.windows(2).map(|w| (w[0], w[1])).collect(),
            Geometry::Polygon(coords) if coords.len() >= 2 => coords
                .iter()
                .zip(coords.iter().cycle().skip(1))
                .map(|(a, b)| (*a, *b))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Where the insertion flash is drawn: the point itself, a circle's center,
    /// or the centroid of a line or polygon.
    pub fn flash_anchor(&self) -> Option<DVec2> {
        let centroid = match self {
            Geometry::Point(p) => return Some(*p),
            Geometry::Circle { center, .. } => return Some(*center),
            Geometry::LineString(coords) => to_geo_line(coords).centroid(),
            Geometry::Polygon(coords) => geo::Polygon::new(to_geo_line(coords), vec![]).centroid(),
        };
        centroid
            .map(|p| DVec2::new(p.x(), p.y()))
            .or_else(|| self.last_coordinate())
    }
}

fn to_geo_line(coords: &[DVec2]) -> geo::LineString<f64> {
    coords
        .iter()
        .map(|c| geo::Coord { x: c.x, y: c.y })
        .collect()
}

/// A committed feature in the vector layer
#[derive(Component, Debug, Clone)]
pub struct MapFeature {
    pub geometry: Geometry,
}

impl MapFeature {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }
}
