//! The geometry being drawn: committed vertices plus the trailing pointer.

use bevy::math::DVec2;

use super::geometry::Geometry;
use super::mode::DrawMode;

#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    mode: DrawMode,
    vertices: Vec<DVec2>,
    pointer: Option<DVec2>,
}

impl Sketch {
    pub fn new(mode: DrawMode) -> Self {
        Self {
            mode,
            vertices: Vec::new(),
            pointer: None,
        }
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn set_pointer(&mut self, pointer: DVec2) {
        self.pointer = Some(pointer);
    }

    /// Handle a click at `point`. Returns the finished geometry when the click
    /// completes it. `close_tolerance` is the distance (Mercator metres) around the
    /// first polygon vertex that closes the ring.
    pub fn click(&mut self, point: DVec2, close_tolerance: f64) -> Option<Geometry> {
        self.pointer = Some(point);
        match self.mode {
            DrawMode::Point => Some(Geometry::Point(point)),
            DrawMode::LineString => {
                self.vertices.push(point);
                None
            }
            DrawMode::Polygon => {
                let closes = self.vertices.len() >= 3
                    && self
                        .vertices
                        .first()
                        .is_some_and(|first| first.distance(point) <= close_tolerance);
                if closes {
                    return self.finish();
                }
                self.vertices.push(point);
                None
            }
            DrawMode::Circle => match self.vertices.first() {
                Some(center) => Some(Geometry::Circle {
                    center: *center,
                    rim: point,
                }),
                None => {
                    self.vertices.push(point);
                    None
                }
            },
        }
    }

    /// Finish with the committed vertices, if there are enough of them
    pub fn finish(&self) -> Option<Geometry> {
        match self.mode {
            DrawMode::LineString if self.vertices.len() >= 2 => {
                Some(Geometry::LineString(self.vertices.clone()))
            }
            DrawMode::Polygon if self.vertices.len() >= 3 => {
                Some(Geometry::Polygon(self.vertices.clone()))
            }
            _ => None,
        }
    }

    /// Remove the most recent vertex
    pub fn undo(&mut self) -> Option<DVec2> {
        self.vertices.pop()
    }

    /// Live geometry including the trailing pointer, as it should be displayed
    /// and measured. `None` until there is something to show.
    pub fn geometry(&self) -> Option<Geometry> {
        match self.mode {
            DrawMode::Point => self.pointer.map(Geometry::Point),
            DrawMode::LineString | DrawMode::Polygon => {
                if self.vertices.is_empty() {
                    return None;
                }
                let mut coords = self.vertices.clone();
                coords.extend(self.pointer);
                if self.mode == DrawMode::LineString {
                    Some(Geometry::LineString(coords))
                } else {
                    Some(Geometry::Polygon(coords))
                }
            }
            DrawMode::Circle => {
                let center = *self.vertices.first()?;
                Some(Geometry::Circle {
                    center,
                    rim: self.pointer.unwrap_or(center),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 5.0;

    #[test]
    fn test_point_commits_on_click() {
        let mut sketch = Sketch::new(DrawMode::Point);
        let p = DVec2::new(3.0, 4.0);
        assert_eq!(sketch.click(p, TOL), Some(Geometry::Point(p)));
    }

    #[test]
    fn test_line_needs_two_vertices() {
        let mut sketch = Sketch::new(DrawMode::LineString);
        assert_eq!(sketch.click(DVec2::ZERO, TOL), None);
        assert_eq!(sketch.finish(), None);

        sketch.click(DVec2::new(100.0, 0.0), TOL);
        assert_eq!(
            sketch.finish(),
            Some(Geometry::LineString(vec![DVec2::ZERO, DVec2::new(100.0, 0.0)]))
        );
    }

    #[test]
    fn test_line_geometry_trails_pointer() {
        let mut sketch = Sketch::new(DrawMode::LineString);
        assert_eq!(sketch.geometry(), None);

        sketch.click(DVec2::ZERO, TOL);
        sketch.set_pointer(DVec2::new(10.0, 0.0));
        assert_eq!(
            sketch.geometry(),
            Some(Geometry::LineString(vec![DVec2::ZERO, DVec2::new(10.0, 0.0)]))
        );
    }

    #[test]
    fn test_polygon_closes_on_first_vertex() {
        let mut sketch = Sketch::new(DrawMode::Polygon);
        sketch.click(DVec2::new(0.0, 0.0), TOL);
        sketch.click(DVec2::new(100.0, 0.0), TOL);
        // Too few vertices yet: clicking the start adds a vertex instead
        assert_eq!(sketch.click(DVec2::new(1.0, 1.0), TOL), None);
        assert_eq!(sketch.vertices().len(), 3);

        sketch.click(DVec2::new(100.0, 100.0), TOL);
        let done = sketch.click(DVec2::new(2.0, -2.0), TOL);
        assert_eq!(
            done,
            Some(Geometry::Polygon(vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(100.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(100.0, 100.0),
            ]))
        );
    }

    #[test]
    fn test_circle_two_clicks() {
        let mut sketch = Sketch::new(DrawMode::Circle);
        assert_eq!(sketch.click(DVec2::new(10.0, 10.0), TOL), None);
        assert_eq!(
            sketch.geometry(),
            Some(Geometry::Circle {
                center: DVec2::new(10.0, 10.0),
                rim: DVec2::new(10.0, 10.0)
            })
        );

        sketch.set_pointer(DVec2::new(20.0, 10.0));
        assert_eq!(
            sketch.geometry().and_then(|g| g.radius()),
            Some(10.0)
        );

        let done = sketch.click(DVec2::new(30.0, 10.0), TOL);
        assert_eq!(
            done,
            Some(Geometry::Circle {
                center: DVec2::new(10.0, 10.0),
                rim: DVec2::new(30.0, 10.0)
            })
        );
        // Circles never finish without the second click
        assert_eq!(Sketch::new(DrawMode::Circle).finish(), None);
    }

    #[test]
    fn test_undo_removes_last_vertex() {
        let mut sketch = Sketch::new(DrawMode::LineString);
        sketch.click(DVec2::ZERO, TOL);
        sketch.click(DVec2::ONE, TOL);
        assert_eq!(sketch.undo(), Some(DVec2::ONE));
        assert_eq!(sketch.vertices(), &[DVec2::ZERO]);
        sketch.undo();
        assert!(sketch.is_empty());
        assert_eq!(sketch.undo(), None);
    }
}
