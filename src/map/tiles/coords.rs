//! XYZ tile addressing in Web Mercator.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::constants::MAX_TILE_ZOOM;
use crate::map::projection::HALF_WORLD;

/// A tile address. `x` is unwrapped so tiles left/right of the antimeridian
/// keep their on-screen position; [`TileCoord::wrapped_x`] gives the server index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: i64,
    pub y: i64,
}

impl TileCoord {
    pub fn new(z: u8, x: i64, y: i64) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at this zoom
    pub fn tiles_per_axis(z: u8) -> i64 {
        1i64 << z
    }

    /// Edge length of a tile at zoom `z` in Mercator metres
    pub fn size_m(z: u8) -> f64 {
        2.0 * HALF_WORLD / Self::tiles_per_axis(z) as f64
    }

    /// Column index on the tile server
    pub fn wrapped_x(&self) -> i64 {
        self.x.rem_euclid(Self::tiles_per_axis(self.z))
    }

    /// Mercator (min, max) corners of the tile
    pub fn extent(&self) -> (DVec2, DVec2) {
        let size = Self::size_m(self.z);
        let min_x = -HALF_WORLD + self.x as f64 * size;
        let max_y = HALF_WORLD - self.y as f64 * size;
        (
            DVec2::new(min_x, max_y - size),
            DVec2::new(min_x + size, max_y),
        )
    }

    pub fn center(&self) -> DVec2 {
        let (min, max) = self.extent();
        (min + max) / 2.0
    }

    /// Fill a `{z}/{x}/{y}` URL template
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.wrapped_x().to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// Integer tile zoom used for a fractional view zoom
pub fn tile_zoom_for_view(zoom: f64) -> u8 {
    zoom.round().clamp(0.0, MAX_TILE_ZOOM as f64) as u8
}

/// Tiles at zoom `z` covering a viewport of `viewport_px` centred on `center`,
/// nearest to the center first.
pub fn visible_tiles(center: DVec2, resolution: f64, viewport_px: Vec2, z: u8) -> Vec<TileCoord> {
    let half = viewport_px.as_dvec2() * resolution / 2.0;
    let min = center - half;
    let max = center + half;
    let size = TileCoord::size_m(z);
    let last_row = TileCoord::tiles_per_axis(z) - 1;

    let x0 = ((min.x + HALF_WORLD) / size).floor() as i64;
    let x1 = ((max.x + HALF_WORLD) / size).floor() as i64;
    let y0 = (((HALF_WORLD - max.y) / size).floor() as i64).clamp(0, last_row);
    let y1 = (((HALF_WORLD - min.y) / size).floor() as i64).clamp(0, last_row);

    let mut tiles: Vec<TileCoord> = (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| TileCoord::new(z, x, y)))
        .collect();

    tiles.sort_by(|a, b| {
        let da = a.center().distance_squared(center);
        let db = b.center().distance_squared(center);
        da.total_cmp(&db)
    });
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::{from_lon_lat, resolution_for_zoom};

    #[test]
    fn test_zoom0_tile_covers_world() {
        let (min, max) = TileCoord::new(0, 0, 0).extent();
        assert!((min.x + HALF_WORLD).abs() < 1e-6);
        assert!((min.y + HALF_WORLD).abs() < 1e-6);
        assert!((max.x - HALF_WORLD).abs() < 1e-6);
        assert!((max.y - HALF_WORLD).abs() < 1e-6);
    }

    #[test]
    fn test_url_template() {
        let tile = TileCoord::new(10, 818, 531);
        assert_eq!(
            tile.url("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            "https://tile.openstreetmap.org/10/818/531.png"
        );
    }

    #[test]
    fn test_wrapped_x() {
        assert_eq!(TileCoord::new(2, -1, 0).wrapped_x(), 3);
        assert_eq!(TileCoord::new(2, 4, 0).wrapped_x(), 0);
        assert_eq!(TileCoord::new(2, 2, 0).wrapped_x(), 2);
    }

    #[test]
    fn test_tile_zoom_for_view() {
        assert_eq!(tile_zoom_for_view(10.4), 10);
        assert_eq!(tile_zoom_for_view(10.6), 11);
        assert_eq!(tile_zoom_for_view(-3.0), 0);
        assert_eq!(tile_zoom_for_view(25.0), MAX_TILE_ZOOM);
    }

    #[test]
    fn test_visible_tiles_start_with_center_tile() {
        let center = from_lon_lat(107.60981, -6.914744);
        let tiles = visible_tiles(center, resolution_for_zoom(10.0), Vec2::new(1600.0, 900.0), 10);

        // Bandung sits in tile 10/818/531
        assert_eq!(tiles[0], TileCoord::new(10, 818, 531));
        // 1600x900 px at 256 px tiles needs at least 7x4 tiles
        assert!(tiles.len() >= 28);
        assert!(tiles.iter().all(|t| t.z == 10));
    }

    #[test]
    fn test_visible_tiles_rows_are_clamped() {
        let tiles = visible_tiles(DVec2::ZERO, resolution_for_zoom(0.0), Vec2::new(2000.0, 2000.0), 1);
        assert!(tiles.iter().all(|t| (0..=1).contains(&t.y)));
    }
}
