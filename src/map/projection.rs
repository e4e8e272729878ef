//! Web Mercator (EPSG:3857) projection helpers.
//!
//! Geometry is stored in Mercator metres as `DVec2`. Rendering uses f32 world
//! coordinates relative to [`MapOrigin`] so that features near the start view keep
//! sub-metre precision.

use bevy::math::DVec2;
use bevy::prelude::*;
use std::f64::consts::PI;

use crate::constants::TILE_SIZE_PX;

/// Sphere radius used by Web Mercator
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world (x range is `-HALF_WORLD..HALF_WORLD`)
pub const HALF_WORLD: f64 = PI * EARTH_RADIUS;

/// Metres per pixel at zoom 0
pub const ZOOM0_RESOLUTION: f64 = 2.0 * HALF_WORLD / TILE_SIZE_PX as f64;

/// Project geographic degrees (lon, lat) to Web Mercator metres.
///
/// Latitudes beyond the projection limit are clamped to the world edge.
pub fn from_lon_lat(lon: f64, lat: f64) -> DVec2 {
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    DVec2::new(x, y.clamp(-HALF_WORLD, HALF_WORLD))
}

/// Unproject Web Mercator metres to geographic degrees as (lon, lat).
pub fn to_lon_lat(point: DVec2) -> DVec2 {
    let lon = (point.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    DVec2::new(lon, lat)
}

/// Metres per screen pixel at a (fractional) zoom level
pub fn resolution_for_zoom(zoom: f64) -> f64 {
    ZOOM0_RESOLUTION / 2f64.powf(zoom)
}

/// Extent the view center is kept inside: the Mercator world, doubled horizontally
pub fn view_extent() -> (DVec2, DVec2) {
    (
        DVec2::new(-2.0 * HALF_WORLD, -HALF_WORLD),
        DVec2::new(2.0 * HALF_WORLD, HALF_WORLD),
    )
}

/// Clamp a Mercator point into [`view_extent`]
pub fn clamp_to_extent(point: DVec2) -> DVec2 {
    let (min, max) = view_extent();
    point.clamp(min, max)
}

/// Mercator point that maps to world (0, 0)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct MapOrigin {
    pub mercator: DVec2,
}

impl MapOrigin {
    pub fn new(mercator: DVec2) -> Self {
        Self { mercator }
    }

    /// Mercator metres to render-space world coordinates
    pub fn to_world(&self, mercator: DVec2) -> Vec2 {
        (mercator - self.mercator).as_vec2()
    }

    /// Render-space world coordinates to Mercator metres
    pub fn to_mercator(&self, world: Vec2) -> DVec2 {
        world.as_dvec2() + self.mercator
    }
}
