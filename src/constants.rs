//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

// ============================================================================
// View
// ============================================================================

/// Initial view center longitude (Bandung)
pub const DEFAULT_CENTER_LON: f64 = 107.60981;

/// Initial view center latitude (Bandung)
pub const DEFAULT_CENTER_LAT: f64 = -6.914744;

/// Initial zoom level
pub const DEFAULT_ZOOM: f64 = 10.0;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 19.0;

/// Zoom delta applied by the toolbar zoom buttons
pub const ZOOM_BUTTON_STEP: f64 = 2.0;

/// Duration of the animated zoom triggered by the toolbar buttons
pub const ZOOM_ANIMATION_SECS: f64 = 0.5;

/// Zoom levels per mouse wheel line
pub const WHEEL_ZOOM_PER_LINE: f64 = 0.5;

/// Zoom levels per mouse wheel pixel (touchpads)
pub const WHEEL_ZOOM_PER_PIXEL: f64 = 0.01;

// ============================================================================
// Tiles
// ============================================================================

/// Edge length of a raster tile in pixels
pub const TILE_SIZE_PX: u32 = 256;

/// Highest zoom level requested from the tile server
pub const MAX_TILE_ZOOM: u8 = 19;

/// Maximum number of tile downloads started per frame.
/// Higher values fill the screen faster but hammer the tile server.
pub const MAX_TILE_FETCHES_PER_FRAME: usize = 4;

/// Default raster tile source
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// User agent sent with tile requests (the OSM tile policy requires one)
pub const DEFAULT_USER_AGENT: &str = concat!("mapsketch/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Drawing
// ============================================================================

/// Snap radius around existing feature vertices and edges, in pixels
pub const SNAP_TOLERANCE_PX: f64 = 10.0;

/// Radius around the first polygon vertex that closes the ring, in pixels
pub const CLOSE_RING_TOLERANCE_PX: f64 = 12.0;

/// A press and release farther apart than this (pixels) is a drag, not a click
pub const CLICK_TOLERANCE_PX: f32 = 6.0;

/// Two clicks closer than this (seconds) count as a double click
pub const DOUBLE_CLICK_SECS: f64 = 0.3;

/// Number of segments used when measuring a circle as a polygon
pub const CIRCLE_MEASURE_SEGMENTS: usize = 64;

/// Screen offset of the measurement tooltip from its anchor, in pixels
pub const TOOLTIP_OFFSET_PX: (f32, f32) = (15.0, -15.0);

// ============================================================================
// Flash animation
// ============================================================================

/// Default flash duration in milliseconds
pub const DEFAULT_FLASH_DURATION_MS: u64 = 3000;

/// Accepted flash duration range in milliseconds
pub const MIN_FLASH_DURATION_MS: u64 = 2000;
pub const MAX_FLASH_DURATION_MS: u64 = 3000;

/// Flash circle radius at the start of the animation, in pixels
pub const FLASH_BASE_RADIUS_PX: f32 = 5.0;

/// Radius the flash circle grows by over the animation, in pixels
pub const FLASH_GROWTH_PX: f32 = 50.0;
