//! Blocking tile download and decode, run on the async compute pool.

use std::io::Read;

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::RgbaImage;
use thiserror::Error;

use super::coords::TileCoord;
use super::filter::apply_night_filter;

/// Upper bound on a tile body; raster tiles are a few tens of KiB
const MAX_TILE_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum TileError {
    #[error("tile request failed: {0}")]
    Request(Box<ureq::Error>),
    #[error("failed to read tile body: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode tile image: {0}")]
    Decode(#[from] image::ImageError),
}

impl From<ureq::Error> for TileError {
    fn from(e: ureq::Error) -> Self {
        TileError::Request(Box::new(e))
    }
}

/// Everything a fetch task needs, owned so it can move to another thread
#[derive(Debug, Clone)]
pub struct TileRequest {
    pub coord: TileCoord,
    pub url: String,
    pub user_agent: String,
    pub night_filter: bool,
}

impl TileRequest {
    pub fn new(coord: TileCoord, template: &str, user_agent: &str, night_filter: bool) -> Self {
        Self {
            coord,
            url: coord.url(template),
            user_agent: user_agent.to_string(),
            night_filter,
        }
    }
}

/// Download and decode one tile
pub fn fetch_tile(request: &TileRequest) -> Result<RgbaImage, TileError> {
    let response = ureq::get(&request.url)
        .set("User-Agent", &request.user_agent)
        .call()?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_TILE_BYTES)
        .read_to_end(&mut bytes)?;

    decode_tile(&bytes, request.night_filter)
}

/// Decode PNG/JPEG bytes to RGBA, applying the night filter if enabled
pub fn decode_tile(bytes: &[u8], night_filter: bool) -> Result<RgbaImage, TileError> {
    let mut rgba = image::load_from_memory(bytes)?.to_rgba8();
    if night_filter {
        apply_night_filter(&mut rgba);
    }
    Ok(rgba)
}

/// Wrap decoded pixels as a Bevy texture
pub fn tile_image(rgba: RgbaImage) -> Image {
    let (width, height) = rgba.dimensions();
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        rgba.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(4, 4, Rgba(color));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_request_fills_url() {
        let request = TileRequest::new(
            TileCoord::new(3, -1, 2),
            "https://example.org/{z}/{x}/{y}.png",
            "test-agent",
            true,
        );
        assert_eq!(request.url, "https://example.org/3/7/2.png");
    }

    #[test]
    fn test_decode_without_filter() {
        let rgba = decode_tile(&png_bytes([10, 20, 30, 255]), false).unwrap();
        assert_eq!(rgba.dimensions(), (4, 4));
        assert_eq!(rgba.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_with_night_filter() {
        let rgba = decode_tile(&png_bytes([255, 255, 255, 255]), true).unwrap();
        assert_eq!(rgba.get_pixel(3, 3).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_tile(b"not an image", false);
        assert!(matches!(result, Err(TileError::Decode(_))));
    }

    #[test]
    fn test_tile_image_size() {
        let image = tile_image(RgbaImage::new(256, 256));
        assert_eq!(image.width(), 256);
        assert_eq!(image.height(), 256);
    }
}
