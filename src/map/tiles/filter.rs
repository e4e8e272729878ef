//! Night rendering of base map tiles: 80% grayscale followed by a full invert,
//! matching the CSS filter `grayscale(80%) invert(100%)`.

use image::RgbaImage;

const GRAYSCALE_AMOUNT: f32 = 0.8;

/// Rec. 709 luma weights used by the CSS grayscale filter
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Row-major 3x3 color matrix for a CSS `grayscale(amount)` filter
fn grayscale_matrix(amount: f32) -> [[f32; 3]; 3] {
    let keep = 1.0 - amount.clamp(0.0, 1.0);
    let mut matrix = [[0.0; 3]; 3];
    for (row, out) in matrix.iter_mut().enumerate() {
        for (col, cell) in out.iter_mut().enumerate() {
            let identity = if row == col { 1.0 } else { 0.0 };
            *cell = LUMA[col] + (identity - LUMA[col]) * keep;
        }
    }
    matrix
}

/// Apply the night filter to one RGB triple
pub fn night_pixel(rgb: [u8; 3], matrix: &[[f32; 3]; 3]) -> [u8; 3] {
    let input = rgb.map(f32::from);
    let mut out = [0u8; 3];
    for (channel, row) in out.iter_mut().zip(matrix) {
        let gray = row[0] * input[0] + row[1] * input[1] + row[2] * input[2];
        *channel = 255 - gray.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Apply the night filter in place. Alpha is untouched.
pub fn apply_night_filter(image: &mut RgbaImage) {
    let matrix = grayscale_matrix(GRAYSCALE_AMOUNT);
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let [r, g, b] = night_pixel([r, g, b], &matrix);
        pixel.0 = [r, g, b, a];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_white_becomes_black() {
        let matrix = grayscale_matrix(GRAYSCALE_AMOUNT);
        assert_eq!(night_pixel([255, 255, 255], &matrix), [0, 0, 0]);
        assert_eq!(night_pixel([0, 0, 0], &matrix), [255, 255, 255]);
    }

    #[test]
    fn test_color_keeps_a_trace_of_hue() {
        let matrix = grayscale_matrix(GRAYSCALE_AMOUNT);
        let [r, g, b] = night_pixel([255, 0, 0], &matrix);
        // 0.2126 + 0.7874 * 0.2 = 0.37008 of full red survives the grayscale
        assert_eq!(r, 255 - 94);
        assert!(g > r && b > r);
    }

    #[test]
    fn test_full_grayscale_matrix_rows_are_luma() {
        let matrix = grayscale_matrix(1.0);
        for row in matrix {
            assert_eq!(row, LUMA);
        }
    }

    #[test]
    fn test_filter_preserves_alpha() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 128]));
        apply_night_filter(&mut image);
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 128]));
    }
}
