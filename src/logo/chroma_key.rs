//! Single-corner chroma-key background removal.

use image::RgbaImage;

use crate::color::Color;

/// Pixels closer than this (RGB Euclidean distance) to the key are cleared.
pub const DEFAULT_TOLERANCE: f32 = 45.0;

/// Makes every pixel that matches the top-left pixel's color transparent.
///
/// The key is sampled from pixel `(0, 0)` only. Pixels whose RGB distance to
/// it is below `tolerance` get alpha 0; the rest are left untouched. Textured
/// or gradient backgrounds are only partly removed. Returns the number of
/// cleared pixels.
pub fn remove_background(img: &mut RgbaImage, tolerance: f32) -> usize {
    if img.width() == 0 || img.height() == 0 {
        return 0;
    }
    let key = Color::from(*img.get_pixel(0, 0));

    let mut cleared = 0;
    for pixel in img.pixels_mut() {
        if Color::from(*pixel).rgb_distance(&key) < tolerance {
            pixel[3] = 0;
            cleared += 1;
        }
    }
    cleared
}
