//! The raster surface a render pass draws into.
//!
//! A [`Surface`] wraps a `tiny_skia` pixmap. Pixels are stored premultiplied
//! internally and converted to straight alpha on the way out.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, IntSize, Pixmap, PixmapRef};

use crate::color::Color;
use crate::error::{Error, Result};

/// A square RGBA pixel buffer owned by exactly one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocates a `resolution x resolution` surface filled with `background`.
    pub fn new(resolution: u32, background: Color) -> Result<Self> {
        let mut pixmap = Pixmap::new(resolution, resolution).ok_or(Error::Surface {
            width: resolution,
            height: resolution,
        })?;
        pixmap.fill(background.to_skia());
        Ok(Self { pixmap })
    }

    /// Side length in pixels.
    pub fn resolution(&self) -> u32 {
        self.pixmap.width()
    }

    /// Returns the straight-alpha color at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(px.red(), px.green(), px.blue(), px.alpha()))
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Converts to a straight-alpha [`RgbaImage`].
    pub fn to_rgba_image(&self) -> RgbaImage {
        pixmap_to_rgba_image(self.pixmap.as_ref())
    }

    /// Serializes the surface as a PNG byte stream.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(self.to_rgba_image())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }
}

/// Converts a premultiplied pixmap into a straight-alpha image.
fn pixmap_to_rgba_image(pixmap: PixmapRef<'_>) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Converts a straight-alpha image into a premultiplied pixmap.
///
/// Returns `None` for zero-sized images.
pub(crate) fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut pixmap = Pixmap::new(size.width(), size.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_background() {
        let surface = Surface::new(8, Color::rgb(10, 20, 30)).unwrap();
        assert_eq!(surface.resolution(), 8);
        assert_eq!(surface.pixel(7, 7), Some(Color::rgb(10, 20, 30)));
        assert_eq!(surface.pixel(8, 0), None);
    }

    #[test]
    fn zero_resolution_is_an_error() {
        assert!(matches!(
            Surface::new(0, Color::WHITE),
            Err(Error::Surface { width: 0, height: 0 })
        ));
    }

    #[test]
    fn png_round_trips_through_image() {
        let surface = Surface::new(4, Color::rgb(255, 0, 0)).unwrap();
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(2, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn pixmap_conversion_keeps_transparent_pixels() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([200, 100, 50, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let back = pixmap_to_rgba_image(pixmap.as_ref());
        assert_eq!(back.get_pixel(0, 0).0, [200, 100, 50, 255]);
        assert_eq!(back.get_pixel(1, 0)[3], 0);
    }

    #[test]
    fn empty_image_has_no_pixmap() {
        assert!(rgba_image_to_pixmap(&RgbaImage::new(0, 0)).is_none());
    }
}
