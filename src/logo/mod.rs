//! Logo compositing over a finished code image.
//!
//! The logo is drawn last, centered, on top of a backing patch in the
//! background color. The patch keeps dark modules from touching the logo
//! edge. It also destroys the codewords underneath, which level-H error
//! correction absorbs as long as the logo stays small. Scannability is not
//! verified here.
//!
//! Steps, in order:
//!
//! 1. **Backing** - fill the logo shape with the background color
//! 2. **Chroma key** - optionally clear pixels matching the logo's corner color
//! 3. **Logo** - draw the logo scaled to the full logo square, clipped to the shape

pub mod chroma_key;

pub use chroma_key::{DEFAULT_TOLERANCE, remove_background};

use std::fmt;
use std::path::Path as FsPath;
use std::str::FromStr;

use image::RgbaImage;
use log::debug;
use resvg::tiny_skia::{
    FillRule, FilterQuality, Mask, Path, PathBuilder, PixmapPaint, Rect, Transform,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::shape::{UnknownShape, fill_paint, rounded_rect};
use crate::surface::{Surface, rgba_image_to_pixmap};

/// Corner radius of [`LogoShape::Rounded`] as a fraction of the logo side.
const LOGO_CORNER_RATIO: f32 = 0.2;

/// Logo side as a fraction of the image side when none is given.
pub const DEFAULT_SIZE_FRACTION: f32 = 0.2;

// ============================================================================
// LogoShape
// ============================================================================

/// The outline a logo and its backing patch are clipped to.
///
/// Unknown names deserialize as [`LogoShape::Square`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum LogoShape {
    /// No clipping beyond the logo square.
    Square,
    /// Disk inscribed in the logo square.
    Circle,
    /// Logo square with 20% corner radius.
    #[default]
    Rounded,
}

impl LogoShape {
    pub fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Rounded => "rounded",
        }
    }

    /// Parses a shape name, falling back to [`LogoShape::Square`].
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or(Self::Square)
    }

    /// Outline of a logo square of side `side` at `(x, y)`.
    fn path(self, x: f32, y: f32, side: f32) -> Option<Path> {
        match self {
            Self::Square => Rect::from_xywh(x, y, side, side).map(PathBuilder::from_rect),
            Self::Circle => {
                let r = side / 2.0;
                PathBuilder::from_circle(x + r, y + r, r)
            }
            Self::Rounded => {
                let r = side * LOGO_CORNER_RATIO;
                rounded_rect(x, y, side, side, [r; 4])
            }
        }
    }
}

impl FromStr for LogoShape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        [Self::Square, Self::Circle, Self::Rounded]
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownShape(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for LogoShape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse_lossy(&name))
    }
}

impl fmt::Display for LogoShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// LogoSettings / LogoConfig
// ============================================================================

/// Serializable logo options, without the bitmap itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct LogoSettings {
    /// Logo side relative to the image side, in `(0, 1]`.
    pub size_fraction: f32,

    pub shape: LogoShape,

    /// Whether to chroma-key the logo's corner color away.
    pub remove_background: bool,
}

impl LogoSettings {
    /// Returns these settings with `size_fraction` clamped into `(0, 1]`.
    ///
    /// Non-positive or NaN fractions become [`DEFAULT_SIZE_FRACTION`].
    pub fn clamped(mut self) -> Self {
        self.size_fraction = if self.size_fraction > 0.0 {
            self.size_fraction.min(1.0)
        } else {
            DEFAULT_SIZE_FRACTION
        };
        self
    }
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            size_fraction: DEFAULT_SIZE_FRACTION,
            shape: LogoShape::default(),
            remove_background: false,
        }
    }
}

/// A decoded logo bitmap with its compositing options.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoConfig {
    image: RgbaImage,
    settings: LogoSettings,
}

impl LogoConfig {
    /// Creates a logo config with [`clamped`](LogoSettings::clamped) settings.
    pub fn new(image: RgbaImage, settings: LogoSettings) -> Self {
        Self {
            image,
            settings: settings.clamped(),
        }
    }

    /// Decodes a logo from encoded image bytes (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8], settings: LogoSettings) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::new(image, settings))
    }

    /// Decodes a logo from an image file.
    pub fn from_path(path: impl AsRef<FsPath>, settings: LogoSettings) -> Result<Self> {
        let image = image::open(path)?.to_rgba8();
        Ok(Self::new(image, settings))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn settings(&self) -> &LogoSettings {
        &self.settings
    }

    /// Replaces the options, keeping the bitmap.
    pub fn with_settings(self, settings: LogoSettings) -> Self {
        Self::new(self.image, settings)
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `logo` centered over `surface`.
///
/// The backing patch is painted in `background` and clipped to the logo
/// shape, then the (optionally chroma-keyed) logo is drawn scaled to the
/// full logo square under the same clip.
pub fn apply_logo(surface: &mut Surface, logo: &LogoConfig, background: Color) -> Result<()> {
    let resolution = surface.resolution();
    let side = resolution as f32 * logo.settings.size_fraction;
    let origin = (resolution as f32 - side) / 2.0;
    let shape = logo.settings.shape;

    let Some(outline) = shape.path(origin, origin, side) else {
        debug!("logo side {side}px is too small to draw");
        return Ok(());
    };

    let pixmap = surface.pixmap_mut();
    pixmap.fill_path(
        &outline,
        &fill_paint(background),
        FillRule::Winding,
        Transform::identity(),
        None,
    );

    // Off-surface copy so the caller's bitmap is never modified.
    let mut image = logo.image.clone();
    if logo.settings.remove_background {
        let cleared = remove_background(&mut image, DEFAULT_TOLERANCE);
        debug!("chroma key cleared {cleared} logo pixels");
    }
    let Some(source) = rgba_image_to_pixmap(&image) else {
        debug!("logo bitmap is empty, only the backing patch was drawn");
        return Ok(());
    };

    let clip = match shape {
        LogoShape::Square => None,
        LogoShape::Circle | LogoShape::Rounded => {
            let mut mask = Mask::new(resolution, resolution).ok_or(Error::Surface {
                width: resolution,
                height: resolution,
            })?;
            mask.fill_path(&outline, FillRule::Winding, true, Transform::identity());
            Some(mask)
        }
    };

    let transform = Transform::from_row(
        side / source.width() as f32,
        0.0,
        0.0,
        side / source.height() as f32,
        origin,
        origin,
    );
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, clip.as_ref());

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
