//! Render settings and serializable style profiles.
//!
//! A [`RenderConfig`] is the immutable value the renderer reads for one pass.
//! A [`StyleProfile`] bundles it with logo options in a JSON format that a
//! front end can persist or send across a process boundary.
//!
//! # Example
//!
//! ```
//! use qr_pro_renderer::{ModuleShape, RenderConfig, StyleProfile};
//!
//! let render = RenderConfig {
//!     body: ModuleShape::Circle,
//!     outer_eye: ModuleShape::Rounded,
//!     ..RenderConfig::default()
//! };
//! let profile = StyleProfile::new().with_render(render);
//!
//! let json = profile.to_json().unwrap();
//! let restored = StyleProfile::from_json(&json).unwrap();
//! assert_eq!(restored.render.body, ModuleShape::Circle);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::eye::EyeClass;
use crate::logo::LogoSettings;
use crate::shape::ModuleShape;

/// Output width and height in pixels.
pub const RESOLUTION: u32 = 2048;

/// Quiet-zone width in modules.
pub const MARGIN: usize = 4;

// ============================================================================
// RenderConfig
// ============================================================================

/// Everything the grid renderer needs besides the grid itself.
///
/// # JSON Format
///
/// ```json
/// {
///   "resolution": 2048,
///   "margin": 4,
///   "foreground": "#000000",
///   "background": "#ffffff",
///   "outerEye": "rounded",
///   "innerEye": "circle",
///   "body": "square"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RenderConfig {
    /// Side of the square output in pixels.
    pub resolution: u32,

    /// Quiet-zone width in modules on every side.
    pub margin: usize,

    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub foreground: Color,

    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub background: Color,

    /// Shape for the dark ring of each finder pattern.
    pub outer_eye: ModuleShape,

    /// Shape for the 3x3 core of each finder pattern.
    pub inner_eye: ModuleShape,

    /// Shape for every other dark module.
    pub body: ModuleShape,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: RESOLUTION,
            margin: MARGIN,
            foreground: Color::BLACK,
            background: Color::WHITE,
            outer_eye: ModuleShape::Square,
            inner_eye: ModuleShape::Square,
            body: ModuleShape::Square,
        }
    }
}

impl RenderConfig {
    /// Side length of one module in pixels for an `n x n` grid.
    ///
    /// Computed once per render and shared by every module so grid lines
    /// stay aligned. Returns `None` if the grid plus quiet zone spans zero
    /// modules or more than `usize::MAX`.
    pub fn cell_size(&self, n: usize) -> Option<f32> {
        let span = self.margin.checked_mul(2)?.checked_add(n)?;
        (span > 0).then(|| self.resolution as f32 / span as f32)
    }

    /// The shape to draw for a module of the given class.
    pub fn shape_for(&self, class: EyeClass) -> ModuleShape {
        match class {
            EyeClass::OuterRing => self.outer_eye,
            EyeClass::InnerCore => self.inner_eye,
            EyeClass::NotEye => self.body,
        }
    }

    /// Returns true if every region is drawn as plain squares.
    pub fn is_plain(&self) -> bool {
        [self.outer_eye, self.inner_eye, self.body]
            .iter()
            .all(|s| *s == ModuleShape::Square)
    }
}

// ============================================================================
// StyleProfile
// ============================================================================

/// A serializable bundle of render and logo settings.
///
/// The logo bitmap itself is not part of a profile; only how it is placed.
/// Missing fields fall back to their defaults, so `{}` is a valid profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct StyleProfile {
    #[serde(default)]
    pub render: RenderConfig,

    /// Logo placement. `None` means no logo options were set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoSettings>,
}

impl StyleProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn with_logo(mut self, logo: LogoSettings) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// JSON Schema describing the profile format.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(StyleProfile)
    }
}

// ============================================================================
// Tests
// ============================================================================
