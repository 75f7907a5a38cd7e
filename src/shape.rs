//! Module shapes and the per-cell rasterizer.
//!
//! Every shape is inscribed in one cell `[x, x + cell] x [y, y + cell]`.
//! Shapes that tile edge-to-edge (square, rounded, leaf) are drawn
//! [`SEAM_OVERLAP`] pixels larger so anti-aliasing does not leave hairline
//! gaps between neighbouring cells.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use resvg::tiny_skia::{FillRule, Paint, Path, PathBuilder, Rect, Transform};
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Color;
use crate::surface::Surface;

/// Extra size added to tiling shapes.
pub const SEAM_OVERLAP: f32 = 0.5;

/// Corner radius of `Rounded` and `Leaf`, as a fraction of the cell size.
const CORNER_RATIO: f32 = 0.4;

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

// ============================================================================
// ModuleShape
// ============================================================================

/// The shape drawn for a single dark module.
///
/// Deserialization is lenient: unknown names become [`ModuleShape::Square`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ModuleShape {
    #[default]
    Square,
    Circle,
    Rounded,
    Leaf,
    Diamond,
    Hexagon,
    Star,
}

impl ModuleShape {
    pub const ALL: [Self; 7] = [
        Self::Square,
        Self::Circle,
        Self::Rounded,
        Self::Leaf,
        Self::Diamond,
        Self::Hexagon,
        Self::Star,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Rounded => "rounded",
            Self::Leaf => "leaf",
            Self::Diamond => "diamond",
            Self::Hexagon => "hexagon",
            Self::Star => "star",
        }
    }

    /// Parses a shape name, falling back to [`ModuleShape::Square`].
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Returns true for shapes drawn with [`SEAM_OVERLAP`].
    pub fn tiles(self) -> bool {
        matches!(self, Self::Square | Self::Rounded | Self::Leaf)
    }

    /// Builds the outline of this shape for the cell at `(x, y)`.
    pub fn path(self, x: f32, y: f32, cell: f32) -> Option<Path> {
        match self {
            Self::Square => square(x, y, cell),
            Self::Circle => circle(x, y, cell),
            Self::Rounded => {
                let r = cell * CORNER_RATIO;
                let s = cell + SEAM_OVERLAP;
                rounded_rect(x, y, s, s, [r, r, r, r])
            }
            Self::Leaf => {
                let r = cell * CORNER_RATIO;
                let s = cell + SEAM_OVERLAP;
                rounded_rect(x, y, s, s, [r, 0.0, r, 0.0])
            }
            Self::Diamond => diamond(x, y, cell),
            Self::Hexagon => hexagon(x, y, cell),
            Self::Star => star(x, y, cell),
        }
    }
}

impl FromStr for ModuleShape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownShape(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ModuleShape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse_lossy(&name))
    }
}

impl fmt::Display for ModuleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shape name that matched no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShape(pub String);

impl fmt::Display for UnknownShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shape {:?}", self.0)
    }
}

impl std::error::Error for UnknownShape {}

// ============================================================================
// Rasterizer
// ============================================================================

/// Builds an anti-aliased solid fill for `color`.
pub fn fill_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Fills one cell of `surface` with `shape` using `paint`.
///
/// Knows nothing about finder patterns; the caller picks the shape.
pub fn paint_shape(
    surface: &mut Surface,
    x: f32,
    y: f32,
    cell: f32,
    shape: ModuleShape,
    paint: &Paint<'_>,
) {
    if let Some(path) = shape.path(x, y, cell) {
        surface
            .pixmap_mut()
            .fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

// ============================================================================
// Path Builders
// ============================================================================

fn square(x: f32, y: f32, cell: f32) -> Option<Path> {
    let s = cell + SEAM_OVERLAP;
    Rect::from_xywh(x, y, s, s).map(PathBuilder::from_rect)
}

fn circle(x: f32, y: f32, cell: f32) -> Option<Path> {
    let r = cell / 2.0;
    PathBuilder::from_circle(x + r, y + r, r)
}

fn diamond(x: f32, y: f32, cell: f32) -> Option<Path> {
    let half = cell / 2.0;
    let mut pb = PathBuilder::new();
    pb.move_to(x + half, y);
    pb.line_to(x + cell, y + half);
    pb.line_to(x + half, y + cell);
    pb.line_to(x, y + half);
    pb.close();
    pb.finish()
}

/// Flat-topped hexagon with vertices at multiples of 60 degrees.
fn hexagon(x: f32, y: f32, cell: f32) -> Option<Path> {
    let r = cell / 2.0;
    let (cx, cy) = (x + r, y + r);
    let mut pb = PathBuilder::new();
    pb.move_to(cx + r, cy);
    for i in 1..6 {
        let angle = i as f32 * PI / 3.0;
        pb.line_to(cx + r * angle.cos(), cy + r * angle.sin());
    }
    pb.close();
    pb.finish()
}

/// Five-pointed star with its first point facing up.
fn star(x: f32, y: f32, cell: f32) -> Option<Path> {
    const SPIKES: usize = 5;
    let outer = cell / 2.0;
    let inner = cell / 4.0;
    let (cx, cy) = (x + outer, y + outer);
    let step = PI / SPIKES as f32;

    // Screen y grows downward, so 270 degrees points up.
    let mut rot = PI * 1.5;
    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy - outer);
    for _ in 0..SPIKES {
        pb.line_to(cx + rot.cos() * outer, cy + rot.sin() * outer);
        rot += step;
        pb.line_to(cx + rot.cos() * inner, cy + rot.sin() * inner);
        rot += step;
    }
    pb.close();
    pb.finish()
}

/// Rectangle with per-corner radii `[top_left, top_right, bottom_right, bottom_left]`.
///
/// Radii are clamped to half the shorter side. Zero radii give square corners.
pub(crate) fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radii: [f32; 4]) -> Option<Path> {
    let max = w.min(h) / 2.0;
    let [tl, tr, br, bl] = radii.map(|r| r.clamp(0.0, max));
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + tl, y);
    pb.line_to(right - tr, y);
    if tr > 0.0 {
        pb.cubic_to(right - tr + tr * KAPPA, y, right, y + tr - tr * KAPPA, right, y + tr);
    }
    pb.line_to(right, bottom - br);
    if br > 0.0 {
        pb.cubic_to(
            right,
            bottom - br + br * KAPPA,
            right - br + br * KAPPA,
            bottom,
            right - br,
            bottom,
        );
    }
    pb.line_to(x + bl, bottom);
    if bl > 0.0 {
        pb.cubic_to(x + bl - bl * KAPPA, bottom, x, bottom - bl + bl * KAPPA, x, bottom - bl);
    }
    pb.line_to(x, y + tl);
    if tl > 0.0 {
        pb.cubic_to(x, y + tl - tl * KAPPA, x + tl - tl * KAPPA, y, x + tl, y);
    }
    pb.close();
    pb.finish()
}

// ============================================================================
// Tests
// ============================================================================
