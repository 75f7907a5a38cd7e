//! Grid rendering: module grid in, styled surface out.

use std::time::Instant;

use log::debug;

use crate::error::{Error, Result};
use crate::eye::classify;
use crate::grid::ModuleGrid;
use crate::profile::RenderConfig;
use crate::shape::{ModuleShape, fill_paint, paint_shape};
use crate::surface::Surface;

/// Renders `grid` with per-region shapes.
///
/// Fills the background, then draws every dark module with the shape
/// configured for its region: outer eye ring, inner eye core, or body.
/// Every call starts from a fresh surface.
pub fn render(grid: &ModuleGrid, config: &RenderConfig) -> Result<Surface> {
    let n = grid.size();
    render_with(grid, config, |col, row| config.shape_for(classify(col, row, n)))
}

/// Renders `grid` with every dark module as a square and no eye styling.
///
/// This is the reduced-feature path equivalent to a stock QR renderer.
pub fn render_plain(grid: &ModuleGrid, config: &RenderConfig) -> Result<Surface> {
    render_with(grid, config, |_, _| ModuleShape::Square)
}

fn render_with(
    grid: &ModuleGrid,
    config: &RenderConfig,
    shape_at: impl Fn(usize, usize) -> ModuleShape,
) -> Result<Surface> {
    let started = Instant::now();
    let n = grid.size();
    let cell = config.cell_size(n).ok_or_else(|| {
        Error::InvalidConfig(format!(
            "margin {} does not fit around a {n}x{n} grid",
            config.margin
        ))
    })?;
    let mut surface = Surface::new(config.resolution, config.background)?;

    let paint = fill_paint(config.foreground);
    let mut drawn = 0usize;

    // col, row < n, and n + 2 * margin fits in usize, so these sums cannot overflow.
    for (col, row) in grid.dark_modules() {
        let x = (col + config.margin) as f32 * cell;
        let y = (row + config.margin) as f32 * cell;
        paint_shape(&mut surface, x, y, cell, shape_at(col, row), &paint);
        drawn += 1;
    }

    debug!(
        "rendered {n}x{n} grid ({drawn} dark modules, cell {cell:.2}px) in {:?}",
        started.elapsed(),
    );
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::eye::EyeClass;

    fn sample_grid() -> ModuleGrid {
        ModuleGrid::encode("https://example.com").unwrap()
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            resolution: 290,
            ..RenderConfig::default()
        }
    }

    /// Pixel at the center of module `(col, row)`.
    fn center_of(config: &RenderConfig, n: usize, col: usize, row: usize) -> (u32, u32) {
        let cell = config.cell_size(n).unwrap();
        let px = |i: usize| ((i + config.margin) as f32 * cell + cell / 2.0) as u32;
        (px(col), px(row))
    }

    #[test]
    fn all_square_matches_plain_renderer() {
        let grid = sample_grid();
        let config = small_config();
        assert!(config.is_plain());
        let styled = render(&grid, &config).unwrap();
        let plain = render_plain(&grid, &config).unwrap();
        assert_eq!(styled.data(), plain.data());
    }

    #[test]
    fn rendering_is_idempotent() {
        let grid = sample_grid();
        let config = RenderConfig {
            outer_eye: ModuleShape::Rounded,
            inner_eye: ModuleShape::Star,
            body: ModuleShape::Hexagon,
            foreground: Color::rgb(30, 60, 90),
            ..small_config()
        };
        let first = render(&grid, &config).unwrap();
        let second = render(&grid, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn quiet_zone_stays_background() {
        let grid = sample_grid();
        let config = RenderConfig {
            background: Color::rgb(250, 240, 230),
            ..small_config()
        };
        let surface = render(&grid, &config).unwrap();
        let cell = config.cell_size(grid.size()).unwrap();
        let edge = (config.margin as f32 * cell) as u32 - 1;
        for i in 0..config.resolution {
            assert_eq!(surface.pixel(i, edge), Some(config.background));
            assert_eq!(surface.pixel(edge, i), Some(config.background));
        }
    }

    #[test]
    fn dark_module_centers_use_foreground() {
        let grid = sample_grid();
        let config = RenderConfig {
            foreground: Color::rgb(200, 0, 100),
            ..small_config()
        };
        let surface = render(&grid, &config).unwrap();
        let n = grid.size();
        for (col, row) in grid.dark_modules() {
            let (x, y) = center_of(&config, n, col, row);
            assert_eq!(surface.pixel(x, y), Some(config.foreground), "({col}, {row})");
        }
    }

    #[test]
    fn eyes_and_body_are_styled_independently() {
        // Circles leave module corners empty; squares fill them.
        let grid = sample_grid();
        let n = grid.size();
        let config = RenderConfig {
            outer_eye: ModuleShape::Circle,
            inner_eye: ModuleShape::Square,
            body: ModuleShape::Square,
            resolution: 2048,
            ..RenderConfig::default()
        };
        let surface = render(&grid, &config).unwrap();
        let cell = config.cell_size(n).unwrap();
        let corner = |col: usize, row: usize| {
            let x = ((col + config.margin) as f32 * cell + 1.0) as u32;
            let y = ((row + config.margin) as f32 * cell + 1.0) as u32;
            surface.pixel(x, y).unwrap()
        };

        // (0, 6) is an outer-ring module; its neighbours are circles or
        // light, so nothing covers the corner of its cell.
        assert_eq!(classify(0, 6, n), EyeClass::OuterRing);
        assert_eq!(corner(0, 6), config.background);
        // (3, 3) is the center of the top-left core, surrounded by core squares.
        assert_eq!(classify(3, 3, n), EyeClass::InnerCore);
        assert_eq!(corner(3, 3), config.foreground);
    }

    #[test]
    fn oversized_margin_is_an_error() {
        let grid = sample_grid();
        let profile = crate::profile::StyleProfile::from_json(
            r#"{"render":{"resolution":64,"margin":18446744073709551615}}"#,
        )
        .unwrap();
        let err = render(&grid, &profile.render).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{err}");
        assert!(render_plain(&grid, &profile.render).is_err());
    }

    #[test]
    fn zero_resolution_fails_without_panicking() {
        let grid = sample_grid();
        let config = RenderConfig {
            resolution: 0,
            ..RenderConfig::default()
        };
        assert!(render(&grid, &config).is_err());
    }
}
