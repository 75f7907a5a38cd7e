//! qr-pro-renderer: styled QR code rasterizer
//!
//! This crate turns text into a QR module grid and draws it on a square
//! bitmap with per-region module shapes: the finder-pattern rings, the
//! finder-pattern cores, and the data body can each use a different shape.
//! An optional logo can be composited at the center.
//!
//! # Example
//!
//! ```
//! use qr_pro_renderer::{ModuleGrid, ModuleShape, RenderConfig, render};
//!
//! let grid = ModuleGrid::encode("https://example.com").unwrap();
//! let config = RenderConfig {
//!     resolution: 512,
//!     outer_eye: ModuleShape::Rounded,
//!     inner_eye: ModuleShape::Circle,
//!     body: ModuleShape::Diamond,
//!     ..RenderConfig::default()
//! };
//!
//! let surface = render(&grid, &config).unwrap();
//! let png = surface.encode_png().unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! # Sessions
//!
//! [`QrStudio`] keeps the current style, logo and image between edits and
//! records saved codes in a [`History`]. Style can be moved in and out as a
//! [`StyleProfile`] through the [`Configurable`] trait:
//!
//! ```
//! use qr_pro_renderer::{
//!     Configurable, MemoryStore, ModuleShape, QrStudio, RenderConfig, StyleProfile,
//! };
//!
//! let mut studio = QrStudio::new(MemoryStore::new());
//!
//! let profile = StyleProfile::new().with_render(RenderConfig {
//!     resolution: 256,
//!     body: ModuleShape::Circle,
//!     ..RenderConfig::default()
//! });
//! studio.apply_profile(&profile);
//! studio.generate("hello", true).unwrap();
//!
//! let json = studio.export_profile().to_json().unwrap();
//! assert!(json.contains("\"body\":\"circle\""));
//! ```

mod color;
mod error;
mod export;
mod eye;
mod grid;
mod history;
mod logo;
mod profile;
mod render;
mod shape;
mod studio;
mod surface;

pub use color::Color;
pub use error::{Error, Result, ShareError};
pub use export::{
    SHARE_FILE_NAME, SHARE_TEXT, SHARE_TITLE, ShareRequest, ShareTarget, download,
    download_file_name, epoch_millis, share,
};
pub use eye::{EyeClass, FINDER_SIZE, classify, finder_origin};
pub use grid::ModuleGrid;
pub use history::{
    EntryDate, HISTORY_KEY, History, HistoryEntry, JsonFileStore, KeyValueStore, MAX_ENTRIES,
    MemoryStore,
};
pub use logo::{
    DEFAULT_SIZE_FRACTION, DEFAULT_TOLERANCE, LogoConfig, LogoSettings, LogoShape, apply_logo,
    remove_background,
};
pub use profile::{MARGIN, RESOLUTION, RenderConfig, StyleProfile};
pub use render::{render, render_plain};
pub use shape::{ModuleShape, SEAM_OVERLAP, UnknownShape, fill_paint, paint_shape};
pub use studio::{Configurable, Generation, HISTORY_KIND, QrStudio};
pub use surface::Surface;

pub use qrcode::EcLevel;
