//! Error types for rendering, compositing and persistence.

use thiserror::Error;

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing or exporting a QR image.
#[derive(Error, Debug)]
pub enum Error {
    /// There is no content to encode. Callers show a placeholder instead.
    #[error("No content to encode")]
    EmptyInput,

    /// The external encoder could not build a module grid.
    #[error("QR encoding failed: {0}")]
    Encoding(#[from] qrcode::types::QrError),

    /// Render settings describe a layout that cannot be drawn.
    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed as hex.
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    /// A pixel buffer of the requested size could not be allocated.
    #[error("Cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    /// Image decoding or PNG encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a failed share request.
///
/// Neither variant is surfaced to the user; [`share`](crate::share) logs
/// them and returns normally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// The user dismissed the share sheet.
    #[error("Share canceled")]
    Canceled,

    /// The platform rejected the request.
    #[error("Share failed: {0}")]
    Failed(String),
}
