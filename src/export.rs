//! Download and share of rendered codes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{error, info, warn};

use crate::error::{Result, ShareError};
use crate::surface::Surface;

/// Title attached to every share request.
pub const SHARE_TITLE: &str = "QR Code";

/// Caption attached to every share request.
pub const SHARE_TEXT: &str = "Created with QR Pro";

/// File name of the shared PNG.
pub const SHARE_FILE_NAME: &str = "qr-code.png";

/// Milliseconds since the Unix epoch. Clocks set before 1970 read as zero.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Download
// ============================================================================

/// File name for a download made at `epoch_ms`.
pub fn download_file_name(epoch_ms: u64) -> String {
    format!("qr-pro-{epoch_ms}.png")
}

/// Writes `surface` as PNG into `dir` and returns the written path.
///
/// The directory is created if missing.
pub fn download(surface: &Surface, dir: &Path) -> Result<PathBuf> {
    let bytes = surface.encode_png()?;
    fs::create_dir_all(dir)?;
    let path = dir.join(download_file_name(epoch_millis()));
    fs::write(&path, &bytes)?;
    info!("Downloaded {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

// ============================================================================
// Share
// ============================================================================

/// A file handed to the platform share mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub file_name: String,
    /// PNG-encoded image.
    pub png: Vec<u8>,
}

/// Something that can present a share sheet.
pub trait ShareTarget {
    fn share(&mut self, request: ShareRequest) -> std::result::Result<(), ShareError>;
}

/// Shares `surface` as a PNG through `target`.
///
/// Cancellation and failures are logged, never returned.
pub fn share<T: ShareTarget + ?Sized>(surface: &Surface, target: &mut T) {
    let png = match surface.encode_png() {
        Ok(png) => png,
        Err(e) => {
            error!("Cannot share: {e}");
            return;
        }
    };

    let request = ShareRequest {
        title: SHARE_TITLE.to_string(),
        text: SHARE_TEXT.to_string(),
        file_name: SHARE_FILE_NAME.to_string(),
        png,
    };

    match target.share(request) {
        Ok(()) => info!("Shared {SHARE_FILE_NAME}"),
        Err(ShareError::Canceled) => warn!("Share canceled"),
        Err(e) => error!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[derive(Default)]
    struct Recorder {
        requests: Vec<ShareRequest>,
        outcome: Option<ShareError>,
    }

    impl ShareTarget for Recorder {
        fn share(&mut self, request: ShareRequest) -> std::result::Result<(), ShareError> {
            self.requests.push(request);
            match self.outcome.clone() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn surface() -> Surface {
        Surface::new(16, Color::WHITE).unwrap()
    }

    #[test]
    fn file_name_uses_timestamp() {
        assert_eq!(download_file_name(1_700_000_000_123), "qr-pro-1700000000123.png");
    }

    #[test]
    fn share_sends_fixed_metadata_and_png() {
        let mut target = Recorder::default();
        share(&surface(), &mut target);

        let request = &target.requests[0];
        assert_eq!(request.title, "QR Code");
        assert_eq!(request.text, "Created with QR Pro");
        assert_eq!(request.file_name, "qr-code.png");
        assert_eq!(&request.png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn share_swallows_cancel_and_failure() {
        for outcome in [ShareError::Canceled, ShareError::Failed("no target".into())] {
            let mut target = Recorder {
                outcome: Some(outcome),
                ..Recorder::default()
            };
            share(&surface(), &mut target);
            assert_eq!(target.requests.len(), 1);
        }
    }

    #[test]
    fn download_writes_decodable_png() {
        let dir = std::env::temp_dir().join(format!("qr-pro-download-{}", std::process::id()));
        let path = download(&surface(), &dir).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("qr-pro-") && name.ends_with(".png"));

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));

        let _ = fs::remove_dir_all(&dir);
    }
}
