//! Editing session: current style, current logo, current image, history.

use image::RgbaImage;
use log::{error, info};

use crate::error::Result;
use crate::grid::ModuleGrid;
use crate::history::{History, KeyValueStore};
use crate::logo::{LogoConfig, LogoSettings, apply_logo};
use crate::profile::{RenderConfig, StyleProfile};
use crate::render::render;
use crate::surface::Surface;

/// Payload category recorded for every saved code.
pub const HISTORY_KIND: &str = "url";

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`StyleProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &StyleProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> StyleProfile;
}

// ============================================================================
// QrStudio
// ============================================================================

/// Result of a [`QrStudio::generate`] call that did not return an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// Input was blank; the surface was cleared.
    Placeholder,
    /// A new image replaced the previous one.
    Rendered,
    /// Encoding or rendering failed; the previous image is still current.
    Failed,
}

/// One editing session.
///
/// Holds the style applied to every render, the logo (last write wins), the
/// most recent image and the saved-code history.
///
/// # Example
///
/// ```
/// use qr_pro_renderer::{Generation, MemoryStore, QrStudio};
///
/// let mut studio = QrStudio::new(MemoryStore::new());
/// assert_eq!(studio.generate("  ", false).unwrap(), Generation::Placeholder);
/// assert_eq!(studio.generate("hello", true).unwrap(), Generation::Rendered);
/// assert_eq!(studio.history().entries().unwrap().len(), 1);
/// ```
#[derive(Debug)]
pub struct QrStudio<S> {
    config: RenderConfig,
    logo_settings: LogoSettings,
    logo: Option<LogoConfig>,
    surface: Option<Surface>,
    history: History<S>,
}

impl<S: KeyValueStore> QrStudio<S> {
    /// Creates a session with default style and history kept in `store`.
    pub fn new(store: S) -> Self {
        Self {
            config: RenderConfig::default(),
            logo_settings: LogoSettings::default(),
            logo: None,
            surface: None,
            history: History::new(store),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replaces the render settings used by the next [`generate`](Self::generate).
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn logo(&self) -> Option<&LogoConfig> {
        self.logo.as_ref()
    }

    /// Sets the logo bitmap, replacing any previous one.
    pub fn set_logo(&mut self, image: RgbaImage) {
        self.logo = Some(LogoConfig::new(image, self.logo_settings));
    }

    /// Decodes encoded image bytes and sets them as the logo.
    ///
    /// On a decode error the previous logo is kept.
    pub fn load_logo(&mut self, bytes: &[u8]) -> Result<()> {
        self.logo = Some(LogoConfig::from_bytes(bytes, self.logo_settings)?);
        Ok(())
    }

    pub fn clear_logo(&mut self) {
        self.logo = None;
    }

    pub fn logo_settings(&self) -> &LogoSettings {
        &self.logo_settings
    }

    /// Updates logo placement, keeping the current bitmap.
    ///
    /// Settings are [`clamped`](LogoSettings::clamped) whether or not a logo
    /// is loaded.
    pub fn set_logo_settings(&mut self, settings: LogoSettings) {
        self.logo_settings = settings.clamped();
        self.logo = self
            .logo
            .take()
            .map(|logo| logo.with_settings(self.logo_settings));
    }

    /// The most recent image, or `None` while the placeholder is shown.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History<S> {
        &mut self.history
    }

    /// Encodes `content` and renders it with the current style and logo.
    ///
    /// Leading and trailing whitespace is ignored. Blank input clears the
    /// image and yields [`Generation::Placeholder`]. When `save` is set the
    /// content is recorded in history after a successful render.
    ///
    /// Failures are logged. They are returned only when `save` is set;
    /// otherwise the result is [`Generation::Failed`] and the previous image
    /// stays current.
    pub fn generate(&mut self, content: &str, save: bool) -> Result<Generation> {
        let content = content.trim();
        if content.is_empty() {
            self.surface = None;
            return Ok(Generation::Placeholder);
        }

        let surface = match self.render_content(content) {
            Ok(surface) => surface,
            Err(e) => {
                error!("Failed to generate QR code: {e}");
                return if save { Err(e) } else { Ok(Generation::Failed) };
            }
        };
        self.surface = Some(surface);

        if save && self.history.record(content, content, HISTORY_KIND)? {
            info!("Saved {content:?} to history");
        }
        Ok(Generation::Rendered)
    }

    fn render_content(&self, content: &str) -> Result<Surface> {
        let grid = ModuleGrid::encode(content)?;
        let mut surface = render(&grid, &self.config)?;
        if let Some(logo) = &self.logo {
            apply_logo(&mut surface, logo, self.config.background)?;
        }
        Ok(surface)
    }
}

impl<S: KeyValueStore> Configurable for QrStudio<S> {
    /// Applies render and logo settings. Profiles without logo settings
    /// restore the logo defaults; the logo bitmap itself is kept.
    fn apply_profile(&mut self, profile: &StyleProfile) {
        self.set_config(profile.render);
        self.set_logo_settings(profile.logo.unwrap_or_default());
    }

    fn export_profile(&self) -> StyleProfile {
        StyleProfile {
            render: self.config,
            logo: Some(self.logo_settings),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
