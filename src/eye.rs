//! Finder-pattern ("eye") classification.
//!
//! A QR symbol carries three 7x7 finder patterns: top-left, top-right and
//! bottom-left. Each is a dark outer ring, a light ring, and a dark 3x3 core.
//! The renderer styles the ring and the core independently of the data body,
//! so every dark module is classified before it is drawn.

/// Side length of a finder pattern in modules.
pub const FINDER_SIZE: usize = 7;

/// Which structural region a dark module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeClass {
    /// Data body, timing, alignment and format modules.
    NotEye,
    /// Dark modules of a finder pattern outside its 3x3 core.
    OuterRing,
    /// The 3x3 dark center of a finder pattern.
    InnerCore,
}

impl EyeClass {
    pub fn is_eye(self) -> bool {
        !matches!(self, Self::NotEye)
    }
}

/// Returns the origin of the finder block containing `(col, row)`.
///
/// Blocks are tested top-left, top-right, then bottom-left. There is no
/// bottom-right finder.
pub fn finder_origin(col: usize, row: usize, n: usize) -> Option<(usize, usize)> {
    let far = n.saturating_sub(FINDER_SIZE);
    let origins = [(0, 0), (far, 0), (0, far)];
    origins.into_iter().find(|&(ox, oy)| {
        col >= ox && col < ox + FINDER_SIZE && row >= oy && row < oy + FINDER_SIZE
    })
}

/// Classifies the module at `(col, row)` of an `n x n` grid.
///
/// Only meaningful for dark modules: the light ring inside a finder pattern
/// also reports [`EyeClass::OuterRing`], but the renderer never asks about it.
pub fn classify(col: usize, row: usize, n: usize) -> EyeClass {
    let Some((ox, oy)) = finder_origin(col, row, n) else {
        return EyeClass::NotEye;
    };
    let rx = col - ox;
    let ry = row - oy;
    if (2..=4).contains(&rx) && (2..=4).contains(&ry) {
        EyeClass::InnerCore
    } else {
        EyeClass::OuterRing
    }
}
