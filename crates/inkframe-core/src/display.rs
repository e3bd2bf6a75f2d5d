//! Rendering seam between the slideshow and the e-paper stack.
//!
//! The slideshow names the drawing operations it needs and stays decoupled
//! from any particular panel driver. `PanelRenderer` is the real
//! implementation; tests substitute a recording one.

use crate::filesystem::FileSystem;

/// Panel refresh quality.
///
/// `Fast` is the quick, slightly ghosty waveform used for text-only status
/// updates; `High` is the full flashing refresh used for photo redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshQuality {
    Fast,
    High,
}

/// Drawing and flushing operations consumed by the slideshow.
pub trait Renderer {
    /// Reset the whole frame to white.
    fn clear(&mut self);

    /// Reset a horizontal band to white.
    fn clear_region(&mut self, y: u32, height: u32);

    /// Draw a line of text. `scale` selects one of the fixed font sizes,
    /// smallest first.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32);

    /// Decode and draw the photo at `path`, fitted above the status bar.
    /// Returns false when the file is missing or does not decode.
    fn draw_image_file(&mut self, fs: &mut dyn FileSystem, path: &str) -> bool;

    /// Push the whole frame to the panel.
    fn push_full(&mut self, quality: RefreshQuality);

    /// Push a horizontal band to the panel.
    fn push_region(&mut self, y: u32, height: u32, quality: RefreshQuality);
}
