//! `Renderer` implementation over the packed framebuffer.
//!
//! Text goes through embedded-graphics/embedded-text, photos through the
//! `image` crate (decode, aspect-fit resize, error-diffusion threshold to
//! 1bpp). Pushing the finished frame to the panel is delegated to a
//! `FrameSink`: the e-paper driver on hardware, an SDL window in the
//! simulator, a recording sink in tests.

extern crate alloc;

use alloc::vec::Vec;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_8X13, FONT_9X18},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::Rectangle,
};
use embedded_text::TextBox;

use crate::config::STATUS_BAR_HEIGHT;
use crate::display::{RefreshQuality, Renderer};
use crate::filesystem::FileSystem;
use crate::framebuffer::Framebuffer;
use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Flush seam between the framebuffer and a concrete panel.
pub trait FrameSink {
    fn push_full(&mut self, frame: &Framebuffer, quality: RefreshQuality);
    fn push_region(&mut self, frame: &Framebuffer, y: u32, height: u32, quality: RefreshQuality);
}

/// Buffer-then-flush renderer.
pub struct PanelRenderer<S: FrameSink> {
    frame: Framebuffer,
    sink: S,
}

impl<S: FrameSink> PanelRenderer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            frame: Framebuffer::new(),
            sink,
        }
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn style_for_scale(scale: u32) -> MonoTextStyle<'static, BinaryColor> {
        let font = match scale {
            0 | 1 => &FONT_8X13,
            2 => &FONT_9X18,
            _ => &FONT_10X20,
        };
        MonoTextStyle::new(font, BinaryColor::On)
    }
}

impl<S: FrameSink> Renderer for PanelRenderer<S> {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn clear_region(&mut self, y: u32, height: u32) {
        self.frame.clear_rows(y, height);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32) {
        // A text box to the panel edges wraps long lines instead of
        // clipping them.
        let bounds = Rectangle::new(
            Point::new(x, y),
            Size::new(
                DISPLAY_WIDTH.saturating_sub(x.max(0) as u32),
                DISPLAY_HEIGHT.saturating_sub(y.max(0) as u32),
            ),
        );
        let _ = TextBox::new(text, bounds, Self::style_for_scale(scale)).draw(&mut self.frame);
    }

    fn draw_image_file(&mut self, fs: &mut dyn FileSystem, path: &str) -> bool {
        let bytes = match fs.read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("read {}: {}", path, err);
                return false;
            }
        };
        let decoded = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded,
            Err(err) => {
                log::warn!("decode {}: {}", path, err);
                return false;
            }
        };

        let area_width = DISPLAY_WIDTH;
        let area_height = DISPLAY_HEIGHT - STATUS_BAR_HEIGHT;
        let fitted = decoded.resize(
            area_width,
            area_height,
            image::imageops::FilterType::Triangle,
        );
        let luma = fitted.to_luma8();
        let x0 = (area_width - luma.width()) / 2;
        let y0 = (area_height - luma.height()) / 2;
        dither_to_frame(&luma, &mut self.frame, x0, y0);
        true
    }

    fn push_full(&mut self, quality: RefreshQuality) {
        self.sink.push_full(&self.frame, quality);
    }

    fn push_region(&mut self, y: u32, height: u32, quality: RefreshQuality) {
        self.sink.push_region(&self.frame, y, height, quality);
    }
}

/// Floyd-Steinberg error diffusion to black/white.
///
/// A plain threshold turns photos into silhouettes on a 1-bit panel;
/// diffusing the quantization error keeps midtones legible.
fn dither_to_frame(luma: &image::GrayImage, frame: &mut Framebuffer, x0: u32, y0: u32) {
    let width = luma.width() as usize;
    let height = luma.height() as usize;
    let mut levels: Vec<i16> = luma.pixels().map(|p| p.0[0] as i16).collect();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = levels[idx];
            let new = if old < 128 { 0 } else { 255 };
            let err = old - new;
            let color = if new == 0 {
                BinaryColor::On
            } else {
                BinaryColor::Off
            };
            frame.set_pixel(x0 + x as u32, y0 + y as u32, color);

            if x + 1 < width {
                levels[idx + 1] += err * 7 / 16;
            }
            if y + 1 < height {
                if x > 0 {
                    levels[idx + width - 1] += err * 3 / 16;
                }
                levels[idx + width] += err * 5 / 16;
                if x + 1 < width {
                    levels[idx + width + 1] += err / 16;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_filesystem::MockFileSystem;
    use std::io::Cursor;

    #[derive(Default)]
    struct CountingSink {
        full: usize,
        regions: Vec<(u32, u32, RefreshQuality)>,
    }

    impl FrameSink for CountingSink {
        fn push_full(&mut self, _frame: &Framebuffer, _quality: RefreshQuality) {
            self.full += 1;
        }
        fn push_region(&mut self, _frame: &Framebuffer, y: u32, height: u32, q: RefreshQuality) {
            self.regions.push((y, height, q));
        }
    }

    fn png_bytes(level: u8, width: u32, height: u32) -> Vec<u8> {
        let img = image::GrayImage::from_pixel(width, height, image::Luma([level]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_draw_text_marks_pixels_where_asked() {
        let mut renderer = PanelRenderer::new(CountingSink::default());
        renderer.draw_text("Hello", 10, 450, 1);
        assert!(renderer.frame().black_pixels_in_rows(440, 40) > 0);
        assert_eq!(renderer.frame().black_pixels_in_rows(0, 440), 0);
    }

    #[test]
    fn test_draw_image_decodes_and_dithers() {
        let mut renderer = PanelRenderer::new(CountingSink::default());
        let mut fs = MockFileSystem::new();
        fs.add_file("/black.jpg", &png_bytes(0, 8, 8));

        assert!(renderer.draw_image_file(&mut fs, "/black.jpg"));
        // An 8x8 black source scales up to a 440x440 block of ink.
        assert!(renderer.frame().black_pixel_count() > 100_000);
    }

    #[test]
    fn test_midtone_dithers_to_a_mix() {
        let mut renderer = PanelRenderer::new(CountingSink::default());
        let mut fs = MockFileSystem::new();
        fs.add_file("/gray.jpg", &png_bytes(128, 16, 16));

        assert!(renderer.draw_image_file(&mut fs, "/gray.jpg"));
        let black = renderer.frame().black_pixel_count();
        let area = 440 * 440;
        assert!(black > area / 4, "too few black pixels: {}", black);
        assert!(black < 3 * area / 4, "too many black pixels: {}", black);
    }

    #[test]
    fn test_unreadable_or_garbage_files_fail_cleanly() {
        let mut renderer = PanelRenderer::new(CountingSink::default());
        let mut fs = MockFileSystem::new();
        fs.add_file("/garbage.jpg", b"not an image at all");

        assert!(!renderer.draw_image_file(&mut fs, "/garbage.jpg"));
        assert!(!renderer.draw_image_file(&mut fs, "/missing.jpg"));
    }

    #[test]
    fn test_pushes_reach_the_sink() {
        let mut renderer = PanelRenderer::new(CountingSink::default());
        renderer.push_full(RefreshQuality::High);
        renderer.push_region(440, 40, RefreshQuality::Fast);

        let sink = renderer.sink_mut();
        assert_eq!(sink.full, 1);
        assert_eq!(sink.regions, [(440, 40, RefreshQuality::Fast)]);
    }

    #[test]
    fn test_clear_region_resets_band_only() {
        let mut renderer = PanelRenderer::new(CountingSink::default());
        renderer.draw_text("top", 10, 10, 1);
        renderer.draw_text("bar", 10, 450, 1);

        renderer.clear_region(440, 40);
        assert_eq!(renderer.frame().black_pixels_in_rows(440, 40), 0);
        assert!(renderer.frame().black_pixels_in_rows(0, 440) > 0);
    }
}
