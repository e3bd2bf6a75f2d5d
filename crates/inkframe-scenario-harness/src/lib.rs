//! Host-side scenario harness for scripted slideshow flows.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use embedded_graphics::pixelcolor::BinaryColor;
use png::{BitDepth, ColorType, Encoder};

use inkframe_core::{
    BatteryProbe, ButtonStates, Catalog, FileSystem, Framebuffer, FrameSink, MockFileSystem,
    RefreshQuality, Renderer, Slideshow, TickAction, DISPLAY_HEIGHT, DISPLAY_WIDTH,
};

/// A recorded panel push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    Full(RefreshQuality),
    Region {
        y: u32,
        height: u32,
        quality: RefreshQuality,
    },
}

/// Renderer that records draw calls instead of producing pixels.
///
/// Scenario assertions read the recorded text and push log; specific
/// paths can be told to fail to script decode errors.
#[derive(Default)]
pub struct RecordingRenderer {
    texts: Vec<String>,
    images: Vec<String>,
    failing: BTreeSet<String>,
    pushes: Vec<Push>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `draw_image_file` fail for this path.
    pub fn fail_path(&mut self, path: &str) {
        self.failing.insert(path.to_string());
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// True when any drawn text contains `needle`.
    pub fn screen_contains(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.contains(needle))
    }

    pub fn last_image(&self) -> Option<&str> {
        self.images.last().map(String::as_str)
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn pushes(&self) -> &[Push] {
        &self.pushes
    }

    /// Forget everything recorded so far; scenario steps use this to
    /// assert on a single interaction.
    pub fn clear_log(&mut self) {
        self.texts.clear();
        self.images.clear();
        self.pushes.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {}

    fn clear_region(&mut self, _y: u32, _height: u32) {}

    fn draw_text(&mut self, text: &str, _x: i32, _y: i32, _scale: u32) {
        self.texts.push(text.to_string());
    }

    fn draw_image_file(&mut self, fs: &mut dyn FileSystem, path: &str) -> bool {
        self.images.push(path.to_string());
        if self.failing.contains(path) {
            return false;
        }
        fs.exists(path)
    }

    fn push_full(&mut self, quality: RefreshQuality) {
        self.pushes.push(Push::Full(quality));
    }

    fn push_region(&mut self, y: u32, height: u32, quality: RefreshQuality) {
        self.pushes.push(Push::Region { y, height, quality });
    }
}

/// Battery probe with a scriptable level.
pub struct ScriptedBattery {
    millivolts: u16,
}

impl ScriptedBattery {
    pub fn new(millivolts: u16) -> Self {
        Self { millivolts }
    }

    /// Probe that reads as the given percentage.
    pub fn at_percent(percent: u8) -> Self {
        let above = (percent as u32 * 1050 + 99) / 100;
        Self {
            millivolts: 3300 + above as u16,
        }
    }

    pub fn set_percent(&mut self, percent: u8) {
        *self = Self::at_percent(percent);
    }
}

impl BatteryProbe for ScriptedBattery {
    fn read_millivolts(&mut self) -> u16 {
        self.millivolts
    }
}

/// No-op sink for tests that render through the real `PanelRenderer`.
pub struct DiscardSink;

impl FrameSink for DiscardSink {
    fn push_full(&mut self, _frame: &Framebuffer, _quality: RefreshQuality) {}
    fn push_region(&mut self, _f: &Framebuffer, _y: u32, _h: u32, _q: RefreshQuality) {}
}

/// Couples slideshow, mock filesystem, scripted battery, recording
/// renderer, and a simulated clock for scenario tests.
pub struct ScenarioHarness {
    show: Slideshow,
    fs: MockFileSystem,
    battery: ScriptedBattery,
    renderer: RecordingRenderer,
    now_ms: u64,
}

impl ScenarioHarness {
    /// Spacing between scripted presses; comfortably past the debounce
    /// window so every press registers.
    const PRESS_SPACING_MS: u64 = 600;

    /// Scan the mock card, start the slideshow, and render the first
    /// frame at t=0.
    pub fn start(mut fs: MockFileSystem, battery: ScriptedBattery) -> Self {
        let catalog =
            Catalog::scan(&mut fs, "/", true, 100).expect("scenario card should be scannable");
        let mut harness = Self {
            show: Slideshow::new(catalog, 0),
            fs,
            battery,
            renderer: RecordingRenderer::new(),
            now_ms: 0,
        };
        harness.show.start(
            0,
            &mut harness.battery,
            &mut harness.fs,
            &mut harness.renderer,
        );
        harness
    }

    /// Simulate the process restart after a hardware wake: a fresh
    /// slideshow over a fresh scan of the same card.
    pub fn restart_after_wake(self) -> Self {
        Self::start(self.fs, self.battery)
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Let time pass without any tick.
    pub fn advance_ms(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    /// One tick with no buttons pressed.
    pub fn tick_idle(&mut self) -> TickAction {
        self.tick(ButtonStates::NONE)
    }

    /// One tick with the given button levels.
    pub fn tick(&mut self, buttons: ButtonStates) -> TickAction {
        self.show.tick(
            self.now_ms,
            buttons,
            &mut self.battery,
            &mut self.fs,
            &mut self.renderer,
        )
    }

    pub fn press_next(&mut self) -> TickAction {
        self.press(ButtonStates {
            next: true,
            ..ButtonStates::NONE
        })
    }

    pub fn press_previous(&mut self) -> TickAction {
        self.press(ButtonStates {
            previous: true,
            ..ButtonStates::NONE
        })
    }

    pub fn press_toggle(&mut self) -> TickAction {
        self.press(ButtonStates {
            toggle: true,
            ..ButtonStates::NONE
        })
    }

    fn press(&mut self, buttons: ButtonStates) -> TickAction {
        self.advance_ms(Self::PRESS_SPACING_MS);
        self.tick(buttons)
    }

    /// Tick at the control-loop period until sleep is handed off or the
    /// clock reaches `deadline_ms`.
    pub fn run_idle_until_sleep(&mut self, deadline_ms: u64) -> Option<u64> {
        while self.now_ms < deadline_ms {
            self.advance_ms(100);
            if self.tick_idle() == TickAction::Sleep {
                return Some(self.now_ms);
            }
        }
        None
    }

    /// Trigger the explicit rescan collaborator call.
    pub fn rescan(&mut self) -> Result<(), inkframe_core::ScanError> {
        self.show.rescan(&mut self.fs)
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.show
    }

    pub fn renderer(&self) -> &RecordingRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut RecordingRenderer {
        &mut self.renderer
    }

    pub fn fs_mut(&mut self) -> &mut MockFileSystem {
        &mut self.fs
    }

    pub fn battery_mut(&mut self) -> &mut ScriptedBattery {
        &mut self.battery
    }
}

/// Save a framebuffer to a grayscale PNG (white = Off, black = On).
pub fn save_framebuffer_png(
    frame: &Framebuffer,
    path: impl AsRef<Path>,
) -> Result<(), String> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let mut data = Vec::with_capacity((DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize);
    for y in 0..DISPLAY_HEIGHT {
        for x in 0..DISPLAY_WIDTH {
            data.push(match frame.pixel(x, y) {
                BinaryColor::On => 0u8,
                BinaryColor::Off => 255u8,
            });
        }
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    let mut encoder = Encoder::new(writer, DISPLAY_WIDTH, DISPLAY_HEIGHT);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);
    let mut png_writer = encoder.write_header().map_err(|e| e.to_string())?;
    png_writer
        .write_image_data(&data)
        .map_err(|e| e.to_string())
}
