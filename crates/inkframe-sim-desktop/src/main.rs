//! Desktop SDL simulator for the inkframe photo frame.
//!
//! Synthesizes a small card of JPEG photos in the mock filesystem so the
//! real decode and dither path runs, then drives the slideshow with the
//! same tick loop the firmware uses.

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    sdl2::Keycode, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};

use inkframe_core::{
    config, BatteryProbe, ButtonStates, Catalog, Framebuffer, FrameSink, MockFileSystem,
    PanelRenderer, RefreshQuality, Slideshow, TickAction, DISPLAY_HEIGHT, DISPLAY_WIDTH,
};

/// Pushes finished frames into the SDL window.
struct WindowSink {
    display: SimulatorDisplay<BinaryColor>,
    window: Window,
}

impl WindowSink {
    fn blit(&mut self, frame: &Framebuffer) {
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                let pixel = Pixel(Point::new(x as i32, y as i32), frame.pixel(x, y));
                let _ = pixel.draw(&mut self.display);
            }
        }
        self.window.update(&self.display);
    }
}

impl FrameSink for WindowSink {
    fn push_full(&mut self, frame: &Framebuffer, _quality: RefreshQuality) {
        self.blit(frame);
    }

    fn push_region(&mut self, frame: &Framebuffer, _y: u32, _h: u32, _quality: RefreshQuality) {
        // The window has no partial-update cost worth modeling.
        self.blit(frame);
    }
}

/// Battery faked from the keyboard: B toggles low battery.
struct FakeBattery {
    low: bool,
}

impl BatteryProbe for FakeBattery {
    fn read_millivolts(&mut self) -> u16 {
        if self.low {
            3350
        } else {
            4200
        }
    }
}

fn synthesized_card() -> MockFileSystem {
    let mut fs = MockFileSystem::new();
    fs.add_directory("/photos");
    for (index, name) in ["/photos/bands.jpg", "/photos/rings.jpg", "/photos/wedge.jpg"]
        .iter()
        .enumerate()
    {
        fs.add_file(name, &synthesized_jpeg(index as u32));
    }
    fs
}

fn synthesized_jpeg(variant: u32) -> Vec<u8> {
    let photo = image::GrayImage::from_fn(640, 400, |x, y| {
        let level = match variant {
            0 => (x / 4) as u32,
            1 => {
                let dx = x as i32 - 320;
                let dy = y as i32 - 200;
                ((dx * dx + dy * dy) / 512) as u32
            }
            _ => (x + y) / 4,
        };
        image::Luma([(level % 256) as u8])
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(photo)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Jpeg,
        )
        .expect("in-memory jpeg encode");
    bytes
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_settings = OutputSettingsBuilder::new().scale(1).build();
    let display: SimulatorDisplay<BinaryColor> =
        SimulatorDisplay::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
    let window = Window::new("inkframe", &output_settings);

    let mut fs = synthesized_card();
    let mut battery = FakeBattery { low: false };
    let mut renderer = PanelRenderer::new(WindowSink { display, window });

    let catalog = Catalog::scan(
        &mut fs,
        config::PHOTO_ROOT,
        config::RECURSIVE_SCAN,
        config::CATALOG_CAPACITY,
    )?;
    println!("inkframe simulator: {} photos on the mock card", catalog.len());
    println!("Controls:");
    println!("  Left / Right - previous / next photo");
    println!("  Space        - toggle auto-advance");
    println!("  B            - toggle low battery");
    println!("  R            - rescan the card");
    println!("  Escape       - quit");

    let boot = Instant::now();
    let mut show = Slideshow::new(catalog, 0);
    show.start(0, &mut battery, &mut fs, &mut renderer);

    loop {
        let mut buttons = ButtonStates::NONE;
        let mut rescan_requested = false;

        for event in renderer.sink_mut().window.events() {
            match event {
                SimulatorEvent::Quit => return Ok(()),
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Escape => return Ok(()),
                    Keycode::Left | Keycode::A => buttons.previous = true,
                    Keycode::Right | Keycode::D => buttons.next = true,
                    Keycode::Space | Keycode::Return => buttons.toggle = true,
                    Keycode::B => {
                        battery.low = !battery.low;
                        println!(
                            "battery now reads {}%",
                            inkframe_core::percent_from_millivolts(battery.read_millivolts())
                        );
                    }
                    Keycode::R => rescan_requested = true,
                    _ => {}
                },
                _ => {}
            }
        }

        let now_ms = boot.elapsed().as_millis() as u64;

        if rescan_requested {
            match show.rescan(&mut fs) {
                Ok(()) => show.start(now_ms, &mut battery, &mut fs, &mut renderer),
                Err(err) => println!("rescan failed: {}", err),
            }
        }

        if show.tick(now_ms, buttons, &mut battery, &mut fs, &mut renderer) == TickAction::Sleep {
            println!("deep sleep requested; press any key to wake");
            wait_for_wake(&mut renderer)?;
            // Wake is a process restart: rescan and re-derive everything.
            let catalog = Catalog::scan(
                &mut fs,
                config::PHOTO_ROOT,
                config::RECURSIVE_SCAN,
                config::CATALOG_CAPACITY,
            )?;
            let woke_at = boot.elapsed().as_millis() as u64;
            show = Slideshow::new(catalog, woke_at);
            show.start(woke_at, &mut battery, &mut fs, &mut renderer);
        }

        std::thread::sleep(Duration::from_millis(config::TICK_DELAY_MS as u64));
    }
}

fn wait_for_wake(
    renderer: &mut PanelRenderer<WindowSink>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for event in renderer.sink_mut().window.events() {
            match event {
                SimulatorEvent::Quit => std::process::exit(0),
                SimulatorEvent::KeyDown { .. } => return Ok(()),
                _ => {}
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}
