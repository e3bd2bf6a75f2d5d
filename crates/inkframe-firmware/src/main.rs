//! inkframe firmware: e-paper photo frame slideshow on ESP32.
//!
//! Wiring (shared SPI2 bus):
//!   EPD:  SCLK 18, MOSI 23, CS 5, DC 17, RST 16, BUSY 4
//!   SD:   MISO 19, CS 15
//!   Buttons: previous 34, next 39 (also the wake button), toggle 35
//!   Battery: GPIO36 via 1:2 divider; touch bezel: GPIO32

mod input;
mod panel;
mod sdcard;
mod sleep;

use esp_idf_svc::hal::delay::{Delay, FreeRtos};
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::{config::Config, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_svc::hal::units::FromValueType;
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::sys;

use inkframe_core::{
    config, power, render_storage_error, Catalog, PanelRenderer, Slideshow, TickAction,
};

use panel::EpdSink;

fn now_ms() -> u64 {
    (unsafe { sys::esp_timer_get_time() } / 1000) as u64
}

fn main() -> anyhow::Result<()> {
    sys::link_patches();
    EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let spi_driver = SpiDriver::new(
        peripherals.spi2,
        pins.gpio18,
        pins.gpio23,
        Some(pins.gpio19),
        &SpiDriverConfig::new(),
    )?;

    let epd_spi = SpiDeviceDriver::new(
        &spi_driver,
        Some(pins.gpio5),
        &Config::new().baudrate(10.MHz().into()),
    )?;
    let busy = PinDriver::input(pins.gpio4)?;
    let dc = PinDriver::output(pins.gpio17)?;
    let rst = PinDriver::output(pins.gpio16)?;
    let sink = EpdSink::new(epd_spi, busy, dc, rst, Delay::new_default())
        .map_err(|err| anyhow::anyhow!("panel init failed: {:?}", err))?;
    let mut renderer = PanelRenderer::new(sink);

    let buttons = input::Buttons::new(pins.gpio34, pins.gpio39, pins.gpio35)?;
    let mut battery = input::BatteryAdc::new(peripherals.adc1, pins.gpio36)?;

    let mut fs = match sdcard::SdCardFs::new(&spi_driver, pins.gpio15) {
        Ok(fs) => fs,
        Err(err) => {
            log::error!("SD mount failed: {}", err);
            render_storage_error(&mut renderer);
            park();
        }
    };

    let catalog = match Catalog::scan(
        &mut fs,
        config::PHOTO_ROOT,
        config::RECURSIVE_SCAN,
        config::CATALOG_CAPACITY,
    ) {
        Ok(catalog) => catalog,
        Err(err) => {
            log::error!("catalog scan failed: {}", err);
            render_storage_error(&mut renderer);
            park();
        }
    };

    let boot_ms = now_ms();
    let mut show = Slideshow::new(catalog, boot_ms);
    show.start(boot_ms, &mut battery, &mut fs, &mut renderer);

    loop {
        let action = show.tick(
            now_ms(),
            buttons.sample(),
            &mut battery,
            &mut fs,
            &mut renderer,
        );
        if action == TickAction::Sleep {
            renderer.sink_mut().sleep_panel();
            sleep::enter_deep_sleep(power::WAKE_SOURCES);
        }
        FreeRtos::delay_ms(config::TICK_DELAY_MS);
    }
}

/// Persistent error screen; the user reinserts the card and restarts.
fn park() -> ! {
    loop {
        FreeRtos::delay_ms(1_000);
    }
}
