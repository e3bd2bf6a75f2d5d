//! E-paper flush sink over the Waveshare 7.5" driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use epd_waveshare::epd7in5_v2::Epd7in5;
use epd_waveshare::prelude::WaveshareDisplay;

use inkframe_core::{FrameSink, Framebuffer, RefreshQuality, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Pushes finished framebuffers to the panel.
///
/// `High` is the full flashing refresh; `Fast` goes through the partial
/// update path, which trades ghosting for speed on text-only changes.
pub struct EpdSink<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    spi: SPI,
    epd: Epd7in5<SPI, BUSY, DC, RST, DELAY>,
    delay: DELAY,
}

impl<SPI, BUSY, DC, RST, DELAY> EpdSink<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(
        mut spi: SPI,
        busy: BUSY,
        dc: DC,
        rst: RST,
        mut delay: DELAY,
    ) -> Result<Self, SPI::Error> {
        let epd = Epd7in5::new(&mut spi, busy, dc, rst, &mut delay, None)?;
        Ok(Self { spi, epd, delay })
    }

    /// Put the panel controller into its own low-power mode before the
    /// SoC deep-sleeps; floating control lines can otherwise damage the
    /// panel over time.
    pub fn sleep_panel(&mut self) {
        if let Err(err) = self.epd.sleep(&mut self.spi, &mut self.delay) {
            log::error!("panel sleep failed: {:?}", err);
        }
    }
}

impl<SPI, BUSY, DC, RST, DELAY> FrameSink for EpdSink<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn push_full(&mut self, frame: &Framebuffer, quality: RefreshQuality) {
        let result = match quality {
            RefreshQuality::High => {
                self.epd
                    .update_and_display_frame(&mut self.spi, frame.buffer(), &mut self.delay)
            }
            RefreshQuality::Fast => self
                .epd
                .update_partial_frame(
                    &mut self.spi,
                    &mut self.delay,
                    frame.buffer(),
                    0,
                    0,
                    DISPLAY_WIDTH,
                    DISPLAY_HEIGHT,
                )
                .and_then(|()| self.epd.display_frame(&mut self.spi, &mut self.delay)),
        };
        if let Err(err) = result {
            log::error!("full panel refresh failed: {:?}", err);
        }
    }

    fn push_region(&mut self, frame: &Framebuffer, y: u32, height: u32, _quality: RefreshQuality) {
        let result = self
            .epd
            .update_partial_frame(
                &mut self.spi,
                &mut self.delay,
                frame.rows(y, height),
                0,
                y,
                DISPLAY_WIDTH,
                height,
            )
            .and_then(|()| self.epd.display_frame(&mut self.spi, &mut self.delay));
        if let Err(err) = result {
            log::error!("partial panel refresh failed: {:?}", err);
        }
    }
}
