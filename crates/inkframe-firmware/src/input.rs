//! Button sampling and battery ADC for the frame's side controls.

use esp_idf_svc::hal::adc::attenuation::DB_12;
use esp_idf_svc::hal::adc::oneshot::config::{AdcChannelConfig, Calibration};
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::adc::ADC1;
use esp_idf_svc::hal::gpio::{Gpio34, Gpio35, Gpio36, Gpio39, Input, PinDriver};
use esp_idf_svc::sys::EspError;

use inkframe_core::{BatteryProbe, ButtonStates};

/// The three side buttons. Active low with external pull-ups; GPIO 34/35/39
/// are input-only pins without internal pulls.
pub struct Buttons<'d> {
    previous: PinDriver<'d, Gpio34, Input>,
    next: PinDriver<'d, Gpio39, Input>,
    toggle: PinDriver<'d, Gpio35, Input>,
}

impl<'d> Buttons<'d> {
    pub fn new(gpio34: Gpio34, gpio39: Gpio39, gpio35: Gpio35) -> Result<Self, EspError> {
        Ok(Self {
            previous: PinDriver::input(gpio34)?,
            next: PinDriver::input(gpio39)?,
            toggle: PinDriver::input(gpio35)?,
        })
    }

    /// Snapshot of the current button levels for one tick.
    pub fn sample(&self) -> ButtonStates {
        ButtonStates {
            previous: self.previous.is_low(),
            next: self.next.is_low(),
            toggle: self.toggle.is_low(),
        }
    }
}

/// Battery voltage probe on GPIO36 behind a 1:2 divider.
///
/// Raw samples jump around with panel refresh load, so readings go
/// through an 80/20 low-pass before the policy sees them; the core
/// mapping itself stays a pure function.
pub struct BatteryAdc<'d> {
    adc: AdcDriver<'d, ADC1>,
    pin: Gpio36,
    filtered_mv: Option<u16>,
}

impl<'d> BatteryAdc<'d> {
    /// External divider halves the pack voltage into the ADC range.
    const DIVIDER_RATIO: u32 = 2;

    pub fn new(adc1: ADC1, gpio36: Gpio36) -> Result<Self, EspError> {
        Ok(Self {
            adc: AdcDriver::new(adc1)?,
            pin: gpio36,
            filtered_mv: None,
        })
    }

    fn sample_mv(&mut self) -> Result<u16, EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_12,
            calibration: Calibration::Line,
            ..Default::default()
        };
        let mut channel = AdcChannelDriver::new(&self.adc, &mut self.pin, &config)?;
        let at_pin: u16 = channel.read()?;
        Ok((at_pin as u32 * Self::DIVIDER_RATIO) as u16)
    }
}

impl BatteryProbe for BatteryAdc<'_> {
    fn read_millivolts(&mut self) -> u16 {
        match self.sample_mv() {
            Ok(raw) => {
                let filtered = match self.filtered_mv {
                    // Simple low-pass filter: 80% previous, 20% new.
                    Some(prev) => ((prev as u32 * 4 + raw as u32) / 5) as u16,
                    None => raw,
                };
                self.filtered_mv = Some(filtered);
                filtered
            }
            Err(err) => {
                log::error!("battery ADC read failed: {}", err);
                // A dead reading reports empty, which errs toward the
                // low-battery policy rather than away from it.
                self.filtered_mv.unwrap_or(0)
            }
        }
    }
}
