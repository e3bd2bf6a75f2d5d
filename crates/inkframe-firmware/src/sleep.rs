//! Deep-sleep entry. One-way: the only path back is a hardware wake and
//! a full process restart.

use esp_idf_svc::sys;

use inkframe_core::WakeSource;

/// The Next button doubles as the wake button (GPIO39, active low).
const WAKE_BUTTON_GPIO: i32 = 39;

/// Touch pad on GPIO32 (TOUCH9) wakes the frame with a tap on the bezel.
const WAKE_TOUCH_PAD: sys::touch_pad_t = sys::touch_pad_t_TOUCH_PAD_NUM9;
const TOUCH_WAKE_THRESHOLD: u16 = 400;

pub fn enter_deep_sleep(wake_sources: &[WakeSource]) -> ! {
    for source in wake_sources {
        match source {
            WakeSource::Buttons => unsafe {
                sys::esp_sleep_enable_ext0_wakeup(WAKE_BUTTON_GPIO, 0);
            },
            WakeSource::Touch => unsafe {
                sys::touch_pad_init();
                sys::touch_pad_config(WAKE_TOUCH_PAD, TOUCH_WAKE_THRESHOLD);
                sys::esp_sleep_enable_touchpad_wakeup();
            },
        }
    }

    log::info!("entering deep sleep, wake sources: {:?}", wake_sources);
    unsafe {
        sys::esp_deep_sleep_start();
    }
    unreachable!("esp_deep_sleep_start does not return");
}
