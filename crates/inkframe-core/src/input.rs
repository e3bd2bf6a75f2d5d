//! Button input abstraction and debouncing.

use crate::config::DEBOUNCE_WINDOW_MS;

/// Levels of the three physical buttons, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonStates {
    pub previous: bool,
    pub next: bool,
    pub toggle: bool,
}

impl ButtonStates {
    pub const NONE: Self = Self {
        previous: false,
        next: false,
        toggle: false,
    };
}

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PreviousImage,
    NextImage,
    ToggleAutoAdvance,
}

/// Converts raw button levels into discrete intents.
///
/// At most one intent per poll. When several buttons read pressed in the
/// same sample the priority is Previous, Next, Toggle; the buttons are
/// physically independent, the order just makes ties deterministic.
#[derive(Debug, Default)]
pub struct Debouncer {
    last_event_ms: Option<u64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the accepted intent for this sample, if any.
    ///
    /// An intent is accepted only when at least the debounce window has
    /// passed since the previously accepted one; acceptance restarts the
    /// window.
    pub fn poll(&mut self, buttons: ButtonStates, now_ms: u64) -> Option<Intent> {
        let intent = if buttons.previous {
            Intent::PreviousImage
        } else if buttons.next {
            Intent::NextImage
        } else if buttons.toggle {
            Intent::ToggleAutoAdvance
        } else {
            return None;
        };

        if let Some(last) = self.last_event_ms {
            if now_ms.saturating_sub(last) < DEBOUNCE_WINDOW_MS {
                return None;
            }
        }
        self.last_event_ms = Some(now_ms);
        Some(intent)
    }
}
