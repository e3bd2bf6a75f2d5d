//! The slideshow controller: one owner for index, timers, and policy.

use alloc::format;

use crate::battery::BatteryProbe;
use crate::catalog::{Catalog, ScanError};
use crate::config::{
    AUTO_ADVANCE_INTERVAL_MS, CATALOG_CAPACITY, PHOTO_ROOT, POLICY_EVAL_INTERVAL_MS,
    RECURSIVE_SCAN, STATUS_BAR_HEIGHT,
};
use crate::display::{RefreshQuality, Renderer};
use crate::filesystem::FileSystem;
use crate::input::{ButtonStates, Debouncer, Intent};
use crate::power::PowerPolicy;
use crate::status::format_status;
use crate::DISPLAY_HEIGHT;

/// What the platform loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Nothing changed; wait out the tick delay and poll again.
    Idle,
    /// The panel was updated; keep looping.
    Rendered,
    /// Enter deep sleep. Terminal: the process only comes back through a
    /// hardware wake source and a fresh start.
    Sleep,
}

/// How much of the frame a tick dirtied.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Dirty {
    None,
    StatusBar,
    FullImage,
}

impl Dirty {
    fn escalate(&mut self, other: Dirty) {
        if other > *self {
            *self = other;
        }
    }
}

/// Persistent error screen for a missing or unreadable card.
///
/// There is no retry loop: the user reinserts the card and restarts the
/// frame.
pub fn render_storage_error(renderer: &mut dyn Renderer) {
    renderer.clear();
    renderer.draw_text("Storage unavailable", 40, 180, 3);
    renderer.draw_text("Check the SD card and restart the frame", 40, 220, 1);
    renderer.push_full(RefreshQuality::High);
}

/// Single-threaded slideshow state machine.
///
/// The platform drives it with a fixed-period `tick`, supplying sampled
/// button levels, a battery probe, storage, a renderer, and the current
/// time in milliseconds. All blocking I/O happens synchronously inside
/// the tick; the display medium is slow anyway.
pub struct Slideshow {
    catalog: Catalog,
    current_index: usize,
    last_advance_ms: u64,
    last_policy_check_ms: u64,
    policy: PowerPolicy,
    debouncer: Debouncer,
}

impl Slideshow {
    pub fn new(catalog: Catalog, now_ms: u64) -> Self {
        Self {
            catalog,
            current_index: 0,
            last_advance_ms: now_ms,
            last_policy_check_ms: now_ms,
            policy: PowerPolicy::new(),
            debouncer: Debouncer::new(),
        }
    }

    /// Initial policy evaluation and first full render.
    pub fn start(
        &mut self,
        now_ms: u64,
        battery: &mut dyn BatteryProbe,
        fs: &mut dyn FileSystem,
        renderer: &mut dyn Renderer,
    ) {
        let battery_percent = battery.read_percent();
        self.policy
            .evaluate(battery_percent, self.catalog.len(), now_ms);
        self.last_policy_check_ms = now_ms;
        self.render_current(battery_percent, fs, renderer);
    }

    /// One control-loop tick.
    pub fn tick(
        &mut self,
        now_ms: u64,
        buttons: ButtonStates,
        battery: &mut dyn BatteryProbe,
        fs: &mut dyn FileSystem,
        renderer: &mut dyn Renderer,
    ) -> TickAction {
        // One reading per tick keeps every branch of this decision
        // consistent with the same battery level.
        let battery_percent = battery.read_percent();
        let mut dirty = Dirty::None;

        if let Some(intent) = self.debouncer.poll(buttons, now_ms) {
            match intent {
                Intent::PreviousImage => {
                    if self.step(now_ms, -1) {
                        dirty.escalate(Dirty::FullImage);
                    }
                }
                Intent::NextImage => {
                    if self.step(now_ms, 1) {
                        dirty.escalate(Dirty::FullImage);
                    }
                }
                Intent::ToggleAutoAdvance => {
                    self.last_advance_ms = now_ms;
                    // Accepted or rejected, the effective state or its
                    // on-screen reason changed; the rejection reason is
                    // surfaced through the policy state.
                    let _ = self
                        .policy
                        .user_toggle(battery_percent, self.catalog.len(), now_ms);
                    dirty.escalate(Dirty::StatusBar);
                }
            }
        }

        // Elapsed-time check, deliberately not a modulo match on the tick
        // timestamp: ticks drift with render and storage latency.
        if now_ms.saturating_sub(self.last_policy_check_ms) >= POLICY_EVAL_INTERVAL_MS {
            self.last_policy_check_ms = now_ms;
            let before = self.policy.auto_advance();
            self.policy
                .evaluate(battery_percent, self.catalog.len(), now_ms);
            if self.policy.auto_advance() != before {
                dirty.escalate(Dirty::StatusBar);
            }
        }

        if self.policy.is_enabled()
            && self.catalog.len() > 1
            && now_ms.saturating_sub(self.last_advance_ms) >= AUTO_ADVANCE_INTERVAL_MS
        {
            self.current_index = (self.current_index + 1) % self.catalog.len();
            self.last_advance_ms = now_ms;
            dirty.escalate(Dirty::FullImage);
        }

        if self.policy.sleep_due(now_ms) {
            log::info!("sleep timer expired, handing off to deep sleep");
            renderer.clear();
            renderer.draw_text("Going to sleep", 280, 220, 3);
            renderer.draw_text("Press a button to wake", 280, 260, 1);
            renderer.push_full(RefreshQuality::Fast);
            return TickAction::Sleep;
        }

        match dirty {
            Dirty::FullImage => {
                self.render_current(battery_percent, fs, renderer);
                TickAction::Rendered
            }
            Dirty::StatusBar => {
                self.render_status(battery_percent, renderer);
                renderer.push_region(Self::BAR_Y, STATUS_BAR_HEIGHT, RefreshQuality::Fast);
                TickAction::Rendered
            }
            Dirty::None => TickAction::Idle,
        }
    }

    /// Full redraw of the current photo and status bar.
    ///
    /// A photo that fails to decode gets an inline error instead; it stays
    /// in the catalog and the index does not move, so navigation keeps
    /// working around it.
    pub fn render_current(
        &mut self,
        battery_percent: u8,
        fs: &mut dyn FileSystem,
        renderer: &mut dyn Renderer,
    ) {
        renderer.clear();
        match self.catalog.get(self.current_index) {
            Some(path) => {
                if !renderer.draw_image_file(fs, path) {
                    log::warn!("failed to draw {}", path);
                    let line = format_status(
                        Some(path),
                        self.current_index,
                        self.catalog.len(),
                        battery_percent,
                        &self.policy,
                    );
                    renderer.draw_text(&format!("Cannot display {}", line.title), 40, 200, 2);
                }
            }
            None => {
                renderer.draw_text("No photos found on card", 40, 180, 2);
                renderer.draw_text("Add JPG files and restart the frame", 40, 220, 1);
            }
        }
        self.render_status(battery_percent, renderer);
        renderer.push_full(RefreshQuality::High);
    }

    const BAR_Y: u32 = DISPLAY_HEIGHT - STATUS_BAR_HEIGHT;

    fn render_status(&self, battery_percent: u8, renderer: &mut dyn Renderer) {
        let line = format_status(
            self.catalog.get(self.current_index),
            self.current_index,
            self.catalog.len(),
            battery_percent,
            &self.policy,
        );
        renderer.clear_region(Self::BAR_Y, STATUS_BAR_HEIGHT);
        renderer.draw_text(
            &format!("{}  {}", line.title, line.position),
            6,
            Self::BAR_Y as i32 + 4,
            1,
        );
        renderer.draw_text(
            &format!("{}  {}", line.battery, line.auto),
            6,
            Self::BAR_Y as i32 + 22,
            1,
        );
    }

    /// Rebuild the catalog wholesale and restart from the first photo.
    pub fn rescan(&mut self, fs: &mut dyn FileSystem) -> Result<(), ScanError> {
        self.catalog = Catalog::scan(fs, PHOTO_ROOT, RECURSIVE_SCAN, CATALOG_CAPACITY)?;
        self.current_index = 0;
        Ok(())
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &PowerPolicy {
        &self.policy
    }

    /// Wrap-around step; no-op on an empty catalog. Manual navigation
    /// defers the next auto-advance and restarts an armed sleep timer.
    fn step(&mut self, now_ms: u64, direction: i32) -> bool {
        let len = self.catalog.len();
        if len == 0 {
            return false;
        }
        self.current_index = if direction >= 0 {
            (self.current_index + 1) % len
        } else {
            (self.current_index + len - 1) % len
        };
        self.last_advance_ms = now_ms;
        self.policy.note_user_activity(now_ms);
        true
    }
}
