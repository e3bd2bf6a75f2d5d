//! Power policy: when auto-advance is permitted and when the frame sleeps.

use crate::config::{LOW_BATTERY_PERCENT, SLEEP_TIMEOUT_MS};

/// Why auto-advance is currently off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableReason {
    LowBattery,
    SingleImage,
    ByUser,
}

impl DisableReason {
    /// Short text shown in the status bar.
    pub const fn label(self) -> &'static str {
        match self {
            DisableReason::LowBattery => "Low battery",
            DisableReason::SingleImage => "Only one image",
            DisableReason::ByUser => "Paused",
        }
    }
}

/// Effective auto-advance state after policy overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoAdvance {
    Enabled,
    Disabled(DisableReason),
}

impl AutoAdvance {
    pub const fn is_enabled(self) -> bool {
        matches!(self, AutoAdvance::Enabled)
    }
}

/// Hardware sources that may wake the frame from deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeSource {
    Buttons,
    Touch,
}

/// Wake sources requested when the policy puts the frame to sleep.
pub const WAKE_SOURCES: &[WakeSource] = &[WakeSource::Buttons, WakeSource::Touch];

/// The slideshow power policy.
///
/// Decides whether auto-advance is permitted given battery level and
/// catalog size, tracks the user's own on/off intent separately from the
/// effective state, and manages the sleep-arming timer. Disabling
/// auto-advance for any reason starts the countdown to deep sleep;
/// re-enabling cancels it. Once `sleep_due` reports true the caller owns
/// the sleep transition and this state is never consulted again: waking
/// is a process restart.
#[derive(Debug)]
pub struct PowerPolicy {
    user_wants_enabled: bool,
    state: AutoAdvance,
    sleep_armed_at: Option<u64>,
}

impl Default for PowerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerPolicy {
    pub fn new() -> Self {
        Self {
            user_wants_enabled: true,
            state: AutoAdvance::Enabled,
            sleep_armed_at: None,
        }
    }

    /// Re-derive the effective state from fresh readings.
    ///
    /// Precedence is fixed: low battery overrides catalog size overrides
    /// user choice.
    pub fn evaluate(&mut self, battery_percent: u8, catalog_len: usize, now_ms: u64) -> AutoAdvance {
        let next = self.derive(battery_percent, catalog_len);
        self.apply(next, now_ms);
        self.state
    }

    /// Handle a user toggle press.
    ///
    /// Rejected with the forcing reason when battery or catalog-size
    /// conditions already apply; the sleep countdown restarts from `now`
    /// either way, so the timeout is always measured from the most recent
    /// user interaction.
    pub fn user_toggle(
        &mut self,
        battery_percent: u8,
        catalog_len: usize,
        now_ms: u64,
    ) -> Result<bool, DisableReason> {
        if let AutoAdvance::Disabled(reason) = self.derive_forced(battery_percent, catalog_len) {
            self.apply(AutoAdvance::Disabled(reason), now_ms);
            self.sleep_armed_at = Some(now_ms);
            log::info!("toggle rejected: {}", reason.label());
            return Err(reason);
        }

        self.user_wants_enabled = !self.user_wants_enabled;
        self.apply(self.derive(battery_percent, catalog_len), now_ms);
        Ok(self.user_wants_enabled)
    }

    /// Restart an active sleep countdown after user interaction.
    pub fn note_user_activity(&mut self, now_ms: u64) {
        if self.sleep_armed_at.is_some() {
            self.sleep_armed_at = Some(now_ms);
        }
    }

    /// True once the armed countdown has fully elapsed.
    pub fn sleep_due(&self, now_ms: u64) -> bool {
        match self.sleep_armed_at {
            Some(armed_at) => now_ms.saturating_sub(armed_at) >= SLEEP_TIMEOUT_MS,
            None => false,
        }
    }

    pub fn auto_advance(&self) -> AutoAdvance {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn disable_reason(&self) -> Option<DisableReason> {
        match self.state {
            AutoAdvance::Enabled => None,
            AutoAdvance::Disabled(reason) => Some(reason),
        }
    }

    pub fn sleep_timer_armed(&self) -> bool {
        self.sleep_armed_at.is_some()
    }

    /// The forced-disable conditions only; ignores user intent.
    fn derive_forced(&self, battery_percent: u8, catalog_len: usize) -> AutoAdvance {
        if battery_percent < LOW_BATTERY_PERCENT {
            AutoAdvance::Disabled(DisableReason::LowBattery)
        } else if catalog_len <= 1 {
            AutoAdvance::Disabled(DisableReason::SingleImage)
        } else {
            AutoAdvance::Enabled
        }
    }

    fn derive(&self, battery_percent: u8, catalog_len: usize) -> AutoAdvance {
        match self.derive_forced(battery_percent, catalog_len) {
            AutoAdvance::Disabled(reason) => AutoAdvance::Disabled(reason),
            AutoAdvance::Enabled if !self.user_wants_enabled => {
                AutoAdvance::Disabled(DisableReason::ByUser)
            }
            AutoAdvance::Enabled => AutoAdvance::Enabled,
        }
    }

    /// Commit a state change, arming or disarming the sleep timer on the
    /// enabled/disabled edge. A reason change while already disabled
    /// leaves the countdown running from its original start.
    fn apply(&mut self, next: AutoAdvance, now_ms: u64) {
        match (self.state, next) {
            (AutoAdvance::Enabled, AutoAdvance::Disabled(reason)) => {
                self.sleep_armed_at = Some(now_ms);
                log::info!("auto-advance off ({}), sleep timer armed", reason.label());
            }
            (AutoAdvance::Disabled(_), AutoAdvance::Enabled) => {
                self.sleep_armed_at = None;
                log::info!("auto-advance on, sleep timer disarmed");
            }
            _ => {}
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_battery_overrides_everything() {
        let mut policy = PowerPolicy::new();
        assert_eq!(
            policy.evaluate(19, 10, 0),
            AutoAdvance::Disabled(DisableReason::LowBattery)
        );
        // Still low battery even with a single image and user intent off.
        let _ = policy.user_toggle(50, 10, 0);
        assert_eq!(
            policy.evaluate(10, 1, 0),
            AutoAdvance::Disabled(DisableReason::LowBattery)
        );
    }

    #[test]
    fn test_single_image_only_when_battery_ok() {
        let mut policy = PowerPolicy::new();
        assert_eq!(
            policy.evaluate(20, 1, 0),
            AutoAdvance::Disabled(DisableReason::SingleImage)
        );
        assert_eq!(
            policy.evaluate(50, 0, 0),
            AutoAdvance::Disabled(DisableReason::SingleImage)
        );
        assert_eq!(policy.evaluate(50, 2, 0), AutoAdvance::Enabled);
    }

    #[test]
    fn test_user_choice_applies_when_nothing_is_forced() {
        let mut policy = PowerPolicy::new();
        assert_eq!(policy.user_toggle(80, 3, 0), Ok(false));
        assert_eq!(
            policy.evaluate(80, 3, 1_000),
            AutoAdvance::Disabled(DisableReason::ByUser)
        );
        assert_eq!(policy.user_toggle(80, 3, 2_000), Ok(true));
        assert_eq!(policy.evaluate(80, 3, 3_000), AutoAdvance::Enabled);
    }

    #[test]
    fn test_sleep_timer_arms_on_disable_edge_only() {
        let mut policy = PowerPolicy::new();
        assert!(!policy.sleep_timer_armed());

        policy.evaluate(10, 3, 1_000);
        assert!(policy.sleep_timer_armed());
        assert!(!policy.sleep_due(60_999));
        assert!(policy.sleep_due(61_000));

        // Reason change while disabled keeps the original start time.
        policy.evaluate(90, 1, 30_000);
        assert_eq!(
            policy.auto_advance(),
            AutoAdvance::Disabled(DisableReason::SingleImage)
        );
        assert!(policy.sleep_due(61_000));
    }

    #[test]
    fn test_reenable_disarms_sleep_timer() {
        let mut policy = PowerPolicy::new();
        policy.evaluate(10, 3, 0);
        assert!(policy.sleep_timer_armed());

        policy.evaluate(90, 3, 5_000);
        assert!(!policy.sleep_timer_armed());
        assert!(!policy.sleep_due(1_000_000));
    }

    #[test]
    fn test_rejected_toggle_surfaces_reason_and_restarts_countdown() {
        let mut policy = PowerPolicy::new();
        policy.evaluate(50, 1, 0);
        assert!(policy.sleep_timer_armed());

        // User presses toggle at 30s; rejection restarts the countdown.
        assert_eq!(
            policy.user_toggle(50, 1, 30_000),
            Err(DisableReason::SingleImage)
        );
        assert!(!policy.sleep_due(60_000));
        assert!(policy.sleep_due(90_000));
    }

    #[test]
    fn test_rejected_toggle_applies_fresh_forced_state() {
        let mut policy = PowerPolicy::new();
        policy.evaluate(80, 3, 0);
        assert!(policy.is_enabled());

        // Battery dropped since the last periodic evaluation.
        assert_eq!(
            policy.user_toggle(15, 3, 1_000),
            Err(DisableReason::LowBattery)
        );
        assert_eq!(
            policy.auto_advance(),
            AutoAdvance::Disabled(DisableReason::LowBattery)
        );
        assert!(policy.sleep_timer_armed());
    }

    #[test]
    fn test_accepted_toggle_off_arms_at_toggle_time() {
        let mut policy = PowerPolicy::new();
        policy.evaluate(80, 3, 0);
        assert_eq!(policy.user_toggle(80, 3, 10_000), Ok(false));
        assert!(!policy.sleep_due(69_999));
        assert!(policy.sleep_due(70_000));
    }

    #[test]
    fn test_user_activity_restarts_active_countdown() {
        let mut policy = PowerPolicy::new();
        policy.evaluate(10, 3, 0);
        policy.note_user_activity(40_000);
        assert!(!policy.sleep_due(60_000));
        assert!(policy.sleep_due(100_000));

        // No-op while the timer is not armed.
        let mut enabled = PowerPolicy::new();
        enabled.evaluate(80, 3, 0);
        enabled.note_user_activity(5_000);
        assert!(!enabled.sleep_timer_armed());
    }
}
