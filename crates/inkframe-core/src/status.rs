//! Status bar text. Pure functions of slideshow and policy state.

use alloc::format;
use alloc::string::{String, ToString};

use crate::filesystem::basename;
use crate::power::PowerPolicy;

/// Longest title shown untruncated.
const MAX_TITLE_CHARS: usize = 30;
/// Characters kept in front of the ellipsis marker.
const TRUNCATED_TITLE_CHARS: usize = 27;

/// The four status bar fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub title: String,
    pub position: String,
    pub battery: String,
    pub auto: String,
}

/// Format the status bar for the current state.
///
/// `path` is `None` for an empty catalog. The auto label reflects the
/// effective state: "Auto" while enabled, otherwise the disable reason,
/// with the sleep countdown appended while the timer is armed. The panel
/// fonts are ASCII-only, so the marker and separator stay in ASCII.
pub fn format_status(
    path: Option<&str>,
    index: usize,
    catalog_len: usize,
    battery_percent: u8,
    policy: &PowerPolicy,
) -> StatusLine {
    let title = match path {
        Some(path) => truncate_title(basename(path)),
        None => "No photos".to_string(),
    };

    let position = if catalog_len == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", index + 1, catalog_len)
    };

    let auto = match policy.disable_reason() {
        None => "Auto".to_string(),
        Some(reason) if policy.sleep_timer_armed() => {
            format!("Auto OFF ({}) - Sleep in 1m", reason.label())
        }
        Some(reason) => format!("Auto OFF ({})", reason.label()),
    };

    StatusLine {
        title,
        position,
        battery: format!("{}%", battery_percent),
        auto,
    }
}

fn truncate_title(name: &str) -> String {
    if name.chars().count() <= MAX_TITLE_CHARS {
        return name.to_string();
    }
    let kept: String = name.chars().take(TRUNCATED_TITLE_CHARS).collect();
    format!("{}...", kept)
}
