//! Shared slideshow logic for the inkframe e-paper photo frame.
//! Works on ESP32 firmware, the desktop simulator, and host tests.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

extern crate alloc;

pub mod battery;
pub mod catalog;
pub mod config;
pub mod display;
pub mod filesystem;
pub mod input;
pub mod power;
pub mod slideshow;
pub mod status;

#[cfg(feature = "std")]
pub mod framebuffer;
#[cfg(feature = "std")]
pub mod mock_filesystem;
#[cfg(feature = "std")]
pub mod panel;

pub use battery::{percent_from_millivolts, BatteryProbe};
pub use catalog::{Catalog, ScanError};
pub use display::{RefreshQuality, Renderer};
pub use filesystem::{FileInfo, FileSystem, FileSystemError};
pub use input::{ButtonStates, Debouncer, Intent};
pub use power::{AutoAdvance, DisableReason, PowerPolicy, WakeSource};
pub use slideshow::{render_storage_error, Slideshow, TickAction};
pub use status::{format_status, StatusLine};

#[cfg(feature = "std")]
pub use framebuffer::Framebuffer;
#[cfg(feature = "std")]
pub use mock_filesystem::MockFileSystem;
#[cfg(feature = "std")]
pub use panel::{FrameSink, PanelRenderer};

/// Panel dimensions (landscape mount).
/// The 7.5" panel is native 800x480 and the frame hangs in landscape,
/// so no coordinate transpose is needed anywhere.
pub const DISPLAY_WIDTH: u32 = 800;
pub const DISPLAY_HEIGHT: u32 = 480;
