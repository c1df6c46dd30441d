//! Verbose-logging toggle.
//!
//! The host enables verbose logs either from the persisted `debug` session
//! storage key or the `?debug` query parameter (§6.2, §6.4). Neither of
//! those is something this crate can read directly (session storage and
//! URLs are host concerns), so the host calls [`set_verbose`] once during
//! bootstrap after consulting them.

use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable verbose (`debug!`-level) logging for the core.
///
/// This only affects the core's own log gating via [`is_verbose`]; it does
/// not reconfigure `log`'s global max level, since the host's logger
/// (`env_logger` or otherwise) owns that.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

/// Whether verbose logging is currently enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}
