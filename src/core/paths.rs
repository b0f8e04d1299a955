//! State-directory resolution and per-file name constants.

use std::env;
use std::path::PathBuf;

/// File name of the live (current) layout inside the state directory.
pub const LAYOUT_CURRENT_FILE: &str = "layout-current.json";
/// File name of the default saved-layout slot.
pub const LAYOUT_SAVED_FILE: &str = "layout-saved.json";
/// File name prefix for the custom slots (`layout-custom1.json`, ...).
pub const LAYOUT_CUSTOM_PREFIX: &str = "layout-custom";
/// File name of the persisted dashboard preferences.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Resolve the state directory.
///
/// Precedence: `NAVSCOPE_STATE_DIR` env var, then the configured directory,
/// then `~/.config/navscope`. Returns `None` only when no override is set
/// and `HOME` is missing.
#[must_use]
pub fn resolve_state_dir(configured: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(raw) = env::var_os("NAVSCOPE_STATE_DIR")
        && !raw.is_empty()
    {
        return Some(PathBuf::from(raw));
    }
    if let Some(dir) = configured {
        return Some(dir.clone());
    }
    home_dir().map(|home| home.join(".config").join("navscope"))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}
