//! Common utilities shared across modules.

use std::path::PathBuf;

/// Application name used for config directories and env var prefixes
pub const APP_NAME: &str = "powerbar";

/// Gets the application config directory.
///
/// Returns `~/.config/powerbar/` on Unix-like systems.
///
/// # Example
///
/// ```rust,no_run
/// use powerbar::common::get_config_dir;
///
/// let themes = get_config_dir().join("themes");
/// ```
pub fn get_config_dir() -> PathBuf {
    let base_dir = dirs::config_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config")
    });

    base_dir.join(APP_NAME)
}

/// Home directory as a string, if one can be determined.
pub fn home_dir_string() -> Option<String> {
    dirs::home_dir().and_then(|p| p.to_str().map(|s| s.to_string()))
}

/// Short host name (first DNS label) of this machine.
pub fn short_hostname() -> Option<String> {
    let name = hostname::get().ok()?.into_string().ok()?;
    let short = name.split('.').next().unwrap_or_default().to_string();
    if short.is_empty() {
        None
    } else {
        Some(short)
    }
}
