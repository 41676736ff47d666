use crate::colors::{scheme_from_names, ColorScheme, NamedColorScheme};
use crate::common::{get_config_dir, APP_NAME};
use crate::error::{PowerbarError, Result};
use crate::icons::{IconSet, IconStyle};
use crate::presets::{PresetCatalog, PresetDef};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "POWERBAR_CONFIG";

/// Environment variable overriding the configured preset
pub const PRESET_ENV: &str = "POWERBAR_PRESET";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active preset; `default` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Token palette for named colors (embedded `dark`/`light` or a user theme)
    pub theme: String,

    /// Emit ANSI colors at all
    pub color: bool,

    /// Semantic color overrides, applied on top of every preset
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: NamedColorScheme,

    /// Display configuration
    pub display: DisplayConfig,

    /// User-defined presets, consulted before the built-in ones
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub presets: BTreeMap<String, PresetDef>,
}

/// Display-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Icon set: "nerd" (needs a Nerd Font) or "plain"
    pub icons: IconStyle,

    /// Width used when neither --width nor $COLUMNS is available
    pub default_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            preset: None,
            theme: "dark".to_string(),
            color: true,
            colors: NamedColorScheme::new(),
            display: DisplayConfig::default(),
            presets: BTreeMap::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            icons: IconStyle::Nerd,
            default_width: 80,
        }
    }
}

/// Persisted preferences consulted before preset and built-in colors.
pub trait ConfigProvider {
    fn preset_name(&self) -> Option<String>;
    fn color_overrides(&self) -> ColorScheme;
}

impl ConfigProvider for Config {
    fn preset_name(&self) -> Option<String> {
        self.preset.clone()
    }

    fn color_overrides(&self) -> ColorScheme {
        scheme_from_names(&self.colors)
    }
}

// Configuration loading
impl Config {
    /// Load configuration from the standard locations, then apply
    /// environment overrides. Missing files yield defaults.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)?
            }
            None => Config::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PowerbarError::config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| PowerbarError::config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| PowerbarError::config(format!("Failed to serialize config: {}", e)))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PowerbarError::config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, toml_string)
            .map_err(|e| PowerbarError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// `POWERBAR_PRESET` replaces the configured preset when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(preset) = env::var(PRESET_ENV) {
            if !preset.is_empty() {
                self.preset = Some(preset);
            }
        }
    }

    /// Find config file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        // 1. Explicit path
        if let Ok(path) = env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. XDG config directory
        let path = get_config_dir().join("config.toml");
        if path.exists() {
            return Some(path);
        }

        // 3. Home directory
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir.join(format!(".{}.toml", APP_NAME));
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Get default config file path (for creating new config)
    pub fn default_config_path() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join(APP_NAME).join("config.toml"))
        } else {
            Err(PowerbarError::config("Could not determine config directory"))
        }
    }

    /// Name of the preset to render
    pub fn preset_or_default(&self) -> &str {
        self.preset.as_deref().unwrap_or("default")
    }

    pub fn preset_catalog(&self) -> PresetCatalog {
        PresetCatalog::new(self.presets.clone())
    }

    pub fn icon_set(&self) -> IconSet {
        IconSet::for_style(self.display.icons)
    }

    /// Generate example config file content
    pub fn example_toml() -> &'static str {
        r##"# powerbar configuration file
#
# All values shown are the defaults; override only what you need.

# Preset: default, focused, minimal, compact, full, nerd, ascii,
# or the name of a preset defined below
preset = "default"

# Palette for named colors: "dark", "light", or a theme file in
# ~/.config/powerbar/themes/<name>.toml
theme = "dark"

# Set to false (or export NO_COLOR) for plain output
color = true

[display]
# "nerd" needs a Nerd Font; "plain" draws no icons
icons = "nerd"

# Used when neither --width nor $COLUMNS is set
default_width = 80

# Semantic color overrides, applied over every preset.
# Values are "#rrggbb" or a theme token (text, muted, dim, accent,
# primary, success, warning, error) or an ANSI color name.
# [colors]
# gitDirty = "#ff8700"
# separator = "muted"

# A custom preset
# [presets.mine]
# left = ["model", "path", "git"]
# right = ["cost", "context_pct"]
# secondary = ["extension_statuses"]
# separator = "chevron"
#
# [presets.mine.options.path]
# mode = "abbreviated"
# max_length = 30
#
# [presets.mine.options.time]
# format = "12h"
# show_seconds = false
"##
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{ColorValue, SemanticColor};
    use crate::segments::SegmentId;
    use crate::separators::SeparatorStyle;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert!(config.color);
        assert_eq!(config.display.default_width, 80);
        assert_eq!(config.preset_or_default(), "default");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config {
            preset: Some("mine".to_string()),
            theme: "light".to_string(),
            ..Config::default()
        };
        config
            .colors
            .insert("gitDirty".to_string(), ColorValue::from("#ff8700"));
        config.presets.insert(
            "mine".to_string(),
            PresetDef {
                left: vec!["model".to_string(), "git".to_string()],
                separator: SeparatorStyle::Chevron,
                ..PresetDef::default()
            },
        );
        config.save(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_example_config_parses() {
        let example = Config::example_toml();
        let config: Config = toml::from_str(example).unwrap();
        assert_eq!(config.preset.as_deref(), Some("default"));
        assert_eq!(config.display, DisplayConfig::default());
        assert!(config.colors.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[display]\nicons = \"plain\"").unwrap();
        assert_eq!(config.display.icons, IconStyle::Plain);
        assert_eq!(config.display.default_width, 80);
        assert_eq!(config.theme, "dark");
        assert!(config.icon_set().branch.is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "preset = [not valid").unwrap();
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(Config::load_from_file(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_config_provider() {
        let config: Config = toml::from_str(
            r##"
            preset = "nerd"
            [colors]
            model = "#112233"
            nonsense = "red"
            "##,
        )
        .unwrap();
        assert_eq!(config.preset_name().as_deref(), Some("nerd"));
        let overrides = config.color_overrides();
        assert_eq!(overrides.len(), 1);
        assert_eq!(
            overrides[&SemanticColor::Model],
            ColorValue::from("#112233")
        );
    }

    #[test]
    fn test_custom_presets_reach_catalog() {
        let config: Config = toml::from_str(
            r#"
            [presets.tiny]
            left = ["git"]
            "#,
        )
        .unwrap();
        let catalog = config.preset_catalog();
        assert!(catalog.contains("tiny"));
        assert_eq!(catalog.get("tiny").left, vec![SegmentId::Git]);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("powerbar.toml");
        fs::write(&path, "preset = \"compact\"\ntheme = \"light\"\n").unwrap();

        env::set_var(CONFIG_ENV, &path);
        env::remove_var(PRESET_ENV);
        let config = Config::load().unwrap();
        assert_eq!(config.preset.as_deref(), Some("compact"));
        assert_eq!(config.theme, "light");

        env::set_var(PRESET_ENV, "minimal");
        let config = Config::load().unwrap();
        assert_eq!(config.preset.as_deref(), Some("minimal"));

        env::set_var(PRESET_ENV, "");
        let config = Config::load().unwrap();
        assert_eq!(config.preset.as_deref(), Some("compact"));

        env::remove_var(PRESET_ENV);
        env::remove_var(CONFIG_ENV);
    }
}
