//! Theme tokens and semantic color resolution.
//!
//! Segments never pick concrete colors. They ask a [`ColorResolver`] for a
//! semantic role such as `gitDirty`, which walks a layered cascade:
//!
//! ```text
//! Resolution order:
//!   1. User overrides:  [colors] table in config.toml
//!   2. Preset scheme:   colors bundled with the active preset
//!   3. Built-in:        SemanticColor::default_value()
//! ```
//!
//! The result is either a literal hex triplet, painted directly, or a named
//! token handed to the [`ThemeProvider`]. [`AnsiTheme`] is the provider used
//! by the binary; embedding hosts supply their own.

use serde::{de::Error as _, Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::colors::{self, ColorScheme, ColorValue, SemanticColor, RESET};
use crate::error::{PowerbarError, Result};

// Embedded theme files compiled into binary
const EMBEDDED_DARK_THEME: &str = include_str!("../themes/dark.toml");
const EMBEDDED_LIGHT_THEME: &str = include_str!("../themes/light.toml");

/// Renders named theme tokens. The core never interprets tokens itself.
pub trait ThemeProvider: Send + Sync {
    /// Paints `text` with the color behind `token`.
    fn fg(&self, token: &str, text: &str) -> String;
}

/// Check if colors are enabled (respects NO_COLOR env var)
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

// ===== ANSI Theme =====

/// Terminal theme mapping tokens (`accent`, `warning`, ...) to ANSI colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsiTheme {
    /// Theme name (e.g., "dark", "light")
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Token -> color name, `#rrggbb` or raw ANSI escape
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

impl AnsiTheme {
    /// Creates a theme from TOML content.
    ///
    /// # Examples
    ///
    /// ```
    /// use powerbar::theme::AnsiTheme;
    ///
    /// let toml = r#"
    ///     name = "custom"
    ///     [tokens]
    ///     accent = "bright_cyan"
    /// "#;
    ///
    /// let theme = AnsiTheme::from_toml(toml).unwrap();
    /// assert_eq!(theme.token_code("accent"), "\x1b[96m");
    /// ```
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads an embedded theme by name (`dark` or `light`, case-insensitive).
    pub fn load_embedded(name: &str) -> std::result::Result<Self, toml::de::Error> {
        let content = match name.to_lowercase().as_str() {
            "dark" => EMBEDDED_DARK_THEME,
            "light" => EMBEDDED_LIGHT_THEME,
            _ => {
                return Err(toml::de::Error::custom(format!(
                    "Unknown embedded theme '{}'. Available: dark, light",
                    name
                )));
            }
        };

        Self::from_toml(content)
    }

    /// Lists all available embedded theme names.
    pub fn embedded_themes() -> Vec<&'static str> {
        vec!["dark", "light"]
    }

    /// Escape code for a theme token. Unknown tokens are treated as color names.
    pub fn token_code(&self, token: &str) -> String {
        let value = self.tokens.get(token).map(String::as_str).unwrap_or(token);
        resolve_color(value)
    }
}

impl Default for AnsiTheme {
    fn default() -> Self {
        Self::load_embedded("dark").unwrap_or_else(|e| {
            log::warn!("Embedded dark theme failed to parse: {}", e);
            AnsiTheme {
                name: "dark".to_string(),
                description: None,
                tokens: HashMap::new(),
            }
        })
    }
}

impl ThemeProvider for AnsiTheme {
    fn fg(&self, token: &str, text: &str) -> String {
        format!("{}{}{}", self.token_code(token), text, RESET)
    }
}

impl fmt::Display for AnsiTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(desc) = &self.description {
            write!(f, " - {}", desc)?;
        }
        Ok(())
    }
}

/// Resolves a color name to its ANSI escape code.
///
/// Supports raw ANSI codes (also TOML-escaped `\\x1b[`), `#rrggbb`, the 16
/// basic names with `bright_` variants, and a few 256-color aliases. Unknown
/// names fall back to white.
pub fn resolve_color(name: &str) -> String {
    if name.starts_with("\x1b[") {
        return name.to_string();
    }

    if name.starts_with("\\x1b[") {
        return name.replace("\\x1b", "\x1b");
    }

    if let Some(rgb) = colors::Rgb::from_hex(name) {
        return rgb.fg_ansi();
    }

    let code = match name {
        "black" => "\x1b[30m",
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        "gray" => "\x1b[90m",

        "bright_red" => "\x1b[91m",
        "bright_green" => "\x1b[92m",
        "bright_yellow" => "\x1b[93m",
        "bright_blue" => "\x1b[94m",
        "bright_magenta" => "\x1b[95m",
        "bright_cyan" => "\x1b[96m",
        "bright_white" => "\x1b[97m",

        "light_gray" => return colors::fg_ansi_256(245),
        "orange" => return colors::fg_ansi_256(208),

        _ => {
            log::debug!("Unknown color name '{}', using white", name);
            "\x1b[37m"
        }
    };
    code.to_string()
}

// ===== Theme Manager =====

/// Finds themes by name: user theme files first, then embedded ones.
pub struct ThemeManager {
    themes_dir: PathBuf,
}

impl ThemeManager {
    /// Manager reading user themes from `~/.config/powerbar/themes/`.
    pub fn new() -> Self {
        Self::with_dir(crate::common::get_config_dir().join("themes"))
    }

    pub fn with_dir(themes_dir: PathBuf) -> Self {
        Self { themes_dir }
    }

    /// Loads a theme by name.
    ///
    /// Discovery order:
    /// 1. User themes: `{themes_dir}/{name}.toml`
    /// 2. Embedded themes: dark, light
    pub fn load_theme(&self, name: &str) -> Result<AnsiTheme> {
        let theme_path = self.themes_dir.join(format!("{}.toml", name));
        if theme_path.exists() {
            let content = fs::read_to_string(&theme_path)?;
            return AnsiTheme::from_toml(&content).map_err(|e| {
                PowerbarError::theme(format!("Failed to parse theme '{}': {}", name, e))
            });
        }

        AnsiTheme::load_embedded(name).map_err(|_| {
            PowerbarError::theme(format!(
                "Theme '{}' not found. Available embedded themes: {}",
                name,
                AnsiTheme::embedded_themes().join(", ")
            ))
        })
    }

    /// Lists all available themes (user + embedded), sorted.
    pub fn list_themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = AnsiTheme::embedded_themes()
            .into_iter()
            .map(String::from)
            .collect();

        if let Ok(entries) = fs::read_dir(&self.themes_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    themes.push(stem.to_string());
                }
            }
        }

        themes.sort();
        themes.dedup();
        themes
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Color Resolver =====

/// Resolves semantic colors through the override cascade and paints text.
///
/// Owned by the caller and carried in the segment context; there is no
/// process-wide theme state.
#[derive(Clone)]
pub struct ColorResolver {
    overrides: ColorScheme,
    preset: ColorScheme,
    theme: Arc<dyn ThemeProvider>,
    enabled: bool,
}

impl ColorResolver {
    pub fn new(theme: Arc<dyn ThemeProvider>) -> Self {
        Self {
            overrides: ColorScheme::new(),
            preset: ColorScheme::new(),
            theme,
            enabled: true,
        }
    }

    /// Resolver that never emits escapes.
    pub fn plain() -> Self {
        Self::default().with_color(false)
    }

    /// User-configured colors, consulted first.
    pub fn with_overrides(mut self, overrides: ColorScheme) -> Self {
        self.overrides = overrides;
        self
    }

    /// Colors bundled with the active preset.
    pub fn with_preset_colors(mut self, preset: ColorScheme) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Walks override -> preset -> built-in.
    pub fn resolve(&self, role: SemanticColor) -> ColorValue {
        self.overrides
            .get(&role)
            .or_else(|| self.preset.get(&role))
            .cloned()
            .unwrap_or_else(|| role.default_value())
    }

    /// Paints `text` with a concrete color value.
    pub fn apply(&self, color: &ColorValue, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match color {
            ColorValue::Hex(rgb) => colors::paint_hex(*rgb, text),
            ColorValue::Named(token) => self.theme.fg(token, text),
        }
    }

    /// Paints `text` with the color resolved for `role`.
    pub fn fg(&self, role: SemanticColor, text: &str) -> String {
        self.apply(&self.resolve(role), text)
    }

    /// Multi-color gradient, bypassing semantic resolution.
    pub fn rainbow(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        colors::rainbow(text)
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::new(Arc::new(AnsiTheme::default()))
    }
}

impl fmt::Debug for ColorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorResolver")
            .field("overrides", &self.overrides)
            .field("preset", &self.preset)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgb;
    use tempfile::TempDir;

    /// Theme that tags text with the token name, for asserting delegation.
    struct TaggingTheme;

    impl ThemeProvider for TaggingTheme {
        fn fg(&self, token: &str, text: &str) -> String {
            format!("<{}>{}</{}>", token, text, token)
        }
    }

    fn tagging() -> ColorResolver {
        ColorResolver::new(Arc::new(TaggingTheme))
    }

    // ===== AnsiTheme Tests =====

    #[test]
    fn test_load_embedded_themes() {
        let dark = AnsiTheme::load_embedded("dark").unwrap();
        assert_eq!(dark.name, "dark");
        assert_eq!(dark.token_code("error"), "\x1b[31m");
        assert_eq!(dark.token_code("dim"), "\x1b[38;5;245m");

        let light = AnsiTheme::load_embedded("Light").unwrap();
        assert_eq!(light.name, "light");
        assert_eq!(light.token_code("text"), "\x1b[30m");
    }

    #[test]
    fn test_load_embedded_unknown() {
        let err = AnsiTheme::load_embedded("nonexistent").unwrap_err().to_string();
        assert!(err.contains("Unknown embedded theme"));
    }

    #[test]
    fn test_default_theme_is_dark() {
        let theme = AnsiTheme::default();
        assert_eq!(theme.name, "dark");
        assert!(theme.tokens.contains_key("accent"));
        assert_eq!(
            format!("{}", theme),
            "dark - Default palette for dark terminals"
        );
    }

    #[test]
    fn test_resolve_color_forms() {
        assert_eq!(resolve_color("cyan"), "\x1b[36m");
        assert_eq!(resolve_color("bright_blue"), "\x1b[94m");
        assert_eq!(resolve_color("orange"), "\x1b[38;5;208m");
        assert_eq!(resolve_color("#00afaf"), "\x1b[38;2;0;175;175m");
        assert_eq!(resolve_color("\x1b[38;5;214m"), "\x1b[38;5;214m");
        assert_eq!(resolve_color("\\x1b[38;5;214m"), "\x1b[38;5;214m");
        assert_eq!(resolve_color("invalid_color"), "\x1b[37m");
    }

    #[test]
    fn test_unknown_token_falls_back_to_color_name() {
        let theme = AnsiTheme::default();
        assert_eq!(theme.fg("magenta", "x"), "\x1b[35mx\x1b[0m");
    }

    // ===== ThemeManager Tests =====

    #[test]
    fn test_theme_manager_user_theme_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("dark.toml"),
            "name = \"dark\"\n[tokens]\naccent = \"bright_green\"\n",
        )
        .unwrap();

        let manager = ThemeManager::with_dir(dir.path().to_path_buf());
        let theme = manager.load_theme("dark").unwrap();
        assert_eq!(theme.token_code("accent"), "\x1b[92m");
    }

    #[test]
    fn test_theme_manager_missing_theme() {
        let dir = TempDir::new().unwrap();
        let manager = ThemeManager::with_dir(dir.path().to_path_buf());
        let err = manager.load_theme("solarized").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_theme_manager_bad_user_theme() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.toml"), "name = ").unwrap();
        let manager = ThemeManager::with_dir(dir.path().to_path_buf());
        assert!(matches!(
            manager.load_theme("broken"),
            Err(PowerbarError::Theme(_))
        ));
    }

    #[test]
    fn test_theme_manager_list_themes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("nord.toml"), "name = \"nord\"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let manager = ThemeManager::with_dir(dir.path().to_path_buf());
        assert_eq!(manager.list_themes(), vec!["dark", "light", "nord"]);
    }

    // ===== ColorResolver Tests =====

    #[test]
    fn test_cascade_order() {
        let mut overrides = ColorScheme::new();
        overrides.insert(SemanticColor::Cost, ColorValue::named("user"));

        let mut preset = ColorScheme::new();
        preset.insert(SemanticColor::Cost, ColorValue::named("preset"));
        preset.insert(SemanticColor::Path, ColorValue::named("preset"));

        let resolver = tagging()
            .with_overrides(overrides)
            .with_preset_colors(preset);

        assert_eq!(resolver.resolve(SemanticColor::Cost), ColorValue::named("user"));
        assert_eq!(resolver.resolve(SemanticColor::Path), ColorValue::named("preset"));
        assert_eq!(
            resolver.resolve(SemanticColor::Separator),
            SemanticColor::Separator.default_value()
        );
    }

    #[test]
    fn test_named_tokens_delegate_to_theme() {
        let resolver = tagging();
        assert_eq!(
            resolver.fg(SemanticColor::ContextError, "95.0%"),
            "<error>95.0%</error>"
        );
    }

    #[test]
    fn test_hex_values_bypass_theme() {
        let resolver = tagging();
        assert_eq!(
            resolver.fg(SemanticColor::Model, "Opus"),
            format!("{}Opus\x1b[0m", Rgb::new(0xd7, 0x87, 0xaf).fg_ansi())
        );
    }

    #[test]
    fn test_disabled_colors_are_identity() {
        let resolver = ColorResolver::plain();
        assert_eq!(resolver.fg(SemanticColor::GitClean, "main"), "main");
        assert_eq!(resolver.rainbow("think:high"), "think:high");
        assert!(!resolver.is_enabled());
    }
}
