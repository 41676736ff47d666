//! Caller-owned status bar: active preset, color resolver and layout cache.

use crate::cache::LayoutCache;
use crate::config::{Config, ConfigProvider};
use crate::context::{ContextBuilder, SegmentContext};
use crate::icons::IconSet;
use crate::layout::{compute_layout, Layout};
use crate::presets::{Preset, PresetCatalog};
use crate::theme::{colors_enabled, AnsiTheme, ColorResolver, ThemeManager, ThemeProvider};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Renders status rows for one host. Every instance owns its own cache, so
/// independent bars (or tests) never share state.
///
/// # Example
///
/// ```rust
/// use powerbar::statusbar::StatusBar;
///
/// let mut bar = StatusBar::new("minimal");
/// let ctx = bar
///     .context_builder()
///     .cwd("/home/me/project")
///     .build();
/// let layout = bar.render(&ctx, 80);
/// assert!(layout.top_content.contains("project"));
/// ```
#[derive(Debug)]
pub struct StatusBar {
    catalog: PresetCatalog,
    preset: Preset,
    colors: ColorResolver,
    icons: IconSet,
    cache: LayoutCache,
}

impl StatusBar {
    /// A bar using built-in presets, the default theme and Nerd Font icons.
    pub fn new(preset_name: &str) -> Self {
        let catalog = PresetCatalog::default();
        let preset = catalog.get(preset_name);
        let colors = ColorResolver::default()
            .with_preset_colors(preset.colors.clone())
            .with_color(colors_enabled());
        Self {
            catalog,
            preset,
            colors,
            icons: IconSet::default(),
            cache: LayoutCache::new(),
        }
    }

    /// A bar configured from the config file: preset, theme, color overrides,
    /// user presets and icon style.
    pub fn from_config(config: &Config) -> Self {
        let theme: Arc<dyn ThemeProvider> = match ThemeManager::new().load_theme(&config.theme) {
            Ok(theme) => Arc::new(theme),
            Err(e) => {
                warn!("{}; using the default theme", e);
                Arc::new(AnsiTheme::default())
            }
        };
        Self::with_theme(config, theme)
    }

    /// Like [`StatusBar::from_config`] with an explicit theme provider.
    pub fn with_theme(config: &Config, theme: Arc<dyn ThemeProvider>) -> Self {
        let catalog = config.preset_catalog();
        let name = config.preset_name().unwrap_or_else(|| "default".to_string());
        if !catalog.contains(&name) {
            debug!("Unknown preset '{}', using default", name);
        }
        let preset = catalog.get(&name);
        let colors = ColorResolver::new(theme)
            .with_overrides(config.color_overrides())
            .with_preset_colors(preset.colors.clone())
            .with_color(config.color && colors_enabled());
        Self {
            catalog,
            preset,
            colors,
            icons: config.icon_set(),
            cache: LayoutCache::new(),
        }
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Switches the active preset. Unknown names select `default`.
    ///
    /// Returns whether `name` was a known preset.
    pub fn set_preset(&mut self, name: &str) -> bool {
        let known = self.catalog.contains(name);
        self.preset = self.catalog.get(name);
        self.colors = self
            .colors
            .clone()
            .with_preset_colors(self.preset.colors.clone());
        self.cache.invalidate();
        known
    }

    /// Forces the next render to recompute. Call when the data behind the
    /// context changes.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn set_color(&mut self, enabled: bool) {
        self.colors = self.colors.clone().with_color(enabled);
        self.cache.invalidate();
    }

    pub fn set_cache_ttl(&mut self, ttl: Duration) {
        self.cache = LayoutCache::with_ttl(ttl);
    }

    pub fn set_icons(&mut self, icons: IconSet) {
        self.icons = icons;
        self.cache.invalidate();
    }

    pub fn color_resolver(&self) -> &ColorResolver {
        &self.colors
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.catalog.names()
    }

    /// A context builder preloaded with this bar's icons, colors and the
    /// active preset's segment options.
    pub fn context_builder(&self) -> ContextBuilder {
        ContextBuilder::new()
            .icons(self.icons)
            .colors(self.colors.clone())
            .options(self.preset.options.clone())
    }

    /// Lays out the active preset, reusing the previous layout when the same
    /// width is requested again within the cache window.
    pub fn render(&mut self, ctx: &SegmentContext, width: usize) -> &Layout {
        let preset = &self.preset;
        self.cache.get(width, || compute_layout(ctx, preset, width))
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new("default")
    }
}
