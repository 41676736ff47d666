//! # powerbar
//!
//! A powerline-style status line for terminal UIs.
//!
//! Segments (model, path, git state, token usage, cost, clock, ...) render
//! independently from a shared [`SegmentContext`](context::SegmentContext).
//! The layout engine packs the visible ones, in preset order, into a primary
//! row sized to the terminal and spills the rest to a secondary row.
//!
//! ## Features
//!
//! - **Presets**: built-in bundles of segments, separators and colors, plus
//!   user-defined presets in the config file
//! - **Responsive layout**: greedy, order-preserving two-row packing that
//!   measures styled text by its visible width
//! - **Layered colors**: config overrides, then preset colors, then built-in
//!   defaults, with theme tokens resolved by a pluggable theme
//! - **Short-lived caching**: repeated renders at the same width reuse the
//!   previous layout
//!
//! ## Quick Start
//!
//! ```rust
//! use powerbar::context::{GitStatus, ModelInfo};
//! use powerbar::StatusBar;
//!
//! let mut bar = StatusBar::new("compact");
//! bar.set_color(false);
//! let ctx = bar
//!     .context_builder()
//!     .model(ModelInfo { name: "Claude Opus 4".into(), ..ModelInfo::default() })
//!     .git(GitStatus { branch: Some("main".into()), ..GitStatus::default() })
//!     .build();
//!
//! let layout = bar.render(&ctx, 80);
//! assert!(layout.top_content.contains("Opus 4"));
//! assert!(layout.secondary_content.is_empty());
//! ```

pub mod cache;
pub mod colors;
pub mod common;
/// Configuration management module for loading and saving settings
pub mod config;
pub mod context;
pub mod error;
pub mod icons;
pub mod layout;
pub mod models;
pub mod presets;
pub mod segments;
pub mod separators;
pub mod statusbar;
pub mod theme;
pub mod usage;
pub mod utils;
pub mod version;
pub mod width;

pub use cache::LayoutCache;
pub use config::Config;
pub use context::{ContextBuilder, SegmentContext};
pub use error::{PowerbarError, Result};
pub use layout::{compute_layout, Layout};
pub use models::StatusInput;
pub use presets::{get_preset, Preset};
pub use segments::{render_segment, RenderedSegment, SegmentId};
pub use statusbar::StatusBar;
pub use version::version_string;
pub use width::visible_width;

/// Renders a JSON status snapshot with the given bar.
///
/// Malformed JSON renders as an empty snapshot rather than failing, so a
/// host always gets a status line back. The working directory, home
/// directory and host name default to those of the current process.
pub fn render_from_json(bar: &mut StatusBar, json: &str, width: usize) -> Layout {
    let input = StatusInput::parse_lenient(json);
    let ctx = input
        .apply(bar.context_builder())
        .width(width)
        .with_environment()
        .build();
    bar.render(&ctx, width).clone()
}
