//! Responsive two-row layout.
//!
//! Candidates are packed greedily, in preset order, into the primary row.
//! The first candidate that doesn't fit starts the overflow, and everything
//! after it overflows too, even if a later, narrower segment would have fit.
//! The overflow is packed the same way into the secondary row and whatever
//! is left over after that is dropped.

use crate::colors::{SemanticColor, RESET};
use crate::context::SegmentContext;
use crate::presets::Preset;
use crate::segments::render_segment;
use crate::width::visible_width;

/// Columns taken by the leading and trailing space of a row
pub const LAYOUT_BASE_OVERHEAD: usize = 2;

/// Rendered rows, ready to print. An empty row is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub top_content: String,
    pub secondary_content: String,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.top_content.is_empty() && self.secondary_content.is_empty()
    }
}

/// Lays out `preset` for a terminal `available_width` columns wide.
///
/// Segments render with the preset's own segment options and color scheme,
/// whatever the context was built with. Both rows are guaranteed to fit in
/// `available_width` visible columns.
pub fn compute_layout(ctx: &SegmentContext, preset: &Preset, available_width: usize) -> Layout {
    let mut scoped = ctx.clone();
    scoped.options = preset.options.clone();
    scoped.colors = ctx.colors.clone().with_preset_colors(preset.colors.clone());
    let ctx = &scoped;

    let candidates: Vec<(String, usize)> = preset
        .candidates()
        .map(|id| render_segment(id, ctx))
        .filter(|segment| segment.is_visible())
        .map(|segment| {
            let content = segment.into_content();
            let width = visible_width(&content);
            (content, width)
        })
        .collect();

    let glyph = preset.separator.def().left;
    let separator_width = visible_width(glyph) + 2;

    let (top, overflow) = fit_row(candidates, separator_width, available_width);
    let (secondary, dropped) = fit_row(overflow, separator_width, available_width);
    if !dropped.is_empty() {
        log::debug!(
            "{} segment(s) did not fit in {} columns",
            dropped.len(),
            available_width
        );
    }

    let separator = ctx.colors.fg(SemanticColor::Separator, glyph);
    let reset = ctx.colors.is_enabled();
    Layout {
        top_content: join_row(&top, &separator, reset),
        secondary_content: join_row(&secondary, &separator, reset),
    }
}

/// Greedy, order-preserving fit. Returns the row and the overflow.
fn fit_row<T>(
    items: Vec<(T, usize)>,
    separator_width: usize,
    available_width: usize,
) -> (Vec<T>, Vec<(T, usize)>) {
    let mut row = Vec::new();
    let mut overflow = Vec::new();
    let mut used = LAYOUT_BASE_OVERHEAD;

    for (item, width) in items {
        if !overflow.is_empty() {
            overflow.push((item, width));
            continue;
        }
        let needed = if row.is_empty() { width } else { width + separator_width };
        if used + needed <= available_width {
            used += needed;
            row.push(item);
        } else {
            overflow.push((item, width));
        }
    }

    (row, overflow)
}

fn join_row(parts: &[String], separator: &str, reset: bool) -> String {
    if parts.is_empty() {
        return String::new();
    }
    let joined = parts.join(&format!(" {} ", separator));
    if reset {
        format!(" {}{} ", joined, RESET)
    } else {
        format!(" {} ", joined)
    }
}
