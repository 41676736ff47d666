//! Segment catalog and renderers.
//!
//! Every segment is a pure function of the [`SegmentContext`]. A segment with
//! nothing to say renders hidden instead of printing placeholder text, and no
//! renderer can fail.

use crate::colors::SemanticColor;
use crate::context::{SegmentContext, ThinkingLevel};
use crate::icons::{with_icon, SEP_DOT};
use crate::presets::{PathMode, TimeFormat};
use crate::utils::{basename, display_path, format_duration, format_tokens, truncate_start};
use crate::width::{sanitize_for_terminal, sanitize_keep_sgr, strip_ansi};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentId {
    Pi,
    Model,
    Path,
    Git,
    Subagents,
    TokenIn,
    TokenOut,
    TokenTotal,
    Cost,
    ContextPct,
    ContextTotal,
    TimeSpent,
    Time,
    Session,
    Hostname,
    CacheRead,
    CacheWrite,
    Thinking,
    ExtensionStatuses,
}

impl SegmentId {
    pub const ALL: [SegmentId; 19] = [
        SegmentId::Pi,
        SegmentId::Model,
        SegmentId::Path,
        SegmentId::Git,
        SegmentId::Subagents,
        SegmentId::TokenIn,
        SegmentId::TokenOut,
        SegmentId::TokenTotal,
        SegmentId::Cost,
        SegmentId::ContextPct,
        SegmentId::ContextTotal,
        SegmentId::TimeSpent,
        SegmentId::Time,
        SegmentId::Session,
        SegmentId::Hostname,
        SegmentId::CacheRead,
        SegmentId::CacheWrite,
        SegmentId::Thinking,
        SegmentId::ExtensionStatuses,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentId::Pi => "pi",
            SegmentId::Model => "model",
            SegmentId::Path => "path",
            SegmentId::Git => "git",
            SegmentId::Subagents => "subagents",
            SegmentId::TokenIn => "token_in",
            SegmentId::TokenOut => "token_out",
            SegmentId::TokenTotal => "token_total",
            SegmentId::Cost => "cost",
            SegmentId::ContextPct => "context_pct",
            SegmentId::ContextTotal => "context_total",
            SegmentId::TimeSpent => "time_spent",
            SegmentId::Time => "time",
            SegmentId::Session => "session",
            SegmentId::Hostname => "hostname",
            SegmentId::CacheRead => "cache_read",
            SegmentId::CacheWrite => "cache_write",
            SegmentId::Thinking => "thinking",
            SegmentId::ExtensionStatuses => "extension_statuses",
        }
    }

    /// One-line summary for `powerbar segments`
    pub fn description(self) -> &'static str {
        match self {
            SegmentId::Pi => "Agent icon",
            SegmentId::Model => "Model name, optionally with thinking level",
            SegmentId::Path => "Working directory",
            SegmentId::Git => "Branch and staged/unstaged/untracked counts",
            SegmentId::Subagents => "Running subagents (not tracked yet)",
            SegmentId::TokenIn => "Input tokens",
            SegmentId::TokenOut => "Output tokens",
            SegmentId::TokenTotal => "All tokens including cache",
            SegmentId::Cost => "Session cost, or (sub) on a subscription",
            SegmentId::ContextPct => "Context window usage",
            SegmentId::ContextTotal => "Context window size",
            SegmentId::TimeSpent => "Session duration",
            SegmentId::Time => "Clock",
            SegmentId::Session => "Session id prefix",
            SegmentId::Hostname => "Host name",
            SegmentId::CacheRead => "Cache-read tokens",
            SegmentId::CacheWrite => "Cache-write tokens",
            SegmentId::Thinking => "Thinking level",
            SegmentId::ExtensionStatuses => "Statuses reported by extensions",
        }
    }
}

impl FromStr for SegmentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SegmentId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unknown segment '{}'", s))
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one segment renderer.
///
/// Hidden segments carry no content and visible ones always carry some.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSegment {
    content: String,
    visible: bool,
}

impl RenderedSegment {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// A visible segment; empty content collapses to [`RenderedSegment::hidden`].
    pub fn shown(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.is_empty() {
            return Self::hidden();
        }
        Self {
            content,
            visible: true,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

/// Renders one segment against the context.
pub fn render_segment(id: SegmentId, ctx: &SegmentContext) -> RenderedSegment {
    match id {
        SegmentId::Pi => pi(ctx),
        SegmentId::Model => model(ctx),
        SegmentId::Path => path(ctx),
        SegmentId::Git => git(ctx),
        SegmentId::Subagents => RenderedSegment::hidden(),
        SegmentId::TokenIn => token_in(ctx),
        SegmentId::TokenOut => token_out(ctx),
        SegmentId::TokenTotal => token_total(ctx),
        SegmentId::Cost => cost(ctx),
        SegmentId::ContextPct => context_pct(ctx),
        SegmentId::ContextTotal => context_total(ctx),
        SegmentId::TimeSpent => time_spent(ctx),
        SegmentId::Time => time(ctx),
        SegmentId::Session => session(ctx),
        SegmentId::Hostname => hostname(ctx),
        SegmentId::CacheRead => cache_read(ctx),
        SegmentId::CacheWrite => cache_write(ctx),
        SegmentId::Thinking => thinking(ctx),
        SegmentId::ExtensionStatuses => extension_statuses(ctx),
    }
}

/// Renders a segment named by config text. Unknown names render hidden.
pub fn render_segment_named(name: &str, ctx: &SegmentContext) -> RenderedSegment {
    match name.parse::<SegmentId>() {
        Ok(id) => render_segment(id, ctx),
        Err(_) => RenderedSegment::hidden(),
    }
}

fn pi(ctx: &SegmentContext) -> RenderedSegment {
    if ctx.icons.pi.is_empty() {
        return RenderedSegment::hidden();
    }
    RenderedSegment::shown(ctx.colors.fg(SemanticColor::Pi, ctx.icons.pi))
}

fn model(ctx: &SegmentContext) -> RenderedSegment {
    let Some(model) = ctx.model.as_ref() else {
        return RenderedSegment::hidden();
    };
    let raw = if model.name.is_empty() { &model.id } else { &model.name };
    let name = sanitize_for_terminal(raw);
    let name = name.strip_prefix("Claude ").unwrap_or(&name);
    if name.is_empty() {
        return RenderedSegment::hidden();
    }

    let mut content = with_icon(ctx.icons.model, name);
    if ctx.options.model.show_thinking_level
        && model.reasoning
        && ctx.thinking_level != ThinkingLevel::Off
    {
        content.push_str(SEP_DOT);
        content.push_str(ctx.thinking_level.label());
    }
    RenderedSegment::shown(ctx.colors.fg(SemanticColor::Model, &content))
}

fn path(ctx: &SegmentContext) -> RenderedSegment {
    if ctx.cwd.is_empty() {
        return RenderedSegment::hidden();
    }
    let home = ctx.home.as_deref();
    let opts = &ctx.options.path;
    let shown = match opts.mode {
        PathMode::Basename => basename(&ctx.cwd),
        PathMode::Full => display_path(&ctx.cwd, home),
        PathMode::Abbreviated => truncate_start(&display_path(&ctx.cwd, home), opts.max_length),
    };
    let content = with_icon(ctx.icons.folder, &sanitize_for_terminal(&shown));
    RenderedSegment::shown(ctx.colors.fg(SemanticColor::Path, &content))
}

fn git(ctx: &SegmentContext) -> RenderedSegment {
    let status = &ctx.git;
    let opts = &ctx.options.git;
    let branch = status
        .branch
        .as_deref()
        .map(sanitize_for_terminal)
        .filter(|b| !b.is_empty());

    if branch.is_none() && !status.is_dirty() {
        return RenderedSegment::hidden();
    }

    let mut content = String::new();
    if opts.show_branch {
        if let Some(branch) = &branch {
            content = with_icon(ctx.icons.branch, branch);
        }
    }

    let mut indicators = Vec::new();
    if opts.show_unstaged && status.unstaged > 0 {
        indicators.push(ctx.colors.fg(SemanticColor::Unstaged, &format!("*{}", status.unstaged)));
    }
    if opts.show_staged && status.staged > 0 {
        indicators.push(ctx.colors.fg(SemanticColor::Staged, &format!("+{}", status.staged)));
    }
    if opts.show_untracked && status.untracked > 0 {
        indicators.push(ctx.colors.fg(SemanticColor::Untracked, &format!("?{}", status.untracked)));
    }
    if !indicators.is_empty() {
        let indicators = indicators.join(" ");
        if content.is_empty() && !opts.show_branch {
            content = with_icon(ctx.icons.git, &indicators);
        } else if content.is_empty() {
            content = indicators;
        } else {
            content.push(' ');
            content.push_str(&indicators);
        }
    }

    if content.is_empty() {
        return RenderedSegment::hidden();
    }
    let role = if status.is_dirty() {
        SemanticColor::GitDirty
    } else {
        SemanticColor::GitClean
    };
    RenderedSegment::shown(ctx.colors.fg(role, &content))
}

fn thinking(ctx: &SegmentContext) -> RenderedSegment {
    let level = ctx.thinking_level;
    let text = format!("think:{}", level.label());
    let content = match level {
        ThinkingLevel::High | ThinkingLevel::XHigh => ctx.colors.rainbow(&text),
        ThinkingLevel::Off => ctx.colors.fg(SemanticColor::Thinking, &text),
        ThinkingLevel::Minimal => ctx.colors.fg(SemanticColor::ThinkingMinimal, &text),
        ThinkingLevel::Low => ctx.colors.fg(SemanticColor::ThinkingLow, &text),
        ThinkingLevel::Medium => ctx.colors.fg(SemanticColor::ThinkingMedium, &text),
    };
    RenderedSegment::shown(content)
}

fn token_in(ctx: &SegmentContext) -> RenderedSegment {
    token_count(ctx, ctx.usage.input, ctx.icons.input, SemanticColor::Tokens)
}

fn token_out(ctx: &SegmentContext) -> RenderedSegment {
    token_count(ctx, ctx.usage.output, ctx.icons.output, SemanticColor::Output)
}

fn token_total(ctx: &SegmentContext) -> RenderedSegment {
    token_count(ctx, ctx.usage.total_tokens(), ctx.icons.tokens, SemanticColor::Tokens)
}

fn token_count(ctx: &SegmentContext, count: u64, icon: &str, role: SemanticColor) -> RenderedSegment {
    if count == 0 {
        return RenderedSegment::hidden();
    }
    RenderedSegment::shown(ctx.colors.fg(role, &with_icon(icon, &format_tokens(count))))
}

fn cache_read(ctx: &SegmentContext) -> RenderedSegment {
    cache_count(ctx, ctx.usage.cache_read, ctx.icons.input, SemanticColor::Tokens)
}

fn cache_write(ctx: &SegmentContext) -> RenderedSegment {
    cache_count(ctx, ctx.usage.cache_write, ctx.icons.output, SemanticColor::Output)
}

fn cache_count(ctx: &SegmentContext, count: u64, direction: &str, role: SemanticColor) -> RenderedSegment {
    if count == 0 {
        return RenderedSegment::hidden();
    }
    let formatted = format_tokens(count);
    let parts: Vec<&str> = [ctx.icons.cache, direction, formatted.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    RenderedSegment::shown(ctx.colors.fg(role, &parts.join(" ")))
}

fn cost(ctx: &SegmentContext) -> RenderedSegment {
    let cost = ctx.usage.cost;
    let has_cost = cost.is_finite() && cost > 0.0;
    if !has_cost && !ctx.using_subscription {
        return RenderedSegment::hidden();
    }
    let text = if ctx.using_subscription {
        "(sub)".to_string()
    } else {
        format!("${:.2}", cost)
    };
    RenderedSegment::shown(ctx.colors.fg(SemanticColor::Cost, &text))
}

fn context_pct(ctx: &SegmentContext) -> RenderedSegment {
    if ctx.context_window == 0 {
        return RenderedSegment::hidden();
    }
    let pct = ctx.context_percent;
    let mut text = format!("{:.1}%/{}", pct, format_tokens(ctx.context_window));
    if ctx.auto_compact && !ctx.icons.auto.is_empty() {
        text.push(' ');
        text.push_str(ctx.icons.auto);
    }

    let role = if pct > 90.0 {
        SemanticColor::ContextError
    } else if pct > 70.0 {
        SemanticColor::ContextWarn
    } else {
        SemanticColor::Context
    };
    // The icon stays uncolored; only the figures take the threshold color
    RenderedSegment::shown(with_icon(ctx.icons.context, &ctx.colors.fg(role, &text)))
}

fn context_total(ctx: &SegmentContext) -> RenderedSegment {
    if ctx.context_window == 0 {
        return RenderedSegment::hidden();
    }
    let content = with_icon(ctx.icons.context, &format_tokens(ctx.context_window));
    RenderedSegment::shown(ctx.colors.fg(SemanticColor::Context, &content))
}

fn time_spent(ctx: &SegmentContext) -> RenderedSegment {
    let Some(start) = ctx.session_start else {
        return RenderedSegment::hidden();
    };
    let elapsed_ms = (ctx.now - start).num_milliseconds();
    if elapsed_ms < 1000 {
        return RenderedSegment::hidden();
    }
    RenderedSegment::shown(with_icon(ctx.icons.time, &format_duration(elapsed_ms as u64)))
}

fn time(ctx: &SegmentContext) -> RenderedSegment {
    let opts = &ctx.options.time;
    let now = ctx.now;

    let (hour, suffix) = match opts.format {
        TimeFormat::TwentyFourHour => (now.hour(), ""),
        TimeFormat::TwelveHour => {
            let (pm, hour) = now.hour12();
            (hour, if pm { "pm" } else { "am" })
        }
    };
    let mut text = format!("{}:{:02}", hour, now.minute());
    if opts.show_seconds {
        text.push_str(&format!(":{:02}", now.second()));
    }
    text.push_str(suffix);
    RenderedSegment::shown(with_icon(ctx.icons.time, &text))
}

fn session(ctx: &SegmentContext) -> RenderedSegment {
    let Some(id) = ctx.session_id.as_deref() else {
        return RenderedSegment::hidden();
    };
    let short: String = sanitize_for_terminal(id).chars().take(8).collect();
    if short.is_empty() {
        return RenderedSegment::hidden();
    }
    RenderedSegment::shown(with_icon(ctx.icons.session, &short))
}

fn hostname(ctx: &SegmentContext) -> RenderedSegment {
    let Some(host) = ctx.hostname.as_deref() else {
        return RenderedSegment::hidden();
    };
    let host = sanitize_for_terminal(host);
    let short = host.split('.').next().unwrap_or_default();
    if short.is_empty() {
        return RenderedSegment::hidden();
    }
    RenderedSegment::shown(with_icon(ctx.icons.host, short))
}

fn extension_statuses(ctx: &SegmentContext) -> RenderedSegment {
    // Extensions style their own text; only SGR sequences may pass through
    let parts: Vec<String> = ctx
        .extension_statuses
        .iter()
        .map(|(_, text)| sanitize_keep_sgr(text))
        .filter(|text| !strip_ansi(text).is_empty())
        .collect();
    RenderedSegment::shown(parts.join(SEP_DOT))
}
