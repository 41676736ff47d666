//! The read-only context every segment renders from, and the builder that
//! assembles it from provider snapshots.

use crate::common;
use crate::icons::IconSet;
use crate::presets::SegmentOptions;
use crate::theme::ColorResolver;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cumulative token and cost counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageStats {
    pub input: u64,
    pub output: u64,
    pub cache_read: u64,
    pub cache_write: u64,
    /// Cost in USD
    pub cost: f64,
}

impl UsageStats {
    /// Sum of all token counters, saturating at `u64::MAX`.
    pub fn total_tokens(&self) -> u64 {
        self.input
            .saturating_add(self.output)
            .saturating_add(self.cache_read)
            .saturating_add(self.cache_write)
    }

    pub fn add(&mut self, other: &UsageStats) {
        self.input = self.input.saturating_add(other.input);
        self.output = self.output.saturating_add(other.output);
        self.cache_read = self.cache_read.saturating_add(other.cache_read);
        self.cache_write = self.cache_write.saturating_add(other.cache_write);
        self.cost += other.cost;
    }
}

/// Pre-computed repository state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitStatus {
    pub branch: Option<String>,
    pub staged: u32,
    pub unstaged: u32,
    pub untracked: u32,
}

impl GitStatus {
    pub fn is_dirty(&self) -> bool {
        self.staged > 0 || self.unstaged > 0 || self.untracked > 0
    }
}

/// The model currently in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub id: String,
    /// Display name, e.g. "Claude Sonnet 4"
    pub name: String,
    /// Whether the model supports extended thinking
    pub reasoning: bool,
    /// Context window in tokens; 0 when unknown
    pub context_window: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingLevel {
    #[default]
    Off,
    Minimal,
    Low,
    Medium,
    High,
    #[serde(rename = "xhigh")]
    XHigh,
}

impl ThinkingLevel {
    pub const ALL: [ThinkingLevel; 6] = [
        ThinkingLevel::Off,
        ThinkingLevel::Minimal,
        ThinkingLevel::Low,
        ThinkingLevel::Medium,
        ThinkingLevel::High,
        ThinkingLevel::XHigh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThinkingLevel::Off => "off",
            ThinkingLevel::Minimal => "minimal",
            ThinkingLevel::Low => "low",
            ThinkingLevel::Medium => "medium",
            ThinkingLevel::High => "high",
            ThinkingLevel::XHigh => "xhigh",
        }
    }

    /// Short label shown by the thinking segment
    pub fn label(self) -> &'static str {
        match self {
            ThinkingLevel::Off => "off",
            ThinkingLevel::Minimal => "min",
            ThinkingLevel::Low => "low",
            ThinkingLevel::Medium => "med",
            ThinkingLevel::High => "high",
            ThinkingLevel::XHigh => "xhigh",
        }
    }
}

impl FromStr for ThinkingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThinkingLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("Unknown thinking level '{}'", s))
    }
}

impl fmt::Display for ThinkingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Provider seams =====

/// Aggregated usage for the current session.
pub trait SessionUsageProvider {
    /// Totals across all counted turns
    fn usage(&self) -> UsageStats;

    /// Token counts of the most recent counted turn
    fn last_turn(&self) -> Option<UsageStats>;

    /// Thinking level recorded by the session, if any
    fn thinking_level(&self) -> Option<ThinkingLevel> {
        None
    }
}

pub trait GitStatusProvider {
    fn git_status(&self) -> GitStatus;
}

impl GitStatusProvider for GitStatus {
    fn git_status(&self) -> GitStatus {
        self.clone()
    }
}

/// Share of the context window filled by the last turn, in percent.
///
/// Zero when there is no turn yet or the window is unknown.
pub fn context_percent(last_turn: Option<&UsageStats>, context_window: u64) -> f64 {
    match last_turn {
        Some(turn) if context_window > 0 => {
            turn.total_tokens() as f64 / context_window as f64 * 100.0
        }
        _ => 0.0,
    }
}

// ===== Segment context =====

/// Everything a segment may read while rendering. Never mutated by segments.
#[derive(Debug, Clone)]
pub struct SegmentContext {
    pub model: Option<ModelInfo>,
    pub thinking_level: ThinkingLevel,
    pub session_id: Option<String>,
    pub usage: UsageStats,
    pub context_percent: f64,
    pub context_window: u64,
    pub auto_compact: bool,
    pub using_subscription: bool,
    pub session_start: Option<DateTime<Local>>,
    /// Render timestamp; time segments read this instead of the clock
    pub now: DateTime<Local>,
    pub git: GitStatus,
    /// `(key, text)` pairs in insertion order; texts arrive pre-styled
    pub extension_statuses: Vec<(String, String)>,
    pub cwd: String,
    pub home: Option<String>,
    pub hostname: Option<String>,
    pub icons: IconSet,
    pub colors: ColorResolver,
    pub options: SegmentOptions,
    pub width: usize,
}

impl Default for SegmentContext {
    fn default() -> Self {
        Self {
            model: None,
            thinking_level: ThinkingLevel::Off,
            session_id: None,
            usage: UsageStats::default(),
            context_percent: 0.0,
            context_window: 0,
            auto_compact: true,
            using_subscription: false,
            session_start: None,
            now: Local::now(),
            git: GitStatus::default(),
            extension_statuses: Vec::new(),
            cwd: String::new(),
            home: None,
            hostname: None,
            icons: IconSet::default(),
            colors: ColorResolver::default(),
            options: SegmentOptions::default(),
            width: 0,
        }
    }
}

/// Builder for [`SegmentContext`].
///
/// # Example
///
/// ```rust
/// use powerbar::context::{ContextBuilder, GitStatus, ModelInfo};
///
/// let ctx = ContextBuilder::new()
///     .model(ModelInfo {
///         name: "Claude Sonnet 4".into(),
///         context_window: 200_000,
///         ..ModelInfo::default()
///     })
///     .git(GitStatus { branch: Some("main".into()), ..GitStatus::default() })
///     .cwd("/home/me/project")
///     .build();
/// assert_eq!(ctx.context_window, 200_000);
/// ```
#[derive(Debug, Default)]
pub struct ContextBuilder {
    ctx: SegmentContext,
    last_turn: Option<UsageStats>,
    recorded_thinking: Option<ThinkingLevel>,
    fallback_thinking: Option<ThinkingLevel>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: ModelInfo) -> Self {
        self.ctx.context_window = model.context_window;
        self.ctx.model = Some(model);
        self
    }

    /// Level used when the usage provider has not recorded one.
    pub fn thinking_level(mut self, level: ThinkingLevel) -> Self {
        self.fallback_thinking = Some(level);
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.ctx.session_id = Some(id.into());
        self
    }

    pub fn usage(mut self, usage: UsageStats, last_turn: Option<UsageStats>) -> Self {
        self.ctx.usage = usage;
        self.last_turn = last_turn;
        self
    }

    pub fn usage_from(mut self, provider: &dyn SessionUsageProvider) -> Self {
        self.ctx.usage = provider.usage();
        self.last_turn = provider.last_turn();
        self.recorded_thinking = provider.thinking_level();
        self
    }

    pub fn git(mut self, git: GitStatus) -> Self {
        self.ctx.git = git;
        self
    }

    pub fn git_from(self, provider: &dyn GitStatusProvider) -> Self {
        self.git(provider.git_status())
    }

    /// Sets an extension status; a repeated key replaces the earlier text in place.
    pub fn extension_status(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        let key = key.into();
        let text = text.into();
        match self.ctx.extension_statuses.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = text,
            None => self.ctx.extension_statuses.push((key, text)),
        }
        self
    }

    pub fn auto_compact(mut self, enabled: bool) -> Self {
        self.ctx.auto_compact = enabled;
        self
    }

    pub fn using_subscription(mut self, subscribed: bool) -> Self {
        self.ctx.using_subscription = subscribed;
        self
    }

    pub fn session_start(mut self, start: DateTime<Local>) -> Self {
        self.ctx.session_start = Some(start);
        self
    }

    pub fn now(mut self, now: DateTime<Local>) -> Self {
        self.ctx.now = now;
        self
    }

    pub fn cwd(mut self, cwd: impl Into<String>) -> Self {
        self.ctx.cwd = cwd.into();
        self
    }

    pub fn home(mut self, home: Option<String>) -> Self {
        self.ctx.home = home;
        self
    }

    pub fn hostname(mut self, hostname: Option<String>) -> Self {
        self.ctx.hostname = hostname;
        self
    }

    pub fn icons(mut self, icons: IconSet) -> Self {
        self.ctx.icons = icons;
        self
    }

    pub fn colors(mut self, colors: ColorResolver) -> Self {
        self.ctx.colors = colors;
        self
    }

    pub fn options(mut self, options: SegmentOptions) -> Self {
        self.ctx.options = options;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.ctx.width = width;
        self
    }

    /// Fills the working directory, home directory and host name from the
    /// running process where they are still unset.
    pub fn with_environment(mut self) -> Self {
        if self.ctx.cwd.is_empty() {
            if let Some(cwd) = std::env::current_dir()
                .ok()
                .and_then(|p| p.to_str().map(|s| s.to_string()))
            {
                self.ctx.cwd = cwd;
            }
        }
        if self.ctx.home.is_none() {
            self.ctx.home = common::home_dir_string();
        }
        if self.ctx.hostname.is_none() {
            self.ctx.hostname = common::short_hostname();
        }
        self
    }

    pub fn build(self) -> SegmentContext {
        let mut ctx = self.ctx;
        ctx.thinking_level = self
            .recorded_thinking
            .or(self.fallback_thinking)
            .unwrap_or_default();
        ctx.context_percent = context_percent(self.last_turn.as_ref(), ctx.context_window);
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedUsage {
        level: Option<ThinkingLevel>,
    }

    impl SessionUsageProvider for FixedUsage {
        fn usage(&self) -> UsageStats {
            UsageStats {
                input: 10_000,
                output: 2_000,
                cost: 0.42,
                ..UsageStats::default()
            }
        }

        fn last_turn(&self) -> Option<UsageStats> {
            Some(UsageStats {
                input: 40_000,
                output: 5_000,
                cache_read: 5_000,
                ..UsageStats::default()
            })
        }

        fn thinking_level(&self) -> Option<ThinkingLevel> {
            self.level
        }
    }

    fn model(window: u64) -> ModelInfo {
        ModelInfo {
            id: "m".into(),
            name: "M".into(),
            reasoning: true,
            context_window: window,
        }
    }

    #[test]
    fn test_token_counters_saturate() {
        let huge = UsageStats {
            input: u64::MAX,
            output: 1,
            cache_read: 7,
            ..UsageStats::default()
        };
        assert_eq!(huge.total_tokens(), u64::MAX);

        let mut total = UsageStats {
            output: u64::MAX - 1,
            cost: 1.0,
            ..UsageStats::default()
        };
        total.add(&huge);
        total.add(&huge);
        assert_eq!(total.input, u64::MAX);
        assert_eq!(total.output, u64::MAX);
        assert_eq!(total.cache_read, 14);
        assert_eq!(total.cost, 1.0);

        let percent = context_percent(Some(&huge), 200_000);
        assert!(percent.is_finite());
        assert!(percent > 100.0);
    }

    #[test]
    fn test_context_percent() {
        let turn = UsageStats {
            input: 150_000,
            output: 30_000,
            ..UsageStats::default()
        };
        assert_eq!(context_percent(Some(&turn), 200_000), 90.0);
        assert_eq!(context_percent(Some(&turn), 0), 0.0);
        assert_eq!(context_percent(None, 200_000), 0.0);
    }

    #[test]
    fn test_builder_computes_percent_from_last_turn() {
        let ctx = ContextBuilder::new()
            .model(model(100_000))
            .usage_from(&FixedUsage { level: None })
            .build();
        assert_eq!(ctx.context_window, 100_000);
        assert_eq!(ctx.context_percent, 50.0);
        assert_eq!(ctx.usage.total_tokens(), 12_000);
    }

    #[test]
    fn test_recorded_thinking_level_wins() {
        let ctx = ContextBuilder::new()
            .thinking_level(ThinkingLevel::Low)
            .usage_from(&FixedUsage {
                level: Some(ThinkingLevel::High),
            })
            .build();
        assert_eq!(ctx.thinking_level, ThinkingLevel::High);

        let ctx = ContextBuilder::new()
            .thinking_level(ThinkingLevel::Low)
            .usage_from(&FixedUsage { level: None })
            .build();
        assert_eq!(ctx.thinking_level, ThinkingLevel::Low);

        assert_eq!(ContextBuilder::new().build().thinking_level, ThinkingLevel::Off);
    }

    #[test]
    fn test_extension_status_replaces_by_key() {
        let ctx = ContextBuilder::new()
            .extension_status("lint", "ok")
            .extension_status("tests", "3 failing")
            .extension_status("lint", "2 warnings")
            .build();
        assert_eq!(
            ctx.extension_statuses,
            vec![
                ("lint".to_string(), "2 warnings".to_string()),
                ("tests".to_string(), "3 failing".to_string()),
            ]
        );
    }

    #[test]
    fn test_git_provider() {
        let status = GitStatus {
            branch: Some("main".into()),
            staged: 1,
            ..GitStatus::default()
        };
        let ctx = ContextBuilder::new().git_from(&status).build();
        assert!(ctx.git.is_dirty());
        assert_eq!(ctx.git.branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_with_environment_keeps_explicit_values() {
        let ctx = ContextBuilder::new()
            .cwd("/somewhere")
            .home(Some("/home/x".into()))
            .with_environment()
            .build();
        assert_eq!(ctx.cwd, "/somewhere");
        assert_eq!(ctx.home.as_deref(), Some("/home/x"));
    }

    #[test]
    fn test_thinking_level_parse() {
        assert_eq!("xhigh".parse(), Ok(ThinkingLevel::XHigh));
        assert_eq!(ThinkingLevel::Medium.label(), "med");
        assert!("extreme".parse::<ThinkingLevel>().is_err());
        let level: ThinkingLevel = serde_json::from_str("\"minimal\"").unwrap();
        assert_eq!(level, ThinkingLevel::Minimal);
    }
}
