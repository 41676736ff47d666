//! JSON status snapshot read by the `powerbar` binary.
//!
//! Hosts pipe one object per render. Every field is optional:
//!
//! ```json
//! {
//!   "model": {"id": "claude-sonnet-4", "name": "Claude Sonnet 4",
//!             "reasoning": true, "context_window": 200000},
//!   "thinking_level": "medium",
//!   "session_id": "5f2c9e10-...",
//!   "usage": {"input": 12000, "output": 3400, "cost": 0.87},
//!   "last_turn": {"input": 45000, "output": 1200},
//!   "git": {"branch": "main", "staged": 1, "unstaged": 2},
//!   "extension_statuses": [{"key": "ci", "text": "green"}],
//!   "cwd": "/home/me/project",
//!   "session_start": "2025-06-01T09:30:00Z"
//! }
//! ```
//!
//! Instead of `usage`/`last_turn` a host may send the raw session history as
//! `events`; totals, the last turn and the thinking level are then folded
//! from it.

use crate::context::{
    ContextBuilder, GitStatus, GitStatusProvider, ModelInfo, ThinkingLevel, UsageStats,
};
use crate::usage::{SessionEvent, UsageSnapshot};
use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

/// Input structure read from stdin.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusInput {
    pub model: Option<ModelInfo>,
    pub thinking_level: Option<ThinkingLevel>,
    pub session_id: Option<String>,
    pub usage: Option<UsageStats>,
    pub last_turn: Option<UsageStats>,
    /// Raw session history; takes precedence over `usage`/`last_turn`
    pub events: Vec<SessionEvent>,
    pub git: Option<GitStatus>,
    pub extension_statuses: Vec<ExtensionStatus>,
    /// Working directory (falls back to the process's own)
    #[serde(alias = "current_dir")]
    pub cwd: Option<String>,
    pub session_start: Option<DateTime<Utc>>,
    pub auto_compact: Option<bool>,
    pub using_subscription: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionStatus {
    pub key: String,
    pub text: String,
}

impl StatusInput {
    /// Parses input, falling back to an empty snapshot on malformed JSON.
    pub fn parse_lenient(json: &str) -> Self {
        if json.trim().is_empty() {
            return StatusInput::default();
        }
        match serde_json::from_str(json) {
            Ok(input) => input,
            Err(e) => {
                log::warn!("Failed to parse JSON input: {}. Using defaults.", e);
                StatusInput::default()
            }
        }
    }

    /// Usage totals, last turn and recorded thinking level for this render.
    pub fn usage_snapshot(&self) -> UsageSnapshot {
        if self.events.is_empty() {
            UsageSnapshot {
                usage: self.usage.unwrap_or_default(),
                last_turn: self.last_turn,
                thinking_level: None,
            }
        } else {
            UsageSnapshot::from_events(&self.events)
        }
    }

    /// Feeds this snapshot into a context builder.
    pub fn apply(&self, mut builder: ContextBuilder) -> ContextBuilder {
        if let Some(model) = &self.model {
            builder = builder.model(model.clone());
        }
        if let Some(level) = self.thinking_level {
            builder = builder.thinking_level(level);
        }
        if let Some(id) = &self.session_id {
            builder = builder.session_id(id.clone());
        }
        if let Some(cwd) = &self.cwd {
            builder = builder.cwd(cwd.clone());
        }
        if let Some(start) = self.session_start {
            builder = builder.session_start(start.with_timezone(&Local));
        }
        if let Some(auto) = self.auto_compact {
            builder = builder.auto_compact(auto);
        }
        for status in &self.extension_statuses {
            builder = builder.extension_status(status.key.clone(), status.text.clone());
        }
        let snapshot = self.usage_snapshot();
        builder
            .usage_from(&snapshot)
            .git_from(self)
            .using_subscription(self.using_subscription)
    }
}

impl GitStatusProvider for StatusInput {
    fn git_status(&self) -> GitStatus {
        self.git.clone().unwrap_or_default()
    }
}
