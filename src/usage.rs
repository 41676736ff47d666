//! Usage aggregation from a session event history.

use crate::context::{SessionUsageProvider, ThinkingLevel, UsageStats};
use crate::error::Result;
use log::debug;
use serde::Deserialize;

/// One entry of a session history. Only the event kinds that affect usage
/// are modelled; everything else deserializes to [`SessionEvent::Other`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Message {
        message: AgentMessage,
    },
    ThinkingLevelChange {
        #[serde(rename = "thinkingLevel", default)]
        thinking_level: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentMessage {
    pub role: String,
    pub stop_reason: Option<String>,
    pub usage: Option<MessageUsage>,
}

impl AgentMessage {
    /// Assistant turns that completed (not errored or aborted) are counted.
    fn is_counted(&self) -> bool {
        self.role == "assistant"
            && !matches!(self.stop_reason.as_deref(), Some("error") | Some("aborted"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageUsage {
    pub input: u64,
    pub output: u64,
    pub cache_read: u64,
    pub cache_write: u64,
    pub cost: Option<MessageCost>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageCost {
    pub total: f64,
}

impl From<&MessageUsage> for UsageStats {
    fn from(usage: &MessageUsage) -> Self {
        let cost = usage
            .cost
            .as_ref()
            .map(|c| c.total)
            .filter(|total| total.is_finite())
            .unwrap_or(0.0);
        UsageStats {
            input: usage.input,
            output: usage.output,
            cache_read: usage.cache_read,
            cache_write: usage.cache_write,
            cost,
        }
    }
}

/// Usage totals, last counted turn and thinking level folded from events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageSnapshot {
    pub usage: UsageStats,
    pub last_turn: Option<UsageStats>,
    pub thinking_level: Option<ThinkingLevel>,
}

impl UsageSnapshot {
    pub fn from_events(events: &[SessionEvent]) -> Self {
        let mut snapshot = UsageSnapshot::default();

        for event in events {
            match event {
                SessionEvent::ThinkingLevelChange {
                    thinking_level: Some(level),
                } => match level.parse::<ThinkingLevel>() {
                    Ok(level) => snapshot.thinking_level = Some(level),
                    Err(e) => debug!("{}; ignoring event", e),
                },
                SessionEvent::Message { message } if message.is_counted() => {
                    let turn = message
                        .usage
                        .as_ref()
                        .map(UsageStats::from)
                        .unwrap_or_default();
                    snapshot.usage.add(&turn);
                    snapshot.last_turn = Some(turn);
                }
                _ => {}
            }
        }

        snapshot
    }

    /// Parses a JSON array of events and folds it.
    pub fn from_json(json: &str) -> Result<Self> {
        let events: Vec<SessionEvent> = serde_json::from_str(json)?;
        Ok(Self::from_events(&events))
    }
}

impl SessionUsageProvider for UsageSnapshot {
    fn usage(&self) -> UsageStats {
        self.usage
    }

    fn last_turn(&self) -> Option<UsageStats> {
        self.last_turn
    }

    fn thinking_level(&self) -> Option<ThinkingLevel> {
        self.thinking_level
    }
}
