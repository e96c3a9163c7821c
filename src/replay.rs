//! Replay of a topic message log into materialized state.

use crate::error::Result;
use crate::state;
use crate::types::{FieldName, Record, StateDigest, TopicAction};
use serde::{Deserialize, Serialize};
use tracing::{debug, enabled, trace, Level};

/// Replay configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Field identifying the entity a message refers to.
    pub primary_key: FieldName,

    /// Field carrying the `created` / `updated` / `deleted` tag.
    pub action_key: FieldName,
}

impl ReplayConfig {
    /// Build a config from raw field names, validating both.
    pub fn new(primary_key: impl Into<String>, action_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            primary_key: FieldName::new(primary_key)?,
            action_key: FieldName::new(action_key)?,
        })
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            primary_key: FieldName(String::from("id")),
            action_key: FieldName(String::from("topicAction")),
        }
    }
}

/// Counts of dispatched messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
    /// Messages without a recognised action tag.
    pub ignored: u64,
}

impl ReplayStats {
    pub fn total(&self) -> u64 {
        self.created + self.updated + self.deleted + self.ignored
    }

    fn record(&mut self, action: Option<TopicAction>) {
        match action {
            Some(TopicAction::Created) => self.created += 1,
            Some(TopicAction::Updated) => self.updated += 1,
            Some(TopicAction::Deleted) => self.deleted += 1,
            None => self.ignored += 1,
        }
    }
}

/// Incrementally folded topic state.
///
/// Each applied message is dispatched on its action tag to
/// [`create`](state::create), [`update`](state::update) or
/// [`remove`](state::remove); later messages win over earlier ones for the
/// same primary key.
#[derive(Clone, Debug, Default)]
pub struct TopicState {
    config: ReplayConfig,
    records: Vec<Record>,
    stats: ReplayStats,
}

impl TopicState {
    /// Start from an empty state.
    pub fn new(config: ReplayConfig) -> Self {
        Self::from_snapshot(config, Vec::new())
    }

    /// Resume from a previously materialized state.
    pub fn from_snapshot(config: ReplayConfig, records: Vec<Record>) -> Self {
        Self {
            config,
            records,
            stats: ReplayStats::default(),
        }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Apply one message. Returns the action taken, or `None` if the message
    /// carried no recognised action tag.
    pub fn apply(&mut self, message: Record) -> Option<TopicAction> {
        let action = TopicAction::of(&message, &self.config.action_key);
        let pk = &self.config.primary_key;

        match action {
            Some(TopicAction::Created) => {
                let records = std::mem::take(&mut self.records);
                self.records = state::create(records, message);
            }
            Some(TopicAction::Updated) | Some(TopicAction::Deleted) => {
                if enabled!(Level::TRACE) && state::is_creatable(&message, &self.records, pk) {
                    trace!(key = ?pk.value_in(&message), ?action, "no state element matched");
                }
                let records = std::mem::take(&mut self.records);
                self.records = if action == Some(TopicAction::Updated) {
                    state::update(records, &message, pk)
                } else {
                    state::remove(records, &message, pk)
                };
            }
            None => {
                trace!(
                    tag = ?message.get(self.config.action_key.as_str()),
                    "ignoring message without a known action"
                );
            }
        }

        self.stats.record(action);
        action
    }

    /// Apply a sequence of messages in order.
    pub fn apply_all<I>(&mut self, messages: I)
    where
        I: IntoIterator<Item = Record>,
    {
        for message in messages {
            self.apply(message);
        }
    }

    /// Whether `record` could be created against the current state.
    pub fn can_create(&self, record: &Record) -> bool {
        state::is_creatable(record, &self.records, &self.config.primary_key)
    }

    /// Whether `record` refers to an element of the current state.
    pub fn can_update(&self, record: &Record) -> bool {
        state::is_updatable(record, &self.records, &self.config.primary_key)
    }

    /// Whether `record` refers to an element of the current state.
    pub fn can_remove(&self, record: &Record) -> bool {
        state::is_removable(record, &self.records, &self.config.primary_key)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Fingerprint of the current state.
    pub fn digest(&self) -> Result<StateDigest> {
        StateDigest::of(&self.records)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Fold `messages` into a fresh state.
///
/// Messages are processed once, in order, starting from an empty state.
pub fn build_topic_state<I>(
    messages: I,
    primary_key: &FieldName,
    action_key: &FieldName,
) -> Vec<Record>
where
    I: IntoIterator<Item = Record>,
{
    let mut topic = TopicState::new(ReplayConfig {
        primary_key: primary_key.clone(),
        action_key: action_key.clone(),
    });
    topic.apply_all(messages);

    let stats = topic.stats();
    debug!(
        messages = stats.total(),
        records = topic.len(),
        created = stats.created,
        updated = stats.updated,
        deleted = stats.deleted,
        ignored = stats.ignored,
        "replayed topic"
    );

    topic.into_records()
}
