//! Core types for topic state replay.

use crate::error::{ReplayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A single topic message or state element.
///
/// Records are open-ended: only the primary-key and action-tag fields are
/// interpreted, everything else is carried through untouched.
pub type Record = serde_json::Map<String, Value>;

/// Name of a record field used as a primary key or action tag.
///
/// Always non-empty and free of whitespace and control characters.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(pub(crate) String);

impl FieldName {
    /// Validate and wrap a field name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ReplayError::invalid("field name", "must not be empty"));
        }
        if let Some(c) = name.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(ReplayError::invalid(
                "field name",
                format!("{:?} contains invalid character {:?}", name, c),
            ));
        }
        Ok(FieldName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value this field holds in `record`, if present.
    pub fn value_in<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        record.get(&self.0)
    }

    /// Whether `a` and `b` agree on this field.
    ///
    /// Two records that both lack the field match, as do two that both hold
    /// `null`. A missing field never matches an explicit `null`.
    pub fn matches(&self, a: &Record, b: &Record) -> bool {
        self.value_in(a) == self.value_in(b)
    }
}

impl fmt::Debug for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldName({})", self.0)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldName {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self> {
        FieldName::new(s)
    }
}

impl TryFrom<String> for FieldName {
    type Error = ReplayError;

    fn try_from(s: String) -> Result<Self> {
        FieldName::new(s)
    }
}

impl TryFrom<&str> for FieldName {
    type Error = ReplayError;

    fn try_from(s: &str) -> Result<Self> {
        FieldName::new(s)
    }
}

impl From<FieldName> for String {
    fn from(name: FieldName) -> Self {
        name.0
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Action carried by a topic message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicAction {
    Created,
    Updated,
    Deleted,
}

impl TopicAction {
    /// Parse an action tag. Anything but the three known strings is `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "created" => Some(TopicAction::Created),
            "updated" => Some(TopicAction::Updated),
            "deleted" => Some(TopicAction::Deleted),
            _ => None,
        }
    }

    /// Read the action of `message` from the `action_key` field.
    pub fn of(message: &Record, action_key: &FieldName) -> Option<Self> {
        message
            .get(action_key.as_str())
            .and_then(Value::as_str)
            .and_then(Self::from_tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicAction::Created => "created",
            TopicAction::Updated => "updated",
            TopicAction::Deleted => "deleted",
        }
    }
}

impl fmt::Display for TopicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload encoding of a message log or state snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PayloadEncoding {
    #[default]
    Json,
    MessagePack,
}

/// SHA-256 fingerprint of a state snapshot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateDigest(pub [u8; 32]);

impl StateDigest {
    /// Digest the canonical JSON encoding of `records`.
    ///
    /// Object keys are sorted at every depth before encoding, so equal states
    /// digest equally whatever order their fields were inserted in.
    pub fn of(records: &[Record]) -> Result<Self> {
        let canonical: Vec<Value> = records
            .iter()
            .map(|record| canonical(&Value::Object(record.clone())))
            .collect();
        let bytes = serde_json::to_vec(&canonical)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(StateDigest(hasher.finalize().into()))
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(StateDigest(arr))
    }
}

fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonical(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

impl fmt::Debug for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateDigest({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
