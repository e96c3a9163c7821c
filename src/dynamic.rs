//! Replay operations over untyped JSON values.
//!
//! Hosts that receive loosely-typed payloads can call these instead of the
//! typed functions. Every argument is shape-checked before anything runs; a
//! missing argument is `Value::Null`. Failures are always
//! [`ReplayError::InvalidArgument`].
//!
//! ```ignore
//! use serde_json::json;
//! use topic_state::dynamic;
//!
//! let state = dynamic::build_topic_state(
//!     &json!([{"id": "A", "action": "created"}]),
//!     &json!("id"),
//!     &json!("action"),
//! )?;
//! ```

use crate::error::{ReplayError, Result};
use crate::replay;
use crate::state;
use crate::types::{FieldName, Record};
use serde_json::Value;
use tracing::debug;

fn reject(argument: &'static str, reason: impl Into<String>) -> ReplayError {
    let err = ReplayError::invalid(argument, reason);
    debug!(error = %err, "rejected argument");
    err
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn field_name_arg(value: &Value, argument: &'static str) -> Result<FieldName> {
    match value {
        Value::Null => Err(reject(argument, "is required")),
        Value::String(name) => FieldName::new(name.as_str()).map_err(|e| match e {
            ReplayError::InvalidArgument { reason, .. } => reject(argument, reason),
            other => other,
        }),
        other => Err(reject(argument, format!("must be a string, got {}", kind(other)))),
    }
}

fn record_arg<'a>(value: &'a Value, argument: &'static str) -> Result<&'a Record> {
    match value {
        Value::Null => Err(reject(argument, "is required")),
        Value::Object(record) => Ok(record),
        other => Err(reject(argument, format!("must be an object, got {}", kind(other)))),
    }
}

fn records_arg<'a>(value: &'a Value, argument: &'static str) -> Result<Vec<&'a Record>> {
    let items = match value {
        Value::Null => return Err(reject(argument, "is required")),
        Value::Array(items) => items,
        other => {
            return Err(reject(argument, format!("must be an array, got {}", kind(other))));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(reject(
                argument,
                format!("element {} must be an object, got {}", i, kind(other)),
            )),
        })
        .collect()
}

fn owned(records: Vec<&Record>) -> Vec<Record> {
    records.into_iter().cloned().collect()
}

fn into_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

/// Fold a JSON array of messages into a JSON array of state records.
pub fn build_topic_state(
    messages: &Value,
    primary_key: &Value,
    action_key: &Value,
) -> Result<Value> {
    let messages = records_arg(messages, "messages")?;
    let primary_key = field_name_arg(primary_key, "primary_key")?;
    let action_key = field_name_arg(action_key, "action_key")?;

    Ok(into_value(replay::build_topic_state(
        owned(messages),
        &primary_key,
        &action_key,
    )))
}

/// Append `record` to `state`.
pub fn create(state: &Value, record: &Value) -> Result<Value> {
    let state = records_arg(state, "state")?;
    let record = record_arg(record, "record")?;

    Ok(into_value(state::create(owned(state), record.clone())))
}

/// Merge `record` into the state elements sharing its primary key.
pub fn update(state: &Value, record: &Value, primary_key: &Value) -> Result<Value> {
    let state = records_arg(state, "state")?;
    let record = record_arg(record, "record")?;
    let primary_key = field_name_arg(primary_key, "primary_key")?;

    Ok(into_value(state::update(owned(state), record, &primary_key)))
}

/// Drop the state elements sharing `record`'s primary key.
pub fn remove(state: &Value, record: &Value, primary_key: &Value) -> Result<Value> {
    let state = records_arg(state, "state")?;
    let record = record_arg(record, "record")?;
    let primary_key = field_name_arg(primary_key, "primary_key")?;

    Ok(into_value(state::remove(owned(state), record, &primary_key)))
}

fn key_exists(record: &Value, state: &Value, primary_key: &Value) -> Result<bool> {
    let record = record_arg(record, "record")?;
    let state = records_arg(state, "state")?;
    let primary_key = field_name_arg(primary_key, "primary_key")?;

    Ok(state::key_exists(record, state, &primary_key))
}

/// Whether no element of `state` shares `record`'s primary key.
pub fn is_creatable(record: &Value, state: &Value, primary_key: &Value) -> Result<bool> {
    key_exists(record, state, primary_key).map(|exists| !exists)
}

/// Whether some element of `state` shares `record`'s primary key.
pub fn is_updatable(record: &Value, state: &Value, primary_key: &Value) -> Result<bool> {
    key_exists(record, state, primary_key)
}

/// Whether some element of `state` shares `record`'s primary key.
pub fn is_removable(record: &Value, state: &Value, primary_key: &Value) -> Result<bool> {
    key_exists(record, state, primary_key)
}
