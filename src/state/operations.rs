//! State mutation operations.

use crate::types::{FieldName, Record};

/// Append `record` to `state`.
///
/// Uniqueness of the primary key is the caller's responsibility; use
/// [`is_creatable`](super::is_creatable) first when it matters.
pub fn create(mut state: Vec<Record>, record: Record) -> Vec<Record> {
    state.push(record);
    state
}

/// Merge `record` into every element sharing its primary key.
///
/// Fields of `record` override same-named fields of the element; fields only
/// present on the element are kept. Never inserts and never changes the
/// length of the state.
pub fn update(mut state: Vec<Record>, record: &Record, primary_key: &FieldName) -> Vec<Record> {
    for item in state.iter_mut() {
        if primary_key.matches(item, record) {
            for (field, value) in record {
                item.insert(field.clone(), value.clone());
            }
        }
    }
    state
}

/// Drop every element sharing `record`'s primary key.
pub fn remove(mut state: Vec<Record>, record: &Record, primary_key: &FieldName) -> Vec<Record> {
    state.retain(|item| !primary_key.matches(item, record));
    state
}
