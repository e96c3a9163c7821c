//! Predicates classifying a record against an existing state.

use crate::types::{FieldName, Record};

/// Whether any element of `state` shares `record`'s primary key.
///
/// Stops at the first match.
pub(crate) fn key_exists<'a, I>(record: &Record, state: I, primary_key: &FieldName) -> bool
where
    I: IntoIterator<Item = &'a Record>,
{
    state
        .into_iter()
        .any(|item| primary_key.matches(item, record))
}

/// Whether no element of `state` shares `record`'s primary key.
///
/// An empty state is always creatable.
pub fn is_creatable(record: &Record, state: &[Record], primary_key: &FieldName) -> bool {
    !key_exists(record, state, primary_key)
}

/// Whether some element of `state` shares `record`'s primary key.
pub fn is_updatable(record: &Record, state: &[Record], primary_key: &FieldName) -> bool {
    key_exists(record, state, primary_key)
}

/// Whether some element of `state` shares `record`'s primary key.
pub fn is_removable(record: &Record, state: &[Record], primary_key: &FieldName) -> bool {
    key_exists(record, state, primary_key)
}
