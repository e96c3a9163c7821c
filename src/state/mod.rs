//! State mutators and consistency predicates.
//!
//! A state is an ordered `Vec<Record>` keyed by a primary-key field. The
//! mutators take the state by value and hand back the new state; the
//! predicates only borrow it.

mod operations;
mod predicates;

pub use operations::{create, remove, update};
pub(crate) use predicates::key_exists;
pub use predicates::{is_creatable, is_removable, is_updatable};
