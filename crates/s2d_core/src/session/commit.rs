//! Commit states, outcomes and batch validation.

use std::fmt;

use thiserror::Error;

use super::batch::{Edit, EditBatch};
use crate::config::{PathConflict, StoreError};
use crate::fields::{coerce, validate, FieldValues, ValidationError};
use crate::schema::Schema;

/// Where a session is in the apply flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitState {
    /// Collecting edits.
    #[default]
    Idle,
    /// Apply is checking the batch.
    Validating,
    /// The last apply went through.
    Committed,
    /// The last apply was refused; nothing was written.
    Rejected,
}

impl fmt::Display for CommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitState::Idle => "idle",
            CommitState::Validating => "validating",
            CommitState::Committed => "committed",
            CommitState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Fields whose document value changed, in schema order.
    pub changed: Vec<&'static str>,
}

impl CommitReport {
    /// True when the apply left the document as it was.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Why an apply did not fully succeed.
#[derive(Error, Debug)]
pub enum CommitError {
    /// A staged edit failed validation. Nothing was changed.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// The document shape prevents writing a field. Nothing was changed.
    #[error(transparent)]
    Conflict(#[from] PathConflict),

    /// The edits were applied in memory but could not be saved.
    #[error("changes applied but not saved: {0}")]
    Persist(#[source] StoreError),
}

/// Coerce every staged edit, in schema order.
///
/// Stops at the first failure; values computed before it are dropped.
pub(crate) fn validate_batch(
    batch: &EditBatch,
    schema: &Schema,
) -> Result<FieldValues, ValidationError> {
    let mut values = FieldValues::new();
    for spec in schema.fields() {
        let Some(edit) = batch.get(spec.id) else {
            continue;
        };
        let value = match edit {
            Edit::Raw(raw) => coerce(spec, raw.clone()),
            Edit::Value(value) => validate(spec, value.clone()),
        }
        .map_err(|kind| ValidationError::new(spec.id, kind))?;
        values.insert(spec.id, value);
    }
    Ok(values)
}
