//! Settings editing session.
//!
//! A session owns the loaded document, its projection into field values and
//! the edits staged since the last apply. Edits are only checked when
//! `apply()` runs; a refused apply changes nothing, a successful one merges
//! the batch into the document and saves it.
//!
//! # Example
//!
//! ```no_run
//! use s2d_core::config::DocumentStore;
//! use s2d_core::fields::RawInput;
//! use s2d_core::schema::Schema;
//! use s2d_core::session::SettingsSession;
//!
//! let store = DocumentStore::new("Demo/Config_demo.toml");
//! let mut session = SettingsSession::open(store, Schema::sports2d()).unwrap();
//! session.edit("keypoints_threshold", RawInput::Slider(40)).unwrap();
//! let report = session.apply().unwrap();
//! println!("changed: {:?}", report.changed);
//! ```

mod batch;
mod commit;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigDocument, DocumentStore, StoreError};
use crate::fields::{merge, project, FieldValue, FieldValues, RawInput};
use crate::schema::{FieldSpec, Schema};

pub use batch::{Edit, EditBatch};
pub use commit::{CommitError, CommitReport, CommitState};

/// Errors raised outside of apply.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown field '{id}'")]
    UnknownField { id: String },
}

/// One editing session over a config file.
#[derive(Debug)]
pub struct SettingsSession {
    store: DocumentStore,
    schema: Schema,
    document: ConfigDocument,
    values: FieldValues,
    pending: EditBatch,
    state: CommitState,
    persisted: bool,
}

impl SettingsSession {
    /// Load the document and project it.
    ///
    /// Load failures are returned as-is; no session exists without a
    /// document.
    pub fn open(store: DocumentStore, schema: Schema) -> Result<Self, SessionError> {
        let document = store.load()?;
        let values = project(&document, &schema);
        info!(
            path = %store.path().display(),
            fields = values.len(),
            "Settings session opened"
        );

        Ok(Self {
            store,
            schema,
            document,
            values,
            pending: EditBatch::new(),
            state: CommitState::Idle,
            persisted: true,
        })
    }

    /// Current field values, as last loaded or committed.
    pub fn fields(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// The in-memory document. After a failed save this is ahead of the file.
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn pending(&self) -> &EditBatch {
        &self.pending
    }

    pub fn state(&self) -> CommitState {
        self.state
    }

    /// Whether the file on disk matches the in-memory document.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Stage control input for a field.
    pub fn edit(&mut self, id: &str, raw: RawInput) -> Result<(), SessionError> {
        self.stage(id, Edit::Raw(raw))
    }

    /// Stage an already-typed value for a field. It is validated at apply.
    pub fn inject(&mut self, id: &str, value: FieldValue) -> Result<(), SessionError> {
        self.stage(id, Edit::Value(value))
    }

    /// Drop all staged edits.
    pub fn cancel(&mut self) {
        if !self.pending.is_empty() {
            debug!(edits = self.pending.len(), "Discarding staged edits");
        }
        self.pending = EditBatch::new();
        self.state = CommitState::Idle;
    }

    /// Validate the staged edits, merge them and save the document.
    ///
    /// The batch is consumed whatever the outcome.
    pub fn apply(&mut self) -> Result<CommitReport, CommitError> {
        self.state = CommitState::Validating;
        let batch = std::mem::take(&mut self.pending);

        let values = match commit::validate_batch(&batch, &self.schema) {
            Ok(values) => values,
            Err(err) => {
                warn!(field = err.field, code = err.kind.code(), error = %err, "Apply rejected");
                self.state = CommitState::Rejected;
                return Err(err.into());
            }
        };

        let outcome = match merge(&self.document, &values, &self.schema) {
            Ok(outcome) => outcome,
            Err(conflict) => {
                warn!(error = %conflict, "Apply rejected");
                self.state = CommitState::Rejected;
                return Err(conflict.into());
            }
        };

        self.state = CommitState::Committed;
        let report = CommitReport {
            changed: outcome.changed,
        };

        if report.is_noop() && self.persisted {
            debug!(edits = batch.len(), "Apply changed nothing");
            return Ok(report);
        }

        self.document = outcome.document;
        self.values = project(&self.document, &self.schema);
        self.persisted = false;

        self.persist().map_err(|err| {
            error!(error = %err, "Settings applied but not saved");
            CommitError::Persist(err)
        })?;

        info!(changed = ?report.changed, "Settings committed");
        Ok(report)
    }

    /// Save the in-memory document. Used to retry after a failed apply.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.store.save(&self.document)?;
        self.persisted = true;
        Ok(())
    }

    /// Stage an edit of either form.
    pub fn stage(&mut self, id: &str, edit: Edit) -> Result<(), SessionError> {
        let spec = self.spec(id)?;
        debug!(field = spec.id, ?edit, "Edit staged");
        self.pending.stage(spec.id, edit);
        self.state = CommitState::Idle;
        Ok(())
    }

    fn spec(&self, id: &str) -> Result<&'static FieldSpec, SessionError> {
        self.schema
            .field(id)
            .ok_or_else(|| SessionError::UnknownField { id: id.to_string() })
    }
}
