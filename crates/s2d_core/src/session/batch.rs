//! Pending edits of one settings session.

use crate::fields::{FieldValue, RawInput};

/// One staged change to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Input from an editing control, coerced at apply.
    Raw(RawInput),
    /// An already-typed value, validated at apply.
    Value(FieldValue),
}

/// Edits staged since the last apply or cancel, keyed by field id.
///
/// Only the latest edit of a field is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBatch {
    edits: Vec<(&'static str, Edit)>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an edit, replacing any earlier edit of the same field.
    pub fn stage(&mut self, id: &'static str, edit: Edit) {
        match self.edits.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = edit,
            None => self.edits.push((id, edit)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Edit> {
        self.edits
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, edit)| edit)
    }

    /// Staged edits in the order fields were first touched.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Edit)> {
        self.edits.iter().map(|(id, edit)| (*id, edit))
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_edit_replaces_earlier() {
        let mut batch = EditBatch::new();
        batch.stage("webcam_id", Edit::Raw(RawInput::Integer(1)));
        batch.stage("mode", Edit::Raw(RawInput::Choice("lightweight".into())));
        batch.stage("webcam_id", Edit::Value(FieldValue::Integer(3)));

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.get("webcam_id"),
            Some(&Edit::Value(FieldValue::Integer(3)))
        );
        let order: Vec<_> = batch.iter().map(|(id, _)| id).collect();
        assert_eq!(order, ["webcam_id", "mode"]);
    }
}
