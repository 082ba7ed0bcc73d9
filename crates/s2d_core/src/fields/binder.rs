//! Mapping between the config document and typed field values.

use toml_edit::{Array, Item, Value};
use tracing::{debug, warn};

use super::coerce::{split_selection, validate};
use super::{FieldValue, FieldValues, InputSize, TimeRange, AUTO, NULL_SLOT};
use crate::config::{ConfigDocument, PathConflict};
use crate::schema::{FieldKind, FieldSpec, Schema};

/// Result of merging field values into a document.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The updated document.
    pub document: ConfigDocument,
    /// Ids of the fields whose document value was rewritten, in schema order.
    pub changed: Vec<&'static str>,
}

/// Read every schema field out of the document.
///
/// Missing keys and missing sections yield the field default. A present
/// value that cannot be read as the field's kind, or that breaks its
/// constraints, also falls back to the default with a warning.
pub fn project(document: &ConfigDocument, schema: &Schema) -> FieldValues {
    let mut values = FieldValues::new();
    for spec in schema.fields() {
        let value = match document.get(&spec.path) {
            Some(item) => read_field(spec, item).unwrap_or_else(|| spec.default_value()),
            None => {
                debug!(field = spec.id, path = %spec.path, "Not in document, using default");
                spec.default_value()
            }
        };
        values.insert(spec.id, value);
    }
    values
}

/// Write field values back into a copy of the document.
///
/// Fields missing from `values` are left alone. A value equivalent to what
/// the document already holds (or, for an absent key, to the field default)
/// is not rewritten, so merging an unchanged projection reproduces the
/// document byte for byte.
pub fn merge(
    document: &ConfigDocument,
    values: &FieldValues,
    schema: &Schema,
) -> Result<MergeOutcome, PathConflict> {
    let mut merged = document.clone();
    let mut changed = Vec::new();

    for spec in schema.fields() {
        let Some(value) = values.get(spec.id) else {
            continue;
        };

        let unchanged = match document.get(&spec.path) {
            Some(item) => decode(&spec.kind, item).is_some_and(|current| current.is_equivalent(value)),
            None => spec.default_value().is_equivalent(value),
        };
        if unchanged {
            continue;
        }

        merged.set(&spec.path, encode(value))?;
        debug!(field = spec.id, path = %spec.path, %value, "Field rewritten");
        changed.push(spec.id);
    }

    Ok(MergeOutcome {
        document: merged,
        changed,
    })
}

/// Read a document item as the given kind, without checking constraints.
///
/// Returns `None` when the item has the wrong TOML shape.
pub fn decode(kind: &FieldKind, item: &Item) -> Option<FieldValue> {
    let value = item.as_value()?;
    match kind {
        FieldKind::Boolean { .. } => value.as_bool().map(FieldValue::Bool),
        FieldKind::BoundedInteger { .. } => value.as_integer().map(FieldValue::Integer),
        FieldKind::BoundedFloat { .. } => value
            .as_float()
            .or_else(|| value.as_integer().map(|v| v as f64))
            .map(FieldValue::Float),
        FieldKind::Enum { .. } => value.as_str().map(|s| FieldValue::Choice(s.to_string())),
        FieldKind::InputSize { .. } => decode_input_size(value).map(FieldValue::InputSize),
        FieldKind::TimeRange => decode_time_range(value).map(FieldValue::TimeRange),
        FieldKind::MultiSelect { .. } => value
            .as_array()?
            .iter()
            .map(|label| label.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::Selection),
    }
}

/// Render a field value in its document shape.
pub fn encode(value: &FieldValue) -> Value {
    match value {
        FieldValue::Bool(v) => Value::from(*v),
        FieldValue::Integer(v) => Value::from(*v),
        FieldValue::Float(v) => Value::from(*v),
        FieldValue::Choice(v) => Value::from(v.as_str()),
        FieldValue::InputSize(InputSize::Auto) => Value::from(AUTO),
        FieldValue::InputSize(InputSize::Explicit { width, height }) => Value::Array(
            [i64::from(*width), i64::from(*height)]
                .into_iter()
                .collect(),
        ),
        FieldValue::TimeRange(range) if range.is_unbounded() => Value::Array(Array::new()),
        FieldValue::TimeRange(range) => {
            let slot = |bound: Option<f64>| bound.map_or_else(|| Value::from(NULL_SLOT), Value::from);
            Value::Array([slot(range.start), slot(range.end)].into_iter().collect())
        }
        FieldValue::Selection(labels) => {
            Value::Array(labels.iter().map(String::as_str).collect())
        }
    }
}

fn read_field(spec: &FieldSpec, item: &Item) -> Option<FieldValue> {
    let Some(value) = decode(&spec.kind, item) else {
        warn!(
            field = spec.id,
            path = %spec.path,
            expected = spec.kind.name(),
            found = %item.to_string().trim(),
            "Unreadable value in config, using default"
        );
        return None;
    };

    let value = match (&spec.kind, value) {
        (FieldKind::MultiSelect { options, .. }, FieldValue::Selection(labels)) => {
            let (known, unknown) = split_selection(options, &labels);
            if !unknown.is_empty() {
                warn!(field = spec.id, ?unknown, "Dropping unknown entries");
            }
            FieldValue::Selection(known)
        }
        (_, value) => value,
    };

    match validate(spec, value) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(field = spec.id, path = %spec.path, error = %err, "Invalid value in config, using default");
            None
        }
    }
}

fn decode_input_size(value: &Value) -> Option<InputSize> {
    if let Some(text) = value.as_str() {
        return text.eq_ignore_ascii_case(AUTO).then_some(InputSize::Auto);
    }
    let array = value.as_array()?;
    if array.len() != 2 {
        return None;
    }
    let dimension = |index: usize| {
        array
            .get(index)
            .and_then(Value::as_integer)
            .and_then(|v| u32::try_from(v).ok())
    };
    Some(InputSize::Explicit {
        width: dimension(0)?,
        height: dimension(1)?,
    })
}

fn decode_time_range(value: &Value) -> Option<TimeRange> {
    let array = value.as_array()?;
    match array.len() {
        0 => Some(TimeRange::UNBOUNDED),
        2 => {
            let start = decode_bound(array.get(0)?)?;
            let end = decode_bound(array.get(1)?)?;
            Some(TimeRange::new(start, end))
        }
        _ => None,
    }
}

/// `Some(None)` is an open slot; `None` is unreadable.
fn decode_bound(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Float(v) => Some(Some(*v.value())),
        Value::Integer(v) => Some(Some(*v.value() as f64)),
        Value::String(s) => {
            let s = s.value();
            (s.eq_ignore_ascii_case(NULL_SLOT) || s.eq_ignore_ascii_case("none")).then_some(None)
        }
        _ => None,
    }
}
