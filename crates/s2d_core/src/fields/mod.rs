//! Typed field values and the conversions around them.
//!
//! - `binder`: document -> field values (`project`) and back (`merge`)
//! - `coerce`: raw control input -> field value, or a named failure

pub mod binder;
pub mod coerce;

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use binder::{merge, project, MergeOutcome};
pub use coerce::{
    coerce, parse_dimensions, validate, RawInput, ValidationError, ValidationErrorKind,
};

/// Document text for the "let the tool choose" input size.
pub const AUTO: &str = "auto";

/// Document text for an open time range bound.
///
/// TOML has no null, so an open bound is written as this string. Files
/// written by older tools may spell it `"None"`; both are read.
pub const NULL_SLOT: &str = "null";

/// Pose model input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSize {
    /// Let Sports2D pick the size.
    Auto,
    Explicit { width: u32, height: u32 },
}

impl fmt::Display for InputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSize::Auto => f.write_str(AUTO),
            InputSize::Explicit { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

impl Serialize for InputSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InputSize::Auto => serializer.serialize_str(AUTO),
            InputSize::Explicit { width, height } => [width, height].serialize(serializer),
        }
    }
}

/// Analysis time window in seconds; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeRange {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl TimeRange {
    /// No restriction: the whole video is analysed.
    pub const UNBOUNDED: TimeRange = TimeRange {
        start: None,
        end: None,
    };

    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            return f.write_str("[]");
        }
        let slot = |bound: Option<f64>| bound.map_or_else(|| NULL_SLOT.to_string(), |v| v.to_string());
        write!(f, "[{}, {}]", slot(self.start), slot(self.end))
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_unbounded() {
            Vec::<Option<f64>>::new().serialize(serializer)
        } else {
            [self.start, self.end].serialize(serializer)
        }
    }
}

/// Current value of one field, in its semantic type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Choice(String),
    InputSize(InputSize),
    TimeRange(TimeRange),
    Selection(Vec<String>),
}

impl FieldValue {
    /// Whether two values mean the same setting.
    ///
    /// Selections compare as sets; everything else compares exactly.
    pub fn is_equivalent(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Selection(a), FieldValue::Selection(b)) => {
                a.iter().all(|label| b.contains(label)) && b.iter().all(|label| a.contains(label))
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Choice(v) => f.write_str(v),
            FieldValue::InputSize(v) => write!(f, "{v}"),
            FieldValue::TimeRange(v) => write!(f, "{v}"),
            FieldValue::Selection(v) if v.is_empty() => f.write_str("(none)"),
            FieldValue::Selection(v) => f.write_str(&v.join(", ")),
        }
    }
}

/// Field values keyed by field id, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    entries: Vec<(&'static str, FieldValue)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the one it replaced.
    pub fn insert(&mut self, id: &'static str, value: FieldValue) -> Option<FieldValue> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((id, value));
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
