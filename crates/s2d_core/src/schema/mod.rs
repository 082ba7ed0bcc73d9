//! Static catalog of editable settings.
//!
//! Each field declares where it lives in the config document, its semantic
//! kind, and (inside the kind) its constraints and default. The catalog is
//! fixed at compile time; nothing here changes at runtime.

mod catalog;

use std::fmt;
use std::str::FromStr;

use crate::fields::{FieldValue, InputSize, TimeRange};

pub use catalog::{FILTER_TYPES, JOINT_ANGLES, POSE_MODES, SEGMENT_ANGLES};

/// Number of slider positions mapped onto the 0.0..=1.0 range.
pub const SLIDER_STEPS: u32 = 100;

/// Location of a field in the document: a (possibly dotted) section and a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub section: &'static str,
    pub key: &'static str,
}

impl FieldPath {
    pub const fn new(section: &'static str, key: &'static str) -> Self {
        Self { section, key }
    }

    /// Table names leading to the key, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.section.split('.')
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.key)
    }
}

/// Semantic type of a field, with its constraints and default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// On/off toggle.
    Boolean { default: bool },
    /// Integer from a spin box limited to `min..=max`.
    BoundedInteger { min: i64, max: i64, default: i64 },
    /// Fraction in 0.0..=1.0 edited through a slider of `SLIDER_STEPS` positions.
    BoundedFloat { default: f64 },
    /// One option out of a fixed list.
    Enum {
        options: &'static [&'static str],
        default: &'static str,
    },
    /// `"auto"` or an explicit width/height pair.
    InputSize { default: InputSize },
    /// Optional start/end bounds in seconds. Defaults to unbounded.
    TimeRange,
    /// Any subset of a fixed list, kept in list order.
    MultiSelect {
        options: &'static [&'static str],
        default: &'static [&'static str],
    },
}

impl FieldKind {
    /// Short human-readable name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Boolean { .. } => "boolean",
            FieldKind::BoundedInteger { .. } => "bounded integer",
            FieldKind::BoundedFloat { .. } => "slider fraction",
            FieldKind::Enum { .. } => "choice",
            FieldKind::InputSize { .. } => "input size",
            FieldKind::TimeRange => "time range",
            FieldKind::MultiSelect { .. } => "multi-select",
        }
    }

    /// The value used when the document does not hold one.
    pub fn default_value(&self) -> FieldValue {
        match *self {
            FieldKind::Boolean { default } => FieldValue::Bool(default),
            FieldKind::BoundedInteger { default, .. } => FieldValue::Integer(default),
            FieldKind::BoundedFloat { default } => FieldValue::Float(default),
            FieldKind::Enum { default, .. } => FieldValue::Choice(default.to_string()),
            FieldKind::InputSize { default } => FieldValue::InputSize(default),
            FieldKind::TimeRange => FieldValue::TimeRange(TimeRange::UNBOUNDED),
            FieldKind::MultiSelect { default, .. } => {
                FieldValue::Selection(default.iter().map(|s| s.to_string()).collect())
            }
        }
    }
}

/// Panel grouping used by front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Pose,
    Angles,
    AdvancedPose,
    AdvancedAngles,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 4] = [
        FieldGroup::Pose,
        FieldGroup::Angles,
        FieldGroup::AdvancedPose,
        FieldGroup::AdvancedAngles,
    ];

    /// Heading shown above the group.
    pub fn title(&self) -> &'static str {
        match self {
            FieldGroup::Pose => "Basic Settings",
            FieldGroup::Angles => "Joint & Segment Angles",
            FieldGroup::AdvancedPose => "Advanced Pose Settings",
            FieldGroup::AdvancedAngles => "Advanced Angles Settings",
        }
    }

    /// Identifier accepted on command lines.
    pub fn slug(&self) -> &'static str {
        match self {
            FieldGroup::Pose => "pose",
            FieldGroup::Angles => "angles",
            FieldGroup::AdvancedPose => "advanced-pose",
            FieldGroup::AdvancedAngles => "advanced-angles",
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FieldGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldGroup::ALL
            .into_iter()
            .find(|group| group.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<_> = FieldGroup::ALL.iter().map(FieldGroup::slug).collect();
                format!("unknown group '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Declaration of one editable setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Stable identifier used by edit events.
    pub id: &'static str,
    /// Label shown next to the control.
    pub label: &'static str,
    pub group: FieldGroup,
    pub path: FieldPath,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn default_value(&self) -> FieldValue {
        self.kind.default_value()
    }
}

/// An ordered, immutable set of field declarations.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    /// Wrap a field list. Ids and document paths must be unique.
    pub fn new(fields: &'static [FieldSpec]) -> Self {
        debug_assert!(
            first_duplicate(fields).is_none(),
            "duplicate field id or path: {:?}",
            first_duplicate(fields)
        );
        Self { fields }
    }

    /// The Sports2D settings panel catalog.
    pub fn sports2d() -> Self {
        Self::new(catalog::SPORTS2D_FIELDS)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.id == id)
    }

    /// Fields of one group, in declaration order.
    pub fn group(&self, group: FieldGroup) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(move |spec| spec.group == group)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::sports2d()
    }
}

fn first_duplicate(fields: &[FieldSpec]) -> Option<&'static str> {
    fields.iter().enumerate().find_map(|(i, a)| {
        fields[..i]
            .iter()
            .any(|b| b.id == a.id || b.path == a.path)
            .then_some(a.id)
    })
}
