//! Coercion and validation of edited values.
//!
//! Every function here is pure. `coerce` turns what a control produced into
//! the field's semantic value; `validate` applies the same rules to a value
//! that was handed over already typed.

use thiserror::Error;

use super::{FieldValue, InputSize, TimeRange, AUTO};
use crate::schema::{FieldKind, FieldSpec, SLIDER_STEPS};

/// What an editing control hands over for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Checkbox state.
    Toggle(bool),
    /// Spin box value.
    Integer(i64),
    /// Slider position, `0..=SLIDER_STEPS`.
    Slider(u32),
    /// Combo box selection.
    Choice(String),
    /// Input size controls: the "auto" checkbox plus width and height.
    Dimensions { auto: bool, width: i64, height: i64 },
    /// Two free-text boxes, either may be left empty.
    TextPair { start: String, end: String },
    /// Selected list entries, in any order.
    Selection(Vec<String>),
}

/// Why an edit was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    #[error("'{value}' is not one of the allowed options")]
    InvalidEnum { value: String },

    #[error("input size must be 'auto' or two positive integers, got '{input}'")]
    InvalidDimension { input: String },

    #[error("'{text}' is not a number")]
    InvalidNumber { text: String },

    #[error("{value} is outside the allowed range {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("expected {expected} input")]
    KindMismatch { expected: &'static str },
}

impl ValidationErrorKind {
    /// Stable name of the failure, for front ends that map it to messages.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidEnum { .. } => "InvalidEnum",
            ValidationErrorKind::InvalidDimension { .. } => "InvalidDimension",
            ValidationErrorKind::InvalidNumber { .. } => "InvalidNumber",
            ValidationErrorKind::OutOfRange { .. } => "OutOfRange",
            ValidationErrorKind::KindMismatch { .. } => "KindMismatch",
        }
    }
}

/// A refused edit together with the field it was meant for.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid value for '{field}': {kind}")]
pub struct ValidationError {
    pub field: &'static str,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(field: &'static str, kind: ValidationErrorKind) -> Self {
        Self { field, kind }
    }
}

/// Convert control input into the field's value.
pub fn coerce(spec: &FieldSpec, raw: RawInput) -> Result<FieldValue, ValidationErrorKind> {
    match (&spec.kind, raw) {
        (FieldKind::Boolean { .. }, RawInput::Toggle(on)) => Ok(FieldValue::Bool(on)),
        (FieldKind::BoundedInteger { min, max, .. }, RawInput::Integer(value)) => {
            check_range(value, *min, *max).map(FieldValue::Integer)
        }
        (FieldKind::BoundedFloat { .. }, RawInput::Slider(position)) => {
            slider_fraction(position).map(FieldValue::Float)
        }
        (FieldKind::Enum { options, .. }, RawInput::Choice(choice)) => {
            choose(options, choice).map(FieldValue::Choice)
        }
        (
            FieldKind::InputSize { .. },
            RawInput::Dimensions {
                auto,
                width,
                height,
            },
        ) => input_size(auto, width, height).map(FieldValue::InputSize),
        (FieldKind::TimeRange, RawInput::TextPair { start, end }) => {
            let range = TimeRange::new(parse_bound(&start)?, parse_bound(&end)?);
            Ok(FieldValue::TimeRange(range))
        }
        (FieldKind::MultiSelect { options, .. }, RawInput::Selection(labels)) => {
            select(options, &labels).map(FieldValue::Selection)
        }
        (kind, _) => Err(ValidationErrorKind::KindMismatch {
            expected: kind.name(),
        }),
    }
}

/// Check an already-typed value against the field's constraints.
///
/// Selections come back in catalog order.
pub fn validate(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue, ValidationErrorKind> {
    match (&spec.kind, value) {
        (FieldKind::Boolean { .. }, value @ FieldValue::Bool(_)) => Ok(value),
        (FieldKind::BoundedInteger { min, max, .. }, FieldValue::Integer(value)) => {
            check_range(value, *min, *max).map(FieldValue::Integer)
        }
        (FieldKind::BoundedFloat { .. }, FieldValue::Float(value)) => {
            if !value.is_finite() {
                return Err(ValidationErrorKind::InvalidNumber {
                    text: value.to_string(),
                });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationErrorKind::OutOfRange {
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
            Ok(FieldValue::Float(value))
        }
        (FieldKind::Enum { options, .. }, FieldValue::Choice(choice)) => {
            choose(options, choice).map(FieldValue::Choice)
        }
        (FieldKind::InputSize { .. }, FieldValue::InputSize(size)) => match size {
            InputSize::Explicit { width, height } if width == 0 || height == 0 => {
                Err(ValidationErrorKind::InvalidDimension {
                    input: size.to_string(),
                })
            }
            _ => Ok(FieldValue::InputSize(size)),
        },
        (FieldKind::TimeRange, FieldValue::TimeRange(range)) => {
            for bound in [range.start, range.end].into_iter().flatten() {
                if !bound.is_finite() {
                    return Err(ValidationErrorKind::InvalidNumber {
                        text: bound.to_string(),
                    });
                }
            }
            Ok(FieldValue::TimeRange(range))
        }
        (FieldKind::MultiSelect { options, .. }, FieldValue::Selection(labels)) => {
            select(options, &labels).map(FieldValue::Selection)
        }
        (kind, _) => Err(ValidationErrorKind::KindMismatch {
            expected: kind.name(),
        }),
    }
}

/// Strictly parse free-text input size such as `auto`, `1280x720`,
/// `[1280, 720]` or `(1280, 720)`.
///
/// Only the shape is checked here; positivity is left to `coerce`.
pub fn parse_dimensions(text: &str) -> Result<RawInput, ValidationErrorKind> {
    let invalid = || ValidationErrorKind::InvalidDimension {
        input: text.trim().to_string(),
    };

    let trimmed = text.trim().trim_matches(|c: char| c == '\'' || c == '"');
    if trimmed.eq_ignore_ascii_case(AUTO) {
        return Ok(RawInput::Dimensions {
            auto: true,
            width: 0,
            height: 0,
        });
    }

    let inner = strip_brackets(trimmed);
    let mut parts = inner.split(|c: char| c == ',' || c == 'x' || c == 'X');
    let (Some(width), Some(height), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let width = width.trim().parse::<i64>().map_err(|_| invalid())?;
    let height = height.trim().parse::<i64>().map_err(|_| invalid())?;
    Ok(RawInput::Dimensions {
        auto: false,
        width,
        height,
    })
}

/// Split labels into catalog members (in catalog order) and unknown ones.
pub(crate) fn split_selection(
    options: &[&str],
    labels: &[String],
) -> (Vec<String>, Vec<String>) {
    let known = options
        .iter()
        .filter(|option| labels.iter().any(|label| label == *option))
        .map(|option| option.to_string())
        .collect();
    let unknown = labels
        .iter()
        .filter(|label| !options.contains(&label.as_str()))
        .cloned()
        .collect();
    (known, unknown)
}

fn strip_brackets(text: &str) -> &str {
    let pairs = [('[', ']'), ('(', ')')];
    pairs
        .iter()
        .find_map(|(open, close)| text.strip_prefix(*open)?.strip_suffix(*close))
        .unwrap_or(text)
}

fn check_range(value: i64, min: i64, max: i64) -> Result<i64, ValidationErrorKind> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationErrorKind::OutOfRange {
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

fn slider_fraction(position: u32) -> Result<f64, ValidationErrorKind> {
    if position > SLIDER_STEPS {
        return Err(ValidationErrorKind::OutOfRange {
            value: f64::from(position),
            min: 0.0,
            max: f64::from(SLIDER_STEPS),
        });
    }
    Ok(f64::from(position) / f64::from(SLIDER_STEPS))
}

fn choose(options: &[&str], choice: String) -> Result<String, ValidationErrorKind> {
    if options.contains(&choice.as_str()) {
        Ok(choice)
    } else {
        Err(ValidationErrorKind::InvalidEnum { value: choice })
    }
}

fn input_size(auto: bool, width: i64, height: i64) -> Result<InputSize, ValidationErrorKind> {
    if auto {
        return Ok(InputSize::Auto);
    }
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(width), Ok(height)) if width > 0 && height > 0 => {
            Ok(InputSize::Explicit { width, height })
        }
        _ => Err(ValidationErrorKind::InvalidDimension {
            input: format!("{width}x{height}"),
        }),
    }
}

fn parse_bound(text: &str) -> Result<Option<f64>, ValidationErrorKind> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ValidationErrorKind::InvalidNumber {
            text: text.to_string(),
        }),
    }
}

fn select(options: &[&str], labels: &[String]) -> Result<Vec<String>, ValidationErrorKind> {
    let (known, unknown) = split_selection(options, labels);
    match unknown.into_iter().next() {
        Some(value) => Err(ValidationErrorKind::InvalidEnum { value }),
        None => Ok(known),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn spec(id: &str) -> &'static FieldSpec {
        Schema::sports2d().field(id).unwrap()
    }

    fn text_pair(start: &str, end: &str) -> RawInput {
        RawInput::TextPair {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn dims(auto: bool, width: i64, height: i64) -> RawInput {
        RawInput::Dimensions {
            auto,
            width,
            height,
        }
    }

    #[test]
    fn toggle_passes_through() {
        assert_eq!(
            coerce(spec("filter"), RawInput::Toggle(false)),
            Ok(FieldValue::Bool(false))
        );
    }

    #[test]
    fn slider_positions_map_to_fractions() {
        let threshold = spec("keypoints_threshold");
        assert_eq!(
            coerce(threshold, RawInput::Slider(37)),
            Ok(FieldValue::Float(0.37))
        );
        assert_eq!(
            coerce(threshold, RawInput::Slider(0)),
            Ok(FieldValue::Float(0.0))
        );
        assert_eq!(
            coerce(threshold, RawInput::Slider(100)),
            Ok(FieldValue::Float(1.0))
        );
        assert!(matches!(
            coerce(threshold, RawInput::Slider(101)),
            Err(ValidationErrorKind::OutOfRange { .. })
        ));
    }

    #[test]
    fn integers_are_not_clamped() {
        let det = spec("det_frequency");
        assert_eq!(coerce(det, RawInput::Integer(10)), Ok(FieldValue::Integer(10)));
        assert_eq!(
            coerce(det, RawInput::Integer(0)),
            Err(ValidationErrorKind::OutOfRange {
                value: 0.0,
                min: 1.0,
                max: 99.0
            })
        );
    }

    #[test]
    fn enum_rejects_non_members() {
        let filter_type = spec("filter_type");
        assert_eq!(
            coerce(filter_type, RawInput::Choice("LOESS".into())),
            Ok(FieldValue::Choice("LOESS".into()))
        );
        assert_eq!(
            coerce(filter_type, RawInput::Choice("loess".into())),
            Err(ValidationErrorKind::InvalidEnum {
                value: "loess".into()
            })
        );
    }

    #[test]
    fn auto_flag_ignores_dimensions() {
        assert_eq!(
            coerce(spec("input_size"), dims(true, 0, -5)),
            Ok(FieldValue::InputSize(InputSize::Auto))
        );
    }

    #[test]
    fn explicit_dimensions_must_be_positive() {
        let size = spec("input_size");
        assert_eq!(
            coerce(size, dims(false, 640, 480)),
            Ok(FieldValue::InputSize(InputSize::Explicit {
                width: 640,
                height: 480
            }))
        );
        for (width, height) in [(0, 480), (640, 0), (-1, 480), (i64::MAX, 480)] {
            let result = coerce(size, dims(false, width, height));
            assert!(
                matches!(result, Err(ValidationErrorKind::InvalidDimension { .. })),
                "{width}x{height} gave {result:?}"
            );
        }
    }

    #[test]
    fn empty_time_range_is_unbounded() {
        assert_eq!(
            coerce(spec("time_range"), text_pair("", "  ")),
            Ok(FieldValue::TimeRange(TimeRange::UNBOUNDED))
        );
    }

    #[test]
    fn one_sided_time_range_keeps_open_slot() {
        assert_eq!(
            coerce(spec("time_range"), text_pair("1.5", "")),
            Ok(FieldValue::TimeRange(TimeRange::new(Some(1.5), None)))
        );
        assert_eq!(
            coerce(spec("time_range"), text_pair("", "12")),
            Ok(FieldValue::TimeRange(TimeRange::new(None, Some(12.0))))
        );
    }

    #[test]
    fn unparsable_bound_is_invalid_number() {
        for bad in ["abc", "1.5s", "nan", "inf", "__import__('os')"] {
            assert_eq!(
                coerce(spec("time_range"), text_pair(bad, "3")),
                Err(ValidationErrorKind::InvalidNumber {
                    text: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn selection_follows_catalog_order() {
        let joints = spec("joint_angles");
        let picked = vec!["Left knee".to_string(), "Right ankle".to_string()];
        assert_eq!(
            coerce(joints, RawInput::Selection(picked)),
            Ok(FieldValue::Selection(vec![
                "Right ankle".to_string(),
                "Left knee".to_string()
            ]))
        );
    }

    #[test]
    fn selection_rejects_unknown_labels() {
        let joints = spec("joint_angles");
        assert_eq!(
            coerce(joints, RawInput::Selection(vec!["Neck".into()])),
            Err(ValidationErrorKind::InvalidEnum {
                value: "Neck".into()
            })
        );
    }

    #[test]
    fn mismatched_input_shape_is_rejected() {
        assert_eq!(
            coerce(spec("webcam_id"), RawInput::Toggle(true)),
            Err(ValidationErrorKind::KindMismatch {
                expected: "bounded integer"
            })
        );
        assert_eq!(
            validate(spec("mode"), FieldValue::Integer(1)),
            Err(ValidationErrorKind::KindMismatch { expected: "choice" })
        );
    }

    #[test]
    fn validate_applies_the_same_rules() {
        assert_eq!(
            validate(spec("mode"), FieldValue::Choice("turbo".into())),
            Err(ValidationErrorKind::InvalidEnum {
                value: "turbo".into()
            })
        );
        assert!(matches!(
            validate(spec("keypoints_threshold"), FieldValue::Float(1.5)),
            Err(ValidationErrorKind::OutOfRange { .. })
        ));
        assert!(matches!(
            validate(
                spec("input_size"),
                FieldValue::InputSize(InputSize::Explicit {
                    width: 0,
                    height: 720
                })
            ),
            Err(ValidationErrorKind::InvalidDimension { .. })
        ));
        assert!(matches!(
            validate(
                spec("time_range"),
                FieldValue::TimeRange(TimeRange::new(Some(f64::NAN), None))
            ),
            Err(ValidationErrorKind::InvalidNumber { .. })
        ));
    }

    #[test]
    fn dimension_text_forms() {
        assert_eq!(parse_dimensions(" auto "), Ok(dims(true, 0, 0)));
        assert_eq!(parse_dimensions("'auto'"), Ok(dims(true, 0, 0)));
        assert_eq!(parse_dimensions("[1280, 720]"), Ok(dims(false, 1280, 720)));
        assert_eq!(parse_dimensions("(640,480)"), Ok(dims(false, 640, 480)));
        assert_eq!(parse_dimensions("1920x1080"), Ok(dims(false, 1920, 1080)));
        assert_eq!(parse_dimensions("0, 0"), Ok(dims(false, 0, 0)));
    }

    #[test]
    fn dimension_text_fails_closed() {
        for bad in ["", "1280", "1280, 720, 3", "[1280, 720", "1e3x720", "__import__('os').system('ls')"] {
            assert!(
                matches!(
                    parse_dimensions(bad),
                    Err(ValidationErrorKind::InvalidDimension { .. })
                ),
                "{bad:?} was accepted"
            );
        }
    }

    #[test]
    fn error_codes_are_stable() {
        let err = ValidationError::new(
            "input_size",
            ValidationErrorKind::InvalidDimension { input: "0x720".into() },
        );
        assert_eq!(err.kind.code(), "InvalidDimension");
        assert_eq!(
            err.to_string(),
            "invalid value for 'input_size': input size must be 'auto' or two positive integers, got '0x720'"
        );
    }
}
