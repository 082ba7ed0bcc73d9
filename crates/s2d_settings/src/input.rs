//! Command-line text to staged edits.

use s2d_core::fields::{parse_dimensions, FieldValue, RawInput, ValidationErrorKind};
use s2d_core::schema::{FieldKind, FieldSpec};
use s2d_core::session::Edit;

/// Turn the text given for a field into an edit.
///
/// Only the text shape is checked here; range and membership checks happen
/// when the session applies the edit.
pub fn parse_edit(spec: &FieldSpec, text: &str) -> Result<Edit, ValidationErrorKind> {
    let text = text.trim();
    let raw = match spec.kind {
        FieldKind::Boolean { .. } => RawInput::Toggle(parse_bool(text)?),
        FieldKind::BoundedInteger { .. } => RawInput::Integer(parse_integer(text)?),
        FieldKind::BoundedFloat { .. } => return parse_slider(text),
        FieldKind::Enum { .. } => RawInput::Choice(text.to_string()),
        FieldKind::InputSize { .. } => parse_dimensions(text)?,
        FieldKind::TimeRange => parse_time_range(text)?,
        FieldKind::MultiSelect { .. } => RawInput::Selection(
            text.split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect(),
        ),
    };
    Ok(Edit::Raw(raw))
}

fn parse_bool(text: &str) -> Result<bool, ValidationErrorKind> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ValidationErrorKind::KindMismatch { expected: "boolean" }),
    }
}

fn parse_integer(text: &str) -> Result<i64, ValidationErrorKind> {
    text.parse().map_err(|_| ValidationErrorKind::InvalidNumber {
        text: text.to_string(),
    })
}

/// A whole number is a slider position; a decimal is the fraction itself.
fn parse_slider(text: &str) -> Result<Edit, ValidationErrorKind> {
    if !text.contains('.') {
        let position = text
            .parse::<u32>()
            .map_err(|_| ValidationErrorKind::InvalidNumber {
                text: text.to_string(),
            })?;
        return Ok(Edit::Raw(RawInput::Slider(position)));
    }
    let fraction = text
        .parse::<f64>()
        .map_err(|_| ValidationErrorKind::InvalidNumber {
            text: text.to_string(),
        })?;
    Ok(Edit::Value(FieldValue::Float(fraction)))
}

/// `START,END` with either side empty; `[]` or nothing clears both.
fn parse_time_range(text: &str) -> Result<RawInput, ValidationErrorKind> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(text);

    let (start, end) = match inner.split_once(',') {
        Some((start, end)) => (start, end),
        None if inner.trim().is_empty() => ("", ""),
        None => {
            return Err(ValidationErrorKind::InvalidNumber {
                text: text.to_string(),
            })
        }
    };

    Ok(RawInput::TextPair {
        start: open_slot(start),
        end: open_slot(end),
    })
}

fn open_slot(text: &str) -> String {
    let text = text.trim().trim_matches(|c: char| c == '\'' || c == '"');
    if text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("none") {
        String::new()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s2d_core::schema::Schema;

    fn parse(id: &str, text: &str) -> Result<Edit, ValidationErrorKind> {
        parse_edit(Schema::sports2d().field(id).unwrap(), text)
    }

    fn raw(edit: Edit) -> RawInput {
        match edit {
            Edit::Raw(raw) => raw,
            Edit::Value(value) => panic!("expected raw input, got {value:?}"),
        }
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert_eq!(raw(parse("filter", "Yes").unwrap()), RawInput::Toggle(true));
        assert_eq!(raw(parse("filter", "off").unwrap()), RawInput::Toggle(false));
        assert!(parse("filter", "maybe").is_err());
    }

    #[test]
    fn integers_must_be_whole_numbers() {
        assert_eq!(
            raw(parse("det_frequency", " 7 ").unwrap()),
            RawInput::Integer(7)
        );
        assert_eq!(
            parse("det_frequency", "7.5").unwrap_err(),
            ValidationErrorKind::InvalidNumber { text: "7.5".into() }
        );
    }

    #[test]
    fn slider_takes_position_or_fraction() {
        assert_eq!(
            raw(parse("keypoints_threshold", "37").unwrap()),
            RawInput::Slider(37)
        );
        assert_eq!(
            parse("keypoints_threshold", "0.25").unwrap(),
            Edit::Value(FieldValue::Float(0.25))
        );
        assert!(parse("keypoints_threshold", "-3").is_err());
    }

    #[test]
    fn time_range_forms() {
        let pair = |start: &str, end: &str| RawInput::TextPair {
            start: start.into(),
            end: end.into(),
        };
        assert_eq!(raw(parse("time_range", "1.5,").unwrap()), pair("1.5", ""));
        assert_eq!(raw(parse("time_range", "[0, 12]").unwrap()), pair("0", "12"));
        assert_eq!(raw(parse("time_range", "null, 3").unwrap()), pair("", "3"));
        assert_eq!(raw(parse("time_range", "[]").unwrap()), pair("", ""));
        assert_eq!(raw(parse("time_range", "").unwrap()), pair("", ""));
        assert!(parse("time_range", "12").is_err());
    }

    #[test]
    fn input_size_uses_strict_parser() {
        assert_eq!(
            raw(parse("input_size", "auto").unwrap()),
            RawInput::Dimensions {
                auto: true,
                width: 0,
                height: 0
            }
        );
        assert!(matches!(
            parse("input_size", "1280*720"),
            Err(ValidationErrorKind::InvalidDimension { .. })
        ));
    }

    #[test]
    fn selections_split_on_commas() {
        assert_eq!(
            raw(parse("segment_angles", "Trunk, Left arm,").unwrap()),
            RawInput::Selection(vec!["Trunk".into(), "Left arm".into()])
        );
        assert_eq!(
            raw(parse("segment_angles", "").unwrap()),
            RawInput::Selection(vec![])
        );
    }
}
