//! Text and JSON output.

use std::fmt::Write;

use s2d_core::fields::FieldValues;
use s2d_core::schema::{FieldGroup, FieldKind, FieldSpec, Schema, SLIDER_STEPS};

/// Current values under their group headings.
pub fn values_text(values: &FieldValues, schema: &Schema, only: Option<FieldGroup>) -> String {
    let mut out = String::new();
    for group in groups(only) {
        let _ = writeln!(out, "{}", group.title());
        for spec in schema.group(group) {
            if let Some(value) = values.get(spec.id) {
                let _ = writeln!(out, "  {:<31} {}", spec.id, value);
            }
        }
        out.push('\n');
    }
    out
}

/// Current values as a JSON object keyed by field id.
pub fn values_json(
    values: &FieldValues,
    schema: &Schema,
    only: Option<FieldGroup>,
) -> serde_json::Result<String> {
    let mut selected = FieldValues::new();
    for spec in groups(only).flat_map(|group| schema.group(group)) {
        if let Some(value) = values.get(spec.id) {
            selected.insert(spec.id, value.clone());
        }
    }
    serde_json::to_string_pretty(&selected)
}

/// One line per field: id, label, accepted input and document path.
pub fn fields_text(schema: &Schema) -> String {
    let mut out = String::new();
    for group in FieldGroup::ALL {
        let _ = writeln!(out, "{} [{}]", group.title(), group.slug());
        for spec in schema.group(group) {
            let _ = writeln!(out, "  {:<31} {}", spec.id, spec.label);
            let _ = writeln!(out, "      {:<36} {}", describe(spec), spec.path);
        }
        out.push('\n');
    }
    out
}

/// Accepted input and default of a field, for `fields`.
pub fn describe(spec: &FieldSpec) -> String {
    let default = spec.default_value();
    match spec.kind {
        FieldKind::Boolean { .. } => format!("true/false (default {default})"),
        FieldKind::BoundedInteger { min, max, .. } => {
            format!("{min}..={max} (default {default})")
        }
        FieldKind::BoundedFloat { .. } => {
            format!("0..={SLIDER_STEPS} or 0.0..=1.0 (default {default})")
        }
        FieldKind::Enum { options, .. } => format!("{} (default {default})", options.join("|")),
        FieldKind::InputSize { .. } => format!("auto or WxH (default {default})"),
        FieldKind::TimeRange => "START,END seconds, either empty".to_string(),
        FieldKind::MultiSelect { options, .. } => {
            format!("comma list of {} options", options.len())
        }
    }
}

fn groups(only: Option<FieldGroup>) -> impl Iterator<Item = FieldGroup> {
    FieldGroup::ALL
        .into_iter()
        .filter(move |group| only.map_or(true, |only| only == *group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use s2d_core::fields::{FieldValue, InputSize};

    fn defaults(schema: &Schema) -> FieldValues {
        let mut values = FieldValues::new();
        for spec in schema.fields() {
            values.insert(spec.id, spec.default_value());
        }
        values
    }

    #[test]
    fn text_lists_every_group() {
        let schema = Schema::sports2d();
        let text = values_text(&defaults(&schema), &schema, None);
        for group in FieldGroup::ALL {
            assert!(text.contains(group.title()), "{group} missing");
        }
        assert!(text.contains("input_size"));
        assert!(text.contains("1280x720"));
    }

    #[test]
    fn group_filter_limits_output() {
        let schema = Schema::sports2d();
        let text = values_text(&defaults(&schema), &schema, Some(FieldGroup::Angles));
        assert!(text.contains("joint_angles"));
        assert!(!text.contains("webcam_id"));
    }

    #[test]
    fn json_uses_document_shapes() {
        let schema = Schema::sports2d();
        let mut values = defaults(&schema);
        values.insert("input_size", FieldValue::InputSize(InputSize::Auto));

        let json = values_json(&values, &schema, Some(FieldGroup::AdvancedPose)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["input_size"], "auto");
        assert_eq!(parsed["det_frequency"], 4);
        assert!(parsed.get("time_range").is_none());
    }

    #[test]
    fn fields_describe_constraints() {
        let schema = Schema::sports2d();
        let text = fields_text(&schema);
        assert!(text.contains("lightweight|balanced|performance (default balanced)"));
        assert!(text.contains("compute_angles_advanced.butterworth.order"));
        assert!(text.contains("Butterworth Cut-off Frequency (Hz)"));
        assert_eq!(
            describe(schema.field("median_kernel_size").unwrap()),
            "1..=99 (default 3)"
        );
    }
}
