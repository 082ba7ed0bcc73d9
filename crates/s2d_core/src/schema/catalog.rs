//! The Sports2D demo config fields exposed in the settings panel.

use super::{FieldGroup, FieldKind, FieldPath, FieldSpec};
use crate::fields::InputSize;

pub const JOINT_ANGLES: &[&str] = &[
    "Right ankle",
    "Left ankle",
    "Right knee",
    "Left knee",
    "Right hip",
    "Left hip",
    "Right shoulder",
    "Left shoulder",
    "Right elbow",
    "Left elbow",
    "Right wrist",
    "Left wrist",
];

pub const SEGMENT_ANGLES: &[&str] = &[
    "Right foot",
    "Left foot",
    "Right shank",
    "Left shank",
    "Right thigh",
    "Left thigh",
    "Trunk",
    "Right arm",
    "Left arm",
    "Right forearm",
    "Left forearm",
    "Right hand",
    "Left hand",
];

pub const POSE_MODES: &[&str] = &["lightweight", "balanced", "performance"];

pub const FILTER_TYPES: &[&str] = &["butterworth", "gaussian", "LOESS", "median"];

const DEFAULT_JOINT_ANGLES: &[&str] = &[
    "Right ankle",
    "Left ankle",
    "Right knee",
    "Left knee",
    "Right hip",
    "Left hip",
    "Right shoulder",
    "Left shoulder",
    "Right elbow",
    "Left elbow",
];

const DEFAULT_SEGMENT_ANGLES: &[&str] = &[
    "Right foot",
    "Left foot",
    "Right shank",
    "Left shank",
    "Right thigh",
    "Left thigh",
    "Trunk",
    "Right arm",
    "Left arm",
    "Right forearm",
    "Left forearm",
];

const fn toggle(
    id: &'static str,
    label: &'static str,
    group: FieldGroup,
    section: &'static str,
    default: bool,
) -> FieldSpec {
    FieldSpec {
        id,
        label,
        group,
        path: FieldPath::new(section, id),
        kind: FieldKind::Boolean { default },
    }
}

const fn filter_param(
    id: &'static str,
    label: &'static str,
    section: &'static str,
    key: &'static str,
    (min, max, default): (i64, i64, i64),
) -> FieldSpec {
    FieldSpec {
        id,
        label,
        group: FieldGroup::AdvancedAngles,
        path: FieldPath::new(section, key),
        kind: FieldKind::BoundedInteger { min, max, default },
    }
}

pub(super) static SPORTS2D_FIELDS: &[FieldSpec] = &[
    // Basic
    toggle(
        "display_detection",
        "Display Detection",
        FieldGroup::Pose,
        "pose",
        true,
    ),
    FieldSpec {
        id: "time_range",
        label: "Time Range",
        group: FieldGroup::Pose,
        path: FieldPath::new("pose", "time_range"),
        kind: FieldKind::TimeRange,
    },
    FieldSpec {
        id: "joint_angles",
        label: "Select Joint Angles",
        group: FieldGroup::Angles,
        path: FieldPath::new("compute_angles", "joint_angles"),
        kind: FieldKind::MultiSelect {
            options: JOINT_ANGLES,
            default: DEFAULT_JOINT_ANGLES,
        },
    },
    FieldSpec {
        id: "segment_angles",
        label: "Select Segment Angles",
        group: FieldGroup::Angles,
        path: FieldPath::new("compute_angles", "segment_angles"),
        kind: FieldKind::MultiSelect {
            options: SEGMENT_ANGLES,
            default: DEFAULT_SEGMENT_ANGLES,
        },
    },
    // Advanced pose
    FieldSpec {
        id: "webcam_id",
        label: "Webcam ID",
        group: FieldGroup::AdvancedPose,
        path: FieldPath::new("pose_advanced", "webcam_id"),
        kind: FieldKind::BoundedInteger {
            min: 0,
            max: 99,
            default: 0,
        },
    },
    FieldSpec {
        id: "input_size",
        label: "Input Size",
        group: FieldGroup::AdvancedPose,
        path: FieldPath::new("pose_advanced", "input_size"),
        kind: FieldKind::InputSize {
            default: InputSize::Explicit {
                width: 1280,
                height: 720,
            },
        },
    },
    toggle(
        "overwrite_pose",
        "Overwrite Pose",
        FieldGroup::AdvancedPose,
        "pose_advanced",
        false,
    ),
    FieldSpec {
        id: "det_frequency",
        label: "Detection Frequency",
        group: FieldGroup::AdvancedPose,
        path: FieldPath::new("pose_advanced", "det_frequency"),
        kind: FieldKind::BoundedInteger {
            min: 1,
            max: 99,
            default: 4,
        },
    },
    FieldSpec {
        id: "mode",
        label: "Mode",
        group: FieldGroup::AdvancedPose,
        path: FieldPath::new("pose_advanced", "mode"),
        kind: FieldKind::Enum {
            options: POSE_MODES,
            default: "balanced",
        },
    },
    FieldSpec {
        id: "keypoints_threshold",
        label: "Keypoints Threshold",
        group: FieldGroup::AdvancedPose,
        path: FieldPath::new("pose_advanced", "keypoints_threshold"),
        kind: FieldKind::BoundedFloat { default: 0.3 },
    },
    // Advanced angles
    toggle(
        "show_angles_on_img",
        "Show Angles on Image",
        FieldGroup::AdvancedAngles,
        "compute_angles_advanced",
        true,
    ),
    toggle(
        "show_angles_on_vid",
        "Show Angles on Video",
        FieldGroup::AdvancedAngles,
        "compute_angles_advanced",
        true,
    ),
    toggle(
        "filter",
        "Apply Filter",
        FieldGroup::AdvancedAngles,
        "compute_angles_advanced",
        true,
    ),
    toggle(
        "show_plots",
        "Show Plots",
        FieldGroup::AdvancedAngles,
        "compute_angles_advanced",
        true,
    ),
    toggle(
        "flip_left_right",
        "Flip Left/Right",
        FieldGroup::AdvancedAngles,
        "compute_angles_advanced",
        true,
    ),
    FieldSpec {
        id: "filter_type",
        label: "Filter Type",
        group: FieldGroup::AdvancedAngles,
        path: FieldPath::new("compute_angles_advanced", "filter_type"),
        kind: FieldKind::Enum {
            options: FILTER_TYPES,
            default: "butterworth",
        },
    },
    filter_param(
        "butterworth_order",
        "Butterworth Order",
        "compute_angles_advanced.butterworth",
        "order",
        (1, 10, 4),
    ),
    filter_param(
        "butterworth_cut_off_frequency",
        "Butterworth Cut-off Frequency (Hz)",
        "compute_angles_advanced.butterworth",
        "cut_off_frequency",
        (1, 100, 6),
    ),
    filter_param(
        "gaussian_sigma_kernel",
        "Gaussian Sigma Kernel",
        "compute_angles_advanced.gaussian",
        "sigma_kernel",
        (1, 50, 2),
    ),
    filter_param(
        "loess_nb_values_used",
        "LOESS Values Used",
        "compute_angles_advanced.loess",
        "nb_values_used",
        (1, 100, 30),
    ),
    filter_param(
        "median_kernel_size",
        "Median Kernel Size",
        "compute_angles_advanced.median",
        "kernel_size",
        (1, 99, 3),
    ),
];
