//! CLI logic for the Sports2D settings tool.
//!
//! A thin shell over `s2d_core`: it locates the config file, opens a
//! settings session, and either prints the projected values or stages the
//! given assignments and applies them.

mod args;
mod input;
mod render;

pub use args::{Args, Assignment, Command};
pub use input::parse_edit;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use s2d_core::config::{find_config_file, DocumentStore};
use s2d_core::fields::ValidationError;
use s2d_core::schema::Schema;
use s2d_core::session::{CommitError, SessionError, SettingsSession};

/// Exit status for a refused edit or bad usage.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when edits were applied but the file could not be written.
pub const EXIT_NOT_SAVED: i32 = 2;

/// Run the selected command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error for:
/// - A config file that cannot be located, read or parsed
/// - Unknown field ids and values that fail validation
/// - A failed save after the edits were applied
pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let schema = Schema::sports2d();

    if let Command::Fields = args.command {
        out.write_all(render::fields_text(&schema).as_bytes())?;
        return Ok(());
    }

    let path = find_config_file(args.config.as_deref(), Some(args.package_dir.as_path()))
        .context("Could not locate the Sports2D config")?;
    let mut session = SettingsSession::open(DocumentStore::new(&path), schema)
        .with_context(|| format!("Could not open {}", path.display()))?;

    match &args.command {
        Command::Fields => {}
        Command::Show { json, group } => {
            let text = if *json {
                let mut json = render::values_json(session.fields(), &schema, *group)?;
                json.push('\n');
                json
            } else {
                render::values_text(session.fields(), &schema, *group)
            };
            out.write_all(text.as_bytes())?;
        }
        Command::Set { assignments } => {
            for assignment in assignments {
                stage(&mut session, assignment)?;
            }

            let report = session.apply().with_context(|| {
                if session.is_persisted() {
                    "Settings were not changed".to_string()
                } else {
                    format!("Settings were applied but not saved to {}", path.display())
                }
            })?;

            if report.is_noop() {
                writeln!(out, "No changes to {}", path.display())?;
            } else {
                info!(changed = ?report.changed, "Config updated");
                writeln!(
                    out,
                    "Updated {} ({})",
                    path.display(),
                    report.changed.join(", ")
                )?;
            }
        }
    }

    Ok(())
}

/// Map an error from `run` to the process exit status.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CommitError>() {
        Some(CommitError::Persist(_)) => EXIT_NOT_SAVED,
        _ => EXIT_FAILURE,
    }
}

fn stage(session: &mut SettingsSession, assignment: &Assignment) -> Result<()> {
    let spec = session
        .schema()
        .field(&assignment.id)
        .ok_or_else(|| SessionError::UnknownField {
            id: assignment.id.clone(),
        })?;
    let edit = input::parse_edit(spec, &assignment.value)
        .map_err(|kind| ValidationError::new(spec.id, kind))?;
    session.stage(spec.id, edit)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    const CONFIG: &str = "# demo\n[pose]\ntime_range = []\npose_model = 'HALPE_26'\n\n[pose_advanced]\nmode = 'balanced' # pick one\nkeypoints_threshold = 0.3\n";

    fn config_file() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config_demo.toml");
        fs::write(&path, CONFIG).unwrap();
        (dir, path)
    }

    fn run_with(config: &Path, rest: &[&str]) -> (Result<()>, String) {
        let mut argv = vec!["s2d-settings", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(rest);
        let args = Args::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        let result = run(&args, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn show_prints_projected_values() {
        let (_dir, path) = config_file();
        let (result, out) = run_with(&path, &["show"]);
        result.unwrap();
        assert!(out.contains("Advanced Pose Settings"));
        assert!(out.contains("balanced"));
    }

    #[test]
    fn show_json_is_an_object() {
        let (_dir, path) = config_file();
        let (result, out) = run_with(&path, &["show", "--json", "--group", "pose"]);
        result.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["time_range"], serde_json::json!([]));
        assert_eq!(parsed["display_detection"], true);
    }

    #[test]
    fn set_writes_only_changed_keys() {
        let (_dir, path) = config_file();
        let (result, out) = run_with(
            &path,
            &["set", "mode=performance", "keypoints_threshold=45"],
        );
        result.unwrap();
        assert!(out.contains("mode, keypoints_threshold"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            CONFIG
                .replace("mode = 'balanced'", "mode = \"performance\"")
                .replace("keypoints_threshold = 0.3", "keypoints_threshold = 0.45")
        );
    }

    #[test]
    fn set_same_value_reports_no_change() {
        let (_dir, path) = config_file();
        let (result, out) = run_with(&path, &["set", "mode=balanced"]);
        result.unwrap();
        assert!(out.starts_with("No changes"));
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);
    }

    #[test]
    fn invalid_value_leaves_file_untouched() {
        let (_dir, path) = config_file();
        let (result, _) = run_with(&path, &["set", "mode=performance", "input_size=0x720"]);
        let err = result.unwrap_err();
        assert_eq!(exit_code(&err), EXIT_FAILURE);
        assert!(format!("{err:#}").contains("input_size"));
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let (_dir, path) = config_file();
        let (result, _) = run_with(&path, &["set", "pose_model=COCO_17"]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("pose_model"));
        assert_eq!(exit_code(&err), EXIT_FAILURE);
    }

    #[test]
    fn failed_save_has_its_own_exit_code() {
        let (dir, path) = config_file();
        fs::create_dir(dir.path().join("Config_demo.toml.tmp")).unwrap();

        let (result, _) = run_with(&path, &["set", "mode=lightweight"]);
        let err = result.unwrap_err();
        assert_eq!(exit_code(&err), EXIT_NOT_SAVED);
        assert!(err.to_string().contains("not saved"));
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);
    }

    #[test]
    fn fields_needs_no_config() {
        let args = Args::try_parse_from(["s2d-settings", "--package-dir", "/nonexistent", "fields"]).unwrap();
        let mut out = Vec::new();
        run(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("median_kernel_size"));
    }
}
