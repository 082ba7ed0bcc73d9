//! Command-line argument definitions for the settings tool.
//!
//! Arguments select the config file, logging behaviour and the action to run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use s2d_core::logging::LogLevel;
use s2d_core::schema::FieldGroup;

/// View and edit the Sports2D demo configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sports2D package directory holding Demo/Config_demo.toml
    #[arg(long, default_value = ".")]
    pub package_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,

    /// Also write logs to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current value of every setting
    Show {
        /// Print a JSON object instead of grouped text
        #[arg(long)]
        json: bool,

        /// Only show one group (pose, angles, advanced-pose, advanced-angles)
        #[arg(long)]
        group: Option<FieldGroup>,
    },

    /// List the editable settings with their constraints
    Fields,

    /// Change settings and save the config file
    Set {
        /// Assignments such as `mode=performance` or `time_range=1.5,`
        #[arg(required = true, value_name = "ID=VALUE")]
        assignments: Vec<Assignment>,
    },
}

/// One `ID=VALUE` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ID=VALUE, got '{s}'"))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(format!("missing field id in '{s}'"));
        }
        Ok(Self {
            id: id.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.value)
    }
}
