//! Command-line arguments.
//!
//! ```text
//! qs-recolor [--config <path>] [--palette <path>] [--target <path>]
//!            [--exec <name>] [--no-restart] [--dry-run] [--help]
//! ```
//!
//! Values given here override the config file.

use crate::config::{expand_home, Config};
use std::path::PathBuf;

pub const USAGE: &str = "\
usage: qs-recolor [options]

  --config <path>    config file (default: $XDG_CONFIG_HOME/qs-recolor/config.json)
  --palette <path>   generated palette file
  --target <path>    shell color file to patch
  --exec <name>      shell executable to restart
  --no-restart       do not restart the shell
  --dry-run          print the patched file instead of writing it
  -h, --help         show this help";

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub palette: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub executable: Option<String>,
    pub no_restart: bool,
    pub dry_run: bool,
    pub help: bool,
}

/// Error from parsing the command line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("unknown argument: {0}")]
    Unknown(String),
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Args::default();
        let mut args = args.into_iter().map(|a| -> String { a.into() });
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => out.config = Some(value(&mut args, &arg)?.into()),
                "--palette" => out.palette = Some(value(&mut args, &arg)?.into()),
                "--target" => out.target = Some(value(&mut args, &arg)?.into()),
                "--exec" => out.executable = Some(value(&mut args, &arg)?),
                "--no-restart" => out.no_restart = true,
                "--dry-run" => out.dry_run = true,
                "-h" | "--help" => out.help = true,
                _ => return Err(CliError::Unknown(arg)),
            }
        }
        Ok(out)
    }

    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(p) = &self.palette {
            config.palette_path = expand_home(p);
        }
        if let Some(p) = &self.target {
            config.target_path = expand_home(p);
        }
        if let Some(e) = &self.executable {
            config.executable = e.clone();
        }
        if self.no_restart {
            config.restart.enabled = false;
        }
    }
}

/// The value following `flag`.
fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}
