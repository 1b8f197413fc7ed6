//! One complete run: read the palette, patch the color file, restart the
//! shell.
//!
//! Missing, unreadable or empty inputs abort the run with a [`SyncError`]
//! before anything is written.  The color file is replaced atomically, after
//! a one-time copy to `<target>.backup`.  Once it has been written, the
//! remaining problems (nothing matched, the shell would not restart) are
//! only logged as warnings.

use crate::config::Config;
use crate::mapping::PropertyMapping;
use crate::palette::{self, Palette, PaletteError};
use crate::patcher::{self, PatchOutcome};
use crate::restart::{RestartError, RestartReport, Restarter};
use crate::traits::ProcessControl;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Fatal errors.  Each one maps to exit status 1.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to {action} {}: {source}", path.display())]
    UnreadableFile {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no colors found in {}", .0.display())]
    EmptyPalette(PathBuf),
}

impl From<PaletteError> for SyncError {
    fn from(e: PaletteError) -> Self {
        match e {
            PaletteError::MissingFile(path) => SyncError::MissingFile(path),
            PaletteError::UnreadableFile { path, source } => SyncError::UnreadableFile {
                action: "read",
                path,
                source,
            },
            PaletteError::EmptyPalette(path) => SyncError::EmptyPalette(path),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunReport {
    pub patch: PatchOutcome,
    /// Whether the target file was rewritten.
    pub written: bool,
    /// Backup created by this run, if any.
    pub backup: Option<PathBuf>,
    /// `None` when no restart was attempted.
    pub restart: Option<Result<RestartReport, RestartError>>,
}

/// Run the whole pipeline with `control` as the process backend.
///
/// With `dry_run` set the target file is left alone and the shell is not
/// touched; the patched text is available in the returned report.
pub fn run<P: ProcessControl>(
    config: &Config,
    control: P,
    dry_run: bool,
) -> Result<RunReport, SyncError> {
    let palette = load_palette(config)?;
    info!(
        "read {} color(s) from {}",
        palette.len(),
        config.palette_path.display()
    );

    let document = read_target(&config.target_path)?;
    let patch = patcher::patch(&document, &palette, &PropertyMapping::builtin());

    if patch.updated.is_empty() {
        warn!(
            "no properties matched in {}, nothing to update",
            config.target_path.display()
        );
    } else {
        info!("updated {} propert(ies)", patch.updated_count());
    }
    if !patch.missing.is_empty() {
        info!(
            "{} mapped propert(ies) not declared in {}",
            patch.missing.len(),
            config.target_path.display()
        );
    }

    if dry_run || patch.updated.is_empty() {
        return Ok(RunReport {
            patch,
            written: false,
            backup: None,
            restart: None,
        });
    }

    let backup = if config.backup {
        make_backup(&config.target_path)
    } else {
        None
    };
    write_atomic(&config.target_path, &patch.text).map_err(|source| {
        SyncError::UnreadableFile {
            action: "write",
            path: config.target_path.clone(),
            source,
        }
    })?;
    info!("wrote {}", config.target_path.display());

    let restart = config.restart.enabled.then(|| {
        let result = Restarter::new(control, &config.restart).restart(&config.executable);
        if let Err(e) = &result {
            warn!("restart failed: {}", e);
        }
        result
    });

    Ok(RunReport {
        patch,
        written: true,
        backup,
        restart,
    })
}

/// Process exit status for a run result.
pub fn exit_code(result: &Result<RunReport, SyncError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn load_palette(config: &Config) -> Result<Palette, SyncError> {
    let path = &config.palette_path;
    if !palette::wait_for_file(path, config.wait.timeout(), config.wait.poll()) {
        return Err(SyncError::MissingFile(path.clone()));
    }
    Ok(Palette::read(path)?)
}

fn read_target(path: &Path) -> Result<String, SyncError> {
    if !path.exists() {
        return Err(SyncError::MissingFile(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| SyncError::UnreadableFile {
        action: "read",
        path: path.to_path_buf(),
        source,
    })
}

/// `Appearance.qml` → `Appearance.qml.backup`, next to the original.
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".backup");
    target.with_file_name(name)
}

/// Copy `target` to its backup path unless a backup already exists.  Only
/// the first backup is kept, so it holds the hand-written file.  Failures
/// are logged and otherwise ignored.
fn make_backup(target: &Path) -> Option<PathBuf> {
    let backup = backup_path(target);
    if backup.exists() {
        debug!("backup {} already exists", backup.display());
        return None;
    }
    match std::fs::copy(target, &backup) {
        Ok(_) => {
            info!("backed up {} to {}", target.display(), backup.display());
            Some(backup)
        }
        Err(e) => {
            warn!("failed to back up {}: {}", target.display(), e);
            None
        }
    }
}

/// Replace `path` with `text` by writing a sibling temporary file and
/// renaming it over the original.  A symlinked target keeps its link.
fn write_atomic(path: &Path, text: &str) -> std::io::Result<()> {
    let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".qs-recolor.tmp");
    let tmp = path.with_file_name(name);

    let result = std::fs::write(&tmp, text)
        .and_then(|()| {
            let perms = std::fs::metadata(&path)?.permissions();
            std::fs::set_permissions(&tmp, perms)
        })
        .and_then(|()| std::fs::rename(&tmp, &path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}
