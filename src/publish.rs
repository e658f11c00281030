//! Writing the generated document.
//!
//! Stage 4 of the pipeline. The document replaces whatever was at the output
//! path. A superseded file from an older layout (`gita_problems.html`) is
//! removed first so the app never ships both; failing to remove it is
//! reported, never fatal.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// What happened to the legacy output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyStatus {
    /// No legacy path configured.
    NotConfigured,
    NotPresent,
    Removed,
    /// Present but could not be deleted; carries the reason.
    NotRemoved(String),
}

impl fmt::Display for LegacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyStatus::NotConfigured => write!(f, "not configured"),
            LegacyStatus::NotPresent => write!(f, "not present"),
            LegacyStatus::Removed => write!(f, "removed"),
            LegacyStatus::NotRemoved(reason) => write!(f, "not removed ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub path: PathBuf,
    pub bytes: usize,
    pub legacy: Option<PathBuf>,
    pub legacy_status: LegacyStatus,
}

/// Write `html` to `path`, creating parent directories, after removing
/// `legacy` if it exists.
pub fn publish(html: &str, path: &Path, legacy: Option<&Path>) -> Result<PublishReport, PublishError> {
    let legacy_status = match legacy {
        Some(old) => remove_legacy(old),
        None => LegacyStatus::NotConfigured,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PublishError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, html).map_err(|source| PublishError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(PublishReport {
        path: path.to_path_buf(),
        bytes: html.len(),
        legacy: legacy.map(Path::to_path_buf),
        legacy_status,
    })
}

fn remove_legacy(path: &Path) -> LegacyStatus {
    match fs::remove_file(path) {
        Ok(()) => LegacyStatus::Removed,
        Err(e) if e.kind() == io::ErrorKind::NotFound => LegacyStatus::NotPresent,
        Err(e) => LegacyStatus::NotRemoved(e.to_string()),
    }
}

/// Open the document in the platform's default viewer. Best effort: the
/// caller reports the error and carries on.
pub fn open_in_viewer(path: &Path) -> io::Result<()> {
    let mut command = viewer_command(path);
    command.spawn().map(|_| ())
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    }
}
