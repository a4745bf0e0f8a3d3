//! Per-directory marker files that hold the cached tagging state.
//!
//! Each movie directory may carry up to five sidecar files. They are plain
//! text, one line terminated by a newline (`.ignore` is an empty marker).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TagError};

const IMDB_PREFIX: &str = "tt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidecarKind {
    Ignore,
    Imdb,
    Name,
    Rating,
    Original,
}

impl SidecarKind {
    pub const ALL: [SidecarKind; 5] = [
        SidecarKind::Ignore,
        SidecarKind::Imdb,
        SidecarKind::Name,
        SidecarKind::Rating,
        SidecarKind::Original,
    ];

    /// Kinds dropped when a directory is cleared; `.original` survives.
    pub const CLEARABLE: [SidecarKind; 4] = [
        SidecarKind::Ignore,
        SidecarKind::Imdb,
        SidecarKind::Name,
        SidecarKind::Rating,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SidecarKind::Ignore => ".ignore",
            SidecarKind::Imdb => ".imdb",
            SidecarKind::Name => ".name",
            SidecarKind::Rating => ".rating",
            SidecarKind::Original => ".original",
        }
    }
}

/// Reads and writes sidecar files inside movie directories.
#[derive(Debug, Clone, Default)]
pub struct SidecarStore {
    file_mode: Option<u32>,
}

impl SidecarStore {
    pub fn new(file_mode: Option<u32>) -> Self {
        Self { file_mode }
    }

    fn path(dir: &Path, kind: SidecarKind) -> PathBuf {
        dir.join(kind.file_name())
    }

    pub fn exists(&self, dir: &Path, kind: SidecarKind) -> bool {
        let path = Self::path(dir, kind);
        debug!("Checking existence of file \"{}\".", path.display());
        path.exists()
    }

    /// Returns the first line of the sidecar file. `.imdb` values come back
    /// without their `tt` prefix.
    pub fn read(&self, dir: &Path, kind: SidecarKind) -> Result<String> {
        let path = Self::path(dir, kind);
        if !path.exists() {
            return Err(TagError::NotFound(format!(
                "sidecar file \"{}\"",
                path.display()
            )));
        }

        debug!("Reading text from file \"{}\".", path.display());
        let text = fs::read_to_string(&path).map_err(|e| TagError::io(&path, e))?;
        let line = text.lines().next().unwrap_or_default();

        Ok(match kind {
            SidecarKind::Imdb => line.strip_prefix(IMDB_PREFIX).unwrap_or(line).to_string(),
            _ => line.to_string(),
        })
    }

    /// Writes `value` as a single line. `.imdb` values get the `tt` prefix,
    /// `.ignore` is written as an empty marker regardless of `value`.
    pub fn write(&self, dir: &Path, kind: SidecarKind, value: &str) -> Result<()> {
        let path = Self::path(dir, kind);
        let contents = match kind {
            SidecarKind::Ignore => String::new(),
            SidecarKind::Imdb => format!("{}{}\n", IMDB_PREFIX, value),
            _ => format!("{}\n", value),
        };

        debug!("Writing text \"{}\" to file \"{}\".", value, path.display());
        fs::write(&path, contents).map_err(|e| TagError::io(&path, e))?;

        if let Some(mode) = self.file_mode {
            apply_mode(&path, mode);
        }
        Ok(())
    }

    pub fn remove(&self, dir: &Path, kind: SidecarKind) -> Result<()> {
        let path = Self::path(dir, kind);
        fs::remove_file(&path).map_err(|e| TagError::io(&path, e))
    }

    /// Removes every clearable sidecar file present in `dir`.
    pub fn clear(&self, dir: &Path) -> Result<()> {
        for kind in SidecarKind::CLEARABLE {
            if self.exists(dir, kind) {
                self.remove(dir, kind)?;
            }
        }
        Ok(())
    }

    pub fn mark_ignored(&self, dir: &Path) -> Result<()> {
        debug!("Marking directory \"{}\" as ignored.", dir.display());
        self.write(dir, SidecarKind::Ignore, "")
    }
}

/// Applies a permission mode; failures are logged, never fatal.
#[cfg(unix)]
pub fn apply_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        tracing::error!("Unable to change permissions of \"{}\": {}", path.display(), e);
    }
}

#[cfg(not(unix))]
pub fn apply_mode(path: &Path, mode: u32) {
    debug!(
        "Ignoring permission mode {:o} for \"{}\" on this platform.",
        mode,
        path.display()
    );
}
