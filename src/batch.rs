//! Walks a movie folder and dispatches each entry to the tagger.

use std::fs;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::error::{Result, TagError};
use crate::notifications::NotificationLog;
use crate::sidecar::{SidecarKind, apply_mode};
use crate::tagger::{DirectoryTagger, TagOutcome};

const MOVIE_EXTENSIONS: [&str; 8] = ["avi", "mpg", "mp4", "mpeg", "divx", "mov", "mkv", "m4v"];

/// Splits `name` into stem and extension. Names without a short word-only
/// extension come back whole with an empty extension.
pub fn split_filename(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            (stem, ext)
        }
        _ => (name, ""),
    }
}

pub fn is_movie_file(name: &str) -> bool {
    let (_, ext) = split_filename(name);
    MOVIE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Walks entries and hands each one to the tagger, keeping the summary.
pub struct BatchProcessor {
    tagger: DirectoryTagger,
    log: NotificationLog,
}

impl BatchProcessor {
    pub fn new(tagger: DirectoryTagger) -> Self {
        Self {
            tagger,
            log: NotificationLog::new(),
        }
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.log
    }

    pub fn into_notifications(self) -> NotificationLog {
        self.log
    }

    /// Processes every entry of `root` in lexicographic order.
    pub fn process_directory(&mut self, root: &Path) {
        if !root.is_dir() {
            error!("Directory {} does not exist.", root.display());
            return;
        }

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Could not list {}: {}", root.display(), e);
                return;
            }
        };

        let mut names: Vec<String> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Could not read an entry of {}: {}", root.display(), e);
                    continue;
                }
            };
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping entry with non UTF-8 name {:?}.", raw),
            }
        }
        names.sort();

        for name in &names {
            self.process(root, name);
        }
    }

    /// Classifies a single entry of `root` and acts on it.
    pub fn process(&mut self, root: &Path, entry: &str) {
        let path = root.join(entry);
        if !path.exists() {
            error!("\"{}\" does not exist.", entry);
            return;
        }

        if self.is_ignored(root, entry) {
            self.log.record_ignored();
            info!("Skipping \"{}\".", entry);
            return;
        }

        let config = self.tagger.config();
        let (clear, recovery) = (config.clear, config.recovery);

        if clear {
            if path.is_dir() {
                debug!("Clearing directory \"{}\".", entry);
                if let Err(e) = self.tagger.store().clear(&path) {
                    error!("Could not clear \"{}\": {}", entry, e);
                }
            }
            return;
        }

        if path.is_dir() {
            self.tag(root, entry);
            return;
        }

        if is_movie_file(entry) {
            debug!("Found movie file without directory: {}", entry);
            if recovery {
                info!("Skipping file \"{}\" in recovery mode.", entry);
                return;
            }

            match self.mkdir_and_move(root, entry) {
                Ok(Some(dir)) => self.tag(root, &dir),
                Ok(None) => info!("Leaving \"{}\" where it is.", entry),
                Err(e) => error!("Could not move \"{}\" into its own directory: {}", entry, e),
            }
        }
    }

    fn is_ignored(&self, root: &Path, entry: &str) -> bool {
        if entry.starts_with('.') || entry.starts_with(':') {
            return true;
        }
        let path = root.join(entry);
        path.is_dir() && self.tagger.store().exists(&path, SidecarKind::Ignore)
    }

    fn tag(&mut self, root: &Path, dir: &str) {
        match self.tagger.tag(root, dir) {
            Ok(TagOutcome::Renamed { from, to }) => self.log.record_renamed(from, to),
            Ok(TagOutcome::Unchanged(_)) => self.log.record_unchanged(),
            Ok(TagOutcome::Unknown(name)) => self.log.record_unknown(name),
            Ok(TagOutcome::MarkedIgnored(name)) => debug!("Marked \"{}\" as ignored.", name),
            Err(e) => error!("{}", e),
        }
    }

    /// Creates a directory named after the movie file and moves the file in.
    /// Returns the new directory name, or `None` if the user declined.
    fn mkdir_and_move(&mut self, root: &Path, file: &str) -> Result<Option<String>> {
        let stem = split_filename(file).0.to_string();
        let (ask, dir_mode) = (self.tagger.config().ask, self.tagger.config().dir_mode);

        if ask && !self.tagger.resolver_mut().confirm_move(file, &stem) {
            return Ok(None);
        }

        let dir = root.join(&stem);
        debug!("Creating directory \"{}\".", dir.display());
        fs::create_dir(&dir).map_err(|e| TagError::io(&dir, e))?;
        if let Some(mode) = dir_mode {
            apply_mode(&dir, mode);
        }

        debug!("Moving \"{}\" to \"{}\".", file, stem);
        if let Err(source) = fs::rename(root.join(file), dir.join(file)) {
            if let Err(e) = fs::remove_dir(&dir) {
                warn!("Could not remove \"{}\" again: {}", dir.display(), e);
            }
            return Err(TagError::Rename {
                from: file.to_string(),
                to: format!("{}/{}", stem, file),
                source,
            });
        }
        Ok(Some(stem))
    }
}
