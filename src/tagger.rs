//! Per-directory tagging: decide whether to reuse cached data, look the
//! movie up, rename, mark ignored or roll back.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::config::TagConfig;
use crate::error::{LookupError, Result, TagError};
use crate::lookup::MovieLookupService;
use crate::movie::Movie;
use crate::resolver::Resolver;
use crate::sidecar::{SidecarKind, SidecarStore};
use crate::title_parser::TitleParser;

static UNRATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)unrated").expect("valid unrated pattern"));
static DIRECTORS_CUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)director.?s.?cut").expect("valid director's cut pattern")
});
static TELESYNC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)telesync").expect("valid telesync pattern"));
static REMASTERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)remastered").expect("valid remastered pattern"));

/// Terminal state of one `tag` call. Failures come back as [`TagError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Renamed { from: String, to: String },
    /// The directory already carries its correct name.
    Unchanged(String),
    /// No movie was chosen; the directory got an `.ignore` marker.
    MarkedIgnored(String),
    /// Offline run without a match; left for the summary.
    Unknown(String),
}

/// Appends edition markers found in the original directory name.
///
/// Attributes are not part of any metadata, so `original` must be the name
/// the directory had before lookup, never the matched title.
pub fn add_title_attributes(original: &str, title: &str) -> String {
    let unrated = UNRATED.is_match(original);
    let directors_cut = DIRECTORS_CUT.is_match(original);

    let mut name = title.to_string();
    match (unrated, directors_cut) {
        (true, true) => name.push_str(" (Unrated Director's Cut)"),
        (true, false) => name.push_str(" (Unrated)"),
        (false, true) => name.push_str(" (Director's Cut)"),
        (false, false) => {}
    }
    if REMASTERED.is_match(original) {
        name.push_str(" (remastered)");
    }
    if TELESYNC.is_match(original) {
        name.push_str(" TELESYNC");
    }
    name
}

pub struct DirectoryTagger {
    config: TagConfig,
    store: SidecarStore,
    lookup: Box<dyn MovieLookupService>,
    parser: Box<dyn TitleParser>,
    resolver: Box<dyn Resolver>,
}

impl DirectoryTagger {
    pub fn new(
        config: TagConfig,
        lookup: Box<dyn MovieLookupService>,
        parser: Box<dyn TitleParser>,
        resolver: Box<dyn Resolver>,
    ) -> Self {
        let store = SidecarStore::new(config.file_mode);
        Self {
            config,
            store,
            lookup,
            parser,
            resolver,
        }
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    pub fn store(&self) -> &SidecarStore {
        &self.store
    }

    pub fn resolver_mut(&mut self) -> &mut dyn Resolver {
        self.resolver.as_mut()
    }

    /// Tags the directory `dir` inside `root`.
    pub fn tag(&mut self, root: &Path, dir: &str) -> Result<TagOutcome> {
        let path = root.join(dir);
        debug!("Verifying whether \"{}\" is a valid directory.", path.display());
        if !path.is_dir() {
            return Err(TagError::NotFound(format!("directory \"{}\"", path.display())));
        }

        let mut current = dir.to_string();
        if self.config.recovery {
            if !self.store.exists(&path, SidecarKind::Original) {
                return Err(TagError::NotFound(format!(
                    "no .original file in \"{}\", skipping it in recovery mode",
                    dir
                )));
            }
            let original = self.store.read(&path, SidecarKind::Original)?;
            match self.recover(root, dir, &original) {
                Ok(()) => current = original,
                Err(e) => error!(
                    "Could not rename \"{}\" to \"{}\" in recovery mode: {}",
                    dir, original, e
                ),
            }
        }

        let name = self.resolve_name(root, &current)?;
        debug!("Resolved name for \"{}\" is \"{}\".", current, name);

        if name.is_empty() {
            if self.config.offline {
                return Ok(TagOutcome::Unknown(current));
            }
            if let Err(e) = self.store.mark_ignored(&root.join(&current)) {
                error!("Could not mark \"{}\" as ignored: {}", current, e);
            }
            return Ok(TagOutcome::MarkedIgnored(current));
        }

        self.rename_directory(root, &current, &name)
    }

    /// Clears the cached state and moves `dir` back to its first name.
    fn recover(&self, root: &Path, dir: &str, original: &str) -> Result<()> {
        if original.is_empty() {
            return Err(TagError::NotFound(format!("empty .original file in \"{}\"", dir)));
        }
        debug!(
            "Recovery mode: clearing directory \"{}\" and renaming it to \"{}\".",
            dir, original
        );
        self.store.clear(&root.join(dir))?;

        if dir == original {
            return Ok(());
        }
        let target = root.join(original);
        if target.exists() {
            return Err(TagError::Conflict {
                from: dir.to_string(),
                to: original.to_string(),
            });
        }
        fs::rename(root.join(dir), &target).map_err(|source| TagError::Rename {
            from: dir.to_string(),
            to: original.to_string(),
            source,
        })
    }

    /// The name `dir` should carry, or an empty string if no movie applies.
    ///
    /// A cached `.name` is returned as is unless force mode is on.
    pub fn resolve_name(&mut self, root: &Path, dir: &str) -> Result<String> {
        let path = root.join(dir);
        let has_name = self.store.exists(&path, SidecarKind::Name);

        if has_name && !self.config.force {
            debug!("Using name from file for \"{}\".", dir);
            return self.store.read(&path, SidecarKind::Name);
        }

        if has_name {
            debug!("Looking up \"{}\" because force mode is enabled.", dir);
        } else {
            debug!("No name file found for \"{}\", looking up.", dir);
        }

        let (_, name) = self.lookup_for_directory(&path, dir)?;
        if name.is_empty() {
            return Ok(name);
        }

        let name = add_title_attributes(dir, &name);
        self.persist(&path, SidecarKind::Name, &name);
        Ok(name)
    }

    /// Finds the movie for `dir`, through the cached id when there is one.
    fn lookup_for_directory(
        &mut self,
        path: &Path,
        dir: &str,
    ) -> Result<(Option<Movie>, String)> {
        let mut cached = None;
        if !self.config.force && self.store.exists(path, SidecarKind::Imdb) {
            let id = self.store.read(path, SidecarKind::Imdb)?;
            debug!("Found .imdb file for \"{}\" with id {}.", dir, id);
            match self.lookup.get_by_id(&id) {
                Ok(movie) => {
                    let name = movie.nice_title(self.config.tv_label);
                    cached = Some((Some(movie), name));
                }
                Err(LookupError::NotFound(_)) => {
                    warn!("Cached id {} for \"{}\" is unknown, searching again.", id, dir);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let (movie, name) = match cached {
            Some(found) => found,
            None => {
                let query = self.parser.clean_title(dir);
                self.movie_by_name(&query)?
            }
        };

        if let Some(movie) = &movie {
            self.persist(path, SidecarKind::Imdb, &movie.id);
            self.persist(path, SidecarKind::Rating, &movie.rating);
        }
        Ok((movie, name))
    }

    fn movie_by_name(&mut self, query: &str) -> Result<(Option<Movie>, String)> {
        debug!("Looking up \"{}\" on {}.", query, self.lookup.name());
        let choice = self.resolver.choose(query, self.lookup.as_ref())?;

        let mut name = choice.custom_title;
        let Some(found) = choice.movie else {
            return Ok((None, name));
        };
        if name.is_empty() {
            name = found.nice_title(self.config.tv_label);
        }

        // Search hits lack the extended information such as the rating.
        let movie = match self.lookup.get_by_id(&found.id) {
            Ok(movie) => movie,
            Err(e) => {
                warn!("Could not fetch details for id {}: {}", found.id, e);
                found
            }
        };
        Ok((Some(movie), name))
    }

    /// Renames `dir` to `name`, remembering the first name in `.original`.
    pub fn rename_directory(&self, root: &Path, dir: &str, name: &str) -> Result<TagOutcome> {
        if dir == name {
            info!("Directory \"{}\" is already named right.", dir);
            return Ok(TagOutcome::Unchanged(name.to_string()));
        }

        let new = root.join(name);
        if new.exists() {
            return Err(TagError::Conflict {
                from: dir.to_string(),
                to: name.to_string(),
            });
        }

        info!("Renaming \"{}\" to \"{}\".", dir, name);
        fs::rename(root.join(dir), &new).map_err(|source| TagError::Rename {
            from: dir.to_string(),
            to: name.to_string(),
            source,
        })?;

        if !self.store.exists(&new, SidecarKind::Original) {
            self.persist(&new, SidecarKind::Original, dir);
        }
        Ok(TagOutcome::Renamed {
            from: dir.to_string(),
            to: name.to_string(),
        })
    }

    fn persist(&self, dir: &Path, kind: SidecarKind, value: &str) {
        if let Err(e) = self.store.write(dir, kind, value) {
            error!("Could not write {}: {}", kind.file_name(), e);
        }
    }
}
