//! Immutable run configuration and its builder.

use crate::error::{Result, TagError};

/// Run options, fixed for the whole batch and handed to every component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagConfig {
    /// Confirm before moving loose movie files into their own directory.
    pub ask: bool,
    /// Strip sidecar files instead of renaming.
    pub clear: bool,
    /// Ignore cached `.name`/`.imdb` data and look everything up again.
    pub force: bool,
    /// No prompts; the first search result wins.
    pub offline: bool,
    /// Roll directories back to their `.original` name before re-tagging.
    pub recovery: bool,
    pub quiet: bool,
    pub summary: bool,
    pub tv_label: bool,
    /// Mode applied to created sidecar files.
    pub file_mode: Option<u32>,
    /// Mode applied to directories created for loose movie files.
    pub dir_mode: Option<u32>,
}

impl TagConfig {
    /// Whether the end-of-run summary should be printed.
    pub fn wants_summary(&self) -> bool {
        self.summary || self.offline
    }
}

pub struct ConfigBuilder {
    config: TagConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TagConfig::default(),
        }
    }

    pub fn ask(mut self, on: bool) -> Self {
        self.config.ask = on;
        self
    }

    pub fn clear(mut self, on: bool) -> Self {
        self.config.clear = on;
        self
    }

    pub fn force(mut self, on: bool) -> Self {
        self.config.force = on;
        self
    }

    pub fn offline(mut self, on: bool) -> Self {
        self.config.offline = on;
        self
    }

    pub fn recovery(mut self, on: bool) -> Self {
        self.config.recovery = on;
        self
    }

    pub fn quiet(mut self, on: bool) -> Self {
        self.config.quiet = on;
        self
    }

    pub fn summary(mut self, on: bool) -> Self {
        self.config.summary = on;
        self
    }

    pub fn tv_label(mut self, on: bool) -> Self {
        self.config.tv_label = on;
        self
    }

    pub fn file_mode(mut self, mode: Option<u32>) -> Self {
        self.config.file_mode = mode;
        self
    }

    pub fn dir_mode(mut self, mode: Option<u32>) -> Self {
        self.config.dir_mode = mode;
        self
    }

    pub fn build(self) -> Result<TagConfig> {
        if self.config.recovery && self.config.offline {
            return Err(TagError::Config(
                "recovery mode and offline mode are incompatible".to_string(),
            ));
        }
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a permission literal such as `664` in octal base.
pub fn parse_mode(literal: &str) -> Result<u32> {
    let mode = u32::from_str_radix(literal.trim(), 8).map_err(|_| {
        TagError::Config(format!("illegal permission specification \"{}\"", literal))
    })?;
    if mode > 0o7777 {
        return Err(TagError::Config(format!(
            "permission {:o} is out of range",
            mode
        )));
    }
    Ok(mode)
}
