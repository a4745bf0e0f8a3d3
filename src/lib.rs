//! Renames movie directories to a canonical `Title (Year)` form using a
//! movie metadata service, with per-directory sidecar files for caching and
//! recovery.

pub mod batch;
pub mod config;
pub mod error;
pub mod lookup;
pub mod movie;
pub mod notifications;
pub mod resolver;
pub mod sidecar;
pub mod tagger;
pub mod title_parser;

pub use batch::BatchProcessor;
pub use config::{ConfigBuilder, TagConfig};
pub use error::{LookupError, Result, TagError};
pub use movie::{Movie, MovieKind};
pub use tagger::{DirectoryTagger, TagOutcome};
