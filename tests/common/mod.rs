// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use movie_tag::lookup::MovieLookupService;
use movie_tag::resolver::{AutomaticResolver, Resolver};
use movie_tag::sidecar::{SidecarKind, SidecarStore};
use movie_tag::title_parser::ReleaseNameParser;
use movie_tag::{DirectoryTagger, LookupError, Movie, TagConfig};

/// Counts how often the backend was asked.
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub searches: Rc<Cell<usize>>,
    pub by_id: Rc<Cell<usize>>,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.searches.get() + self.by_id.get()
    }
}

/// In-memory backend. A search returns, in order, every movie whose title
/// appears in the query.
pub struct FakeLookup {
    pub movies: Vec<Movie>,
    pub calls: Calls,
}

impl FakeLookup {
    pub fn new(movies: Vec<Movie>) -> (Self, Calls) {
        let calls = Calls::default();
        (
            Self {
                movies,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl MovieLookupService for FakeLookup {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn get_by_id(&self, id: &str) -> Result<Movie, LookupError> {
        self.calls.by_id.set(self.calls.by_id.get() + 1);
        self.movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }

    fn search(&self, query: &str, _first_page_only: bool) -> Result<Vec<Movie>, LookupError> {
        self.calls.searches.set(self.calls.searches.get() + 1);
        let query = query.to_lowercase();
        // Search hits carry no rating; get_by_id adds it.
        Ok(self
            .movies
            .iter()
            .filter(|m| query.contains(&m.title.to_lowercase()))
            .map(|m| m.clone().with_rating(""))
            .collect())
    }
}

pub fn heat() -> Movie {
    Movie::new("Heat", "1995", "949").with_rating("7.9")
}

pub fn heat_1986() -> Movie {
    Movie::new("Heat", "1986", "1").with_rating("5.1")
}

pub fn alien() -> Movie {
    Movie::new("Alien", "1979", "348").with_rating("8.1")
}

pub fn offline_config() -> TagConfig {
    TagConfig {
        offline: true,
        ..TagConfig::default()
    }
}

pub fn tagger_with(config: TagConfig, movies: Vec<Movie>) -> (DirectoryTagger, Calls) {
    let resolver: Box<dyn Resolver> = Box::new(AutomaticResolver::new(config.tv_label));
    tagger_with_resolver(config, movies, resolver)
}

pub fn tagger_with_resolver(
    config: TagConfig,
    movies: Vec<Movie>,
    resolver: Box<dyn Resolver>,
) -> (DirectoryTagger, Calls) {
    let (lookup, calls) = FakeLookup::new(movies);
    let tagger = DirectoryTagger::new(
        config,
        Box::new(lookup),
        Box::new(ReleaseNameParser::new()),
        resolver,
    );
    (tagger, calls)
}

pub fn read_sidecar(dir: &Path, kind: SidecarKind) -> String {
    SidecarStore::default().read(dir, kind).unwrap()
}

pub fn sidecars(dir: &Path) -> Vec<&'static str> {
    SidecarKind::ALL
        .iter()
        .filter(|kind| dir.join(kind.file_name()).exists())
        .map(|kind| kind.file_name())
        .collect()
}

pub fn make_dir(root: &Path, name: &str) {
    fs::create_dir(root.join(name)).unwrap();
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a subscriber that records warnings and errors.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
