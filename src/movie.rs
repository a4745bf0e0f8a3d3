//! Matched movie value and its directory-name formatting.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static COLON_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w):\s").expect("valid colon pattern"));
static AMPERSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*&\s*").expect("valid ampersand pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieKind {
    Movie,
    TvSeries,
    /// Anything else the backend reports (short, video game, ...), kept as its label.
    Other(String),
}

impl MovieKind {
    pub fn label(&self) -> &str {
        match self {
            MovieKind::Movie => "movie",
            MovieKind::TvSeries => "tv series",
            MovieKind::Other(label) => label,
        }
    }
}

/// One matched movie as reported by a lookup backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub title: String,
    /// Release year, empty when the backend does not know it.
    pub year: String,
    /// Roman numeral telling apart titles released the same year, or empty.
    pub index: String,
    pub id: String,
    pub kind: MovieKind,
    pub rating: String,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            index: String::new(),
            id: id.into(),
            kind: MovieKind::Movie,
            rating: String::new(),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn with_kind(mut self, kind: MovieKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    /// Canonical directory name, e.g. `Spider-Man - Homecoming (2017)`.
    ///
    /// The index is only shown from `II` on. `tv_label` appends
    /// ` (TV Series)` for series.
    pub fn nice_title(&self, tv_label: bool) -> String {
        let year = if !self.index.is_empty() && self.index != "I" {
            format!("({}-{})", self.year, self.index)
        } else {
            format!("({})", self.year)
        };

        let title = COLON_SEPARATOR.replace_all(&self.title, "$1 - ");
        let title = AMPERSAND.replace_all(&title, " and ");
        let title = title.replace('/', "-");

        let mut name = format!("{} {}", title, year);
        if self.kind == MovieKind::TvSeries && tv_label {
            name.push_str(" (TV Series)");
        }
        name
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nice_title(false))
    }
}
