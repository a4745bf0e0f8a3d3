//! The Movie Database (TMDb) backend.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use super::MovieLookupService;
use crate::error::LookupError;
use crate::movie::{Movie, MovieKind};

const API_BASE: &str = "https://api.themoviedb.org/3";
const MAX_PAGES: u32 = 5;

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchPage {
    #[serde(default)]
    results: Vec<TmdbMovie>,
    #[serde(default)]
    total_pages: u32,
}

impl From<TmdbMovie> for Movie {
    fn from(m: TmdbMovie) -> Self {
        // Only the year part of the release date is kept.
        let year = m
            .release_date
            .as_deref()
            .and_then(|d| d.get(0..4))
            .unwrap_or_default();
        let rating = match m.vote_average {
            Some(v) if v > 0.0 => v.to_string(),
            _ => String::new(),
        };

        // TMDb has neither an index nor a kind for movies.
        Movie::new(m.title, year, m.id.to_string())
            .with_kind(MovieKind::Movie)
            .with_rating(rating)
    }
}

/// The Movie Database backend.
///
/// Accepts either a v3 API key (sent as a query parameter) or a v4 read
/// access token (sent as a bearer header).
pub struct TmdbService {
    client: Client,
    credential: String,
}

impl TmdbService {
    /// Builds the client. An empty credential is accepted here and reported
    /// by the first request, so runs that never query still work.
    pub fn new(credential: impl Into<String>) -> Result<Self, LookupError> {
        let credential = credential.into().trim().to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("movietag/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, credential })
    }

    fn is_access_token(&self) -> bool {
        self.credential.starts_with("eyJ")
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(format!("{}{}", API_BASE, path));
        if self.is_access_token() {
            request.bearer_auth(&self.credential)
        } else {
            request.query(&[("api_key", self.credential.as_str())])
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }

    fn send(&self, request: RequestBuilder) -> Result<String, LookupError> {
        if !self.has_credential() {
            return Err(LookupError::MissingCredential);
        }
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }

    fn search_page(&self, query: &str, page: u32) -> Result<TmdbSearchPage, LookupError> {
        let page = page.to_string();
        let request = self
            .get("/search/movie")
            .query(&[("query", query), ("page", page.as_str())]);
        let body = self.send(request)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl MovieLookupService for TmdbService {
    fn name(&self) -> &'static str {
        "TMDb"
    }

    fn get_by_id(&self, id: &str) -> Result<Movie, LookupError> {
        debug!("Getting extended movie information for id {} from TMDb.", id);
        let body = match self.send(self.get(&format!("/movie/{}", id))) {
            Err(LookupError::Status(code)) if code == StatusCode::NOT_FOUND.as_u16() => {
                return Err(LookupError::NotFound(id.to_string()));
            }
            other => other?,
        };
        let movie: TmdbMovie = serde_json::from_str(&body)?;
        Ok(movie.into())
    }

    fn search(&self, query: &str, first_page_only: bool) -> Result<Vec<Movie>, LookupError> {
        debug!("Searching TMDb for \"{}\".", query);
        let first = self.search_page(query, 1)?;
        let last_page = if first_page_only {
            1
        } else {
            first.total_pages.min(MAX_PAGES)
        };

        let mut movies: Vec<Movie> = first.results.into_iter().map(Movie::from).collect();
        for page in 2..=last_page {
            let next = self.search_page(query, page)?;
            movies.extend(next.results.into_iter().map(Movie::from));
        }
        Ok(movies)
    }
}
