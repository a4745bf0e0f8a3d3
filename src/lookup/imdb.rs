//! IMDb backend: suggestion search plus title page scraping.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::MovieLookupService;
use crate::error::LookupError;
use crate::movie::{Movie, MovieKind};

const SUGGESTION_BASE: &str = "https://v2.sg.media-imdb.com/suggestion";
const TITLE_BASE: &str = "https://www.imdb.com/title";

#[derive(Debug, Deserialize)]
struct Suggestions {
    #[serde(default)]
    d: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    id: String,
    #[serde(default)]
    l: String,
    #[serde(default)]
    y: Option<u32>,
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    qid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkedData {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "datePublished", default)]
    date_published: Option<String>,
    #[serde(rename = "aggregateRating", default)]
    aggregate_rating: Option<AggregateRating>,
}

#[derive(Debug, Deserialize)]
struct AggregateRating {
    #[serde(rename = "ratingValue", default)]
    rating_value: Option<Value>,
}

fn kind_from_qid(qid: Option<&str>, label: Option<&str>) -> MovieKind {
    match qid {
        Some("movie") => MovieKind::Movie,
        Some("tvSeries") | Some("tvMiniSeries") => MovieKind::TvSeries,
        other => MovieKind::Other(
            label
                .or(other)
                .unwrap_or("unknown")
                .to_lowercase(),
        ),
    }
}

fn strip_tt(id: &str) -> &str {
    id.strip_prefix("tt").unwrap_or(id)
}

fn decode_entities(text: &str) -> String {
    text.replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Keeps letters, digits and spaces; spaces become underscores as the
/// suggestion endpoint expects.
fn suggestion_key(query: &str) -> String {
    query
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

impl From<Suggestion> for Movie {
    fn from(s: Suggestion) -> Self {
        let kind = kind_from_qid(s.qid.as_deref(), s.q.as_deref());
        Movie::new(
            s.l,
            s.y.map(|y| y.to_string()).unwrap_or_default(),
            strip_tt(&s.id),
        )
        .with_kind(kind)
    }
}

/// IMDb backend. Searches through the public suggestion endpoint and scrapes
/// the title page for extended information.
pub struct ImdbService {
    client: Client,
}

impl ImdbService {
    pub fn new() -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self { client })
    }

    fn parse_title_page(id: &str, html: &str) -> Result<Movie, LookupError> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(r#"script[type="application/ld+json"]"#)
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        let script = document
            .select(&selector)
            .next()
            .ok_or_else(|| LookupError::Parse(format!("no structured data for tt{}", id)))?;
        let data: LinkedData = serde_json::from_str(&script.text().collect::<String>())?;

        let year = data
            .date_published
            .as_deref()
            .and_then(|d| d.get(0..4))
            .unwrap_or_default();
        let rating = match data.aggregate_rating.and_then(|r| r.rating_value) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        let kind = match data.kind.as_str() {
            "Movie" => MovieKind::Movie,
            "TVSeries" => MovieKind::TvSeries,
            other => MovieKind::Other(other.to_lowercase()),
        };

        Ok(Movie::new(decode_entities(&data.name), year, id)
            .with_kind(kind)
            .with_rating(rating))
    }
}

impl MovieLookupService for ImdbService {
    fn name(&self) -> &'static str {
        "IMDb"
    }

    fn get_by_id(&self, id: &str) -> Result<Movie, LookupError> {
        let id = strip_tt(id);
        debug!("Getting extended movie information for id {} from IMDb.", id);

        let response = self.client.get(format!("{}/tt{}/", TITLE_BASE, id)).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        Self::parse_title_page(id, &response.text()?)
    }

    // The suggestion endpoint has a single page, so `first_page_only` has
    // nothing to restrict.
    fn search(&self, query: &str, _first_page_only: bool) -> Result<Vec<Movie>, LookupError> {
        let key = suggestion_key(query);
        let Some(first) = key.chars().next() else {
            return Ok(Vec::new());
        };
        debug!("Searching IMDb for \"{}\".", query);

        let url = format!("{}/{}/{}.json", SUGGESTION_BASE, first, key);
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let suggestions: Suggestions = serde_json::from_str(&response.text()?)?;
        Ok(suggestions
            .d
            .into_iter()
            .filter(|s| s.id.starts_with("tt"))
            .map(Movie::from)
            .collect())
    }
}
