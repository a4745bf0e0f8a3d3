//! Movie metadata backends.
//!
//! The tagger only talks to [`MovieLookupService`]; each backend turns its
//! own wire format into [`Movie`] values.

pub mod imdb;
pub mod tmdb;

use tracing::debug;

use crate::error::LookupError;
use crate::movie::Movie;

pub use imdb::ImdbService;
pub use tmdb::TmdbService;

pub trait MovieLookupService {
    /// Short backend name used in log lines.
    fn name(&self) -> &'static str;

    /// Fetches one movie with its extended information (rating).
    fn get_by_id(&self, id: &str) -> Result<Movie, LookupError>;

    /// Searches by title. Results keep the backend's relevance order.
    fn search(&self, query: &str, first_page_only: bool) -> Result<Vec<Movie>, LookupError>;
}

/// Searches by title and moves an exact title match to the top. Titles
/// made only of digits ("300", "1917") are searched like any other.
pub fn search(
    service: &dyn MovieLookupService,
    title: &str,
    tv_label: bool,
) -> Result<Vec<Movie>, LookupError> {
    let mut results = service.search(title, true)?;
    debug!("Found {} possible movies on {}.", results.len(), service.name());
    move_to_top_if_exists(&mut results, title, tv_label);
    Ok(results)
}

/// Runs a query typed by the user: all-digit text is taken as an id,
/// anything else is searched by title.
pub fn query(
    service: &dyn MovieLookupService,
    text: &str,
    tv_label: bool,
) -> Result<Vec<Movie>, LookupError> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return search(service, text, tv_label);
    }

    match service.get_by_id(text) {
        Ok(movie) => Ok(vec![movie]),
        Err(LookupError::NotFound(_)) => {
            debug!("No movie with id {} on {}.", text, service.name());
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn move_to_top_if_exists(results: &mut Vec<Movie>, text: &str, tv_label: bool) {
    let found = results
        .iter()
        .skip(1)
        .position(|m| m.nice_title(tv_label) == text);

    if let Some(pos) = found {
        let movie = results.remove(pos + 1);
        results.insert(0, movie);
        debug!("Found \"{}\" in the list, moving to top.", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubService {
        results: Vec<Movie>,
        searches: RefCell<Vec<String>>,
    }

    impl MovieLookupService for StubService {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn get_by_id(&self, id: &str) -> Result<Movie, LookupError> {
            self.results
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .ok_or_else(|| LookupError::NotFound(id.to_string()))
        }

        fn search(&self, query: &str, _first_page_only: bool) -> Result<Vec<Movie>, LookupError> {
            self.searches.borrow_mut().push(query.to_string());
            Ok(self.results.clone())
        }
    }

    fn stub() -> StubService {
        StubService {
            results: vec![
                Movie::new("Heat", "1986", "1"),
                Movie::new("Heat", "1995", "949"),
            ],
            searches: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_digits_query_by_id() {
        let service = stub();
        let results = query(&service, "949", false).unwrap();
        assert_eq!(results, vec![Movie::new("Heat", "1995", "949")]);
        assert!(service.searches.borrow().is_empty());

        assert!(query(&service, "12345", false).unwrap().is_empty());
    }

    #[test]
    fn test_exact_match_moved_to_top() {
        let service = stub();
        let results = query(&service, "Heat (1995)", false).unwrap();
        assert_eq!(results[0].id, "949");
        assert_eq!(results[1].id, "1");
        assert_eq!(service.searches.borrow().as_slice(), ["Heat (1995)"]);
    }

    #[test]
    fn test_numeric_title_is_searched() {
        let service = stub();
        let results = search(&service, "949", false).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(service.searches.borrow().as_slice(), ["949"]);
    }
}
