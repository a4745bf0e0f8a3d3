//! How a search query becomes a chosen movie.
//!
//! Offline runs pick the first hit without asking; interactive runs walk the
//! user through the result list over any line-based reader/writer pair.

use std::io::{BufRead, Write};

use tracing::{debug, error};

use crate::error::Result;
use crate::lookup::{self, MovieLookupService};
use crate::movie::{Movie, MovieKind};

/// Outcome of resolving one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choice {
    pub movie: Option<Movie>,
    /// Name typed by the user instead of the movie's own title; empty if none.
    pub custom_title: String,
}

pub trait Resolver {
    fn choose(&mut self, query: &str, service: &dyn MovieLookupService) -> Result<Choice>;

    /// Asks whether a loose movie file may be moved into a new directory.
    fn confirm_move(&mut self, file: &str, dir: &str) -> bool;
}

/// Deterministic resolver for unattended runs.
#[derive(Debug, Default)]
pub struct AutomaticResolver {
    tv_label: bool,
}

impl AutomaticResolver {
    pub fn new(tv_label: bool) -> Self {
        Self { tv_label }
    }
}

impl Resolver for AutomaticResolver {
    fn choose(&mut self, query: &str, service: &dyn MovieLookupService) -> Result<Choice> {
        let results = lookup::search(service, query, self.tv_label)?;
        let movie = results.into_iter().next();
        match &movie {
            Some(m) => debug!(
                "Offline mode: returning match \"{}\" for query \"{}\".",
                m.nice_title(self.tv_label),
                query
            ),
            None => debug!("Offline mode: no match found for \"{}\".", query),
        }
        Ok(Choice {
            movie,
            custom_title: String::new(),
        })
    }

    fn confirm_move(&mut self, _file: &str, _dir: &str) -> bool {
        true
    }
}

/// Prompting resolver; reads answers line by line from `input`.
///
/// End of input counts as "ignore this directory" so a closed stdin can
/// never keep the loop spinning.
pub struct InteractiveResolver<R, W> {
    input: R,
    output: W,
    tv_label: bool,
}

impl<R: BufRead, W: Write> InteractiveResolver<R, W> {
    pub fn new(input: R, output: W, tv_label: bool) -> Self {
        Self {
            input,
            output,
            tv_label,
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = write!(self.output, "{}", text).and_then(|_| self.output.flush()) {
            error!("Could not write to terminal: {}", e);
        }
    }

    /// Reads one answer without its line ending; `None` at end of input.
    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => {
                error!("Could not read answer: {}", e);
                None
            }
        }
    }

    /// `[y]|n` style question. Empty answer or end of input gives `default`.
    pub fn confirm(&mut self, prompt: &str, default: bool) -> bool {
        let options = if default { "[y]|n" } else { "[n]|y" };
        loop {
            self.say(&format!("{} {}: ", prompt, options));
            match self.read_answer().as_deref() {
                None | Some("") => return default,
                Some("y") | Some("Y") => return true,
                Some("n") | Some("N") => return false,
                Some(_) => self.say("Please enter y or n.\n"),
            }
        }
    }

    fn print_movie_list(&mut self, query: &str, results: &[Movie]) {
        if results.is_empty() {
            return;
        }
        let header = format!("Results for query \"{}\":", query);
        let mut text = format!("{}\n{}\n", header, "=".repeat(header.chars().count()));
        for (i, movie) in results.iter().enumerate() {
            let mut title = movie.nice_title(self.tv_label);
            if let MovieKind::Other(label) = &movie.kind {
                title = format!("{} ({})", title, label);
            }
            text.push_str(&format!("{:2}: {}\n", i + 1, title));
        }
        self.say(&text);
    }

    /// Re-runs a query typed at the prompt and shows the new list.
    fn requery(&mut self, text: &str, service: &dyn MovieLookupService) -> Result<Vec<Movie>> {
        let results = lookup::query(service, text, self.tv_label)?;
        self.print_movie_list(text, &results);
        Ok(results)
    }

    fn select_movie(
        &mut self,
        query: &str,
        service: &dyn MovieLookupService,
    ) -> Result<Option<Movie>> {
        self.say(&format!("Searching for movie '{}'\n", query));
        let mut results = lookup::search(service, query, self.tv_label)?;
        self.print_movie_list(query, &results);

        loop {
            if results.is_empty() {
                self.say(
                    "No results found. Please enter a new string to search for, or just\n\
                     press enter to skip the lookup.\n",
                );
            } else {
                self.say(
                    "Enter correct # or enter another name for a new search.\n\
                     Just press enter to choose the first entry.\n\
                     Enter 'i' if you don't want to look up this movie.\n",
                );
            }
            self.say("> ");

            let Some(mut answer) = self.read_answer() else {
                return Ok(None);
            };
            if answer.is_empty() && !results.is_empty() {
                answer = "1".to_string();
            }
            if answer == "i" || answer.is_empty() {
                return Ok(None);
            }

            if !answer.chars().all(|c| c.is_ascii_digit()) {
                results = self.requery(&answer, service)?;
                continue;
            }

            // Numbers above 1000 cannot be list positions, so they are taken
            // as a lookup id. Ambiguous for short ids, kept for compatibility.
            let number: u64 = answer.parse().unwrap_or(u64::MAX);
            if number > 1000 {
                results = self.requery(&answer, service)?;
                continue;
            }
            if number < 1 || number as usize > results.len() {
                self.say("Invalid number.\n");
                continue;
            }

            let movie = results[number as usize - 1].clone();
            let prompt = format!(
                "You selected \"{}\". Is this correct?",
                movie.nice_title(self.tv_label)
            );
            if self.confirm(&prompt, true) {
                return Ok(Some(movie));
            }
        }
    }

    fn ask_custom_title(&mut self, movie: Option<&Movie>) -> String {
        loop {
            if movie.is_none() {
                self.say(
                    "Enter the name for this movie, or enter to ignore this directory \
                     in future.\n> ",
                );
            } else {
                self.say(
                    "Enter a custom title for this movie, or just enter if the name is fine.\n> ",
                );
            }

            let Some(name) = self.read_answer() else {
                return String::new();
            };

            if !name.is_empty() {
                if self.confirm(&format!("You entered \"{}\". Please confirm", name), true) {
                    return name;
                }
            } else if movie.is_none() {
                if self.confirm("You have chosen to ignore this directory. Please confirm", true) {
                    return name;
                }
            } else {
                return name;
            }
        }
    }
}

impl<R: BufRead, W: Write> Resolver for InteractiveResolver<R, W> {
    fn choose(&mut self, query: &str, service: &dyn MovieLookupService) -> Result<Choice> {
        let movie = self.select_movie(query, service)?;
        let custom_title = self.ask_custom_title(movie.as_ref());
        Ok(Choice { movie, custom_title })
    }

    fn confirm_move(&mut self, file: &str, dir: &str) -> bool {
        self.confirm(
            &format!("Do you want to move the file \"{}\" to the directory \"{}\"?", file, dir),
            true,
        )
    }
}

