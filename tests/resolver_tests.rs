// Integration tests for the interactive and automatic resolvers

mod common;

use common::*;
use movie_tag::resolver::{AutomaticResolver, Choice, InteractiveResolver, Resolver};

fn run_interactive(input: &str, query: &str) -> (Choice, String, Calls) {
    let (lookup, calls) = FakeLookup::new(vec![heat_1986(), heat(), alien()]);
    let mut resolver = InteractiveResolver::new(input.as_bytes(), Vec::new(), false);
    let choice = resolver.choose(query, &lookup).unwrap();
    let (_, output) = resolver.into_inner();
    (choice, String::from_utf8(output).unwrap(), calls)
}

fn plain(movie: movie_tag::Movie) -> movie_tag::Movie {
    movie.with_rating("")
}

#[test]
fn test_enter_picks_first_result() {
    let (choice, output, _) = run_interactive("\n\n\n", "Heat");

    assert_eq!(choice.movie, Some(plain(heat_1986())));
    assert_eq!(choice.custom_title, "");
    assert!(output.contains("Results for query \"Heat\":"));
    assert!(output.contains(" 1: Heat (1986)\n"));
    assert!(output.contains(" 2: Heat (1995)\n"));
    assert!(output.contains("You selected \"Heat (1986)\". Is this correct? [y]|n: "));
}

#[test]
fn test_pick_by_number_with_custom_title() {
    let (choice, _, _) = run_interactive("2\ny\nHeat Extended\ny\n", "Heat");

    assert_eq!(choice.movie, Some(plain(heat())));
    assert_eq!(choice.custom_title, "Heat Extended");
}

#[test]
fn test_declined_selection_asks_again() {
    let (choice, _, _) = run_interactive("1\nn\n2\n\n\n", "Heat");
    assert_eq!(choice.movie, Some(plain(heat())));
}

#[test]
fn test_invalid_number_asks_again() {
    let (choice, output, _) = run_interactive("7\n0\n1\n\n\n", "Heat");

    assert_eq!(output.matches("Invalid number.").count(), 2);
    assert_eq!(choice.movie, Some(plain(heat_1986())));
}

#[test]
fn test_ignore_directory() {
    let (choice, output, _) = run_interactive("i\n\n", "Heat");

    assert_eq!(choice, Choice::default());
    assert!(output.contains("You have chosen to ignore this directory."));
}

#[test]
fn test_new_search_by_text() {
    let (choice, output, calls) = run_interactive("alien\n\n\n\n", "Heat");

    assert_eq!(calls.searches.get(), 2);
    assert!(output.contains("Results for query \"alien\":"));
    assert_eq!(choice.movie, Some(plain(alien())));
}

#[test]
fn test_large_number_is_looked_up_as_id() {
    // 5000 is no list position, so it is queried as an id; nothing is found
    // and enter on the empty list skips the lookup.
    let (choice, output, calls) = run_interactive("5000\n\n\n", "Heat");

    assert_eq!(calls.by_id.get(), 1);
    assert!(output.contains("No results found."));
    assert_eq!(choice.movie, None);
}

#[test]
fn test_custom_name_without_movie() {
    let (choice, _, _) = run_interactive("i\nMy Home Video\n\n", "Heat");

    assert_eq!(choice.movie, None);
    assert_eq!(choice.custom_title, "My Home Video");
}

#[test]
fn test_end_of_input_ignores() {
    let (choice, _, _) = run_interactive("", "Heat");
    assert_eq!(choice, Choice::default());
}

#[test]
fn test_confirm_prompt() {
    let mut resolver = InteractiveResolver::new("maybe\nN\n".as_bytes(), Vec::new(), false);
    assert!(!resolver.confirm_move("Heat.mkv", "Heat"));

    let (_, output) = resolver.into_inner();
    let output = String::from_utf8(output).unwrap();
    assert!(output.starts_with(
        "Do you want to move the file \"Heat.mkv\" to the directory \"Heat\"? [y]|n: "
    ));
    assert!(output.contains("Please enter y or n."));
}

#[test]
fn test_automatic_resolver_is_deterministic() {
    let (lookup, calls) = FakeLookup::new(vec![heat_1986(), heat()]);
    let mut resolver = AutomaticResolver::new(false);

    let first = resolver.choose("Heat", &lookup).unwrap();
    let second = resolver.choose("Heat", &lookup).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.movie, Some(plain(heat_1986())));
    assert_eq!(first.custom_title, "");
    assert_eq!(calls.searches.get(), 2);
    assert!(resolver.confirm_move("Heat.mkv", "Heat"));
}

#[test]
fn test_automatic_resolver_without_results() {
    let (lookup, _) = FakeLookup::new(vec![heat()]);
    let mut resolver = AutomaticResolver::new(false);

    assert_eq!(resolver.choose("Alien", &lookup).unwrap(), Choice::default());
}
