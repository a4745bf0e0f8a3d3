// Integration tests for the sidecar file store

use std::fs;

use movie_tag::TagError;
use movie_tag::sidecar::{SidecarKind, SidecarStore};
use tempfile::TempDir;

#[test]
fn test_imdb_ids_carry_prefix_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = SidecarStore::default();

    store.write(dir.path(), SidecarKind::Imdb, "0133093").unwrap();

    assert_eq!(fs::read_to_string(dir.path().join(".imdb")).unwrap(), "tt0133093\n");
    assert_eq!(store.read(dir.path(), SidecarKind::Imdb).unwrap(), "0133093");
}

#[test]
fn test_read_takes_first_line_only() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".name"), "Heat (1995)\nleftover\n").unwrap();

    let store = SidecarStore::default();
    assert_eq!(store.read(dir.path(), SidecarKind::Name).unwrap(), "Heat (1995)");
}

#[test]
fn test_read_missing_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = SidecarStore::default();

    assert!(!store.exists(dir.path(), SidecarKind::Rating));
    assert!(matches!(
        store.read(dir.path(), SidecarKind::Rating),
        Err(TagError::NotFound(_))
    ));
}

#[test]
fn test_ignore_marker_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = SidecarStore::default();

    store.mark_ignored(dir.path()).unwrap();

    assert!(store.exists(dir.path(), SidecarKind::Ignore));
    assert_eq!(fs::read_to_string(dir.path().join(".ignore")).unwrap(), "");
}

#[test]
fn test_clear_keeps_original() {
    let dir = TempDir::new().unwrap();
    let store = SidecarStore::default();
    for kind in SidecarKind::ALL {
        store.write(dir.path(), kind, "value").unwrap();
    }

    store.clear(dir.path()).unwrap();

    for kind in SidecarKind::CLEARABLE {
        assert!(!store.exists(dir.path(), kind), "{} survived", kind.file_name());
    }
    assert_eq!(store.read(dir.path(), SidecarKind::Original).unwrap(), "value");
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let store = SidecarStore::default();

    let result = store.write(&dir.path().join("gone"), SidecarKind::Name, "x");
    assert!(matches!(result, Err(TagError::Io { .. })));
}

#[test]
fn test_remove() {
    let dir = TempDir::new().unwrap();
    let store = SidecarStore::default();
    store.write(dir.path(), SidecarKind::Rating, "7.9").unwrap();

    store.remove(dir.path(), SidecarKind::Rating).unwrap();

    assert!(!store.exists(dir.path(), SidecarKind::Rating));
    assert!(store.remove(dir.path(), SidecarKind::Rating).is_err());
}
