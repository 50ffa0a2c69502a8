//! Scanner behavior over real directory trees

mod helpers;

use helpers::SongLibrary;
use songvid::services::{DescriptorError, ScanError, SongScanner};
use songvid::SongRecord;

fn scan_ok(library: &SongLibrary) -> Vec<SongRecord> {
    SongScanner::new()
        .scan(&library.root())
        .unwrap()
        .filter_map(Result::ok)
        .collect()
}

#[test]
fn test_finds_nested_song_directories() {
    let library = SongLibrary::new();
    let a = library.add_song("Pack/Artist/A", "Foo", "Bar");
    let b = library.add_song("B", "Baz", "Qux");
    std::fs::create_dir_all(library.root().join("NotASong")).unwrap();
    std::fs::write(library.root().join("NotASong/notes.ini"), "[song]\nname = x\n").unwrap();

    let records = scan_ok(&library);
    let paths: Vec<_> = records.iter().map(|r| r.path().to_path_buf()).collect();

    assert_eq!(records.len(), 2);
    assert!(paths.contains(&a));
    assert!(paths.contains(&b));
}

#[test]
fn test_root_itself_can_be_a_song() {
    let library = SongLibrary::new();
    library.add_song("", "Foo", "Bar");

    let records = scan_ok(&library);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path(), library.root());
}

#[test]
fn test_song_inside_song_both_found() {
    let library = SongLibrary::new();
    library.add_song("Outer", "Outer", "Band");
    library.add_song("Outer/Inner", "Inner", "Band");

    assert_eq!(scan_ok(&library).len(), 2);
}

#[test]
fn test_bad_descriptor_is_yielded_as_error() {
    let library = SongLibrary::new();
    library.add_raw("Broken", "[metadata]\nname = Foo\n");
    library.add_song("Good", "Foo", "Bar");

    let results: Vec<_> = SongScanner::new().scan(&library.root()).unwrap().collect();

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(DescriptorError::MissingSection { .. }))));
    assert!(results.iter().any(|r| r.is_ok()));
}

#[test]
fn test_vcs_directories_ignored() {
    let library = SongLibrary::new();
    library.add_song(".git/A", "Hidden", "Band");
    library.add_song("A", "Foo", "Bar");

    let records = scan_ok(&library);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Foo");
}

#[test]
fn test_missing_root_is_error() {
    let library = SongLibrary::new();
    let result = SongScanner::new().scan(&library.root().join("absent"));
    assert!(matches!(result, Err(ScanError::PathNotFound(_))));
}

#[cfg(unix)]
#[test]
fn test_symlinked_song_reported_once() {
    let library = SongLibrary::new();
    let real = library.add_song("Real", "Foo", "Bar");
    std::os::unix::fs::symlink(&real, library.root().join("Alias")).unwrap();

    let records: Vec<_> = SongScanner::new()
        .with_follow_links(true)
        .scan(&library.root())
        .unwrap()
        .filter_map(Result::ok)
        .collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path(), real);
}
