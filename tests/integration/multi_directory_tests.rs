use dupehash::duplicates::{DuplicateFinder, FinderError};
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_duplicates_across_roots() {
    let photos = tempdir().unwrap();
    let backup = tempdir().unwrap();
    fs::write(photos.path().join("img.jpg"), "jpeg bytes").unwrap();
    fs::write(backup.path().join("img-copy.jpg"), "jpeg bytes").unwrap();
    fs::write(backup.path().join("notes.txt"), "unrelated").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(
            &[photos.path().to_path_buf(), backup.path().to_path_buf()],
            &[],
        )
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    // Roots are seeded in order, so the first root's file is discovered first
    assert!(group.paths[0].starts_with(photos.path().canonicalize().unwrap()));
    assert!(group.paths[1].starts_with(backup.path().canonicalize().unwrap()));
}

#[test]
fn test_overlapping_roots_record_each_path_once() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a"), "one").unwrap();
    fs::write(sub.join("b"), "two").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf(), sub.clone(), sub], &[])
        .unwrap();

    // Each file is unique; a second visit would have produced a collision
    assert!(report.groups.is_empty());
    assert_eq!(report.summary.total_files, 2);
}

#[test]
fn test_no_path_appears_twice() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("f{}", i)), "identical").unwrap();
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf(), dir.path().to_path_buf()], &[])
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let unique: HashSet<_> = report.groups[0].paths.iter().collect();
    assert_eq!(unique.len(), 20);
    assert_eq!(report.groups[0].len(), 20);
}

#[test]
fn test_second_root_invalid_aborts_before_scanning() {
    let good = tempdir().unwrap();
    fs::write(good.path().join("a"), "x").unwrap();
    let missing = good.path().join("missing");

    let result = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[good.path().to_path_buf(), missing.clone()], &[]);

    match result {
        Err(FinderError::PathNotFound(p)) => assert_eq!(p, missing),
        other => panic!("Expected PathNotFound, got {:?}", other),
    }
}
