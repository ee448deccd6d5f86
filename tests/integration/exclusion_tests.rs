use dupehash::duplicates::DuplicateFinder;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_excluded_subdirectory_never_reported() {
    let dir = tempdir().unwrap();
    let keep = dir.path().join("keep");
    let skip = dir.path().join("keep").join("skip");
    fs::create_dir_all(&skip).unwrap();

    fs::write(dir.path().join("top.txt"), "shared").unwrap();
    fs::write(keep.join("mid.txt"), "shared").unwrap();
    // Would duplicate the files above if it were scanned
    fs::write(skip.join("hidden.txt"), "shared").unwrap();
    fs::write(skip.join("hidden2.txt"), "only in skip").unwrap();
    fs::write(skip.join("hidden3.txt"), "only in skip").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf()], &[skip.clone()])
        .unwrap();

    let skip = skip.canonicalize().unwrap();
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].len(), 2);
    for group in &report.groups {
        for path in &group.paths {
            assert!(!path.starts_with(&skip), "{} is excluded", path.display());
        }
    }
    assert_eq!(report.summary.total_files, 2);
    assert_eq!(report.summary.excluded_entries, 1);
}

#[test]
fn test_exclusion_is_exact_not_prefix() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    let data_old = dir.path().join("data-old");
    fs::create_dir(&data).unwrap();
    fs::create_dir(&data_old).unwrap();
    fs::write(data_old.join("a"), "same").unwrap();
    fs::write(data_old.join("b"), "same").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf()], &[data])
        .unwrap();

    // "data-old" shares a prefix with "data" but is not excluded
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.summary.total_files, 2);
}

#[test]
fn test_exclusion_given_as_relative_spelling() {
    let dir = tempdir().unwrap();
    let skip = dir.path().join("skip");
    fs::create_dir(&skip).unwrap();
    fs::write(skip.join("a"), "same").unwrap();
    fs::write(skip.join("b"), "same").unwrap();

    // A non-canonical spelling of the same directory
    let spelled: PathBuf = skip.join("..").join("skip");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf()], &[spelled])
        .unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.summary.total_files, 0);
}

#[test]
fn test_excluding_a_root_scans_nothing_there() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "same").unwrap();
    fs::write(dir.path().join("b"), "same").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf()], &[dir.path().to_path_buf()])
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.summary.total_files, 0);
}
