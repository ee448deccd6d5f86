use dupehash::duplicates::{DuplicateFinder, FinderConfig};
use dupehash::error::ExitCode;
use dupehash::progress::ProgressCallback;
use dupehash::duplicates::TableSnapshot;
use dupehash::scanner::{HashError, ScanError};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Returns false when the current user can read a file regardless of its
/// mode bits (e.g. root), in which case permission tests are skipped.
#[cfg(unix)]
fn make_unreadable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
    fs::File::open(path).is_err()
}

#[cfg(unix)]
fn restore(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_is_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "duplicate pair").unwrap();
    fs::write(dir.path().join("b.txt"), "duplicate pair").unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, "duplicate pair").unwrap();

    if !make_unreadable(&locked) {
        eprintln!("Skipping: running with permission override");
        restore(&locked, 0o644);
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    restore(&locked, 0o644);

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].len(), 2);
    assert_eq!(report.summary.total_files, 2);
    assert_eq!(report.summary.scan_errors.len(), 1);
    match &report.summary.scan_errors[0] {
        ScanError::Hash(HashError::PermissionDenied(p)) => assert!(p.ends_with("locked.txt")),
        other => panic!("Expected PermissionDenied, got {:?}", other),
    }
    assert_eq!(ExitCode::for_report(&report), ExitCode::PartialSuccess);
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_is_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "pair").unwrap();
    fs::write(dir.path().join("b.txt"), "pair").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("c.txt"), "pair").unwrap();

    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        eprintln!("Skipping: running with permission override");
        restore(&locked, 0o755);
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    restore(&locked, 0o755);

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.summary.total_files, 2);
    assert!(matches!(
        report.summary.scan_errors.as_slice(),
        [ScanError::PermissionDenied(_)]
    ));
}

#[test]
fn test_file_removed_after_dispatch_is_isolated() {
    #[derive(Default)]
    struct RemoveOnFirstStart {
        started: AtomicUsize,
    }

    impl ProgressCallback for RemoveOnFirstStart {
        fn on_file_start(&self, path: &Path) {
            if path.ends_with("vanishing.txt") {
                let _ = fs::remove_file(path);
            }
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_recorded(&self, _snapshot: TableSnapshot) {}
    }

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "kept").unwrap();
    fs::write(dir.path().join("b.txt"), "kept").unwrap();
    fs::write(dir.path().join("vanishing.txt"), "kept").unwrap();

    let callback = Arc::new(RemoveOnFirstStart::default());
    let config = FinderConfig::default().with_progress_callback(callback.clone());
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(callback.started.load(Ordering::SeqCst), 3);
    assert_eq!(report.summary.total_files, 2);
    assert_eq!(report.groups[0].len(), 2);
    assert!(matches!(
        report.summary.scan_errors.as_slice(),
        [ScanError::Hash(HashError::NotFound(_))]
    ));
}

#[test]
#[cfg(unix)]
fn test_special_files_are_skipped() {
    use std::os::unix::net::UnixListener;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "same").unwrap();
    fs::write(dir.path().join("b"), "same").unwrap();
    let _listener = UnixListener::bind(dir.path().join("sock")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.summary.total_files, 2);
    assert!(matches!(
        report.summary.scan_errors.as_slice(),
        [ScanError::UnsupportedEntry(_)]
    ));
}
