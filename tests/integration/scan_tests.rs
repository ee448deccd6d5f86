use dupehash::duplicates::{DuplicateFinder, FinderConfig};
use dupehash::scanner::{DigestAlgorithm, Hasher};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let report = finder.find_duplicates(dir.path()).unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.summary.total_files, 0);
    assert_eq!(report.summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    for (name, content) in [("a.txt", "content a"), ("b.txt", "content b"), ("c.txt", "content c")] {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.summary.total_files, 3);
    assert_eq!(report.summary.duplicate_groups, 0);
}

#[test]
fn test_scenario_three_empty_files() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("one")).unwrap();
    fs::create_dir(dir.path().join("two")).unwrap();
    File::create(dir.path().join("empty.txt")).unwrap();
    File::create(dir.path().join("one").join("empty.txt")).unwrap();
    File::create(dir.path().join("two").join("empty.txt")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.len(), 3);
    assert_eq!(group.size, 0);
    assert_eq!(group.reclaimable(), 0);
    assert_eq!(group.digest, Hasher::default().hash_bytes(b""));
    assert_eq!(
        group.hash_hex(),
        "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
    );
    assert_eq!(report.summary.reclaimable_space, 0);
}

#[test]
fn test_scenario_pair_and_singleton() {
    let dir = tempdir().unwrap();
    let content = [7u8; 100];
    fs::write(dir.path().join("a.bin"), content).unwrap();
    fs::write(dir.path().join("b.bin"), content).unwrap();
    fs::write(dir.path().join("c.bin"), [9u8; 100]).unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.len(), 2);
    assert_eq!(group.size, 100);
    assert_eq!(group.reclaimable(), 100);
    assert!(group.paths.iter().all(|p| !p.ends_with("c.bin")));

    assert_eq!(report.summary.total_files, 3);
    assert_eq!(report.summary.total_size, 300);
    assert_eq!(report.summary.reclaimable_space, 100);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir").join("deeper");
    fs::create_dir_all(&sub).unwrap();

    fs::write(dir.path().join("a.txt"), "nested duplicate").unwrap();
    fs::write(sub.join("b.txt"), "nested duplicate").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.summary.directories_scanned, 3);
    // Breadth-first discovery puts the shallow file first
    assert!(report.groups[0].paths[0].ends_with("a.txt"));
}

#[test]
fn test_groups_ordered_by_reclaimable_space() {
    let dir = tempdir().unwrap();
    for i in 0..2 {
        fs::write(dir.path().join(format!("small{}", i)), "s").unwrap();
    }
    for i in 0..2 {
        fs::write(dir.path().join(format!("large{}", i)), "L".repeat(4096)).unwrap();
    }
    for i in 0..4 {
        fs::write(dir.path().join(format!("medium{}", i)), "m".repeat(100)).unwrap();
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let reclaimable: Vec<u64> = report.groups.iter().map(|g| g.reclaimable()).collect();
    assert_eq!(reclaimable, vec![4096, 300, 1]);
}

#[test]
fn test_totals_match_across_thread_counts() {
    let dir = tempdir().unwrap();
    for i in 0..60 {
        let sub = dir.path().join(format!("d{}", i % 6));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("f{}", i)), format!("payload {}", i % 7)).unwrap();
    }

    let mut previous = None;
    for threads in [1, 2, 8] {
        let config = FinderConfig::default()
            .with_io_threads(threads)
            .with_queue_capacity(2);
        let report = DuplicateFinder::new(config)
            .find_duplicates(dir.path())
            .unwrap();

        let files: usize = report.groups.iter().map(|g| g.len()).sum();
        assert_eq!(report.summary.total_files, 60);
        assert_eq!(report.groups.len(), 7);
        assert_eq!(files, 60);

        let digests: Vec<String> = report.groups.iter().map(|g| g.hash_hex()).collect();
        if let Some(prev) = previous.replace(digests.clone()) {
            assert_eq!(prev, digests);
        }
    }
}

#[test]
fn test_small_buffer_matches_default() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(dir.path().join("a"), &content).unwrap();
    fs::write(dir.path().join("b"), &content).unwrap();

    let default = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let tiny = DuplicateFinder::new(FinderConfig::default().with_buffer_size(7))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(default.groups[0].digest, tiny.groups[0].digest);
    assert_eq!(tiny.groups[0].size, 10_000);
}

#[test]
fn test_sha256_digest_in_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x"), "abc").unwrap();
    fs::write(dir.path().join("y"), "abc").unwrap();

    let config = FinderConfig::default().with_algorithm(DigestAlgorithm::Sha256);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(
        report.groups[0].hash_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
