use dupehash::cli::OutputFormat;
use dupehash::config::Config;
use dupehash::scanner::DigestAlgorithm;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// Environment variables are process-wide.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_env() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::set_var("DUPEHASH_IO_THREADS", "16");
    std::env::set_var("DUPEHASH_ALGORITHM", "sha512");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DUPEHASH_").split("__"));
    let config: Config = figment.extract().unwrap();

    std::env::remove_var("DUPEHASH_IO_THREADS");
    std::env::remove_var("DUPEHASH_ALGORITHM");

    assert_eq!(config.io_threads, 16);
    assert_eq!(config.algorithm, DigestAlgorithm::Sha512);
}

#[test]
fn test_config_load_from_toml_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
io_threads = 8
queue_capacity = 32
algorithm = "sha256"
buffer_size = 4096
progress = false
output = "json"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.io_threads, 8);
    assert_eq!(config.queue_capacity, 32);
    assert_eq!(config.algorithm, DigestAlgorithm::Sha256);
    assert_eq!(config.buffer_size, 4096);
    assert!(!config.progress);
    assert_eq!(config.output, OutputFormat::Json);
}

#[test]
fn test_env_overrides_toml() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "io_threads = 8\n").unwrap();

    std::env::set_var("DUPEHASH_IO_THREADS", "3");
    let result = Config::load(Some(&path));
    std::env::remove_var("DUPEHASH_IO_THREADS");

    assert_eq!(result.unwrap().io_threads, 3);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = \"sha512\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.algorithm, DigestAlgorithm::Sha512);
    assert_eq!(config.io_threads, 4);
    assert_eq!(config.queue_capacity, 1024);
}

#[test]
fn test_invalid_values_are_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();

    let zero = dir.path().join("zero.toml");
    fs::write(&zero, "io_threads = 0\n").unwrap();
    assert!(Config::load(Some(&zero)).is_err());

    let bad_algorithm = dir.path().join("bad.toml");
    fs::write(&bad_algorithm, "algorithm = \"md5\"\n").unwrap();
    assert!(Config::load(Some(&bad_algorithm)).is_err());
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "io_threads = = 4").unwrap();

    let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&path));
    let result: Result<Config, _> = figment.extract();

    assert!(result.is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
}

#[test]
fn test_effective_config_renders_as_toml() {
    let text = Config::default().to_toml().unwrap();

    assert!(text.contains("io_threads = 4"));
    assert!(text.contains("algorithm = \"blake3\""));
    assert!(text.contains("output = \"text\""));
}
