// tests/config_test.rs
use std::path::Path;

use git_semver::config::{load_config, Backend, Config};
use git_semver::VersioningError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.git.backend, Backend::Command);
    assert_eq!(config.git.program, "git");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[git]
backend = "command"
program = "git2.45"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), Path::new(".")).unwrap();
    assert_eq!(config.git.backend, Backend::Command);
    assert_eq!(config.git.program, "git2.45");
    assert_eq!(config.git.search_path, None);
}

#[test]
fn test_libgit2_backend_from_fixture() {
    let config = load_config(
        Some(Path::new("tests/fixtures/libgit2_backend.toml")),
        Path::new("."),
    )
    .expect("Failed to load test config");
    assert_eq!(config.git.backend, Backend::Libgit2);
    assert_eq!(config.git.program, "git");
}

#[test]
fn test_custom_program_from_fixture() {
    let config = load_config(
        Some(Path::new("tests/fixtures/custom_program.toml")),
        Path::new("."),
    )
    .expect("Failed to load test config");
    assert_eq!(config.git.program, "/usr/local/bin/git");
    assert_eq!(
        config.git.search_path.as_deref(),
        Some("/usr/local/bin:/usr/bin")
    );
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[git\nprogram = ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path()), Path::new(".")).unwrap_err();
    assert!(matches!(err, VersioningError::Config(_)));
    assert!(err.to_string().contains("Failed to parse"));
}
