use std::ffi::OsString;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use jam_session_build::BuildError;
use jam_session_build::env::{ConfigSource, ENV_FILE, load_env};
use jam_session_build::pipeline::{self, TARGETS};

const HOST_TEMPLATE: &str = include_str!("fixtures/host.template.html");
const PLAY_TEMPLATE: &str = include_str!("fixtures/play.template.html");

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("host.template.html"), HOST_TEMPLATE).unwrap();
    fs::write(dir.path().join("play.template.html"), PLAY_TEMPLATE).unwrap();
    dir
}

fn no_env(_: &str) -> Option<OsString> {
    None
}

fn read(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap()
}

fn build_error(err: &anyhow::Error) -> &BuildError {
    err.downcast_ref::<BuildError>()
        .unwrap_or_else(|| panic!("expected BuildError, got {err:?}"))
}

#[test]
fn environment_build_blanks_analytics_and_writes_every_page() {
    let dir = project();

    let report = pipeline::run(dir.path(), |key| {
        (key == "ABLY_API_KEY").then(|| OsString::from("abc123"))
    })
    .unwrap();

    assert_eq!(report.source, ConfigSource::Environment);
    assert!(!report.analytics_enabled);
    assert_eq!(report.outputs.len(), TARGETS.len());

    let host = read(dir.path(), "host.html");
    assert!(host.contains("key: 'abc123'"));
    assert!(host.contains("const GA4_ID = '';"));
    assert!(!host.contains("__ABLY_API_KEY__"));
    assert!(!host.contains("__GA4_MEASUREMENT_ID__"));
    assert!(host.contains("__BUILD_ID__"));

    let play = read(dir.path(), "play.html");
    assert!(play.contains("key: 'abc123'"));
    assert!(play.contains("Jam Session - Play"));
}

#[test]
fn index_is_byte_identical_to_host() {
    let dir = project();
    fs::write(
        dir.path().join(ENV_FILE),
        "ABLY_API_KEY=xyz\nGA4_MEASUREMENT_ID=G-TEST123\n",
    )
    .unwrap();

    let report = pipeline::run(dir.path(), no_env).unwrap();

    assert!(report.analytics_enabled);
    assert_eq!(
        fs::read(dir.path().join("host.html")).unwrap(),
        fs::read(dir.path().join("index.html")).unwrap()
    );
}

#[test]
fn env_file_with_comments_drives_the_build() {
    let dir = project();
    fs::write(dir.path().join(ENV_FILE), "# note\n\nABLY_API_KEY=xyz\n").unwrap();

    let report = pipeline::run(dir.path(), no_env).unwrap();

    assert_eq!(report.source, ConfigSource::EnvFile);
    assert!(read(dir.path(), "play.html").contains("key: 'xyz'"));
}

#[test]
fn environment_is_not_merged_with_env_file() {
    let dir = project();
    fs::write(
        dir.path().join(ENV_FILE),
        "ABLY_API_KEY=from-file\nGA4_MEASUREMENT_ID=G-FROMFILE\n",
    )
    .unwrap();

    let report = pipeline::run(dir.path(), |key| {
        (key == "ABLY_API_KEY").then(|| OsString::from("from-env"))
    })
    .unwrap();

    assert!(!report.analytics_enabled);
    let host = read(dir.path(), "host.html");
    assert!(host.contains("key: 'from-env'"));
    assert!(!host.contains("G-FROMFILE"));
}

#[test]
fn example_api_key_is_rejected_before_rendering() {
    let dir = project();
    fs::write(dir.path().join(ENV_FILE), "ABLY_API_KEY=your_ably_api_key_here\n").unwrap();

    let err = pipeline::run(dir.path(), no_env).unwrap_err();

    assert!(matches!(
        build_error(&err),
        BuildError::PlaceholderValue { .. }
    ));
    assert!(!dir.path().join("host.html").exists());
}

#[test]
fn missing_configuration_explains_how_to_fix_it() {
    let dir = project();

    let err = pipeline::run(dir.path(), no_env).unwrap_err();

    assert!(matches!(build_error(&err), BuildError::MissingEnvFile { .. }));
    assert!(err.to_string().contains("cp .env.example .env"));
}

#[test]
fn missing_template_stops_the_build() {
    let dir = project();
    fs::remove_file(dir.path().join("play.template.html")).unwrap();
    fs::write(dir.path().join(ENV_FILE), "ABLY_API_KEY=xyz\n").unwrap();

    let err = pipeline::run(dir.path(), no_env).unwrap_err();

    assert!(matches!(
        build_error(&err),
        BuildError::TemplateNotFound { .. }
    ));
    assert!(err.to_string().contains("play.html"));
    assert!(dir.path().join("host.html").exists());
    assert!(!dir.path().join("play.html").exists());
    assert!(!dir.path().join("index.html").exists());
}

#[test]
fn empty_environment_key_is_rejected_without_falling_back_to_file() {
    let dir = project();
    fs::write(dir.path().join(ENV_FILE), "ABLY_API_KEY=from-file\n").unwrap();

    let loaded = load_env(dir.path(), |key| (key == "ABLY_API_KEY").then(OsString::new)).unwrap();
    assert_eq!(loaded.source, ConfigSource::Environment);

    let err = pipeline::run(dir.path(), |key| {
        (key == "ABLY_API_KEY").then(OsString::new)
    })
    .unwrap_err();

    assert!(matches!(build_error(&err), BuildError::EmptyValue { .. }));
    for target in TARGETS {
        assert!(!dir.path().join(target.output).exists());
    }
}

#[cfg(unix)]
#[test]
fn non_utf8_environment_key_is_fatal() {
    use std::os::unix::ffi::OsStringExt;

    let dir = project();
    fs::write(dir.path().join(ENV_FILE), "ABLY_API_KEY=from-file\n").unwrap();

    let err = pipeline::run(dir.path(), |key| {
        (key == "ABLY_API_KEY").then(|| OsString::from_vec(b"key\xff".to_vec()))
    })
    .unwrap_err();

    assert!(matches!(build_error(&err), BuildError::NotUnicode { .. }));
    assert!(err.to_string().contains("ABLY_API_KEY"));
    assert!(!dir.path().join("host.html").exists());
}
