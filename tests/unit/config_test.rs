//! Unit tests for configuration wiring

use multivac::Config;
use tempfile::TempDir;

use crate::helpers::fixture_path;

#[test]
fn catalogue_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[classifier]\ncatalogue = {:?}\n[reader]\nchunk_size = 16\n",
            fixture_path("catalogue.toml").display().to_string()
        ),
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let classifier = config.classifier(None).unwrap();

    assert_eq!(classifier.catalogue().len(), 2);
    assert_eq!(
        classifier
            .classify(fixture_path("unsafe_repo.log"))
            .unwrap()
            .category,
        "process_exit"
    );
}

#[test]
fn explicit_catalogue_overrides_config() {
    let mut config = Config::default();
    config.classifier.catalogue = Some("/nonexistent/catalogue.toml".into());

    let classifier = config.classifier(Some(&fixture_path("catalogue.toml"))).unwrap();
    assert_eq!(classifier.catalogue().len(), 2);

    let err = config.classifier(None).unwrap_err();
    assert!(err.to_string().contains("Failed to load catalogue"));
}

#[test]
fn unparsable_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[batch\nworkers = 2\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
