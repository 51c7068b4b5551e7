//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and cwd manipulation.

use elicit_config::ElicitConfig;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};

#[test]
fn loads_selector_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[selector]
threshold = 0.1
max_questions = 4
",
        )?;

        let config: ElicitConfig = Figment::from(Serialized::defaults(ElicitConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!((config.selector.threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.selector.max_questions, 4);
        // Untouched sections keep their defaults.
        assert_eq!(config.matcher.top_k, 5);
        Ok(())
    });
}

#[test]
fn loads_artifacts_and_embeddings_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[artifacts]
dir = "/opt/elicit"
classifier = "forest.json"

[embeddings]
model = "bge-small-en-v1.5"
cache_dir = "/tmp/fastembed"
show_download_progress = false
"#,
        )?;

        let config: ElicitConfig = Figment::from(Serialized::defaults(ElicitConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.artifacts.dir, "/opt/elicit");
        assert_eq!(
            config.artifacts.classifier_path(),
            std::path::PathBuf::from("/opt/elicit/forest.json")
        );
        assert_eq!(config.artifacts.catalog, "sym_desc.json");
        assert_eq!(config.embeddings.model, "bge-small-en-v1.5");
        assert!(config.embeddings.has_cache_dir());
        assert!(!config.embeddings.show_download_progress);
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".elicit")?;
        jail.create_file(
            ".elicit/config.toml",
            r"
[matcher]
top_k = 8
",
        )?;

        let config = ElicitConfig::load().expect("config loads");
        assert_eq!(config.matcher.top_k, 8);
        Ok(())
    });
}

#[test]
fn invalid_values_fail_validation_on_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".elicit")?;
        jail.create_file(
            ".elicit/config.toml",
            r"
[matcher]
top_k = 0
",
        )?;

        let err = ElicitConfig::load().unwrap_err();
        assert!(err.to_string().contains("matcher.top_k"), "got: {err}");
        Ok(())
    });
}

#[test]
fn malformed_toml_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".elicit")?;
        jail.create_file(".elicit/config.toml", "[selector\nthreshold = ")?;

        let err = ElicitConfig::load().unwrap_err();
        assert!(matches!(err, elicit_config::ConfigError::Figment(_)));
        Ok(())
    });
}
