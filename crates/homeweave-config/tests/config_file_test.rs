#![allow(clippy::unwrap_used)]
// TOML loading and saving against real files.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use homeweave_config::{
    Config, Profile, cache_config, load_config_from, profile_to_connection_config, save_config_to,
};

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.default_profile.as_deref(), Some("default"));
    assert_eq!(config.defaults.timeout, 10);
    assert_eq!(config.defaults.state_ttl_ms, 1_200);
    assert!(config.profiles.is_empty());
}

#[test]
fn test_profile_file_round_trips_through_engine_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_profile = "maison"

[defaults]
timeout = 15
directory_ttl_ms = 60000

[profiles.maison]
controller = "http://192.168.1.20"
api_key = "abc123"
equipment_types = ["virtual", "light"]
retry_delay_ms = 2500
"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    let (name, profile) = config.profile(None).unwrap();
    assert_eq!(name, "maison");
    assert_eq!(profile.provider, "jeedom");

    let connection = profile_to_connection_config(profile, "homeweave-test-no-keyring", &config.defaults)
        .unwrap();
    assert_eq!(connection.url.as_str(), "http://192.168.1.20/");
    assert_eq!(connection.api_key.expose_secret(), "abc123");
    assert_eq!(connection.timeout, Duration::from_secs(15));
    assert_eq!(connection.poll.retry_delay, Duration::from_millis(2_500));
    assert_eq!(connection.device_filter.equipment_types, vec!["virtual", "light"]);

    let cache = cache_config(Some(profile), &config.defaults);
    assert_eq!(cache.directory_ttl, Duration::from_secs(60));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    let mut profile = Profile::new("https://jeedom.local/jeedom");
    profile.api_key_env = Some("JEEDOM_API_KEY".into());
    profile.insecure = Some(true);
    config.profiles.insert("default".into(), profile);

    save_config_to(&config, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[profiles.default]"));
    assert!(!written.contains("api_key = "));

    assert_eq!(load_config_from(&path).unwrap(), config);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[profiles.maison]\ntimeout = \"soon\"\n").unwrap();

    assert!(load_config_from(&path).is_err());
}
