//! Resolution of the effective controller connection: config file profile,
//! then `--controller` / `--api-key` / `--insecure` / `--timeout` overrides.
//!
//! The engine receives only the finished `ConnectionConfig` and
//! `CacheConfig`.

use secrecy::SecretString;

use homeweave_config::{self as hwc, Config, Profile};
use homeweave_core::{CacheConfig, ConnectionConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything needed to build a provider.
#[derive(Debug)]
pub struct Resolved {
    pub provider_type: String,
    pub connection: ConnectionConfig,
    pub cache: CacheConfig,
}

/// Load the config file and resolve it against the global flags.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = hwc::load_config()?;
    resolve_with(&cfg, global, hwc::resolve_api_key)
}

/// Name of the profile the flags select.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

fn resolve_with(
    cfg: &Config,
    global: &GlobalOpts,
    stored_key: impl Fn(&Profile, &str) -> Result<SecretString, hwc::ConfigError>,
) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let Some(stored) = cfg.profiles.get(&profile_name) else {
        // An explicitly requested profile must exist.
        if global.profile.is_some() {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        return resolve_from_flags(cfg, global, profile_name);
    };

    let mut profile = stored.clone();
    apply_overrides(&mut profile, global);

    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => stored_key(&profile, &profile_name)?,
    };

    Ok(Resolved {
        provider_type: global
            .provider
            .clone()
            .unwrap_or_else(|| profile.provider.clone()),
        connection: hwc::connection_config(&profile, &cfg.defaults, api_key)?,
        cache: hwc::cache_config(Some(&profile), &cfg.defaults),
    })
}

/// No profile on disk: `--controller` and `--api-key` must carry everything.
fn resolve_from_flags(
    cfg: &Config,
    global: &GlobalOpts,
    profile_name: String,
) -> Result<Resolved, CliError> {
    let controller = global.controller.as_deref().ok_or_else(|| CliError::NoConfig {
        path: hwc::config_path().display().to_string(),
    })?;
    let api_key = global
        .api_key
        .as_ref()
        .map(|key| SecretString::from(key.clone()))
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    let mut profile = Profile::new(controller);
    apply_overrides(&mut profile, global);

    Ok(Resolved {
        provider_type: global
            .provider
            .clone()
            .unwrap_or_else(|| profile.provider.clone()),
        connection: hwc::connection_config(&profile, &cfg.defaults, api_key)?,
        cache: hwc::cache_config(None, &cfg.defaults),
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.controller {
        profile.controller.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use homeweave_core::TlsVerification;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["homeweave"];
        argv.extend_from_slice(args);
        argv.push("providers");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn no_stored_key(_: &Profile, name: &str) -> Result<SecretString, hwc::ConfigError> {
        Err(hwc::ConfigError::NoCredentials {
            profile: name.into(),
        })
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        Config {
            default_profile: Some(name.into()),
            profiles: HashMap::from([(name.to_owned(), profile)]),
            ..Config::default()
        }
    }

    #[test]
    fn flags_alone_build_a_connection() {
        let opts = global(&[
            "--controller",
            "http://10.0.0.5",
            "--api-key",
            "secret",
            "--timeout",
            "3",
        ]);
        let resolved = resolve_with(&Config::default(), &opts, no_stored_key).unwrap();
        assert_eq!(resolved.provider_type, "jeedom");
        assert_eq!(resolved.connection.url.as_str(), "http://10.0.0.5/");
        assert_eq!(resolved.connection.api_key.expose_secret(), "secret");
        assert_eq!(resolved.connection.timeout, Duration::from_secs(3));
        assert_eq!(resolved.cache, CacheConfig::default());
    }

    #[test]
    fn missing_controller_is_no_config() {
        let opts = global(&["--api-key", "secret"]);
        let err = resolve_with(&Config::default(), &opts, no_stored_key).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn missing_key_is_no_credentials() {
        let opts = global(&["--controller", "http://10.0.0.5"]);
        let err = resolve_with(&Config::default(), &opts, no_stored_key).unwrap_err();
        assert!(matches!(err, CliError::NoCredentials { ref profile } if profile == "default"));
    }

    #[test]
    fn explicit_unknown_profile_lists_alternatives() {
        let cfg = config_with("maison", Profile::new("http://10.0.0.5"));
        let opts = global(&["--profile", "garage"]);
        let err = resolve_with(&cfg, &opts, no_stored_key).unwrap_err();
        assert!(matches!(
            err,
            CliError::ProfileNotFound { ref name, ref available }
                if name == "garage" && available == "maison"
        ));
    }

    #[test]
    fn flags_override_profile() {
        let mut profile = Profile::new("http://10.0.0.5");
        profile.api_key = Some("stored".into());
        profile.state_ttl_ms = Some(500);
        let cfg = config_with("maison", profile);

        let opts = global(&["--controller", "https://10.0.0.9", "--insecure"]);
        let resolved = resolve_with(&cfg, &opts, |p, _| {
            Ok(SecretString::from(p.api_key.clone().unwrap()))
        })
        .unwrap();

        assert_eq!(resolved.connection.url.as_str(), "https://10.0.0.9/");
        assert_eq!(resolved.connection.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(resolved.connection.api_key.expose_secret(), "stored");
        assert_eq!(resolved.cache.state_ttl, Duration::from_millis(500));
    }

    #[test]
    fn api_key_flag_beats_stored_key() {
        let cfg = config_with("maison", Profile::new("http://10.0.0.5"));
        let opts = global(&["--api-key", "from-flag"]);
        let resolved = resolve_with(&cfg, &opts, no_stored_key).unwrap();
        assert_eq!(resolved.connection.api_key.expose_secret(), "from-flag");
    }
}
