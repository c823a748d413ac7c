//! Config subcommand handlers.

use std::io::BufRead;

use secrecy::SecretString;
use tabled::Tabled;

use homeweave_config::{self as hwc, Config, Profile};

use crate::cli::{ConfigAddArgs, ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Controller")]
    controller: String,
}

#[derive(serde::Serialize)]
struct ProfileEntry {
    name: String,
    default: bool,
    provider: String,
    controller: String,
}

/// Copy of `cfg` safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut out = cfg.clone();
    for profile in out.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(REDACTED.into());
        }
    }
    out
}

fn profile_from_args(args: &ConfigAddArgs) -> Result<Profile, CliError> {
    url::Url::parse(&args.url).map_err(|e| CliError::Validation {
        field: "url".into(),
        reason: e.to_string(),
    })?;

    let mut profile = Profile::new(args.url.clone());
    profile.provider.clone_from(&args.provider);
    profile.api_key_env.clone_from(&args.api_key_env);
    if args.insecure {
        profile.insecure = Some(true);
    }
    if !args.equipment_types.is_empty() {
        profile.equipment_types = Some(args.equipment_types.clone());
    }
    Ok(profile)
}

fn read_key_from_stdin() -> Result<String, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(&hwc::load_config()?);
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n# {e}")),
                |c| c.default_profile.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&hwc::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Add(add) => {
            let profile = profile_from_args(&add)?;
            let mut cfg = hwc::load_config()?;

            let replaced = cfg.profiles.insert(add.name.clone(), profile).is_some();
            let default_missing = cfg
                .default_profile
                .as_ref()
                .is_none_or(|name| !cfg.profiles.contains_key(name));
            if default_missing {
                cfg.default_profile = Some(add.name.clone());
            }

            let path = hwc::save_config(&cfg)?;
            if !global.quiet {
                let verb = if replaced { "Updated" } else { "Added" };
                eprintln!("{verb} profile '{}' in {}", add.name, path.display());
                if add.api_key_env.is_none() {
                    eprintln!("  Store its API key with: homeweave config set-key {}", add.name);
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = hwc::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
                available.sort_unstable();
                return Err(CliError::ProfileNotFound {
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            hwc::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile is now '{name}'");
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = hwc::load_config()?;
            let active = active_profile_name(global, &cfg);

            let mut entries: Vec<ProfileEntry> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileEntry {
                    name: name.clone(),
                    default: *name == active,
                    provider: p.provider.clone(),
                    controller: p.controller.clone(),
                })
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(
                &global.output,
                &entries,
                |e| ProfileRow {
                    marker: if e.default { "*".into() } else { String::new() },
                    name: e.name.clone(),
                    provider: e.provider.clone(),
                    controller: e.controller.clone(),
                },
                |e| e.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetKey { name, key } => {
            let key = match key {
                Some(key) => key,
                None => read_key_from_stdin()?,
            };
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }
            hwc::store_api_key(&name, &SecretString::from(key))?;
            if !global.quiet {
                eprintln!("API key for '{name}' stored in the system keyring");
            }
            Ok(())
        }
    }
}
