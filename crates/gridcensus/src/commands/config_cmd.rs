//! Config subcommand handlers.

use std::fmt::Write;

use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const SETTABLE_KEYS: &str = "url, glue2_base, glue1_base, bind_dn, password_env, timeout";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the bind password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        let _ = writeln!(out, "glue2_base = \"{}\"", p.glue2_base);
        let _ = writeln!(out, "glue1_base = \"{}\"", p.glue1_base);
        if let Some(ref dn) = p.bind_dn {
            let _ = writeln!(out, "bind_dn = \"{dn}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Store the bind password in the keyring, or hand it back for the
/// config file when the user prefers plaintext.
fn prompt_password_storage(profile_name: &str, password: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the bind password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_password(profile_name, password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password.to_owned()))
    }
}

/// Apply one `config set` assignment to a profile.
fn set_key(profile: &mut Profile, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "url" => {
            config::parse_url(value)?;
            value.clone_into(&mut profile.url);
        }
        "glue2_base" | "glue2-base" => value.clone_into(&mut profile.glue2_base),
        "glue1_base" | "glue1-base" => value.clone_into(&mut profile.glue1_base),
        "bind_dn" | "bind-dn" => {
            profile.bind_dn = (!value.is_empty()).then(|| value.to_owned());
        }
        "password_env" | "password-env" => profile.password_env = Some(value.into()),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("gridcensus configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Directory URL
            let url: String = Input::new()
                .with_prompt("BDII URL")
                .default(gridcensus_config::DEFAULT_URL.into())
                .validate_with(|input: &String| {
                    config::parse_url(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                url,
                ..Profile::default()
            };

            // 3. Optional bind
            let bind = Confirm::new()
                .with_prompt("Does this directory require a bind (most BDIIs are anonymous)?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            if bind {
                let dn: String = Input::new()
                    .with_prompt("Bind DN")
                    .interact_text()
                    .map_err(prompt_err)?;
                let password = rpassword::prompt_password("Bind password: ").map_err(prompt_err)?;
                if dn.is_empty() || password.is_empty() {
                    return Err(CliError::Validation {
                        field: "bind".into(),
                        reason: "bind DN and password cannot be empty".into(),
                    });
                }
                profile.bind_dn = Some(dn);
                profile.password = prompt_password_storage(&profile_name, &password)?;
            }

            // 4. Merge into the existing file
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }
            config::save_config(&cfg)?;

            eprintln!("\n✓ Profile '{profile_name}' saved to {}", config_path.display());
            eprintln!("   Try: gridcensus summary");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("****".into());
                }
            }

            let out = output::render_single(
                &global.output,
                &cfg,
                format_config_redacted,
                |c| c.active_profile_name().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set ─────────────────────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let mut profile = cfg.profile(&profile_name)?;
            set_key(&mut profile, &key, &value)?;
            cfg.profiles.insert(profile_name.clone(), profile);
            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.active_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: gridcensus config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_key_updates_known_keys() {
        let mut profile = Profile::default();
        set_key(&mut profile, "url", "ldaps://bdii.example.org:2170").unwrap();
        set_key(&mut profile, "bind-dn", "cn=reader,o=grid").unwrap();
        set_key(&mut profile, "timeout", "90").unwrap();

        assert_eq!(profile.url, "ldaps://bdii.example.org:2170");
        assert_eq!(profile.bind_dn.as_deref(), Some("cn=reader,o=grid"));
        assert_eq!(profile.timeout, Some(90));

        set_key(&mut profile, "bind_dn", "").unwrap();
        assert_eq!(profile.bind_dn, None);
    }

    #[test]
    fn set_key_rejects_bad_input() {
        let mut profile = Profile::default();
        assert!(set_key(&mut profile, "url", "https://bdii.example.org").is_err());
        assert!(set_key(&mut profile, "timeout", "soon").is_err());

        let err = set_key(&mut profile, "password", "hunter2").unwrap_err();
        assert!(err.to_string().contains("password"));
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn redacted_view_masks_password() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                bind_dn: Some("cn=reader,o=grid".into()),
                password: Some("****".into()),
                ..Profile::default()
            },
        );
        let text = format_config_redacted(&cfg);
        assert!(text.starts_with("default_profile = \"default\""));
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("password = \"****\""));
        assert!(text.contains("bind_dn = \"cn=reader,o=grid\""));
    }
}
