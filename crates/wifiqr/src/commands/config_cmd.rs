//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use secrecy::SecretString;
use serde::Serialize;
use tabled::Tabled;

use wifiqr_core::{EncryptionKind, ErrorCorrection, HexColor, MAX_RENDER_SIZE};

use crate::cli::{ConfigArgs, ConfigCommand, EncryptionArg, GlobalOpts};
use crate::commands::util::prompt_err;
use crate::config::{self, Config, NetworkProfile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Apply `key = value` to the config, checking the value first.
pub fn apply_setting(cfg: &mut Config, key: &str, value: &str) -> Result<(), CliError> {
    let color = |field: &str| {
        HexColor::parse(value)
            .map(String::from)
            .map_err(|e| invalid(field, e.to_string()))
    };

    match key {
        "brand_label" | "defaults.brand_label" => {
            if value.is_empty() {
                return Err(invalid(key, "cannot be empty"));
            }
            cfg.defaults.brand_label = value.into();
        }
        "background_color" | "defaults.background_color" => {
            cfg.defaults.background_color = color(key)?;
        }
        "encryption" | "defaults.encryption" => {
            let kind: EncryptionKind = value
                .parse()
                .map_err(|_| invalid(key, "must be WPA, WEP or nopass"))?;
            cfg.defaults.encryption = kind.token().into();
        }
        "export_file" | "defaults.export_file" => cfg.defaults.export_file = value.into(),
        "render.size" => {
            let size: u32 = value
                .parse()
                .ok()
                .filter(|s| (1..=MAX_RENDER_SIZE).contains(s))
                .ok_or_else(|| {
                    invalid(key, format!("must be between 1 and {MAX_RENDER_SIZE} pixels"))
                })?;
            cfg.render.size = size;
        }
        "render.foreground" => cfg.render.foreground = color(key)?,
        "render.background" => cfg.render.background = color(key)?,
        "render.error_correction" => {
            let level: ErrorCorrection = value
                .parse()
                .map_err(|_| invalid(key, "must be one of L, M, Q, H"))?;
            cfg.render.error_correction = level.to_string();
        }
        "render.quiet_zone" => {
            cfg.render.quiet_zone = value
                .parse()
                .map_err(|_| invalid(key, "must be 'true' or 'false'"))?;
        }
        other => {
            return Err(invalid(
                other,
                format!(
                    "unknown config key '{other}'. Valid keys: brand_label, background_color, \
                     encryption, export_file, render.size, render.foreground, \
                     render.background, render.error_correction, render.quiet_zone"
                ),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct NetworkView {
    name: String,
    ssid: String,
    encryption: String,
    password_source: String,
    default: bool,
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Encryption")]
    encryption: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "Default")]
    default: String,
}

fn network_views(cfg: &Config) -> Vec<NetworkView> {
    cfg.networks
        .iter()
        .map(|(name, profile)| NetworkView {
            name: name.clone(),
            ssid: profile.ssid.clone(),
            encryption: profile
                .encryption
                .clone()
                .unwrap_or_else(|| cfg.defaults.encryption.clone()),
            password_source: config::password_source(profile, name)
                .map_or_else(|| "none".into(), |source| source.to_string()),
            default: cfg.default_network.as_deref() == Some(name.as_str()),
        })
        .collect()
}

fn prompt_encryption(default: &str) -> Result<String, CliError> {
    let kinds = [EncryptionKind::Wpa, EncryptionKind::Wep, EncryptionKind::NoPassword];
    let labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
    let selected = kinds.iter().position(|k| k.token() == default).unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Encryption type")
        .items(&labels)
        .default(selected)
        .interact()
        .map_err(prompt_err)?;
    Ok(kinds.get(idx).copied().unwrap_or_default().token().into())
}

/// Prompt for a network's password and store it. Returns the plaintext
/// value when it belongs in the config file.
fn capture_password(name: &str, plaintext: bool) -> Result<Option<String>, CliError> {
    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if password.is_empty() {
        eprintln!("   No password saved; pass --password when generating.");
        return Ok(None);
    }
    if plaintext {
        return Ok(Some(password));
    }
    config::store_password(name, &SecretString::from(password))?;
    eprintln!("   ✓ Password stored in system keyring");
    Ok(None)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("✨ wifiqr configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = Config::default();

            let brand: String = Input::new()
                .with_prompt("Brand label")
                .default(cfg.defaults.brand_label.clone())
                .interact_text()
                .map_err(prompt_err)?;
            apply_setting(&mut cfg, "brand_label", &brand)?;

            let background: String = Input::new()
                .with_prompt("Card background color")
                .default(cfg.defaults.background_color.clone())
                .validate_with(|input: &String| HexColor::parse(input).map(|_| ()))
                .interact_text()
                .map_err(prompt_err)?;
            apply_setting(&mut cfg, "background_color", &background)?;

            let encryption = prompt_encryption(&cfg.defaults.encryption)?;
            apply_setting(&mut cfg, "encryption", &encryption)?;

            let add_network = Confirm::new()
                .with_prompt("Save a network now?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;

            if add_network {
                let name: String = Input::new()
                    .with_prompt("Name to save it under")
                    .default("home".into())
                    .interact_text()
                    .map_err(prompt_err)?;
                let ssid: String = Input::new()
                    .with_prompt("Network name (SSID)")
                    .interact_text()
                    .map_err(prompt_err)?;

                let store_choices = &[
                    "Store in system keyring (recommended)",
                    "Save to config file (plaintext)",
                ];
                let store_selection = Select::new()
                    .with_prompt("Where to store the password?")
                    .items(store_choices)
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;
                let password = capture_password(&name, store_selection == 1)?;

                cfg.networks.insert(
                    name.clone(),
                    NetworkProfile {
                        ssid,
                        password,
                        ..NetworkProfile::default()
                    },
                );
                cfg.default_network = Some(name);
            }

            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            if let Some(ref name) = cfg.default_network {
                eprintln!("  Default network: {name}");
            }
            eprintln!("\n  Try it: wifiqr generate");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| serde_yaml::to_string(c).unwrap_or_else(|_| format!("{c:#?}")),
                |_| config::config_path().display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_for_edit()?;
            apply_setting(&mut cfg, &key, &value)?;
            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} = {value}");
            Ok(())
        }

        // ── Networks ────────────────────────────────────────────────
        ConfigCommand::Networks => {
            let cfg = config::load_config()?;
            if cfg.networks.is_empty() {
                eprintln!("No networks saved. Run: wifiqr config add-network <name>");
                return Ok(());
            }
            let views = network_views(&cfg);
            let out = output::render_list(
                &global.output,
                &views,
                |v| NetworkRow {
                    name: v.name.clone(),
                    ssid: v.ssid.clone(),
                    encryption: v.encryption.clone(),
                    password: v.password_source.clone(),
                    default: if v.default { "*".into() } else { String::new() },
                },
                |v| v.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── AddNetwork <name> ───────────────────────────────────────
        ConfigCommand::AddNetwork {
            name,
            ssid,
            encryption,
            password_env,
            plaintext,
        } => {
            let mut cfg = config::load_config_for_edit()?;

            let ssid = match ssid {
                Some(ssid) => ssid,
                None => Input::new()
                    .with_prompt("Network name (SSID)")
                    .interact_text()
                    .map_err(prompt_err)?,
            };
            if ssid.is_empty() {
                return Err(invalid("ssid", "cannot be empty"));
            }

            let password = if password_env.is_some() {
                None
            } else {
                capture_password(&name, plaintext)?
            };

            let replaced = cfg
                .networks
                .insert(
                    name.clone(),
                    NetworkProfile {
                        ssid,
                        encryption: encryption
                            .map(|e: EncryptionArg| EncryptionKind::from(e).token().to_owned()),
                        password,
                        password_env,
                        ..NetworkProfile::default()
                    },
                )
                .is_some();
            if cfg.default_network.is_none() {
                cfg.default_network = Some(name.clone());
            }

            config::save_config(&cfg)?;
            let verb = if replaced { "Updated" } else { "Saved" };
            eprintln!("✓ {verb} network '{name}'");
            Ok(())
        }

        // ── RemoveNetwork <name> ────────────────────────────────────
        ConfigCommand::RemoveNetwork { name } => {
            let mut cfg = config::load_config_for_edit()?;
            config::find_network(&cfg, &name)?;

            cfg.networks.remove(&name);
            if cfg.default_network.as_deref() == Some(name.as_str()) {
                cfg.default_network = None;
            }
            if let Err(e) = config::delete_password(&name) {
                tracing::warn!(network = %name, error = %e, "could not remove keyring entry");
            }

            config::save_config(&cfg)?;
            eprintln!("✓ Removed network '{name}'");
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_for_edit()?;
            config::find_network(&cfg, &name)?;

            cfg.default_network = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default network set to '{name}'");
            Ok(())
        }

        // ── SetPassword <name> ──────────────────────────────────────
        ConfigCommand::SetPassword { name } => {
            let cfg = config::load_config_for_edit()?;
            config::find_network(&cfg, &name)?;

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(invalid("password", "value cannot be empty"));
            }
            config::store_password(&name, &SecretString::from(secret))?;

            eprintln!("✓ Password stored in system keyring for network '{name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_accepts_known_keys() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "brand_label", "Cafe").unwrap();
        apply_setting(&mut cfg, "background_color", "#FFAA00").unwrap();
        apply_setting(&mut cfg, "render.size", "256").unwrap();
        apply_setting(&mut cfg, "render.error_correction", "q").unwrap();
        apply_setting(&mut cfg, "render.quiet_zone", "true").unwrap();

        assert_eq!(cfg.defaults.brand_label, "Cafe");
        assert_eq!(cfg.defaults.background_color, "#ffaa00");
        assert_eq!(cfg.render.size, 256);
        assert_eq!(cfg.render.error_correction, "Q");
        assert!(cfg.render.quiet_zone);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(apply_setting(&mut cfg, "background_color", "white").is_err());
        assert!(apply_setting(&mut cfg, "encryption", "WPA3").is_err());
        assert!(apply_setting(&mut cfg, "render.size", "0").is_err());
        assert!(apply_setting(&mut cfg, "render.size", "5000").is_err());
        assert!(apply_setting(&mut cfg, "render.size", "4294967295").is_err());
        assert_eq!(cfg.render.size, 192);
        assert!(apply_setting(&mut cfg, "brand_label", "").is_err());

        let err = apply_setting(&mut cfg, "colour", "#ffffff").unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn network_views_mark_default_and_password_source() {
        let mut cfg = Config::default();
        cfg.default_network = Some("wifiqr-test-home".into());
        cfg.networks.insert(
            "wifiqr-test-home".into(),
            NetworkProfile {
                ssid: "HomeNet".into(),
                password: Some("fallback".into()),
                password_env: Some("WIFIQR_TEST_SURELY_UNSET".into()),
                ..NetworkProfile::default()
            },
        );
        cfg.networks.insert(
            "wifiqr-test-cafe".into(),
            NetworkProfile {
                ssid: "OpenCafe".into(),
                encryption: Some("nopass".into()),
                ..NetworkProfile::default()
            },
        );

        let views = network_views(&cfg);
        assert_eq!(views.len(), 2);
        let cafe = &views[0];
        assert_eq!(cafe.name, "wifiqr-test-cafe");
        assert_eq!(cafe.encryption, "nopass");
        assert_eq!(cafe.password_source, "none");
        assert!(!cafe.default);
        let home = &views[1];
        assert_eq!(home.encryption, "WPA");
        assert_eq!(home.password_source, "config (plaintext)");
        assert!(home.default);
    }

    #[test]
    fn network_views_report_env_var_only_when_set() {
        let mut cfg = Config::default();
        cfg.networks.insert(
            "wifiqr-test-lab".into(),
            NetworkProfile {
                ssid: "Lab".into(),
                password_env: Some("PATH".into()),
                ..NetworkProfile::default()
            },
        );
        let views = network_views(&cfg);
        assert_eq!(views[0].password_source, "env $PATH");
    }
}
