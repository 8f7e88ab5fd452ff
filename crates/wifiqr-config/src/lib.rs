//! Shared configuration for wifiqr.
//!
//! TOML defaults, render settings, and saved networks, plus password
//! resolution (env + keyring + plaintext) and translation into
//! `wifiqr_core` types. The CLI adds flag-aware wrappers on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use wifiqr_core::{
    DEFAULT_EXPORT_FILE, EncryptionKind, ErrorCorrection, FormInput, HexColor, MAX_RENDER_SIZE,
    RenderOptions,
};

/// Keyring service name for stored network passwords.
pub const KEYRING_SERVICE: &str = "wifiqr";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for network '{network}'")]
    NoPassword { network: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Saved network used when `--network` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_network: Option<String>,

    /// Form defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// QR renderer settings.
    #[serde(default)]
    pub render: RenderSettings,

    /// Saved networks, by name.
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkProfile>,
}

impl Config {
    pub fn network(&self, name: &str) -> Option<&NetworkProfile> {
        self.networks.get(name)
    }

    /// Comma-separated network names, for error help text.
    pub fn network_names(&self) -> String {
        if self.networks.is_empty() {
            "(none)".into()
        } else {
            self.networks.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_brand_label")]
    pub brand_label: String,

    #[serde(default = "default_background_color")]
    pub background_color: String,

    #[serde(default = "default_encryption")]
    pub encryption: String,

    #[serde(default = "default_export_file")]
    pub export_file: PathBuf,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            brand_label: default_brand_label(),
            background_color: default_background_color(),
            encryption: default_encryption(),
            export_file: default_export_file(),
        }
    }
}

fn default_brand_label() -> String {
    FormInput::default().brand_label
}
fn default_background_color() -> String {
    FormInput::default().background_color
}
fn default_encryption() -> String {
    EncryptionKind::default().token().into()
}
fn default_export_file() -> PathBuf {
    DEFAULT_EXPORT_FILE.into()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RenderSettings {
    #[serde(default = "default_size")]
    pub size: u32,

    #[serde(default = "default_foreground")]
    pub foreground: String,

    #[serde(default = "default_background")]
    pub background: String,

    /// One of L, M, Q, H.
    #[serde(default = "default_error_correction")]
    pub error_correction: String,

    #[serde(default)]
    pub quiet_zone: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: default_size(),
            foreground: default_foreground(),
            background: default_background(),
            error_correction: default_error_correction(),
            quiet_zone: false,
        }
    }
}

fn default_size() -> u32 {
    RenderOptions::default().size
}
fn default_foreground() -> String {
    HexColor::black().into()
}
fn default_background() -> String {
    HexColor::white().into()
}
fn default_error_correction() -> String {
    ErrorCorrection::default().to_string()
}

/// A saved network.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NetworkProfile {
    /// Network name as broadcast.
    pub ssid: String,

    /// "WPA", "WEP" or "nopass". Falls back to `defaults.encryption`.
    pub encryption: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override `defaults.brand_label`.
    pub brand_label: Option<String>,

    /// Override `defaults.background_color`.
    pub background_color: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wifiqr", "wifiqr").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wifiqr");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn file_layer(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = file_layer(path)
        .merge(Env::prefixed("WIFIQR_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load the canonical file for a read-modify-write cycle.
pub fn load_config_for_edit() -> Result<Config, ConfigError> {
    load_config_file(&config_path())
}

/// Load `path` without the `WIFIQR_*` overlay, so saving the result writes
/// back only what the file held. A file that fails to parse is an error.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config file for edit");
    let config: Config = file_layer(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(network_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{network_name}/password"),
    )?)
}

/// Store a network password in the system keyring.
pub fn store_password(network_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(network_name)?.set_password(password.expose_secret())?;
    Ok(())
}

/// Remove a stored network password. Missing entries are not an error.
pub fn delete_password(network_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(network_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Password resolution (without CLI flags) ─────────────────────────

/// Where a saved network's password was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// The variable named by `password_env`.
    Env(String),
    Keyring,
    /// `password` in the config file.
    Plaintext,
}

impl std::fmt::Display for PasswordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env(var) => write!(f, "env ${var}"),
            Self::Keyring => f.write_str("keyring"),
            Self::Plaintext => f.write_str("config (plaintext)"),
        }
    }
}

fn lookup_password(
    profile: &NetworkProfile,
    network_name: &str,
) -> Option<(PasswordSource, SecretString)> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some((PasswordSource::Env(env_name.clone()), SecretString::from(val)));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(network_name) {
        if let Ok(secret) = entry.get_password() {
            return Some((PasswordSource::Keyring, SecretString::from(secret)));
        }
    }

    // 3. Plaintext in config
    profile
        .password
        .as_ref()
        .map(|pw| (PasswordSource::Plaintext, SecretString::from(pw.clone())))
}

/// Resolve a saved network's password from the credential chain.
pub fn resolve_password(
    profile: &NetworkProfile,
    network_name: &str,
) -> Result<SecretString, ConfigError> {
    lookup_password(profile, network_name)
        .map(|(_, secret)| secret)
        .ok_or_else(|| ConfigError::NoPassword {
            network: network_name.into(),
        })
}

/// The source `resolve_password` would use, if any.
pub fn password_source(profile: &NetworkProfile, network_name: &str) -> Option<PasswordSource> {
    lookup_password(profile, network_name).map(|(source, _)| source)
}

// ── Translation into core types ─────────────────────────────────────

/// The form a fresh session starts from.
pub fn defaults_to_form(defaults: &Defaults) -> FormInput {
    FormInput::default()
        .with_brand_label(defaults.brand_label.clone())
        .with_background_color(defaults.background_color.clone())
        .with_encryption(defaults.encryption.clone())
}

/// Build a form from a saved network.
///
/// Values are copied verbatim; the validator judges them. An unresolvable
/// password leaves the field empty.
pub fn network_to_form(profile: &NetworkProfile, network_name: &str, defaults: &Defaults) -> FormInput {
    let password = match resolve_password(profile, network_name) {
        Ok(secret) => secret.expose_secret().to_owned(),
        Err(e) => {
            debug!(network = network_name, error = %e, "no saved password");
            String::new()
        }
    };

    let mut form = defaults_to_form(defaults)
        .with_network_name(profile.ssid.clone())
        .with_password(password);
    if let Some(ref encryption) = profile.encryption {
        form = form.with_encryption(encryption.clone());
    }
    if let Some(ref label) = profile.brand_label {
        form = form.with_brand_label(label.clone());
    }
    if let Some(ref color) = profile.background_color {
        form = form.with_background_color(color.clone());
    }
    form
}

/// Translate `[render]` into typed renderer options.
pub fn render_options(settings: &RenderSettings) -> Result<RenderOptions, ConfigError> {
    let color = |field: &str, raw: &str| {
        HexColor::parse(raw).map_err(|e| ConfigError::Validation {
            field: format!("render.{field}"),
            reason: e.to_string(),
        })
    };

    if settings.size == 0 || settings.size > MAX_RENDER_SIZE {
        return Err(ConfigError::Validation {
            field: "render.size".into(),
            reason: format!("must be between 1 and {MAX_RENDER_SIZE}"),
        });
    }

    let error_correction =
        settings
            .error_correction
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "render.error_correction".into(),
                reason: format!(
                    "expected one of L, M, Q, H, got '{}'",
                    settings.error_correction
                ),
            })?;

    Ok(RenderOptions {
        size: settings.size,
        foreground: color("foreground", &settings.foreground)?,
        background: color("background", &settings.background)?,
        error_correction,
        quiet_zone: settings.quiet_zone,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.brand_label, "ODD");
        assert_eq!(cfg.defaults.export_file, PathBuf::from("wifi-qr-code.png"));
        assert_eq!(cfg.render.size, 192);
        assert_eq!(cfg.render.error_correction, "L");
        assert!(cfg.networks.is_empty());
    }

    #[test]
    fn reads_networks_and_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
default_network = "cafe"

[render]
size = 256

[networks.cafe]
ssid = "OpenCafe"
encryption = "nopass"
password = "guest"
brand_label = "Cafe"
"##,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_network.as_deref(), Some("cafe"));
        assert_eq!(cfg.render.size, 256);
        assert_eq!(cfg.render.foreground, "#000000");
        let cafe = cfg.network("cafe").unwrap();
        assert_eq!(cafe.ssid, "OpenCafe");
        assert_eq!(cafe.encryption.as_deref(), Some("nopass"));
    }

    #[test]
    fn save_then_load_preserves_networks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.default_network = Some("home".into());
        cfg.networks.insert(
            "home".into(),
            NetworkProfile {
                ssid: "HomeNet".into(),
                encryption: Some("WPA".into()),
                ..NetworkProfile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_network.as_deref(), Some("home"));
        assert_eq!(loaded.network("home").unwrap().ssid, "HomeNet");
        assert_eq!(loaded.network_names(), "home");
    }

    #[test]
    fn network_form_overrides_defaults() {
        let profile = NetworkProfile {
            ssid: "OpenCafe".into(),
            encryption: Some("nopass".into()),
            password: Some("guest".into()),
            brand_label: Some("Cafe".into()),
            ..NetworkProfile::default()
        };
        let form = network_to_form(&profile, "wifiqr-test-cafe", &Defaults::default());
        assert_eq!(form.network_name, "OpenCafe");
        assert_eq!(form.encryption, "nopass");
        assert_eq!(form.brand_label, "Cafe");
        assert_eq!(form.background_color, "#ffffff");
    }

    #[test]
    fn password_env_takes_priority() {
        let Ok(expected) = std::env::var("PATH") else {
            return;
        };
        let profile = NetworkProfile {
            ssid: "HomeNet".into(),
            password_env: Some("PATH".into()),
            password: Some("plaintext".into()),
            ..NetworkProfile::default()
        };
        let secret = resolve_password(&profile, "wifiqr-test-home").unwrap();
        assert_eq!(secret.expose_secret(), expected);
    }

    #[test]
    fn render_options_validates_fields() {
        let mut settings = RenderSettings::default();
        assert_eq!(render_options(&settings).unwrap(), RenderOptions::default());

        settings.error_correction = "h".into();
        assert_eq!(
            render_options(&settings).unwrap().error_correction,
            ErrorCorrection::H
        );

        settings.foreground = "black".into();
        let err = render_options(&settings).unwrap_err();
        assert!(err.to_string().contains("render.foreground"));

        settings.foreground = "#000000".into();
        settings.size = 0;
        assert!(render_options(&settings).is_err());

        settings.size = MAX_RENDER_SIZE;
        assert!(render_options(&settings).is_ok());
        settings.size = MAX_RENDER_SIZE + 1;
        let err = render_options(&settings).unwrap_err();
        assert!(err.to_string().contains("render.size"));
    }

    #[test]
    fn malformed_file_is_an_error_for_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[networks.home]\nssid = \"HomeNet\"\n\n[render]\nsize = \"big\"\n",
        )
        .unwrap();
        assert!(load_config_file(&path).is_err());
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn file_layer_keeps_saved_networks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[networks.home]\nssid = \"HomeNet\"\n").unwrap();
        let cfg = load_config_file(&path).unwrap();
        assert_eq!(cfg.network("home").unwrap().ssid, "HomeNet");
        assert_eq!(cfg.render.size, 192);
    }

    #[test]
    fn password_source_follows_resolution_order() {
        let plaintext = NetworkProfile {
            ssid: "OpenCafe".into(),
            password: Some("guest".into()),
            ..NetworkProfile::default()
        };
        assert_eq!(
            password_source(&plaintext, "wifiqr-test-plaintext"),
            Some(PasswordSource::Plaintext)
        );

        let nothing = NetworkProfile {
            ssid: "OpenCafe".into(),
            password_env: Some("WIFIQR_TEST_SURELY_UNSET".into()),
            ..NetworkProfile::default()
        };
        assert_eq!(password_source(&nothing, "wifiqr-test-nothing"), None);

        if std::env::var("PATH").is_ok() {
            let env = NetworkProfile {
                password_env: Some("PATH".into()),
                ..plaintext
            };
            assert_eq!(
                password_source(&env, "wifiqr-test-plaintext"),
                Some(PasswordSource::Env("PATH".into()))
            );
        }
    }
}
