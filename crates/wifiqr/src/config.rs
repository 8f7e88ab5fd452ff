//! Flag-aware configuration on top of `wifiqr_config`.
//!
//! Resolution order for every form field: command-line flag, then the
//! selected saved network, then `[defaults]`.

use std::io::BufRead;

use wifiqr_core::{EncryptionKind, ErrorCorrection, FormInput, MAX_RENDER_SIZE, RenderOptions};

pub use wifiqr_config::{
    Config, NetworkProfile, config_path, defaults_to_form, delete_password, load_config,
    load_config_for_edit, network_to_form, password_source, render_options, save_config,
    store_password,
};

use crate::cli::{EcLevelArg, EncryptionArg, FormArgs, GlobalOpts};
use crate::error::CliError;

impl From<EncryptionArg> for EncryptionKind {
    fn from(arg: EncryptionArg) -> Self {
        match arg {
            EncryptionArg::Wpa => Self::Wpa,
            EncryptionArg::Wep => Self::Wep,
            EncryptionArg::Nopass => Self::NoPassword,
        }
    }
}

impl From<EcLevelArg> for ErrorCorrection {
    fn from(arg: EcLevelArg) -> Self {
        match arg {
            EcLevelArg::L => Self::L,
            EcLevelArg::M => Self::M,
            EcLevelArg::Q => Self::Q,
            EcLevelArg::H => Self::H,
        }
    }
}

/// The saved network to start from: `--network`, then `default_network`.
pub fn active_network_name(global: &GlobalOpts, config: &Config) -> Option<String> {
    global
        .network
        .clone()
        .or_else(|| config.default_network.clone())
}

/// Look up a saved network, failing with the list of known names.
pub fn find_network<'a>(config: &'a Config, name: &str) -> Result<&'a NetworkProfile, CliError> {
    config.network(name).ok_or_else(|| CliError::NetworkNotFound {
        name: name.into(),
        available: config.network_names(),
    })
}

/// The form a session starts from, before any flags apply.
pub fn base_form(global: &GlobalOpts, config: &Config) -> Result<FormInput, CliError> {
    match active_network_name(global, config) {
        Some(name) => {
            let profile = find_network(config, &name)?;
            tracing::debug!(network = %name, "starting from saved network");
            Ok(network_to_form(profile, &name, &config.defaults))
        }
        None => Ok(defaults_to_form(&config.defaults)),
    }
}

/// Build the form for a one-shot command.
pub fn resolve_form(
    args: &FormArgs,
    global: &GlobalOpts,
    config: &Config,
) -> Result<FormInput, CliError> {
    let mut form = base_form(global, config)?;

    if let Some(ref ssid) = args.ssid {
        form = form.with_network_name(ssid.clone());
    }
    if let Some(ref password) = args.password {
        form = form.with_password(password.clone());
    } else if args.password_stdin {
        form = form.with_password(read_password_stdin()?);
    }
    if let Some(encryption) = args.encryption {
        form = form.with_encryption(EncryptionKind::from(encryption).token());
    }
    if let Some(ref brand) = args.brand {
        form = form.with_brand_label(brand.clone());
    }
    if let Some(ref background) = args.background {
        form = form.with_background_color(background.clone());
    }
    Ok(form)
}

/// Renderer options from `[render]`, with export flag overrides.
pub fn resolve_render(
    config: &Config,
    size: Option<u32>,
    ec_level: Option<EcLevelArg>,
) -> Result<RenderOptions, CliError> {
    let mut options = render_options(&config.render)?;
    if let Some(size) = size {
        if size == 0 || size > MAX_RENDER_SIZE {
            return Err(CliError::Validation {
                field: "size".into(),
                reason: format!("must be between 1 and {MAX_RENDER_SIZE}"),
            });
        }
        options.size = size;
    }
    if let Some(level) = ec_level {
        options.error_correction = level.into();
    }
    Ok(options)
}

/// First line of stdin, without its line ending.
pub fn read_password_stdin() -> Result<String, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{ColorMode, OutputFormat};
    use pretty_assertions::assert_eq;

    fn global(network: Option<&str>) -> GlobalOpts {
        GlobalOpts {
            network: network.map(str::to_owned),
            output: OutputFormat::Table,
            color: ColorMode::Never,
            verbose: 0,
            quiet: false,
        }
    }

    fn config_with_cafe() -> Config {
        let mut cfg = Config::default();
        cfg.networks.insert(
            "cafe".into(),
            NetworkProfile {
                ssid: "OpenCafe".into(),
                encryption: Some("nopass".into()),
                password: Some("guest".into()),
                ..NetworkProfile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_saved_network() {
        let cfg = config_with_cafe();
        let args = FormArgs {
            ssid: Some("Other".into()),
            encryption: Some(EncryptionArg::Wep),
            ..FormArgs::default()
        };
        let form = resolve_form(&args, &global(Some("cafe")), &cfg).unwrap();
        assert_eq!(form.network_name, "Other");
        assert_eq!(form.encryption, "WEP");
        assert_eq!(form.brand_label, "ODD");
    }

    #[test]
    fn no_network_uses_defaults() {
        let form = resolve_form(&FormArgs::default(), &global(None), &Config::default()).unwrap();
        assert_eq!(form, FormInput::default());
    }

    #[test]
    fn default_network_applies_without_flag() {
        let mut cfg = config_with_cafe();
        cfg.default_network = Some("cafe".into());
        let form = base_form(&global(None), &cfg).unwrap();
        assert_eq!(form.network_name, "OpenCafe");
        assert_eq!(form.encryption, "nopass");
    }

    #[test]
    fn unknown_network_lists_known_ones() {
        let cfg = config_with_cafe();
        let err = base_form(&global(Some("home")), &cfg).unwrap_err();
        match err {
            CliError::NetworkNotFound { name, available } => {
                assert_eq!(name, "home");
                assert_eq!(available, "cafe");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn export_flags_override_render_settings() {
        let options = resolve_render(&Config::default(), Some(300), Some(EcLevelArg::H)).unwrap();
        assert_eq!(options.size, 300);
        assert_eq!(options.error_correction, ErrorCorrection::H);
        assert!(resolve_render(&Config::default(), Some(0), None).is_err());
    }

    #[test]
    fn oversized_render_is_rejected() {
        let at_limit = resolve_render(&Config::default(), Some(MAX_RENDER_SIZE), None).unwrap();
        assert_eq!(at_limit.size, MAX_RENDER_SIZE);

        let err = resolve_render(&Config::default(), Some(5000), None).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "size"));
        assert!(resolve_render(&Config::default(), Some(u32::MAX), None).is_err());
    }
}
