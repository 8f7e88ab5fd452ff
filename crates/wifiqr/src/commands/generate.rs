//! `wifiqr generate`: validate, encode, and show the code.

use serde::Serialize;

use wifiqr_core::{Committed, EncryptionKind, HexColor};

use crate::cli::{GenerateArgs, GlobalOpts, OutputFormat};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::render;

/// Structured view of a committed code.
#[derive(Debug, Serialize)]
pub struct GeneratedView<'a> {
    pub payload: &'a str,
    pub ssid: &'a str,
    pub encryption: EncryptionKind,
    pub brand_label: &'a str,
    pub background_color: &'a HexColor,
}

impl<'a> From<&'a Committed> for GeneratedView<'a> {
    fn from(c: &'a Committed) -> Self {
        Self {
            payload: c.payload.as_str(),
            ssid: &c.credentials.network_name,
            encryption: c.credentials.encryption,
            brand_label: &c.credentials.brand_label,
            background_color: &c.credentials.background_color,
        }
    }
}

pub fn handle(args: &GenerateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let form = config::resolve_form(&args.form, global, &cfg)?;
    let generator = util::submitted(form, config::resolve_render(&cfg, None, None)?)?;
    let (committed, card) = util::ready(&generator)?;

    let out = match global.output {
        OutputFormat::Table => render::terminal_card(&card, args.margin)
            .map_err(|source| CliError::ExportFailed { source })?,
        ref format => output::render_single(
            format,
            &GeneratedView::from(committed),
            |_| String::new(),
            |v| v.payload.to_owned(),
        ),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
