//! `wifiqr export`: save the QR card to an image file.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::{ExportArgs, GlobalOpts, ImageFormatArg};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::export as exporters;
use crate::output;

#[derive(Debug, Serialize)]
struct ExportedView<'a> {
    path: PathBuf,
    format: &'static str,
    payload: &'a str,
}

fn format_name(format: ImageFormatArg) -> &'static str {
    match format {
        ImageFormatArg::Png => "png",
        ImageFormatArg::Svg => "svg",
    }
}

/// Refuse to clobber an existing file unless forced.
fn check_target(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::FileExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

pub fn handle(args: &ExportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let form = config::resolve_form(&args.form, global, &cfg)?;
    let render = config::resolve_render(&cfg, args.size, args.ec_level)?;
    let generator = util::submitted(form, render)?;
    let (committed, _) = util::ready(&generator)?;

    let path = args
        .file
        .clone()
        .unwrap_or_else(|| cfg.defaults.export_file.clone());
    check_target(&path, args.force)?;

    let format = exporters::resolve_format(&path, args.format);
    let exporter = exporters::exporter_for(path, format);
    let written = generator
        .export(&*exporter)
        .map_err(|source| CliError::ExportFailed { source })?;

    let view = ExportedView {
        path: written,
        format: format_name(format),
        payload: committed.payload.as_str(),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            format!(
                "{} Saved QR code to {}",
                output::success("✓", color),
                v.path.display()
            )
        },
        |v| v.path.display().to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_needs_force() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = check_target(file.path(), false).unwrap_err();
        assert!(matches!(err, CliError::FileExists { .. }));
        assert!(check_target(file.path(), true).is_ok());
    }

    #[test]
    fn missing_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_target(&dir.path().join("wifi-qr-code.png"), false).is_ok());
    }
}
