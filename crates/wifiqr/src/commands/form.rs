//! `wifiqr form`: interactive editing session.
//!
//! Mirrors a form-plus-preview screen. Edits change the form only; the
//! code on display changes only when "Generate" validates. The download
//! entry appears once something has been generated.

use std::fmt;
use std::path::{Path, PathBuf};

use dialoguer::{Input, Password, Select};

use wifiqr_core::{EncryptionKind, Field, QrGenerator, ValidationErrors};

use crate::cli::GlobalOpts;
use crate::commands::util::{self, prompt_err};
use crate::config;
use crate::error::CliError;
use crate::export as exporters;
use crate::output;
use crate::render;

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit(Field),
    Generate,
    Download,
    Reset,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit(field) => write!(f, "Edit {}", field.label().to_lowercase()),
            Self::Generate => f.write_str("Generate QR code"),
            Self::Download => f.write_str("Download image"),
            Self::Reset => f.write_str("Reset form"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

const EDITABLE: [Field; 5] = [
    Field::BrandLabel,
    Field::NetworkName,
    Field::Password,
    Field::Encryption,
    Field::BackgroundColor,
];

/// Menu entries for the current state. Download is offered only when a
/// code has been generated.
pub fn menu(can_export: bool) -> Vec<Action> {
    let mut items: Vec<Action> = EDITABLE.iter().copied().map(Action::Edit).collect();
    items.push(Action::Generate);
    if can_export {
        items.push(Action::Download);
    }
    items.push(Action::Reset);
    items.push(Action::Quit);
    items
}

/// Current form values, one per line, password masked.
fn summary(generator: &QrGenerator, errors: Option<&ValidationErrors>, color: bool) -> String {
    let form = generator.form();
    EDITABLE
        .iter()
        .map(|&field| {
            let value = match field {
                Field::Password if !form.password.is_empty() => {
                    "•".repeat(form.password.chars().count())
                }
                _ => form.get(field).to_owned(),
            };
            let label = format!("{:<22}", field.label());
            let mut line = format!("  {} {value}", output::dim(&label, color));
            if let Some(message) = errors.and_then(|e| e.get(field)) {
                line.push_str("  ");
                line.push_str(&output::error_text(message, color));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn edit(generator: &mut QrGenerator, field: Field) -> Result<(), CliError> {
    let current = generator.form().get(field).to_owned();
    let value = match field {
        Field::Password => Password::new()
            .with_prompt(field.label())
            .allow_empty_password(true)
            .interact()
            .map_err(prompt_err)?,
        Field::Encryption => {
            let kinds = [EncryptionKind::Wpa, EncryptionKind::Wep, EncryptionKind::NoPassword];
            let labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
            let selected = kinds.iter().position(|k| k.token() == current).unwrap_or(0);
            let idx = Select::new()
                .with_prompt(field.label())
                .items(&labels)
                .default(selected)
                .interact()
                .map_err(prompt_err)?;
            kinds.get(idx).copied().unwrap_or_default().token().to_owned()
        }
        _ => Input::<String>::new()
            .with_prompt(field.label())
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_err)?,
    };
    generator.edit_field(field, value);
    Ok(())
}

/// Ask for a path and export to it. `None` when the user declines to
/// overwrite an existing file.
fn download(generator: &QrGenerator, default_file: &Path) -> Result<Option<PathBuf>, CliError> {
    let raw = Input::<String>::new()
        .with_prompt("Save as")
        .default(default_file.display().to_string())
        .interact_text()
        .map_err(prompt_err)?;
    let path = PathBuf::from(raw);
    if path.exists() && !util::confirm(&format!("{} exists. Overwrite?", path.display()))? {
        return Ok(None);
    }

    let format = exporters::resolve_format(&path, None);
    let exporter = exporters::exporter_for(path, format);
    generator
        .export(&*exporter)
        .map(Some)
        .map_err(|source| CliError::ExportFailed { source })
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let mut generator = QrGenerator::new(config::resolve_render(&cfg, None, None)?);
    generator.edit(config::base_form(global, &cfg)?);

    let color = output::should_color(&global.color);
    let mut errors: Option<ValidationErrors> = None;

    loop {
        eprintln!("\n{}", output::heading("Wi-Fi details", color));
        eprintln!("{}", summary(&generator, errors.as_ref(), color));
        if !generator.can_export() {
            eprintln!("  {}", output::dim("No code generated yet.", color));
        }

        let items = menu(generator.can_export());
        let idx = Select::new()
            .items(&items)
            .default(items.iter().position(|a| *a == Action::Generate).unwrap_or(0))
            .interact()
            .map_err(prompt_err)?;
        let Some(&action) = items.get(idx) else {
            continue;
        };

        match action {
            Action::Edit(field) => edit(&mut generator, field)?,
            Action::Generate => match generator.submit() {
                Ok(_) => {
                    errors = None;
                    let (_, card) = util::ready(&generator)?;
                    match render::terminal_card(&card, true) {
                        Ok(text) => println!("{text}"),
                        Err(e) => eprintln!("{}", output::error_text(&e.to_string(), color)),
                    }
                }
                Err(e) => errors = Some(e),
            },
            Action::Download => match download(&generator, &cfg.defaults.export_file) {
                Ok(None) => {}
                Ok(Some(path)) => eprintln!(
                    "{} Saved QR code to {}",
                    output::success("✓", color),
                    path.display()
                ),
                Err(e) => eprintln!("{:?}", miette::Report::new(e)),
            },
            Action::Reset => {
                generator.reset();
                errors = None;
            }
            Action::Quit => return Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wifiqr_core::FormInput;

    #[test]
    fn download_needs_a_generated_code() {
        assert!(!menu(false).contains(&Action::Download));
        assert!(menu(true).contains(&Action::Download));
        assert_eq!(menu(true).last(), Some(&Action::Quit));
    }

    #[test]
    fn menu_labels_read_naturally() {
        let labels: Vec<String> = menu(false).iter().map(ToString::to_string).collect();
        assert_eq!(labels.first().unwrap(), "Edit brand name");
        assert!(labels.contains(&"Generate QR code".to_owned()));
    }

    #[test]
    fn colored_summary_pads_visible_labels() {
        let mut generator = QrGenerator::default();
        generator.edit(FormInput::default().with_network_name("HomeNet"));
        let plain = summary(&generator, None, false);
        let colored = summary(&generator, None, true);
        assert!(colored.contains('\x1b'));
        for (plain_line, colored_line) in plain.lines().zip(colored.lines()) {
            let value_at = plain_line.rfind(' ').unwrap();
            assert_eq!(value_at, 2 + 22);
            assert!(colored_line.ends_with(&plain_line[value_at..]));
        }
    }

    #[test]
    fn summary_masks_password_and_shows_errors() {
        let mut generator = QrGenerator::default();
        generator.edit(FormInput::default().with_password("secret"));
        let errors = generator.submit().unwrap_err();
        let text = summary(&generator, Some(&errors), false);
        assert!(text.contains("••••••"));
        assert!(!text.contains("secret"));
        assert!(text.contains("Network name is required"));
    }
}
