//! Shared helpers for command handlers.

use wifiqr_core::{Card, Committed, ExportError, FormInput, QrGenerator, RenderOptions};

use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for a yes/no answer, defaulting to no.
pub fn confirm(message: &str) -> Result<bool, CliError> {
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// A generator with `form` submitted, or every field error at once.
pub fn submitted(form: FormInput, render: RenderOptions) -> Result<QrGenerator, CliError> {
    let mut generator = QrGenerator::new(render);
    generator.edit(form);
    generator
        .submit()
        .map_err(|errors| CliError::invalid_form(&errors))?;
    Ok(generator)
}

/// The committed payload and its card, once a submission has gone through.
pub fn ready(generator: &QrGenerator) -> Result<(&Committed, Card<'_>), CliError> {
    generator
        .display()
        .committed()
        .zip(generator.card())
        .ok_or(CliError::ExportFailed {
            source: ExportError::NotReady,
        })
}
