//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use wifiqr_config::ConfigError;
use wifiqr_core::{CoreError, ExportError, ValidationErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const EXPORT: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Form ─────────────────────────────────────────────────────────
    #[error("The Wi-Fi details are incomplete or invalid")]
    #[diagnostic(code(wifiqr::invalid_form), help("{details}"))]
    InvalidForm { details: String },

    #[error("Not a valid Wi-Fi QR payload: {reason}")]
    #[diagnostic(
        code(wifiqr::invalid_payload),
        help("Expected something like: WIFI:T:WPA;S:HomeNet;P:secret;;")
    )]
    InvalidPayload { reason: String },

    // ── Export ───────────────────────────────────────────────────────
    #[error("Could not export the QR code")]
    #[diagnostic(code(wifiqr::export_failed))]
    ExportFailed {
        #[source]
        source: ExportError,
    },

    #[error("{} already exists", path.display())]
    #[diagnostic(
        code(wifiqr::file_exists),
        help("Pass --force to overwrite it, or choose another path with --file.")
    )]
    FileExists { path: PathBuf },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wifiqr::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Network '{name}' not found in configuration")]
    #[diagnostic(
        code(wifiqr::network_not_found),
        help(
            "Saved networks: {available}\n\
             Save one with: wifiqr config add-network <name>"
        )
    )]
    NetworkNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(wifiqr::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidForm { .. } | Self::InvalidPayload { .. } | Self::Validation { .. } => {
                exit_code::USAGE
            }
            Self::NetworkNotFound { .. } => exit_code::NOT_FOUND,
            Self::ExportFailed { .. } | Self::FileExists { .. } => exit_code::EXPORT,
            Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// One line per failing field, labelled as in the form.
    pub fn invalid_form(errors: &ValidationErrors) -> Self {
        let details = errors
            .iter()
            .map(|(field, message)| format!("{}: {message}", field.label()))
            .collect::<Vec<_>>()
            .join("\n");
        Self::InvalidForm { details }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => Self::invalid_form(&errors),
            CoreError::Payload(e) => Self::InvalidPayload {
                reason: e.to_string(),
            },
            CoreError::Export(source) => Self::ExportFailed { source },
        }
    }
}
