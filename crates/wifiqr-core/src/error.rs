// ── Core error types ──
//
// Nothing here is fatal to the process. Invalid input is recoverable,
// malformed payloads are reported to the caller, and export failures are
// surfaced instead of swallowed.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid Wi-Fi payload: {0}")]
    Payload(#[from] PayloadError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

// ── Payload parsing ──────────────────────────────────────────────────

/// Reasons a string is not a well-formed Wi-Fi QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload must start with 'WIFI:'")]
    MissingScheme,

    #[error("payload must end with ';;'")]
    MissingTerminator,

    #[error("unexpected trailing data after ';;': {0:?}")]
    TrailingData(String),

    #[error("field {0:?} is not of the form KEY:value")]
    MalformedField(String),

    #[error("payload has no network name (S field)")]
    MissingSsid,

    #[error("unknown encryption type {0:?}")]
    UnknownEncryption(String),

    #[error("payload ends with a dangling escape character")]
    DanglingEscape,
}

// ── Export ───────────────────────────────────────────────────────────

/// Failures reported by the export boundary or an [`Exporter`](crate::Exporter).
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export yet: generate a QR code first")]
    NotReady,

    #[error("failed to render QR code: {message}")]
    Render { message: String },

    #[error("failed to encode image: {message}")]
    Encode { message: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
