//! Wi-Fi credential handling behind the `wifiqr` CLI.
//!
//! This crate owns the domain logic; rendering and image export live in the
//! binary crate and plug in through [`Exporter`]:
//!
//! - **[`FormInput`]** -- The raw editing surface: five string fields, replaced
//!   wholesale on every edit. Never encoded directly.
//!
//! - **[`validate()`]** -- Checks every field independently and returns either
//!   a typed [`CredentialInput`] or all [`ValidationErrors`] at once.
//!
//! - **[`encode()`]** -- Pure function producing the `WIFI:T:..;S:..;P:..;;`
//!   payload, escaping reserved characters. [`parse()`] reverses it.
//!
//! - **[`QrGenerator`]** -- Display state machine. A payload is committed only
//!   on a successful [`submit()`](QrGenerator::submit); failed submissions
//!   leave the last good payload in place. Export is gated on that state.

pub mod error;
pub mod export;
pub mod generator;
pub mod model;
pub mod payload;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, ExportError, PayloadError};
pub use export::{
    Card, DEFAULT_EXPORT_FILE, ErrorCorrection, Exporter, MAX_RENDER_SIZE, RenderOptions,
};
pub use generator::{Committed, DisplayState, QrGenerator};
pub use model::{CredentialInput, EncryptionKind, FormInput, HexColor};
pub use payload::{EncodedPayload, ParsedPayload, encode, escape_field, parse};
pub use validate::{Field, ValidationErrors, validate};
