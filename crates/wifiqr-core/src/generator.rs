//! Display state machine.
//!
//! Live input and displayed output have separate lifecycles. Edits only touch
//! the [`FormInput`]; the displayed payload changes only when a submission
//! validates:
//!
//! ```text
//!            submit ok              submit ok
//!   Empty ─────────────▶ Ready ◀─────────────┐
//!     │ ▲                  │                 │
//!     └─┘ submit err       └─────────────────┘
//!                          submit err: unchanged
//! ```
//!
//! There is no way back to `Empty`: a failed or cleared resubmission keeps the
//! last good code on screen.

use tracing::{debug, info, warn};

use crate::error::ExportError;
use crate::export::{Card, Exporter, RenderOptions};
use crate::model::{CredentialInput, FormInput};
use crate::payload::{EncodedPayload, encode};
use crate::validate::{Field, ValidationErrors, validate};

/// Credentials and payload from the last successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub credentials: CredentialInput,
    pub payload: EncodedPayload,
}

/// What the QR panel currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DisplayState {
    /// Placeholder; nothing valid has been submitted yet.
    #[default]
    Empty,
    Ready(Committed),
}

impl DisplayState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn committed(&self) -> Option<&Committed> {
        match self {
            Self::Ready(committed) => Some(committed),
            Self::Empty => None,
        }
    }

    pub fn payload(&self) -> Option<&EncodedPayload> {
        self.committed().map(|c| &c.payload)
    }
}

/// Form state, display state, and the render options the display uses.
#[derive(Debug, Default)]
pub struct QrGenerator {
    form: FormInput,
    display: DisplayState,
    render: RenderOptions,
}

impl QrGenerator {
    pub fn new(render: RenderOptions) -> Self {
        Self {
            form: FormInput::default(),
            display: DisplayState::Empty,
            render,
        }
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Replace the form wholesale. The display is untouched.
    pub fn edit(&mut self, form: FormInput) {
        debug!(network = %form.network_name, "form edited");
        self.form = form;
    }

    /// Replace one field of the form. The display is untouched.
    pub fn edit_field(&mut self, field: Field, value: impl Into<String>) {
        let form = std::mem::take(&mut self.form).with_field(field, value);
        debug!(%field, "form field edited");
        self.form = form;
    }

    /// Restore the form defaults. The last good code stays on display.
    pub fn reset(&mut self) {
        debug!("form reset");
        self.form = FormInput::default();
    }

    /// Validate the current form and, on success, commit its payload.
    ///
    /// On failure the display keeps whatever it showed before.
    pub fn submit(&mut self) -> Result<EncodedPayload, ValidationErrors> {
        let credentials = validate(&self.form).inspect_err(|errors| {
            warn!(errors = errors.len(), %errors, "submission rejected");
        })?;

        let payload = encode(&credentials);
        debug_assert!(!payload.is_empty(), "validated input always encodes");

        debug!(
            network = %credentials.network_name,
            encryption = %credentials.encryption,
            replaced = self.display.is_ready(),
            "payload committed"
        );
        self.display = DisplayState::Ready(Committed {
            credentials,
            payload: payload.clone(),
        });
        Ok(payload)
    }

    /// Whether the export action is available.
    pub fn can_export(&self) -> bool {
        self.display.is_ready()
    }

    /// The card for the committed payload, if there is one.
    pub fn card(&self) -> Option<Card<'_>> {
        self.display.committed().map(|committed| Card {
            payload: &committed.payload,
            brand_label: &committed.credentials.brand_label,
            background_color: &committed.credentials.background_color,
            render: &self.render,
        })
    }

    /// Hand the committed card to `exporter`.
    ///
    /// Fails with [`ExportError::NotReady`] before the first successful
    /// submission. Exporter failures are returned as-is.
    pub fn export<E>(&self, exporter: &E) -> Result<E::Output, ExportError>
    where
        E: Exporter + ?Sized,
    {
        let card = self.card().ok_or(ExportError::NotReady)?;
        let output = exporter.export(&card).inspect_err(|err| {
            warn!(error = %err, "export failed");
        })?;
        info!("card exported");
        Ok(output)
    }
}
