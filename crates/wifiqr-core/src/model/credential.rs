// ── Form input and accepted credentials ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EncryptionKind, HexColor};
use crate::validate::Field;

/// Brand label shown under a freshly reset form.
pub const DEFAULT_BRAND_LABEL: &str = "ODD";

/// Background color of a freshly reset form.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Raw editing-surface state: exactly what the user typed.
///
/// Immutable by convention. Every edit produces a new value through the
/// `with_*` builders, and a reset replaces it with [`FormInput::default`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub brand_label: String,
    pub network_name: String,
    pub password: String,
    /// Encryption token as entered; checked by the validator.
    pub encryption: String,
    pub background_color: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            brand_label: DEFAULT_BRAND_LABEL.into(),
            network_name: String::new(),
            password: String::new(),
            encryption: EncryptionKind::default().token().into(),
            background_color: DEFAULT_BACKGROUND_COLOR.into(),
        }
    }
}

impl FormInput {
    pub fn with_brand_label(mut self, value: impl Into<String>) -> Self {
        self.brand_label = value.into();
        self
    }

    pub fn with_network_name(mut self, value: impl Into<String>) -> Self {
        self.network_name = value.into();
        self
    }

    pub fn with_password(mut self, value: impl Into<String>) -> Self {
        self.password = value.into();
        self
    }

    pub fn with_encryption(mut self, value: impl Into<String>) -> Self {
        self.encryption = value.into();
        self
    }

    pub fn with_background_color(mut self, value: impl Into<String>) -> Self {
        self.background_color = value.into();
        self
    }

    /// Replace a single field by name.
    pub fn with_field(self, field: Field, value: impl Into<String>) -> Self {
        match field {
            Field::BrandLabel => self.with_brand_label(value),
            Field::NetworkName => self.with_network_name(value),
            Field::Password => self.with_password(value),
            Field::Encryption => self.with_encryption(value),
            Field::BackgroundColor => self.with_background_color(value),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::BrandLabel => &self.brand_label,
            Field::NetworkName => &self.network_name,
            Field::Password => &self.password,
            Field::Encryption => &self.encryption,
            Field::BackgroundColor => &self.background_color,
        }
    }
}

impl fmt::Debug for FormInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormInput")
            .field("brand_label", &self.brand_label)
            .field("network_name", &self.network_name)
            .field("password", &redacted(&self.password))
            .field("encryption", &self.encryption)
            .field("background_color", &self.background_color)
            .finish()
    }
}

/// Credentials that passed validation.
///
/// Only [`validate`](crate::validate) builds these from user input, so every
/// field is known to be well-formed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialInput {
    pub brand_label: String,
    pub network_name: String,
    pub password: String,
    pub encryption: EncryptionKind,
    pub background_color: HexColor,
}

impl CredentialInput {
    /// Credentials with the default brand label and background color.
    pub fn new(
        network_name: impl Into<String>,
        password: impl Into<String>,
        encryption: EncryptionKind,
    ) -> Self {
        Self {
            brand_label: DEFAULT_BRAND_LABEL.into(),
            network_name: network_name.into(),
            password: password.into(),
            encryption,
            background_color: HexColor::white(),
        }
    }
}

impl fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialInput")
            .field("brand_label", &self.brand_label)
            .field("network_name", &self.network_name)
            .field("password", &redacted(&self.password))
            .field("encryption", &self.encryption)
            .field("background_color", &self.background_color)
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "[REDACTED]" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_matches_fresh_widget() {
        let form = FormInput::default();
        assert_eq!(form.brand_label, "ODD");
        assert_eq!(form.encryption, "WPA");
        assert_eq!(form.background_color, "#ffffff");
        assert!(form.network_name.is_empty());
        assert!(form.password.is_empty());
    }

    #[test]
    fn with_field_replaces_only_that_field() {
        let form = FormInput::default().with_field(Field::NetworkName, "HomeNet");
        assert_eq!(form.get(Field::NetworkName), "HomeNet");
        assert_eq!(form.get(Field::BrandLabel), "ODD");
    }

    #[test]
    fn debug_redacts_password() {
        let form = FormInput::default().with_password("hunter2");
        let rendered = format!("{form:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));

        let creds = CredentialInput::new("HomeNet", "hunter2", EncryptionKind::Wpa);
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
