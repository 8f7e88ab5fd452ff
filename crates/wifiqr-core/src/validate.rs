// ── Form validation ──
//
// Every field is checked on every pass; errors are collected, never
// short-circuited, so the form can show all of them at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::model::{CredentialInput, EncryptionKind, FormInput, HexColor};

/// A named form field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    BrandLabel,
    NetworkName,
    Password,
    Encryption,
    BackgroundColor,
}

impl Field {
    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::BrandLabel => "Brand name",
            Self::NetworkName => "Network name (SSID)",
            Self::Password => "Password",
            Self::Encryption => "Encryption type",
            Self::BackgroundColor => "Background color",
        }
    }
}

/// Per-field error messages from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate raw form input into typed credentials.
///
/// A password is required even for open (`nopass`) networks.
pub fn validate(form: &FormInput) -> Result<CredentialInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if form.brand_label.is_empty() {
        errors.insert(Field::BrandLabel, "Brand name is required");
    }
    if form.network_name.is_empty() {
        errors.insert(Field::NetworkName, "Network name is required");
    }
    if form.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    }

    let encryption = form.encryption.parse::<EncryptionKind>().ok();
    if encryption.is_none() {
        errors.insert(
            Field::Encryption,
            "Select a valid encryption type (WPA, WEP or nopass)",
        );
    }

    let background_color = HexColor::parse(&form.background_color).ok();
    if background_color.is_none() {
        errors.insert(
            Field::BackgroundColor,
            "Enter a valid hex color such as #ffffff",
        );
    }

    match (encryption, background_color) {
        (Some(encryption), Some(background_color)) if errors.is_empty() => Ok(CredentialInput {
            brand_label: form.brand_label.clone(),
            network_name: form.network_name.clone(),
            password: form.password.clone(),
            encryption,
            background_color,
        }),
        _ => Err(errors),
    }
}
