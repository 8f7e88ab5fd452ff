//! Wi-Fi QR text payload.
//!
//! The de facto format recognized by phone cameras:
//!
//! ```text
//! WIFI:T:<WPA|WEP|nopass>;S:<ssid>;P:<password>;;
//! ```
//!
//! `\`, `;`, `,` and `"` inside the SSID or password are backslash-escaped,
//! so names without those characters encode byte-for-byte as written.

mod parse;

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::model::CredentialInput;

pub use parse::{ParsedPayload, parse};

/// Prefix of every Wi-Fi QR payload.
pub const SCHEME: &str = "WIFI:";

const RESERVED: &[char] = &['\\', ';', ',', '"'];

/// An encoded payload. Empty means "not ready to render".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode credentials into a Wi-Fi QR payload.
///
/// Returns [`EncodedPayload::empty`] when the network name is empty, or when
/// the password is empty for an encryption kind that needs one. Open networks
/// always emit `nopass`, with whatever password string is present.
pub fn encode(input: &CredentialInput) -> EncodedPayload {
    if input.network_name.is_empty() {
        return EncodedPayload::empty();
    }
    if input.encryption.requires_password() && input.password.is_empty() {
        return EncodedPayload::empty();
    }

    EncodedPayload(format!(
        "{SCHEME}T:{};S:{};P:{};;",
        input.encryption.token(),
        escape_field(&input.network_name),
        escape_field(&input.password),
    ))
}

/// Backslash-escape the characters the payload format reserves.
pub fn escape_field(raw: &str) -> Cow<'_, str> {
    if !raw.contains(RESERVED) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}
