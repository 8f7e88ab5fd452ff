// ── Encryption kind ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Security protocol advertised for the network.
///
/// The closed set understood by the Wi-Fi QR format. Parsing is strict:
/// only the wire tokens `WPA`, `WEP` and `nopass` are accepted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub enum EncryptionKind {
    /// WPA/WPA2 personal.
    #[default]
    #[serde(rename = "WPA")]
    #[strum(to_string = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    #[strum(to_string = "WEP")]
    Wep,
    /// Open network.
    #[serde(rename = "nopass")]
    #[strum(to_string = "nopass")]
    NoPassword,
}

impl EncryptionKind {
    /// Token written after `T:` in the payload.
    pub fn token(self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wep => "WEP",
            Self::NoPassword => "nopass",
        }
    }

    /// Human-facing name, as shown in selection lists.
    pub fn label(self) -> &'static str {
        match self {
            Self::Wpa => "WPA/WPA2",
            Self::Wep => "WEP",
            Self::NoPassword => "No password",
        }
    }

    /// Whether the encoder needs a non-empty password for this kind.
    pub fn requires_password(self) -> bool {
        !matches!(self, Self::NoPassword)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_wire_tokens() {
        assert_eq!("WPA".parse::<EncryptionKind>().unwrap(), EncryptionKind::Wpa);
        assert_eq!("WEP".parse::<EncryptionKind>().unwrap(), EncryptionKind::Wep);
        assert_eq!(
            "nopass".parse::<EncryptionKind>().unwrap(),
            EncryptionKind::NoPassword
        );
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!("wpa".parse::<EncryptionKind>().is_err());
        assert!("WPA2".parse::<EncryptionKind>().is_err());
        assert!("NoPassword".parse::<EncryptionKind>().is_err());
        assert!("".parse::<EncryptionKind>().is_err());
    }

    #[test]
    fn display_matches_token() {
        for kind in EncryptionKind::iter() {
            assert_eq!(kind.to_string(), kind.token());
            assert_eq!(kind.as_ref(), kind.token());
        }
    }

    #[test]
    fn serde_uses_wire_tokens() {
        let json = serde_json::to_string(&EncryptionKind::NoPassword).unwrap();
        assert_eq!(json, "\"nopass\"");
        let back: EncryptionKind = serde_json::from_str("\"WEP\"").unwrap();
        assert_eq!(back, EncryptionKind::Wep);
    }

    #[test]
    fn only_open_networks_skip_password() {
        assert!(EncryptionKind::Wpa.requires_password());
        assert!(EncryptionKind::Wep.requires_password());
        assert!(!EncryptionKind::NoPassword.requires_password());
    }
}
