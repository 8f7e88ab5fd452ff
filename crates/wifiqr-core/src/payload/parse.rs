// ── Payload parser ──
//
// Fields are `KEY:value`, separated by unescaped `;`, in any order. An empty
// field (the second `;` of `;;`) ends the payload. A backslash takes the next
// character literally.

use serde::Serialize;

use super::SCHEME;
use crate::error::PayloadError;
use crate::model::EncryptionKind;

/// Fields recovered from a Wi-Fi QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPayload {
    pub ssid: String,
    pub password: Option<String>,
    pub encryption: EncryptionKind,
    pub hidden: bool,
}

/// Parse a Wi-Fi QR payload. Unknown keys are ignored; a missing `T` means
/// an open network.
pub fn parse(input: &str) -> Result<ParsedPayload, PayloadError> {
    let body = input
        .trim_end()
        .strip_prefix(SCHEME)
        .ok_or(PayloadError::MissingScheme)?;

    let mut ssid = None;
    let mut password = None;
    let mut encryption = None;
    let mut hidden = false;

    for (key, value) in split_fields(body)? {
        match key.as_str() {
            "S" => ssid = Some(value),
            "P" => password = Some(value),
            "T" => encryption = Some(parse_encryption(&value)?),
            "H" => hidden = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    Ok(ParsedPayload {
        ssid: ssid.ok_or(PayloadError::MissingSsid)?,
        password,
        encryption: encryption.unwrap_or(EncryptionKind::NoPassword),
        hidden,
    })
}

fn parse_encryption(token: &str) -> Result<EncryptionKind, PayloadError> {
    if token.is_empty() {
        return Ok(EncryptionKind::NoPassword);
    }
    token
        .parse()
        .map_err(|_| PayloadError::UnknownEncryption(token.to_owned()))
}

/// Split the payload body into unescaped `(key, value)` pairs.
fn split_fields(body: &str) -> Result<Vec<(String, String)>, PayloadError> {
    let mut fields = Vec::new();
    let mut key: Option<String> = None;
    let mut current = String::new();
    let mut chars = body.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next().ok_or(PayloadError::DanglingEscape)?;
                current.push(escaped);
            }
            ':' if key.is_none() => key = Some(std::mem::take(&mut current)),
            ';' => {
                let Some(k) = key.take() else {
                    if current.is_empty() {
                        let rest = body.get(idx + 1..).unwrap_or_default();
                        if !rest.is_empty() {
                            return Err(PayloadError::TrailingData(rest.to_owned()));
                        }
                        return Ok(fields);
                    }
                    return Err(PayloadError::MalformedField(current));
                };
                fields.push((k, std::mem::take(&mut current)));
            }
            _ => current.push(c),
        }
    }

    Err(PayloadError::MissingTerminator)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_payload() {
        let parsed = parse("WIFI:T:WPA;S:HomeNet;P:secret123;;").unwrap();
        assert_eq!(
            parsed,
            ParsedPayload {
                ssid: "HomeNet".into(),
                password: Some("secret123".into()),
                encryption: EncryptionKind::Wpa,
                hidden: false,
            }
        );
    }

    #[test]
    fn field_order_is_free_and_hidden_is_read() {
        let parsed = parse("WIFI:S:Lab;H:true;T:WEP;P:k;;").unwrap();
        assert_eq!(parsed.ssid, "Lab");
        assert_eq!(parsed.encryption, EncryptionKind::Wep);
        assert!(parsed.hidden);
    }

    #[test]
    fn missing_type_means_open() {
        let parsed = parse("WIFI:S:OpenCafe;;").unwrap();
        assert_eq!(parsed.encryption, EncryptionKind::NoPassword);
        assert_eq!(parsed.password, None);
    }

    #[test]
    fn unescapes_values() {
        let parsed = parse(r#"WIFI:T:WPA;S:My\;Net\,\"x\"\\;P:a\;b;;"#).unwrap();
        assert_eq!(parsed.ssid, r#"My;Net,"x"\"#);
        assert_eq!(parsed.password.as_deref(), Some("a;b"));
    }

    #[test]
    fn colon_inside_value_is_kept() {
        let parsed = parse("WIFI:S:a:b;P:c:d;T:WPA;;").unwrap();
        assert_eq!(parsed.ssid, "a:b");
        assert_eq!(parsed.password.as_deref(), Some("c:d"));
    }

    #[test]
    fn tolerates_trailing_newline() {
        assert!(parse("WIFI:T:WPA;S:HomeNet;P:x;;\n").is_ok());
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(parse("WIFI;S:x;;"), Err(PayloadError::MissingScheme));
        assert_eq!(
            parse("WIFI:T:WPA;S:HomeNet;P:x;"),
            Err(PayloadError::MissingTerminator)
        );
        assert_eq!(parse("WIFI:T:WPA;;"), Err(PayloadError::MissingSsid));
        assert_eq!(
            parse("WIFI:T:WPA3;S:x;;"),
            Err(PayloadError::UnknownEncryption("WPA3".into()))
        );
        assert_eq!(
            parse("WIFI:S:x;junk;;"),
            Err(PayloadError::MalformedField("junk".into()))
        );
        assert_eq!(parse(r"WIFI:S:x\"), Err(PayloadError::DanglingEscape));
        assert_eq!(
            parse("WIFI:S:x;;extra"),
            Err(PayloadError::TrailingData("extra".into()))
        );
    }
}
