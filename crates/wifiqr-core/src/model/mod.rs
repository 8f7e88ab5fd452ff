// ── Domain model ──
//
// Raw form state, the typed credentials it validates into, and the two
// value types (encryption kind, hex color) those credentials are built from.

pub mod color;
pub mod credential;
pub mod encryption;

pub use color::HexColor;
pub use credential::{CredentialInput, FormInput};
pub use encryption::EncryptionKind;
