// ── Render / export boundary ──
//
// The core never draws pixels. It describes what to draw (a `Card`) and
// hands it to an `Exporter` supplied by the caller.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ExportError;
use crate::model::HexColor;
use crate::payload::EncodedPayload;

/// File name used when the caller does not pick one.
pub const DEFAULT_EXPORT_FILE: &str = "wifi-qr-code.png";

/// Largest QR panel edge, in pixels, a renderer is asked to draw.
pub const MAX_RENDER_SIZE: u32 = 4096;

/// QR error-correction level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    #[default]
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

/// Parameters passed to the QR renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Edge length of the QR panel in pixels.
    pub size: u32,
    pub foreground: HexColor,
    pub background: HexColor,
    pub error_correction: ErrorCorrection,
    /// Surround the code with the standard 4-module margin.
    pub quiet_zone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 192,
            foreground: HexColor::black(),
            background: HexColor::white(),
            error_correction: ErrorCorrection::L,
            quiet_zone: false,
        }
    }
}

/// Everything needed to draw the visible card: the QR code, the brand label
/// under it, and the container background.
#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    pub payload: &'a EncodedPayload,
    pub brand_label: &'a str,
    pub background_color: &'a HexColor,
    pub render: &'a RenderOptions,
}

/// Captures a rendered card somewhere (a file, a buffer, a clipboard).
///
/// Called at most once per request; failures are returned, not retried.
pub trait Exporter {
    type Output;

    fn export(&self, card: &Card<'_>) -> Result<Self::Output, ExportError>;
}
