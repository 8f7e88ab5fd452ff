//! File exporters for the QR card.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::info;

use wifiqr_core::{Card, ExportError, Exporter};

use crate::cli::ImageFormatArg;
use crate::render;

/// Writes the card as a PNG.
#[derive(Debug)]
pub struct PngExporter {
    pub path: PathBuf,
}

impl Exporter for PngExporter {
    type Output = PathBuf;

    fn export(&self, card: &Card<'_>) -> Result<PathBuf, ExportError> {
        let img = render::raster_card(card)?;
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| ExportError::Encode {
                message: e.to_string(),
            })?;
        write_file(&self.path, &buf)?;
        info!(path = %self.path.display(), bytes = buf.len(), "wrote PNG card");
        Ok(self.path.clone())
    }
}

/// Writes the card as an SVG document.
#[derive(Debug)]
pub struct SvgExporter {
    pub path: PathBuf,
}

impl Exporter for SvgExporter {
    type Output = PathBuf;

    fn export(&self, card: &Card<'_>) -> Result<PathBuf, ExportError> {
        let svg = render::svg_card(card)?;
        write_file(&self.path, svg.as_bytes())?;
        info!(path = %self.path.display(), bytes = svg.len(), "wrote SVG card");
        Ok(self.path.clone())
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the image format: explicit flag first, then the file extension,
/// then PNG.
pub fn resolve_format(path: &Path, explicit: Option<ImageFormatArg>) -> ImageFormatArg {
    explicit.unwrap_or_else(|| {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("svg") => ImageFormatArg::Svg,
            _ => ImageFormatArg::Png,
        }
    })
}

/// The exporter for `path` in `format`.
pub fn exporter_for(path: PathBuf, format: ImageFormatArg) -> Box<dyn Exporter<Output = PathBuf>> {
    match format {
        ImageFormatArg::Png => Box::new(PngExporter { path }),
        ImageFormatArg::Svg => Box::new(SvgExporter { path }),
    }
}
