//! QR rendering: terminal text, SVG markup, and RGB pixels.
//!
//! Module placement comes from the `qrcode` crate. This module only lays
//! the modules out on a card: container background, a QR panel, and the
//! header and brand label.

use fontdue::{Font, FontSettings};
use image::{Rgb, RgbImage};
use qrcode::render::unicode;
use qrcode::{Color, EcLevel, QrCode};

use wifiqr_core::{Card, ErrorCorrection, ExportError, HexColor};

/// Header printed above the code.
pub const CARD_HEADER: &str = "WIFI";

/// Space between the card edge and the QR panel.
const PADDING: u32 = 16;

/// Height of the header and label bands on text-capable cards.
const TEXT_BAND: u32 = 32;

/// Width of the standard QR quiet zone, in modules.
const QUIET_MODULES: u32 = 4;

/// Text size for the header and label, in pixels.
const TEXT_PX: f32 = 16.0;

const CARD_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

/// Run the payload through the QR encoder.
pub fn qr_code(card: &Card<'_>) -> Result<QrCode, ExportError> {
    QrCode::with_error_correction_level(card.payload.as_str(), ec_level(card.render.error_correction))
        .map_err(|e| ExportError::Render {
            message: e.to_string(),
        })
}

// ── Terminal ─────────────────────────────────────────────────────────

/// The card as terminal text: header, code drawn with half blocks, label.
pub fn terminal_card(card: &Card<'_>, quiet_zone: bool) -> Result<String, ExportError> {
    let code = qr_code(card)?;
    let qr = code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(quiet_zone)
        .build();

    let width = qr.lines().next().map_or(0, |line| line.chars().count());
    let mut out = Vec::with_capacity(qr.lines().count() + 2);
    out.push(center(CARD_HEADER, width));
    out.extend(qr.lines().map(str::to_owned));
    out.push(center(card.brand_label, width));
    Ok(out.join("\n"))
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len) / 2;
    format!("{}{text}", " ".repeat(pad))
}

// ── Pixel layout ─────────────────────────────────────────────────────

/// Pixel geometry of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    /// Top-left corner of the QR panel.
    pub panel_x: u32,
    pub panel_y: u32,
    pub panel_size: u32,
    /// Edge length of one module.
    pub module_px: u32,
    /// Top-left corner of module (0, 0).
    pub origin_x: u32,
    pub origin_y: u32,
}

impl CardLayout {
    pub fn new(card: &Card<'_>, modules: u32, with_text: bool) -> Result<Self, ExportError> {
        let size = card.render.size;
        let quiet = if card.render.quiet_zone {
            QUIET_MODULES * 2
        } else {
            0
        };
        let total = modules.saturating_add(quiet);
        let module_px = size / total.max(1);
        if module_px == 0 {
            return Err(ExportError::Render {
                message: format!("{size}px is too small for a {total}-module code"),
            });
        }

        let band = if with_text { TEXT_BAND } else { 0 };
        let inset = (size - module_px * total) / 2;
        let quiet_px = if card.render.quiet_zone {
            QUIET_MODULES * module_px
        } else {
            0
        };

        let fit = |value: u64| {
            u32::try_from(value).map_err(|_| ExportError::Render {
                message: format!("{size}px is too large to lay out"),
            })
        };
        let (size64, padding, band64) = (u64::from(size), u64::from(PADDING), u64::from(band));
        let panel_y = padding + band64;
        let offset = u64::from(inset) + u64::from(quiet_px);

        Ok(Self {
            width: fit(size64 + padding * 2)?,
            height: fit(size64 + padding * 2 + band64 * 2)?,
            panel_x: PADDING,
            panel_y: fit(panel_y)?,
            panel_size: size,
            module_px,
            origin_x: fit(padding + offset)?,
            origin_y: fit(panel_y + offset)?,
        })
    }
}

/// Dark modules as `(column, row)` pairs.
fn dark_modules(code: &QrCode) -> impl Iterator<Item = (u32, u32)> + '_ {
    let width = code.width().max(1);
    code.to_colors()
        .into_iter()
        .enumerate()
        .filter(|(_, color)| *color == Color::Dark)
        .filter_map(move |(idx, _)| {
            let x = u32::try_from(idx % width).ok()?;
            let y = u32::try_from(idx / width).ok()?;
            Some((x, y))
        })
}

fn module_count(code: &QrCode) -> Result<u32, ExportError> {
    u32::try_from(code.width()).map_err(|_| ExportError::Render {
        message: "QR code is too large".into(),
    })
}

// ── Raster ───────────────────────────────────────────────────────────

fn rgb(color: &HexColor) -> Rgb<u8> {
    Rgb(color.rgb())
}

/// The card as an RGB image, header and brand label included.
pub fn raster_card(card: &Card<'_>) -> Result<RgbImage, ExportError> {
    let code = qr_code(card)?;
    let layout = CardLayout::new(card, module_count(&code)?, true)?;
    let font = Font::from_bytes(CARD_FONT, FontSettings::default()).map_err(|e| {
        ExportError::Render {
            message: format!("card font: {e}"),
        }
    })?;

    let mut img = RgbImage::from_pixel(layout.width, layout.height, rgb(card.background_color));
    fill(
        &mut img,
        layout.panel_x,
        layout.panel_y,
        layout.panel_size,
        rgb(&card.render.background),
    );

    let dark = rgb(&card.render.foreground);
    for (x, y) in dark_modules(&code) {
        fill(
            &mut img,
            layout.origin_x + x * layout.module_px,
            layout.origin_y + y * layout.module_px,
            layout.module_px,
            dark,
        );
    }

    draw_text(&mut img, &font, CARD_HEADER, PADDING, layout.panel_size, dark);
    draw_text(
        &mut img,
        &font,
        card.brand_label,
        layout.panel_y + layout.panel_size,
        layout.panel_size,
        dark,
    );
    Ok(img)
}

fn fill(img: &mut RgbImage, x0: u32, y0: u32, size: u32, color: Rgb<u8>) {
    let x1 = x0.saturating_add(size).min(img.width());
    let y1 = y0.saturating_add(size).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draw one line of text centred across the image and within the text
/// band starting at `band_top`. Text wider than `max_width` is scaled down.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
fn draw_text(
    img: &mut RgbImage,
    font: &Font,
    text: &str,
    band_top: u32,
    max_width: u32,
    color: Rgb<u8>,
) {
    let advance =
        |px: f32| -> f32 { text.chars().map(|ch| font.metrics(ch, px).advance_width).sum() };

    let mut px = TEXT_PX;
    let natural = advance(px);
    if natural > max_width as f32 {
        px = (px * max_width as f32 / natural).max(1.0);
    }
    let width = advance(px);
    let (ascent, descent) = font
        .horizontal_line_metrics(px)
        .map_or((px * 0.8, -px * 0.2), |m| (m.ascent, m.descent));
    // descent is negative, so this centres the ascent..descent box in the band
    let baseline = (band_top as f32 + TEXT_BAND as f32 / 2.0 + (ascent + descent) / 2.0).round();
    let mut pen_x = (img.width() as f32 - width) / 2.0;

    for ch in text.chars() {
        let (metrics, coverage) = font.rasterize(ch, px);
        let left = pen_x.round() as i64 + i64::from(metrics.xmin);
        let top = baseline as i64 - (metrics.height as i64 + i64::from(metrics.ymin));
        for (idx, &alpha) in coverage.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let x = u32::try_from(left + (idx % metrics.width) as i64);
            let y = u32::try_from(top + (idx / metrics.width) as i64);
            if let (Ok(x), Ok(y)) = (x, y) {
                if x < img.width() && y < img.height() {
                    let under = *img.get_pixel(x, y);
                    img.put_pixel(x, y, blend(under, color, alpha));
                }
            }
        }
        pen_x += metrics.advance_width;
    }
}

/// Mix `over` onto `under` by glyph coverage.
fn blend(under: Rgb<u8>, over: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = u16::from(alpha);
    let mix = |b: u8, f: u8| {
        let v = (u16::from(f) * a + u16::from(b) * (255 - a) + 127) / 255;
        u8::try_from(v).unwrap_or(u8::MAX)
    };
    let (Rgb([br, bg, bb]), Rgb([fr, fg, fb])) = (under, over);
    Rgb([mix(br, fr), mix(bg, fg), mix(bb, fb)])
}

// ── SVG ──────────────────────────────────────────────────────────────

/// The card as a standalone SVG document, header and brand label included.
pub fn svg_card(card: &Card<'_>) -> Result<String, ExportError> {
    let code = qr_code(card)?;
    let layout = CardLayout::new(card, module_count(&code)?, true)?;
    let m = layout.module_px;

    let path: String = dark_modules(&code)
        .map(|(x, y)| {
            format!(
                "M{},{}h{m}v{m}h-{m}z",
                layout.origin_x + x * m,
                layout.origin_y + y * m
            )
        })
        .collect();

    let mid = layout.width / 2;
    let header_y = PADDING + TEXT_BAND / 2;
    let label_y = layout.panel_y + layout.panel_size + TEXT_BAND / 2;
    let text = card.render.foreground.as_str();

    Ok(format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            "\n",
            r#"<rect width="{w}" height="{h}" rx="8" fill="{card_bg}"/>"#,
            "\n",
            r#"<text x="{mid}" y="{header_y}" text-anchor="middle" dominant-baseline="middle" font-family="sans-serif" font-size="{font_px}" fill="{text}">{header}</text>"#,
            "\n",
            r#"<rect x="{px}" y="{py}" width="{ps}" height="{ps}" fill="{panel_bg}"/>"#,
            "\n",
            r#"<path d="{path}" fill="{fg}"/>"#,
            "\n",
            r#"<text x="{mid}" y="{label_y}" text-anchor="middle" dominant-baseline="middle" font-family="sans-serif" font-size="{font_px}" fill="{text}">{label}</text>"#,
            "\n</svg>\n"
        ),
        w = layout.width,
        h = layout.height,
        card_bg = card.background_color,
        mid = mid,
        header_y = header_y,
        text = text,
        header = CARD_HEADER,
        px = layout.panel_x,
        py = layout.panel_y,
        ps = layout.panel_size,
        panel_bg = card.render.background,
        path = path,
        fg = card.render.foreground,
        label_y = label_y,
        label = xml_escape(card.brand_label),
        font_px = TEXT_PX,
    ))
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wifiqr_core::{QrGenerator, RenderOptions};

    fn ready(render: RenderOptions, brand: &str) -> QrGenerator {
        let mut generator = QrGenerator::new(render);
        generator.edit(
            wifiqr_core::FormInput::default()
                .with_network_name("HomeNet")
                .with_password("secret123")
                .with_brand_label(brand)
                .with_background_color("#ff0000"),
        );
        generator.submit().unwrap();
        generator
    }

    #[test]
    fn terminal_card_frames_code_with_header_and_label() {
        let generator = ready(RenderOptions::default(), "ODD");
        let text = terminal_card(&generator.card().unwrap(), true).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first().unwrap().trim(), "WIFI");
        assert_eq!(lines.last().unwrap().trim(), "ODD");
        assert!(lines.len() > 10);
    }

    #[test]
    fn layout_centers_modules_in_panel() {
        let generator = ready(RenderOptions::default(), "ODD");
        let card = generator.card().unwrap();
        let layout = CardLayout::new(&card, 25, false).unwrap();
        assert_eq!(layout.module_px, 7);
        assert_eq!(layout.width, 192 + 32);
        assert_eq!(layout.height, 192 + 32);
        // 192 - 25 * 7 = 17 spare pixels, 8 on the leading side
        assert_eq!(layout.origin_x, 16 + 8);
    }

    #[test]
    fn layout_rejects_tiny_panels() {
        let render = RenderOptions {
            size: 20,
            ..RenderOptions::default()
        };
        let generator = ready(render, "ODD");
        let card = generator.card().unwrap();
        assert!(matches!(
            CardLayout::new(&card, 25, false),
            Err(ExportError::Render { .. })
        ));
    }

    #[test]
    fn raster_card_paints_background_and_modules() {
        let generator = ready(RenderOptions::default(), "ODD");
        let img = raster_card(&generator.card().unwrap()).unwrap();
        assert_eq!(img.dimensions(), (224, 288));
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert!(img.pixels().any(|px| *px == Rgb([0, 0, 0])));
        assert!(img.pixels().any(|px| *px == Rgb([255, 255, 255])));
    }

    fn inked_rows(img: &RgbImage, rows: std::ops::Range<u32>) -> usize {
        rows.flat_map(|y| (0..img.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) != Rgb([255, 0, 0]))
            .count()
    }

    #[test]
    fn raster_card_draws_header_and_label() {
        let generator = ready(RenderOptions::default(), "ODD");
        let img = raster_card(&generator.card().unwrap()).unwrap();
        // header band sits between the top padding and the panel
        assert!(inked_rows(&img, 16..48) > 0);
        // label band sits between the panel and the bottom padding
        assert!(inked_rows(&img, 240..272) > 0);
        // padding stays clear
        assert_eq!(inked_rows(&img, 0..16), 0);
        assert_eq!(inked_rows(&img, 272..288), 0);
    }

    #[test]
    fn raster_label_changes_the_image() {
        let a = raster_card(&ready(RenderOptions::default(), "ODD").card().unwrap()).unwrap();
        let b = raster_card(&ready(RenderOptions::default(), "Cafe").card().unwrap()).unwrap();
        assert_ne!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn long_label_stays_inside_the_card() {
        let generator = ready(RenderOptions::default(), &"W".repeat(80));
        let img = raster_card(&generator.card().unwrap()).unwrap();
        let edge = |x: u32| (240..272).all(|y| *img.get_pixel(x, y) == Rgb([255, 0, 0]));
        assert!((0..8).all(edge));
        assert!((216..224).all(edge));
    }

    #[test]
    fn blend_uses_coverage() {
        let red = Rgb([255, 0, 0]);
        let black = Rgb([0, 0, 0]);
        assert_eq!(blend(red, black, 255), black);
        assert_eq!(blend(red, black, 0), red);
        assert_eq!(blend(red, black, 128), Rgb([127, 0, 0]));
    }

    #[test]
    fn layout_rejects_sizes_that_overflow() {
        let render = RenderOptions {
            size: u32::MAX,
            ..RenderOptions::default()
        };
        let generator = ready(render, "ODD");
        let card = generator.card().unwrap();
        assert!(matches!(
            CardLayout::new(&card, 25, true),
            Err(ExportError::Render { .. })
        ));
    }

    #[test]
    fn svg_card_escapes_brand_label() {
        let generator = ready(RenderOptions::default(), "Tom & <Jerry>");
        let svg = svg_card(&generator.card().unwrap()).unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(">WIFI</text>"));
    }

    #[test]
    fn oversized_payload_fails_to_render() {
        let mut generator = QrGenerator::default();
        generator.edit(
            wifiqr_core::FormInput::default()
                .with_network_name("a".repeat(5000))
                .with_password("secret123"),
        );
        generator.submit().unwrap();
        assert!(matches!(
            qr_code(&generator.card().unwrap()),
            Err(ExportError::Render { .. })
        ));
    }
}
