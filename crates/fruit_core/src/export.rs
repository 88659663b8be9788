//! Client-side exports of the last result: pretty JSON and a PNG summary card.

use crate::api::PredictionResponse;
use crate::error::{ClassifierError, Result};
use crate::format::format_percent;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont, point};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;

pub const CARD_WIDTH: u32 = 500;
pub const CARD_HEIGHT: u32 = 350;
const CARD_MARGIN: u32 = 15;
const CARD_THUMB: u32 = 150;
const TEXT_X: f32 = 180.0;

const BACKGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const INK: Rgba<u8> = Rgba([0x1f, 0x29, 0x37, 0xff]);
const ACCENT: Rgba<u8> = Rgba([0x05, 0x96, 0x69, 0xff]);

/// Localized captions drawn on the summary card.
#[derive(Debug, Clone)]
pub struct CardLabels {
    pub heading: String,
    pub confidence: String,
    pub time: String,
}

impl Default for CardLabels {
    fn default() -> Self {
        Self {
            heading: "Clasificación:".into(),
            confidence: "Confianza".into(),
            time: "Tiempo".into(),
        }
    }
}

pub fn json_file_name(unix_millis: i64) -> String {
    format!("prediccion-{unix_millis}.json")
}

pub fn card_file_name(unix_millis: i64) -> String {
    format!("resultado-{unix_millis}.png")
}

pub fn result_json(result: &PredictionResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Writes the result as pretty JSON. Returns `Ok(false)` without touching the
/// file system when there is no result.
pub fn export_result_json(
    result: Option<&PredictionResponse>,
    path: impl AsRef<Path>,
) -> Result<bool> {
    let Some(result) = result else {
        return Ok(false);
    };
    fs::write(path.as_ref(), result_json(result)?)?;
    tracing::info!("Exported result JSON to {}", path.as_ref().display());
    Ok(true)
}

/// Writes the summary card as PNG. Returns `Ok(false)` when either the result
/// or the preview is missing.
pub fn export_result_card(
    result: Option<&PredictionResponse>,
    preview: Option<&RgbaImage>,
    labels: &CardLabels,
    path: impl AsRef<Path>,
) -> Result<bool> {
    let (Some(result), Some(preview)) = (result, preview) else {
        return Ok(false);
    };
    let card = render_result_card(result, preview, labels)?;
    card.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    tracing::info!("Exported result card to {}", path.as_ref().display());
    Ok(true)
}

/// Draws the preview plus headline metrics onto a 500x350 canvas.
pub fn render_result_card(
    result: &PredictionResponse,
    preview: &RgbaImage,
    labels: &CardLabels,
) -> Result<RgbaImage> {
    let mut canvas = RgbaImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, BACKGROUND);
    let thumb = imageops::resize(preview, CARD_THUMB, CARD_THUMB, FilterType::Triangle);
    imageops::overlay(
        &mut canvas,
        &thumb,
        i64::from(CARD_MARGIN),
        i64::from(CARD_MARGIN),
    );

    let font = load_card_font(epaint_default_fonts::UBUNTU_LIGHT)?;
    draw_text(&mut canvas, &font, 24.0, TEXT_X, 50.0, INK, &labels.heading);
    draw_text(
        &mut canvas,
        &font,
        32.0,
        TEXT_X,
        90.0,
        ACCENT,
        &result.prediction.fruit,
    );
    draw_text(
        &mut canvas,
        &font,
        16.0,
        TEXT_X,
        120.0,
        INK,
        &format!(
            "{}: {}",
            labels.confidence,
            format_percent(result.prediction.confidence)
        ),
    );
    draw_text(
        &mut canvas,
        &font,
        16.0,
        TEXT_X,
        145.0,
        INK,
        &format!("{}: {}", labels.time, result.processing_time),
    );
    Ok(canvas)
}

fn load_card_font(data: &[u8]) -> Result<FontRef<'_>> {
    FontRef::try_from_slice(data).map_err(|e| ClassifierError::Font(e.to_string()))
}

/// Renders `text` with its baseline at `baseline_y`, alpha-blending onto `canvas`.
fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontRef<'_>,
    size: f32,
    x: f32,
    baseline_y: f32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let mut caret = x;
    let mut previous = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline_y));
        caret += scaled.h_advance(id);
        previous = Some(id);
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + i64::from(gx);
            let py = bounds.min.y as i64 + i64::from(gy);
            if px < 0
                || py < 0
                || px >= i64::from(canvas.width())
                || py >= i64::from(canvas.height())
            {
                return;
            }
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            let a = coverage.clamp(0.0, 1.0);
            for c in 0..3 {
                let blended = f32::from(color.0[c]) * a + f32::from(dst.0[c]) * (1.0 - a);
                dst.0[c] = blended.round() as u8;
            }
        });
    }
}
