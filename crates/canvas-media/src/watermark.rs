//! Text watermark rendering
//!
//! Glyphs come from the 8x8 bitmap fonts in `font8x8`, scaled up so the text height
//! tracks one sixth of the image width. The overlay is black at 20% opacity.

use std::io;
use std::path::{Path, PathBuf};

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{imageops, DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};

use tracing::warn;

use crate::error::MediaError;

/// Attribution used when the artist has no usable display name
pub const DEFAULT_ATTRIBUTION: &str = "Archicanvas";

const GLYPH_SIZE: u32 = 8;
const OVERLAY_COLOR: Rgba<u8> = Rgba([0, 0, 0, 51]);

/// `© {name}`, or the default attribution for a blank name
pub fn watermark_text(artist_name: Option<&str>) -> String {
    let name = artist_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_ATTRIBUTION);
    format!("\u{a9} {name}")
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Transparent canvas of `width` x `height` with `text` centered on it
fn render_overlay(width: u32, height: u32, text: &str) -> RgbaImage {
    let mut overlay = RgbaImage::new(width, height);

    let font_size = width / 6;
    let scale = (font_size / GLYPH_SIZE).max(1);
    let cell = i64::from(GLYPH_SIZE * scale);
    let glyphs: Vec<[u8; 8]> = text.chars().map(glyph).collect();

    let text_width = cell * glyphs.len() as i64;
    let origin_x = (i64::from(width) - text_width) / 2;
    let origin_y = (i64::from(height) - cell) / 2;

    for (index, rows) in glyphs.iter().enumerate() {
        let glyph_x = origin_x + cell * index as i64;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let x0 = glyph_x + i64::from(col * scale);
                let y0 = origin_y + row as i64 * i64::from(scale);
                fill_block(&mut overlay, x0, y0, scale);
            }
        }
    }

    overlay
}

fn fill_block(canvas: &mut RgbaImage, x0: i64, y0: i64, size: u32) {
    let size = i64::from(size);
    for y in y0.max(0)..(y0 + size).min(i64::from(canvas.height())) {
        for x in x0.max(0)..(x0 + size).min(i64::from(canvas.width())) {
            // Both coordinates are clamped to the canvas above
            canvas.put_pixel(x as u32, y as u32, OVERLAY_COLOR);
        }
    }
}

/// Composite the watermark over a decoded image
pub fn apply_watermark(source: &DynamicImage, text: &str) -> RgbaImage {
    let mut base = source.to_rgba8();
    let overlay = render_overlay(base.width(), base.height(), text);
    imageops::overlay(&mut base, &overlay, 0, 0);
    base
}

/// Decode `input`, watermark it, and write a PNG to `output`. Blocking.
pub fn watermark_file(input: &Path, output: &Path, text: &str) -> Result<(), MediaError> {
    let source = ImageReader::open(input)?
        .with_guessed_format()?
        .decode()
        .map_err(MediaError::Decode)?;

    let partial = partial_path(output);
    let written = apply_watermark(&source, text)
        .save_with_format(&partial, ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => MediaError::Io(io),
            other => MediaError::Encode(other),
        })
        .and_then(|()| std::fs::rename(&partial, output).map_err(MediaError::from));

    if written.is_err() {
        discard_partial(&partial);
    }
    written
}

/// Hidden sibling of `output` that is renamed into place once fully written
pub(crate) fn partial_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!(".{name}.part"))
}

pub(crate) fn discard_partial(partial: &Path) {
    if let Err(e) = std::fs::remove_file(partial) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %partial.display(), error = %e, "Failed to remove partial file");
        }
    }
}
