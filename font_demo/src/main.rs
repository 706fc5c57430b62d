//! Font demo application
//!
//! Builds a text renderer over the recording backend, draws a few HUD-style
//! strings and logs what a real graphics backend would have received.
//!
//! Usage: `font_demo [font.toml|font.ron]`. Without a config file a
//! generated block font is used so the demo runs without assets.

use bitmap_text::prelude::*;
use bitmap_text::render::text::{cell_origin, ATLAS_SIZE, CELL_SIZE};

/// Block font: glyph `n` is filled up to column `n % 6 + 1`
fn generated_bitmap() -> ImageData {
    let mut image = ImageData::solid_color(ATLAS_SIZE, ATLAS_SIZE, [0, 0, 0, 0]);
    for glyph in 33..=255u8 {
        let (x, y) = cell_origin(glyph);
        let width = u32::from(glyph) % 6 + 2;
        for col in 0..width {
            for row in 0..CELL_SIZE - 1 {
                image.set_pixel(x + col, y + row, [255, 255, 255, 255]);
            }
        }
    }
    image
}

fn build_renderer() -> Result<(TextRenderer<RecordingBackend>, FontConfig), Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Reading font config from {}", path);
            let config = FontConfig::load_from_file(&path)?;
            config.validate()?;
            let renderer = TextRenderer::from_config(&config, RecordingBackend::new())?;
            Ok((renderer, config))
        }
        None => {
            log::info!("No config given, using a generated block font");
            let renderer = TextRenderer::new(RecordingBackend::new(), &generated_bitmap(), CharacterMap::default())?;
            Ok((renderer, FontConfig::default()))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    bitmap_text::foundation::logging::init_with_filter("info");

    let (mut text, config) = build_renderer()?;

    let lines = [
        "§eBitmap Text §7v0.1",
        "§aHealth: §f20/20  §9Armor: §f7",
        "§zUnknown codes fall back to white",
    ];
    for (row, line) in lines.iter().enumerate() {
        let y = 2 + row as i32 * 10;
        if config.shadow {
            text.draw_string_with_shadow(line, 2, y, config.default_color)?;
        } else {
            text.draw_string(line, 2, y, config.default_color)?;
        }
        log::info!("{:?} is {} px wide", line, text.measure_width(line));
    }

    let tooltip = "A wooden pickaxe. Mines stone and coal ore, but breaks after a while.\nDurability: 59";
    let max_width = 120;
    text.draw_wrapped(tooltip, 2, 40, max_width, 0x00A0_A0A0)?;
    for span in text.wrap_text(tooltip, max_width).lines {
        log::info!("  wrapped: {:?}", span.text(tooltip));
    }
    log::info!("Tooltip height at {} px: {}", max_width, text.wrap_height(tooltip, max_width));

    let backend = text.backend();
    log::info!(
        "Issued {} backend calls, {} batches, {} glyphs",
        backend.calls().len(),
        backend.batches().len(),
        backend.drawn().len()
    );
    Ok(())
}
