//! Glyph Grid headless driver
//!
//! Steps the engine on a fixed export clock and prints one JSON line per
//! frame. Usage: `glyph-grid [settings.json] [text] [frames] [fps]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use glam::Vec2;
    use glyph_grid::engine::{Engine, FrameInput, frame_time};
    use glyph_grid::settings::{Distribution, Settings, Tokenization};
    use serde::Serialize;

    #[derive(Serialize)]
    struct FrameSummary<'a> {
        frame: u32,
        time: f32,
        items: usize,
        contacts: usize,
        active_collisions: usize,
        first: Option<&'a glyph_grid::Transform>,
    }

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.first().map(String::as_str) {
        Some(path) if path != "-" => Settings::load(Path::new(path)),
        _ => Settings::default(),
    };
    let text = args.get(1).cloned().unwrap_or_else(|| "GLYPH".to_string());
    let frames: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(120);
    let fps: f32 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(30.0);

    let (tokenization, units): (Tokenization, Vec<String>) = match settings.grid.distribution {
        Distribution::SplitWord => (
            Tokenization::Words,
            text.split_whitespace().map(str::to_string).collect(),
        ),
        _ => (
            Tokenization::Characters,
            text.chars().map(|c| c.to_string()).collect(),
        ),
    };
    let canvas = Vec2::new(1080.0, 1080.0);

    log::info!(
        "Glyph Grid starting: {} units, {} frames at {} fps",
        units.len(),
        frames,
        fps
    );

    let mut engine = Engine::new();
    for frame in 0..frames {
        let time = frame_time(frame, fps);
        let input = FrameInput {
            units: &units,
            tokenization,
            canvas,
            time,
        };
        let items = engine.tick(&input, &settings).len();
        let summary = FrameSummary {
            frame,
            time,
            items,
            contacts: engine.contact_count(),
            active_collisions: engine.active_collisions(),
            first: engine.items().first().map(|item| &item.transformed),
        };
        match serde_json::to_string(&summary) {
            Ok(line) => println!("{line}"),
            Err(e) => log::warn!("Could not serialize frame {frame}: {e}"),
        }
    }

    log::info!("Done after {} frames", frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}
