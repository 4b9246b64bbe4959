use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::Color32;

/// Deterministic pair in `[-1, 1]` derived from `id`, used to scatter new nodes.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Parses `#rrggbb`/`#rrggbbaa` colours; anything else renders as the error colour.
pub fn parse_color(value: &str) -> Color32 {
    Color32::from_hex(value.trim()).unwrap_or(Color32::from_rgb(0xFF, 0x00, 0x00))
}
