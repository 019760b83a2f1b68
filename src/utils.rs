//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;

// Car badge for the header logo and window icon
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect x="2" y="2" width="60" height="60" rx="10" fill="#2563eb" stroke="#0a0a0a" stroke-width="3"/><path d="M14 38 L18 26 Q19.5 22 24 22 L40 22 Q44.5 22 46 26 L50 38 Z" fill="#facc15" stroke="#0a0a0a" stroke-width="2.5" stroke-linejoin="round"/><rect x="10" y="36" width="44" height="10" rx="3" fill="#facc15" stroke="#0a0a0a" stroke-width="2.5"/><path d="M22 27 L42 27 L44 34 L20 34 Z" fill="#ffffff" stroke="#0a0a0a" stroke-width="2"/><circle cx="20" cy="47" r="5" fill="#0a0a0a"/><circle cx="44" cy="47" r="5" fill="#0a0a0a"/></svg>"##;

/// Rasterize the logo SVG to a square RGBA image. Returns (pixels, width, height).
pub fn rasterize_logo(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// App data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    get_data_dir().join("cache")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_logo() {
        let (pixels, w, h) = rasterize_logo(32).unwrap();
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
        // Badge fill reaches the center
        let center = ((16 * 32 + 16) * 4) as usize;
        assert_eq!(pixels[center + 3], 255);
    }
}
