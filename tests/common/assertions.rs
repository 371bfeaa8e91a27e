//! Assertion helpers for tests.

use panel_dither::{Palette, Srgb};
use photoframe::RgbImage;
use pretty_assertions::assert_eq;

/// Assert every pixel is an official palette color
pub fn assert_palette_only(data: &[u8], palette: &Palette) {
    for (i, px) in data.chunks_exact(3).enumerate() {
        let color = Srgb::new(px[0], px[1], px[2]);
        assert!(
            palette.index_of_official(color).is_some(),
            "Pixel {} is {}, not an official palette color",
            i,
            color
        );
    }
}

/// Assert an RGB buffer has the expected size and palette-only content
pub fn assert_panel_ready(image: &RgbImage, width: u32, height: u32, palette: &Palette) {
    assert_eq!(
        (image.width, image.height),
        (width, height),
        "Unexpected output dimensions"
    );
    assert_eq!(image.data.len(), (width * height * 3) as usize);
    assert_palette_only(&image.data, palette);
}

/// Decode file bytes with the image crate into (width, height, rgb)
pub fn decode_rgb(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
    let image = image::load_from_memory(bytes)
        .unwrap_or_else(|e| panic!("Output is not a decodable image: {e}"));
    let rgb = image.into_rgb8();
    (rgb.width(), rgb.height(), rgb.into_raw())
}
