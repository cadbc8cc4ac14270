//! Image decode/encode and the byte-budget search.

mod search;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage, RgbaImage};

use crate::error::{AdsynthError, Result};

pub use search::{fit_to_ceiling, scaled_size, CompressionConfig, SearchState};

/// Decode an encoded raster. `what` names the input in the error.
pub fn decode_raster(bytes: &[u8], what: &str) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| AdsynthError::decode(what, e))
}

/// Encode an RGB frame as baseline JPEG.
pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    frame
        .write_with_encoder(encoder)
        .map_err(|e| AdsynthError::Encode {
            message: e.to_string(),
        })?;
    Ok(bytes)
}

/// Drop alpha by compositing over white.
pub fn flatten(canvas: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, a] = canvas.get_pixel(x, y).0;
        let over_white = |c: u8| {
            let c = c as u32 * a as u32 + 255 * (255 - a as u32);
            ((c + 127) / 255) as u8
        };
        image::Rgb([over_white(r), over_white(g), over_white(b)])
    })
}
