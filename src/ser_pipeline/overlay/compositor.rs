//! Alpha compositing of an RGBA8 overlay onto an RGB frame.
//!
//! All arithmetic is exact integer math and the result is truncated, not
//! rounded: `(a * fg + (MAX - a) * bg) / MAX`. For 16-bit frames the overlay
//! color and alpha are first widened by 257 so that 0..=255 maps onto
//! 0..=65535.

use tracing::trace;

use crate::ser_pipeline::common::error::Result;
use crate::ser_pipeline::container::BitDepth;
use crate::ser_pipeline::debayer::RgbFrame;
use crate::ser_pipeline::overlay::types::OverlayBuffer;

const WIDEN_8_TO_16: u32 = 257;

/// Blends one 16-bit channel. `fg` and `alpha` are already widened.
pub fn blend_channel_16(fg: u16, alpha: u16, bg: u16) -> u16 {
    let max = u16::MAX as u64;
    let alpha = alpha as u64;
    ((alpha * fg as u64 + (max - alpha) * bg as u64) / max) as u16
}

/// Blends one 8-bit channel.
pub fn blend_channel_8(fg: u8, alpha: u8, bg: u8) -> u8 {
    let max = u8::MAX as u32;
    let alpha = alpha as u32;
    ((alpha * fg as u32 + (max - alpha) * bg as u32) / max) as u8
}

/// Composites `overlay` over `image`. The output keeps the image's depth and
/// has no alpha channel.
pub fn blend(overlay: &OverlayBuffer, image: &RgbFrame) -> Result<RgbFrame> {
    overlay.check_size(image.width, image.height)?;
    trace!(width = image.width, height = image.height, "Blending overlay");

    let data = image
        .data
        .chunks_exact(3)
        .zip(overlay.data.chunks_exact(4))
        .flat_map(|(base, over)| {
            let alpha = over[3];
            let mut out = [0u16; 3];
            for c in 0..3 {
                out[c] = match image.bit_depth {
                    BitDepth::Eight => blend_channel_8(over[c], alpha, base[c] as u8) as u16,
                    BitDepth::Sixteen => blend_channel_16(
                        (over[c] as u32 * WIDEN_8_TO_16) as u16,
                        (alpha as u32 * WIDEN_8_TO_16) as u16,
                        base[c],
                    ),
                };
            }
            out
        })
        .collect();

    Ok(RgbFrame {
        width: image.width,
        height: image.height,
        data,
        bit_depth: image.bit_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser_pipeline::common::error::SerError;
    use crate::ser_pipeline::overlay::types::OverlayColor;

    fn image16(width: usize, height: usize) -> RgbFrame {
        RgbFrame {
            width,
            height,
            data: (0..width * height * 3).map(|i| (i as u16).wrapping_mul(4099)).collect(),
            bit_depth: BitDepth::Sixteen,
        }
    }

    fn filled(width: usize, height: usize, color: OverlayColor) -> OverlayBuffer {
        let mut overlay = OverlayBuffer::transparent(width, height);
        for y in 0..height {
            for x in 0..width {
                overlay.put_pixel(x, y, color);
            }
        }
        overlay
    }

    #[test]
    fn test_transparent_overlay_is_identity() {
        let image = image16(4, 3);
        let blended = blend(&OverlayBuffer::transparent(4, 3), &image).unwrap();
        assert_eq!(blended, image);

        // color under zero alpha must not leak through either
        let ghost = filled(4, 3, OverlayColor { r: 255, g: 255, b: 255, a: 0 });
        assert_eq!(blend(&ghost, &image).unwrap(), image);
    }

    #[test]
    fn test_opaque_overlay_replaces_with_widened_color() {
        let image = image16(4, 3);
        let overlay = filled(4, 3, OverlayColor { r: 0xFF, g: 0x88, b: 0x01, a: 0xFF });
        let blended = blend(&overlay, &image).unwrap();
        for pixel in blended.data.chunks_exact(3) {
            assert_eq!(pixel, &[65535, 0x88 * 257, 257]);
        }
    }

    #[test]
    fn test_channel_truncates() {
        // 0xC0 widened: 49344; 49344 * 65535 / 65535 + 16191 * 1 / 65535 = 49344.247..
        assert_eq!(blend_channel_16(65535, 49344, 1), 49344);
        // half alpha between 0 and 1 rounds down
        assert_eq!(blend_channel_16(1, 32768, 0), 0);
        assert_eq!(blend_channel_8(255, 128, 0), 128);
        assert_eq!(blend_channel_8(1, 128, 0), 0);
        assert_eq!(blend_channel_8(200, 0, 17), 17);
        assert_eq!(blend_channel_8(200, 255, 17), 200);
    }

    #[test]
    fn test_eight_bit_image_blend() {
        let image = RgbFrame {
            width: 1,
            height: 2,
            data: vec![0, 100, 255, 10, 20, 30],
            bit_depth: BitDepth::Eight,
        };
        let mut overlay = OverlayBuffer::transparent(1, 2);
        overlay.put_pixel(0, 0, OverlayColor { r: 255, g: 0, b: 0, a: 51 });
        let blended = blend(&overlay, &image).unwrap();
        // 51/255 = 0.2
        assert_eq!(&blended.data[..3], &[51, 80, 204]);
        assert_eq!(&blended.data[3..], &[10, 20, 30]);
        assert_eq!(blended.bit_depth, BitDepth::Eight);
    }

    #[test]
    fn test_size_mismatch() {
        let result = blend(&OverlayBuffer::transparent(2, 2), &image16(4, 3));
        assert!(matches!(result, Err(SerError::InvalidDimensions(2, 2))));
    }
}
