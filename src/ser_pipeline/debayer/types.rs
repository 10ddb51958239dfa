//! Types for color reconstruction

use crate::ser_pipeline::container::BitDepth;

/// RGB image data after color reconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u16>,
    /// Per-channel depth, same as the samples it was reconstructed from
    pub bit_depth: BitDepth,
}

impl RgbFrame {
    /// Serializes the pixels for a raw video consumer: one byte per channel
    /// for 8-bit frames, native-endian u16 per channel for 16-bit frames.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self.bit_depth {
            BitDepth::Eight => self.data.iter().map(|&v| v as u8).collect(),
            BitDepth::Sixteen => self.data.iter().flat_map(|&v| v.to_ne_bytes()).collect(),
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u16; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
