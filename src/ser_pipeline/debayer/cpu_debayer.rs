use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::debug;

use crate::ser_pipeline::common::error::{Result, SerError};
use crate::ser_pipeline::container::{BitDepth, ColorId, RawFrame};
use crate::ser_pipeline::debayer::types::RgbFrame;

/// Converts raw sensor frames to RGB according to the container's color id.
///
/// Bayer frames go through the `bayer` crate's linear interpolation, which
/// mirrors the frame across its borders; monochrome frames are replicated
/// into all three channels. Output depth always matches the input depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorReconstructor;

impl ColorReconstructor {
    pub fn new() -> Self {
        Self
    }

    /// Same as [`reconstruct`](Self::reconstruct), taking the raw header code.
    pub fn reconstruct_code(&self, raw: &RawFrame, code: u32) -> Result<RgbFrame> {
        self.reconstruct(raw, ColorId::try_from(code)?)
    }

    pub fn reconstruct(&self, raw: &RawFrame, color: ColorId) -> Result<RgbFrame> {
        if raw.data.len() != raw.width * raw.height {
            return Err(SerError::InvalidDimensions(raw.width, raw.height));
        }

        let cfa = match color {
            ColorId::Mono => return Ok(self.expand_gray(raw)),
            ColorId::BayerRggb => CFA::RGGB,
            ColorId::BayerGrbg => CFA::GRBG,
            ColorId::BayerGbrg => CFA::GBRG,
            ColorId::BayerBggr => CFA::BGGR,
        };
        self.demosaic(raw, cfa)
    }

    fn expand_gray(&self, raw: &RawFrame) -> RgbFrame {
        RgbFrame {
            width: raw.width,
            height: raw.height,
            data: raw.data.iter().flat_map(|&v| [v, v, v]).collect(),
            bit_depth: raw.bit_depth,
        }
    }

    fn demosaic(&self, raw: &RawFrame, cfa: CFA) -> Result<RgbFrame> {
        let width = raw.width;
        let height = raw.height;
        if width < 2 || height < 2 {
            return Err(SerError::InvalidDimensions(width, height));
        }

        let (bayer_depth, raster_depth, bytes_per_pixel) = match raw.bit_depth {
            BitDepth::Eight => (BayerDepth::Depth8, RasterDepth::Depth8, 1),
            BitDepth::Sixteen => (BayerDepth::Depth16LE, RasterDepth::Depth16, 2),
        };

        let bayer_bytes: Vec<u8> = match raw.bit_depth {
            BitDepth::Eight => raw.data.iter().map(|&val| val as u8).collect(),
            BitDepth::Sixteen => raw.data.iter().flat_map(|&val| val.to_le_bytes()).collect(),
        };

        let mut output_buf = vec![0u8; width * height * 3 * bytes_per_pixel];
        debug!(
            width,
            height,
            depth = ?bayer_depth,
            cfa = ?cfa,
            "Running linear demosaic"
        );

        let mut cursor = Cursor::new(&bayer_bytes[..]);
        let mut output_raster = RasterMut::new(width, height, raster_depth, &mut output_buf);
        bayer::run_demosaic(&mut cursor, bayer_depth, cfa, Demosaic::Linear, &mut output_raster)
            .map_err(|e| SerError::UnsupportedFormat(format!("demosaic failed: {e:?}")))?;

        // 16-bit rasters are written in native byte order
        let data: Vec<u16> = match raw.bit_depth {
            BitDepth::Eight => output_buf.iter().map(|&v| v as u16).collect(),
            BitDepth::Sixteen => output_buf
                .chunks_exact(2)
                .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                .collect(),
        };

        Ok(RgbFrame {
            width,
            height,
            data,
            bit_depth: raw.bit_depth,
        })
    }
}
