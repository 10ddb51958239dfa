//! SER container data types

use std::fmt;

use crate::ser_pipeline::common::error::{Result, SerError};

/// Byte order of pixel samples and timestamp ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Decodes the header's 4-byte endianness flag. Zero selects big-endian.
    pub fn from_flag(flag: u32) -> Self {
        if flag == 0 {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Sample bit depth supported by the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }

    /// Largest sample value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            BitDepth::Eight => u8::MAX as u32,
            BitDepth::Sixteen => u16::MAX as u32,
        }
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = SerError;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            other => Err(SerError::Format(format!(
                "unsupported pixel depth: {other} (expected 8 or 16)"
            ))),
        }
    }
}

/// Sensor color arrangement of the stored samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorId {
    Mono,
    BayerRggb,
    BayerGrbg,
    BayerGbrg,
    BayerBggr,
}

impl ColorId {
    pub fn code(self) -> u32 {
        match self {
            ColorId::Mono => 0,
            ColorId::BayerRggb => 8,
            ColorId::BayerGrbg => 9,
            ColorId::BayerGbrg => 10,
            ColorId::BayerBggr => 11,
        }
    }

    pub fn is_bayer(self) -> bool {
        !matches!(self, ColorId::Mono)
    }
}

impl TryFrom<u32> for ColorId {
    type Error = SerError;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            0 => Ok(ColorId::Mono),
            8 => Ok(ColorId::BayerRggb),
            9 => Ok(ColorId::BayerGrbg),
            10 => Ok(ColorId::BayerGbrg),
            11 => Ok(ColorId::BayerBggr),
            other => Err(SerError::UnsupportedFormat(format!(
                "unsupported SER color id: {other}"
            ))),
        }
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorId::Mono => "MONO",
            ColorId::BayerRggb => "BAYER_RGGB",
            ColorId::BayerGrbg => "BAYER_GRBG",
            ColorId::BayerGbrg => "BAYER_GBRG",
            ColorId::BayerBggr => "BAYER_BGGR",
        };
        f.write_str(name)
    }
}

/// One frame of raw sensor samples, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Width of the frame in pixels
    pub width: usize,
    /// Height of the frame in pixels
    pub height: usize,
    /// Samples widened to u16, single channel (mono or Bayer mosaic)
    pub data: Vec<u16>,
    /// Bit depth the samples were stored with
    pub bit_depth: BitDepth,
}

impl RawFrame {
    pub fn sample(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.width + x]
    }
}
