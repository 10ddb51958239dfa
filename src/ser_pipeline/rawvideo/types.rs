//! Raw video stream description types

use std::fmt;

/// Pixel layouts a raw video consumer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGB, 3 bytes per pixel
    Rgb24,
    /// 16-bit RGB, 6 bytes per pixel, native byte order per channel
    Rgb48,
    /// 8-bit RGBA, 4 bytes per pixel
    Rgba,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgb48 => 6,
            PixelFormat::Rgba => 4,
        }
    }

    /// Name understood by rawvideo demuxers.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Rgb48 => "rgb48",
            PixelFormat::Rgba => "rgba",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometry and rate of the stream delivered to the consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVideoSpec {
    pub pixel_format: PixelFormat,
    pub width: usize,
    pub height: usize,
    /// Frame rate exactly as given by the caller, e.g. `29.97`
    pub framerate: String,
}

impl RawVideoSpec {
    /// Size in bytes of every frame in the stream.
    pub fn frame_size(&self) -> usize {
        self.width * self.height * self.pixel_format.bytes_per_pixel()
    }

    /// Encoder input arguments describing a rawvideo stream on stdin.
    pub fn input_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pixel_format".to_string(),
            self.pixel_format.name().to_string(),
            "-s".to_string(),
            format!("{}x{}", self.width, self.height),
            "-framerate".to_string(),
            self.framerate.clone(),
            "-i".to_string(),
            "-".to_string(),
        ]
    }
}
