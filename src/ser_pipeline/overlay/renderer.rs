use chrono::{DateTime, Utc};

use crate::ser_pipeline::common::error::Result;
use crate::ser_pipeline::overlay::types::{OverlayBuffer, OverlayColor, OverlayStyle, TextAnchor};

/// What to draw for one frame.
#[derive(Debug, Clone)]
pub struct OverlayRequest<'a> {
    /// Frame width; the returned buffer must match it
    pub width: usize,
    /// Frame height; the returned buffer must match it
    pub height: usize,
    /// Capture instant of the frame
    pub instant: DateTime<Utc>,
    /// `instant` already formatted in the configured time zone
    pub text: &'a str,
    /// Anchor point in pixels, margins applied
    pub position: (f32, f32),
    pub anchor: TextAnchor,
    pub font_size: u32,
    pub color: OverlayColor,
}

impl<'a> OverlayRequest<'a> {
    pub fn new(
        width: usize,
        height: usize,
        instant: DateTime<Utc>,
        text: &'a str,
        style: &OverlayStyle,
    ) -> Self {
        Self {
            width,
            height,
            instant,
            text,
            position: style.placement.point(width, height),
            anchor: style.placement.anchor,
            font_size: style.font_size,
            color: style.color,
        }
    }
}

/// Rasterizes timestamp text into a frame-sized RGBA8 buffer.
///
/// Implementations own their font; this crate never resolves font paths.
/// Rasterizer failures are reported as
/// [`SerError::Overlay`](crate::ser_pipeline::SerError::Overlay).
pub trait TimestampRenderer {
    fn render(&self, request: &OverlayRequest<'_>) -> Result<OverlayBuffer>;
}
