//! SER to raw video conversion configuration types

use std::iter::StepBy;
use std::ops::RangeInclusive;

use crate::ser_pipeline::common::error::{Result, SerError};
use crate::ser_pipeline::overlay::{OverlayColor, OverlayStyle, TextAnchor, TimestampZone};

/// What ends up in each emitted buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMode {
    /// Reconstructed pixels only
    #[default]
    Disabled,
    /// Reconstructed pixels with the timestamp blended on top
    Blended,
    /// The RGBA timestamp overlay alone, no pixel data
    OverlayOnly,
}

impl OverlayMode {
    pub fn needs_renderer(self) -> bool {
        !matches!(self, OverlayMode::Disabled)
    }
}

/// Configuration for SER to raw video conversion
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Overlay handling for every frame
    pub overlay: OverlayMode,
    /// Placement, size, color and time zone of the timestamp text
    pub style: OverlayStyle,
    /// Whether to reject frame geometry the color reconstruction cannot
    /// handle when the pipeline is built, rather than on the first frame
    pub validate_dimensions: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            overlay: OverlayMode::Disabled,
            style: OverlayStyle::default(),
            validate_dimensions: true,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    overlay: Option<OverlayMode>,
    style: Option<OverlayStyle>,
    validate_dimensions: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn overlay(mut self, mode: OverlayMode) -> Self {
        self.overlay = Some(mode);
        self
    }

    pub fn style(mut self, style: OverlayStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.style_mut().placement.anchor = anchor;
        self
    }

    pub fn margin(mut self, margin_x: i32, margin_y: i32) -> Self {
        let placement = &mut self.style_mut().placement;
        placement.margin_x = margin_x;
        placement.margin_y = margin_y;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.style_mut().font_size = size;
        self
    }

    pub fn color(mut self, color: OverlayColor) -> Self {
        self.style_mut().color = color;
        self
    }

    pub fn zone(mut self, zone: TimestampZone) -> Self {
        self.style_mut().zone = zone;
        self
    }

    fn style_mut(&mut self) -> &mut OverlayStyle {
        self.style.get_or_insert_with(OverlayStyle::default)
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            overlay: self.overlay.unwrap_or(default.overlay),
            style: self.style.unwrap_or(default.style),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}

/// Inclusive 1-based frame range, emitting every `step`-th frame from `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl FrameRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end, step: 1 }
    }

    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Every frame of a container with `frame_count` frames.
    pub fn all(frame_count: usize) -> Self {
        Self::new(1, frame_count)
    }

    pub fn validate(&self, frame_count: usize) -> Result<()> {
        if self.start == 0 || self.start > frame_count {
            return Err(SerError::Range(format!(
                "invalid start {} (valid range: 1-{frame_count})",
                self.start
            )));
        }
        if self.end < self.start || self.end > frame_count {
            return Err(SerError::Range(format!(
                "invalid end {} (valid range: {}-{frame_count})",
                self.end, self.start
            )));
        }
        if self.step == 0 {
            return Err(SerError::Range("step must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Indices `i` in `start..=end` with `(i - start) % step == 0`. Only
    /// meaningful once validated.
    pub fn indices(&self) -> StepBy<RangeInclusive<usize>> {
        (self.start..=self.end).step_by(self.step.max(1))
    }

    pub fn len(&self) -> usize {
        self.indices().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
