//! SER to raw video pipeline module
//!
//! This module reads timestamped raw camera frames from a SER container,
//! reconstructs RGB images from the sensor data, optionally composites a
//! rendered timestamp overlay and hands the resulting buffers to a raw-video
//! consumer in presentation order.

pub mod common;
pub mod container;
pub mod debayer;
pub mod overlay;
pub mod rawvideo;
pub mod conversions;

pub use common::{
    SerError,
    Result,
};

pub use container::{
    BitDepth,
    ByteOrder,
    ColorId,
    RawFrame,
    SerHeader,
    SerReader,
};

pub use debayer::{
    ColorReconstructor,
    RgbFrame,
};

pub use overlay::{
    OverlayBuffer,
    OverlayColor,
    OverlayRequest,
    OverlayStyle,
    TextAnchor,
    TextPlacement,
    TimestampRenderer,
    TimestampZone,
};

pub use rawvideo::{
    PixelFormat,
    RawVideoSpec,
    RawVideoWriter,
    StreamRawVideoWriter,
};

pub use conversions::{
    FrameIter,
    FrameRange,
    OverlayMode,
    PipelineConfig,
    PipelineConfigBuilder,
    SerToRawVideoPipeline,
};

#[cfg(test)]
pub(crate) mod test_support;
