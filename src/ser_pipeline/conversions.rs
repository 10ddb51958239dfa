//! Pipeline conversions module
//!
//! This module contains the orchestration that turns a SER container into a
//! sequence of raw video frame buffers.

mod ser_to_rawvideo;
pub mod types;


pub use ser_to_rawvideo::{FrameIter, SerToRawVideoPipeline};
pub use types::{FrameRange, OverlayMode, PipelineConfig, PipelineConfigBuilder};
