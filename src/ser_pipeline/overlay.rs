//! Timestamp overlay module
//!
//! Placement and style types for the timestamp text, the renderer seam for the
//! external glyph rasterizer, and the alpha compositor.

mod compositor;
mod renderer;
pub mod types;

pub use compositor::{blend, blend_channel_16, blend_channel_8};
pub use renderer::{OverlayRequest, TimestampRenderer};
pub use types::{
    OverlayBuffer, OverlayColor, OverlayStyle, TextAnchor, TextPlacement, TimestampZone,
};
