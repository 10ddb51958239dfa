//! Raw video output module
//!
//! Describes the byte stream handed to an external raw video consumer and
//! provides writers for it.

mod writer;
mod stream_writer;
pub mod types;

pub use writer::RawVideoWriter;
pub use stream_writer::StreamRawVideoWriter;
pub use types::{PixelFormat, RawVideoSpec};
