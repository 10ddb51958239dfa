//! SER container reading module
//!
//! This module parses the fixed SER header, loads the trailing timestamp
//! table and provides random access to the raw frames in between.

mod header;
mod reader;
pub mod timestamps;
pub mod types;

pub use header::{SerHeader, HEADER_SIZE};
pub use reader::SerReader;
pub use timestamps::{datetime_to_ticks, ticks_to_datetime};
pub use types::{BitDepth, ByteOrder, ColorId, RawFrame};
