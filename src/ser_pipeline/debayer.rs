//! Color reconstruction module for turning raw sensor frames into RGB

mod cpu_debayer;
pub mod types;

pub use cpu_debayer::ColorReconstructor;
pub use types::RgbFrame;
