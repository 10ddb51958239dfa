use crate::ser_pipeline::common::error::Result;

/// Consumer of finished frame buffers, called strictly in frame order.
pub trait RawVideoWriter {
    /// Delivers one complete frame. `frame` is the 1-based SER index, for
    /// error context.
    fn write_frame(&mut self, frame: usize, data: &[u8]) -> Result<()>;

    /// Flushes anything buffered once the last frame has been written.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
