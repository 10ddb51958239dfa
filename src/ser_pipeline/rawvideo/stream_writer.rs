use std::io::Write;

use tracing::debug;

use crate::ser_pipeline::common::error::{Result, SerError};
use crate::ser_pipeline::rawvideo::writer::RawVideoWriter;

/// Writes frames back to back into any byte sink, e.g. an encoder's stdin.
pub struct StreamRawVideoWriter<W: Write> {
    sink: W,
    frames_written: usize,
    last_frame: usize,
}

impl<W: Write> StreamRawVideoWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            frames_written: 0,
            last_frame: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RawVideoWriter for StreamRawVideoWriter<W> {
    fn write_frame(&mut self, frame: usize, data: &[u8]) -> Result<()> {
        self.sink
            .write_all(data)
            .map_err(|source| SerError::Sink { frame, source })?;
        self.frames_written += 1;
        self.last_frame = frame;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        debug!(frames = self.frames_written, "Flushing raw video sink");
        self.sink.flush().map_err(|source| SerError::Sink {
            frame: self.last_frame,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_frames_concatenated() {
        let mut writer = StreamRawVideoWriter::new(Vec::new());
        writer.write_frame(1, &[1, 2, 3]).unwrap();
        writer.write_frame(3, &[4, 5, 6]).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.frames_written(), 2);
        assert_eq!(writer.into_inner(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_broken_pipe_reports_frame() {
        let mut writer = StreamRawVideoWriter::new(ClosedPipe);
        let err = writer.write_frame(7, &[0; 12]).unwrap_err();
        assert!(matches!(err, SerError::Sink { frame: 7, .. }));
        assert_eq!(writer.frames_written(), 0);
    }
}
