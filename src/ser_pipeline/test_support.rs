//! Synthetic SER containers for tests.

use std::cell::Cell;
use std::io::{Read, Seek, SeekFrom};
use std::rc::Rc;

/// 2024-01-01T00:00:00Z expressed in 100 ns ticks since 0001-01-01.
pub(crate) const BASE_TICKS: u64 = 638_396_640_000_000_000;
pub(crate) const TICKS_PER_SECOND: u64 = 10_000_000;

/// Builds a 178-byte header with the given geometry and non-zero capture times.
pub(crate) fn header_bytes(
    color: u32,
    endian_flag: u32,
    width: u32,
    height: u32,
    depth: u32,
    frames: u32,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(178);
    bytes.extend_from_slice(b"LUCAM-RECORDER");
    for value in [0, color, endian_flag, width, height, depth, frames] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    for text in ["observer", "instrument", "telescope"] {
        let mut field = [0u8; 40];
        field[..text.len()].copy_from_slice(text.as_bytes());
        bytes.extend_from_slice(&field);
    }
    bytes.extend_from_slice(&BASE_TICKS.to_le_bytes());
    bytes.extend_from_slice(&BASE_TICKS.to_le_bytes());
    bytes
}

/// A whole container: header, frames and timestamp table.
pub(crate) struct SerFixture {
    pub color: u32,
    pub endian_flag: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub frames: Vec<Vec<u16>>,
    pub ticks: Vec<u64>,
}

impl SerFixture {
    /// Frames whose samples are all equal to their 1-based index, timestamps one second apart.
    pub(crate) fn numbered(color: u32, depth: u32, width: u32, height: u32, count: usize) -> Self {
        let pixels = (width * height) as usize;
        Self {
            color,
            endian_flag: 1,
            width,
            height,
            depth,
            frames: (1..=count).map(|i| vec![i as u16; pixels]).collect(),
            ticks: (0..count as u64).map(|i| BASE_TICKS + i * TICKS_PER_SECOND).collect(),
        }
    }

    pub(crate) fn big_endian(mut self) -> Self {
        self.endian_flag = 0;
        self
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = header_bytes(
            self.color,
            self.endian_flag,
            self.width,
            self.height,
            self.depth,
            self.frames.len() as u32,
        );
        let big = self.endian_flag == 0;
        for frame in &self.frames {
            for &sample in frame {
                match (self.depth, big) {
                    (8, _) => bytes.push(sample as u8),
                    (_, true) => bytes.extend_from_slice(&sample.to_be_bytes()),
                    (_, false) => bytes.extend_from_slice(&sample.to_le_bytes()),
                }
            }
        }
        for &tick in &self.ticks {
            if big {
                bytes.extend_from_slice(&tick.to_be_bytes());
            } else {
                bytes.extend_from_slice(&tick.to_le_bytes());
            }
        }
        bytes
    }

    pub(crate) fn cursor(&self) -> std::io::Cursor<Vec<u8>> {
        std::io::Cursor::new(self.to_bytes())
    }
}

/// Reader that counts every read and seek issued against it.
pub(crate) struct CountingReader<R> {
    inner: R,
    pub calls: Rc<Cell<usize>>,
}

impl<R> CountingReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, calls: Rc::new(Cell::new(0)) }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.calls.set(self.calls.get() + 1);
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for CountingReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.calls.set(self.calls.get() + 1);
        self.inner.seek(pos)
    }
}
