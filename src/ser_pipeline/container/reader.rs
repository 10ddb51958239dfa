//! Random-access SER frame store.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::ser_pipeline::common::error::{Result, SerError};
use crate::ser_pipeline::container::header::SerHeader;
use crate::ser_pipeline::container::timestamps::read_timestamp_table;
use crate::ser_pipeline::container::types::{BitDepth, ByteOrder, RawFrame};

/// An open SER container.
///
/// Owns the underlying source together with the parsed header and the full
/// timestamp table. Dropping it releases the source.
pub struct SerReader<R> {
    source: R,
    header: SerHeader,
    timestamps: Vec<DateTime<Utc>>,
}

impl SerReader<BufReader<File>> {
    /// Opens a SER file from disk.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SerError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> SerReader<R> {
    /// Parses the header and the timestamp table from a source positioned at
    /// offset 0. On failure the source is dropped before returning.
    pub fn new(mut source: R) -> Result<Self> {
        let header = SerHeader::read_from(&mut source)?;
        let timestamps = read_timestamp_table(&mut source, &header)?;

        info!(
            width = header.width,
            height = header.height,
            bit_depth = header.bit_depth.bits(),
            color = %header.color_id,
            frames = header.frame_count,
            "Opened SER container"
        );

        Ok(Self {
            source,
            header,
            timestamps,
        })
    }

    pub fn header(&self) -> &SerHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Timestamp of a 1-based frame index.
    pub fn timestamp(&self, index: usize) -> Result<DateTime<Utc>> {
        self.check_index(index)?;
        Ok(self.timestamps[index - 1])
    }

    /// Reads the raw samples of a 1-based frame index.
    ///
    /// Always seeks, so frames can be read in any order. The index is checked
    /// before any IO happens.
    pub fn frame(&mut self, index: usize) -> Result<RawFrame> {
        self.check_index(index)?;

        let offset = self.header.frame_offset(index);
        let len = self.header.frame_len() as usize;
        debug!(index, offset, len, "Reading frame");

        self.source
            .seek(SeekFrom::Start(offset))
            .map_err(|source| SerError::Io { offset, len, source })?;
        let mut bytes = vec![0u8; len];
        self.source
            .read_exact(&mut bytes)
            .map_err(|source| SerError::Io { offset, len, source })?;

        let pixels = self.header.width * self.header.height;
        let data = decode_samples(&bytes, pixels, self.header.bit_depth, self.header.byte_order);

        Ok(RawFrame {
            width: self.header.width,
            height: self.header.height,
            data,
            bit_depth: self.header.bit_depth,
        })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index == 0 || index > self.header.frame_count {
            return Err(SerError::Range(format!(
                "frame {index} is outside the valid range 1-{}",
                self.header.frame_count
            )));
        }
        Ok(())
    }
}

fn decode_samples(bytes: &[u8], pixels: usize, depth: BitDepth, order: ByteOrder) -> Vec<u16> {
    match depth {
        BitDepth::Eight => bytes.iter().map(|&v| v as u16).collect(),
        BitDepth::Sixteen => {
            let mut samples = vec![0u16; pixels];
            match order {
                ByteOrder::Little => LittleEndian::read_u16_into(bytes, &mut samples),
                ByteOrder::Big => BigEndian::read_u16_into(bytes, &mut samples),
            }
            samples
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use crate::ser_pipeline::test_support::{CountingReader, SerFixture};

    #[test]
    fn test_frames_by_index() {
        let fixture = SerFixture::numbered(0, 8, 2, 2, 3);
        let mut reader = SerReader::new(fixture.cursor()).unwrap();
        assert_eq!(reader.frame_count(), 3);

        // out of order on purpose
        for index in [3, 1, 2] {
            let frame = reader.frame(index).unwrap();
            assert_eq!((frame.width, frame.height), (2, 2));
            assert_eq!(frame.data, vec![index as u16; 4]);
        }
    }

    #[test]
    fn test_sixteen_bit_byte_orders() {
        let mut fixture = SerFixture::numbered(0, 16, 3, 2, 1);
        fixture.frames[0] = vec![0x0102, 0xFF00, 0x00FF, 1, 65535, 0x1234];

        let expected = fixture.frames[0].clone();
        let mut little = SerReader::new(fixture.cursor()).unwrap();
        assert_eq!(little.frame(1).unwrap().data, expected);

        let fixture = fixture.big_endian();
        let mut big = SerReader::new(fixture.cursor()).unwrap();
        let frame = big.frame(1).unwrap();
        assert_eq!(frame.data, expected);
        assert_eq!(frame.sample(1, 1), 65535);
    }

    #[test]
    fn test_out_of_range_does_no_io() {
        let fixture = SerFixture::numbered(0, 8, 2, 2, 3);
        let counting = CountingReader::new(fixture.cursor());
        let calls = counting.calls.clone();
        let mut reader = SerReader::new(counting).unwrap();

        let before = calls.get();
        for index in [0, 4, 100] {
            assert!(matches!(reader.frame(index), Err(SerError::Range(_))));
            assert!(matches!(reader.timestamp(index), Err(SerError::Range(_))));
        }
        assert_eq!(calls.get(), before);
    }

    #[test]
    fn test_missing_timestamps_fail_before_table_read() {
        let mut bytes = SerFixture::numbered(0, 8, 2, 2, 3).to_bytes();
        bytes[162..178].fill(0);
        let counting = CountingReader::new(Cursor::new(bytes));
        let calls = counting.calls.clone();

        assert!(matches!(SerReader::new(counting), Err(SerError::Format(_))));
        // only the header read happened, no seek to the table
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_truncated_payload_is_io_error() {
        let fixture = SerFixture::numbered(0, 8, 4, 4, 2);
        let mut reader = SerReader::new(fixture.cursor()).unwrap();
        // swap in a source that ends inside frame 2
        let bytes = fixture.to_bytes();
        reader.source = Cursor::new(bytes[..178 + 16 + 5].to_vec());

        match reader.frame(2) {
            Err(SerError::Io { offset, len, .. }) => {
                assert_eq!(offset, 178 + 16);
                assert_eq!(len, 16);
            }
            other => panic!("expected IO error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_from_disk() {
        let fixture = SerFixture::numbered(9, 16, 4, 2, 2);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &fixture.to_bytes()).unwrap();

        let mut reader = SerReader::open(file.path()).unwrap();
        assert_eq!(reader.header().color_id, crate::ser_pipeline::ColorId::BayerGrbg);
        assert_eq!(reader.frame(2).unwrap().data, vec![2u16; 8]);
        assert_eq!(reader.timestamps().len(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let result = SerReader::open("/nonexistent/capture.ser");
        assert!(matches!(result, Err(SerError::InputRead { .. })));
    }
}
