//! Fixed-layout SER header parsing.
//!
//! Header fields are always little-endian; the declared byte order only
//! applies to pixel samples and the trailing timestamp table.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::ser_pipeline::common::error::{Result, SerError};
use crate::ser_pipeline::container::timestamps::ticks_to_datetime;
use crate::ser_pipeline::container::types::{BitDepth, ByteOrder, ColorId};

/// Size of the fixed header region in bytes.
pub const HEADER_SIZE: u64 = 178;

const FILE_ID_LEN: usize = 14;
const TEXT_FIELD_LEN: usize = 40;

/// Parsed SER header plus the geometry derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerHeader {
    /// Signature text, usually `LUCAM-RECORDER`
    pub file_id: String,
    pub lu_id: u32,
    pub color_id: ColorId,
    pub byte_order: ByteOrder,
    pub width: usize,
    pub height: usize,
    pub bit_depth: BitDepth,
    pub frame_count: usize,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    /// Capture start in local time, as ticks
    pub date_time: u64,
    /// Capture start in UTC, as ticks
    pub date_time_utc: u64,
    frame_len: u64,
    timestamp_table_offset: u64,
}

impl SerHeader {
    /// Reads and validates the header from a source positioned at offset 0.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut block = [0u8; HEADER_SIZE as usize];
        reader
            .read_exact(&mut block)
            .map_err(|e| SerError::from_read(e, 0, block.len(), "header"))?;
        Self::parse(&block)
    }

    /// Parses a header from its raw bytes.
    ///
    /// Fails with [`SerError::Format`] when the slice is shorter than the
    /// header, the capture time fields are empty, the bit depth is not 8 or
    /// 16, or the derived geometry is degenerate; fails with
    /// [`SerError::UnsupportedFormat`] for an unknown color id.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);

        let file_id = read_text(&mut cursor, FILE_ID_LEN)?;
        let lu_id = read_u32(&mut cursor)?;
        let color_code = read_u32(&mut cursor)?;
        let endian_flag = read_u32(&mut cursor)?;
        let width = read_u32(&mut cursor)? as usize;
        let height = read_u32(&mut cursor)? as usize;
        let depth_bits = read_u32(&mut cursor)?;
        let frame_count = read_u32(&mut cursor)? as usize;
        let observer = read_text(&mut cursor, TEXT_FIELD_LEN)?;
        let instrument = read_text(&mut cursor, TEXT_FIELD_LEN)?;
        let telescope = read_text(&mut cursor, TEXT_FIELD_LEN)?;
        let date_time = read_u64(&mut cursor)?;
        let date_time_utc = read_u64(&mut cursor)?;

        debug!(
            file_id = %file_id,
            color_code,
            endian_flag,
            width,
            height,
            depth_bits,
            frame_count,
            "Parsed SER header fields"
        );

        if date_time == 0 || date_time_utc == 0 {
            return Err(SerError::Format("SER file has no frame timestamps".to_string()));
        }

        let bit_depth = BitDepth::try_from(depth_bits)?;
        let color_id = ColorId::try_from(color_code)?;

        if width == 0 || height == 0 {
            return Err(SerError::Format(format!(
                "invalid image dimensions {width}x{height}"
            )));
        }

        let frame_len = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(bit_depth.bytes_per_sample() as u64))
            .ok_or_else(|| SerError::Format("frame size overflows".to_string()))?;
        let timestamp_table_offset = frame_len
            .checked_mul(frame_count as u64)
            .and_then(|payload| payload.checked_add(HEADER_SIZE))
            .ok_or_else(|| SerError::Format("pixel payload size overflows".to_string()))?;

        Ok(SerHeader {
            file_id,
            lu_id,
            color_id,
            byte_order: ByteOrder::from_flag(endian_flag),
            width,
            height,
            bit_depth,
            frame_count,
            observer,
            instrument,
            telescope,
            date_time,
            date_time_utc,
            frame_len,
            timestamp_table_offset,
        })
    }

    /// Number of bytes one frame occupies: `width * height * bytes_per_sample`.
    pub fn frame_len(&self) -> u64 {
        self.frame_len
    }

    /// Byte offset of the timestamp table, right after the pixel payload.
    pub fn timestamp_table_offset(&self) -> u64 {
        self.timestamp_table_offset
    }

    /// Byte offset of a 1-based frame index. The index must already be in range.
    pub fn frame_offset(&self, index: usize) -> u64 {
        HEADER_SIZE + (index as u64 - 1) * self.frame_len
    }

    /// Capture start as a UTC instant.
    pub fn capture_time_utc(&self) -> Option<DateTime<Utc>> {
        ticks_to_datetime(self.date_time_utc)
    }
}

fn truncated(_: std::io::Error) -> SerError {
    SerError::Format(format!("file is shorter than the {HEADER_SIZE}-byte header"))
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    cursor.read_u32::<LittleEndian>().map_err(truncated)
}

fn read_u64(cursor: &mut Cursor<&[u8]>) -> Result<u64> {
    cursor.read_u64::<LittleEndian>().map_err(truncated)
}

fn read_text(cursor: &mut Cursor<&[u8]>, len: usize) -> Result<String> {
    let mut field = vec![0u8; len];
    cursor.read_exact(&mut field).map_err(truncated)?;
    Ok(String::from_utf8_lossy(&field)
        .trim_end_matches(['\0', ' '])
        .to_string())
}
