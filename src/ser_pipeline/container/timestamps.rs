//! Timestamp table decoding
//!
//! SER timestamps are 64-bit counts of 100 ns ticks since
//! 0001-01-01T00:00:00 UTC (proleptic Gregorian).

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tracing::debug;

use crate::ser_pipeline::common::error::{Result, SerError};
use crate::ser_pipeline::container::header::SerHeader;
use crate::ser_pipeline::container::types::ByteOrder;

const TICKS_PER_SECOND: u64 = 10_000_000;
const NANOS_PER_TICK: u64 = 100;
const TICK_SIZE: usize = 8;

fn tick_epoch() -> Option<DateTime<Utc>> {
    Some(NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Converts a tick count into an instant. `None` if it lies past chrono's range.
pub fn ticks_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    let seconds = TimeDelta::try_seconds((ticks / TICKS_PER_SECOND) as i64)?;
    let nanos = TimeDelta::nanoseconds(((ticks % TICKS_PER_SECOND) * NANOS_PER_TICK) as i64);
    tick_epoch()?.checked_add_signed(seconds + nanos)
}

/// Converts an instant back into ticks, dropping anything finer than 100 ns.
/// `None` for instants before the epoch or too far out for a u64 tick count.
pub fn datetime_to_ticks(instant: &DateTime<Utc>) -> Option<u64> {
    let elapsed = instant.signed_duration_since(tick_epoch()?);
    if elapsed < TimeDelta::zero() {
        return None;
    }
    let seconds = elapsed.num_seconds() as u64;
    let nanos = elapsed.subsec_nanos() as u64;
    seconds
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(nanos / NANOS_PER_TICK)
}

/// Reads all `frame_count` timestamps located right after the pixel payload.
///
/// The source length is checked against the declared table end before
/// anything is allocated, so a header claiming more frames than the file
/// holds fails with [`SerError::Format`].
pub(crate) fn read_timestamp_table<R: Read + Seek>(
    reader: &mut R,
    header: &SerHeader,
) -> Result<Vec<DateTime<Utc>>> {
    let offset = header.timestamp_table_offset();
    let table_end = (header.frame_count as u64)
        .checked_mul(TICK_SIZE as u64)
        .and_then(|table_len| table_len.checked_add(offset))
        .ok_or_else(|| SerError::Format("timestamp table size overflows".to_string()))?;
    debug!(offset, frames = header.frame_count, "Reading timestamp table");

    let source_len = reader
        .seek(SeekFrom::End(0))
        .map_err(|source| SerError::Io { offset, len: 0, source })?;
    if source_len < table_end {
        return Err(SerError::Format(format!(
            "truncated timestamp table: {} frames need {table_end} bytes, source has {source_len}",
            header.frame_count
        )));
    }

    let len = header.frame_count * TICK_SIZE;
    reader
        .seek(SeekFrom::Start(offset))
        .map_err(|source| SerError::Io { offset, len, source })?;

    let mut table = vec![0u8; len];
    reader
        .read_exact(&mut table)
        .map_err(|e| SerError::from_read(e, offset, len, "timestamp table"))?;

    let mut ticks = vec![0u64; header.frame_count];
    let decoded = match header.byte_order {
        ByteOrder::Little => (&table[..]).read_u64_into::<LittleEndian>(&mut ticks),
        ByteOrder::Big => (&table[..]).read_u64_into::<BigEndian>(&mut ticks),
    };
    decoded.map_err(|e| SerError::from_read(e, offset, len, "timestamp table"))?;

    ticks
        .iter()
        .enumerate()
        .map(|(i, &tick)| {
            ticks_to_datetime(tick).ok_or_else(|| {
                SerError::Format(format!("timestamp of frame {} is out of range: {tick}", i + 1))
            })
        })
        .collect()
}
