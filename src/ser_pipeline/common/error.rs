use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerError {
    #[error("Failed to open input file {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed SER container: {0}")]
    Format(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Frame range error: {0}")]
    Range(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to render timestamp overlay: {0}")]
    Overlay(String),

    #[error("IO error at offset {offset} reading {len} bytes: {source}")]
    Io {
        offset: u64,
        len: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deliver frame {frame} to raw video sink: {source}")]
    Sink {
        frame: usize,
        #[source]
        source: std::io::Error,
    },
}

impl SerError {
    /// Classifies a failed positioned read: running out of bytes inside a
    /// region the header promised is a container defect, anything else is IO.
    pub(crate) fn from_read(source: std::io::Error, offset: u64, len: usize, what: &str) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            SerError::Format(format!(
                "truncated {what}: expected {len} bytes at offset {offset}"
            ))
        } else {
            SerError::Io { offset, len, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, SerError>;
