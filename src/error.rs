//! The error taxonomy for this crate.
//!
//! A real enum callers can match on, rather than an opaque `io::Error`:
//! decoder libraries are more useful when failure kind is distinguishable
//! from the caller's I/O failures.

use thiserror::Error;

/// Everything that can go wrong while decoding a gzip/DEFLATE stream.
#[derive(Error, Debug)]
pub enum Error {
    /// The bit cursor ran past the end of the input buffer.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// The DEFLATE bitstream violates RFC 1951 (bad block type, malformed
    /// stored-block length pair, out-of-range symbol, invalid back
    /// reference, ...).
    #[error("corrupted stream: {0}")]
    CorruptedStream(String),

    /// A code-length vector does not describe a valid prefix code (duplicate
    /// code, prefix violation, or a length beyond the caller-supplied limit).
    #[error("invalid huffman table: {0}")]
    InvalidHuffmanTable(String),

    /// The gzip member header is malformed (bad magic, unsupported
    /// compression method, reserved flag bits set, truncated optional
    /// fields).
    #[error("invalid gzip header: {0}")]
    InvalidGzipHeader(String),

    /// The trailer's CRC-32 or ISIZE did not match the decoded output.
    #[error("checksum mismatch: {0}")]
    ChecksumMismatch(String),

    /// The output sink rejected a write or flush.
    #[error("write failure")]
    WriteFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
