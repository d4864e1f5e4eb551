//! A gzip (RFC 1952) container decoder over a DEFLATE (RFC 1951) bitstream.
//!
//! Given an in-memory buffer holding one or more concatenated gzip members,
//! [`decompress`] reproduces the concatenated original byte stream and
//! writes it to any [`std::io::Write`] sink, verifying each member's
//! CRC-32/ISIZE trailer by default. [`decompress_with`] exposes
//! [`DecompressOptions`] for turning that verification off.

mod bitstream;
mod block;
mod error;
mod gzip;
mod huffman;
mod sink;
mod tables;
mod window;

pub use error::{Error, Result};
pub use gzip::{decompress, decompress_with, DecompressOptions};
