//! The buffered output sink.
//!
//! Grounded on `examples/original_source/decompress.c::handle_literal_codes`,
//! which accumulates decoded bytes into a fixed `OUT_BUF_SIZE` (8192-byte)
//! stack buffer and flushes it to the output file descriptor whenever it
//! fills. The teacher's own decoder has no equivalent of this (it implements
//! `std::io::Read` and lets the caller pull a whole decoded block at a
//! time), but written in the teacher's idiom: an `io::Write` sink and `?`
//! propagation rather than the C original's manual `write(2)` and byte
//! counting.
//!
//! The sink also tracks the running CRC-32 and byte count of the current
//! gzip member, mirroring how the teacher's `zlib::Decoder` keeps an
//! `Adler32` hash alongside its inner decoder and feeds it as bytes are
//! produced, rather than re-reading the output afterwards.

use std::io::Write;

use crc32fast::Hasher as Crc32;

use crate::error::Result;

const BUFFER_SIZE: usize = 8192;

/// Buffers decoded bytes and flushes them to an underlying writer in
/// `BUFFER_SIZE`-byte chunks, while tracking the CRC-32 and length of the
/// current member.
pub struct Sink<W: Write> {
    writer: W,
    buf: Box<[u8; BUFFER_SIZE]>,
    len: usize,
    crc: Crc32,
    member_len: u32,
}

impl<W: Write> Sink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: Box::new([0u8; BUFFER_SIZE]),
            len: 0,
            crc: Crc32::new(),
            member_len: 0,
        }
    }

    /// Appends a single decoded byte, flushing first if the buffer is full.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len == BUFFER_SIZE {
            self.flush_buffer()?;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        self.crc.update(&[byte]);
        self.member_len = self.member_len.wrapping_add(1);
        Ok(())
    }

    /// Appends a run of decoded bytes, one at a time, flushing as needed.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.push(byte)?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if self.len > 0 {
            self.writer.write_all(&self.buf[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }

    /// Finalizes the CRC-32 and byte count accumulated since the last call
    /// (or since construction), resetting both for the next member.
    pub fn take_member_checksum(&mut self) -> (u32, u32) {
        let crc = std::mem::replace(&mut self.crc, Crc32::new()).finalize();
        let len = std::mem::take(&mut self.member_len);
        (crc, len)
    }

    /// Flushes any buffered bytes and the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.flush_buffer()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_and_flushes_on_fill() {
        let mut sink = Sink::new(Vec::new());
        for _ in 0..BUFFER_SIZE + 10 {
            sink.push(b'x').unwrap();
        }
        let out = sink.finish().unwrap();
        assert_eq!(out.len(), BUFFER_SIZE + 10);
        assert!(out.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn push_slice_matches_byte_by_byte() {
        let mut sink = Sink::new(Vec::new());
        sink.push_slice(b"hello world").unwrap();
        let out = sink.finish().unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn finish_on_empty_buffer_writes_nothing() {
        let sink: Sink<Vec<u8>> = Sink::new(Vec::new());
        let out = sink.finish().unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn tracks_crc_and_length_per_member_and_resets() {
        let mut sink = Sink::new(Vec::new());
        sink.push_slice(b"hello").unwrap();
        let mut reference = Crc32::new();
        reference.update(b"hello");
        let (crc, len) = sink.take_member_checksum();
        assert_eq!(crc, reference.finalize());
        assert_eq!(len, 5);

        sink.push_slice(b"abc").unwrap();
        let mut reference2 = Crc32::new();
        reference2.update(b"abc");
        let (crc2, len2) = sink.take_member_checksum();
        assert_eq!(crc2, reference2.finalize());
        assert_eq!(len2, 3);
    }
}
