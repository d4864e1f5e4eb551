//! The DEFLATE block loop: BFINAL/BTYPE dispatch, the three block decoders,
//! and the symbol-expansion loop they share.

use std::io::Write;
use std::sync::OnceLock;

use crate::bitstream::BitCursor;
use crate::error::{Error, Result};
use crate::huffman::Tree;
use crate::sink::Sink;
use crate::tables::{self, CODE_LENGTH_ORDER};
use crate::window::Window;

/// Runs the block loop for one gzip member: reads blocks until one with
/// BFINAL set completes, then aligns the cursor to a byte boundary so the
/// caller can parse the trailer.
pub fn decode_blocks<W: Write>(
    cursor: &mut BitCursor,
    window: &mut Window,
    sink: &mut Sink<W>,
) -> Result<()> {
    loop {
        let bfinal = cursor.read_bits(1)? == 1;
        let btype = cursor.read_bits(2)?;
        log::trace!("block: bfinal={bfinal} btype={btype}");
        match btype {
            0 => decode_stored(cursor, window, sink)?,
            1 => decode_fixed(cursor, window, sink)?,
            2 => decode_dynamic(cursor, window, sink)?,
            _ => return Err(Error::CorruptedStream("reserved block type 3".into())),
        }
        if bfinal {
            break;
        }
    }
    cursor.align_to_byte();
    Ok(())
}

/// §4.5 Stored-block decoder (BTYPE = 00).
fn decode_stored<W: Write>(
    cursor: &mut BitCursor,
    window: &mut Window,
    sink: &mut Sink<W>,
) -> Result<()> {
    cursor.align_to_byte();
    let len = cursor.read_bits(16)?;
    let nlen = cursor.read_bits(16)?;
    if nlen != !len {
        return Err(Error::CorruptedStream(format!(
            "stored block LEN {len:#06x} does not match complement NLEN {nlen:#06x}"
        )));
    }
    let bytes = cursor.read_aligned_bytes(len as usize)?;
    for &byte in bytes {
        window.push_literal(byte);
    }
    sink.push_slice(bytes)
}

fn fixed_trees() -> &'static (Tree, Tree) {
    static TREES: OnceLock<(Tree, Tree)> = OnceLock::new();
    TREES.get_or_init(|| {
        let literal = Tree::build(&tables::fixed_litlen_lengths(), 15)
            .expect("the fixed literal/length code lengths from RFC 1951 are well-formed");
        let distance = Tree::build(&tables::fixed_distance_lengths(), 15)
            .expect("the fixed distance code lengths from RFC 1951 are well-formed");
        (literal, distance)
    })
}

/// §4.6 Fixed-Huffman-block decoder (BTYPE = 01).
fn decode_fixed<W: Write>(
    cursor: &mut BitCursor,
    window: &mut Window,
    sink: &mut Sink<W>,
) -> Result<()> {
    let (literal, distance) = fixed_trees();
    inflate_symbols(cursor, window, sink, literal, distance)
}

/// §4.7 Dynamic-Huffman-block decoder (BTYPE = 10).
fn decode_dynamic<W: Write>(
    cursor: &mut BitCursor,
    window: &mut Window,
    sink: &mut Sink<W>,
) -> Result<()> {
    let hlit = cursor.read_bits(5)? as usize;
    let hdist = cursor.read_bits(5)? as usize;
    let hclen = cursor.read_bits(4)? as usize;
    let litlen_count = hlit + 257;
    let distance_count = hdist + 1;
    let codelen_count = hclen + 4;
    log::trace!("dynamic block: litlen={litlen_count} distance={distance_count} codelen={codelen_count}");

    if litlen_count > 286 {
        return Err(Error::CorruptedStream(format!(
            "literal/length code count {litlen_count} exceeds the maximum of 286"
        )));
    }

    let mut codelen_lengths = [0u8; 19];
    for &order in CODE_LENGTH_ORDER.iter().take(codelen_count) {
        codelen_lengths[order as usize] = cursor.read_bits(3)? as u8;
    }
    let codelen_tree = Tree::build(&codelen_lengths, 7)?;

    let total = litlen_count + distance_count;
    let lengths = decode_code_length_sequence(cursor, &codelen_tree, total)?;
    let literal = Tree::build(&lengths[..litlen_count], 15)?;
    let distance = Tree::build(&lengths[litlen_count..], 15)?;

    inflate_symbols(cursor, window, sink, &literal, &distance)
}

/// Decodes the single run-length-compressed sequence of `total` code
/// lengths (literal/length lengths followed by distance lengths), per
/// spec §4.7 step 4. Repeat codes 16/17/18 may cross the boundary between
/// the two alphabets.
fn decode_code_length_sequence(
    cursor: &mut BitCursor,
    codelen_tree: &Tree,
    total: usize,
) -> Result<Vec<u8>> {
    let mut lengths = vec![0u8; total];
    let mut previous = 0u8;
    let mut i = 0usize;
    while i < total {
        let symbol = codelen_tree.decode(cursor)?;
        match symbol {
            0..=15 => {
                lengths[i] = symbol as u8;
                previous = symbol as u8;
                i += 1;
            }
            16 => {
                if i == 0 {
                    return Err(Error::CorruptedStream(
                        "repeat-previous code-length symbol at position 0".into(),
                    ));
                }
                let repeat = cursor.read_bits(2)? + 3;
                fill_repeat(&mut lengths, &mut i, total, previous, repeat)?;
            }
            17 => {
                let repeat = cursor.read_bits(3)? + 3;
                fill_repeat(&mut lengths, &mut i, total, 0, repeat)?;
                previous = 0;
            }
            18 => {
                let repeat = cursor.read_bits(7)? + 11;
                fill_repeat(&mut lengths, &mut i, total, 0, repeat)?;
                previous = 0;
            }
            _ => {
                return Err(Error::CorruptedStream(format!(
                    "code-length symbol {symbol} is out of range"
                )))
            }
        }
    }
    Ok(lengths)
}

fn fill_repeat(lengths: &mut [u8], i: &mut usize, total: usize, value: u8, repeat: u16) -> Result<()> {
    let repeat = repeat as usize;
    if *i + repeat > total {
        return Err(Error::CorruptedStream(format!(
            "code-length repeat of {repeat} at position {i} overruns the {total}-entry table"
        )));
    }
    for _ in 0..repeat {
        lengths[*i] = value;
        *i += 1;
    }
    Ok(())
}

/// §4.8 Symbol-expansion loop, shared by fixed and dynamic blocks.
fn inflate_symbols<W: Write>(
    cursor: &mut BitCursor,
    window: &mut Window,
    sink: &mut Sink<W>,
    literal: &Tree,
    distance: &Tree,
) -> Result<()> {
    loop {
        let symbol = literal.decode(cursor)?;
        if symbol < 256 {
            let byte = symbol as u8;
            window.push_literal(byte);
            sink.push(byte)?;
            continue;
        }
        if symbol == 256 {
            return Ok(());
        }
        if symbol > 285 {
            return Err(Error::CorruptedStream(format!(
                "literal/length symbol {symbol} is out of range"
            )));
        }

        let (base_len, extra_len_bits) = tables::LENGTH_TABLE[(symbol - 257) as usize];
        let extra_len = if extra_len_bits > 0 { cursor.read_bits(extra_len_bits)? } else { 0 };
        if symbol == 284 && extra_len == 31 {
            return Err(Error::CorruptedStream(
                "length 258 must be encoded as symbol 285, not 284 with maximal extra bits".into(),
            ));
        }
        let length = base_len + extra_len;

        let dist_symbol = distance.decode(cursor)?;
        if dist_symbol > 29 {
            return Err(Error::CorruptedStream(format!(
                "distance symbol {dist_symbol} is out of range"
            )));
        }
        let (base_dist, extra_dist_bits) = tables::DISTANCE_TABLE[dist_symbol as usize];
        let extra_dist = if extra_dist_bits > 0 { cursor.read_bits(extra_dist_bits)? } else { 0 };
        let dist = base_dist + extra_dist;

        window.copy_match(dist, length, |byte| sink.push(byte))?;
    }
}
