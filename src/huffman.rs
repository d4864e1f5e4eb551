//! Canonical-Huffman code generation and a binary tree for bit-by-bit
//! decoding.
//!
//! Codes are derived with the classic `bl_count`/`next_code` technique from
//! RFC 1951 §3.2.2, then used to build an arena-based binary tree (`Vec<Node>`
//! with index children rather than heap pointers) for MSB-first decoding.

use crate::error::{Error, Result};
use crate::bitstream::BitCursor;

const MAX_BITS: usize = 15;

/// One entry of a canonical-Huffman code table: `symbol` gets the `length`-bit
/// code `code` (already left-justified into the low `length` bits, MSB of the
/// code is bit `length - 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalCode {
    pub symbol: u16,
    pub length: u8,
    pub code: u16,
}

/// Computes the canonical-Huffman codes for a code-length vector, per RFC
/// 1951 §3.2.2. `limit` caps the code length (7 for the code-length
/// alphabet, 15 for literal/length and distance alphabets).
/// Symbols with a length of 0 are absent from the alphabet and omitted from
/// the result.
pub fn canonical_codes(lengths: &[u8], limit: u8) -> Result<Vec<CanonicalCode>> {
    if lengths.len() > 288 {
        return Err(Error::InvalidHuffmanTable(format!(
            "alphabet of {} symbols exceeds the maximum of 288", lengths.len()
        )));
    }
    for &len in lengths {
        if len as usize > MAX_BITS || len > limit {
            return Err(Error::InvalidHuffmanTable(format!(
                "code length {len} exceeds the limit of {limit}"
            )));
        }
    }

    let mut bl_count = [0u16; MAX_BITS + 1];
    for &len in lengths {
        bl_count[len as usize] += 1;
    }
    bl_count[0] = 0;

    let mut next_code = [0u16; MAX_BITS + 1];
    let mut code: u16 = 0;
    for bits in 1..=MAX_BITS {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    let mut result = Vec::new();
    for (symbol, &length) in lengths.iter().enumerate() {
        if length == 0 {
            continue;
        }
        let code = next_code[length as usize];
        next_code[length as usize] += 1;
        result.push(CanonicalCode { symbol: symbol as u16, length, code });
    }
    Ok(result)
}

/// A node in the decode tree's arena. `symbol` is `Some` only for leaves.
#[derive(Debug, Clone, Copy)]
struct Node {
    left: Option<u32>,
    right: Option<u32>,
    symbol: Option<u16>,
}

impl Node {
    fn internal() -> Self {
        Self { left: None, right: None, symbol: None }
    }
}

/// A canonical-Huffman decode tree, represented as an arena of nodes rather
/// than heap-allocated pointer nodes (spec.md §9 Design Notes). Node 0 is
/// always the root.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    const ROOT: u32 = 0;

    /// Builds a decode tree directly from a code-length vector.
    pub fn build(lengths: &[u8], limit: u8) -> Result<Tree> {
        let codes = canonical_codes(lengths, limit)?;
        Self::from_codes(&codes)
    }

    /// Builds a decode tree from already-computed canonical codes.
    pub fn from_codes(codes: &[CanonicalCode]) -> Result<Tree> {
        let mut nodes = vec![Node::internal()];
        for c in codes {
            let mut cur = Self::ROOT;
            for bit_pos in (0..c.length).rev() {
                let bit = (c.code >> bit_pos) & 1;
                let is_leaf_step = bit_pos == 0;

                let child = if bit == 1 { nodes[cur as usize].right } else { nodes[cur as usize].left };
                let child = match child {
                    Some(idx) => {
                        if is_leaf_step || nodes[idx as usize].symbol.is_some() {
                            // Either this leaf position is already occupied,
                            // or an existing leaf sits on our path to a
                            // longer code (a prefix violation).
                            return Err(Error::InvalidHuffmanTable(format!(
                                "duplicate or overlapping code for symbol {}", c.symbol
                            )));
                        }
                        idx
                    }
                    None => {
                        nodes.push(Node::internal());
                        let idx = (nodes.len() - 1) as u32;
                        if bit == 1 {
                            nodes[cur as usize].right = Some(idx);
                        } else {
                            nodes[cur as usize].left = Some(idx);
                        }
                        idx
                    }
                };
                cur = child;
            }
            nodes[cur as usize].symbol = Some(c.symbol);
        }
        Ok(Tree { nodes })
    }

    /// Decodes a single symbol by descending the tree one bit at a time,
    /// MSB-first (bit 0 goes left, bit 1 goes right).
    pub fn decode(&self, cursor: &mut BitCursor) -> Result<u16> {
        let mut cur = Self::ROOT;
        loop {
            if let Some(symbol) = self.nodes[cur as usize].symbol {
                return Ok(symbol);
            }
            let bit = cursor.read_bit()?;
            let next = if bit == 1 { self.nodes[cur as usize].right } else { self.nodes[cur as usize].left };
            cur = next.ok_or_else(|| Error::CorruptedStream(
                "huffman code does not match any known symbol".into()
            ))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_litlen_lengths() -> [u8; 288] {
        crate::tables::fixed_litlen_lengths()
    }

    fn bits_str(code: u16, length: u8) -> String {
        (0..length).rev().map(|i| if (code >> i) & 1 == 1 { '1' } else { '0' }).collect()
    }

    #[test]
    fn fixed_literal_table_matches_rfc_scenarios() {
        let lengths = fixed_litlen_lengths();
        let codes = canonical_codes(&lengths, 15).unwrap();
        let by_symbol: std::collections::HashMap<u16, &CanonicalCode> =
            codes.iter().map(|c| (c.symbol, c)).collect();

        let check = |symbol: u16, expected: &str, expected_len: u8| {
            let c = by_symbol[&symbol];
            assert_eq!(c.length, expected_len, "symbol {symbol} length");
            assert_eq!(bits_str(c.code, c.length), expected, "symbol {symbol} bits");
        };

        check(0, "00110000", 8);
        check(143, "10111111", 8);
        check(144, "110010000", 9);
        check(255, "111111111", 9);
        check(256, "0000000", 7);
        check(279, "0010111", 7);
        check(280, "11000000", 8);
        check(287, "11000111", 8);
    }

    #[test]
    fn tree_round_trips_every_fixed_code() {
        let lengths = fixed_litlen_lengths();
        let codes = canonical_codes(&lengths, 15).unwrap();
        let tree = Tree::from_codes(&codes).unwrap();

        for c in &codes {
            // Build a one-off buffer containing exactly this code's bits,
            // MSB-first as the tree expects, then decode it back.
            let mut bytes = vec![0u8; 2];
            let mut bitpos = 0usize;
            for i in (0..c.length).rev() {
                let bit = (c.code >> i) & 1;
                if bit == 1 {
                    bytes[bitpos / 8] |= 1 << (bitpos % 8);
                }
                bitpos += 1;
            }
            let mut cursor = BitCursor::new(&bytes);
            let decoded = tree.decode(&mut cursor).unwrap();
            assert_eq!(decoded, c.symbol);
        }
    }

    #[test]
    fn rejects_length_over_limit() {
        let lengths = [1u8, 8];
        assert!(matches!(
            canonical_codes(&lengths, 7),
            Err(Error::InvalidHuffmanTable(_))
        ));
    }

    #[test]
    fn rejects_overlong_codes_kraft_violation() {
        // Two symbols both claiming the single 1-bit code space plus a
        // third needing more bits overflows the available code space; the
        // tree builder should catch the resulting collision.
        let lengths = [1u8, 1, 1];
        let codes = canonical_codes(&lengths, 15).unwrap();
        assert!(matches!(Tree::from_codes(&codes), Err(Error::InvalidHuffmanTable(_))));
    }
}
