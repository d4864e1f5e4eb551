//! Process-wide constant tables from RFC 1951.
//!
//! Grounded on `flate.rs::Decoder::codes`'s `EXTRALENS`/`EXTRABITS`/
//! `EXTRADIST`/`EXTRADBITS` statics, `flate.rs::dynamic`'s `ORDER` array, and
//! `flate.rs::fixed`'s inline fixed-code-length loops (mirrored exactly in
//! `examples/original_source/decompress.c`'s `length_data`/`dist_data`/
//! `cl_code_serial` and `decompress_block_type_01`). These have no lifecycle
//! (spec.md §9): they're `const`s, not allocated per call.

/// `(base_length, extra_bits)` for length codes 257..=285, RFC 1951 §3.2.5.
pub const LENGTH_TABLE: [(u16, u8); 29] = [
    (3, 0), (4, 0), (5, 0), (6, 0), (7, 0), (8, 0), (9, 0), (10, 0),
    (11, 1), (13, 1), (15, 1), (17, 1),
    (19, 2), (23, 2), (27, 2), (31, 2),
    (35, 3), (43, 3), (51, 3), (59, 3),
    (67, 4), (83, 4), (99, 4), (115, 4),
    (131, 5), (163, 5), (195, 5), (227, 5),
    (258, 0),
];

/// `(base_distance, extra_bits)` for distance codes 0..=29, RFC 1951 §3.2.5.
pub const DISTANCE_TABLE: [(u16, u8); 30] = [
    (1, 0), (2, 0), (3, 0), (4, 0),
    (5, 1), (7, 1),
    (9, 2), (13, 2),
    (17, 3), (25, 3),
    (33, 4), (49, 4),
    (65, 5), (97, 5),
    (129, 6), (193, 6),
    (257, 7), (385, 7),
    (513, 8), (769, 8),
    (1025, 9), (1537, 9),
    (2049, 10), (3073, 10),
    (4097, 11), (6145, 11),
    (8193, 12), (12289, 12),
    (16385, 13), (24577, 13),
];

/// Order in which the 19 code-length-alphabet lengths are transmitted in a
/// dynamic block header, RFC 1951 §3.2.7.
pub const CODE_LENGTH_ORDER: [u8; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// The fixed literal/length code lengths, RFC 1951 §3.2.6: 8 for 0..=143, 9
/// for 144..=255, 7 for 256..=279, 8 for 280..=287.
pub fn fixed_litlen_lengths() -> [u8; 288] {
    let mut lengths = [0u8; 288];
    lengths[0..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..288].fill(8);
    lengths
}

/// The fixed distance code lengths: all 30 symbols get a 5-bit code.
pub fn fixed_distance_lengths() -> [u8; 30] {
    [5u8; 30]
}
