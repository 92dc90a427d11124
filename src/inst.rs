//! Instruction word packing.
//!
//! A subleq instruction is not a distinct stored entity: any memory word,
//! read at the program counter, unpacks into three operand addresses
//! `(a, b, c)` as three base-128 digits, most significant first. This
//! mixed-radix decomposition is the only structural typing in the machine.

/// The operand radix: each of the three operands occupies one base-128
/// digit of the instruction word.
pub const INST_SZ: i64 = 128;

/// Unpack a word into `(a, b, c)` operand addresses.
///
/// Uses floor-division (Euclidean) semantics, so a negative word shifts
/// `a` in the negative direction while `b` and `c` stay in `[0, radix)`.
/// Truncating division would silently decode negative words differently;
/// this matches the reference behavior of `divmod` exactly.
pub fn decode(word: i64, radix: i64) -> (i64, i64, i64) {
    let (b, c) = (word.div_euclid(radix), word.rem_euclid(radix));
    let (a, b) = (b.div_euclid(radix), b.rem_euclid(radix));
    (a, b, c)
}

/// Pack `(a, b, c)` into a single instruction word.
///
/// Inverse of [`decode`] for digits in `[0, radix)`. Used by external
/// assemblers and by tests; the machine itself only ever decodes.
pub fn encode(a: i64, b: i64, c: i64, radix: i64) -> i64 {
    (a * radix + b) * radix + c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_zero() {
        assert_eq!(decode(0, INST_SZ), (0, 0, 0));
    }

    #[test]
    fn test_decode_known_word() {
        // (1*128 + 2)*128 + 3 = 16643
        assert_eq!(decode(16643, INST_SZ), (1, 2, 3));
    }

    #[test]
    fn test_decode_negative_word_floor_semantics() {
        // divmod(-1, 128) = (-1, 127), then divmod(-1, 128) = (-1, 127):
        // a shifts negative, b and c stay in [0, 128).
        assert_eq!(decode(-1, INST_SZ), (-1, 127, 127));
        assert_eq!(decode(-128, INST_SZ), (-1, 127, 0));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        assert_eq!(decode(encode(5, 9, 127, INST_SZ), INST_SZ), (5, 9, 127));
    }
}
