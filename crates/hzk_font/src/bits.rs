//! Bit run packing.
//!
//! A bit run is packed MSB first and zero padded to a whole byte. Padding bits
//! can't be told apart from real clear pixels, so decoding needs the bit count.

/// Pack `bits` into bytes, first bit in the most significant position.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bits.len().div_ceil(8));
    pack_bits_into(bits, &mut out);
    out
}

/// Append the packed form of `bits` to `out`.
pub fn pack_bits_into(bits: &[bool], out: &mut Vec<u8>) {
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            if bit {
                byte |= 0x80 >> i;
            }
        }
        out.push(byte);
    }
}

/// Read `count` bits back out of `bytes`.
///
/// Returns fewer than `count` bits if `bytes` is too short.
pub fn unpack_bits(bytes: &[u8], count: usize) -> Vec<bool> {
    let count = count.min(bytes.len() * 8);
    (0..count).map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_pads_with_zero() {
        assert_eq!(pack_bits(&[true; 5]), vec![0b1111_1000]);
        assert_eq!(pack_bits(&[true]), vec![0x80]);
        assert_eq!(pack_bits(&[false, true]), vec![0x40]);
    }

    #[test]
    fn test_pack_exact_byte_has_no_padding() {
        assert_eq!(pack_bits(&[true; 8]), vec![0xFF]);
        assert_eq!(pack_bits(&[true; 16]), vec![0xFF, 0xFF]);
    }

    #[test]
    fn test_pack_multi_byte() {
        let mut bits = vec![false; 9];
        bits[0] = true;
        bits[8] = true;
        assert_eq!(pack_bits(&bits), vec![0x80, 0x80]);

        // 31 bit row of the widest level
        let bits = [true; 31];
        assert_eq!(pack_bits(&bits), vec![0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_pack_empty() {
        assert!(pack_bits(&[]).is_empty());
    }

    #[test]
    fn test_pack_into_appends() {
        let mut out = vec![0xAA];
        pack_bits_into(&[true, false, true], &mut out);
        assert_eq!(out, vec![0xAA, 0xA0]);
    }

    #[test]
    fn test_unpack() {
        assert_eq!(unpack_bits(&[0xA0], 3), vec![true, false, true]);
        assert_eq!(unpack_bits(&[0xFF, 0x80], 9), vec![true; 9]);
        assert_eq!(unpack_bits(&[0xFF], 12).len(), 8);
    }

    #[test]
    fn test_padding_is_lossy() {
        // three set bits and five clear ones pack the same as three set bits
        let mut long = vec![true; 3];
        long.extend([false; 5]);
        assert_eq!(pack_bits(&long), pack_bits(&[true; 3]));
    }
}
