//! OE10 command checksum
//!
//! The checksum is an XOR fold of the payload bytes with two substitution
//! rules recovered from the vendor software: folded values `0x3C` and `0x3E`
//! are replaced on the wire by the sentinel `0xFF`, with a side indicator
//! recording which rule fired. Only these two substitutions were observed;
//! they must not be generalized to other folded values.

/// Sentinel transmitted in place of a substituted checksum value.
pub const SUBSTITUTION_SENTINEL: u8 = 0xFF;

/// Folded value replaced by the sentinel with indicator `'0'`.
pub const SUBSTITUTED_VALUE_ZERO: u8 = 0x3C;

/// Folded value replaced by the sentinel with indicator `'1'`.
pub const SUBSTITUTED_VALUE_ONE: u8 = 0x3E;

/// Which checksum rule produced the wire value.
///
/// Diagnostic metadata only; the tag is never transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumTag {
    /// Fold result passed through unchanged.
    Good,
    /// Fold landed on `0x3C`, sentinel substituted.
    SubstitutedZero,
    /// Fold landed on `0x3E`, sentinel substituted.
    SubstitutedOne,
}

impl ChecksumTag {
    /// The single-character indicator used by the vendor software's logs.
    pub fn indicator(&self) -> char {
        match self {
            ChecksumTag::Good => 'G',
            ChecksumTag::SubstitutedZero => '0',
            ChecksumTag::SubstitutedOne => '1',
        }
    }
}

/// A computed checksum: the wire byte plus its substitution tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    /// The byte that goes on the wire.
    pub value: u8,
    /// Which rule produced it.
    pub tag: ChecksumTag,
}

/// Compute the checksum of a payload.
///
/// XOR-folds all bytes into an accumulator starting at `0x00`, then applies
/// the two substitution rules. Pure function; an empty payload folds to
/// `0x00`.
pub fn checksum(payload: &[u8]) -> Checksum {
    let folded = payload.iter().fold(0u8, |acc, &b| acc ^ b);
    match folded {
        SUBSTITUTED_VALUE_ZERO => Checksum {
            value: SUBSTITUTION_SENTINEL,
            tag: ChecksumTag::SubstitutedZero,
        },
        SUBSTITUTED_VALUE_ONE => Checksum {
            value: SUBSTITUTION_SENTINEL,
            tag: ChecksumTag::SubstitutedOne,
        },
        value => Checksum {
            value,
            tag: ChecksumTag::Good,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_folds_to_zero() {
        let sum = checksum(&[]);
        assert_eq!(sum.value, 0x00);
        assert_eq!(sum.tag, ChecksumTag::Good);
    }

    #[test]
    fn test_plain_fold() {
        // 0x58 ^ 0xFD ^ 0xF9 = 0x5C, not a substituted value.
        let sum = checksum(&[0x58, 0xFD, 0xF9]);
        assert_eq!(sum.value, 0x5C);
        assert_eq!(sum.tag, ChecksumTag::Good);
    }

    #[test]
    fn test_substitution_zero() {
        // 0x3C ^ 0x00 = 0x3C triggers the first substitution.
        let sum = checksum(&[0x3C]);
        assert_eq!(sum.value, SUBSTITUTION_SENTINEL);
        assert_eq!(sum.tag, ChecksumTag::SubstitutedZero);
        assert_eq!(sum.tag.indicator(), '0');

        // Multi-byte fold landing on 0x3C behaves identically.
        let sum = checksum(&[0x0F, 0x33]);
        assert_eq!(sum.value, SUBSTITUTION_SENTINEL);
        assert_eq!(sum.tag, ChecksumTag::SubstitutedZero);
    }

    #[test]
    fn test_substitution_one() {
        let sum = checksum(&[0x3E]);
        assert_eq!(sum.value, SUBSTITUTION_SENTINEL);
        assert_eq!(sum.tag, ChecksumTag::SubstitutedOne);
        assert_eq!(sum.tag.indicator(), '1');
    }

    #[test]
    fn test_deterministic() {
        let payload = [0xFD, 0xF9, 0x59, 0x57, 0xF3, 0x71, 0x83];
        assert_eq!(checksum(&payload), checksum(&payload));
    }

    #[test]
    fn test_good_indicator() {
        assert_eq!(checksum(&[0x01]).tag.indicator(), 'G');
    }
}
