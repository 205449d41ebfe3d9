use libpl0::word::{self, Word, FIELD_MASK};

use crate::instructions::{Descriptor, InstrClass};

/// Encodes one resolved instruction. `operand` is the literal value or the
/// jump target; it is ignored for arithmetic and basic instructions.
pub fn encode(descriptor: &Descriptor, operand: Option<u16>) -> Word {
    let field = match descriptor.class {
        InstrClass::Literal | InstrClass::Jump => operand.unwrap_or(0),
        InstrClass::Arithmetic => u16::from(descriptor.subtype),
        InstrClass::Basic => 0,
    };
    word::pack(descriptor.opcode, field)
}

/// Two's-complement truncation of a literal to the operand width.
pub fn literal_field(value: i64) -> u16 {
    (value & i64::from(FIELD_MASK)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::lookup;

    fn desc(mnemonic: &str) -> &'static Descriptor {
        lookup(mnemonic).unwrap()
    }

    #[test]
    fn literal_low_bits_survive() {
        for v in [0u16, 1, 42, 0x800, 4095] {
            let word = encode(desc("LIT"), Some(literal_field(i64::from(v))));
            assert_eq!(word & 0xFFF, v);
            assert_eq!(word >> 12, 0x1);
        }
    }

    #[test]
    fn literals_are_masked() {
        assert_eq!(literal_field(4096), 0);
        assert_eq!(literal_field(4097), 1);
        assert_eq!(literal_field(-1), 0xFFF);
        assert_eq!(literal_field(-2048), 0x800);
    }

    #[test]
    fn arithmetic_uses_subtype() {
        assert_eq!(encode(desc("ADD"), None), 0x2001);
        assert_eq!(encode(desc("LTE"), Some(99)), 0x200B);
    }

    #[test]
    fn jumps_and_basics() {
        assert_eq!(encode(desc("JMP"), Some(2)), 0x6002);
        assert_eq!(encode(desc("JPC"), Some(0x1003)), 0x7003);
        assert_eq!(encode(desc("RET"), None), 0x5000);
        assert_eq!(encode(desc("OUT"), Some(7)), 0x9000);
    }
}
