use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Main opcodes, stored in the top four bits of every instruction word.
#[allow(clippy::upper_case_acronyms)]
#[derive(FromPrimitive, Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    LIT = 0x1,
    OPR = 0x2,
    STO = 0x3,
    CAL = 0x4,
    RET = 0x5,
    JMP = 0x6,
    JPC = 0x7,
    IN = 0x8,
    OUT = 0x9,
    LOD = 0xA,
}

/// What the low twelve bits of a word mean for a given opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Immediate,
    Subtype,
    Address,
    None,
}

impl Opcode {
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        FromPrimitive::from_u8(nibble)
    }

    pub fn operand(self) -> Operand {
        match self {
            Opcode::LIT | Opcode::LOD | Opcode::STO => Operand::Immediate,
            Opcode::OPR => Operand::Subtype,
            Opcode::CAL | Opcode::JMP | Opcode::JPC => Operand::Address,
            Opcode::RET | Opcode::IN | Opcode::OUT => Operand::None,
        }
    }
}

/// Subtypes of `OPR`, carried in the operand field.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    FromPrimitive,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
pub enum ArithOp {
    ADD = 0x01,
    SUB = 0x02,
    MUL = 0x03,
    DIV = 0x04,
    MOD = 0x05,

    EQL = 0x06,
    NEQ = 0x07,
    LSS = 0x08,
    GTE = 0x09,
    GTR = 0x0A,
    LTE = 0x0B,

    LSH = 0x0C,
    RSH = 0x0D,
}

impl ArithOp {
    pub fn from_field(field: u16) -> Option<Self> {
        FromPrimitive::from_u16(field)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn opcodes_fit_in_a_nibble() {
        for nibble in 0..=0xFu8 {
            if let Some(op) = Opcode::from_nibble(nibble) {
                assert_eq!(op as u8, nibble);
            }
        }
        assert_eq!(Opcode::from_nibble(0x0), None);
        assert_eq!(Opcode::from_nibble(0xA), Some(Opcode::LOD));
    }

    #[test]
    fn arith_names_are_case_sensitive() {
        assert_eq!(ArithOp::from_str("ADD").ok(), Some(ArithOp::ADD));
        assert!(ArithOp::from_str("add").is_err());
    }

    #[test]
    fn arith_subtypes_are_distinct() {
        let mut seen = ArithOp::iter().map(|op| op as u16).collect::<Vec<_>>();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ArithOp::iter().count());
        assert!(seen.iter().all(|s| *s <= 0xF));
    }
}
