use std::fmt;

use thiserror::Error;

use crate::op::{ArithOp, Opcode, Operand};

pub type Word = u16;

pub const OPCODE_SHIFT: u16 = 12;
pub const FIELD_MASK: u16 = 0x0FFF;

/// Builds a word from an opcode and a twelve bit field. Bits above the field
/// are dropped.
pub fn pack(opcode: Opcode, field: u16) -> Word {
    ((opcode as u16) << OPCODE_SHIFT) | (field & FIELD_MASK)
}

pub fn field(word: Word) -> u16 {
    word & FIELD_MASK
}

pub fn opcode_bits(word: Word) -> u8 {
    (word >> OPCODE_SHIFT) as u8
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WordError {
    #[error("unknown opcode {0:#X} in word {1:#06X}")]
    UnknownOpcode(u8, Word),
    #[error("unknown arithmetic subtype {0:#X} in word {1:#06X}")]
    UnknownSubtype(u16, Word),
    #[error("{0} takes no operand, found {1:#X}")]
    StrayOperand(Opcode, u16),
}

/// A decoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Immediate(Opcode, u16),
    Arith(ArithOp),
    Address(Opcode, u16),
    Bare(Opcode),
}

impl Instruction {
    pub fn from_word(word: Word) -> Result<Self, WordError> {
        let nibble = opcode_bits(word);
        let opcode =
            Opcode::from_nibble(nibble).ok_or(WordError::UnknownOpcode(nibble, word))?;
        let value = field(word);

        Ok(match opcode.operand() {
            Operand::Immediate => Self::Immediate(opcode, value),
            Operand::Address => Self::Address(opcode, value),
            Operand::Subtype => Self::Arith(
                ArithOp::from_field(value).ok_or(WordError::UnknownSubtype(value, word))?,
            ),
            Operand::None if value == 0 => Self::Bare(opcode),
            Operand::None => return Err(WordError::StrayOperand(opcode, value)),
        })
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Immediate(op, _) | Self::Address(op, _) | Self::Bare(op) => *op,
            Self::Arith(_) => Opcode::OPR,
        }
    }
}

impl From<Instruction> for Word {
    fn from(instruction: Instruction) -> Self {
        match instruction {
            Instruction::Immediate(op, value) | Instruction::Address(op, value) => pack(op, value),
            Instruction::Arith(arith) => pack(Opcode::OPR, arith as u16),
            Instruction::Bare(op) => pack(op, 0),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(op, value) => write!(f, "{} {}", op, value),
            Self::Address(op, address) => write!(f, "{} @{:03X}", op, address),
            Self::Arith(arith) => write!(f, "{}", arith),
            Self::Bare(op) => write!(f, "{}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_masks_the_field() {
        assert_eq!(pack(Opcode::LIT, 5), 0x1005);
        assert_eq!(pack(Opcode::LIT, 0x1FFF), 0x1FFF);
        assert_eq!(pack(Opcode::JMP, 0x1002), 0x6002);
    }

    #[test]
    fn decodes_each_operand_shape() {
        assert_eq!(
            Instruction::from_word(0x1005),
            Ok(Instruction::Immediate(Opcode::LIT, 5))
        );
        assert_eq!(
            Instruction::from_word(0x2001),
            Ok(Instruction::Arith(ArithOp::ADD))
        );
        assert_eq!(
            Instruction::from_word(0x6002),
            Ok(Instruction::Address(Opcode::JMP, 2))
        );
        assert_eq!(
            Instruction::from_word(0x9000),
            Ok(Instruction::Bare(Opcode::OUT))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            Instruction::from_word(0x0123),
            Err(WordError::UnknownOpcode(0, 0x0123))
        );
        assert_eq!(
            Instruction::from_word(0x200F),
            Err(WordError::UnknownSubtype(0xF, 0x200F))
        );
        assert_eq!(
            Instruction::from_word(0x5001),
            Err(WordError::StrayOperand(Opcode::RET, 1))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Instruction::Immediate(Opcode::LOD, 3).to_string(), "LOD 3");
        assert_eq!(Instruction::Address(Opcode::CAL, 0x2A).to_string(), "CAL @02A");
        assert_eq!(Instruction::Arith(ArithOp::LSH).to_string(), "LSH");
        assert_eq!(Word::from(Instruction::Bare(Opcode::IN)), 0x8000);
    }
}
