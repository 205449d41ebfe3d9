use std::collections::HashMap;

use libpl0::{ArithOp, Opcode};
use once_cell::sync::OnceCell;
use strum::IntoEnumIterator;

static INSTRUCTIONS: OnceCell<HashMap<&'static str, Descriptor>> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrClass {
    /// One signed decimal argument.
    Literal,
    /// No argument, subtype goes in the operand field.
    Arithmetic,
    /// One label argument.
    Jump,
    /// No argument, zero operand field.
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub mnemonic: &'static str,
    pub opcode: Opcode,
    pub subtype: u8,
    pub class: InstrClass,
}

impl Descriptor {
    const fn new(mnemonic: &'static str, opcode: Opcode, class: InstrClass) -> Self {
        Self {
            mnemonic,
            opcode,
            subtype: 0,
            class,
        }
    }

    fn arith(op: ArithOp) -> Self {
        let mnemonic: &'static str = op.into();
        Self {
            mnemonic,
            opcode: Opcode::OPR,
            subtype: op as u8,
            class: InstrClass::Arithmetic,
        }
    }

    /// Control never falls through to the next instruction.
    pub fn is_unconditional_jump(&self) -> bool {
        self.class == InstrClass::Jump && self.opcode == Opcode::JMP
    }
}

const FIXED: [Descriptor; 9] = [
    Descriptor::new("LIT", Opcode::LIT, InstrClass::Literal),
    Descriptor::new("LOD", Opcode::LOD, InstrClass::Literal),
    Descriptor::new("STO", Opcode::STO, InstrClass::Literal),
    Descriptor::new("JMP", Opcode::JMP, InstrClass::Jump),
    Descriptor::new("JPC", Opcode::JPC, InstrClass::Jump),
    Descriptor::new("CAL", Opcode::CAL, InstrClass::Jump),
    Descriptor::new("RET", Opcode::RET, InstrClass::Basic),
    Descriptor::new("IN", Opcode::IN, InstrClass::Basic),
    Descriptor::new("OUT", Opcode::OUT, InstrClass::Basic),
];

fn instructions() -> &'static HashMap<&'static str, Descriptor> {
    INSTRUCTIONS.get_or_init(|| {
        FIXED
            .iter()
            .copied()
            .chain(ArithOp::iter().map(Descriptor::arith))
            .map(|desc| (desc.mnemonic, desc))
            .collect()
    })
}

/// Exact, case-sensitive mnemonic lookup.
pub fn lookup(mnemonic: &str) -> Option<&'static Descriptor> {
    instructions().get(mnemonic)
}

pub fn all() -> impl Iterator<Item = &'static Descriptor> {
    instructions().values()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_class() {
        assert_eq!(lookup("LIT").map(|d| d.class), Some(InstrClass::Literal));
        assert_eq!(lookup("ADD").map(|d| d.class), Some(InstrClass::Arithmetic));
        assert_eq!(lookup("CAL").map(|d| d.class), Some(InstrClass::Jump));
        assert_eq!(lookup("OUT").map(|d| d.class), Some(InstrClass::Basic));
    }

    #[test]
    fn lookup_is_exact() {
        assert!(lookup("lit").is_none());
        assert!(lookup("LIT ").is_none());
        assert!(lookup("PUSH").is_none());
        // OPR is only reachable through its subtypes
        assert!(lookup("OPR").is_none());
    }

    #[test]
    fn arithmetic_subtypes() {
        let sub = lookup("SUB").unwrap();
        assert_eq!(sub.opcode, Opcode::OPR);
        assert_eq!(sub.subtype, 0x02);
        assert_eq!(lookup("RSH").unwrap().subtype, 0x0D);
    }

    #[test]
    fn only_jmp_is_unconditional() {
        let unconditional = all()
            .filter(|desc| desc.is_unconditional_jump())
            .map(|desc| desc.mnemonic)
            .collect::<Vec<_>>();
        assert_eq!(unconditional, vec!["JMP"]);
    }

    #[test]
    fn table_size() {
        assert_eq!(all().count(), 22);
    }
}
