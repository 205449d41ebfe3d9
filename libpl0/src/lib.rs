pub use op::{ArithOp, Opcode};
pub use word::{Instruction, WordError};

pub mod op;
pub mod word;
