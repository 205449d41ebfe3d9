use thiserror::Error;

/// Every way an assembly can fail. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { mnemonic: String, line: usize },

    #[error("line {line}: `{mnemonic}` requires an operand")]
    MissingOperand { mnemonic: String, line: usize },

    #[error("line {line}: `{mnemonic}` does not take operand `{operand}`")]
    UnexpectedOperand {
        mnemonic: String,
        operand: String,
        line: usize,
    },

    #[error("line {line}: `{literal}` is not a decimal literal for `{mnemonic}`")]
    InvalidLiteral {
        mnemonic: String,
        literal: String,
        line: usize,
    },

    #[error("line {line}: undefined label `{name}`")]
    UndefinedLabel { name: String, line: usize },

    #[error("line {line}: label `{name}` is already defined")]
    DuplicateLabel { name: String, line: usize },

    #[error("line {line}: malformed label definition `{text}`")]
    InvalidLabel { text: String, line: usize },

    #[error("line {line}: label table is full ({capacity} labels)")]
    SymbolTableFull { capacity: usize, line: usize },

    #[error("line {line}: output would exceed {max_words} words")]
    OutputCapacityExceeded { max_words: usize, line: usize },
}

impl AsmError {
    /// Source line the error was found on, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidInput(_) => None,
            Self::UnknownMnemonic { line, .. }
            | Self::MissingOperand { line, .. }
            | Self::UnexpectedOperand { line, .. }
            | Self::InvalidLiteral { line, .. }
            | Self::UndefinedLabel { line, .. }
            | Self::DuplicateLabel { line, .. }
            | Self::InvalidLabel { line, .. }
            | Self::SymbolTableFull { line, .. }
            | Self::OutputCapacityExceeded { line, .. } => Some(*line),
        }
    }

    pub(crate) fn map_line(mut self, f: impl Fn(usize) -> usize) -> Self {
        match &mut self {
            Self::InvalidInput(_) => {}
            Self::UnknownMnemonic { line, .. }
            | Self::MissingOperand { line, .. }
            | Self::UnexpectedOperand { line, .. }
            | Self::InvalidLiteral { line, .. }
            | Self::UndefinedLabel { line, .. }
            | Self::DuplicateLabel { line, .. }
            | Self::InvalidLabel { line, .. }
            | Self::SymbolTableFull { line, .. }
            | Self::OutputCapacityExceeded { line, .. } => *line = f(*line),
        }
        self
    }
}

pub type Result<T, E = AsmError> = std::result::Result<T, E>;
