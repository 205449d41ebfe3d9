use pass_one::pass_one;
use pass_two::pass_two;

pub use error::{AsmError, Result};
pub use instructions::{Descriptor, InstrClass};
pub use labels::Labels;
pub use output::Assembly;
pub use reach::Reachability;
pub use symbols::SymbolMap;

pub mod encoder;
mod error;
pub mod instructions;
mod labels;
pub mod line;
pub mod macros;
mod output;
mod pass_one;
mod pass_two;
mod reach;
pub mod symbols;

/// Default size of the label table.
pub const DEFAULT_LABEL_CAPACITY: usize = 100;
/// Default output limit used by the command line tool.
pub const DEFAULT_MAX_WORDS: usize = 1024;

/// Limits and policy for a single assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub max_words: usize,
    pub label_capacity: usize,
    pub reachability: Reachability,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            label_capacity: DEFAULT_LABEL_CAPACITY,
            reachability: Reachability::Keep,
        }
    }
}

impl Config {
    pub fn with_max_words(max_words: usize) -> Self {
        Self {
            max_words,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(AsmError::InvalidInput("output capacity must be positive"));
        }
        if self.label_capacity == 0 {
            return Err(AsmError::InvalidInput("label capacity must be positive"));
        }
        Ok(())
    }
}

/// Assemble a program from text, emitting at most `max_words` words.
///
/// # Errors
///
/// If the source is empty, `max_words` is zero, or there's an error in the
/// assembly code. No words are returned on failure.
pub fn assemble(source: &str, max_words: usize) -> Result<Assembly> {
    assemble_with(source, &Config::with_max_words(max_words))
}

/// Assemble with explicit limits and reachability policy.
///
/// # Errors
///
/// See [`assemble`].
pub fn assemble_with(source: &str, config: &Config) -> Result<Assembly> {
    config.validate()?;
    if source.is_empty() {
        return Err(AsmError::InvalidInput("empty source"));
    }

    let pass_one = pass_one(source, config)?;
    pass_two(source, pass_one, config)
}

/// Assemble macro-expanded source. Errors and word origins refer to lines of
/// the source before expansion.
///
/// # Errors
///
/// See [`assemble`].
pub fn assemble_expansion(expansion: &macros::Expansion, config: &Config) -> Result<Assembly> {
    let origin = |line| expansion.origin(line);
    match assemble_with(expansion.text(), config) {
        Ok(mut assembly) => {
            assembly.map_origins(origin);
            Ok(assembly)
        }
        Err(err) => Err(err.map_line(origin)),
    }
}
