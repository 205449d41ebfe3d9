use libpl0::word::{Word, FIELD_MASK};
use log::{debug, trace};

use crate::{
    encoder::{encode, literal_field},
    error::{AsmError, Result},
    instructions::{self, InstrClass},
    line::{lines, Line},
    output::Assembly,
    pass_one::PassOne,
    reach::Tracker,
    Config,
};

struct PassTwo {
    reach: Tracker,
    words: Vec<Word>,
    origins: Vec<usize>,
    max_words: usize,
    pass_one: PassOne,
}

impl PassTwo {
    fn new(pass_one: PassOne, config: &Config) -> Self {
        let reserve = pass_one.length.min(config.max_words);
        Self {
            reach: Tracker::new(config.reachability),
            words: Vec::with_capacity(reserve),
            origins: Vec::with_capacity(reserve),
            max_words: config.max_words,
            pass_one,
        }
    }

    fn assemble_lines(mut self, source: &str) -> Result<Assembly> {
        for line in lines(source) {
            let line = line?;
            match line.line {
                Line::Label(_) => self.reach.label(),
                Line::Instr {
                    mnemonic,
                    argument,
                    extra,
                } => {
                    if self.reach.admit(mnemonic) {
                        let word = self.assemble_instr(mnemonic, argument, extra, line.number)?;
                        self.emit(word, line.number)?;
                    } else {
                        debug!("line {}: skipping `{}`", line.number, mnemonic);
                    }
                }
                Line::Ignorable => {}
            }
        }

        debug!("pass two: {} words", self.words.len());

        Ok(Assembly {
            words: self.words,
            origins: self.origins,
            labels: self.pass_one.labels,
        })
    }

    fn assemble_instr(
        &self,
        mnemonic: &str,
        argument: Option<&str>,
        extra: Option<&str>,
        line: usize,
    ) -> Result<Word> {
        let descriptor =
            instructions::lookup(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
                mnemonic: mnemonic.to_owned(),
                line,
            })?;

        let unexpected = |operand: &str| AsmError::UnexpectedOperand {
            mnemonic: mnemonic.to_owned(),
            operand: operand.to_owned(),
            line,
        };
        let missing = || AsmError::MissingOperand {
            mnemonic: mnemonic.to_owned(),
            line,
        };

        let operand = match descriptor.class {
            InstrClass::Literal | InstrClass::Jump => {
                if let Some(extra) = extra {
                    return Err(unexpected(extra));
                }
                let argument = argument.ok_or_else(missing)?;
                Some(if descriptor.class == InstrClass::Literal {
                    let value =
                        argument
                            .parse::<i64>()
                            .map_err(|_| AsmError::InvalidLiteral {
                                mnemonic: mnemonic.to_owned(),
                                literal: argument.to_owned(),
                                line,
                            })?;
                    literal_field(value)
                } else {
                    let address = self.pass_one.labels.resolve(argument, line)?;
                    (address & usize::from(FIELD_MASK)) as u16
                })
            }
            InstrClass::Arithmetic | InstrClass::Basic => {
                if let Some(argument) = argument {
                    return Err(unexpected(argument));
                }
                None
            }
        };

        Ok(encode(descriptor, operand))
    }

    fn emit(&mut self, word: Word, line: usize) -> Result<()> {
        if self.words.len() >= self.max_words {
            return Err(AsmError::OutputCapacityExceeded {
                max_words: self.max_words,
                line,
            });
        }
        trace!("{:04}: {:#06X} (line {})", self.words.len(), word, line);
        self.words.push(word);
        self.origins.push(line);
        Ok(())
    }
}

/// Encodes every reachable instruction, resolving labels collected by pass one.
pub fn pass_two(source: &str, pass_one: PassOne, config: &Config) -> Result<Assembly> {
    let pass = PassTwo::new(pass_one, config);
    pass.assemble_lines(source)
}
