//! Textual macro expansion, run on raw source before assembly.
//!
//! ```text
//! %macro PUSH2 2
//! LIT %1
//! LIT %2
//! %endmacro
//!
//! PUSH2 4 5
//! ```

use std::collections::HashMap;

use log::debug;
use once_cell::sync::OnceCell;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::line::{split_comment, tokens};

const MAX_DEPTH: usize = 16;

static PLACEHOLDER_REGEX: OnceCell<Regex> = OnceCell::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"%(\d+)").expect("Invalid placeholder regex"))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    #[error("line {line}: expected `%macro NAME ARITY`, found `{text}`")]
    BadHeader { text: String, line: usize },
    #[error("line {line}: macro `{name}` is already defined")]
    Duplicate { name: String, line: usize },
    #[error("line {line}: macro definitions cannot be nested")]
    Nested { line: usize },
    #[error("line {line}: macro `{name}` is missing `%endmacro`")]
    Unterminated { name: String, line: usize },
    #[error("line {line}: `%endmacro` without `%macro`")]
    StrayEnd { line: usize },
    #[error("line {line}: macro `{name}` takes {expected} arguments, got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("line {line}: placeholder `%{index}` is out of range for macro `{name}`")]
    Placeholder {
        name: String,
        index: String,
        line: usize,
    },
    #[error("line {line}: macro expansion nested deeper than {}", MAX_DEPTH)]
    TooDeep { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    pub arity: usize,
    pub body: Vec<String>,
}

impl Macro {
    /// Body with every `%N` replaced by the matching argument. Comments are
    /// copied untouched.
    fn substitute(&self, args: &[&str]) -> Vec<String> {
        self.body
            .iter()
            .map(|line| {
                let (code, comment) = split_comment(line);
                let mut expanded = placeholder_regex()
                    .replace_all(code, |cap: &Captures| {
                        cap[1]
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| args.get(n.wrapping_sub(1)))
                            .copied()
                            .unwrap_or_default()
                            .to_owned()
                    })
                    .into_owned();
                expanded.push_str(comment);
                expanded
            })
            .collect()
    }
}

struct Pending {
    name: String,
    arity: usize,
    body: Vec<String>,
    line: usize,
}

#[derive(Debug, Default)]
pub struct Macros {
    macros: HashMap<String, Macro>,
}

impl Macros {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    fn define(&mut self, pending: Pending) -> Result<(), MacroError> {
        for line in &pending.body {
            let (code, _) = split_comment(line);
            for cap in placeholder_regex().captures_iter(code) {
                let in_range = cap[1]
                    .parse::<usize>()
                    .is_ok_and(|n| (1..=pending.arity).contains(&n));
                if !in_range {
                    return Err(MacroError::Placeholder {
                        name: pending.name,
                        index: cap[1].to_owned(),
                        line: pending.line,
                    });
                }
            }
        }
        if self.macros.contains_key(&pending.name) {
            return Err(MacroError::Duplicate {
                name: pending.name,
                line: pending.line,
            });
        }

        debug!(
            "macro `{}` with {} arguments, {} lines",
            pending.name,
            pending.arity,
            pending.body.len()
        );
        self.macros.insert(
            pending.name.clone(),
            Macro {
                name: pending.name,
                arity: pending.arity,
                body: pending.body,
            },
        );
        Ok(())
    }

    /// Appends `text` to `out`, expanding it if it invokes a macro.
    fn emit(
        &self,
        text: &str,
        line: usize,
        depth: usize,
        out: &mut Vec<(String, usize)>,
    ) -> Result<(), MacroError> {
        let mut words = tokens(text);
        let Some(mac) = words.next().and_then(|name| self.macros.get(name)) else {
            out.push((text.to_owned(), line));
            return Ok(());
        };
        if depth >= MAX_DEPTH {
            return Err(MacroError::TooDeep { line });
        }

        let args = words
            .flat_map(|word| word.split(','))
            .filter(|arg| !arg.is_empty())
            .collect::<Vec<_>>();
        if args.len() != mac.arity {
            return Err(MacroError::Arity {
                name: mac.name.clone(),
                expected: mac.arity,
                found: args.len(),
                line,
            });
        }

        for expanded in mac.substitute(&args) {
            self.emit(&expanded, line, depth + 1, out)?;
        }
        Ok(())
    }
}

fn parse_header(text: &str, line: usize) -> Result<Pending, MacroError> {
    let bad = || MacroError::BadHeader {
        text: text.trim().to_owned(),
        line,
    };
    let mut words = tokens(text).skip(1);
    let name = words.next().ok_or_else(bad)?;
    let arity = words
        .next()
        .and_then(|arity| arity.parse::<usize>().ok())
        .ok_or_else(bad)?;
    if words.next().is_some() {
        return Err(bad());
    }

    Ok(Pending {
        name: name.to_owned(),
        arity,
        body: Vec::new(),
        line,
    })
}

/// Expanded source text, plus the line of the original source each of its
/// lines came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    text: String,
    origins: Vec<usize>,
}

impl Expansion {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Maps a 1-based line of the expanded text back to the 1-based line of
    /// the original source. Lines of an expansion map to their invocation.
    pub fn origin(&self, line: usize) -> usize {
        line.checked_sub(1)
            .and_then(|idx| self.origins.get(idx))
            .copied()
            .unwrap_or(line)
    }
}

/// Expands every macro in `source`, dropping the definitions.
///
/// # Errors
///
/// If a definition is malformed or an invocation doesn't match its macro.
pub fn expand(source: &str) -> Result<Expansion, MacroError> {
    let mut macros = Macros::new();
    let mut pending: Option<Pending> = None;
    let mut out = Vec::new();

    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        match tokens(text).next() {
            Some("%macro") => {
                if pending.is_some() {
                    return Err(MacroError::Nested { line });
                }
                pending = Some(parse_header(text, line)?);
            }
            Some("%endmacro") => {
                let done = pending.take().ok_or(MacroError::StrayEnd { line })?;
                macros.define(done)?;
            }
            _ => match pending.as_mut() {
                Some(def) => def.body.push(text.to_owned()),
                None => macros.emit(text, line, 0, &mut out)?,
            },
        }
    }

    if let Some(def) = pending {
        return Err(MacroError::Unterminated {
            name: def.name,
            line: def.line,
        });
    }

    let (lines, origins): (Vec<_>, Vec<_>) = out.into_iter().unzip();
    let mut text = lines.join("\n");
    text.push('\n');
    Ok(Expansion { text, origins })
}
