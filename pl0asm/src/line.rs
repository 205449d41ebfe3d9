use std::iter::Enumerate;

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::error::{AsmError, Result};

static LABEL_REGEX: OnceCell<Regex> = OnceCell::new();
static LABEL_REGEX_PATTERN: &str = r"^(?P<name>[^:]+):$";

fn label_regex() -> &'static Regex {
    LABEL_REGEX.get_or_init(|| Regex::new(LABEL_REGEX_PATTERN).expect("Invalid label regex"))
}

/// One classified source line. Borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Label(&'a str),
    Instr {
        mnemonic: &'a str,
        argument: Option<&'a str>,
        /// First token past the argument, if any.
        extra: Option<&'a str>,
    },
    Ignorable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based.
    pub number: usize,
    pub line: Line<'a>,
}

fn is_comment(token: &str) -> bool {
    token.starts_with(';') || token.starts_with('#')
}

/// Splits `text` before its first comment token. The comment half keeps its
/// leading `;` or `#`, and is empty when there is no comment.
pub(crate) fn split_comment(text: &str) -> (&str, &str) {
    let mut at_token_start = true;
    for (idx, c) in text.char_indices() {
        if at_token_start && (c == ';' || c == '#') {
            return text.split_at(idx);
        }
        at_token_start = c == ' ' || c == '\t';
    }
    (text, "")
}

/// Whitespace separated tokens up to the first comment token.
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split([' ', '\t'])
        .filter(|token| !token.is_empty())
        .take_while(|token| !is_comment(token))
}

impl<'a> Line<'a> {
    pub fn classify(text: &'a str, number: usize) -> Result<Self> {
        let mut tokens = tokens(text);
        let Some(first) = tokens.next() else {
            return Ok(Self::Ignorable);
        };

        if first.ends_with(':') {
            let name = label_regex()
                .captures(first)
                .and_then(|cap| cap.name("name"))
                .map(|m| m.as_str())
                .filter(|_| tokens.next().is_none())
                .ok_or_else(|| AsmError::InvalidLabel {
                    text: text.trim().to_owned(),
                    line: number,
                })?;
            return Ok(Self::Label(name));
        }

        Ok(Self::Instr {
            mnemonic: first,
            argument: tokens.next(),
            extra: tokens.next(),
        })
    }
}

/// Lazily classified lines of a source text. Call [`lines`] again to rescan
/// from the top.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    inner: Enumerate<std::str::Lines<'a>>,
}

pub fn lines(source: &str) -> Lines<'_> {
    Lines {
        inner: source.lines().enumerate(),
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Result<SourceLine<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, text) = self.inner.next()?;
        let number = idx + 1;
        Some(Line::classify(text, number).map(|line| SourceLine { number, line }))
    }
}
