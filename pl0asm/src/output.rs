use std::fmt::Write;

use libpl0::{word::Word, Instruction};

use crate::{labels::Labels, symbols::SymbolMap};

/// A successful assembly: one word per reachable instruction, in source order.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub(crate) words: Vec<Word>,
    /// Source line of each word.
    pub(crate) origins: Vec<usize>,
    pub(crate) labels: Labels,
}

impl Assembly {
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn into_words(self) -> Vec<Word> {
        self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// 1-based source line that produced the word at `address`.
    pub fn origin(&self, address: usize) -> Option<usize> {
        self.origins.get(address).copied()
    }

    /// The image the VM loader expects: the words in native byte order, with
    /// no header or padding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|word| word.to_ne_bytes()).collect()
    }

    pub(crate) fn map_origins(&mut self, f: impl Fn(usize) -> usize) {
        for origin in &mut self.origins {
            *origin = f(*origin);
        }
    }

    pub fn symbols(&self) -> SymbolMap {
        SymbolMap::new(self)
    }

    /// Human readable dump: address, word, decoded instruction and source line.
    pub fn listing(&self) -> String {
        let mut listing = String::new();
        let mut labels = self.labels.iter().peekable();

        for (address, (word, line)) in self.words.iter().zip(&self.origins).enumerate() {
            while let Some((name, _)) = labels.next_if(|(_, at)| *at == address) {
                let _ = writeln!(listing, "{}:", name);
            }
            let decoded = Instruction::from_word(*word)
                .map(|instruction| instruction.to_string())
                .unwrap_or_else(|_| "???".to_owned());
            let _ = writeln!(
                listing,
                "    {:03X}  {:04X}  {:<12}; line {}",
                address, word, decoded, line
            );
        }
        for (name, _) in labels {
            let _ = writeln!(listing, "{}:", name);
        }

        listing
    }
}

#[cfg(test)]
mod tests {
    use crate::assemble;

    #[test]
    fn bytes_are_native_order() {
        let assembly = assemble("LIT 5\nADD\n", 8).unwrap();
        let bytes = assembly.to_bytes();
        assert_eq!(bytes.len(), assembly.len() * 2);
        assert_eq!(bytes[..2], 0x1005u16.to_ne_bytes());
        assert_eq!(bytes[2..], 0x2001u16.to_ne_bytes());
    }

    #[test]
    fn origins_follow_source_lines() {
        let assembly = assemble("; header\nLIT 1\n\nloop:\nOUT\n", 8).unwrap();
        assert_eq!(assembly.origin(0), Some(2));
        assert_eq!(assembly.origin(1), Some(5));
        assert_eq!(assembly.origin(2), None);
    }
}
