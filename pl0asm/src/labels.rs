use indexmap::{map::Entry, IndexMap};

use crate::error::{AsmError, Result};

/// Label name to instruction address, in definition order.
#[derive(Debug, Clone)]
pub struct Labels {
    labels: IndexMap<String, usize>,
    capacity: usize,
}

impl Labels {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: IndexMap::new(),
            capacity,
        }
    }

    /// Binds `name` to `address`. `line` is only used for error reporting.
    pub fn define(&mut self, name: &str, address: usize, line: usize) -> Result<()> {
        if self.labels.len() >= self.capacity && !self.labels.contains_key(name) {
            return Err(AsmError::SymbolTableFull {
                capacity: self.capacity,
                line,
            });
        }

        match self.labels.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(AsmError::DuplicateLabel {
                name: name.to_owned(),
                line,
            }),
            Entry::Vacant(slot) => {
                slot.insert(address);
                Ok(())
            }
        }
    }

    pub fn resolve(&self, name: &str, line: usize) -> Result<usize> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| AsmError::UndefinedLabel {
                name: name.to_owned(),
                line,
            })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels.iter().map(|(name, address)| (name.as_str(), *address))
    }
}
