use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
pub use serde_json::Error;

use crate::output::Assembly;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SymbolLine {
    pub address: usize,
    pub line_number: usize,
}

/// Debug information written next to a binary image.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SymbolMap {
    pub words: usize,
    pub labels: BTreeMap<String, usize>,
    pub lines: Vec<SymbolLine>,
}

impl SymbolMap {
    pub fn new(assembly: &Assembly) -> Self {
        SymbolMap {
            words: assembly.len(),
            labels: assembly
                .labels()
                .iter()
                .map(|(name, address)| (name.to_owned(), address))
                .collect(),
            lines: (0..assembly.len())
                .filter_map(|address| {
                    assembly.origin(address).map(|line_number| SymbolLine {
                        address,
                        line_number,
                    })
                })
                .collect(),
        }
    }

    pub fn to_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_string(sym: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(sym)
    }
}
