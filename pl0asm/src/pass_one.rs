use log::{debug, trace};

use crate::{
    error::Result,
    labels::Labels,
    line::{lines, Line, SourceLine},
    reach::Tracker,
    Config,
};

struct FirstPass {
    cur_address: usize,
    labels: Labels,
    reach: Tracker,
}

/// Everything pass two needs from pass one.
pub struct PassOne {
    pub labels: Labels,
    /// Number of instructions that will be emitted.
    pub length: usize,
}

impl FirstPass {
    fn new(config: &Config) -> Self {
        Self {
            cur_address: 0,
            labels: Labels::with_capacity(config.label_capacity),
            reach: Tracker::new(config.reachability),
        }
    }

    fn scan_line(&mut self, line: SourceLine) -> Result<()> {
        match line.line {
            Line::Label(name) => {
                debug!("label `{}` at {}", name, self.cur_address);
                self.labels.define(name, self.cur_address, line.number)?;
                self.reach.label();
            }
            Line::Instr { mnemonic, .. } => {
                if self.reach.admit(mnemonic) {
                    trace!("`{}` at {}", mnemonic, self.cur_address);
                    self.cur_address += 1;
                } else {
                    debug!("line {}: `{}` is unreachable", line.number, mnemonic);
                }
            }
            Line::Ignorable => {}
        }
        Ok(())
    }
}

/// Collects labels and counts reachable instructions.
pub fn pass_one(source: &str, config: &Config) -> Result<PassOne> {
    let mut pass = FirstPass::new(config);
    for line in lines(source) {
        pass.scan_line(line?)?;
    }

    debug!(
        "pass one: {} labels, {} instructions",
        pass.labels.len(),
        pass.cur_address
    );

    Ok(PassOne {
        labels: pass.labels,
        length: pass.cur_address,
    })
}
