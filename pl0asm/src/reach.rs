use crate::instructions;

/// Dead code policy shared by both passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reachability {
    /// Every instruction line is counted and emitted.
    #[default]
    Keep,
    /// Instructions after an unconditional jump are dropped until the next
    /// label definition.
    PruneAfterJump,
}

/// Per-pass skip state. Pass one and pass two each build their own and feed it
/// the same lines, so they agree on which instructions exist.
#[derive(Debug, Clone)]
pub struct Tracker {
    policy: Reachability,
    skipping: bool,
}

impl Tracker {
    pub fn new(policy: Reachability) -> Self {
        Self {
            policy,
            skipping: false,
        }
    }

    pub fn label(&mut self) {
        self.skipping = false;
    }

    /// Whether the instruction with this mnemonic occupies an address.
    /// Unknown mnemonics are admitted and never start a skip.
    pub fn admit(&mut self, mnemonic: &str) -> bool {
        if self.skipping {
            return false;
        }
        if self.policy == Reachability::PruneAfterJump
            && instructions::lookup(mnemonic).is_some_and(|desc| desc.is_unconditional_jump())
        {
            self.skipping = true;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(policy: Reachability, lines: &[&str]) -> Vec<bool> {
        let mut tracker = Tracker::new(policy);
        lines
            .iter()
            .map(|line| match line.strip_suffix(':') {
                Some(_) => {
                    tracker.label();
                    true
                }
                None => tracker.admit(line),
            })
            .collect()
    }

    #[test]
    fn keep_admits_everything() {
        assert_eq!(
            run(Reachability::Keep, &["JMP", "LIT", "JMP", "OUT"]),
            vec![true; 4]
        );
    }

    #[test]
    fn prune_until_label() {
        assert_eq!(
            run(
                Reachability::PruneAfterJump,
                &["LIT", "JMP", "LIT", "JMP", "end:", "OUT", "JPC", "IN"]
            ),
            vec![true, true, false, false, true, true, true, true]
        );
    }

    #[test]
    fn unknown_mnemonics_are_admitted() {
        assert_eq!(
            run(Reachability::PruneAfterJump, &["FOO", "JMP", "FOO"]),
            vec![true, true, false]
        );
    }
}
