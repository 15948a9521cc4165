//! If/else branch-instrumentation decision table (spec §4.3).
//!
//! Pure classification logic, kept separate from the tree walk in
//! `visitor.rs` so the elsif role rules can be read (and tested) on their
//! own.

/// The four elsif-role booleans from spec §4.3, derived from whether this
/// `if` is itself an elsif (its else-arm is a single nested `if`) and
/// whether it was marked as a continuation by its enclosing if.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElsifRoles {
    pub is_elsif: bool,
    pub first_elsif: bool,
    pub cont_elsif: bool,
    pub final_elsif: bool,
    /// Whether this `if` has an else-arm at all, elsif chain or not — a
    /// structural fact `pattern()` needs to tell a plain `if/else` apart
    /// from a lopsided, else-less `if`.
    pub has_else: bool,
}

impl ElsifRoles {
    pub fn classify(is_elsif: bool, is_continuation: bool, has_else: bool) -> Self {
        Self {
            is_elsif,
            first_elsif: is_elsif && !is_continuation,
            cont_elsif: is_elsif && is_continuation,
            final_elsif: is_continuation && !is_elsif && has_else,
            has_else,
        }
    }
}

/// Which instrumentation shape an `if` gets, once its roles are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfPattern {
    /// Neither arm is part of an elsif chain, and there's a real else-arm
    /// to pair against: a `v_branch` pair when both arms have line
    /// coverage on (the caller still has to check that at runtime — this
    /// pattern only says the *shape* qualifies for branch pairing).
    BranchPair,
    /// `first_elsif` or `cont_elsif`: a single `v_line/"elsif"` into the
    /// then-arm; the else-arm (the nested if) instruments itself.
    Elsif,
    /// `final_elsif`, or a lopsided if with no else-arm at all: up to two
    /// independent `v_line` half-blocks.
    HalfBlocks,
}

impl ElsifRoles {
    pub fn pattern(&self) -> IfPattern {
        if self.first_elsif || self.cont_elsif {
            IfPattern::Elsif
        } else if !self.final_elsif && self.has_else {
            IfPattern::BranchPair
        } else {
            IfPattern::HalfBlocks
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_if_else_is_a_branch_pair() {
        let roles = ElsifRoles::classify(false, false, true);
        assert_eq!(roles.pattern(), IfPattern::BranchPair);
    }

    #[test]
    fn if_with_no_else_is_half_blocks() {
        let roles = ElsifRoles::classify(false, false, false);
        assert!(!roles.has_else);
        assert_eq!(roles.pattern(), IfPattern::HalfBlocks);
    }

    #[test]
    fn first_elsif_in_a_chain_is_elsif_pattern() {
        let roles = ElsifRoles::classify(true, false, true);
        assert!(roles.first_elsif);
        assert!(!roles.cont_elsif);
        assert_eq!(roles.pattern(), IfPattern::Elsif);
    }

    #[test]
    fn continuation_elsif_is_elsif_pattern() {
        let roles = ElsifRoles::classify(true, true, true);
        assert!(roles.cont_elsif);
        assert_eq!(roles.pattern(), IfPattern::Elsif);
    }

    #[test]
    fn terminal_else_of_a_chain_is_half_blocks() {
        let roles = ElsifRoles::classify(false, true, true);
        assert!(roles.final_elsif);
        assert_eq!(roles.pattern(), IfPattern::HalfBlocks);
    }
}
