//! Per-atom transition legality.
//!
//! Each claimed state has exactly one required predecessor, except `begin`,
//! which may follow either `waiting` or `ready`. No record may claim
//! `initial`.

use crate::atom::{AtomId, AtomState};
use crate::error::Violation;

/// What an atom's current state must be for a claimed state to be legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predecessor {
    /// A single fixed predecessor.
    Exactly(AtomState),
    /// Any of several predecessors.
    OneOf(&'static [AtomState]),
    /// No current state leads here.
    Unreachable,
}

impl Predecessor {
    pub fn admits(self, current: AtomState) -> bool {
        match self {
            Predecessor::Exactly(expected) => current == expected,
            Predecessor::OneOf(allowed) => allowed.contains(&current),
            Predecessor::Unreachable => false,
        }
    }
}

pub fn expected_predecessor(claimed: AtomState) -> Predecessor {
    match claimed {
        AtomState::Initial => Predecessor::Unreachable,
        AtomState::Started => Predecessor::Exactly(AtomState::Initial),
        AtomState::Waiting | AtomState::Ready => Predecessor::Exactly(AtomState::Started),
        AtomState::Begin => Predecessor::OneOf(&[AtomState::Waiting, AtomState::Ready]),
        AtomState::Bonded => Predecessor::Exactly(AtomState::Begin),
        AtomState::Finished => Predecessor::Exactly(AtomState::Bonded),
    }
}

/// Check that `atom` may move from `current` to `claimed`.
pub fn check_transition(
    atom: AtomId,
    current: AtomState,
    claimed: AtomState,
) -> Result<(), Violation> {
    if expected_predecessor(claimed).admits(current) {
        Ok(())
    } else {
        Err(Violation::IllegalTransition {
            atom,
            from: current,
            to: claimed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{h, o};
    use AtomState::*;

    const ALL: [AtomState; 7] = [Initial, Started, Waiting, Ready, Begin, Bonded, Finished];

    fn legal_from(claimed: AtomState) -> Vec<AtomState> {
        ALL.into_iter()
            .filter(|&current| expected_predecessor(claimed).admits(current))
            .collect()
    }

    #[test]
    fn single_predecessors() {
        assert_eq!(legal_from(Started), [Initial]);
        assert_eq!(legal_from(Waiting), [Started]);
        assert_eq!(legal_from(Ready), [Started]);
        assert_eq!(legal_from(Bonded), [Begin]);
        assert_eq!(legal_from(Finished), [Bonded]);
    }

    #[test]
    fn begin_follows_waiting_or_ready() {
        assert_eq!(legal_from(Begin), [Waiting, Ready]);
        let atom = h(1);
        assert!(check_transition(atom, Waiting, Begin).is_ok());
        assert!(check_transition(atom, Ready, Begin).is_ok());
        assert!(check_transition(atom, Started, Begin).is_err());
    }

    #[test]
    fn initial_is_never_claimable() {
        assert!(legal_from(Initial).is_empty());
    }

    #[test]
    fn illegal_transition_reports_states() {
        let atom = o(1);
        assert_eq!(
            check_transition(atom, Begin, Begin),
            Err(Violation::IllegalTransition {
                atom,
                from: Begin,
                to: Begin
            })
        );
    }
}
