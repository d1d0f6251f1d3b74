//! The shared bonding session.
//!
//! Ready, begin and bonded form a single gate shared by every atom: one atom
//! announces `ready`, two hydrogens and one oxygen `begin`, and once all
//! three are bonding each of them may report `bonded`. The session closes
//! when the last of them has bonded. Only then may another atom wait or
//! announce ready.

use crate::atom::{AtomKind, AtomState};
use crate::error::Violation;
use crate::record::Record;
use serde::Serialize;
use tracing::debug;

const HYDROGEN_CAPACITY: u32 = 2;
const OXYGEN_CAPACITY: u32 = 1;

/// Counters and flags of the live bonding session.
///
/// Owned by the checker and handed to [`BondingSession::admit`] for every
/// record that passed the per-atom transition check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BondingSession {
    hydrogen_bonding: u32,
    oxygen_bonding: u32,
    ready: bool,
    awaiting_bond: bool,
    molecules_completed: u32,
}

impl BondingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hydrogen_bonding(&self) -> u32 {
        self.hydrogen_bonding
    }

    pub fn oxygen_bonding(&self) -> u32 {
        self.oxygen_bonding
    }

    /// Whether an atom has announced ready for the current session.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether two hydrogens and one oxygen have all begun bonding.
    pub fn awaiting_bond(&self) -> bool {
        self.awaiting_bond
    }

    pub fn molecules_completed(&self) -> u32 {
        self.molecules_completed
    }

    fn busy(&self) -> bool {
        self.hydrogen_bonding + self.oxygen_bonding > 0 || self.ready
    }

    fn bonding(&self, kind: AtomKind) -> u32 {
        match kind {
            AtomKind::Hydrogen => self.hydrogen_bonding,
            AtomKind::Oxygen => self.oxygen_bonding,
        }
    }

    fn bonding_mut(&mut self, kind: AtomKind) -> &mut u32 {
        match kind {
            AtomKind::Hydrogen => &mut self.hydrogen_bonding,
            AtomKind::Oxygen => &mut self.oxygen_bonding,
        }
    }

    /// Apply `record` to the session.
    ///
    /// All checks run before the session is touched, so on error it is left
    /// exactly as it was.
    pub fn admit(&mut self, record: &Record, molecules: u32) -> Result<(), Violation> {
        let atom = record.atom;

        match record.state {
            AtomState::Initial | AtomState::Started => {}

            AtomState::Waiting => {
                if self.busy() {
                    return Err(Violation::SessionBusy { atom });
                }
            }

            AtomState::Ready => {
                if self.busy() {
                    return Err(Violation::ReadyConflict { atom });
                }
                self.ready = true;
            }

            AtomState::Begin => {
                let active = self.bonding(atom.kind);
                let capacity = match atom.kind {
                    AtomKind::Hydrogen => HYDROGEN_CAPACITY,
                    AtomKind::Oxygen => OXYGEN_CAPACITY,
                };
                if active >= capacity {
                    return Err(Violation::CapacityExceeded { atom, active });
                }
                if !self.ready {
                    return Err(Violation::NoReadyHandshake { atom });
                }

                *self.bonding_mut(atom.kind) += 1;
                if self.hydrogen_bonding == HYDROGEN_CAPACITY
                    && self.oxygen_bonding == OXYGEN_CAPACITY
                {
                    self.awaiting_bond = true;
                }
            }

            AtomState::Bonded => {
                if !self.awaiting_bond {
                    return Err(Violation::PrematureBond { atom });
                }

                let count = self.bonding_mut(atom.kind);
                *count = count.saturating_sub(1);
                if self.hydrogen_bonding == 0 && self.oxygen_bonding == 0 {
                    self.awaiting_bond = false;
                    self.ready = false;
                    self.molecules_completed += 1;
                    debug!(
                        completed = self.molecules_completed,
                        "Molecule bonded"
                    );
                }
            }

            AtomState::Finished => {
                if self.molecules_completed < molecules {
                    return Err(Violation::IncompleteCohort {
                        atom,
                        completed: self.molecules_completed,
                        required: molecules,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{h, o, AtomId};

    fn rec(atom: AtomId, state: AtomState) -> Record {
        Record::new(1, atom, state)
    }

    /// Session with a ready handshake and the given atoms already bonding.
    fn session_with(begun: &[AtomId]) -> BondingSession {
        let mut session = BondingSession::new();
        session.admit(&rec(h(1), AtomState::Ready), 1).unwrap();
        for &atom in begun {
            session.admit(&rec(atom, AtomState::Begin), 1).unwrap();
        }
        session
    }

    #[test]
    fn full_session_completes_molecule() {
        let mut session = session_with(&[h(1), h(2), o(1)]);
        assert!(session.awaiting_bond());

        for atom in [o(1), h(2), h(1)] {
            session.admit(&rec(atom, AtomState::Bonded), 1).unwrap();
        }

        assert_eq!(session.molecules_completed(), 1);
        assert!(!session.is_ready());
        assert!(!session.awaiting_bond());
        assert_eq!(session.hydrogen_bonding(), 0);
        assert_eq!(session.oxygen_bonding(), 0);
    }

    #[test]
    fn waiting_rejected_while_ready_pending() {
        let mut session = session_with(&[]);
        assert_eq!(
            session.admit(&rec(o(1), AtomState::Waiting), 1),
            Err(Violation::SessionBusy { atom: o(1) })
        );
    }

    #[test]
    fn waiting_rejected_while_bonding() {
        let mut session = session_with(&[h(1)]);
        session.ready = false;
        assert!(matches!(
            session.admit(&rec(h(3), AtomState::Waiting), 2),
            Err(Violation::SessionBusy { .. })
        ));
    }

    #[test]
    fn second_ready_conflicts() {
        let mut session = session_with(&[]);
        assert_eq!(
            session.admit(&rec(h(2), AtomState::Ready), 1),
            Err(Violation::ReadyConflict { atom: h(2) })
        );
    }

    #[test]
    fn third_hydrogen_exceeds_capacity() {
        let mut session = session_with(&[h(1), h(2)]);
        let before = session.clone();
        assert_eq!(
            session.admit(&rec(h(3), AtomState::Begin), 2),
            Err(Violation::CapacityExceeded {
                atom: h(3),
                active: 2
            })
        );
        assert_eq!(session, before);
    }

    #[test]
    fn second_oxygen_exceeds_capacity() {
        let mut session = session_with(&[o(1)]);
        assert!(matches!(
            session.admit(&rec(o(2), AtomState::Begin), 2),
            Err(Violation::CapacityExceeded { active: 1, .. })
        ));
    }

    #[test]
    fn capacity_checked_before_handshake() {
        let mut session = session_with(&[o(1)]);
        session.ready = false;
        assert!(matches!(
            session.admit(&rec(o(2), AtomState::Begin), 2),
            Err(Violation::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn begin_requires_handshake() {
        let mut session = BondingSession::new();
        assert_eq!(
            session.admit(&rec(h(1), AtomState::Begin), 1),
            Err(Violation::NoReadyHandshake { atom: h(1) })
        );
        assert_eq!(session, BondingSession::new());
    }

    #[test]
    fn bond_before_full_session_is_premature() {
        let mut session = session_with(&[h(1), o(1)]);
        assert_eq!(
            session.admit(&rec(h(1), AtomState::Bonded), 1),
            Err(Violation::PrematureBond { atom: h(1) })
        );
    }

    #[test]
    fn finish_waits_for_cohort() {
        let mut session = BondingSession::new();
        assert_eq!(
            session.admit(&rec(o(1), AtomState::Finished), 2),
            Err(Violation::IncompleteCohort {
                atom: o(1),
                completed: 0,
                required: 2
            })
        );
    }

    #[test]
    fn started_is_unconstrained() {
        let mut session = session_with(&[h(1)]);
        let before = session.clone();
        session.admit(&rec(h(2), AtomState::Started), 1).unwrap();
        assert_eq!(session, before);
    }
}
