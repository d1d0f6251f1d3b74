//! Per-atom state storage.

use crate::atom::{AtomId, AtomKind, AtomState};
use crate::error::Violation;
use std::collections::BTreeMap;

/// Current state of every atom for a fixed molecule count.
///
/// Only atoms that have left [`AtomState::Initial`] take up an entry, so the
/// table grows with the trace, not with the molecule count. Lookups outside
/// the kind's range fail with [`Violation::AtomIndexOutOfRange`]; no
/// transition rules are applied here.
#[derive(Debug, Clone)]
pub struct StateTable {
    molecules: u32,
    states: BTreeMap<AtomId, AtomState>,
}

impl StateTable {
    pub fn new(molecules: u32) -> Self {
        Self {
            molecules,
            states: BTreeMap::new(),
        }
    }

    /// Number of atoms of `kind`.
    pub fn limit(&self, kind: AtomKind) -> usize {
        (self.molecules as usize).saturating_mul(kind.per_molecule())
    }

    pub fn get(&self, atom: AtomId) -> Result<AtomState, Violation> {
        self.check_range(atom)?;
        Ok(self.states.get(&atom).copied().unwrap_or_default())
    }

    pub fn set(&mut self, atom: AtomId, state: AtomState) -> Result<(), Violation> {
        self.check_range(atom)?;
        if state == AtomState::Initial {
            self.states.remove(&atom);
        } else {
            self.states.insert(atom, state);
        }
        Ok(())
    }

    /// Every atom id, grouped per molecule: two hydrogens, then the oxygen.
    ///
    /// Ids are produced on demand.
    pub fn atoms(&self) -> impl Iterator<Item = AtomId> {
        (0..self.molecules as usize).flat_map(|j| {
            [
                AtomId::new(AtomKind::Hydrogen, 2 * j),
                AtomId::new(AtomKind::Hydrogen, 2 * j + 1),
                AtomId::new(AtomKind::Oxygen, j),
            ]
        })
    }

    /// First atom, in [`StateTable::atoms`] order, that is not in `state`.
    pub fn first_not_in(&self, state: AtomState) -> Option<AtomId> {
        self.atoms()
            .find(|&atom| self.get(atom).map_or(true, |s| s != state))
    }

    fn check_range(&self, atom: AtomId) -> Result<(), Violation> {
        let limit = self.limit(atom.kind);
        if atom.index < limit {
            Ok(())
        } else {
            Err(Violation::AtomIndexOutOfRange { atom, limit })
        }
    }
}
