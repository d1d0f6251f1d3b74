//! Core vocabulary of the H2O barrier protocol: atom kinds, atom states and
//! atom identities.
//!
//! Every atom moves forward through
//! `initial -> started -> (waiting | ready) -> begin -> bonded -> finished`.
//! Which successor is legal is decided by [`crate::transition`], whether the
//! shared bonding session allows it by [`crate::session`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of atom taking part in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomKind {
    Hydrogen,
    Oxygen,
}

impl AtomKind {
    /// The single character used for this kind in the trace format.
    pub fn symbol(self) -> char {
        match self {
            AtomKind::Hydrogen => 'H',
            AtomKind::Oxygen => 'O',
        }
    }

    /// Parse a trace kind character. Only `H` and `O` are accepted.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'H' => Some(AtomKind::Hydrogen),
            'O' => Some(AtomKind::Oxygen),
            _ => None,
        }
    }

    /// Capitalized name, used in end-of-trace diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            AtomKind::Hydrogen => "Hydrogen",
            AtomKind::Oxygen => "Oxygen",
        }
    }

    /// Number of atoms of this kind in one molecule.
    pub fn per_molecule(self) -> usize {
        match self {
            AtomKind::Hydrogen => 2,
            AtomKind::Oxygen => 1,
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomKind::Hydrogen => f.write_str("hydrogen"),
            AtomKind::Oxygen => f.write_str("oxygen"),
        }
    }
}

/// Protocol state of a single atom.
///
/// `Initial` is the value of every slot before the first record; no trace
/// line can claim it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomState {
    #[default]
    Initial,
    Started,
    Waiting,
    Ready,
    Begin,
    Bonded,
    Finished,
}

impl AtomState {
    /// States a trace record may claim, in protocol order.
    pub const CLAIMABLE: [AtomState; 6] = [
        AtomState::Started,
        AtomState::Waiting,
        AtomState::Ready,
        AtomState::Begin,
        AtomState::Bonded,
        AtomState::Finished,
    ];

    /// The trace token for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            AtomState::Initial => "initial",
            AtomState::Started => "started",
            AtomState::Waiting => "waiting",
            AtomState::Ready => "ready",
            AtomState::Begin => "begin",
            AtomState::Bonded => "bonded",
            AtomState::Finished => "finished",
        }
    }

    /// Parse a state token. Exact and case-sensitive; `initial` is not a
    /// token a record may carry.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::CLAIMABLE.into_iter().find(|s| s.as_str() == token)
    }
}

impl fmt::Display for AtomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one atom: its kind plus a 0-based index within that kind.
///
/// The trace format numbers atoms from 1; [`AtomId::number`] gives that
/// external number back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AtomId {
    pub kind: AtomKind,
    pub index: usize,
}

impl AtomId {
    pub fn new(kind: AtomKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Build from the 1-based number used in traces.
    ///
    /// Returns `None` for `0`, which no atom carries.
    pub fn from_number(kind: AtomKind, number: usize) -> Option<Self> {
        number.checked_sub(1).map(|index| Self { kind, index })
    }

    /// Hydrogen with the given 1-based number; `None` for `0`.
    pub fn hydrogen(number: usize) -> Option<Self> {
        Self::from_number(AtomKind::Hydrogen, number)
    }

    /// Oxygen with the given 1-based number; `None` for `0`.
    pub fn oxygen(number: usize) -> Option<Self> {
        Self::from_number(AtomKind::Oxygen, number)
    }

    /// The 1-based number used in traces.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.symbol(), self.number())
    }
}

/// Hydrogen by trace number, for tests.
#[cfg(test)]
pub(crate) fn h(number: usize) -> AtomId {
    AtomId::new(AtomKind::Hydrogen, number - 1)
}

/// Oxygen by trace number, for tests.
#[cfg(test)]
pub(crate) fn o(number: usize) -> AtomId {
    AtomId::new(AtomKind::Oxygen, number - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_tokens_are_case_sensitive() {
        assert_eq!(AtomState::from_token("bonded"), Some(AtomState::Bonded));
        assert_eq!(AtomState::from_token("Bonded"), None);
        assert_eq!(AtomState::from_token("BONDED"), None);
    }

    #[test]
    fn initial_is_not_a_token() {
        assert_eq!(AtomState::from_token("initial"), None);
        assert_eq!(AtomState::from_token("prestarted"), None);
    }

    #[test]
    fn atom_id_numbering() {
        let id = h(3);
        assert_eq!(id.index, 2);
        assert_eq!(id.number(), 3);
        assert_eq!(id.to_string(), "H3");
        assert_eq!(AtomId::from_number(AtomKind::Oxygen, 0), None);
        assert_eq!(AtomId::hydrogen(0), None);
        assert_eq!(AtomId::oxygen(0), None);
        assert_eq!(AtomId::oxygen(2), Some(o(2)));
    }

    #[test]
    fn kind_symbols() {
        assert_eq!(AtomKind::from_symbol('H'), Some(AtomKind::Hydrogen));
        assert_eq!(AtomKind::from_symbol('O'), Some(AtomKind::Oxygen));
        assert_eq!(AtomKind::from_symbol('h'), None);
        assert_eq!(AtomKind::from_symbol('N'), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AtomState::Begin).unwrap();
        assert_eq!(json, "\"begin\"");
        let kind: AtomKind = serde_json::from_str("\"oxygen\"").unwrap();
        assert_eq!(kind, AtomKind::Oxygen);
    }
}
