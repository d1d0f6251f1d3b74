//! Typed errors for h2o-trace.
//!
//! Components report a [`Violation`] to their caller; only the checker
//! attaches the row it happened on, and only the binary renders it.

use crate::atom::{AtomId, AtomState};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for h2o-trace operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid checker configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Trace source could not be opened.
    #[error("No trace file found: {0}")]
    TraceNotFound(PathBuf),

    /// The trace broke a protocol rule on the given row.
    #[error("Row {row}: {violation}")]
    Violation { row: usize, violation: Violation },

    /// IO error while reading the trace.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The protocol violation carried by this error, if any.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Error::Violation { violation, .. } => Some(violation),
            _ => None,
        }
    }

    /// The 1-based row the error was raised on, if it came from the trace.
    pub fn row(&self) -> Option<usize> {
        match self {
            Error::Violation { row, .. } => Some(*row),
            _ => None,
        }
    }
}

/// Error in checker configuration, raised before any record is read.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Molecule count must be positive.
    #[error("Number of created molecules must be a positive integer")]
    NoMolecules,

    /// Required builder field not set.
    #[error("{builder}: missing required field '{field}'")]
    MissingRequiredField {
        builder: &'static str,
        field: &'static str,
    },
}

/// A single broken rule, without position information.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Violation {
    /// Line does not match `<seq> : <kind> <index> : <state>`.
    #[error("Row cannot be converted: {reason}")]
    MalformedRecord { reason: String },

    /// State token is not one of the six known states.
    #[error("Invalid state: {0}")]
    UnknownStateToken(String),

    /// Declared sequence number differs from the running row counter.
    #[error("Not matching row, number \"{found}\" found (expected {expected})")]
    SequenceMismatch { expected: usize, found: usize },

    /// Atom index outside the range allowed by the molecule count.
    #[error("Atom {atom} does not exist, {kind} atoms are numbered 1..={limit}", kind = .atom.kind)]
    AtomIndexOutOfRange { atom: AtomId, limit: usize },

    /// Claimed state is not a legal successor of the atom's current state.
    #[error("Atom {atom} cannot convert from state {from} to state {to}")]
    IllegalTransition {
        atom: AtomId,
        from: AtomState,
        to: AtomState,
    },

    /// An atom started waiting while a molecule is being bonded.
    #[error("Atom {atom} cannot move to waiting while molecule is being bonded")]
    SessionBusy { atom: AtomId },

    /// A second atom announced ready before the session completed.
    #[error("Atom {atom} cannot be ready if other atom is ready or bonding is in progress")]
    ReadyConflict { atom: AtomId },

    /// Too many atoms of one kind joined the bonding session.
    #[error("Atom {atom} cannot join bonding, {active} {kind} atom(s) already bonding", kind = .atom.kind)]
    CapacityExceeded { atom: AtomId, active: u32 },

    /// An atom began bonding without a ready handshake.
    #[error("Atom {atom} cannot join bonding, no atom has said 'ready'")]
    NoReadyHandshake { atom: AtomId },

    /// An atom bonded before two hydrogens and one oxygen were bonding.
    #[error("Atom {atom} cannot bond just yet")]
    PrematureBond { atom: AtomId },

    /// An atom finished before every molecule was completed.
    #[error("Atom {atom} cannot finish before all molecules are done, molecules done so far: {completed}/{required}")]
    IncompleteCohort {
        atom: AtomId,
        completed: u32,
        required: u32,
    },

    /// An atom never reached `finished` by the end of the trace.
    #[error("{kind} atom #{index} is not finished", kind = .atom.kind.name(), index = .atom.number())]
    AtomNotFinished { atom: AtomId },
}

impl Violation {
    /// Taxonomy bucket of this violation.
    pub fn category(&self) -> &'static str {
        match self {
            Violation::MalformedRecord { .. } | Violation::UnknownStateToken(_) => "parse",
            Violation::SequenceMismatch { .. } => "sequence",
            Violation::AtomIndexOutOfRange { .. } | Violation::IllegalTransition { .. } => {
                "transition"
            }
            Violation::SessionBusy { .. }
            | Violation::ReadyConflict { .. }
            | Violation::CapacityExceeded { .. }
            | Violation::NoReadyHandshake { .. }
            | Violation::PrematureBond { .. }
            | Violation::IncompleteCohort { .. } => "session",
            Violation::AtomNotFinished { .. } => "completion",
        }
    }

    /// Attach the row this violation was raised on.
    pub(crate) fn at(self, row: usize) -> Error {
        Error::Violation {
            row,
            violation: self,
        }
    }
}

/// Result type alias using h2o-trace's Error.
pub type CheckResult<T> = std::result::Result<T, Error>;
