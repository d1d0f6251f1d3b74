//! Single-pass trace checker.
//!
//! Records are checked strictly in order. For each one the checker
//! verifies, in this order: sequence number, atom range, per-atom
//! transition, bonding session. Only then is the new state committed. The
//! first failure ends the pass; nothing after it is looked at.
//!
//! # Example
//!
//! ```
//! use h2o_trace::{check_trace_str, Violation};
//!
//! let trace = "\
//! 1 : H 1 : started
//! 2 : H 2 : started
//! 3 : O 1 : started
//! 4 : H 1 : waiting
//! 5 : H 2 : ready
//! 6 : H 1 : begin
//! 7 : H 2 : begin
//! 8 : O 1 : begin
//! 9 : H 1 : bonded
//! 10 : H 2 : bonded
//! 11 : O 1 : bonded
//! 12 : H 1 : finished
//! 13 : H 2 : finished
//! 14 : O 1 : finished
//! ";
//! let summary = check_trace_str(1, trace).unwrap();
//! assert_eq!(summary.records, 14);
//!
//! let err = check_trace_str(1, "1 : H 1 : begin").unwrap_err();
//! assert_eq!(err.row(), Some(1));
//! assert!(matches!(err.violation(), Some(Violation::IllegalTransition { .. })));
//! ```

use crate::atom::{AtomId, AtomState};
use crate::config::CheckerConfig;
use crate::error::{CheckResult, ConfigError, Error, Violation};
use crate::record::{parse_record, Record};
use crate::session::BondingSession;
use crate::state::StateTable;
use crate::transition::check_transition;
use serde::Serialize;
use std::io::{BufRead, ErrorKind};
use tracing::{debug, info};

/// Outcome of a fully accepted trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[must_use = "check summary should be inspected or discarded explicitly"]
pub struct CheckSummary {
    /// Number of records checked.
    pub records: usize,
    /// Number of molecules completed, equal to the configured count.
    pub molecules: u32,
}

/// Incremental checker for one trace.
#[derive(Debug, Clone)]
pub struct TraceChecker {
    molecules: u32,
    table: StateTable,
    session: BondingSession,
    next_row: usize,
}

impl TraceChecker {
    pub fn new(molecules: u32) -> Result<Self, ConfigError> {
        if molecules == 0 {
            return Err(ConfigError::NoMolecules);
        }
        Ok(Self {
            molecules,
            table: StateTable::new(molecules),
            session: BondingSession::new(),
            next_row: 1,
        })
    }

    pub fn molecules(&self) -> u32 {
        self.molecules
    }

    /// Number of records accepted so far.
    pub fn records_checked(&self) -> usize {
        self.next_row - 1
    }

    /// Current state of `atom`, or `None` if it does not exist.
    pub fn state_of(&self, atom: AtomId) -> Option<AtomState> {
        self.table.get(atom).ok()
    }

    pub fn session(&self) -> &BondingSession {
        &self.session
    }

    /// Parse and check one trace line.
    pub fn check_line(&mut self, line: &str) -> CheckResult<()> {
        let record = parse_record(line).map_err(|v| v.at(self.next_row))?;
        self.check_record(record)
    }

    /// Check one already-parsed record and commit it.
    pub fn check_record(&mut self, record: Record) -> CheckResult<()> {
        let row = self.next_row;
        self.apply(&record).map_err(|v| v.at(row))?;

        debug!(
            row,
            atom = %record.atom,
            state = %record.state,
            hydrogen_bonding = self.session.hydrogen_bonding(),
            oxygen_bonding = self.session.oxygen_bonding(),
            "Record accepted"
        );

        self.next_row += 1;
        Ok(())
    }

    fn apply(&mut self, record: &Record) -> Result<(), Violation> {
        if record.sequence != self.next_row {
            return Err(Violation::SequenceMismatch {
                expected: self.next_row,
                found: record.sequence,
            });
        }

        let current = self.table.get(record.atom)?;
        check_transition(record.atom, current, record.state)?;
        self.session.admit(record, self.molecules)?;
        self.table.set(record.atom, record.state)
    }

    /// End the pass: every atom must have finished.
    pub fn finish(self) -> CheckResult<CheckSummary> {
        if let Some(atom) = self.table.first_not_in(AtomState::Finished) {
            return Err(Violation::AtomNotFinished { atom }.at(self.next_row));
        }

        let summary = CheckSummary {
            records: self.records_checked(),
            molecules: self.session.molecules_completed(),
        };
        info!(
            records = summary.records,
            molecules = summary.molecules,
            "Trace accepted"
        );
        Ok(summary)
    }
}

/// Check every line from `reader`, then run the end-of-trace sweep.
///
/// A line that is not valid UTF-8 is a malformed record at its row; only
/// failures of the reader itself surface as [`Error::Io`].
pub fn check_trace_reader<R: BufRead>(
    molecules: u32,
    mut reader: R,
) -> CheckResult<CheckSummary> {
    let mut checker = TraceChecker::new(molecules)?;
    info!(molecules, "Checking trace");

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = std::str::from_utf8(&buf).map_err(|_| {
            Violation::MalformedRecord {
                reason: "line is not valid UTF-8".into(),
            }
            .at(checker.next_row)
        })?;
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        checker.check_line(line)?;
    }

    checker.finish()
}

/// Check an in-memory trace.
pub fn check_trace_str(molecules: u32, trace: &str) -> CheckResult<CheckSummary> {
    check_trace_reader(molecules, trace.as_bytes())
}

/// Check the trace file named by `config`.
pub fn check_trace_file(config: &CheckerConfig) -> CheckResult<CheckSummary> {
    config.validate()?;

    let file = std::fs::File::open(&config.trace_path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::TraceNotFound(config.trace_path.clone()),
        _ => Error::Io(e),
    })?;

    info!(trace = %config.trace_path.display(), "Opened trace file");
    check_trace_reader(config.molecules, std::io::BufReader::new(file))
}
