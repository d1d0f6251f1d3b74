//! h2o-trace: offline checker for H2O barrier protocol traces.
//!
//! Validates a recorded execution trace of the hydrogen/oxygen bonding
//! exercise against the protocol's rules:
//!
//! 1. **Syntax and order**: every line is `<seq> : <kind> <number> : <state>`
//!    and sequence numbers run 1, 2, 3, ...
//! 2. **Per-atom transitions**: each atom moves
//!    `started -> waiting|ready -> begin -> bonded -> finished`, one step at
//!    a time.
//! 3. **Bonding session**: one atom says `ready`, at most two hydrogens and
//!    one oxygen `begin`, nobody bonds before all three have begun, and
//!    nobody finishes before every molecule is bonded.
//! 4. **Completion**: at the end of the trace every atom has finished.
//!
//! The first broken rule ends the check and is returned as an
//! [`Error::Violation`] naming the row and the reason.
//!
//! # Quick Start
//!
//! ```no_run
//! use h2o_trace::{check_trace_file, CheckerConfig};
//!
//! let config = CheckerConfig::builder()
//!     .molecules(2)
//!     .trace_path("h2o.out")
//!     .build()?;
//!
//! match check_trace_file(&config) {
//!     Ok(summary) => println!("{} records ok", summary.records),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # Ok::<(), h2o_trace::ConfigError>(())
//! ```

pub mod atom;
pub mod checker;
pub mod config;
pub mod error;
pub mod record;
pub mod report;
pub mod session;
pub mod state;
pub mod transition;

// Re-export core types for convenience
pub use atom::{AtomId, AtomKind, AtomState};
pub use checker::{
    check_trace_file, check_trace_reader, check_trace_str, CheckSummary, TraceChecker,
};
pub use config::{CheckerConfig, CheckerConfigBuilder, DEFAULT_TRACE_FILE};
pub use error::{CheckResult, ConfigError, Error, Violation};
pub use record::{parse_record, Record};
pub use report::CheckReport;
pub use session::BondingSession;
pub use state::StateTable;
pub use transition::{check_transition, expected_predecessor, Predecessor};
