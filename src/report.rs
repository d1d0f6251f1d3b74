//! Machine-readable verdicts.

use crate::checker::CheckSummary;
use crate::error::{CheckResult, Error};
use serde::Serialize;

/// Verdict of a check, serializable as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum CheckReport {
    Accepted {
        records: usize,
        molecules: u32,
    },
    Rejected {
        #[serde(skip_serializing_if = "Option::is_none")]
        row: Option<usize>,
        category: &'static str,
        reason: String,
    },
}

impl CheckReport {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CheckReport::Accepted { .. })
    }

    pub fn to_json(&self) -> CheckResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&CheckResult<CheckSummary>> for CheckReport {
    fn from(result: &CheckResult<CheckSummary>) -> Self {
        match result {
            Ok(summary) => CheckReport::Accepted {
                records: summary.records,
                molecules: summary.molecules,
            },
            Err(err) => CheckReport::from(err),
        }
    }
}

impl From<&Error> for CheckReport {
    fn from(err: &Error) -> Self {
        let (category, reason) = match err {
            Error::Violation { violation, .. } => (violation.category(), violation.to_string()),
            Error::Config(e) => ("config", e.to_string()),
            Error::TraceNotFound(_) => ("input", err.to_string()),
            _ => ("io", err.to_string()),
        };
        CheckReport::Rejected {
            row: err.row(),
            category,
            reason,
        }
    }
}
