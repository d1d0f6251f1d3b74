//! Trace line parsing.
//!
//! A trace line has the form `<sequence> : <kind> <number> : <state>`, for
//! example `12 : H 3 : bonded`. Whitespace around the separators is
//! optional, and the atom number may follow the kind character directly
//! (`12:H3:bonded`). Anything after the state token is ignored.

use crate::atom::{AtomId, AtomKind, AtomState};
use crate::error::Violation;
use serde::Serialize;
use std::str::FromStr;

/// One parsed trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Declared 1-based sequence number of the line.
    pub sequence: usize,
    /// Atom performing the action.
    pub atom: AtomId,
    /// State the atom claims to have entered.
    pub state: AtomState,
}

impl Record {
    pub fn new(sequence: usize, atom: AtomId, state: AtomState) -> Self {
        Self {
            sequence,
            atom,
            state,
        }
    }
}

impl FromStr for Record {
    type Err = Violation;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        parse_record(line)
    }
}

/// Parse a single trace line.
///
/// Syntax is checked before the state token, so a line that is malformed
/// and carries an unknown token reports [`Violation::MalformedRecord`].
pub fn parse_record(line: &str) -> Result<Record, Violation> {
    let mut fields = line.splitn(3, ':');
    let (Some(sequence), Some(atom), Some(action)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed("expected 3 ':'-separated fields"));
    };

    let sequence = sequence
        .trim()
        .parse::<usize>()
        .map_err(|_| malformed(format!("invalid sequence number '{}'", sequence.trim())))?;

    let atom = parse_atom(atom.trim())?;

    let token = action
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("missing state"))?;

    let state = AtomState::from_token(token)
        .ok_or_else(|| Violation::UnknownStateToken(token.to_string()))?;

    Ok(Record {
        sequence,
        atom,
        state,
    })
}

fn parse_atom(field: &str) -> Result<AtomId, Violation> {
    let mut chars = field.chars();
    let symbol = chars.next().ok_or_else(|| malformed("missing atom"))?;
    let kind = AtomKind::from_symbol(symbol)
        .ok_or_else(|| malformed(format!("unknown atom type '{symbol}'")))?;

    let number = chars.as_str().trim_start();
    let number = number
        .parse::<usize>()
        .map_err(|_| malformed(format!("invalid atom number '{number}'")))?;

    AtomId::from_number(kind, number).ok_or_else(|| malformed("atom numbers start at 1"))
}

fn malformed(reason: impl Into<String>) -> Violation {
    Violation::MalformedRecord {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{h, o};

    fn is_malformed(line: &str) -> bool {
        matches!(parse_record(line), Err(Violation::MalformedRecord { .. }))
    }

    #[test]
    fn parses_spaced_format() {
        let record = parse_record("1 : H 1 : started").unwrap();
        assert_eq!(record, Record::new(1, h(1), AtomState::Started));
    }

    #[test]
    fn parses_compact_format() {
        let record: Record = "14:O1:finished".parse().unwrap();
        assert_eq!(record, Record::new(14, o(1), AtomState::Finished));
    }

    #[test]
    fn ignores_trailing_text_after_state() {
        let record = parse_record("3 : O 2 : ready now\n").unwrap();
        assert_eq!(record.state, AtomState::Ready);
        assert_eq!(record.atom, o(2));
    }

    #[test]
    fn rejects_unknown_state() {
        assert_eq!(
            parse_record("1 : H 1 : Started"),
            Err(Violation::UnknownStateToken("Started".into()))
        );
        assert_eq!(
            parse_record("1 : H 1 : sleeping"),
            Err(Violation::UnknownStateToken("sleeping".into()))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(is_malformed(""));
        assert!(is_malformed("1 : H 1"));
        assert!(is_malformed("x : H 1 : started"));
        assert!(is_malformed("1 : H x : started"));
        assert!(is_malformed("1 : H 1 :"));
        assert!(is_malformed("1 :  : started"));
        assert!(is_malformed("-1 : H 1 : started"));
    }

    #[test]
    fn unknown_kind_is_malformed() {
        assert!(is_malformed("1 : N 1 : started"));
        assert!(is_malformed("1 : h 1 : started"));
    }

    #[test]
    fn atom_zero_is_malformed() {
        assert!(is_malformed("1 : O 0 : started"));
    }

    #[test]
    fn syntax_checked_before_state_token() {
        assert!(is_malformed("1 : X 1 : sleeping"));
    }
}
