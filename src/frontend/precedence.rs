use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::frontend::lexer::Token;

// Starting configuration for every table built with `Default`. In the C++
// tutorial this lives in a global called "BinopPrecedence" and is filled
// in by main().
lazy_static! {
    static ref DEFAULT_PRECEDENCE: BTreeMap<u8, i32> = {
        let mut map = BTreeMap::new();
        map.insert(b'<', 10);
        map.insert(b'-', 20);
        map.insert(b'+', 20);
        map.insert(b'*', 40);
        map
    };
}

#[derive(Error, PartialEq, Debug)]
pub enum PrecedenceError {
    #[error("precedence for '{op}' must be positive, got {prec}")]
    NonPositive { op: char, prec: i32 },

    #[error("'{0}' cannot be used as a binary operator")]
    ReservedChar(char),

    #[error("expected OP=PRECEDENCE with a single-character operator, got {0:?}")]
    Malformed(String),
}

/// Binary operator precedences, higher binds tighter.
///
/// Operators missing from the table are not binary operators at all, which
/// the parser sees as a precedence of -1.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecedenceTable {
    ops: BTreeMap<u8, i32>,
}

impl PrecedenceTable {
    /// An empty table, no binary operators recognised.
    pub fn new() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// Registers `op`, overwriting any precedence it already had.
    pub fn insert(&mut self, op: u8, prec: i32) -> Result<(), PrecedenceError> {
        if !op.is_ascii()
            || op.is_ascii_alphanumeric()
            || op.is_ascii_whitespace()
            || matches!(op, b'.' | b'#' | b'(' | b')' | b',' | b';' | b'\x0b')
        {
            return Err(PrecedenceError::ReservedChar(char::from(op)));
        }

        if prec <= 0 {
            return Err(PrecedenceError::NonPositive {
                op: char::from(op),
                prec,
            });
        }

        debug!(op = %char::from(op), prec, "registered binary operator");
        self.ops.insert(op, prec);
        Ok(())
    }

    pub fn get(&self, op: u8) -> Option<i32> {
        self.ops.get(&op).copied()
    }

    // GetTokPrecedence in the tutorial
    pub fn token_precedence(&self, token: &Token) -> i32 {
        match token {
            Token::Char(op) => self.get(*op).unwrap_or(-1),
            _ => -1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, i32)> + '_ {
        self.ops.iter().map(|(op, prec)| (*op, *prec))
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self {
            ops: DEFAULT_PRECEDENCE.clone(),
        }
    }
}

/// One `OP=PRECEDENCE` entry, as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinopSpec {
    pub op: u8,
    pub prec: i32,
}

impl BinopSpec {
    pub fn apply(self, table: &mut PrecedenceTable) -> Result<(), PrecedenceError> {
        table.insert(self.op, self.prec)
    }
}

impl FromStr for BinopSpec {
    type Err = PrecedenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PrecedenceError::Malformed(s.to_string());

        // Split on the last '=' so that '=' itself can be registered
        let (op, prec) = s.rsplit_once('=').ok_or_else(malformed)?;

        let &[op] = op.as_bytes() else {
            return Err(malformed());
        };
        let prec = prec.trim().parse().map_err(|_| malformed())?;

        Ok(Self { op, prec })
    }
}
