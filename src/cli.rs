use std::path::PathBuf;

use clap::{
    builder::{OsStr, PossibleValue},
    Parser, ValueEnum,
};

use kaleidoscope_syntax::frontend::{
    parser::DEFAULT_MAX_DEPTH,
    precedence::{BinopSpec, PrecedenceError, PrecedenceTable},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// A positional file containing Kaleidoscope code to parse, if not given, starts interactive loop instead
    pub file: Option<PathBuf>,

    /// Registers a binary operator or changes its precedence, e.g. --binop '/=40' (repeatable)
    #[arg(long = "binop", value_name = "OP=PREC")]
    pub binops: Vec<BinopSpec>,

    /// Start from an empty operator table instead of the default '<', '-', '+' and '*'
    #[arg(long)]
    pub no_default_ops: bool,

    /// How deeply expressions may nest before they are rejected
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// What to print for every construct read
    #[arg(long, value_enum, default_value = Emit::Summary)]
    pub emit: Emit,
}

impl Cli {
    /// Operator table to parse with, the defaults plus any `--binop`
    /// entries applied in order.
    pub fn precedence_table(&self) -> Result<PrecedenceTable, PrecedenceError> {
        let mut table = if self.no_default_ops {
            PrecedenceTable::new()
        } else {
            PrecedenceTable::default()
        };

        for spec in &self.binops {
            spec.apply(&mut table)?;
        }

        Ok(table)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Emit {
    Summary,
    Tree,
    Tokens,
}

impl ValueEnum for Emit {
    fn value_variants<'a>() -> &'a [Self] {
        &[Emit::Summary, Emit::Tree, Emit::Tokens]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Emit::Summary => PossibleValue::new("summary").help("One line per parsed construct"),
            Emit::Tree => PossibleValue::new("tree").help("Also pretty-print every AST"),
            Emit::Tokens => PossibleValue::new("tokens").help("Print the token stream, don't parse"),
        })
    }
}

impl From<Emit> for OsStr {
    fn from(emit: Emit) -> OsStr {
        match emit {
            Emit::Summary => "summary".into(),
            Emit::Tree => "tree".into(),
            Emit::Tokens => "tokens".into(),
        }
    }
}
