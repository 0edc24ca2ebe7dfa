use std::io;
use std::path::PathBuf;

use thiserror::Error;

use kaleidoscope_syntax::frontend::precedence::PrecedenceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad operator configuration: {0}")]
    Precedence(#[from] PrecedenceError),

    #[error("{0} syntax error(s) reported")]
    Syntax(usize),
}
