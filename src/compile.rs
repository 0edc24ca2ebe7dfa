use tracing::info;

use kaleidoscope_syntax::frontend::{
    lexer::{Lexer, Token},
    parser::Parser,
    toplevel::TopLevelItems,
};

use crate::{
    cli::{Cli, Emit},
    error::AppError,
    repl::report,
};

/// Parses a whole program, reporting every construct as it goes. Syntax
/// errors do not stop parsing, they are counted and turned into an error
/// once the input is exhausted.
pub fn compile_src(src_code: &[u8], cli: &Cli) -> Result<(), AppError> {
    let table = cli.precedence_table()?;
    let bytes = src_code.iter().copied();

    if cli.emit == Emit::Tokens {
        dump_tokens(Lexer::new(bytes));
        return Ok(());
    }

    let mut parser = Parser::new(Lexer::new(bytes), &table).with_max_depth(cli.max_depth);

    let (parsed, failed) = TopLevelItems::new(&mut parser).fold((0, 0), |(ok, err), item| {
        if report(&item, cli.emit) {
            (ok + 1, err)
        } else {
            (ok, err + 1)
        }
    });

    info!(parsed, failed, "finished parsing");

    match failed {
        0 => Ok(()),
        n => Err(AppError::Syntax(n)),
    }
}

pub fn dump_tokens<I>(lexer: Lexer<I>)
where
    I: Iterator<Item = u8>,
{
    for token in lexer {
        println!("{token}");
    }
}
