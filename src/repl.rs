use std::io::{Read, Write};

use tracing::{error, info};

use kaleidoscope_syntax::frontend::{
    lexer::Lexer,
    parser::{Parser, ParserError},
    toplevel::{TopLevel, TopLevelItems},
};

use crate::{
    cli::{Cli, Emit},
    compile::dump_tokens,
    error::AppError,
};

// Reading stdin one byte at a time means a definition may span lines;
// nothing is parsed until the construct is complete.
pub fn ast_parser_driver(cli: &Cli) -> Result<(), AppError> {
    let table = cli.precedence_table()?;

    let stdin = std::io::stdin().lock();
    let bytes = stdin.bytes().map_while(|byte| {
        byte.map_err(|err| error!(%err, "failed to read from stdin"))
            .ok()
    });

    if cli.emit == Emit::Tokens {
        dump_tokens(Lexer::new(bytes));
        return Ok(());
    }

    info!(operators = table.len(), "starting interactive loop");

    // Priming the parser reads the first token
    prompt();
    let mut parser = Parser::new(Lexer::new(bytes), &table).with_max_depth(cli.max_depth);

    for item in TopLevelItems::new(&mut parser) {
        report(&item, cli.emit);
        prompt();
    }

    println!();
    Ok(())
}

fn prompt() {
    print!("ready> ");
    _ = std::io::stdout().flush();
}

/// Prints the outcome of one top-level construct, returns whether it
/// parsed.
pub fn report(item: &Result<TopLevel, ParserError>, emit: Emit) -> bool {
    let ast = match item {
        Ok(ast) => ast,
        Err(err) => {
            eprintln!("Error: {err}");
            return false;
        }
    };

    match ast {
        TopLevel::Definition(func) => println!("Parsed a function definition: {func}"),
        TopLevel::Extern(proto) => println!("Parsed an extern: extern {proto}"),
        TopLevel::Expression(func) => println!("Parsed a top-level expr: {func}"),
    }

    if emit == Emit::Tree {
        println!("{ast:#?}");
    }

    true
}
