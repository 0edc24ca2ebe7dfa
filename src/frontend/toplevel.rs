use tracing::debug;

use crate::frontend::{
    ast::{Function, Prototype},
    lexer::Token,
    parser::{Parser, ParserError},
};

/// One complete construct at the outermost level of a program.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Definition(Function),
    Extern(Prototype),
    Expression(Function),
}

/// Drives a [`Parser`] over a whole program.
///
/// top ::= definition | external | expression | ';'
///
/// Each call to `next` parses one construct. When a construct fails to
/// parse, the offending token is skipped before the error is handed out,
/// so iteration can simply carry on.
pub struct TopLevelItems<'p, 't, I> {
    parser: &'p mut Parser<'t, I>,
}

impl<'p, 't, I> TopLevelItems<'p, 't, I>
where
    I: Iterator<Item = u8>,
{
    pub fn new(parser: &'p mut Parser<'t, I>) -> Self {
        Self { parser }
    }

    fn recover<T>(&mut self, result: Result<T, ParserError>) -> Result<T, ParserError> {
        if let Err(err) = &result {
            // Skip token for error recovery
            debug!(%err, skipped = %self.parser.current(), "recovering from syntax error");
            self.parser.advance();
        }
        result
    }
}

impl<'p, 't, I> Iterator for TopLevelItems<'p, 't, I>
where
    I: Iterator<Item = u8>,
{
    type Item = Result<TopLevel, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let result = match self.parser.current() {
                Token::EndOfInput => return None,

                // Eat semicolons and move on
                Token::Char(b';') => {
                    self.parser.advance();
                    continue;
                }

                Token::FuncDef => self.parser.parse_definition().map(TopLevel::Definition),

                Token::Extern => self.parser.parse_extern().map(TopLevel::Extern),

                _ => self
                    .parser
                    .parse_top_level_expr()
                    .map(TopLevel::Expression),
            };

            return Some(self.recover(result));
        }
    }
}
