//! Front end for the Kaleidoscope toy language: a lexer, a configurable
//! operator precedence table and a recursive descent parser producing an
//! AST of function definitions, `extern` declarations and top-level
//! expressions.

#[macro_use]
extern crate lazy_static;

pub mod frontend;
