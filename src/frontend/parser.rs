use thiserror::Error;
use tracing::trace;

use crate::frontend::{
    ast::{Expr, Function, Prototype},
    lexer::{Lexer, Token},
    precedence::PrecedenceTable,
};

/// How deeply expressions may nest before parsing gives up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

// Everything that can go wrong while parsing. All of these are plain
// syntax errors; the parser stays usable after any of them.
#[derive(Error, PartialEq, Debug)]
pub enum ParserError {
    #[error("expected ')'")]
    ExpectedCloseParen,

    #[error("expected ')' or ',' in argument list")]
    ExpectedArgDelimiter,

    #[error("unknown token when expecting an expression: {0}")]
    UnknownToken(Token),

    #[error("Expected function name in prototype")]
    ExpectedFunctionName,

    #[error("Expected '(' in function prototype")]
    ExpectedProtoOpenParen,

    #[error("expected ')' in prototype")]
    ExpectedProtoCloseParen,

    #[error("expression nested more than {0} levels deep")]
    NestingTooDeep(usize),
}

// Small alias for fallible returns of parsing expressions
type ExprParseResult = Result<Expr, ParserError>;

/// Recursive descent parser with one token of lookahead.
///
/// The token under consideration sits in the current-token slot; every
/// production starts there and leaves the slot on the first token past
/// what it consumed. Precedences are only ever read.
pub struct Parser<'t, I> {
    lexer: Lexer<I>,
    cur_tok: Token,
    precedence: &'t PrecedenceTable,
    max_depth: usize,
    depth: usize,
}

impl<'t, I> Parser<'t, I>
where
    I: Iterator<Item = u8>,
{
    /// Builds a parser and primes the current-token slot with the first
    /// token of the input.
    pub fn new(lexer: Lexer<I>, precedence: &'t PrecedenceTable) -> Self {
        let mut parser = Self {
            lexer,
            cur_tok: Token::EndOfInput,
            precedence,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        };
        parser.advance();
        parser
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn current(&self) -> &Token {
        &self.cur_tok
    }

    /// Replaces the current token with the next one from the lexer.
    pub fn advance(&mut self) -> &Token {
        self.cur_tok = self.lexer.next_token();
        &self.cur_tok
    }

    /// definition ::= 'def' prototype expression
    pub fn parse_definition(&mut self) -> Result<Function, ParserError> {
        // swallow the def keyword
        self.advance();

        let proto = self.parse_prototype()?;
        let body = self.parse_expression()?;

        trace!(name = %proto.name, "parsed definition");
        Ok(Function { proto, body })
    }

    /// external ::= 'extern' prototype
    pub fn parse_extern(&mut self) -> Result<Prototype, ParserError> {
        self.advance();
        self.parse_prototype()
    }

    /// toplevelexpr ::= expression
    pub fn parse_top_level_expr(&mut self) -> Result<Function, ParserError> {
        let body = self.parse_expression()?;

        Ok(Function {
            proto: Prototype::anonymous(),
            body,
        })
    }

    /// prototype
    ///   ::= id '(' id* ')'
    pub fn parse_prototype(&mut self) -> Result<Prototype, ParserError> {
        let Token::Identifier(name) = &self.cur_tok else {
            return Err(ParserError::ExpectedFunctionName);
        };
        let name = name.clone();

        if !self.advance().is_char(b'(') {
            return Err(ParserError::ExpectedProtoOpenParen);
        }

        // Parameters are separated by whitespace alone
        let mut args = vec![];
        while let Token::Identifier(arg) = self.advance() {
            args.push(arg.clone());
        }

        if !self.cur_tok.is_char(b')') {
            return Err(ParserError::ExpectedProtoCloseParen);
        }
        self.advance();

        Ok(Prototype::new(name, args))
    }

    /// expression
    ///   ::= primary binoprhs
    pub fn parse_expression(&mut self) -> ExprParseResult {
        self.descend()?;
        let result = self
            .parse_primary()
            .and_then(|lhs| self.parse_binop_rhs(0, lhs));
        self.depth -= 1;

        result
    }

    // Every nesting route (parentheses, call arguments, tighter operator
    // runs) passes through here so the recursion stays bounded.
    fn descend(&mut self) -> Result<(), ParserError> {
        if self.depth >= self.max_depth {
            return Err(ParserError::NestingTooDeep(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    /// primary
    ///   ::= identifierexpr
    ///   ::= numberexpr
    ///   ::= parenexpr
    fn parse_primary(&mut self) -> ExprParseResult {
        match &self.cur_tok {
            Token::Identifier(_) => self.parse_identifier_expr(),

            Token::Number(_) => self.parse_number_expr(),

            Token::Char(b'(') => self.parse_paren_expr(),

            unexpected => Err(ParserError::UnknownToken(unexpected.clone())),
        }
    }

    /// numberexpr ::= number
    fn parse_number_expr(&mut self) -> ExprParseResult {
        let expr = Expr::Number(self.lexer.num_val());
        self.advance();
        Ok(expr)
    }

    /// parenexpr ::= '(' expression ')'
    fn parse_paren_expr(&mut self) -> ExprParseResult {
        // Swallow the open parenthesis
        self.advance();

        let expr = self.parse_expression()?;

        if !self.cur_tok.is_char(b')') {
            return Err(ParserError::ExpectedCloseParen);
        }
        self.advance();

        Ok(expr)
    }

    /// identifierexpr
    ///   ::= identifier
    ///   ::= identifier '(' (expression (',' expression)*)? ')'
    fn parse_identifier_expr(&mut self) -> ExprParseResult {
        let name = self.lexer.identifier_str().to_string();

        // Variable Expression
        if !self.advance().is_char(b'(') {
            return Ok(Expr::Variable(name));
        }

        // Call Expression
        self.advance();
        let mut args = vec![];

        if !self.cur_tok.is_char(b')') {
            loop {
                args.push(self.parse_expression()?);

                if self.cur_tok.is_char(b')') {
                    break;
                }

                if !self.cur_tok.is_char(b',') {
                    return Err(ParserError::ExpectedArgDelimiter);
                }
                self.advance();
            }
        }

        // Swallow the closing parenthesis
        self.advance();

        Ok(Expr::Call { callee: name, args })
    }

    /// binoprhs
    ///   ::= (binop primary)*
    ///
    /// Folds operators into `lhs` for as long as they bind at least as
    /// tightly as `expr_prec`. A run of tighter operators following the
    /// right operand is folded into that operand first.
    fn parse_binop_rhs(&mut self, expr_prec: i32, mut lhs: Expr) -> ExprParseResult {
        loop {
            let tok_prec = self.precedence.token_precedence(&self.cur_tok);

            if tok_prec < expr_prec {
                return Ok(lhs);
            }

            let Token::Char(op) = self.cur_tok else {
                unreachable!("only character tokens carry a precedence");
            };
            self.advance();

            let mut rhs = self.parse_primary()?;

            let next_prec = self.precedence.token_precedence(&self.cur_tok);

            if tok_prec < next_prec {
                self.descend()?;
                let grouped = self.parse_binop_rhs(tok_prec + 1, rhs);
                self.depth -= 1;
                rhs = grouped?;
            }

            trace!(op = %char::from(op), "combined binary expression");
            lhs = Expr::binary(char::from(op), lhs, rhs);
        }
    }
}
