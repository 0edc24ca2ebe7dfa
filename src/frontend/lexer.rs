use std::fmt;
use std::str::Bytes;

use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    EndOfInput,
    FuncDef,
    Extern,
    Identifier(String),
    Number(f64),
    // Anything else, operators and punctuation included, comes through
    // as the raw byte. Whether it means something is the parser's call.
    Char(u8),
}

impl Token {
    pub fn is_char(&self, c: u8) -> bool {
        matches!(self, Token::Char(tok) if *tok == c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::EndOfInput => write!(f, "end of input"),
            Token::FuncDef => write!(f, "'def'"),
            Token::Extern => write!(f, "'extern'"),
            Token::Identifier(name) => write!(f, "identifier '{name}'"),
            Token::Number(num) => write!(f, "number {num}"),
            Token::Char(c) => write!(f, "'{}'", char::from(*c)),
        }
    }
}

// C locale isspace(), vertical tab and form feed included
fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Parses the numeric prefix of a run of digits and dots the way C `strtod`
/// would: everything from the second `.` on is ignored, and a prefix that
/// holds no digits at all converts to zero.
pub(crate) fn parse_number_prefix(run: &str) -> f64 {
    let end = run
        .match_indices('.')
        .nth(1)
        .map_or(run.len(), |(idx, _)| idx);

    run[..end].parse().unwrap_or(0.0)
}

/// Pull-based tokenizer over an 8-bit character stream.
///
/// One character of lookahead is buffered internally. Besides returning
/// tokens, the lexer keeps the text of the last identifier (or keyword)
/// and the value of the last number it produced, readable until the next
/// token of that kind is lexed.
#[derive(Debug)]
pub struct Lexer<I> {
    input: I,
    // None once the source is exhausted
    last_char: Option<u8>,
    identifier_str: String,
    num_val: f64,
    finished: bool,
}

impl<I> Lexer<I>
where
    I: Iterator<Item = u8>,
{
    pub fn new(input: I) -> Self {
        Self {
            input,
            last_char: Some(b' '),
            identifier_str: String::new(),
            num_val: 0.0,
            finished: false,
        }
    }

    /// Text of the most recently lexed identifier or keyword.
    pub fn identifier_str(&self) -> &str {
        &self.identifier_str
    }

    /// Value of the most recently lexed number.
    pub fn num_val(&self) -> f64 {
        self.num_val
    }

    /// Produces the next token, consuming input as it goes.
    ///
    /// Every call advances past the token it returns; there is no way to
    /// lex the same position twice. Callers that need to look at a token
    /// again must hold on to it themselves (the parser's current-token
    /// slot does exactly that). Once the source is exhausted every call
    /// returns [`Token::EndOfInput`].
    pub fn next_token(&mut self) -> Token {
        loop {
            while matches!(self.last_char, Some(c) if is_space(c)) {
                self.bump();
            }

            let token = match self.last_char {
                None => Token::EndOfInput,

                Some(c) if c.is_ascii_alphabetic() => self.lex_identifier(c),

                Some(c) if c.is_ascii_digit() || c == b'.' => self.lex_number(c),

                Some(b'#') => {
                    self.skip_comment();
                    continue;
                }

                Some(c) => {
                    self.bump();
                    Token::Char(c)
                }
            };

            trace!(%token, "lexed token");
            return token;
        }
    }

    fn bump(&mut self) -> Option<u8> {
        self.last_char = self.input.next();
        self.last_char
    }

    fn lex_identifier(&mut self, first: u8) -> Token {
        self.identifier_str.clear();
        self.identifier_str.push(char::from(first));

        while let Some(c) = self.bump().filter(u8::is_ascii_alphanumeric) {
            self.identifier_str.push(char::from(c));
        }

        match self.identifier_str.as_str() {
            "def" => Token::FuncDef,
            "extern" => Token::Extern,
            ident => Token::Identifier(ident.to_string()),
        }
    }

    fn lex_number(&mut self, first: u8) -> Token {
        let mut run = String::from(char::from(first));

        while let Some(c) = self.bump().filter(|c| c.is_ascii_digit() || *c == b'.') {
            run.push(char::from(c));
        }

        self.num_val = parse_number_prefix(&run);
        Token::Number(self.num_val)
    }

    // Stops on the line terminator, which is left as whitespace for the
    // next pass, or at end of input.
    fn skip_comment(&mut self) {
        while !matches!(self.bump(), None | Some(b'\n') | Some(b'\r')) {}
    }
}

/// Yields tokens up to and including the first [`Token::EndOfInput`].
impl<I> Iterator for Lexer<I>
where
    I: Iterator<Item = u8>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        self.finished = token == Token::EndOfInput;
        Some(token)
    }
}

pub trait Lex {
    fn lex(&self) -> Lexer<Bytes<'_>>;
}

impl Lex for str {
    fn lex(&self) -> Lexer<Bytes<'_>> {
        Lexer::new(self.bytes())
    }
}
