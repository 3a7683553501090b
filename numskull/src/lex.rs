use crate::num::{is_numeric, parse_number, NumberError};
use crate::token::Token;

use self::cursor::Cursor;
pub use self::lines::{Lines, SourceLine};


mod cursor;
mod lines;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lexeme {
    Number(f64),
    Token(Token),
    Eol,
}

impl std::fmt::Display for Lexeme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lexeme::Number(_) => f.write_str("number"),
            Lexeme::Token(token) => write!(f, "{token}"),
            Lexeme::Eol => f.write_str("end of line"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unknown word '{0}'")]
    UnknownWord(String),
    #[error("invalid number '{word}': {err}")]
    InvalidNumber { word: String, err: NumberError },
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// The lexemes of one source line, always terminated by [`Lexeme::Eol`].
#[derive(Debug, Clone, PartialEq)]
pub struct LexLine {
    pub number: u32,
    pub lexemes: Vec<Lexeme>,
    pub errors: Vec<LexError>,
}

#[derive(Debug)]
pub struct Lexer<'a> {
    lines: Lines<'a>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            lines: Lines::new(src),
            finished: false,
        }
    }

    /// Lexes the next line. Once the source is exhausted, an unterminated
    /// block comment is reported as one extra empty line carrying the error
    /// at the line the comment opened.
    pub fn line(&mut self) -> Option<LexLine> {
        if let Some(SourceLine { number, text }) = self.lines.next() {
            return Some(lex_line(number, &text));
        }
        if self.finished {
            return None;
        }
        self.finished = true;
        let number = self.lines.unterminated_comment()?;
        Some(LexLine {
            number,
            lexemes: vec![Lexeme::Eol],
            errors: vec![LexError::UnterminatedComment],
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexLine;

    fn next(&mut self) -> Option<LexLine> {
        self.line()
    }
}

/// Lexes a single logical line that is already free of comments.
pub fn lex_line(number: u32, text: &str) -> LexLine {
    let mut cursor = Cursor::new(text);
    let mut lexemes = Vec::new();
    let mut errors = Vec::new();
    loop {
        cursor.eat_while(is_space);
        let start = cursor.pos();
        let Some(ch) = cursor.bump() else {
            break;
        };
        if is_numeric(ch) || (ch == '-' && is_numeric(cursor.first())) {
            cursor.eat_while(is_numeric);
            let word = cursor.slice(start);
            match parse_number(word) {
                Ok(n) => lexemes.push(Lexeme::Number(n)),
                Err(err) => errors.push(LexError::InvalidNumber {
                    word: word.to_owned(),
                    err,
                }),
            }
            continue;
        }
        symbols(&mut cursor);
        let word = cursor.slice(start);
        match Token::split_symbols(word) {
            Some(tokens) => lexemes.extend(tokens.into_iter().map(Lexeme::Token)),
            None => errors.push(LexError::UnknownWord(word.to_owned())),
        }
    }
    lexemes.push(Lexeme::Eol);
    LexLine {
        number,
        lexemes,
        errors,
    }
}

/// Only ASCII blanks separate words; any other character is part of one.
fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Eats the rest of a symbol run: everything up to whitespace, a numeric
/// character, or a `-` that starts a signed literal.
fn symbols(cursor: &mut Cursor<'_>) {
    while !cursor.is_eof() {
        let ch = cursor.first();
        if is_space(ch) || is_numeric(ch) || (ch == '-' && is_numeric(cursor.second())) {
            break;
        }
        cursor.bump();
    }
}
