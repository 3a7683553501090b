use std::str::Chars;

pub(crate) const EOF_CHAR: char = '\0';

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    chars: Chars<'a>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.chars(),
        }
    }
    pub(crate) fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }
    pub(crate) fn second(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().unwrap_or(EOF_CHAR)
    }
    pub(crate) fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }
    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }
    pub(crate) fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_eof() && predicate(self.first()) {
            self.bump();
        }
    }
    /// Byte offset of the next character.
    pub(crate) fn pos(&self) -> usize {
        self.src.len() - self.chars.as_str().len()
    }
    pub(crate) fn slice(&self, from: usize) -> &'a str {
        &self.src[from..self.pos()]
    }
}
