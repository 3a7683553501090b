use super::cursor::Cursor;

#[cfg(test)]
mod test;

/// One physical source line with its comments removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number.
    pub number: u32,
    pub text: String,
}

/// Splits source text into lines, stripping `//` and `/* */` comments.
///
/// A block comment is replaced by a single space; the newlines inside it
/// still end lines, so line numbers always match the source.
#[derive(Debug)]
pub struct Lines<'a> {
    cursor: Cursor<'a>,
    number: u32,
    /// Line on which the currently open block comment started.
    block: Option<u32>,
}

impl<'a> Lines<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            cursor: Cursor::new(src),
            number: 0,
            block: None,
        }
    }

    /// Line on which a block comment was opened and never closed. Only
    /// meaningful once the iterator is exhausted.
    pub fn unterminated_comment(&self) -> Option<u32> {
        self.block
    }

    fn block_comment(&mut self) -> bool {
        while let Some(ch) = self.cursor.bump() {
            match ch {
                '\n' => return false,
                '*' if self.cursor.first() == '/' => {
                    self.cursor.bump();
                    self.block = None;
                    return true;
                }
                _ => (),
            }
        }
        false
    }
}

impl Iterator for Lines<'_> {
    type Item = SourceLine;

    fn next(&mut self) -> Option<SourceLine> {
        if self.cursor.is_eof() {
            return None;
        }
        self.number += 1;
        let mut text = String::new();
        if self.block.is_some() && !self.block_comment() {
            return Some(SourceLine {
                number: self.number,
                text,
            });
        }
        while let Some(ch) = self.cursor.bump() {
            match ch {
                '\n' => break,
                '\r' => (),
                '/' if self.cursor.first() == '/' => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                '/' if self.cursor.first() == '*' => {
                    self.cursor.bump();
                    text.push(' ');
                    self.block = Some(self.number);
                    if !self.block_comment() {
                        break;
                    }
                }
                _ => text.push(ch),
            }
        }
        Some(SourceLine {
            number: self.number,
            text,
        })
    }
}
