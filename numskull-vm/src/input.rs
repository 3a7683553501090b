use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

use numskull::num::{parse_number, NumberError};

/// Value returned by the file adapters once their input is exhausted.
pub const END_OF_INPUT: f64 = -1.0;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("no more input")]
    Exhausted,
    #[error("invalid input '{word}': {err}")]
    Invalid { word: String, err: NumberError },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Source of values for the read-input operation.
pub trait Input {
    fn read_next(&mut self) -> Result<f64, InputError>;
}

impl<T: Input + ?Sized> Input for Box<T> {
    fn read_next(&mut self) -> Result<f64, InputError> {
        (**self).read_next()
    }
}

impl<T: Input + ?Sized> Input for &mut T {
    fn read_next(&mut self) -> Result<f64, InputError> {
        (**self).read_next()
    }
}

fn parse(word: &str) -> Result<f64, InputError> {
    parse_number(word).map_err(|err| InputError::Invalid {
        word: word.to_owned(),
        err,
    })
}

/// Whitespace separated numbers typed at a console. Running out of input
/// is an error, since there is no sentinel a user could not also type.
#[derive(Debug)]
pub struct ConsoleInput<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl ConsoleInput<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Input for ConsoleInput<R> {
    fn read_next(&mut self) -> Result<f64, InputError> {
        loop {
            if let Some(word) = self.pending.pop_front() {
                return parse(&word);
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(InputError::Exhausted);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

/// One byte per read, `-1` at the end.
#[derive(Debug)]
pub struct BinaryInput<R> {
    reader: R,
}

impl<R: Read> BinaryInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> Input for BinaryInput<R> {
    fn read_next(&mut self) -> Result<f64, InputError> {
        let mut byte = [0u8];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(END_OF_INPUT),
                Ok(_) => return Ok(f64::from(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// One number per line, `-1` at the end. A line that is not a number is an
/// error.
#[derive(Debug)]
pub struct TextInput<R> {
    reader: R,
}

impl<R: BufRead> TextInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Input for TextInput<R> {
    fn read_next(&mut self) -> Result<f64, InputError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(END_OF_INPUT);
        }
        parse(line.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &mut impl Input, n: usize) -> Vec<f64> {
        (0..n).map(|_| input.read_next().unwrap()).collect()
    }

    #[test]
    fn console_words() {
        let mut input = ConsoleInput::new("1 2,5\n\n  -3\n".as_bytes());
        assert_eq!(drain(&mut input, 3), vec![1.0, 2.5, -3.0]);
        assert!(matches!(input.read_next(), Err(InputError::Exhausted)));
    }

    #[test]
    fn console_rejects_garbage() {
        let mut input = ConsoleInput::new("4 abc 5\n".as_bytes());
        assert_eq!(input.read_next().unwrap(), 4.0);
        let err = input.read_next().unwrap_err();
        assert_eq!(err.to_string(), "invalid input 'abc': malformed number");
        assert_eq!(input.read_next().unwrap(), 5.0);
    }

    #[test]
    fn binary_bytes() {
        let mut input = BinaryInput::new(&[0u8, 65, 255][..]);
        assert_eq!(drain(&mut input, 5), vec![0.0, 65.0, 255.0, -1.0, -1.0]);
    }

    #[test]
    fn text_lines() {
        let mut input = TextInput::new("12\n-0,5\r\n 7.25 \n3".as_bytes());
        assert_eq!(drain(&mut input, 6), vec![12.0, -0.5, 7.25, 3.0, -1.0, -1.0]);
    }

    #[test]
    fn text_rejects_garbage() {
        let mut input = TextInput::new("1\nx\n\n".as_bytes());
        assert_eq!(input.read_next().unwrap(), 1.0);
        assert!(matches!(
            input.read_next(),
            Err(InputError::Invalid { err: NumberError::Malformed, .. })
        ));
        assert!(matches!(
            input.read_next(),
            Err(InputError::Invalid { err: NumberError::Empty, .. })
        ));
    }
}
