use crate::lex::{LexError, LexLine, Lexeme, Lexer};
use crate::program::Program;
use crate::token::Token;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// `{ }`
    Condition,
    /// `[ ]`
    Loop,
    /// `< >`
    Function,
}

impl BracketKind {
    pub fn name(self) -> &'static str {
        match self {
            BracketKind::Condition => "condition",
            BracketKind::Loop => "loop",
            BracketKind::Function => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("expected {expected}, got '{got}'")]
    Expected {
        expected: &'static str,
        got: Lexeme,
    },
    #[error("unmatched '{0}'")]
    Unmatched(Token),
    #[error("unclosed {} bracket", .0.name())]
    Unclosed(BracketKind),
}

/// An assembly diagnostic. For unclosed brackets, `line` is where the
/// bracket was opened.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct AsmError {
    pub line: u32,
    pub kind: ErrorKind,
}

fn expected(expected: &'static str, got: Lexeme) -> ErrorKind {
    ErrorKind::Expected { expected, got }
}

/// An open bracket waiting for its close.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    /// Start of the line that opened it; loops jump back here.
    open_pos: usize,
    /// Placeholder cell patched with the end position on close.
    jump_cell: usize,
    line: u32,
}

#[derive(Debug, Default)]
struct Brackets {
    conditions: Vec<Bracket>,
    loops: Vec<Bracket>,
    functions: Vec<Bracket>,
}

impl Brackets {
    fn stack(&mut self, kind: BracketKind) -> &mut Vec<Bracket> {
        match kind {
            BracketKind::Condition => &mut self.conditions,
            BracketKind::Loop => &mut self.loops,
            BracketKind::Function => &mut self.functions,
        }
    }
}

/// Reads the lexemes of one line; past the end it keeps yielding `Eol`.
struct LineCursor<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
}

impl LineCursor<'_> {
    fn peek(&self) -> Lexeme {
        self.lexemes.get(self.pos).copied().unwrap_or(Lexeme::Eol)
    }
    fn next(&mut self) -> Lexeme {
        let lexeme = self.peek();
        self.pos += 1;
        lexeme
    }
    fn number(&mut self) -> Result<f64, ErrorKind> {
        match self.next() {
            Lexeme::Number(n) => Ok(n),
            got => Err(expected("number", got)),
        }
    }
    fn eol(&mut self) -> Result<(), ErrorKind> {
        match self.next() {
            Lexeme::Eol => Ok(()),
            got => Err(expected("end of line", got)),
        }
    }
}

/// Single forward pass from source text to a flat program. Forward jumps
/// are reserved as placeholder cells and patched when their bracket closes.
#[derive(Debug)]
pub struct Assembler<'a> {
    lexer: Lexer<'a>,
    program: Vec<f64>,
    brackets: Brackets,
    errors: Vec<AsmError>,
}

impl<'a> Assembler<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            program: Vec::with_capacity(1024),
            brackets: Brackets::default(),
            errors: Vec::new(),
        }
    }

    /// Assembles every line, collecting all diagnostics. A program is only
    /// returned when there are none.
    pub fn assemble(mut self) -> Result<Program, Vec<AsmError>> {
        while let Some(line) = self.lexer.line() {
            self.line(line);
        }
        for kind in [BracketKind::Condition, BracketKind::Loop, BracketKind::Function] {
            while let Some(bracket) = self.brackets.stack(kind).pop() {
                self.errors.push(AsmError {
                    line: bracket.line,
                    kind: ErrorKind::Unclosed(kind),
                });
            }
        }
        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "assembly failed");
            return Err(self.errors);
        }
        tracing::debug!(cells = self.program.len(), "assembled program");
        Ok(Program::from_cells(self.program))
    }

    fn line(&mut self, line: LexLine) {
        let LexLine {
            number,
            lexemes,
            errors,
        } = line;
        if !errors.is_empty() {
            self.errors.extend(errors.into_iter().map(|e| AsmError {
                line: number,
                kind: e.into(),
            }));
            return;
        }
        let mut cursor = LineCursor {
            lexemes: &lexemes,
            pos: 0,
        };
        if let Err(kind) = self.statement(&mut cursor, number) {
            self.errors.push(AsmError { line: number, kind });
        }
    }

    fn statement(&mut self, cursor: &mut LineCursor<'_>, line: u32) -> Result<(), ErrorKind> {
        use Token::*;
        match cursor.next() {
            Lexeme::Eol => Ok(()),
            Lexeme::Token(close @ (CurlyEnd | SquareEnd | FunctionEnd)) => {
                cursor.eol()?;
                self.close(close)
            }
            Lexeme::Number(lhs) => self.operation(lhs, cursor, line),
            got => Err(expected("number", got)),
        }
    }

    fn close(&mut self, close: Token) -> Result<(), ErrorKind> {
        let kind = match close {
            Token::CurlyEnd => BracketKind::Condition,
            Token::SquareEnd => BracketKind::Loop,
            _ => BracketKind::Function,
        };
        let bracket = self
            .brackets
            .stack(kind)
            .pop()
            .ok_or(ErrorKind::Unmatched(close))?;
        match kind {
            BracketKind::Condition => (),
            BracketKind::Loop => self
                .program
                .extend([Token::SquareEnd.cell(), bracket.open_pos as f64]),
            BracketKind::Function => self.program.push(Token::FunctionEnd.cell()),
        }
        self.program[bracket.jump_cell] = self.program.len() as f64;
        Ok(())
    }

    /// Everything after the left-hand address. Cells are only committed to
    /// the program once the whole line is known to be valid.
    fn operation(
        &mut self,
        lhs: f64,
        cursor: &mut LineCursor<'_>,
        line: u32,
    ) -> Result<(), ErrorKind> {
        use Token::*;
        let start = self.program.len();
        let mut cells = vec![Number.cell(), lhs];
        let op = loop {
            match cursor.next() {
                Lexeme::Token(chain @ (ChainPlus | ChainMinus)) => {
                    let n = cursor.number()?;
                    cells.extend([chain.cell(), Number.cell(), n]);
                }
                Lexeme::Token(op) => break op,
                got => return Err(expected("operation", got)),
            }
        };
        match op {
            Assign if cursor.peek() == Lexeme::Token(FunctionStart) => {
                cursor.next();
                cursor.eol()?;
                let header = start + cells.len() + 3;
                cells.extend([Assign.cell(), Number.cell(), header as f64]);
                cells.extend([FunctionStart.cell(), 0.0]);
                self.program.extend(cells);
                self.open(BracketKind::Function, header, line);
            }
            _ if op.is_nullary() => {
                cursor.eol()?;
                cells.push(op.cell());
                self.program.extend(cells);
            }
            _ if op.is_unary() => {
                let n = cursor.number()?;
                cursor.eol()?;
                cells.extend([op.cell(), Number.cell(), n]);
                self.program.extend(cells);
            }
            _ if op.is_comparison() => {
                let n = cursor.number()?;
                let kind = match cursor.next() {
                    Lexeme::Token(CurlyStart) => BracketKind::Condition,
                    Lexeme::Token(SquareStart) => BracketKind::Loop,
                    got => return Err(expected("opening bracket", got)),
                };
                cursor.eol()?;
                cells.extend([op.cell(), Number.cell(), n, 0.0]);
                self.program.extend(cells);
                self.open(kind, start, line);
            }
            _ => return Err(expected("operation", Lexeme::Token(op))),
        }
        Ok(())
    }

    /// Pushes a bracket whose jump cell is the last emitted cell.
    fn open(&mut self, kind: BracketKind, open_pos: usize, line: u32) {
        let jump_cell = self.program.len() - 1;
        self.brackets.stack(kind).push(Bracket {
            open_pos,
            jump_cell,
            line,
        });
    }
}
