/// Every non-numeric word of the language, plus the `Number` marker used in
/// assembled programs to flag that the following cell is an operand.
///
/// The discriminant is the value an opcode cell holds. `0` is deliberately
/// not a token, so an unpatched placeholder never decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Token {
    Number = 1,
    ChainPlus,
    ChainMinus,
    Assign,
    Add,
    Sub,
    Multiply,
    Divide,
    Increment,
    Decrement,
    PrintNumber,
    PrintChar,
    ReadInput,
    Equals,
    Different,
    LessThan,
    GreaterThan,
    LessEquals,
    GreaterEquals,
    CurlyStart,
    CurlyEnd,
    SquareStart,
    SquareEnd,
    FunctionStart,
    FunctionEnd,
    FunctionRun,
}

/// Longest spelling in the table, in bytes.
const MAX_SPELLING: usize = 3;

impl Token {
    pub const ALL: [Token; 26] = {
        use Token::*;
        [
            Number,
            ChainPlus,
            ChainMinus,
            Assign,
            Add,
            Sub,
            Multiply,
            Divide,
            Increment,
            Decrement,
            PrintNumber,
            PrintChar,
            ReadInput,
            Equals,
            Different,
            LessThan,
            GreaterThan,
            LessEquals,
            GreaterEquals,
            CurlyStart,
            CurlyEnd,
            SquareStart,
            SquareEnd,
            FunctionStart,
            FunctionEnd,
            FunctionRun,
        ]
    };

    pub fn spelling(self) -> &'static str {
        use Token::*;
        match self {
            Number => "number",
            ChainPlus => "+",
            ChainMinus => "-",
            Assign => "=",
            Add => "+=",
            Sub => "-=",
            Multiply => "*=",
            Divide => "/=",
            Increment => "++",
            Decrement => "--",
            PrintNumber => "!",
            PrintChar => "#",
            ReadInput => "\"",
            Equals => "?=",
            Different => "?!",
            LessThan => "?<",
            GreaterThan => "?>",
            LessEquals => "?<=",
            GreaterEquals => "?>=",
            CurlyStart => "{",
            CurlyEnd => "}",
            SquareStart => "[",
            SquareEnd => "]",
            FunctionStart => "<",
            FunctionEnd => ">",
            FunctionRun => "()",
        }
    }

    /// Looks up a source word. `Number` has no source spelling.
    pub fn from_spelling(word: &str) -> Option<Token> {
        Self::ALL
            .into_iter()
            .filter(|&t| t != Token::Number)
            .find(|t| t.spelling() == word)
    }

    /// Splits a run of symbol characters into tokens, always taking the
    /// longest spelling that matches at the current position.
    ///
    /// Returns `None` if some position matches no spelling at all.
    pub fn split_symbols(mut run: &str) -> Option<Vec<Token>> {
        let mut out = Vec::new();
        while !run.is_empty() {
            let (token, len) = (1..=MAX_SPELLING.min(run.len()))
                .rev()
                .find_map(|len| Some((Self::from_spelling(run.get(..len)?)?, len)))?;
            out.push(token);
            run = &run[len..];
        }
        Some(out)
    }

    /// The cell value this token is encoded as.
    pub fn cell(self) -> f64 {
        f64::from(self as u8)
    }

    pub fn is_comparison(self) -> bool {
        use Token::*;
        matches!(
            self,
            Equals | Different | LessThan | GreaterThan | LessEquals | GreaterEquals
        )
    }

    /// Operations that take no right-hand operand.
    pub fn is_nullary(self) -> bool {
        use Token::*;
        matches!(
            self,
            Increment | Decrement | PrintChar | PrintNumber | ReadInput | FunctionRun
        )
    }

    /// Operations that take exactly one right-hand operand and end the line.
    pub fn is_unary(self) -> bool {
        use Token::*;
        matches!(self, Assign | Add | Sub | Multiply | Divide)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spelling())
    }
}

impl TryFrom<f64> for Token {
    type Error = ();
    fn try_from(cell: f64) -> Result<Self, Self::Error> {
        if cell.fract() != 0.0 || !(1.0..=Self::ALL.len() as f64).contains(&cell) {
            return Err(());
        }
        Ok(Self::ALL[cell as usize - 1])
    }
}
