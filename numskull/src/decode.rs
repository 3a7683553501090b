use crate::num::format_number;
use crate::token::Token;

/// One executable unit of an assembled program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction<'a> {
    /// `lhs [chain...] op [operand] [jump]`
    Statement(Statement<'a>),
    /// Unconditional jump emitted by a function header (`<`) or a loop
    /// close (`]`).
    Jump { marker: Token, target: f64 },
    /// Function end (`>`).
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statement<'a> {
    pub lhs: f64,
    /// Raw `[chain op, Number, operand]` triples, already validated.
    chain: &'a [f64],
    pub op: Token,
    pub operand: Option<f64>,
    /// Jump cell of a comparison: where to go when it is false.
    pub jump: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Chain {
    Plus(f64),
    Minus(f64),
}

impl<'a> Statement<'a> {
    pub fn chain(&self) -> impl Iterator<Item = Chain> + 'a {
        self.chain.chunks_exact(3).map(|c| {
            if c[0] == Token::ChainMinus.cell() {
                Chain::Minus(c[2])
            } else {
                Chain::Plus(c[2])
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid opcode {value} at {pos}")]
    InvalidOpcode { pos: usize, value: f64 },
    #[error("unknown operation '{token}' at {pos}")]
    UnknownOperation { pos: usize, token: Token },
    #[error("unexpected end of program at {pos}")]
    Truncated { pos: usize },
}

struct Reader<'a> {
    cells: &'a [f64],
    pos: usize,
}

impl Reader<'_> {
    fn cell(&mut self) -> Result<f64, DecodeError> {
        let cell = *self
            .cells
            .get(self.pos)
            .ok_or(DecodeError::Truncated { pos: self.pos })?;
        self.pos += 1;
        Ok(cell)
    }
    fn token(&mut self) -> Result<Token, DecodeError> {
        let pos = self.pos;
        let value = self.cell()?;
        Token::try_from(value).map_err(|()| DecodeError::InvalidOpcode { pos, value })
    }
    /// `Number, value`
    fn operand(&mut self) -> Result<f64, DecodeError> {
        let pos = self.pos;
        match self.token()? {
            Token::Number => self.cell(),
            token => Err(DecodeError::UnknownOperation { pos, token }),
        }
    }
}

/// Decodes the instruction starting at `pos`, returning it together with
/// the position just past it.
pub fn decode(cells: &[f64], pos: usize) -> Result<(Instruction<'_>, usize), DecodeError> {
    use Token::*;
    let mut r = Reader { cells, pos };
    let ins = match r.token()? {
        FunctionEnd => Instruction::Return,
        marker @ (FunctionStart | SquareEnd) => Instruction::Jump {
            marker,
            target: r.cell()?,
        },
        Number => {
            let lhs = r.cell()?;
            let chain_start = r.pos;
            let (op, op_pos) = loop {
                let op_pos = r.pos;
                match r.token()? {
                    ChainPlus | ChainMinus => {
                        r.operand()?;
                    }
                    op => break (op, op_pos),
                }
            };
            let (operand, jump) = match op {
                _ if op.is_nullary() => (None, None),
                _ if op.is_unary() => (Some(r.operand()?), None),
                _ if op.is_comparison() => (Some(r.operand()?), Some(r.cell()?)),
                token => {
                    return Err(DecodeError::UnknownOperation { pos: op_pos, token });
                }
            };
            Instruction::Statement(Statement {
                lhs,
                chain: &cells[chain_start..op_pos],
                op,
                operand,
                jump,
            })
        }
        token => return Err(DecodeError::UnknownOperation { pos, token }),
    };
    Ok((ins, r.pos))
}

impl std::fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Statement(st) => {
                write!(f, "{}", format_number(st.lhs))?;
                for link in st.chain() {
                    match link {
                        Chain::Plus(n) => write!(f, " + {}", format_number(n))?,
                        Chain::Minus(n) => write!(f, " - {}", format_number(n))?,
                    }
                }
                write!(f, " {}", st.op)?;
                if let Some(operand) = st.operand {
                    write!(f, " {}", format_number(operand))?;
                }
                if let Some(jump) = st.jump {
                    write!(f, " -> {}", format_number(jump))?;
                }
                Ok(())
            }
            Instruction::Jump { marker, target } => {
                write!(f, "{marker} -> {}", format_number(*target))
            }
            Instruction::Return => write!(f, "{}", Token::FunctionEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Token::*;

    fn cells(tokens: &[f64]) -> Vec<f64> {
        tokens.to_vec()
    }

    #[test]
    fn chained_statement() {
        let p = cells(&[
            Number.cell(),
            3.0,
            ChainPlus.cell(),
            Number.cell(),
            1.0,
            ChainMinus.cell(),
            Number.cell(),
            2.0,
            Assign.cell(),
            Number.cell(),
            7.0,
        ]);
        let (ins, next) = decode(&p, 0).unwrap();
        assert_eq!(next, p.len());
        let Instruction::Statement(st) = ins else {
            panic!("expected statement, got {ins:?}");
        };
        assert_eq!(st.lhs, 3.0);
        assert_eq!(
            st.chain().collect::<Vec<_>>(),
            vec![Chain::Plus(1.0), Chain::Minus(2.0)]
        );
        assert_eq!(st.op, Assign);
        assert_eq!(st.operand, Some(7.0));
        assert_eq!(st.jump, None);
        assert_eq!(ins.to_string(), "3 + 1 - 2 = 7");
    }

    #[test]
    fn comparison_has_jump_cell() {
        let p = cells(&[Number.cell(), 0.0, LessThan.cell(), Number.cell(), 4.0, 9.0]);
        let (ins, next) = decode(&p, 0).unwrap();
        assert_eq!(next, 6);
        assert_eq!(ins.to_string(), "0 ?< 4 -> 9");
    }

    #[test]
    fn corrupt_programs() {
        assert_eq!(
            decode(&[0.0], 0),
            Err(DecodeError::InvalidOpcode { pos: 0, value: 0.0 })
        );
        assert_eq!(
            decode(&[CurlyStart.cell()], 0),
            Err(DecodeError::UnknownOperation {
                pos: 0,
                token: CurlyStart
            })
        );
        assert_eq!(
            decode(&[Number.cell(), 1.0, SquareStart.cell()], 0),
            Err(DecodeError::UnknownOperation {
                pos: 2,
                token: SquareStart
            })
        );
        assert_eq!(
            decode(&[Number.cell(), 1.0, Assign.cell(), 5.0, 5.0], 0),
            Err(DecodeError::UnknownOperation {
                pos: 3,
                token: Add
            })
        );
        assert_eq!(
            decode(&[Number.cell(), 1.0, Assign.cell()], 0),
            Err(DecodeError::Truncated { pos: 3 })
        );
        assert_eq!(
            decode(&[SquareEnd.cell()], 0),
            Err(DecodeError::Truncated { pos: 1 })
        );
    }
}
