use crate::decode::{decode, DecodeError, Instruction};

/// A flat, assembled program: opcodes, operands and patched jump cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    cells: Vec<f64>,
}

impl Program {
    pub fn from_cells(cells: Vec<f64>) -> Self {
        Self { cells }
    }
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn decode(&self, pos: usize) -> Result<(Instruction<'_>, usize), DecodeError> {
        decode(&self.cells, pos)
    }

    /// Walks the program front to back, yielding each instruction with its
    /// position. Stops after the first decode error.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            program: self,
            pos: 0,
            failed: false,
        }
    }
}

pub struct Instructions<'a> {
    program: &'a Program,
    pos: usize,
    failed: bool,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<(usize, Instruction<'a>), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.program.len() {
            return None;
        }
        let pos = self.pos;
        Some(match decode(&self.program.cells, pos) {
            Ok((ins, next)) => {
                self.pos = next;
                Ok((pos, ins))
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        })
    }
}

/// Disassembly listing, one instruction per line.
impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ins in self.instructions() {
            match ins {
                Ok((pos, ins)) => writeln!(f, "{pos:04}  {ins}")?,
                Err(e) => writeln!(f, "error: {e}")?,
            }
        }
        Ok(())
    }
}
