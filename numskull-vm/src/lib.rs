//! Runs assembled numskull programs.

use std::io::{self, Write};

use numskull::decode::{Chain, DecodeError, Instruction, Statement};
use numskull::num::format_number;
use numskull::{Program, Token};

use self::input::{Input, InputError};
use self::memory::Memory;

pub mod input;
pub mod memory;
pub mod output;


pub const INTERPRETER_VERSION: &str = "v0.4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Call depth at which a warning is logged.
    pub warn_depth: Option<usize>,
    /// Call depth at which execution stops.
    pub quit_depth: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warn_depth: Some(32),
            quit_depth: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VmError {
    #[error("cannot return from function, call stack empty")]
    EmptyCallStack,
    #[error("invalid function call to {target}")]
    InvalidFunctionCall { target: f64 },
    #[error("invalid jump to {target}")]
    InvalidJump { target: f64 },
    #[error("max call depth of {0} reached")]
    DepthExceeded(usize),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to read input: {0}")]
    Input(#[from] InputError),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// The interpreter. Memory and the call stack belong to a single
/// [`Vm::execute`] call; only the input, output and config outlive it.
#[derive(Debug)]
pub struct Vm<I, O> {
    input: I,
    output: O,
    config: Config,
}

impl<I: Input, O: Write> Vm<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self {
            input,
            output,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn output(&self) -> &O {
        &self.output
    }
    pub fn into_output(self) -> O {
        self.output
    }

    /// Runs `program` from its first cell until the program counter walks
    /// off the end or an error stops it. Output is flushed either way.
    pub fn execute(&mut self, program: &Program) -> Result<(), VmError> {
        let mut run = Run {
            program,
            pc: 0,
            steps: 0,
            memory: Memory::new(),
            calls: Vec::with_capacity(64),
            input: &mut self.input,
            output: &mut self.output,
            config: self.config,
        };
        let result = run.run();
        match &result {
            Ok(()) => tracing::debug!(steps = run.steps, "program finished"),
            Err(e) => tracing::debug!(pc = run.pc, steps = run.steps, "program failed: {e}"),
        }
        let flushed = self.output.flush().map_err(VmError::Output);
        result.and(flushed)
    }
}

struct Run<'a, I, O> {
    program: &'a Program,
    pc: usize,
    steps: u64,
    memory: Memory,
    calls: Vec<usize>,
    input: &'a mut I,
    output: &'a mut O,
    config: Config,
}

impl<I: Input, O: Write> Run<'_, I, O> {
    fn run(&mut self) -> Result<(), VmError> {
        let program = self.program;
        while self.pc < program.len() {
            let (ins, next) = program.decode(self.pc)?;
            self.steps += 1;
            self.pc = match ins {
                Instruction::Return => self.calls.pop().ok_or(VmError::EmptyCallStack)?,
                Instruction::Jump { target, .. } => self.jump(target)?,
                Instruction::Statement(st) => self.statement(st, next)?,
            };
        }
        Ok(())
    }

    /// Executes one statement, returning the next program counter.
    fn statement(&mut self, st: Statement<'_>, next: usize) -> Result<usize, VmError> {
        use Token::*;
        let mut lhs = st.lhs;
        for link in st.chain() {
            match link {
                Chain::Plus(n) => lhs += self.memory.read(n),
                Chain::Minus(n) => lhs -= self.memory.read(n),
            }
        }
        // decoding guarantees an operand for every op that uses `rhs`
        let rhs = st.operand.map_or(f64::NAN, |n| self.memory.read(n));
        let value = self.memory.read(lhs);
        match st.op {
            Increment => self.memory.write(lhs, value + 1.0),
            Decrement => self.memory.write(lhs, value - 1.0),
            Assign => self.memory.write(lhs, rhs),
            Add => self.memory.write(lhs, value + rhs),
            Sub => self.memory.write(lhs, value - rhs),
            Multiply => self.memory.write(lhs, value * rhs),
            Divide => self.memory.write(lhs, value / rhs),
            PrintChar => self.print(&[value as i64 as u8])?,
            PrintNumber => self.print(format_number(value).as_bytes())?,
            ReadInput => {
                let read = self.input.read_next()?;
                self.memory.write(lhs, read);
            }
            Equals | Different | LessThan | GreaterThan | LessEquals | GreaterEquals => {
                let taken = match st.op {
                    Equals => value == rhs,
                    Different => value != rhs,
                    LessThan => value < rhs,
                    GreaterThan => value > rhs,
                    LessEquals => value <= rhs,
                    _ => value >= rhs,
                };
                return match (taken, st.jump) {
                    (true, _) => Ok(next),
                    (false, Some(target)) => self.jump(target),
                    (false, None) => Err(VmError::InvalidJump { target: f64::NAN }),
                };
            }
            FunctionRun => return self.call(value, next),
            token @ (Number | ChainPlus | ChainMinus | CurlyStart | CurlyEnd | SquareStart
            | SquareEnd | FunctionStart | FunctionEnd) => {
                let pos = self.pc;
                return Err(DecodeError::UnknownOperation { pos, token }.into());
            }
        }
        Ok(next)
    }

    fn print(&mut self, bytes: &[u8]) -> Result<(), VmError> {
        self.output.write_all(bytes).map_err(VmError::Output)
    }

    /// A jump may land anywhere in the program, or exactly at its end.
    fn jump(&self, target: f64) -> Result<usize, VmError> {
        index(target)
            .filter(|&pos| pos <= self.program.len())
            .ok_or(VmError::InvalidJump { target })
    }

    fn call(&mut self, target: f64, ret: usize) -> Result<usize, VmError> {
        self.calls.push(ret);
        let depth = self.calls.len();
        if Some(depth) == self.config.warn_depth {
            tracing::warn!("call depth of {depth} reached");
        }
        if Some(depth) == self.config.quit_depth {
            return Err(VmError::DepthExceeded(depth));
        }
        let header = index(target).and_then(|pos| {
            let cells = self.program.cells().get(pos..)?.get(..2)?;
            (cells[0] == Token::FunctionStart.cell()).then_some(pos + 2)
        });
        header.ok_or(VmError::InvalidFunctionCall { target })
    }
}

fn index(n: f64) -> Option<usize> {
    (n >= 0.0 && n.fract() == 0.0 && n < usize::MAX as f64).then_some(n as usize)
}
