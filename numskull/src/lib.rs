//! Lexer and assembler for numskull, a line-oriented language whose only
//! value is a double. Source text is assembled into a flat [`Program`] of
//! `f64` cells that `numskull-vm` executes.

pub mod decode;
pub mod lex;
pub mod num;
pub mod parse;
pub mod program;
pub mod token;

pub use self::parse::{AsmError, Assembler};
pub use self::program::Program;
pub use self::token::Token;

pub const LANGUAGE_VERSION: &str = "v1.2";

pub fn assemble(src: &str) -> Result<Program, Vec<AsmError>> {
    Assembler::new(src).assemble()
}
