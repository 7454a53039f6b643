//! lupine front end: scanner, parser, and bytecode compiler.

pub mod ast;
pub mod chunk;
pub mod compiler;
pub mod disasm;
pub mod lexer;
pub mod opcode;
pub mod parser;
pub mod token;

use chunk::Chunk;
use compiler::CompileError;
use lexer::LexError;
use lupine_core::string::StringInterner;
use parser::ParseError;
use std::fmt;

/// Any front-end failure: scanning, parsing, or compiling.
#[derive(Clone, Debug)]
pub enum FrontendError {
    Lex(LexError),
    Parse(ParseError),
    Compile(CompileError),
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Lex(e) => write!(f, "{e}"),
            FrontendError::Parse(e) => write!(f, "{e}"),
            FrontendError::Compile(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FrontendError {}

impl From<LexError> for FrontendError {
    fn from(e: LexError) -> Self {
        FrontendError::Lex(e)
    }
}

impl From<ParseError> for FrontendError {
    fn from(e: ParseError) -> Self {
        FrontendError::Parse(e)
    }
}

impl From<CompileError> for FrontendError {
    fn from(e: CompileError) -> Self {
        FrontendError::Compile(e)
    }
}

/// Run the whole front end: source bytes → chunk plus the interner that
/// owns every name and string literal in it.
pub fn compile(source: &[u8]) -> Result<(Chunk, StringInterner), FrontendError> {
    let tokens = lexer::tokenize(source)?;
    let mut strings = StringInterner::new();
    let block = parser::parse(&tokens, &mut strings)?;
    let chunk = compiler::compile(&block, &mut strings)?;
    Ok((chunk, strings))
}
