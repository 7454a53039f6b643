//! Runtime and whole-pipeline error types.

use lupine_compiler::compiler::CompileError;
use lupine_compiler::lexer::LexError;
use lupine_compiler::parser::ParseError;
use lupine_compiler::FrontendError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    StackOverflow,
    StackUnderflow,
    /// PUC-style message, e.g. "attempt to compare two string values".
    TypeError(String),
    /// Name of the missing global.
    UndefinedVariable(String),
    DivisionByZero,
}

/// A runtime error with the source line of the failing instruction, taken
/// from the chunk line map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: u32,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.line)?;
        match &self.kind {
            RuntimeErrorKind::StackOverflow => write!(f, "stack overflow"),
            RuntimeErrorKind::StackUnderflow => write!(f, "stack underflow"),
            RuntimeErrorKind::TypeError(msg) => write!(f, "{msg}"),
            RuntimeErrorKind::UndefinedVariable(name) => {
                write!(f, "attempt to read undefined variable '{name}'")
            }
            RuntimeErrorKind::DivisionByZero => write!(f, "attempt to divide by zero"),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Any failure from any stage, propagated unchanged in kind.
#[derive(Clone, Debug)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Compile(CompileError),
    Runtime(RuntimeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => write!(f, "{e}"),
            Error::Parse(e) => write!(f, "{e}"),
            Error::Compile(e) => write!(f, "{e}"),
            Error::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<FrontendError> for Error {
    fn from(e: FrontendError) -> Self {
        match e {
            FrontendError::Lex(e) => Error::Lex(e),
            FrontendError::Parse(e) => Error::Parse(e),
            FrontendError::Compile(e) => Error::Compile(e),
        }
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Error::Runtime(e)
    }
}
