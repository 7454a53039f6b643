//! lupine virtual machine and end-to-end entry point.

pub mod arith;
pub mod compare;
pub mod error;
pub mod vm;

pub use error::{Error, RuntimeError, RuntimeErrorKind};
pub use vm::Vm;

/// Interpret a complete source: scan, parse, compile, execute. Returns
/// the bytes `print` wrote, or the first error from any stage.
///
/// Every call owns a fresh VM; no state survives between runs.
pub fn interpret(source: &[u8]) -> Result<Vec<u8>, Error> {
    let (chunk, strings) = lupine_compiler::compile(source)?;
    let mut vm = Vm::new(strings);
    vm.execute(&chunk)?;
    Ok(vm.take_output())
}
