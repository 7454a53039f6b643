/// Bytecode disassembler (luac -l style output).
use crate::chunk::Chunk;
use crate::opcode::{OpCode, Operand};
use lupine_core::string::StringInterner;
use lupine_core::value::Value;
use std::fmt::Write;

/// Disassemble a chunk into a human-readable listing.
pub fn disassemble(chunk: &Chunk, strings: &StringInterner) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "chunk ({} bytes, {} constants)",
        chunk.code.len(),
        chunk.constants.len()
    )
    .unwrap();

    let mut offset = 0;
    let mut last_line = 0;
    while offset < chunk.code.len() {
        let line = chunk.line_at(offset);
        let line_str = if line == last_line {
            "   |".to_string()
        } else {
            format!("{line:>4}")
        };
        last_line = line;

        let Some(op) = OpCode::from_u8(chunk.code[offset]) else {
            writeln!(out, "{offset:04}\t{line_str}\t<bad opcode {}>", chunk.code[offset]).unwrap();
            offset += 1;
            continue;
        };

        write!(out, "{offset:04}\t{line_str}\t{}", op.name()).unwrap();
        match op.operand() {
            Operand::None => {
                offset += 1;
            }
            Operand::Byte => {
                let operand = chunk.code.get(offset + 1).copied().unwrap_or(0);
                write!(out, " {operand}").unwrap();
                offset += 2;
            }
            Operand::Short => {
                let hi = chunk.code.get(offset + 1).copied().unwrap_or(0) as u16;
                let lo = chunk.code.get(offset + 2).copied().unwrap_or(0) as u16;
                let operand = (hi << 8) | lo;
                write!(out, " {operand}").unwrap();
                match op {
                    OpCode::PushConstant | OpCode::GetGlobal | OpCode::SetGlobal => {
                        if let Some(constant) = chunk.constants.get(operand as usize) {
                            write!(out, "\t; {}", constant_text(constant, strings)).unwrap();
                        }
                    }
                    OpCode::Jump | OpCode::JumpIfFalse | OpCode::JumpIfTrue => {
                        write!(out, "\t; -> {:04}", offset + 3 + operand as usize).unwrap();
                    }
                    OpCode::Loop => {
                        write!(out, "\t; -> {:04}", offset + 3 - operand as usize).unwrap();
                    }
                    _ => {}
                }
                offset += 3;
            }
        }
        writeln!(out).unwrap();
    }

    if !chunk.constants.is_empty() {
        writeln!(out, "constants ({}):", chunk.constants.len()).unwrap();
        for (i, constant) in chunk.constants.iter().enumerate() {
            writeln!(out, "\t{i}\t{}", constant_text(constant, strings)).unwrap();
        }
    }

    out
}

fn constant_text(value: &Value, strings: &StringInterner) -> String {
    match value {
        Value::Str(id) => format!("\"{}\"", strings.get_lossy(*id)),
        other => other.display(strings),
    }
}
