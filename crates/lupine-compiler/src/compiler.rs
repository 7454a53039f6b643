/// Single-pass bytecode compiler: AST → Chunk.
///
/// Locals live on the operand stack; the compile-time local list mirrors
/// the runtime stack exactly, slot by slot. Scopes bulk-pop on exit, and
/// every control-flow construct keeps both stacks in sync on all paths,
/// including `break`.
use crate::ast::{BinOp, Block, Expr, ExprKind, Stmt, StmtKind, UnOp};
use crate::chunk::Chunk;
use crate::opcode::OpCode;
use lupine_core::string::{StringId, StringInterner};
use lupine_core::value::Value;
use std::fmt;

/// Programs address locals with a single byte.
pub const MAX_LOCALS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompileErrorKind {
    TooManyConstants,
    TooManyLocals,
    TooManyArguments,
    InvalidJumpOffset,
    BreakOutsideLoop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub line: u32,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.line)?;
        match self.kind {
            CompileErrorKind::TooManyConstants => write!(f, "too many constants in chunk"),
            CompileErrorKind::TooManyLocals => write!(f, "too many local variables"),
            CompileErrorKind::TooManyArguments => write!(f, "too many arguments in call"),
            CompileErrorKind::InvalidJumpOffset => write!(f, "control structure too long"),
            CompileErrorKind::BreakOutsideLoop => write!(f, "break outside a loop"),
        }
    }
}

impl std::error::Error for CompileError {}

/// A declared local: its name and the scope depth it was declared at.
struct Local {
    name: StringId,
    depth: usize,
}

/// Per-loop bookkeeping for `break`.
struct LoopContext {
    /// Pending forward jumps emitted by `break` statements.
    break_sites: Vec<usize>,
    /// Number of locals that must remain when a break lands.
    locals_floor: usize,
}

/// Compile a parsed block into a chunk. The interner is the same one the
/// parser filled; the compiler adds the internal for-loop control names.
pub fn compile(block: &Block, strings: &mut StringInterner) -> Result<Chunk, CompileError> {
    let mut compiler = Compiler {
        chunk: Chunk::new(),
        strings,
        locals: Vec::new(),
        scope_depth: 0,
        loops: Vec::new(),
        last_line: 1,
    };
    for stmt in block {
        compiler.compile_stmt(stmt)?;
    }
    let line = compiler.last_line;
    compiler.emit(OpCode::Return, line);
    Ok(compiler.chunk)
}

struct Compiler<'s> {
    chunk: Chunk,
    strings: &'s mut StringInterner,
    locals: Vec<Local>,
    scope_depth: usize,
    loops: Vec<LoopContext>,
    last_line: u32,
}

impl<'s> Compiler<'s> {
    // ---- Emission helpers ----

    fn emit(&mut self, op: OpCode, line: u32) {
        self.chunk.write_op(op, line);
    }

    fn emit_byte_operand(&mut self, op: OpCode, operand: u8, line: u32) {
        self.chunk.write_op(op, line);
        self.chunk.write_byte(operand, line);
    }

    fn emit_constant(&mut self, value: Value, line: u32) -> Result<(), CompileError> {
        let idx = self.constant_index(value, line)?;
        self.chunk.write_op(OpCode::PushConstant, line);
        self.chunk.write_u16(idx, line);
        Ok(())
    }

    fn constant_index(&mut self, value: Value, line: u32) -> Result<u16, CompileError> {
        self.chunk.add_constant(value).ok_or(CompileError {
            kind: CompileErrorKind::TooManyConstants,
            line,
        })
    }

    /// Emit a forward jump with a placeholder operand; returns the
    /// placeholder offset for `patch_jump`.
    fn emit_jump(&mut self, op: OpCode, line: u32) -> usize {
        self.chunk.write_op(op, line);
        let site = self.chunk.len();
        self.chunk.write_u16(0xFFFF, line);
        site
    }

    /// Point the placeholder at `site` to the current end of code.
    fn patch_jump(&mut self, site: usize, line: u32) -> Result<(), CompileError> {
        let jump = self.chunk.len() - site - 2;
        if jump > u16::MAX as usize {
            return Err(CompileError {
                kind: CompileErrorKind::InvalidJumpOffset,
                line,
            });
        }
        self.chunk.code[site] = (jump >> 8) as u8;
        self.chunk.code[site + 1] = (jump & 0xFF) as u8;
        Ok(())
    }

    /// Emit a backward jump to `loop_start`.
    fn emit_loop(&mut self, loop_start: usize, line: u32) -> Result<(), CompileError> {
        self.chunk.write_op(OpCode::Loop, line);
        // +2 for the operand the VM will have consumed.
        let offset = self.chunk.len() + 2 - loop_start;
        if offset > u16::MAX as usize {
            return Err(CompileError {
                kind: CompileErrorKind::InvalidJumpOffset,
                line,
            });
        }
        self.chunk.write_u16(offset as u16, line);
        Ok(())
    }

    // ---- Scopes and locals ----

    fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Close the innermost scope, popping its locals at runtime too.
    fn end_scope(&mut self, line: u32) {
        self.scope_depth -= 1;
        while self
            .locals
            .last()
            .is_some_and(|local| local.depth > self.scope_depth)
        {
            self.emit(OpCode::Pop, line);
            self.locals.pop();
        }
    }

    fn add_local(&mut self, name: StringId, line: u32) -> Result<(), CompileError> {
        if self.locals.len() >= MAX_LOCALS {
            return Err(CompileError {
                kind: CompileErrorKind::TooManyLocals,
                line,
            });
        }
        self.locals.push(Local {
            name,
            depth: self.scope_depth,
        });
        Ok(())
    }

    /// Innermost local with this name, if any. The index doubles as the
    /// runtime stack slot.
    fn resolve_local(&self, name: StringId) -> Option<u8> {
        self.locals
            .iter()
            .rposition(|local| local.name == name)
            .map(|idx| idx as u8)
    }

    fn is_print(&self, name: StringId) -> bool {
        self.strings.get_bytes(name) == b"print"
    }

    // ---- Expressions ----

    fn compile_expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        let line = expr.line;
        match &expr.kind {
            ExprKind::Nil => self.emit(OpCode::PushNil, line),
            ExprKind::True => self.emit(OpCode::PushTrue, line),
            ExprKind::False => self.emit(OpCode::PushFalse, line),
            ExprKind::Integer(i) => self.emit_constant(Value::Integer(*i), line)?,
            ExprKind::Float(f) => self.emit_constant(Value::Float(*f), line)?,
            ExprKind::Str(id) => self.emit_constant(Value::Str(*id), line)?,
            ExprKind::Name(id) => self.compile_name_load(*id, line)?,
            ExprKind::Unary { op, operand } => {
                self.compile_expr(operand)?;
                let opcode = match op {
                    UnOp::Neg => OpCode::Negate,
                    UnOp::Not => OpCode::Not,
                    UnOp::BNot => OpCode::BNot,
                    UnOp::Len => OpCode::Len,
                };
                self.emit(opcode, line);
            }
            ExprKind::Binary {
                op: BinOp::And,
                lhs,
                rhs,
            } => {
                // Short-circuit: the result is the falsy left operand or
                // the right operand.
                self.compile_expr(lhs)?;
                let join = self.emit_jump(OpCode::JumpIfFalse, line);
                self.emit(OpCode::Pop, line);
                self.compile_expr(rhs)?;
                self.patch_jump(join, line)?;
            }
            ExprKind::Binary {
                op: BinOp::Or,
                lhs,
                rhs,
            } => {
                self.compile_expr(lhs)?;
                let join = self.emit_jump(OpCode::JumpIfTrue, line);
                self.emit(OpCode::Pop, line);
                self.compile_expr(rhs)?;
                self.patch_jump(join, line)?;
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.compile_expr(lhs)?;
                self.compile_expr(rhs)?;
                self.emit(binary_opcode(*op), line);
            }
            ExprKind::Call { callee, args } => {
                if args.len() > u8::MAX as usize {
                    return Err(CompileError {
                        kind: CompileErrorKind::TooManyArguments,
                        line,
                    });
                }
                let argc = args.len() as u8;
                if let ExprKind::Name(id) = &callee.kind {
                    if self.is_print(*id) {
                        for arg in args {
                            self.compile_expr(arg)?;
                        }
                        self.emit_byte_operand(OpCode::Print, argc, line);
                        return Ok(());
                    }
                }
                self.compile_expr(callee)?;
                for arg in args {
                    self.compile_expr(arg)?;
                }
                self.emit_byte_operand(OpCode::Call, argc, line);
            }
        }
        Ok(())
    }

    /// A name resolves to the innermost matching local, else to a global.
    fn compile_name_load(&mut self, name: StringId, line: u32) -> Result<(), CompileError> {
        if let Some(slot) = self.resolve_local(name) {
            self.emit_byte_operand(OpCode::GetLocal, slot, line);
        } else {
            let idx = self.constant_index(Value::Str(name), line)?;
            self.chunk.write_op(OpCode::GetGlobal, line);
            self.chunk.write_u16(idx, line);
        }
        Ok(())
    }

    fn compile_name_store(&mut self, name: StringId, line: u32) -> Result<(), CompileError> {
        if let Some(slot) = self.resolve_local(name) {
            self.emit_byte_operand(OpCode::SetLocal, slot, line);
        } else {
            let idx = self.constant_index(Value::Str(name), line)?;
            self.chunk.write_op(OpCode::SetGlobal, line);
            self.chunk.write_u16(idx, line);
        }
        Ok(())
    }

    // ---- Statements ----

    fn compile_block(&mut self, block: &Block) -> Result<(), CompileError> {
        for stmt in block {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    fn compile_scoped_block(&mut self, block: &Block, line: u32) -> Result<(), CompileError> {
        self.begin_scope();
        self.compile_block(block)?;
        let end_line = block.last().map(|s| s.line).unwrap_or(line);
        self.end_scope(end_line);
        Ok(())
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        let line = stmt.line;
        self.last_line = line;
        match &stmt.kind {
            StmtKind::Local { names, exprs } => self.compile_local(names, exprs, line),
            StmtKind::Assign { targets, values } => self.compile_assign(targets, values, line),
            StmtKind::If {
                conds,
                blocks,
                else_block,
            } => self.compile_if(conds, blocks, else_block.as_ref(), line),
            StmtKind::While { cond, body } => self.compile_while(cond, body, line),
            StmtKind::NumericFor {
                var,
                start,
                limit,
                step,
                body,
            } => self.compile_numeric_for(*var, start, limit, step.as_ref(), body, line),
            StmtKind::Repeat { body, cond } => self.compile_repeat(body, cond, line),
            StmtKind::Do(body) => self.compile_scoped_block(body, line),
            StmtKind::Return(exprs) => {
                // One return value at most.
                if let Some(first) = exprs.first() {
                    self.compile_expr(first)?;
                }
                self.emit(OpCode::Return, line);
                Ok(())
            }
            StmtKind::Break => self.compile_break(line),
            StmtKind::Expr(expr) => {
                self.compile_expr(expr)?;
                // A print call leaves nothing behind; anything else left
                // one unused value.
                let is_print_call = matches!(
                    &expr.kind,
                    ExprKind::Call { callee, .. }
                        if matches!(&callee.kind, ExprKind::Name(id) if self.is_print(*id))
                );
                if !is_print_call {
                    self.emit(OpCode::Pop, line);
                }
                Ok(())
            }
        }
    }

    /// Values stay on the stack; the compile-time local list records the
    /// slots. No pops.
    fn compile_local(
        &mut self,
        names: &[StringId],
        exprs: &[Expr],
        line: u32,
    ) -> Result<(), CompileError> {
        for expr in exprs {
            self.compile_expr(expr)?;
        }
        for _ in exprs.len()..names.len() {
            self.emit(OpCode::PushNil, line);
        }
        for _ in names.len()..exprs.len() {
            self.emit(OpCode::Pop, line);
        }
        for name in names {
            self.add_local(*name, line)?;
        }
        Ok(())
    }

    /// All values are emitted first, then targets are stored in reverse
    /// order so stack order matches target order.
    fn compile_assign(
        &mut self,
        targets: &[Expr],
        values: &[Expr],
        line: u32,
    ) -> Result<(), CompileError> {
        for value in values {
            self.compile_expr(value)?;
        }
        for _ in values.len()..targets.len() {
            self.emit(OpCode::PushNil, line);
        }
        for _ in targets.len()..values.len() {
            self.emit(OpCode::Pop, line);
        }
        for target in targets.iter().rev() {
            match &target.kind {
                ExprKind::Name(id) => self.compile_name_store(*id, target.line)?,
                // The parser only produces name targets.
                _ => unreachable!("non-name assignment target"),
            }
        }
        Ok(())
    }

    fn compile_if(
        &mut self,
        conds: &[Expr],
        blocks: &[Block],
        else_block: Option<&Block>,
        line: u32,
    ) -> Result<(), CompileError> {
        let mut end_jumps = Vec::new();

        for (cond, block) in conds.iter().zip(blocks) {
            self.compile_expr(cond)?;
            let next_branch = self.emit_jump(OpCode::JumpIfFalse, cond.line);
            // Taken branch: discard the condition, run the body, skip the
            // rest of the chain.
            self.emit(OpCode::Pop, cond.line);
            self.compile_scoped_block(block, cond.line)?;
            end_jumps.push(self.emit_jump(OpCode::Jump, cond.line));
            // False path lands on its own discard pop.
            self.patch_jump(next_branch, cond.line)?;
            self.emit(OpCode::Pop, cond.line);
        }

        if let Some(block) = else_block {
            self.compile_scoped_block(block, line)?;
        }

        for site in end_jumps {
            self.patch_jump(site, line)?;
        }
        Ok(())
    }

    fn compile_while(&mut self, cond: &Expr, body: &Block, line: u32) -> Result<(), CompileError> {
        let loop_start = self.chunk.len();
        self.compile_expr(cond)?;
        let exit = self.emit_jump(OpCode::JumpIfFalse, line);
        self.emit(OpCode::Pop, line);

        self.loops.push(LoopContext {
            break_sites: Vec::new(),
            locals_floor: self.locals.len(),
        });
        self.compile_scoped_block(body, line)?;
        self.emit_loop(loop_start, line)?;

        self.patch_jump(exit, line)?;
        // Discard the condition on the exit path; breaks land after it.
        self.emit(OpCode::Pop, line);
        self.patch_breaks(line)?;
        Ok(())
    }

    /// Numeric for. The control values live in three hidden slots whose
    /// names no source identifier can collide with; the loop variable is a
    /// fresh local pushed from the start slot on every iteration. The
    /// direction test is a runtime sign check of the step, so computed
    /// steps work.
    fn compile_numeric_for(
        &mut self,
        var: StringId,
        start: &Expr,
        limit: &Expr,
        step: Option<&Expr>,
        body: &Block,
        line: u32,
    ) -> Result<(), CompileError> {
        self.begin_scope();

        self.compile_expr(start)?;
        let start_name = self.strings.intern_or_create(b"(for start)");
        self.add_local(start_name, line)?;
        self.compile_expr(limit)?;
        let limit_name = self.strings.intern_or_create(b"(for limit)");
        self.add_local(limit_name, line)?;
        match step {
            Some(step) => self.compile_expr(step)?,
            None => self.emit_constant(Value::Integer(1), line)?,
        }
        let step_name = self.strings.intern_or_create(b"(for step)");
        self.add_local(step_name, line)?;

        let step_slot = (self.locals.len() - 1) as u8;
        let limit_slot = step_slot - 1;
        let start_slot = step_slot - 2;

        self.loops.push(LoopContext {
            break_sites: Vec::new(),
            locals_floor: self.locals.len(),
        });

        let loop_start = self.chunk.len();

        // start <= limit for a non-negative step, start >= limit otherwise.
        self.emit_byte_operand(OpCode::GetLocal, start_slot, line);
        self.emit_byte_operand(OpCode::GetLocal, limit_slot, line);
        self.emit_byte_operand(OpCode::GetLocal, step_slot, line);
        self.emit_constant(Value::Integer(0), line)?;
        self.emit(OpCode::Lt, line);
        let negative_step = self.emit_jump(OpCode::JumpIfTrue, line);
        self.emit(OpCode::Pop, line);
        self.emit(OpCode::Le, line);
        let join = self.emit_jump(OpCode::Jump, line);
        self.patch_jump(negative_step, line)?;
        self.emit(OpCode::Pop, line);
        self.emit(OpCode::Ge, line);
        self.patch_jump(join, line)?;

        let exit = self.emit_jump(OpCode::JumpIfFalse, line);
        self.emit(OpCode::Pop, line);

        // Expose the current start value under the user's name.
        self.emit_byte_operand(OpCode::GetLocal, start_slot, line);
        self.add_local(var, line)?;

        self.compile_scoped_block(body, line)?;

        // Drop the loop variable, step the start slot, and go again.
        self.emit(OpCode::Pop, line);
        self.locals.pop();
        self.emit_byte_operand(OpCode::GetLocal, start_slot, line);
        self.emit_byte_operand(OpCode::GetLocal, step_slot, line);
        self.emit(OpCode::Add, line);
        self.emit_byte_operand(OpCode::SetLocal, start_slot, line);
        self.emit_loop(loop_start, line)?;

        self.patch_jump(exit, line)?;
        self.emit(OpCode::Pop, line);
        self.patch_breaks(line)?;

        self.end_scope(line);
        Ok(())
    }

    /// The repeat scope spans both the body and the condition, so the
    /// condition sees body locals. The scope closes just before the
    /// back-branch; the exit path pops the same locals itself.
    fn compile_repeat(&mut self, body: &Block, cond: &Expr, line: u32) -> Result<(), CompileError> {
        let loop_start = self.chunk.len();
        self.begin_scope();
        self.loops.push(LoopContext {
            break_sites: Vec::new(),
            locals_floor: self.locals.len(),
        });

        self.compile_block(body)?;
        self.compile_expr(cond)?;

        let body_locals = self.locals.len()
            - self
                .loops
                .last()
                .map(|ctx| ctx.locals_floor)
                .unwrap_or(self.locals.len());

        let again = self.emit_jump(OpCode::JumpIfFalse, cond.line);
        // Truthy: discard the condition and the body locals, then exit.
        self.emit(OpCode::Pop, cond.line);
        for _ in 0..body_locals {
            self.emit(OpCode::Pop, cond.line);
        }
        let exit = self.emit_jump(OpCode::Jump, cond.line);

        // Falsy: discard the condition, close the scope, loop back.
        self.patch_jump(again, cond.line)?;
        self.emit(OpCode::Pop, cond.line);
        self.end_scope(cond.line);
        self.emit_loop(loop_start, cond.line)?;

        self.patch_jump(exit, cond.line)?;
        self.patch_breaks(line)?;
        Ok(())
    }

    /// Pop everything above the enclosing loop's floor, then jump to its
    /// exit. The compile-time list is untouched: the scope machinery still
    /// owns those entries on the fall-through path.
    fn compile_break(&mut self, line: u32) -> Result<(), CompileError> {
        let floor = match self.loops.last() {
            Some(ctx) => ctx.locals_floor,
            None => {
                return Err(CompileError {
                    kind: CompileErrorKind::BreakOutsideLoop,
                    line,
                })
            }
        };
        for _ in floor..self.locals.len() {
            self.emit(OpCode::Pop, line);
        }
        let site = self.emit_jump(OpCode::Jump, line);
        if let Some(ctx) = self.loops.last_mut() {
            ctx.break_sites.push(site);
        }
        Ok(())
    }

    /// Patch every break in the innermost loop to land here, and close
    /// that loop context.
    fn patch_breaks(&mut self, line: u32) -> Result<(), CompileError> {
        let ctx = match self.loops.pop() {
            Some(ctx) => ctx,
            None => return Ok(()),
        };
        for site in ctx.break_sites {
            self.patch_jump(site, line)?;
        }
        Ok(())
    }
}

fn binary_opcode(op: BinOp) -> OpCode {
    match op {
        BinOp::Add => OpCode::Add,
        BinOp::Sub => OpCode::Sub,
        BinOp::Mul => OpCode::Mul,
        BinOp::Div => OpCode::Div,
        BinOp::IDiv => OpCode::IDiv,
        BinOp::Mod => OpCode::Mod,
        BinOp::Pow => OpCode::Pow,
        BinOp::Concat => OpCode::Concat,
        BinOp::Shl => OpCode::Shl,
        BinOp::Shr => OpCode::Shr,
        BinOp::BAnd => OpCode::BAnd,
        BinOp::BOr => OpCode::BOr,
        BinOp::BXor => OpCode::BXor,
        BinOp::Eq => OpCode::Eq,
        BinOp::NotEq => OpCode::Ne,
        BinOp::Lt => OpCode::Lt,
        BinOp::LtEq => OpCode::Le,
        BinOp::Gt => OpCode::Gt,
        BinOp::GtEq => OpCode::Ge,
        BinOp::And | BinOp::Or => unreachable!("short-circuit operators have no opcode"),
    }
}
