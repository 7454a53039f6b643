/// Owned abstract syntax tree.
///
/// Subtrees are exclusively owned by their parent node; dropping a
/// statement releases every descendant. Each node records the line of its
/// introducing token for the chunk line map.
use lupine_core::string::StringId;

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
    BNot,
    Len,
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Mod,
    Pow,
    Concat,
    Shl,
    Shr,
    BAnd,
    BOr,
    BXor,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Nil,
    True,
    False,
    Integer(i64),
    Float(f64),
    Str(StringId),
    Name(StringId),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `local` name-list [`=` expr-list]. The lists may differ in length.
    Local {
        names: Vec<StringId>,
        exprs: Vec<Expr>,
    },
    /// target-list `=` expr-list. Targets are names.
    Assign {
        targets: Vec<Expr>,
        values: Vec<Expr>,
    },
    /// `if`/`elseif` chains: parallel condition and body lists.
    If {
        conds: Vec<Expr>,
        blocks: Vec<Block>,
        else_block: Option<Block>,
    },
    While {
        cond: Expr,
        body: Block,
    },
    /// Numeric `for name = start, limit [, step] do body end`.
    NumericFor {
        var: StringId,
        start: Expr,
        limit: Expr,
        step: Option<Expr>,
        body: Block,
    },
    Repeat {
        body: Block,
        cond: Expr,
    },
    Do(Block),
    Return(Vec<Expr>),
    Break,
    Expr(Expr),
}

/// An ordered sequence of statements.
pub type Block = Vec<Stmt>;
