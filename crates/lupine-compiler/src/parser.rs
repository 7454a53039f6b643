use crate::ast::{BinOp, Block, Expr, ExprKind, Stmt, StmtKind, UnOp};
use crate::token::{Token, TokenKind};
use lupine_core::string::{StringId, StringInterner};
use std::fmt;

/// What went wrong while parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken { found: String },
    ExpectedExpression { found: String },
    ExpectedToken { expected: TokenKind, found: String },
}

/// Parser error with 1-based source position.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: ", self.line, self.column)?;
        match &self.kind {
            ParseErrorKind::UnexpectedToken { found } => {
                write!(f, "syntax error near '{found}'")
            }
            ParseErrorKind::ExpectedExpression { found } => {
                write!(f, "expected expression near '{found}'")
            }
            ParseErrorKind::ExpectedToken { expected, found } => {
                write!(f, "'{expected}' expected near '{found}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Unary operators bind tighter than every binary operator except `^`.
const UNARY_PRIORITY: u8 = 12;

/// Left/right binding priority of a binary operator token. A right
/// priority below the left one makes the operator right-associative.
fn binary_op(kind: TokenKind) -> Option<(BinOp, u8, u8)> {
    let entry = match kind {
        TokenKind::Or => (BinOp::Or, 1, 1),
        TokenKind::And => (BinOp::And, 2, 2),
        TokenKind::Equal => (BinOp::Eq, 3, 3),
        TokenKind::NotEqual => (BinOp::NotEq, 3, 3),
        TokenKind::Less => (BinOp::Lt, 3, 3),
        TokenKind::Greater => (BinOp::Gt, 3, 3),
        TokenKind::LessEq => (BinOp::LtEq, 3, 3),
        TokenKind::GreaterEq => (BinOp::GtEq, 3, 3),
        TokenKind::Pipe => (BinOp::BOr, 4, 4),
        TokenKind::Tilde => (BinOp::BXor, 5, 5),
        TokenKind::Ampersand => (BinOp::BAnd, 6, 6),
        TokenKind::ShiftLeft => (BinOp::Shl, 7, 7),
        TokenKind::ShiftRight => (BinOp::Shr, 7, 7),
        TokenKind::DotDot => (BinOp::Concat, 9, 8),
        TokenKind::Plus => (BinOp::Add, 10, 10),
        TokenKind::Minus => (BinOp::Sub, 10, 10),
        TokenKind::Star => (BinOp::Mul, 11, 11),
        TokenKind::Slash => (BinOp::Div, 11, 11),
        TokenKind::FloorDiv => (BinOp::IDiv, 11, 11),
        TokenKind::Percent => (BinOp::Mod, 11, 11),
        TokenKind::Caret => (BinOp::Pow, 14, 13),
        _ => return None,
    };
    Some(entry)
}

fn unary_op(kind: TokenKind) -> Option<UnOp> {
    match kind {
        TokenKind::Minus => Some(UnOp::Neg),
        TokenKind::Not => Some(UnOp::Not),
        TokenKind::Tilde => Some(UnOp::BNot),
        TokenKind::Hash => Some(UnOp::Len),
        _ => None,
    }
}

/// Parse a token sequence into a block. Names and string literal contents
/// are interned into `strings`.
pub fn parse(tokens: &[Token], strings: &mut StringInterner) -> Result<Block, ParseError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        strings,
    };
    let block = parser.parse_block()?;
    if parser.current().kind != TokenKind::Eof {
        return Err(parser.unexpected());
    }
    Ok(block)
}

struct Parser<'t, 'src> {
    tokens: &'t [Token<'src>],
    pos: usize,
    strings: &'t mut StringInterner,
}

impl<'t, 'src> Parser<'t, 'src> {
    fn current(&self) -> &Token<'src> {
        // The scanner guarantees a trailing Eof token.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token<'src> {
        let tok = *self.current();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn test_next(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Text for "near '...'" in error messages.
    fn near(&self) -> String {
        let tok = self.current();
        if tok.lexeme.is_empty() {
            tok.kind.to_string()
        } else {
            tok.text().into_owned()
        }
    }

    fn unexpected(&self) -> ParseError {
        let tok = self.current();
        ParseError {
            kind: ParseErrorKind::UnexpectedToken { found: self.near() },
            line: tok.line,
            column: tok.column,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let tok = self.current();
            Err(ParseError {
                kind: ParseErrorKind::ExpectedToken {
                    expected: kind,
                    found: self.near(),
                },
                line: tok.line,
                column: tok.column,
            })
        }
    }

    fn expect_name(&mut self) -> Result<StringId, ParseError> {
        let tok = *self.current();
        if tok.kind != TokenKind::Name {
            return Err(ParseError {
                kind: ParseErrorKind::ExpectedToken {
                    expected: TokenKind::Name,
                    found: self.near(),
                },
                line: tok.line,
                column: tok.column,
            });
        }
        self.advance();
        Ok(self.strings.intern_or_create(tok.lexeme))
    }

    // ---- Statements ----

    fn block_ends(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::End
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::Until
                | TokenKind::Eof
        )
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut stmts = Vec::new();
        loop {
            if self.test_next(TokenKind::Semi) {
                continue;
            }
            if self.block_ends() {
                return Ok(stmts);
            }
            stmts.push(self.parse_statement()?);
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let tok = *self.current();
        let line = tok.line;
        let kind = match tok.kind {
            TokenKind::Local => self.parse_local()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Repeat => self.parse_repeat()?,
            TokenKind::Do => {
                self.advance();
                let body = self.parse_block()?;
                self.expect(TokenKind::End)?;
                StmtKind::Do(body)
            }
            TokenKind::Return => self.parse_return()?,
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            _ => self.parse_expr_statement()?,
        };
        Ok(Stmt { kind, line })
    }

    fn parse_local(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let mut names = vec![self.expect_name()?];
        while self.test_next(TokenKind::Comma) {
            names.push(self.expect_name()?);
        }
        let exprs = if self.test_next(TokenKind::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        Ok(StmtKind::Local { names, exprs })
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let mut conds = Vec::new();
        let mut blocks = Vec::new();

        conds.push(self.parse_expression()?);
        self.expect(TokenKind::Then)?;
        blocks.push(self.parse_block()?);

        while self.test_next(TokenKind::ElseIf) {
            conds.push(self.parse_expression()?);
            self.expect(TokenKind::Then)?;
            blocks.push(self.parse_block()?);
        }

        let else_block = if self.test_next(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        self.expect(TokenKind::End)?;

        Ok(StmtKind::If {
            conds,
            blocks,
            else_block,
        })
    }

    fn parse_while(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block()?;
        self.expect(TokenKind::End)?;
        Ok(StmtKind::While { cond, body })
    }

    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let var = self.expect_name()?;
        self.expect(TokenKind::Assign)?;
        let start = self.parse_expression()?;
        self.expect(TokenKind::Comma)?;
        let limit = self.parse_expression()?;
        let step = if self.test_next(TokenKind::Comma) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Do)?;
        let body = self.parse_block()?;
        self.expect(TokenKind::End)?;
        Ok(StmtKind::NumericFor {
            var,
            start,
            limit,
            step,
            body,
        })
    }

    fn parse_repeat(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let body = self.parse_block()?;
        self.expect(TokenKind::Until)?;
        let cond = self.parse_expression()?;
        Ok(StmtKind::Repeat { body, cond })
    }

    fn parse_return(&mut self) -> Result<StmtKind, ParseError> {
        self.advance();
        let exprs = if self.block_ends() || self.check(TokenKind::Semi) {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        Ok(StmtKind::Return(exprs))
    }

    /// A statement that starts with an expression is an assignment when a
    /// `=` or `,` follows; otherwise it is an expression statement.
    fn parse_expr_statement(&mut self) -> Result<StmtKind, ParseError> {
        let first = self.parse_expression()?;

        if self.check(TokenKind::Assign) || self.check(TokenKind::Comma) {
            let mut targets = vec![first];
            while self.test_next(TokenKind::Comma) {
                targets.push(self.parse_expression()?);
            }
            // Only names are assignable.
            for target in &targets {
                if !matches!(target.kind, ExprKind::Name(_)) {
                    return Err(self.unexpected());
                }
            }
            self.expect(TokenKind::Assign)?;
            let values = self.parse_expr_list()?;
            return Ok(StmtKind::Assign { targets, values });
        }

        Ok(StmtKind::Expr(first))
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expression()?];
        while self.test_next(TokenKind::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    // ---- Expressions ----

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(0)
    }

    /// Precedence climbing: consume binary operators while their left
    /// priority exceeds `limit`. Right-associative operators recurse with a
    /// right priority one below their left, so the same operator chains.
    fn parse_binary(&mut self, limit: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some((op, left_prio, right_prio)) = binary_op(self.current().kind) {
            if left_prio <= limit {
                break;
            }
            let line = self.current().line;
            self.advance();
            let rhs = self.parse_binary(right_prio)?;
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(left),
                    rhs: Box::new(rhs),
                },
                line,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = unary_op(self.current().kind) {
            let line = self.current().line;
            self.advance();
            let operand = self.parse_binary(UNARY_PRIORITY)?;
            return Ok(Expr {
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                line,
            });
        }
        self.parse_suffixed()
    }

    /// Primary expression followed by any number of call suffixes, so
    /// `f(a)(b)` stays well-formed.
    fn parse_suffixed(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        while self.check(TokenKind::LParen) {
            let line = self.current().line;
            self.advance();
            let mut args = Vec::new();
            if !self.check(TokenKind::RParen) {
                args = self.parse_expr_list()?;
            }
            self.expect(TokenKind::RParen)?;
            expr = Expr {
                kind: ExprKind::Call {
                    callee: Box::new(expr),
                    args,
                },
                line,
            };
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = *self.current();
        let line = tok.line;
        let kind = match tok.kind {
            TokenKind::Nil => {
                self.advance();
                ExprKind::Nil
            }
            TokenKind::True => {
                self.advance();
                ExprKind::True
            }
            TokenKind::False => {
                self.advance();
                ExprKind::False
            }
            TokenKind::Integer => {
                self.advance();
                self.decode_integer(&tok)?
            }
            TokenKind::Float => {
                self.advance();
                self.decode_float(&tok)?
            }
            TokenKind::Str => {
                self.advance();
                ExprKind::Str(self.decode_string(&tok))
            }
            TokenKind::Name => {
                self.advance();
                ExprKind::Name(self.strings.intern_or_create(tok.lexeme))
            }
            TokenKind::LParen => {
                self.advance();
                // Parentheses reset the minimum precedence.
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                inner.kind
            }
            _ => {
                return Err(ParseError {
                    kind: ParseErrorKind::ExpectedExpression { found: self.near() },
                    line: tok.line,
                    column: tok.column,
                })
            }
        };
        Ok(Expr { kind, line })
    }

    // ---- Literal decoding ----

    /// Decimal integers parse as signed 64-bit; a literal too large for
    /// i64 falls back to a float. Hex literals wrap.
    fn decode_integer(&self, tok: &Token) -> Result<ExprKind, ParseError> {
        let text = std::str::from_utf8(tok.lexeme).unwrap_or("");
        if let Some(hex) = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
        {
            let mut val: u64 = 0;
            for ch in hex.bytes() {
                val = val.wrapping_mul(16).wrapping_add(hex_value(ch) as u64);
            }
            return Ok(ExprKind::Integer(val as i64));
        }
        match text.parse::<i64>() {
            Ok(i) => Ok(ExprKind::Integer(i)),
            Err(_) => match text.parse::<f64>() {
                Ok(f) => Ok(ExprKind::Float(f)),
                Err(_) => Err(self.bad_literal(tok)),
            },
        }
    }

    fn decode_float(&self, tok: &Token) -> Result<ExprKind, ParseError> {
        let text = std::str::from_utf8(tok.lexeme).unwrap_or("");
        match text.parse::<f64>() {
            Ok(f) => Ok(ExprKind::Float(f)),
            Err(_) => Err(self.bad_literal(tok)),
        }
    }

    fn bad_literal(&self, tok: &Token) -> ParseError {
        ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                found: tok.text().into_owned(),
            },
            line: tok.line,
            column: tok.column,
        }
    }

    /// Strip the delimiters off a string lexeme and intern its contents.
    ///
    /// Quoted strings decode single-byte escapes; an unknown escape passes
    /// the escaped byte through unchanged. Long-bracket strings are
    /// verbatim except for one stripped leading newline.
    fn decode_string(&mut self, tok: &Token) -> StringId {
        let lexeme = tok.lexeme;
        if lexeme.first() == Some(&b'[') {
            let level = lexeme[1..].iter().take_while(|&&b| b == b'=').count();
            let open = level + 2;
            let mut content = &lexeme[open..lexeme.len() - open];
            if content.first() == Some(&b'\n') {
                content = &content[1..];
            }
            return self.strings.intern_or_create(content);
        }

        let body = &lexeme[1..lexeme.len() - 1];
        let mut buf = Vec::with_capacity(body.len());
        let mut iter = body.iter().copied();
        while let Some(ch) = iter.next() {
            if ch != b'\\' {
                buf.push(ch);
                continue;
            }
            match iter.next() {
                Some(b'a') => buf.push(0x07),
                Some(b'b') => buf.push(0x08),
                Some(b'f') => buf.push(0x0C),
                Some(b'n') => buf.push(b'\n'),
                Some(b'r') => buf.push(b'\r'),
                Some(b't') => buf.push(b'\t'),
                Some(b'v') => buf.push(0x0B),
                Some(other) => buf.push(other),
                None => {}
            }
        }
        self.strings.intern_or_create(&buf)
    }
}

fn hex_value(ch: u8) -> u8 {
    match ch {
        b'0'..=b'9' => ch - b'0',
        b'a'..=b'f' => ch - b'a' + 10,
        b'A'..=b'F' => ch - b'A' + 10,
        _ => 0,
    }
}
