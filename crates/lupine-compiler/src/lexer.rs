use crate::token::{Token, TokenKind};
use std::fmt;

/// What went wrong while scanning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    UnexpectedCharacter(u8),
    UnterminatedString,
    UnterminatedLongBracket,
    InvalidNumber,
}

/// Scanner error with 1-based source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: ", self.line, self.column)?;
        match self.kind {
            LexErrorKind::UnexpectedCharacter(ch) => {
                if ch.is_ascii_graphic() || ch == b' ' {
                    write!(f, "unexpected symbol near '{}'", ch as char)
                } else {
                    write!(f, "unexpected symbol near '<\\{ch}>'")
                }
            }
            LexErrorKind::UnterminatedString => write!(f, "unfinished string"),
            LexErrorKind::UnterminatedLongBracket => write!(f, "unfinished long string"),
            LexErrorKind::InvalidNumber => write!(f, "malformed number"),
        }
    }
}

impl std::error::Error for LexError {}

/// Scan the whole source into a token sequence terminated by `Eof`.
///
/// Lexemes are views into `source`; nothing is copied or decoded here.
pub fn tokenize(source: &[u8]) -> Result<Vec<Token<'_>>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.scan_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Single-pass scanner over source bytes.
struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src [u8]) -> Self {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance_char(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(ch) = self.peek() {
                if ch == b' ' || ch == b'\t' || ch == b'\r' || ch == b'\n' {
                    self.advance_char();
                } else {
                    break;
                }
            }

            if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'-') {
                self.advance_char();
                self.advance_char();
                if let Some(level) = self.check_long_bracket() {
                    // Long comment. An unterminated one silently runs to
                    // end of input.
                    self.skip_long_bracket_open(level);
                    self.skip_long_bracket_content(level);
                    continue;
                }
                // Short comment: to end of line.
                while let Some(ch) = self.peek() {
                    if ch == b'\n' {
                        break;
                    }
                    self.advance_char();
                }
                continue;
            }

            break;
        }
    }

    /// If the current position starts a long bracket `[=*[`, return its level.
    fn check_long_bracket(&self) -> Option<usize> {
        if self.peek() != Some(b'[') {
            return None;
        }
        let mut level = 0;
        let mut offset = 1;
        while self.peek_at(offset) == Some(b'=') {
            level += 1;
            offset += 1;
        }
        if self.peek_at(offset) == Some(b'[') {
            Some(level)
        } else {
            None
        }
    }

    fn check_closing_long_bracket(&self, level: usize) -> bool {
        if self.peek() != Some(b']') {
            return false;
        }
        let mut offset = 1;
        for _ in 0..level {
            if self.peek_at(offset) != Some(b'=') {
                return false;
            }
            offset += 1;
        }
        self.peek_at(offset) == Some(b']')
    }

    fn skip_long_bracket_open(&mut self, level: usize) {
        for _ in 0..level + 2 {
            self.advance_char();
        }
    }

    /// Consume up to and including the matching `]=*]`. Returns false if
    /// the input ran out first.
    fn skip_long_bracket_content(&mut self, level: usize) -> bool {
        loop {
            if self.peek().is_none() {
                return false;
            }
            if self.check_closing_long_bracket(level) {
                for _ in 0..level + 2 {
                    self.advance_char();
                }
                return true;
            }
            self.advance_char();
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize, line: u32, column: u32) -> Token<'src> {
        Token {
            kind,
            lexeme: &self.source[start..self.pos],
            line,
            column,
        }
    }

    fn scan_token(&mut self) -> Result<Token<'src>, LexError> {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let line = self.line;
        let column = self.column;

        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    lexeme: &self.source[self.pos..self.pos],
                    line,
                    column,
                })
            }
        };

        let simple = |lexer: &mut Self, kind: TokenKind| -> Result<Token<'src>, LexError> {
            lexer.advance_char();
            Ok(lexer.make_token(kind, start, line, column))
        };

        match ch {
            b'+' => simple(self, TokenKind::Plus),
            b'-' => simple(self, TokenKind::Minus),
            b'*' => simple(self, TokenKind::Star),
            b'%' => simple(self, TokenKind::Percent),
            b'^' => simple(self, TokenKind::Caret),
            b'#' => simple(self, TokenKind::Hash),
            b'&' => simple(self, TokenKind::Ampersand),
            b'|' => simple(self, TokenKind::Pipe),
            b'(' => simple(self, TokenKind::LParen),
            b')' => simple(self, TokenKind::RParen),
            b'{' => simple(self, TokenKind::LBrace),
            b'}' => simple(self, TokenKind::RBrace),
            b']' => simple(self, TokenKind::RBracket),
            b';' => simple(self, TokenKind::Semi),
            b',' => simple(self, TokenKind::Comma),
            b'/' => {
                self.advance_char();
                if self.peek() == Some(b'/') {
                    self.advance_char();
                    Ok(self.make_token(TokenKind::FloorDiv, start, line, column))
                } else {
                    Ok(self.make_token(TokenKind::Slash, start, line, column))
                }
            }
            b'=' => {
                self.advance_char();
                if self.peek() == Some(b'=') {
                    self.advance_char();
                    Ok(self.make_token(TokenKind::Equal, start, line, column))
                } else {
                    Ok(self.make_token(TokenKind::Assign, start, line, column))
                }
            }
            b'~' => {
                self.advance_char();
                if self.peek() == Some(b'=') {
                    self.advance_char();
                    Ok(self.make_token(TokenKind::NotEqual, start, line, column))
                } else {
                    Ok(self.make_token(TokenKind::Tilde, start, line, column))
                }
            }
            b'<' => {
                self.advance_char();
                match self.peek() {
                    Some(b'<') => {
                        self.advance_char();
                        Ok(self.make_token(TokenKind::ShiftLeft, start, line, column))
                    }
                    Some(b'=') => {
                        self.advance_char();
                        Ok(self.make_token(TokenKind::LessEq, start, line, column))
                    }
                    _ => Ok(self.make_token(TokenKind::Less, start, line, column)),
                }
            }
            b'>' => {
                self.advance_char();
                match self.peek() {
                    Some(b'>') => {
                        self.advance_char();
                        Ok(self.make_token(TokenKind::ShiftRight, start, line, column))
                    }
                    Some(b'=') => {
                        self.advance_char();
                        Ok(self.make_token(TokenKind::GreaterEq, start, line, column))
                    }
                    _ => Ok(self.make_token(TokenKind::Greater, start, line, column)),
                }
            }
            b':' => {
                self.advance_char();
                if self.peek() == Some(b':') {
                    self.advance_char();
                    Ok(self.make_token(TokenKind::DoubleColon, start, line, column))
                } else {
                    Ok(self.make_token(TokenKind::Colon, start, line, column))
                }
            }
            b'.' => {
                self.advance_char();
                if self.peek() == Some(b'.') {
                    self.advance_char();
                    if self.peek() == Some(b'.') {
                        self.advance_char();
                        Ok(self.make_token(TokenKind::DotDotDot, start, line, column))
                    } else {
                        Ok(self.make_token(TokenKind::DotDot, start, line, column))
                    }
                } else if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    // Number starting with a dot: always a float.
                    self.scan_fraction_and_exponent(line, column)?;
                    self.check_number_boundary(line, column)?;
                    Ok(self.make_token(TokenKind::Float, start, line, column))
                } else {
                    Ok(self.make_token(TokenKind::Dot, start, line, column))
                }
            }
            b'[' => {
                if let Some(level) = self.check_long_bracket() {
                    self.skip_long_bracket_open(level);
                    if !self.skip_long_bracket_content(level) {
                        return Err(LexError {
                            kind: LexErrorKind::UnterminatedLongBracket,
                            line,
                            column,
                        });
                    }
                    Ok(self.make_token(TokenKind::Str, start, line, column))
                } else {
                    simple(self, TokenKind::LBracket)
                }
            }
            b'"' | b'\'' => self.scan_short_string(start, line, column),
            b'0'..=b'9' => self.scan_number(start, line, column),
            _ if is_ident_start(ch) => Ok(self.scan_name(start, line, column)),
            _ => {
                self.advance_char();
                Err(LexError { kind: LexErrorKind::UnexpectedCharacter(ch), line, column })
            }
        }
    }

    fn scan_name(&mut self, start: usize, line: u32, column: u32) -> Token<'src> {
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                self.advance_char();
            } else {
                break;
            }
        }
        let lexeme = &self.source[start..self.pos];
        let kind = TokenKind::keyword_from_bytes(lexeme).unwrap_or(TokenKind::Name);
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }

    fn scan_number(&mut self, start: usize, line: u32, column: u32) -> Result<Token<'src>, LexError> {
        if self.peek() == Some(b'0') && self.peek_at(1).is_some_and(|c| c == b'x' || c == b'X') {
            self.advance_char();
            self.advance_char();
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance_char();
            }
            if self.pos == digits_start {
                return Err(LexError { kind: LexErrorKind::InvalidNumber, line, column });
            }
            self.check_number_boundary(line, column)?;
            // Hex literals are integer-only.
            return Ok(self.make_token(TokenKind::Integer, start, line, column));
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
        }

        let mut is_float = false;

        // Fractional part. `3..4` is `3` followed by the concat operator,
        // so a dot directly before another dot is not consumed.
        if self.peek() == Some(b'.') && self.peek_at(1) != Some(b'.') {
            is_float = true;
            self.advance_char();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance_char();
            }
        }

        if self.peek().is_some_and(|c| c == b'e' || c == b'E') {
            is_float = true;
            self.scan_exponent(line, column)?;
        }

        self.check_number_boundary(line, column)?;

        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        Ok(self.make_token(kind, start, line, column))
    }

    /// Digits (after a leading dot) plus an optional exponent.
    fn scan_fraction_and_exponent(&mut self, line: u32, column: u32) -> Result<(), LexError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
        }
        if self.peek().is_some_and(|c| c == b'e' || c == b'E') {
            self.scan_exponent(line, column)?;
        }
        Ok(())
    }

    /// Consume `e`/`E`, an optional sign, and at least one digit.
    fn scan_exponent(&mut self, line: u32, column: u32) -> Result<(), LexError> {
        self.advance_char();
        if self.peek().is_some_and(|c| c == b'+' || c == b'-') {
            self.advance_char();
        }
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
        }
        if self.pos == digits_start {
            return Err(LexError { kind: LexErrorKind::InvalidNumber, line, column });
        }
        Ok(())
    }

    /// A letter or underscore directly after a number is malformed.
    fn check_number_boundary(&self, line: u32, column: u32) -> Result<(), LexError> {
        if self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == b'_') {
            return Err(LexError { kind: LexErrorKind::InvalidNumber, line, column });
        }
        Ok(())
    }

    fn scan_short_string(
        &mut self,
        start: usize,
        line: u32,
        column: u32,
    ) -> Result<Token<'src>, LexError> {
        let quote = self.advance_char().unwrap_or(b'"');
        loop {
            match self.peek() {
                None => return Err(LexError { kind: LexErrorKind::UnterminatedString, line, column }),
                Some(b'\n') => {
                    return Err(LexError { kind: LexErrorKind::UnterminatedString, line, column })
                }
                Some(b'\\') => {
                    // Backslash escapes the next byte; the parser decides
                    // the logical content.
                    self.advance_char();
                    if self.advance_char().is_none() {
                        return Err(LexError { kind: LexErrorKind::UnterminatedString, line, column });
                    }
                }
                Some(ch) if ch == quote => {
                    self.advance_char();
                    return Ok(self.make_token(TokenKind::Str, start, line, column));
                }
                Some(_) => {
                    self.advance_char();
                }
            }
        }
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}
