//! Lexer for the expression language.
//!
//! Token rules:
//! - numbers: decimal digits with an optional fractional part (`3`, `3.`, `3.25`)
//! - strings: single- or double-quoted, no escapes
//! - identifiers: `[A-Za-z_][A-Za-z0-9_.]*`, so dotted paths are one token
//! - operators: longest match of `=== !== <= >= && || + - * / % < > !`
//! - `(`, `)`, `,`; whitespace is skipped
//!
//! Positions are byte offsets into the source string.

use std::fmt;

use super::error::ExprError;

/// Operators recognized by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    StrictEq,
    StrictNe,
    Le,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    Not,
}

impl Operator {
    /// Binding strength; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::StrictEq | Operator::StrictNe => 3,
            Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge => 4,
            Operator::Add | Operator::Sub => 5,
            Operator::Mul | Operator::Div | Operator::Rem => 6,
            Operator::Not => 7,
        }
    }

    /// Source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::StrictEq => "===",
            Operator::StrictNe => "!==",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Not => "!",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// Longest spellings first so `===` wins over `=` prefixes and `<=` over `<`.
const OPERATORS: [(&str, Operator); 14] = [
    ("===", Operator::StrictEq),
    ("!==", Operator::StrictNe),
    ("<=", Operator::Le),
    (">=", Operator::Ge),
    ("&&", Operator::And),
    ("||", Operator::Or),
    ("+", Operator::Add),
    ("-", Operator::Sub),
    ("*", Operator::Mul),
    ("/", Operator::Div),
    ("%", Operator::Rem),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("!", Operator::Not),
];

/// Token payload.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    Op(Operator),
    LParen,
    RParen,
    Comma,
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Str(s) => write!(f, "string '{}'", s),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Op(op) => write!(f, "operator '{}'", op),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::End => f.write_str("end of input"),
        }
    }
}

/// A token and where it starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Split an expression into tokens. The result always ends with `End`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let kind = if c.is_ascii_digit() {
            pos = scan_while(bytes, pos, |b| b.is_ascii_digit());
            if bytes.get(pos) == Some(&b'.') {
                pos = scan_while(bytes, pos + 1, |b| b.is_ascii_digit());
            }
            let text = &source[start..pos];
            let value = text.parse::<f64>().map_err(|_| ExprError::InvalidNumber {
                text: text.to_string(),
            })?;
            TokenKind::Number(value)
        } else if c == b'\'' || c == b'"' {
            let Some(len) = source[start + 1..].find(c as char) else {
                return Err(ExprError::Lex { ch: c as char, position: start });
            };
            pos = start + 1 + len + 1;
            TokenKind::Str(source[start + 1..start + 1 + len].to_string())
        } else if c.is_ascii_alphabetic() || c == b'_' {
            pos = scan_while(bytes, pos, |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
            TokenKind::Ident(source[start..pos].to_string())
        } else if c == b'(' {
            pos += 1;
            TokenKind::LParen
        } else if c == b')' {
            pos += 1;
            TokenKind::RParen
        } else if c == b',' {
            pos += 1;
            TokenKind::Comma
        } else if let Some((symbol, op)) = OPERATORS
            .iter()
            .find(|(symbol, _)| source[start..].starts_with(symbol))
        {
            pos += symbol.len();
            TokenKind::Op(*op)
        } else {
            let ch = source[start..].chars().next().unwrap_or('\0');
            return Err(ExprError::Lex { ch, position: start });
        };

        tokens.push(Token { kind, position: start });
    }

    tokens.push(Token {
        kind: TokenKind::End,
        position: bytes.len(),
    });
    Ok(tokens)
}

fn scan_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}
