use num_traits::Num;
use thiserror::Error;

use crate::instructions::{by_mnemonic, InstrDesc, Syntax};
use crate::program::Program;

/// Positional parse failure. Rendering the offending line with a caret is
/// the caller's job; the library only reports where and what.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based source line.
    pub line: usize,
    /// 0-based character column within the line.
    pub col: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("'{0}' is not a valid 32-bit number")]
    BadNumber(String),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of line, expected {0}")]
    UnexpectedEol(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Reg(u32),
    Num(i64),
    Name(String),
    Colon,
    Comma,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Reg(r) => format!("register ${r}"),
            Token::Num(n) => format!("number {n}"),
            Token::Name(n) => format!("'{n}'"),
            Token::Colon => "':'".into(),
            Token::Comma => "','".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
        }
    }
}

/// Integer literal in any of the radices the assembler accepts: `0x` hex,
/// `0b` binary, `0o` or leading-zero octal, decimal, optionally signed.
fn parse_int(tok: &str) -> Option<i64> {
    let (neg, rest) = match tok.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, tok.strip_prefix('+').unwrap_or(tok)),
    };
    let (radix, digits) = if let Some(h) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, h)
    } else if let Some(b) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2, b)
    } else if let Some(o) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8, o)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };
    if digits.is_empty() {
        return None;
    }
    let val = <i64 as Num>::from_str_radix(digits, radix).ok()?;
    Some(if neg { -val } else { val })
}

fn tokenize(line: &str, lineno: usize) -> Result<Vec<(usize, Token)>, ParseError> {
    let chars: Vec<char> = line.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let col = i;
        let err = |kind| ParseError {
            line: lineno,
            col,
            kind,
        };
        match c {
            // Comment runs to end of line.
            ';' => break,
            ',' => {
                toks.push((col, Token::Comma));
                i += 1;
            }
            ':' => {
                toks.push((col, Token::Colon));
                i += 1;
            }
            '(' => {
                toks.push((col, Token::LParen));
                i += 1;
            }
            ')' => {
                toks.push((col, Token::RParen));
                i += 1;
            }
            '$' => {
                // A register is '$' and one or two digits; a third digit
                // starts a new token and the grammar rejects it.
                i += 1;
                let mut val = 0u32;
                let mut digits = 0;
                while i < chars.len() && digits < 2 && chars[i].is_ascii_digit() {
                    val = val * 10 + (chars[i] as u32 - '0' as u32);
                    i += 1;
                    digits += 1;
                }
                if digits == 0 {
                    return Err(err(ParseErrorKind::UnexpectedChar('$')));
                }
                toks.push((col, Token::Reg(val)));
            }
            _ if c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    name.push(chars[i]);
                    i += 1;
                }
                toks.push((col, Token::Name(name)));
            }
            _ if c.is_ascii_digit() || c == '-' || c == '+' => {
                let mut tok = String::from(c);
                i += 1;
                if (c == '-' || c == '+') && !(i < chars.len() && chars[i].is_ascii_digit()) {
                    return Err(err(ParseErrorKind::UnexpectedChar(c)));
                }
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    tok.push(chars[i]);
                    i += 1;
                }
                let val = parse_int(&tok)
                    .ok_or_else(|| err(ParseErrorKind::BadNumber(tok.clone())))?;
                // The original bounds literals to 32-bit signed values.
                if val < i32::MIN as i64 || val > i32::MAX as i64 {
                    return Err(err(ParseErrorKind::BadNumber(tok)));
                }
                toks.push((col, Token::Num(val)));
            }
            _ => return Err(err(ParseErrorKind::UnexpectedChar(c))),
        }
    }
    Ok(toks)
}

struct Cursor {
    toks: Vec<(usize, Token)>,
    pos: usize,
    line: usize,
    eol_col: usize,
}

impl Cursor {
    fn next(&mut self) -> Option<(usize, Token)> {
        let t = self.toks.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn unexpected(&self, col: usize, expected: &'static str, found: &Token) -> ParseError {
        ParseError {
            line: self.line,
            col,
            kind: ParseErrorKind::UnexpectedToken {
                expected,
                found: found.describe(),
            },
        }
    }

    fn eol(&self, expected: &'static str) -> ParseError {
        ParseError {
            line: self.line,
            col: self.eol_col,
            kind: ParseErrorKind::UnexpectedEol(expected),
        }
    }

    fn reg(&mut self) -> Result<u32, ParseError> {
        match self.next() {
            Some((_, Token::Reg(r))) => Ok(r),
            Some((col, tok)) => Err(self.unexpected(col, "a register", &tok)),
            None => Err(self.eol("a register")),
        }
    }

    fn num(&mut self) -> Result<i64, ParseError> {
        match self.next() {
            Some((_, Token::Num(v))) => Ok(v),
            Some((col, tok)) => Err(self.unexpected(col, "a number", &tok)),
            None => Err(self.eol("a number")),
        }
    }

    fn comma(&mut self) -> Result<(), ParseError> {
        self.punct(Token::Comma, "','")
    }

    fn punct(&mut self, want: Token, expected: &'static str) -> Result<(), ParseError> {
        match self.next() {
            Some((_, tok)) if tok == want => Ok(()),
            Some((col, tok)) => Err(self.unexpected(col, expected, &tok)),
            None => Err(self.eol(expected)),
        }
    }
}

fn parse_operands(cur: &mut Cursor, desc: &InstrDesc, prog: &mut Program) -> Result<(), ParseError> {
    match desc.syntax {
        Syntax::ThreeReg => {
            let rd = cur.reg()?;
            cur.comma()?;
            let rs = cur.reg()?;
            cur.comma()?;
            let rt = cur.reg()?;
            prog.push_r(desc.op, rs, rt, rd, 0);
        }
        Syntax::Shift => {
            let rd = cur.reg()?;
            cur.comma()?;
            let rt = cur.reg()?;
            cur.comma()?;
            let shamt = cur.num()?;
            prog.push_r(desc.op, 0, rt, rd, shamt as i32);
        }
        Syntax::Branch => {
            let rs = cur.reg()?;
            cur.comma()?;
            let rt = cur.reg()?;
            cur.comma()?;
            match cur.next() {
                Some((_, Token::Num(v))) => prog.push_i(desc.op, rs, rt, v as i32, None),
                Some((_, Token::Name(name))) if by_mnemonic(&name).is_none() => {
                    prog.push_i(desc.op, rs, rt, 0, Some(name))
                }
                Some((col, tok)) => return Err(cur.unexpected(col, "a number or label", &tok)),
                None => return Err(cur.eol("a number or label")),
            }
        }
        Syntax::ArithImm => {
            let rt = cur.reg()?;
            cur.comma()?;
            let rs = cur.reg()?;
            cur.comma()?;
            let imm = cur.num()?;
            prog.push_i(desc.op, rs, rt, imm as i32, None);
        }
        Syntax::Mem => {
            let rt = cur.reg()?;
            cur.comma()?;
            let imm = cur.num()?;
            cur.punct(Token::LParen, "'('")?;
            let rs = cur.reg()?;
            cur.punct(Token::RParen, "')'")?;
            prog.push_i(desc.op, rs, rt, imm as i32, None);
        }
        Syntax::Jump => match cur.next() {
            Some((_, Token::Num(v))) => prog.push_j(desc.op, v, None),
            Some((_, Token::Name(name))) if by_mnemonic(&name).is_none() => {
                prog.push_j(desc.op, 0, Some(name))
            }
            Some((col, tok)) => return Err(cur.unexpected(col, "an address or label", &tok)),
            None => return Err(cur.eol("an address or label")),
        },
    }
    Ok(())
}

/// Parse one source line into `prog`. A line holds any number of items;
/// each item is a label definition (`name:`) or a single instruction, so
/// `beq $1, $2, loop loop:` is one branch followed by a label.
pub fn parse_line(line: &str, lineno: usize, prog: &mut Program) -> Result<(), ParseError> {
    let toks = tokenize(line, lineno)?;
    let mut cur = Cursor {
        toks,
        pos: 0,
        line: lineno,
        eol_col: line.chars().count(),
    };
    while let Some((col, tok)) = cur.next() {
        match tok {
            Token::Name(name) => {
                if let Some(desc) = by_mnemonic(&name) {
                    parse_operands(&mut cur, desc, prog)?;
                } else {
                    cur.punct(Token::Colon, "':' after label name")?;
                    prog.declare_label(&name);
                }
            }
            other => return Err(cur.unexpected(col, "a label or an instruction", &other)),
        }
    }
    Ok(())
}

/// Pass 1: build the full instruction sequence and label table. Nothing is
/// resolved here; binding runs once the whole buffer is populated so that
/// forward references work.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let mut prog = Program::new();
    for (idx, line) in source.lines().enumerate() {
        parse_line(line, idx + 1, &mut prog)?;
    }
    tracing::debug!(
        instructions = prog.len(),
        labels = prog.labels().len(),
        "parsed source"
    );
    Ok(prog)
}
