//! S-expressions, as read from SMT-LIB input.
//!
//! Comments run from `;` to the end of a line.
//! Quoted symbols `|…|` are read without their bars, and string literals `"…"` (with `""` as an escaped quote) are kept with their quotes.

use crate::types::err::{self};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SExpr {
    Atom(String),
    List(Vec<SExpr>),
}

impl SExpr {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(atom) => Some(atom),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            Self::Atom(_) => None,
            Self::List(list) => Some(list),
        }
    }
}

impl std::fmt::Display for SExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atom(atom) => write!(f, "{atom}"),
            Self::List(list) => {
                write!(f, "(")?;
                for (index, expr) in list.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{expr}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Atom(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>, err::ParseError> {
    let mut tokens = Vec::default();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '|' => {
                let mut symbol = String::default();
                loop {
                    match chars.next() {
                        Some('|') => break,
                        Some(c) => symbol.push(c),
                        None => return Err(err::ParseError::UnexpectedEnd),
                    }
                }
                tokens.push(Token::Atom(symbol));
            }
            '"' => {
                let mut string = String::from('"');
                loop {
                    match chars.next() {
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                            string.push_str("\"\"");
                        }
                        Some('"') => break,
                        Some(c) => string.push(c),
                        None => return Err(err::ParseError::UnexpectedEnd),
                    }
                }
                string.push('"');
                tokens.push(Token::Atom(string));
            }
            c if c.is_whitespace() => {}
            c => {
                let mut atom = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '(' | ')' | ';' | '|' | '"') {
                        break;
                    }
                    atom.push(next);
                    chars.next();
                }
                tokens.push(Token::Atom(atom));
            }
        }
    }

    Ok(tokens)
}

/// Every top-level s-expression of the input, in order.
pub fn parse_all(input: &str) -> Result<Vec<SExpr>, err::ParseError> {
    let mut stack: Vec<Vec<SExpr>> = Vec::default();
    let mut top = Vec::default();

    for token in tokenize(input)? {
        match token {
            Token::Open => stack.push(Vec::default()),
            Token::Close => {
                let list = stack.pop().ok_or(err::ParseError::Unbalanced)?;
                match stack.last_mut() {
                    Some(parent) => parent.push(SExpr::List(list)),
                    None => top.push(SExpr::List(list)),
                }
            }
            Token::Atom(atom) => match stack.last_mut() {
                Some(parent) => parent.push(SExpr::Atom(atom)),
                None => top.push(SExpr::Atom(atom)),
            },
        }
    }

    match stack.is_empty() {
        true => Ok(top),
        false => Err(err::ParseError::UnexpectedEnd),
    }
}
