//! Lexer for type queries.

use crate::error::ParseError;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A possibly module-qualified identifier, e.g. `a`, `Maybe`, `Data.Maybe.Maybe`.
    Ident(String),
    Arrow,
    FatArrow,
    DoubleColon,
    Dot,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier `{}`", name),
            Self::Arrow => f.write_str("`->`"),
            Self::FatArrow => f.write_str("`=>`"),
            Self::DoubleColon => f.write_str("`::`"),
            Self::Dot => f.write_str("`.`"),
            Self::Comma => f.write_str("`,`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::LBrace => f.write_str("`{`"),
            Self::RBrace => f.write_str("`}`"),
        }
    }
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
    pub(crate) token: Token,
    pub(crate) offset: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Splits a type query into tokens.
///
/// A `.` continues an identifier only between an uppercase segment and another
/// uppercase letter, so `Data.Maybe.Maybe` is one token while the `.` ending
/// `forall a.` stands alone.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Lexeme>, ParseError> {
    let mut lexemes = vec![];
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            c if is_ident_start(c) => {
                let mut end = offset + c.len_utf8();
                let mut segment_upper = c.is_uppercase();
                loop {
                    match chars.peek().copied() {
                        Some((i, next)) if is_ident_continue(next) => {
                            end = i + next.len_utf8();
                            chars.next();
                        }
                        Some((i, '.')) if segment_upper => {
                            // Only a qualifier if an uppercase segment follows.
                            let follows_upper = text[i + 1..]
                                .chars()
                                .next()
                                .is_some_and(char::is_uppercase);
                            if !follows_upper {
                                break;
                            }
                            chars.next();
                            if let Some((j, upper)) = chars.next() {
                                end = j + upper.len_utf8();
                                segment_upper = true;
                            }
                        }
                        _ => break,
                    }
                }
                Token::Ident(text[offset..end].to_string())
            }
            '-' | '=' | ':' => {
                let expected = if c == ':' { ':' } else { '>' };
                match chars.next_if(|&(_, next)| next == expected) {
                    Some(_) => match c {
                        '-' => Token::Arrow,
                        '=' => Token::FatArrow,
                        _ => Token::DoubleColon,
                    },
                    None => return Err(ParseError::UnexpectedChar { ch: c, offset }),
                }
            }
            '.' => Token::Dot,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ch => return Err(ParseError::UnexpectedChar { ch, offset }),
        };
        lexemes.push(Lexeme { token, offset });
    }

    Ok(lexemes)
}
