//! Type queries: the query-side type AST and its parser.
//!
//! A type query is free text such as `(a -> b) -> Array a -> Array b` or
//! `forall m. Monad m => m Unit`. Parse failures are recoverable; callers fall back
//! to a text search.

use super::tokenize::{Lexeme, Token, tokenize};
use crate::error::ParseError;
use std::fmt::{self, Display, Formatter};

const FORALL: &str = "forall";
/// Deepest nesting of parentheses, arrows, quantifiers and applications accepted.
const MAX_DEPTH: usize = 128;
const RECORD: &str = "Record";

/// A parsed type query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeQuery {
    /// A type variable, `a`.
    Var(String),
    /// A type constructor, possibly qualified, `Maybe` or `Data.Maybe.Maybe`.
    Const(String),
    Fun(Box<TypeQuery>, Box<TypeQuery>),
    App(Box<TypeQuery>, Box<TypeQuery>),
    ForAll(Vec<String>, Box<TypeQuery>),
    /// `Class args => body`
    Constraint(String, Vec<String>, Box<TypeQuery>),
    Row(Vec<(String, TypeQuery)>),
}

impl TypeQuery {
    /// Whether the query constrains enough structure to be worth a type search.
    ///
    /// A lone variable or constructor name is read as a text query instead.
    pub const fn is_valuable(&self) -> bool {
        !matches!(self, Self::Var(_) | Self::Const(_))
    }

    /// Node count, ignoring quantifiers and constraints.
    pub fn size(&self) -> u32 {
        match self {
            Self::Var(_) | Self::Const(_) => 1,
            Self::Fun(a, b) | Self::App(a, b) => 1 + a.size() + b.size(),
            Self::ForAll(_, body) | Self::Constraint(_, _, body) => body.size(),
            Self::Row(fields) => 1 + fields.iter().map(|(_, q)| q.size()).sum::<u32>(),
        }
    }

    /// Strips leading quantifiers and constraints.
    pub fn body(&self) -> &Self {
        let mut current = self;
        while let Self::ForAll(_, body) | Self::Constraint(_, _, body) = current {
            current = body;
        }
        current
    }
}

/// Last segment of a possibly qualified name.
pub fn unqualified(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

impl Display for TypeQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) | Self::Const(name) => f.write_str(name),
            Self::Fun(a, b) if matches!(a.as_ref(), Self::Fun(..) | Self::ForAll(..)) => {
                write!(f, "({}) -> {}", a, b)
            }
            Self::Fun(a, b) => write!(f, "{} -> {}", a, b),
            Self::App(a, b) if matches!(b.as_ref(), Self::App(..) | Self::Fun(..)) => {
                write!(f, "{} ({})", a, b)
            }
            Self::App(a, b) => write!(f, "{} {}", a, b),
            Self::ForAll(vars, body) => write!(f, "forall {}. {}", vars.join(" "), body),
            Self::Constraint(class, args, body) => {
                f.write_str(class)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, " => {}", body)
            }
            Self::Row(fields) => {
                f.write_str("(")?;
                for (i, (label, q)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} :: {}", label, q)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Parses user input as a type query.
///
/// Grammar:
/// - `query       := forall | constrained | function`
/// - `forall      := "forall" var+ "." query`
/// - `constrained := Class var* "=>" query`
/// - `function    := application ("->" query)?`
/// - `application := atom+`
/// - `atom        := ident | "(" query ")" | "(" fields ")" | "{" fields "}"`
pub fn parse_type_query(text: &str) -> Result<TypeQuery, ParseError> {
    let lexemes = tokenize(text)?;
    if lexemes.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        lexemes,
        pos: 0,
        depth: 0,
    };
    let query = parser.query()?;

    match parser.lexemes.get(parser.pos) {
        None => Ok(query),
        Some(lexeme) => Err(parser.unexpected(lexeme)),
    }
}

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.lexemes.get(self.pos + ahead).map(|lexeme| &lexeme.token)
    }

    fn peek_ident(&self) -> Option<&str> {
        match self.peek() {
            Some(Token::Ident(name)) => Some(name),
            _ => None,
        }
    }

    fn unexpected(&self, lexeme: &Lexeme) -> ParseError {
        ParseError::UnexpectedToken {
            found: lexeme.token.to_string(),
            offset: lexeme.offset,
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        match self.lexemes.get(self.pos) {
            Some(lexeme) if &lexeme.token == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(lexeme) => Err(self.unexpected(lexeme)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn ident(&mut self) -> Result<String, ParseError> {
        match self.lexemes.get(self.pos) {
            Some(Lexeme {
                token: Token::Ident(name),
                ..
            }) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            Some(lexeme) => Err(self.unexpected(lexeme)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Fails once `extra` more levels would exceed [`MAX_DEPTH`].
    fn check_depth(&self, extra: usize) -> Result<(), ParseError> {
        if self.depth + extra > MAX_DEPTH {
            let offset = self
                .lexemes
                .get(self.pos)
                .or_else(|| self.lexemes.last())
                .map_or(0, |lexeme| lexeme.offset);
            return Err(ParseError::TooDeep { offset });
        }
        Ok(())
    }

    fn query(&mut self) -> Result<TypeQuery, ParseError> {
        self.check_depth(1)?;
        self.depth += 1;
        let query = self.nested_query();
        self.depth -= 1;
        query
    }

    fn nested_query(&mut self) -> Result<TypeQuery, ParseError> {
        if self.peek_ident() == Some(FORALL) {
            return self.forall();
        }
        if let Some(constrained) = self.constrained()? {
            return Ok(constrained);
        }
        self.function()
    }

    fn forall(&mut self) -> Result<TypeQuery, ParseError> {
        self.pos += 1;
        let mut vars = vec![];
        while let Some(name) = self.peek_ident()
            && is_var(name)
        {
            vars.push(self.ident()?);
        }
        if vars.is_empty() {
            return Err(match self.lexemes.get(self.pos) {
                Some(lexeme) => self.unexpected(lexeme),
                None => ParseError::UnexpectedEnd,
            });
        }
        self.expect(&Token::Dot)?;
        Ok(TypeQuery::ForAll(vars, Box::new(self.query()?)))
    }

    /// `Class var* => query`, or `None` (with no input consumed) if the upcoming
    /// tokens are not a constraint.
    fn constrained(&mut self) -> Result<Option<TypeQuery>, ParseError> {
        let Some(class) = self.peek_ident().filter(|name| !is_var(name)) else {
            return Ok(None);
        };

        let mut ahead = 1;
        while matches!(self.peek_at(ahead), Some(Token::Ident(name)) if is_var(name)) {
            ahead += 1;
        }
        if self.peek_at(ahead) != Some(&Token::FatArrow) {
            return Ok(None);
        }

        let class = class.to_string();
        let args = self.lexemes[self.pos + 1..self.pos + ahead]
            .iter()
            .filter_map(|lexeme| match &lexeme.token {
                Token::Ident(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        self.pos += ahead + 1;

        Ok(Some(TypeQuery::Constraint(
            class,
            args,
            Box::new(self.query()?),
        )))
    }

    fn function(&mut self) -> Result<TypeQuery, ParseError> {
        let from = self.application()?;
        if self.peek() == Some(&Token::Arrow) {
            self.pos += 1;
            let to = self.query()?;
            Ok(TypeQuery::Fun(Box::new(from), Box::new(to)))
        } else {
            Ok(from)
        }
    }

    fn application(&mut self) -> Result<TypeQuery, ParseError> {
        let mut query = self.atom()?;
        let mut arguments = 0;
        while self.starts_atom() {
            arguments += 1;
            self.check_depth(arguments)?;
            let argument = self.atom()?;
            query = TypeQuery::App(Box::new(query), Box::new(argument));
        }
        Ok(query)
    }

    fn starts_atom(&self) -> bool {
        match self.peek() {
            Some(Token::Ident(name)) => name != FORALL,
            Some(Token::LParen | Token::LBrace) => true,
            _ => false,
        }
    }

    fn atom(&mut self) -> Result<TypeQuery, ParseError> {
        let Some(lexeme) = self.lexemes.get(self.pos) else {
            return Err(ParseError::UnexpectedEnd);
        };

        match &lexeme.token {
            Token::Ident(name) if name != FORALL => {
                let query = if is_var(name) {
                    TypeQuery::Var(name.clone())
                } else {
                    TypeQuery::Const(name.clone())
                };
                self.pos += 1;
                Ok(query)
            }
            Token::LParen => {
                self.pos += 1;
                let is_row = match (self.peek(), self.peek_at(1)) {
                    (Some(Token::RParen), _) => true,
                    (Some(Token::Ident(_)), Some(Token::DoubleColon)) => true,
                    _ => false,
                };
                if is_row {
                    Ok(TypeQuery::Row(self.fields(&Token::RParen)?))
                } else {
                    let inner = self.query()?;
                    self.expect(&Token::RParen)?;
                    Ok(inner)
                }
            }
            Token::LBrace => {
                self.pos += 1;
                let row = TypeQuery::Row(self.fields(&Token::RBrace)?);
                Ok(TypeQuery::App(
                    Box::new(TypeQuery::Const(RECORD.to_string())),
                    Box::new(row),
                ))
            }
            _ => Err(self.unexpected(lexeme)),
        }
    }

    /// `label :: query` pairs separated by commas, up to and including `close`.
    fn fields(&mut self, close: &Token) -> Result<Vec<(String, TypeQuery)>, ParseError> {
        let mut fields = vec![];
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(fields);
        }
        loop {
            let label = self.ident()?;
            self.expect(&Token::DoubleColon)?;
            fields.push((label, self.query()?));
            if self.peek() == Some(&Token::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(close)?;
        Ok(fields)
    }
}

fn is_var(name: &str) -> bool {
    name.chars().next().is_some_and(|c| !c.is_uppercase()) && name != FORALL
}
