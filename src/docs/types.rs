//! Type AST of the declaration-extraction format.
//!
//! The extraction collaborator produces these trees; this crate only reads them.
//! Function arrows are not a dedicated node: `a -> b` is encoded as
//! `TypeApp(TypeApp(TypeConstructor(Prim.Function), a), b)`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter, Write as _};

/// Module holding the compiler-provided function type constructor.
const PRIM_MODULE: &str = "Prim";
const FUNCTION_NAME: &str = "Function";

/// A name qualified by the module that defines it, e.g. `Data.Maybe.Maybe`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedName {
    pub module_name_parts: Vec<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn new<I, S>(module_name_parts: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module_name_parts: module_name_parts.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }

    /// A name with no module qualifier.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            module_name_parts: vec![],
            name: name.into(),
        }
    }

    /// Dot-joined module name, e.g. `Data.Maybe`.
    pub fn module_name(&self) -> String {
        self.module_name_parts.join(".")
    }

    fn is_prim_function(&self) -> bool {
        self.name == FUNCTION_NAME
            && matches!(self.module_name_parts.as_slice(), [m] if m == PRIM_MODULE)
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for part in &self.module_name_parts {
            write!(f, "{}.", part)?;
        }
        f.write_str(&self.name)
    }
}

/// A type class constraint, e.g. `Show a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub constraint_class: QualifiedName,
    pub constraint_args: Vec<Type>,
}

/// A type as emitted by the extraction format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", content = "contents")]
pub enum Type {
    TypeVar(String),
    TypeLevelString(String),
    TypeWildcard,
    TypeConstructor(QualifiedName),
    TypeOp(QualifiedName),
    TypeApp(Box<Type>, Box<Type>),
    KindApp(Box<Type>, Box<Type>),
    /// `forall var (:: kind). body`
    ForAll(String, Option<Box<Type>>, Box<Type>),
    ConstrainedType(Constraint, Box<Type>),
    REmpty,
    RCons(String, Box<Type>, Box<Type>),
    Kinded(Box<Type>, Box<Type>),
    BinaryNoParensType(Box<Type>, Box<Type>, Box<Type>),
    ParensInType(Box<Type>),
}

impl Type {
    pub fn var(name: impl Into<String>) -> Self {
        Self::TypeVar(name.into())
    }

    pub fn constructor(name: QualifiedName) -> Self {
        Self::TypeConstructor(name)
    }

    pub fn app(function: Self, argument: Self) -> Self {
        Self::TypeApp(Box::new(function), Box::new(argument))
    }

    /// `from -> to`, encoded through `Prim.Function`.
    pub fn function(from: Self, to: Self) -> Self {
        let arrow = Self::TypeConstructor(QualifiedName::new([PRIM_MODULE], FUNCTION_NAME));
        Self::app(Self::app(arrow, from), to)
    }

    pub fn forall(var: impl Into<String>, kind: Option<Self>, body: Self) -> Self {
        Self::ForAll(var.into(), kind.map(Box::new), Box::new(body))
    }

    pub fn constrained(constraint: Constraint, body: Self) -> Self {
        Self::ConstrainedType(constraint, Box::new(body))
    }

    /// Splits a function arrow into its argument and result types.
    pub fn as_function(&self) -> Option<(&Self, &Self)> {
        if let Self::TypeApp(lhs, to) = self
            && let Self::TypeApp(arrow, from) = lhs.as_ref()
            && let Self::TypeConstructor(name) = arrow.as_ref()
            && name.is_prim_function()
        {
            Some((from, to))
        } else {
            None
        }
    }

    /// Collects the fields of a row, returning them with the row tail (if open).
    pub fn row_fields(&self) -> (Vec<(&str, &Self)>, Option<&Self>) {
        let mut fields = vec![];
        let mut current = self;
        loop {
            match current {
                Self::RCons(label, ty, rest) => {
                    fields.push((label.as_str(), ty.as_ref()));
                    current = rest;
                }
                Self::REmpty => return (fields, None),
                Self::ParensInType(inner) | Self::Kinded(inner, _) => current = inner,
                other => return (fields, Some(other)),
            }
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some((from, to)) = self.as_function() {
            if from.as_function().is_some() || matches!(from, Self::ForAll(..)) {
                write!(f, "({}) -> {}", from, to)
            } else {
                write!(f, "{} -> {}", from, to)
            }
        } else {
            match self {
                Self::TypeVar(name) => f.write_str(name),
                Self::TypeLevelString(s) => write!(f, "{:?}", s),
                Self::TypeWildcard => f.write_char('_'),
                Self::TypeConstructor(name) | Self::TypeOp(name) => f.write_str(&name.name),
                Self::TypeApp(function, argument) => {
                    write!(f, "{} ", function)?;
                    if matches!(argument.as_ref(), Self::TypeApp(..)) {
                        write!(f, "({})", argument)
                    } else {
                        write!(f, "{}", argument)
                    }
                }
                Self::KindApp(ty, _) | Self::Kinded(ty, _) => write!(f, "{}", ty),
                Self::ForAll(..) => {
                    f.write_str("forall")?;
                    let mut body = self;
                    while let Self::ForAll(var, _, inner) = body {
                        write!(f, " {}", var)?;
                        body = inner;
                    }
                    write!(f, ". {}", body)
                }
                Self::ConstrainedType(constraint, body) => {
                    f.write_str(&constraint.constraint_class.name)?;
                    for arg in &constraint.constraint_args {
                        write!(f, " {}", arg)?;
                    }
                    write!(f, " => {}", body)
                }
                Self::REmpty => f.write_str("()"),
                Self::RCons(..) => {
                    let (fields, tail) = self.row_fields();
                    f.write_str("( ")?;
                    for (i, (label, ty)) in fields.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{} :: {}", label, ty)?;
                    }
                    if let Some(tail) = tail {
                        write!(f, " | {}", tail)?;
                    }
                    f.write_str(" )")
                }
                Self::BinaryNoParensType(op, lhs, rhs) => write!(f, "{} {} {}", lhs, op, rhs),
                Self::ParensInType(inner) => write!(f, "({})", inner),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn array(arg: Type) -> Type {
        Type::app(
            Type::constructor(QualifiedName::new(["Data", "Array"], "Array")),
            arg,
        )
    }

    #[test]
    fn test_function_round_trips_through_as_function() {
        let ty = Type::function(Type::var("a"), Type::var("b"));
        let (from, to) = ty.as_function().unwrap();
        check!(from == &Type::var("a"));
        check!(to == &Type::var("b"));
    }

    #[test]
    fn test_plain_application_is_not_function() {
        check!(array(Type::var("a")).as_function().is_none());
    }

    #[test]
    fn test_display_map_signature() {
        let ty = Type::forall(
            "a",
            None,
            Type::forall(
                "b",
                None,
                Type::function(
                    Type::function(Type::var("a"), Type::var("b")),
                    Type::function(array(Type::var("a")), array(Type::var("b"))),
                ),
            ),
        );
        check!(ty.to_string() == "forall a b. (a -> b) -> Array a -> Array b");
    }

    #[test]
    fn test_row_fields_collects_open_tail() {
        let row = Type::RCons(
            "x".into(),
            Box::new(Type::var("a")),
            Box::new(Type::RCons(
                "y".into(),
                Box::new(Type::var("b")),
                Box::new(Type::var("r")),
            )),
        );
        let (fields, tail) = row.row_fields();
        check!(fields.len() == 2);
        check!(fields[0].0 == "x");
        check!(tail == Some(&Type::var("r")));
    }

    #[test]
    fn test_deserialize_tagged_type() {
        let json = r#"{"tag":"TypeApp","contents":[
            {"tag":"TypeConstructor","contents":{"moduleNameParts":["Data","Maybe"],"name":"Maybe"}},
            {"tag":"TypeVar","contents":"a"}
        ]}"#;
        let ty: Type = serde_json::from_str(json).unwrap();
        check!(ty.to_string() == "Maybe a");
    }
}
