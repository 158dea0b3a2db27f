//! Type shapes: the name-free pre-order encoding used as a shape-trie key.
//!
//! Variables carry no names, so alpha-equivalent types get identical shapes.
//! Leaves have arity zero and every compound chunk has a fixed arity, which keeps
//! the encoding prefix-free.

use super::query::{TypeQuery, unqualified};
use crate::docs::Type;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeChunk {
    Var,
    /// Unqualified constructor name.
    Const(String),
    Fun,
    App,
    /// A run of `n` quantified variables.
    ForAll(usize),
    /// A row of `n` fields; their shapes follow, sorted by label.
    Row(usize),
}

pub type TypeShape = Vec<ShapeChunk>;

impl ShapeChunk {
    /// Whether a query chunk may follow a candidate chunk in the shape trie.
    ///
    /// A query variable stands for any leaf, and a candidate variable accepts any
    /// constructor. Compound chunks must agree exactly.
    pub fn accepts(&self, candidate: &Self) -> bool {
        match (self, candidate) {
            (Self::Var, Self::Var | Self::Const(_)) | (Self::Const(_), Self::Var) => true,
            (query, candidate) => query == candidate,
        }
    }
}

/// Shape of a declared type, with leading quantifiers and constraints removed.
pub fn shape_of_type(ty: &Type) -> TypeShape {
    let mut current = ty;
    while let Type::ForAll(_, _, body) | Type::ConstrainedType(_, body) | Type::ParensInType(body) =
        current
    {
        current = body;
    }

    let mut shape = vec![];
    push_type(current, &mut shape);
    shape
}

fn push_type(ty: &Type, out: &mut TypeShape) {
    if let Some((from, to)) = ty.as_function() {
        out.push(ShapeChunk::Fun);
        push_type(from, out);
        push_type(to, out);
        return;
    }

    match ty {
        Type::TypeVar(_) | Type::TypeLevelString(_) | Type::TypeWildcard => {
            out.push(ShapeChunk::Var);
        }
        Type::TypeConstructor(name) | Type::TypeOp(name) => {
            out.push(ShapeChunk::Const(name.name.clone()));
        }
        Type::TypeApp(function, argument) => {
            out.push(ShapeChunk::App);
            push_type(function, out);
            push_type(argument, out);
        }
        Type::KindApp(inner, _)
        | Type::Kinded(inner, _)
        | Type::ParensInType(inner)
        | Type::ConstrainedType(_, inner) => push_type(inner, out),
        Type::ForAll(..) => {
            let mut count = 0;
            let mut body = ty;
            while let Type::ForAll(_, _, inner) = body {
                count += 1;
                body = inner;
            }
            out.push(ShapeChunk::ForAll(count));
            push_type(body, out);
        }
        Type::REmpty | Type::RCons(..) => {
            let (mut fields, _tail) = ty.row_fields();
            fields.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push(ShapeChunk::Row(fields.len()));
            for (_, field) in fields {
                push_type(field, out);
            }
        }
        Type::BinaryNoParensType(op, lhs, rhs) => {
            out.push(ShapeChunk::App);
            out.push(ShapeChunk::App);
            push_type(op, out);
            push_type(lhs, out);
            push_type(rhs, out);
        }
    }
}

/// Shape of a type query, encoded with the same rules as [`shape_of_type`].
pub fn shape_of_query(query: &TypeQuery) -> TypeShape {
    let mut shape = vec![];
    push_query(query.body(), &mut shape);
    shape
}

fn push_query(query: &TypeQuery, out: &mut TypeShape) {
    match query {
        TypeQuery::Var(_) => out.push(ShapeChunk::Var),
        TypeQuery::Const(name) => out.push(ShapeChunk::Const(unqualified(name).to_string())),
        TypeQuery::Fun(from, to) => {
            out.push(ShapeChunk::Fun);
            push_query(from, out);
            push_query(to, out);
        }
        TypeQuery::App(function, argument) => {
            out.push(ShapeChunk::App);
            push_query(function, out);
            push_query(argument, out);
        }
        TypeQuery::ForAll(..) => {
            let mut count = 0;
            let mut body = query;
            while let TypeQuery::ForAll(vars, inner) = body {
                count += vars.len();
                body = inner;
            }
            out.push(ShapeChunk::ForAll(count));
            push_query(body, out);
        }
        TypeQuery::Constraint(_, _, body) => push_query(body, out),
        TypeQuery::Row(fields) => {
            let mut fields: Vec<_> = fields.iter().collect();
            fields.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push(ShapeChunk::Row(fields.len()));
            for (_, field) in fields {
                push_query(field, out);
            }
        }
    }
}
