//! Penalty: how far a declared type is from a type query.
//!
//! The query and the type are walked together. Every point where they meet is
//! recorded as a [`Substitution`], and the penalty is the sum of their costs plus
//! one unit for each inconsistent variable identification.

use super::query::{TypeQuery, unqualified};
use crate::docs::Type;
use ahash::{AHashMap, AHashSet};

/// Cost factor for structure the query and the type disagree on.
const MISMATCH_COST: u32 = 10;

/// One correspondence found while unifying a query with a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution<'a> {
    /// Query variable identified with a type variable.
    Match { query: &'a str, ty: &'a str },
    /// Query variable standing for a concrete type.
    Instantiate { query: &'a str, ty: &'a Type },
    /// Concrete query part where the type only has a variable.
    Generalize { query: &'a TypeQuery, ty: &'a str },
    Constructor { query: &'a str, ty: &'a str },
    Mismatch { query: &'a TypeQuery, ty: &'a Type },
    /// Row field present on one side only.
    MissingField { label: &'a str, size: u32 },
}

impl Substitution<'_> {
    pub fn cost(&self) -> u32 {
        match self {
            Self::Match { .. } => 0,
            Self::Instantiate { ty, .. } => type_size(ty),
            Self::Generalize { query, .. } => query.size(),
            Self::Constructor { query, ty } => {
                if unqualified(query) == *ty {
                    0
                } else {
                    MISMATCH_COST
                }
            }
            Self::Mismatch { query, ty } => MISMATCH_COST * (query.size() + type_size(ty)),
            Self::MissingField { size, .. } => MISMATCH_COST * size,
        }
    }
}

/// Penalty of `ty` against `query`. Zero means an exact match up to renaming.
pub fn penalty(query: &TypeQuery, ty: &Type) -> u32 {
    let substitutions = unify(query, ty);
    let cost: u32 = substitutions.iter().map(Substitution::cost).sum();
    cost + inconsistency(&substitutions)
}

/// Walks `query` and `ty` together, ignoring quantifiers, constraints and parens.
pub fn unify<'a>(query: &'a TypeQuery, ty: &'a Type) -> Vec<Substitution<'a>> {
    let mut out = vec![];
    unify_into(query, ty, &mut out);
    out
}

fn unify_into<'a>(query: &'a TypeQuery, ty: &'a Type, out: &mut Vec<Substitution<'a>>) {
    let query = query.body();
    let ty = strip(ty);

    if let TypeQuery::Var(name) = query {
        out.push(match ty {
            Type::TypeVar(var) => Substitution::Match { query: name, ty: var },
            _ => Substitution::Instantiate { query: name, ty },
        });
        return;
    }
    if let Type::TypeVar(var) = ty {
        out.push(Substitution::Generalize { query, ty: var });
        return;
    }

    match (query, ty) {
        (TypeQuery::Const(name), Type::TypeConstructor(constructor) | Type::TypeOp(constructor)) => {
            out.push(Substitution::Constructor {
                query: name,
                ty: &constructor.name,
            });
        }
        (TypeQuery::Fun(q_from, q_to), _) => match ty.as_function() {
            Some((from, to)) => {
                unify_into(q_from, from, out);
                unify_into(q_to, to, out);
            }
            None => out.push(Substitution::Mismatch { query, ty }),
        },
        (TypeQuery::App(q_function, q_argument), Type::TypeApp(function, argument))
            if ty.as_function().is_none() =>
        {
            unify_into(q_function, function, out);
            unify_into(q_argument, argument, out);
        }
        (TypeQuery::App(q_lhs, q_rhs), Type::BinaryNoParensType(op, lhs, rhs)) => {
            match q_lhs.as_ref() {
                TypeQuery::App(q_op, q_lhs) => {
                    unify_into(q_op, op, out);
                    unify_into(q_lhs, lhs, out);
                    unify_into(q_rhs, rhs, out);
                }
                _ => out.push(Substitution::Mismatch { query, ty }),
            }
        }
        (TypeQuery::Row(fields), Type::REmpty | Type::RCons(..)) => unify_rows(fields, ty, out),
        _ => out.push(Substitution::Mismatch { query, ty }),
    }
}

fn unify_rows<'a>(
    fields: &'a [(String, TypeQuery)],
    row: &'a Type,
    out: &mut Vec<Substitution<'a>>,
) {
    let (row_fields, _tail) = row.row_fields();
    let declared: AHashMap<&str, &Type> = row_fields.iter().copied().collect();

    for (label, query) in fields {
        match declared.get(label.as_str()) {
            Some(&ty) => unify_into(query, ty, out),
            None => out.push(Substitution::MissingField {
                label,
                size: query.size(),
            }),
        }
    }

    for (label, ty) in row_fields {
        if !fields.iter().any(|(name, _)| name == label) {
            out.push(Substitution::MissingField {
                label,
                size: type_size(ty),
            });
        }
    }
}

/// Extra partners in the variable identifications, counted from both sides.
fn inconsistency(substitutions: &[Substitution<'_>]) -> u32 {
    let mut by_query: AHashMap<&str, AHashSet<&str>> = AHashMap::new();
    let mut by_type: AHashMap<&str, AHashSet<&str>> = AHashMap::new();

    for substitution in substitutions {
        if let Substitution::Match { query, ty } = substitution {
            by_query.entry(*query).or_default().insert(*ty);
            by_type.entry(*ty).or_default().insert(*query);
        }
    }

    by_query
        .values()
        .chain(by_type.values())
        .map(|partners| u32::try_from(partners.len() - 1).unwrap_or(u32::MAX))
        .sum()
}

fn strip(ty: &Type) -> &Type {
    let mut current = ty;
    while let Type::ForAll(_, _, inner)
    | Type::ConstrainedType(_, inner)
    | Type::ParensInType(inner)
    | Type::Kinded(inner, _)
    | Type::KindApp(inner, _) = current
    {
        current = inner;
    }
    current
}

/// Node count of a declared type; quantifiers, constraints and parens are free.
pub fn type_size(ty: &Type) -> u32 {
    if let Some((from, to)) = ty.as_function() {
        return 1 + type_size(from) + type_size(to);
    }
    match ty {
        Type::TypeVar(_)
        | Type::TypeLevelString(_)
        | Type::TypeWildcard
        | Type::TypeConstructor(_)
        | Type::TypeOp(_) => 1,
        Type::TypeApp(function, argument) => 1 + type_size(function) + type_size(argument),
        Type::KindApp(inner, _)
        | Type::Kinded(inner, _)
        | Type::ParensInType(inner)
        | Type::ConstrainedType(_, inner)
        | Type::ForAll(_, _, inner) => type_size(inner),
        Type::REmpty | Type::RCons(..) => {
            let (fields, _tail) = ty.row_fields();
            1 + fields.iter().map(|(_, field)| type_size(field)).sum::<u32>()
        }
        Type::BinaryNoParensType(op, lhs, rhs) => {
            2 + type_size(op) + type_size(lhs) + type_size(rhs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::QualifiedName;
    use crate::search::query::parse_type_query;
    use assert2::check;
    use rstest::rstest;

    fn con(module: &[&str], name: &str) -> Type {
        Type::constructor(QualifiedName::new(module.iter().copied(), name))
    }

    fn array(arg: Type) -> Type {
        Type::app(con(&["Data", "Array"], "Array"), arg)
    }

    fn map_type() -> Type {
        Type::forall(
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
        )
    }

    fn penalty_of(query: &str, ty: &Type) -> u32 {
        penalty(&parse_type_query(query).unwrap(), ty)
    }

    #[rstest]
    #[case("(a -> b) -> Array a -> Array b")]
    #[case("(x -> y) -> Array x -> Array y")]
    #[case("forall f g. (f -> g) -> Data.Array.Array f -> Array g")]
    fn test_exact_match_up_to_renaming_is_free(#[case] query: &str) {
        check!(penalty_of(query, &map_type()) == 0);
    }

    #[test]
    fn test_short_query_against_map_is_positive() {
        // x := (a -> b), y := (Array a -> Array b)
        check!(penalty_of("x -> y", &map_type()) == 3 + 7);
    }

    #[test]
    fn test_constructor_mismatch_costs_more_than_renaming() {
        let maybe = |arg| Type::app(con(&["Data", "Maybe"], "Maybe"), arg);
        let list = |arg| Type::app(con(&["Data", "List"], "List"), arg);
        let head_maybe = Type::function(maybe(Type::var("a")), Type::var("a"));
        let head_list = Type::function(list(Type::var("a")), Type::var("a"));

        let renamed = penalty_of("a -> b", &Type::function(Type::var("a"), Type::var("a")));
        let wrong_constructor = penalty_of("Maybe a -> a", &head_list);

        check!(penalty_of("Maybe a -> a", &head_maybe) == 0);
        check!(renamed == 1);
        check!(wrong_constructor == MISMATCH_COST);
        check!(wrong_constructor > renamed);
    }

    #[test]
    fn test_inconsistency_counts_both_directions() {
        let ty = Type::function(Type::var("a"), Type::var("b"));
        check!(penalty_of("a -> a", &ty) == 1);
        check!(penalty_of("a -> b", &ty) == 0);
    }

    #[test]
    fn test_structural_mismatch_dominates() {
        let int = con(&["Prim"], "Int");
        let ty = Type::function(int.clone(), int);
        // `Maybe a` (3) against `Int` (1)
        check!(penalty_of("Maybe a -> Int", &ty) == MISMATCH_COST * 4);
    }

    #[test]
    fn test_generalize_costs_query_size() {
        let ty = Type::function(Type::var("a"), Type::var("a"));
        let penalty = penalty_of("Array Int -> Array Int", &ty);
        check!(penalty == 6);
    }

    #[test]
    fn test_row_fields_missing_on_one_side() {
        let string = con(&["Prim"], "String");
        let row = Type::RCons(
            "name".into(),
            Box::new(string.clone()),
            Box::new(Type::RCons(
                "email".into(),
                Box::new(string),
                Box::new(Type::REmpty),
            )),
        );
        let record = Type::app(con(&["Prim"], "Record"), row);

        check!(penalty_of("{ name :: String, email :: String }", &record) == 0);
        check!(penalty_of("{ email :: String, name :: String }", &record) == 0);
        check!(penalty_of("{ name :: String }", &record) == MISMATCH_COST);
        check!(penalty_of("{ name :: String, age :: Int, email :: String }", &record) == MISMATCH_COST);
    }

    #[rstest]
    #[case(Type::function(Type::var("a"), Type::var("b")), 3)]
    #[case(Type::function(array(Type::var("a")), array(Type::var("b"))), 7)]
    #[case(map_type(), 11)]
    #[case(Type::REmpty, 1)]
    fn test_type_size(#[case] ty: Type, #[case] expected: u32) {
        check!(type_size(&ty) == expected);
    }

    #[test]
    fn test_substitutions_are_recorded() {
        let query = parse_type_query("x -> Array y").unwrap();
        let ty = Type::function(Type::var("a"), array(Type::var("b")));
        check!(
            unify(&query, &ty)
                == vec![
                    Substitution::Match { query: "x", ty: "a" },
                    Substitution::Constructor {
                        query: "Array",
                        ty: "Array"
                    },
                    Substitution::Match { query: "y", ty: "b" },
                ]
        );
    }
}
