//! Shared test fixtures for integration tests.
//!
//! # Available Fixtures
//!
//! - `map_corpus`: a single `Data.Array.map` declaration from the `arrays` package
//! - `prelude_corpus`: a handful of modules across local code, builtins and four
//!   packages, with overlapping names (`map` is declared three times)
//!
//! Corpora are plain [`Corpus`] values; [`build_state`] turns one into a fresh
//! [`EngineState`] the same way a session does.

#![allow(dead_code)] // Helpers used across different integration test crates

use docs_search::docs::{
    ChildDeclaration, ChildDeclarationInfo, DataDeclType, DeclType, Declaration,
    DeclarationInfo, DocModule, PackageMeta, QualifiedName, SourcePosition, SourceSpan, Type,
    TypeArgument,
};
use docs_search::{Corpus, EngineState, IndexConfig, RankedResult, Scores, SearchIndex};
use rstest::fixture;

pub fn con(module: &str, name: &str) -> Type {
    Type::constructor(QualifiedName::new(module.split('.'), name))
}

pub fn array(arg: Type) -> Type {
    Type::app(con("Data.Array", "Array"), arg)
}

pub fn list(arg: Type) -> Type {
    Type::app(con("Data.List", "List"), arg)
}

pub fn maybe(arg: Type) -> Type {
    Type::app(con("Data.Maybe", "Maybe"), arg)
}

pub fn var(name: &str) -> Type {
    Type::var(name)
}

pub fn fun(from: Type, to: Type) -> Type {
    Type::function(from, to)
}

pub fn forall(vars: &[&str], body: Type) -> Type {
    vars.iter()
        .rev()
        .fold(body, |body, var| Type::forall(*var, None, body))
}

/// `forall a b. (a -> b) -> Array a -> Array b`
pub fn array_map_type() -> Type {
    forall(
        &["a", "b"],
        fun(
            fun(var("a"), var("b")),
            fun(array(var("a")), array(var("b"))),
        ),
    )
}

pub fn span(path: &str) -> SourceSpan {
    SourceSpan {
        start: SourcePosition(1, 1),
        end: SourcePosition(1, 40),
        name: path.to_string(),
    }
}

pub fn value(title: &str, ty: Type, path: Option<&str>) -> Declaration {
    Declaration {
        title: title.to_string(),
        comments: Some(format!("Documentation for `{}`.", title)),
        info: DeclarationInfo {
            type_: Some(ty),
            ..DeclarationInfo::new(DeclType::Value)
        },
        source_span: path.map(span),
        children: vec![],
    }
}

pub fn module(name: &str, declarations: Vec<Declaration>) -> DocModule {
    DocModule {
        name: name.to_string(),
        comments: None,
        declarations,
    }
}

pub fn manifest(name: &str, dependencies: &[&str]) -> PackageMeta {
    PackageMeta {
        name: name.to_string(),
        description: Some(format!("{} for PureScript", name)),
        dependencies: dependencies
            .iter()
            .map(|dep| ((*dep).to_string(), "^6.0.0".to_string()))
            .collect(),
        repository: None,
    }
}

const ARRAY_PATH: &str = ".spago/arrays/v7.2.1/src/Data/Array.purs";
const FUNCTOR_PATH: &str = ".spago/prelude/v6.0.1/src/Data/Functor.purs";
const MAYBE_PATH: &str = ".spago/maybe/v6.0.0/src/Data/Maybe.purs";
const LIST_PATH: &str = "bower_components/purescript-lists/src/Data/List.purs";

#[fixture]
pub fn map_corpus() -> Corpus {
    Corpus {
        modules: vec![module(
            "Data.Array",
            vec![value("map", array_map_type(), Some(ARRAY_PATH))],
        )],
        packages: vec![manifest("purescript-arrays", &[])],
        scores: None,
    }
}

fn functor_module() -> DocModule {
    let class = Declaration {
        title: "Functor".to_string(),
        comments: None,
        info: DeclarationInfo {
            arguments: Some(vec![TypeArgument::new("f")]),
            superclasses: Some(vec![]),
            fundeps: Some(vec![]),
            ..DeclarationInfo::new(DeclType::TypeClass)
        },
        source_span: Some(span(FUNCTOR_PATH)),
        children: vec![ChildDeclaration {
            title: "map".to_string(),
            comments: None,
            info: ChildDeclarationInfo::TypeClassMember {
                type_: forall(
                    &["a", "b"],
                    fun(
                        fun(var("a"), var("b")),
                        fun(
                            Type::app(var("f"), var("a")),
                            Type::app(var("f"), var("b")),
                        ),
                    ),
                ),
            },
            source_span: None,
        }],
    };
    let alias = Declaration {
        title: "(<$>)".to_string(),
        comments: None,
        info: DeclarationInfo::new(DeclType::Alias),
        source_span: Some(span(FUNCTOR_PATH)),
        children: vec![],
    };
    module("Data.Functor", vec![class, alias])
}

fn maybe_module() -> DocModule {
    let constructor = |title: &str, arguments: Vec<Type>| ChildDeclaration {
        title: title.to_string(),
        comments: None,
        info: ChildDeclarationInfo::DataConstructor { arguments },
        source_span: None,
    };
    let data = Declaration {
        title: "Maybe".to_string(),
        comments: Some("An optional value.".to_string()),
        info: DeclarationInfo {
            type_arguments: Some(vec![TypeArgument::new("a")]),
            data_decl_type: Some(DataDeclType::Data),
            ..DeclarationInfo::new(DeclType::Data)
        },
        source_span: Some(span(MAYBE_PATH)),
        children: vec![
            constructor("Nothing", vec![]),
            constructor("Just", vec![var("a")]),
        ],
    };
    module(
        "Data.Maybe",
        vec![
            data,
            value(
                "fromMaybe",
                forall(&["a"], fun(var("a"), fun(maybe(var("a")), var("a")))),
                Some(MAYBE_PATH),
            ),
            value(
                "maybe",
                forall(
                    &["a", "b"],
                    fun(
                        var("b"),
                        fun(fun(var("a"), var("b")), fun(maybe(var("a")), var("b"))),
                    ),
                ),
                Some(MAYBE_PATH),
            ),
        ],
    )
}

fn prim_module() -> DocModule {
    let int = Declaration {
        title: "Int".to_string(),
        comments: None,
        info: DeclarationInfo {
            kind: Some(con("Prim", "Type")),
            ..DeclarationInfo::new(DeclType::ExternData)
        },
        source_span: None,
        children: vec![],
    };
    module("Prim", vec![int])
}

#[fixture]
pub fn prelude_corpus() -> Corpus {
    let int = || con("Prim", "Int");
    let modules = vec![
        functor_module(),
        module(
            "Data.Array",
            vec![
                value("map", array_map_type(), Some(ARRAY_PATH)),
                value(
                    "filter",
                    forall(
                        &["a"],
                        fun(
                            fun(var("a"), con("Prim", "Boolean")),
                            fun(array(var("a")), array(var("a"))),
                        ),
                    ),
                    Some(ARRAY_PATH),
                ),
                value(
                    "length",
                    forall(&["a"], fun(array(var("a")), int())),
                    Some(ARRAY_PATH),
                ),
                value(
                    "mapMaybe",
                    forall(
                        &["a", "b"],
                        fun(
                            fun(var("a"), maybe(var("b"))),
                            fun(array(var("a")), array(var("b"))),
                        ),
                    ),
                    Some(ARRAY_PATH),
                ),
            ],
        ),
        maybe_module(),
        module(
            "Data.List",
            vec![value(
                "map",
                forall(
                    &["a", "b"],
                    fun(fun(var("a"), var("b")), fun(list(var("a")), list(var("b")))),
                ),
                Some(LIST_PATH),
            )],
        ),
        module(
            "Main",
            vec![value(
                "main",
                Type::app(con("Effect", "Effect"), con("Data.Unit", "Unit")),
                Some("src/Main.purs"),
            )],
        ),
        prim_module(),
    ];

    Corpus {
        modules,
        packages: vec![
            manifest("purescript-prelude", &[]),
            manifest("purescript-arrays", &["purescript-prelude"]),
            manifest("purescript-maybe", &["purescript-prelude"]),
            manifest("purescript-lists", &["purescript-prelude", "purescript-maybe"]),
        ],
        scores: None,
    }
}

/// Builds a fresh engine state from `corpus` with the default index config.
pub fn build_state(corpus: &Corpus) -> EngineState {
    docs_search::tracing::init();
    let config = IndexConfig::default();
    let scores = corpus
        .scores
        .clone()
        .unwrap_or_else(|| Scores::from_packages(&corpus.packages, &config.package_prefix));
    let index = SearchIndex::build(&corpus.modules, &config);
    EngineState::new(index, scores, &corpus.packages, &config)
}

pub fn names(results: &[RankedResult]) -> Vec<&str> {
    results.iter().map(RankedResult::name).collect()
}

pub fn packages(results: &[RankedResult]) -> Vec<String> {
    results
        .iter()
        .map(|result| result.package().to_string())
        .collect()
}
