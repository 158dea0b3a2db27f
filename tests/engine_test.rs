mod common;

use assert2::check;
use common::{array_map_type, build_state, map_corpus, names, packages, prelude_corpus};
use docs_search::search::{HashAnchor, parse_type_query, penalty};
use docs_search::{Corpus, Engine, EngineConfig, PackageInfo, RankedResult};
use rstest::rstest;

/// Test: a name query finds the declaration as a text result.
#[rstest]
fn map_by_name(map_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&map_corpus), "map");

    check!(response.results.len() == 1);
    let result = &response.results[0];
    check!(matches!(result, RankedResult::Declaration { .. }));
    check!(result.name() == "map");
    check!(result.module_name() == Some("Data.Array"));
    check!(*result.package() == PackageInfo::Package("arrays".into()));
    check!(result.hash_anchor() == Some(HashAnchor::Value));
}

/// Test: the declared type, written with different variable names, matches exactly.
#[rstest]
#[case("(a -> b) -> Array a -> Array b")]
#[case("(x -> y) -> Array x -> Array y")]
#[case("forall f g. (f -> g) -> Array f -> Array g")]
fn map_by_type(map_corpus: Corpus, #[case] input: &str) {
    let response = Engine::default().query(&build_state(&map_corpus), input);

    check!(response.results.len() == 1);
    check!(response.results[0].name() == "map");
    check!(response.results[0].penalty() == Some(0));
}

/// Test: a query of the wrong arity has no type results, although its penalty
/// against the declaration is defined and positive.
#[rstest]
fn wrong_arity_has_no_type_results(map_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&map_corpus), "x -> y");
    check!(response.results.is_empty());

    let query = parse_type_query("x -> y").unwrap();
    check!(penalty(&query, &array_map_type()) > 0);
}

/// Test: single variables and constructors are looked up by name.
#[rstest]
#[case("a")]
#[case("Maybe")]
#[case("<$>")]
#[case("data.m")]
#[case("map")]
fn non_type_input_is_text(prelude_corpus: Corpus, #[case] input: &str) {
    let response = Engine::default().query(&build_state(&prelude_corpus), input);
    check!(response.results.iter().all(|result| result.penalty().is_none()));
}

/// Test: input nested too deeply to be a type is searched as text.
#[rstest]
#[case("(".repeat(10_000))]
#[case("a -> ".repeat(10_000) + "a")]
fn deeply_nested_input_is_text(prelude_corpus: Corpus, #[case] input: String) {
    let engine = Engine::default();
    let typed = engine.query(&build_state(&prelude_corpus), "a -> b");
    let response = engine.query(&typed.state, &input);

    check!(response.results.is_empty());
    check!(response.state.index.path().len() == input.chars().count());
    check!(response.state.type_index.path() == typed.state.type_index.path());

    let next = engine.query(&response.state, "map");
    check!(names(&next.results) == vec!["map", "map", "mapMaybe", "map"]);
}

/// Test: `a -> b` is answered from the shape index, not by name.
#[rstest]
fn arrow_is_type_query(prelude_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&prelude_corpus), "a -> b");
    check!(response.results.iter().all(|result| result.penalty().is_some()));
    check!(response.state.index.path().is_empty());
}

/// Test: text results are ordered by package popularity, then package, then module.
#[rstest]
fn text_ranking(prelude_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&prelude_corpus), "map");

    check!(names(&response.results) == vec!["map", "map", "mapMaybe", "map"]);
    check!(packages(&response.results) == vec!["prelude", "arrays", "arrays", "lists"]);
    check!(response.results[0].score() == 3);
    check!(response.results[0].module_name() == Some("Data.Functor"));
}

/// Test: local code outranks every package, and package results precede the
/// declarations and modules of the same package.
#[rstest]
fn local_first_with_packages_and_modules(prelude_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&prelude_corpus), "ma");

    check!(
        names(&response.results)
            == vec![
                "main",
                "Main",
                "map",
                "maybe",
                "maybe",
                "Maybe",
                "Data.Maybe",
                "map",
                "mapMaybe",
                "map",
            ]
    );
    check!(*response.results[0].package() == PackageInfo::LocalPackage);
    check!(matches!(response.results[1], RankedResult::Module(_)));
    check!(matches!(response.results[3], RankedResult::Package { .. }));
    check!(response.results[3].comments() == Some("purescript-maybe for PureScript"));
}

/// Test: module names match on any dot-separated suffix.
#[rstest]
fn module_and_package_results(prelude_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&prelude_corpus), "arr");

    check!(names(&response.results) == vec!["arrays", "Data.Array"]);
    check!(response.results[0].module_name().is_none());
    check!(response.results.iter().all(|result| result.declaration().is_none()));
}

/// Test: an alias is indexed under its operator.
#[rstest]
fn operator_alias(prelude_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&prelude_corpus), "<$>");

    check!(names(&response.results) == vec!["<$>"]);
    check!(response.results[0].info().map(|info| info.kind_name()) == Some("alias"));
}

/// Test: a concrete query also finds more general declarations, behind the exact match.
#[rstest]
fn type_ranking(prelude_corpus: Corpus) {
    let response = Engine::default().query(
        &build_state(&prelude_corpus),
        "(a -> b) -> Array a -> Array b",
    );

    // `Functor.map` generalizes `Array` twice; `filter` instantiates `b` and
    // identifies `a` with both query variables.
    check!(names(&response.results) == vec!["map", "map", "filter"]);
    check!(packages(&response.results) == vec!["arrays", "prelude", "arrays"]);
    let penalties: Vec<Option<u32>> = response.results.iter().map(RankedResult::penalty).collect();
    check!(penalties == vec![Some(0), Some(2), Some(2)]);
}

/// Test: argument order matters.
#[rstest]
fn type_query_respects_argument_order(prelude_corpus: Corpus) {
    let response = Engine::default().query(&build_state(&prelude_corpus), "a -> Maybe a -> a");
    check!(names(&response.results) == vec!["fromMaybe"]);

    let swapped = Engine::default().query(&build_state(&prelude_corpus), "Maybe a -> a -> a");
    check!(swapped.results.is_empty());
}

/// Test: typing a query keystroke by keystroke ends where a fresh query does.
#[rstest]
#[case(&["m", "ma", "map", "ma", "m", "fi", "fil"])]
#[case(&["a", "a -", "a ->", "a -> M", "a -> Maybe a -> a"])]
#[case(&["(a -> b) -> Array a -> Array b", "map", "", "map"])]
#[case(&["mapM", "Data.", "Data.Ma", "length"])]
fn incremental_matches_fresh(prelude_corpus: Corpus, #[case] inputs: &[&str]) {
    let engine = Engine::default();
    let fresh = build_state(&prelude_corpus);

    let mut state = fresh.clone();
    for input in inputs {
        let incremental = engine.query(&state, input);
        let direct = engine.query(&fresh, input);
        check!(incremental.results == direct.results, "diverged at {:?}", input);
        state = incremental.state;
    }
}

/// Test: the same query always yields the same order.
#[rstest]
fn ranking_is_stable(prelude_corpus: Corpus) {
    let engine = Engine::default();
    let state = build_state(&prelude_corpus);
    let first = engine.query(&state, "ma");

    for _ in 0..5 {
        check!(engine.query(&build_state(&prelude_corpus), "ma").results == first.results);
        check!(engine.query(&first.state, "ma").results == first.results);
    }
}

/// Test: clearing the input resets both cursors.
#[rstest]
fn empty_input_resets(prelude_corpus: Corpus) {
    let engine = Engine::default();
    let typed = engine.query(&build_state(&prelude_corpus), "a -> b");
    let named = engine.query(&typed.state, "fil");
    let cleared = engine.query(&named.state, "");

    check!(!named.state.index.path().is_empty());
    check!(!named.state.type_index.path().is_empty());
    check!(cleared.results.is_empty());
    check!(cleared.state.index.path().is_empty());
    check!(cleared.state.type_index.path().is_empty());
}

/// Test: `max-results` caps the ranked list after ordering.
#[rstest]
fn max_results(prelude_corpus: Corpus) {
    let engine = Engine::new(EngineConfig {
        max_results: Some(3),
    });
    let response = engine.query(&build_state(&prelude_corpus), "ma");
    check!(names(&response.results) == vec!["main", "Main", "map"]);
}
