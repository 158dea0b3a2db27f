//! Query dispatch and ranking.
//!
//! [`Engine::query`] is a pure function from the current [`EngineState`] and the
//! user's input to a new state plus ranked results. Input that parses as a
//! valuable type query is answered from the shape trie and ranked by penalty;
//! everything else is a text query over declaration, package and module names.

use crate::config::{EngineConfig, IndexConfig};
use crate::docs::PackageMeta;
use crate::search::{
    DeclTrie, HashAnchor, ModuleIndex, ModuleResult, PackageIndex, PackageInfo, PackageResult,
    RankKey, ResultInfo, Scores, SearchIndex, SearchResult, ShapeChunk, TypeTrie,
    parse_type_query, penalty, shape_of_query,
};
use crate::trie::Cursor;
use std::collections::VecDeque;
use std::sync::Arc;

/// A resumable position in one of the result tries.
pub trait IndexCursor: Clone {
    type Symbol;

    /// Repositions on `key`, reusing whatever prefix it shares with the current one.
    fn seek(&self, key: &[Self::Symbol]) -> Self;

    /// A cursor back at the root.
    fn reset(&self) -> Self;

    fn results(&self) -> Vec<Arc<SearchResult>>;
}

fn collect(values: Vec<&VecDeque<Arc<SearchResult>>>) -> Vec<Arc<SearchResult>> {
    values.into_iter().flatten().cloned().collect()
}

/// Cursor over the name trie, keyed by lower-cased characters.
#[derive(Debug, Clone)]
pub struct NameCursor {
    trie: Arc<DeclTrie>,
    cursor: Cursor<char, VecDeque<Arc<SearchResult>>>,
}

impl NameCursor {
    pub fn new(trie: Arc<DeclTrie>) -> Self {
        let cursor = trie.cursor();
        Self { trie, cursor }
    }

    pub fn path(&self) -> &[char] {
        self.cursor.path()
    }
}

impl IndexCursor for NameCursor {
    type Symbol = char;

    fn seek(&self, key: &[char]) -> Self {
        Self {
            trie: Arc::clone(&self.trie),
            cursor: self.cursor.seek(key),
        }
    }

    fn reset(&self) -> Self {
        Self::new(Arc::clone(&self.trie))
    }

    fn results(&self) -> Vec<Arc<SearchResult>> {
        collect(self.cursor.results())
    }
}

/// Cursor over the shape trie. Query variables and constructors match per
/// [`ShapeChunk::accepts`], so the frontier may hold several nodes.
#[derive(Debug, Clone)]
pub struct ShapeCursor {
    trie: Arc<TypeTrie>,
    cursor: Cursor<ShapeChunk, VecDeque<Arc<SearchResult>>>,
}

impl ShapeCursor {
    pub fn new(trie: Arc<TypeTrie>) -> Self {
        let cursor = trie.cursor();
        Self { trie, cursor }
    }

    pub fn path(&self) -> &[ShapeChunk] {
        self.cursor.path()
    }
}

impl IndexCursor for ShapeCursor {
    type Symbol = ShapeChunk;

    fn seek(&self, key: &[ShapeChunk]) -> Self {
        Self {
            trie: Arc::clone(&self.trie),
            cursor: self.cursor.seek_with(key, ShapeChunk::accepts),
        }
    }

    fn reset(&self) -> Self {
        Self::new(Arc::clone(&self.trie))
    }

    fn results(&self) -> Vec<Arc<SearchResult>> {
        collect(self.cursor.results())
    }
}

/// Everything a query needs. Only the two cursors change between queries; the
/// rest is shared for the lifetime of the index.
#[derive(Debug, Clone)]
pub struct EngineState<I = NameCursor, T = ShapeCursor> {
    pub index: I,
    pub type_index: T,
    pub package_index: Arc<PackageIndex>,
    pub module_index: Arc<ModuleIndex>,
    pub scores: Arc<Scores>,
}

impl EngineState {
    /// State with both cursors at the root of a freshly built index.
    pub fn new(
        index: SearchIndex,
        scores: Scores,
        packages: &[PackageMeta],
        config: &IndexConfig,
    ) -> Self {
        let module_index = ModuleIndex::from_results(index.results().map(|result| result.as_ref()));
        let package_index = PackageIndex::new(packages, &scores, &config.package_prefix);
        let (decls, types) = index.into_tries();

        Self {
            index: NameCursor::new(Arc::new(decls)),
            type_index: ShapeCursor::new(Arc::new(types)),
            package_index: Arc::new(package_index),
            module_index: Arc::new(module_index),
            scores: Arc::new(scores),
        }
    }
}

impl<I: IndexCursor, T: IndexCursor> EngineState<I, T> {
    fn with_cursors(&self, index: I, type_index: T) -> Self {
        Self {
            index,
            type_index,
            package_index: Arc::clone(&self.package_index),
            module_index: Arc::clone(&self.module_index),
            scores: Arc::clone(&self.scores),
        }
    }
}

/// One ranked answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankedResult {
    Declaration {
        result: Arc<SearchResult>,
        score: u32,
    },
    Type {
        result: Arc<SearchResult>,
        score: u32,
        penalty: u32,
    },
    Package {
        result: Arc<PackageResult>,
        package_info: PackageInfo,
    },
    Module(ModuleResult),
}

impl RankedResult {
    pub fn name(&self) -> &str {
        match self {
            Self::Declaration { result, .. } | Self::Type { result, .. } => &result.name,
            Self::Package { result, .. } => &result.name,
            Self::Module(module) => &module.name,
        }
    }

    /// Declaring module, or the module itself for module results.
    pub fn module_name(&self) -> Option<&str> {
        match self {
            Self::Declaration { result, .. } | Self::Type { result, .. } => {
                Some(result.module_name.as_str())
            }
            Self::Package { .. } => None,
            Self::Module(module) => Some(module.name.as_str()),
        }
    }

    pub fn package(&self) -> &PackageInfo {
        match self {
            Self::Declaration { result, .. } | Self::Type { result, .. } => &result.package_info,
            Self::Package { package_info, .. } => package_info,
            Self::Module(module) => &module.package_info,
        }
    }

    /// Doc comments, or the description for packages.
    pub fn comments(&self) -> Option<&str> {
        match self {
            Self::Declaration { result, .. } | Self::Type { result, .. } => {
                result.comments.as_deref()
            }
            Self::Package { result, .. } => result.description.as_deref(),
            Self::Module(_) => None,
        }
    }

    pub fn hash_anchor(&self) -> Option<HashAnchor> {
        self.declaration().map(|result| result.hash_anchor)
    }

    pub fn info(&self) -> Option<&ResultInfo> {
        self.declaration().map(|result| &result.info)
    }

    pub fn declaration(&self) -> Option<&SearchResult> {
        match self {
            Self::Declaration { result, .. } | Self::Type { result, .. } => Some(result.as_ref()),
            Self::Package { .. } | Self::Module(_) => None,
        }
    }

    /// Popularity of the result's package.
    pub fn score(&self) -> u32 {
        match self {
            Self::Declaration { score, .. } | Self::Type { score, .. } => *score,
            Self::Package { result, .. } => result.score,
            Self::Module(module) => module.score,
        }
    }

    pub const fn penalty(&self) -> Option<u32> {
        match self {
            Self::Type { penalty, .. } => Some(*penalty),
            _ => None,
        }
    }

    fn rank_key(&self) -> RankKey<'_> {
        RankKey {
            score: self.score(),
            package: self.package(),
            module: self.module_name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryResponse<I = NameCursor, T = ShapeCursor> {
    pub state: EngineState<I, T>,
    pub results: Vec<RankedResult>,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn query<I, T>(&self, state: &EngineState<I, T>, input: &str) -> QueryResponse<I, T>
    where
        I: IndexCursor<Symbol = char>,
        T: IndexCursor<Symbol = ShapeChunk>,
    {
        let input = input.trim();
        if input.is_empty() {
            return QueryResponse {
                state: state.with_cursors(state.index.reset(), state.type_index.reset()),
                results: vec![],
            };
        }

        let mut response = match parse_type_query(input) {
            Ok(query) if query.is_valuable() => {
                let shape = shape_of_query(&query);
                let type_index = state.type_index.seek(&shape);

                let mut results: Vec<RankedResult> = type_index
                    .results()
                    .into_iter()
                    .filter_map(|result| {
                        let penalty = penalty(&query, result.info.declared_type()?);
                        Some(RankedResult::Type {
                            score: state.scores.score_for(&result.package_info),
                            result,
                            penalty,
                        })
                    })
                    .collect();
                results.sort_by_key(|result| result.penalty());

                tracing::debug!(
                    %input,
                    %query,
                    shape_len = shape.len(),
                    results = results.len(),
                    "Answered type query"
                );
                QueryResponse {
                    state: state.with_cursors(state.index.clone(), type_index),
                    results,
                }
            }
            parsed => {
                if let Err(error) = &parsed {
                    tracing::trace!(%input, %error, "Not a type query");
                }
                self.text_query(state, input)
            }
        };

        if let Some(max) = self.config.max_results {
            response.results.truncate(max);
        }
        response
    }

    fn text_query<I, T>(&self, state: &EngineState<I, T>, input: &str) -> QueryResponse<I, T>
    where
        I: IndexCursor<Symbol = char>,
        T: IndexCursor<Symbol = ShapeChunk>,
    {
        let normalized = input.to_lowercase();
        let key: Vec<char> = normalized.chars().collect();
        let index = state.index.seek(&key);

        let mut results: Vec<RankedResult> = index
            .results()
            .into_iter()
            .map(|result| RankedResult::Declaration {
                score: state.scores.score_for(&result.package_info),
                result,
            })
            .collect();
        results.extend(
            state
                .package_index
                .query(&normalized)
                .into_iter()
                .map(|result| RankedResult::Package {
                    package_info: PackageInfo::Package(result.name.clone()),
                    result,
                }),
        );
        results.extend(
            state
                .module_index
                .query(&state.scores, &normalized)
                .into_iter()
                .map(RankedResult::Module),
        );
        results.sort_by(|a, b| a.rank_key().cmp(&b.rank_key()));

        tracing::debug!(%input, results = results.len(), "Answered text query");
        QueryResponse {
            state: state.with_cursors(index, state.type_index.clone()),
            results,
        }
    }
}
