//! Package name index.

use super::scoring::Scores;
use crate::docs::PackageMeta;
use crate::trie::PrefixTrie;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageResult {
    /// Package name without the configured prefix.
    pub name: String,
    pub description: Option<String>,
    pub score: u32,
    pub dependencies: Vec<String>,
    pub repository: Option<String>,
}

/// Prefix index over lower-cased package names.
///
/// Package queries are cheap and rare enough that every query starts from the root.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    trie: PrefixTrie<char, VecDeque<Arc<PackageResult>>>,
}

impl PackageIndex {
    pub fn new(packages: &[PackageMeta], scores: &Scores, package_prefix: &str) -> Self {
        let strip = |name: &str| name.strip_prefix(package_prefix).unwrap_or(name).to_string();

        let mut trie = PrefixTrie::new();
        for package in packages {
            let name = strip(&package.name);
            let result = PackageResult {
                score: scores.get(&name),
                description: package.description.clone(),
                dependencies: package.dependencies.keys().map(|dep| strip(dep)).collect(),
                repository: package.repository.as_ref().map(|repo| repo.url.clone()),
                name,
            };
            trie.push(result.name.to_lowercase().chars(), Arc::new(result));
        }

        tracing::debug!(packages = trie.len(), "Built package index");
        Self { trie }
    }

    /// Packages whose lower-cased name starts with `input`.
    pub fn query(&self, input: &str) -> Vec<Arc<PackageResult>> {
        let key: Vec<char> = input.to_lowercase().chars().collect();
        self.trie
            .query_from(&self.trie.cursor(), &key)
            .results()
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    pub const fn len(&self) -> usize {
        self.trie.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}
