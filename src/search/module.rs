//! Module name index.

use super::result::{PackageInfo, SearchResult};
use super::scoring::Scores;
use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResult {
    pub name: String,
    pub package_info: PackageInfo,
    pub score: u32,
}

/// Module names and the packages that provide them.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    modules: AHashMap<String, BTreeSet<PackageInfo>>,
}

impl ModuleIndex {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a SearchResult>) -> Self {
        let mut modules: AHashMap<String, BTreeSet<PackageInfo>> = AHashMap::new();
        for result in results {
            modules
                .entry(result.module_name.clone())
                .or_default()
                .insert(result.package_info.clone());
        }
        Self { modules }
    }

    /// Modules whose name, or any dot-separated suffix of it, starts with `input`
    /// (case-insensitively). One result per providing package.
    pub fn query(&self, scores: &Scores, input: &str) -> Vec<ModuleResult> {
        let input = input.to_lowercase();
        let mut results = vec![];

        for (name, packages) in &self.modules {
            if !matches_module(&name.to_lowercase(), &input) {
                continue;
            }
            results.extend(packages.iter().map(|package| ModuleResult {
                name: name.clone(),
                package_info: package.clone(),
                score: scores.score_for(package),
            }));
        }

        results
    }

    pub fn packages(&self, module: &str) -> Option<&BTreeSet<PackageInfo>> {
        self.modules.get(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn matches_module(name: &str, input: &str) -> bool {
    name.starts_with(input)
        || name
            .match_indices('.')
            .any(|(i, _)| name[i + 1..].starts_with(input))
}
