//! Package popularity scores and text-result ordering.
//!
//! A package's score is the number of packages in the set that depend on it.
//! User code and compiler builtins outrank every named package.

use super::result::PackageInfo;
use crate::docs::PackageMeta;
use ahash::AHashMap;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct Scores {
    by_package: AHashMap<String, u32>,
    max: u32,
}

impl Scores {
    /// Scores taken as given, keyed by package name.
    pub fn from_map<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let by_package: AHashMap<String, u32> = scores
            .into_iter()
            .map(|(name, score)| (name.into(), score))
            .collect();
        let max = by_package.values().copied().max().unwrap_or(0);
        Self { by_package, max }
    }

    /// Counts reverse dependencies across `packages`.
    ///
    /// Manifest names carry `package_prefix` (e.g. `purescript-`); it is stripped so
    /// the keys line up with the package names recovered from source paths.
    pub fn from_packages(packages: &[PackageMeta], package_prefix: &str) -> Self {
        let strip = |name: &str| name.strip_prefix(package_prefix).unwrap_or(name).to_string();

        let mut counts: AHashMap<String, u32> = packages
            .iter()
            .map(|package| (strip(&package.name), 0))
            .collect();
        for package in packages {
            for dependency in package.dependencies.keys() {
                *counts.entry(strip(dependency)).or_insert(0) += 1;
            }
        }

        tracing::debug!(packages = counts.len(), "Computed package scores");
        Self::from_map(counts)
    }

    /// Score of a named package, or 0 when it is not in the table.
    pub fn get(&self, package: &str) -> u32 {
        self.by_package.get(package).copied().unwrap_or(0)
    }

    pub fn score_for(&self, package: &PackageInfo) -> u32 {
        match package {
            PackageInfo::Package(name) => self.get(name),
            PackageInfo::LocalPackage | PackageInfo::Builtin => self.max.saturating_add(1),
            PackageInfo::UnknownPackage => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.by_package.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_package.is_empty()
    }
}

/// Sort key for text results: score descending, then package, then module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankKey<'a> {
    pub score: u32,
    pub package: &'a PackageInfo,
    /// Package results have no module and sort before module-bearing results.
    pub module: Option<&'a str>,
}

impl Ord for RankKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.package.cmp(other.package))
            .then_with(|| self.module.cmp(&other.module))
    }
}

impl PartialOrd for RankKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
