//! Async session holding the live engine state.
//!
//! Queries from one input box must see each other's cursors, so they are
//! serialized through a write lock. Index rebuilds run on the blocking pool and
//! swap the whole state in when done.

use crate::config::{IndexConfig, SearchConfig};
use crate::docs::{DocModule, PackageMeta};
use crate::engine::{Engine, EngineState, RankedResult};
use crate::error::Result;
use crate::search::{BuildStats, Scores, SearchIndex};
use anyhow::Context;
use std::time::Instant;
use tokio::sync::RwLock;

/// Everything an index is built from.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub modules: Vec<DocModule>,
    pub packages: Vec<PackageMeta>,
    /// Precomputed popularity scores. Derived from `packages` when absent.
    pub scores: Option<Scores>,
}

#[derive(Debug)]
pub struct Session {
    engine: Engine,
    index_config: IndexConfig,
    state: RwLock<EngineState>,
}

impl Session {
    /// Builds the initial index on the blocking pool.
    pub async fn start(config: SearchConfig, corpus: Corpus) -> Result<Self> {
        let index_config = config.index.clone();
        let (state, stats) = tokio::task::spawn_blocking(move || build_state(&index_config, corpus))
            .await
            .context("Index build task failed")?;

        tracing::info!(
            declarations = stats.declarations,
            shapes = stats.shapes,
            "Search session ready"
        );
        Ok(Self {
            engine: Engine::new(config.engine),
            index_config: config.index,
            state: RwLock::new(state),
        })
    }

    /// Answers `input`, advancing the session's cursors.
    pub async fn query(&self, input: &str) -> Vec<RankedResult> {
        let mut state = self.state.write().await;
        let response = self.engine.query(&*state, input);
        *state = response.state;
        response.results
    }

    /// Rebuilds the index from `corpus` and replaces the current state.
    ///
    /// Queries keep being answered from the old state until the new one is ready.
    /// Cursor positions are not carried over.
    pub async fn reload(&self, corpus: Corpus) -> Result<BuildStats> {
        let start = Instant::now();
        let config = self.index_config.clone();
        let (state, stats) = tokio::task::spawn_blocking(move || build_state(&config, corpus))
            .await
            .context("Index rebuild task failed")?;

        *self.state.write().await = state;
        tracing::info!(
            declarations = stats.declarations,
            dropped = stats.dropped,
            elapsed = ?start.elapsed(),
            "Reloaded search index"
        );
        Ok(stats)
    }

    /// A snapshot of the current state.
    pub async fn state(&self) -> EngineState {
        self.state.read().await.clone()
    }

    pub const fn engine(&self) -> &Engine {
        &self.engine
    }
}

fn build_state(config: &IndexConfig, corpus: Corpus) -> (EngineState, BuildStats) {
    let Corpus {
        modules,
        packages,
        scores,
    } = corpus;
    let scores =
        scores.unwrap_or_else(|| Scores::from_packages(&packages, &config.package_prefix));
    let index = SearchIndex::build(&modules, config);
    let stats = index.stats();
    (EngineState::new(index, scores, &packages, config), stats)
}
