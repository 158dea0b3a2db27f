//! Incremental search over extracted documentation: by name prefix, and by
//! approximate type signature.

pub mod config;
pub mod docs;
pub mod engine;
pub mod error;
pub mod search;
pub mod session;
pub mod tracing;
pub mod trie;

pub use config::{EngineConfig, IndexConfig, SearchConfig};
pub use engine::{Engine, EngineState, QueryResponse, RankedResult};
pub use error::{ParseError, Result};
pub use search::{PackageInfo, Scores, SearchIndex, SearchResult};
pub use session::{Corpus, Session};
