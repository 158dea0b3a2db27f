//! Search infrastructure: type queries, shapes, penalties, and the indexes the
//! engine queries.

pub mod index;
pub mod module;
pub mod package;
pub mod penalty;
pub mod query;
pub mod result;
pub mod scoring;
pub mod shape;
pub(crate) mod tokenize;

pub use index::{BuildStats, DeclTrie, SearchIndex, TypeTrie, extract_package};
pub use module::{ModuleIndex, ModuleResult};
pub use package::{PackageIndex, PackageResult};
pub use penalty::{Substitution, penalty, type_size, unify};
pub use query::{TypeQuery, parse_type_query};
pub use result::{HashAnchor, PackageInfo, ResultInfo, SearchResult};
pub use scoring::{RankKey, Scores};
pub use shape::{ShapeChunk, TypeShape, shape_of_query, shape_of_type};
