//! Input data model: declarations, type ASTs, and package manifests.

pub mod declaration;
pub mod types;

pub use declaration::{
    ChildDeclaration, ChildDeclarationInfo, DataDeclType, DeclType, Declaration, DeclarationInfo,
    DocModule, FunDep, PackageMeta, Repository, SourcePosition, SourceSpan, TypeArgument,
};
pub use types::{Constraint, QualifiedName, Type};
