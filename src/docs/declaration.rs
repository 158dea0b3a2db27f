//! Normalized declarations handed over by the extraction collaborator.
//!
//! Payload fields are optional because the extraction format does not guarantee
//! them; the index builder drops declarations whose payload is incomplete.

use super::types::{Constraint, Type};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition(pub u32, pub u32);

impl SourcePosition {
    pub const fn line(self) -> u32 {
        self.0
    }

    pub const fn column(self) -> u32 {
        self.1
    }
}

/// Location of a declaration in its source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
    /// Path of the source file, relative to the project root.
    pub name: String,
}

/// Declared kind of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclType {
    Value,
    Data,
    ExternData,
    TypeSynonym,
    TypeClass,
    Alias,
    ExternKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataDeclType {
    Data,
    Newtype,
}

/// A type parameter with an optional kind annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeArgument {
    pub name: String,
    #[serde(default)]
    pub kind: Option<Type>,
}

impl TypeArgument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }
}

/// A functional dependency of a type class, `lhs -> rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunDep {
    pub lhs: Vec<String>,
    pub rhs: Vec<String>,
}

/// Kind tag plus the kind-specific payload of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationInfo {
    pub decl_type: DeclType,
    #[serde(default, rename = "type")]
    pub type_: Option<Type>,
    #[serde(default)]
    pub data_decl_type: Option<DataDeclType>,
    #[serde(default)]
    pub type_arguments: Option<Vec<TypeArgument>>,
    #[serde(default)]
    pub arguments: Option<Vec<TypeArgument>>,
    #[serde(default)]
    pub kind: Option<Type>,
    #[serde(default)]
    pub fundeps: Option<Vec<FunDep>>,
    #[serde(default)]
    pub superclasses: Option<Vec<Constraint>>,
}

impl DeclarationInfo {
    /// Payload-free info of the given kind; fill in fields with struct update syntax.
    pub const fn new(decl_type: DeclType) -> Self {
        Self {
            decl_type,
            type_: None,
            data_decl_type: None,
            type_arguments: None,
            arguments: None,
            kind: None,
            fundeps: None,
            superclasses: None,
        }
    }
}

/// Payload of a nested declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "declType", rename_all = "camelCase")]
pub enum ChildDeclarationInfo {
    Instance {
        #[serde(default)]
        dependencies: Vec<Constraint>,
        #[serde(rename = "type")]
        type_: Type,
    },
    DataConstructor {
        arguments: Vec<Type>,
    },
    TypeClassMember {
        #[serde(rename = "type")]
        type_: Type,
    },
}

/// A declaration nested under a data type or type class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDeclaration {
    pub title: String,
    #[serde(default)]
    pub comments: Option<String>,
    pub info: ChildDeclarationInfo,
    #[serde(default)]
    pub source_span: Option<SourceSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub title: String,
    #[serde(default)]
    pub comments: Option<String>,
    pub info: DeclarationInfo,
    #[serde(default)]
    pub source_span: Option<SourceSpan>,
    #[serde(default)]
    pub children: Vec<ChildDeclaration>,
}

/// All declarations of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocModule {
    pub name: String,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// Repository link of a package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub url: String,
}

/// Package manifest data, as found in a bower-style `bower.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMeta {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Dependency name to version range.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub repository: Option<Repository>,
}
