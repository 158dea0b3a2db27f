//! Indexed search results.

use crate::docs::{
    Constraint, DataDeclType, FunDep, QualifiedName, SourceSpan, Type, TypeArgument,
};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Where a declaration comes from.
///
/// Ordered local first, then compiler builtins, then named packages by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum PackageInfo {
    /// The user's own sources.
    LocalPackage,
    /// Compiler-provided `Prim` modules.
    Builtin,
    Package(String),
    UnknownPackage,
}

impl PackageInfo {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Package(name) => Some(name),
            _ => None,
        }
    }
}

impl Display for PackageInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPackage => f.write_str("<local>"),
            Self::Builtin => f.write_str("<builtin>"),
            Self::Package(name) => f.write_str(name),
            Self::UnknownPackage => f.write_str("<unknown>"),
        }
    }
}

/// Namespace of a declaration, used to build documentation anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HashAnchor {
    #[serde(rename = "v")]
    Value,
    #[serde(rename = "t")]
    Type,
    #[serde(rename = "k")]
    Kind,
}

impl HashAnchor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "v",
            Self::Type => "t",
            Self::Kind => "k",
        }
    }
}

impl Display for HashAnchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "declType", rename_all = "camelCase")]
pub enum ResultInfo {
    Data {
        type_arguments: Vec<TypeArgument>,
        data_decl_type: DataDeclType,
    },
    ExternData {
        kind: Type,
    },
    TypeSynonym {
        arguments: Vec<TypeArgument>,
        #[serde(rename = "type")]
        type_: Type,
    },
    DataConstructor {
        arguments: Vec<Type>,
        data_decl_type: DataDeclType,
    },
    TypeClassMember {
        #[serde(rename = "type")]
        type_: Type,
        type_class: QualifiedName,
        type_class_arguments: Vec<TypeArgument>,
    },
    TypeClass {
        fundeps: Vec<FunDep>,
        arguments: Vec<TypeArgument>,
        superclasses: Vec<Constraint>,
    },
    Value {
        #[serde(rename = "type")]
        type_: Type,
    },
    ValueAlias,
    TypeAlias,
    ExternKind,
}

impl ResultInfo {
    /// The full type of the declaration, if it has one worth matching against.
    pub const fn declared_type(&self) -> Option<&Type> {
        match self {
            Self::Value { type_ } | Self::TypeClassMember { type_, .. } | Self::TypeSynonym { type_, .. } => {
                Some(type_)
            }
            _ => None,
        }
    }

    pub const fn hash_anchor(&self) -> HashAnchor {
        match self {
            Self::Value { .. }
            | Self::ValueAlias
            | Self::DataConstructor { .. }
            | Self::TypeClassMember { .. } => HashAnchor::Value,
            Self::Data { .. }
            | Self::ExternData { .. }
            | Self::TypeSynonym { .. }
            | Self::TypeClass { .. }
            | Self::TypeAlias => HashAnchor::Type,
            Self::ExternKind => HashAnchor::Kind,
        }
    }

    /// Short human-readable kind, e.g. `"value"` or `"class"`.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Data {
                data_decl_type: DataDeclType::Newtype,
                ..
            } => "newtype",
            Self::Data { .. } | Self::ExternData { .. } => "data",
            Self::TypeSynonym { .. } => "type",
            Self::DataConstructor { .. } => "constructor",
            Self::TypeClassMember { .. } => "member",
            Self::TypeClass { .. } => "class",
            Self::Value { .. } => "value",
            Self::ValueAlias | Self::TypeAlias => "alias",
            Self::ExternKind => "kind",
        }
    }
}

/// One indexed declaration. Shared between the name and shape tries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub name: String,
    pub comments: Option<String>,
    pub hash_anchor: HashAnchor,
    pub module_name: String,
    pub package_info: PackageInfo,
    pub source_span: Option<SourceSpan>,
    pub info: ResultInfo,
}

impl SearchResult {
    /// Documentation anchor, e.g. `Data.Array#v:map`.
    pub fn anchor(&self) -> String {
        format!("{}#{}:{}", self.module_name, self.hash_anchor, self.name)
    }
}
