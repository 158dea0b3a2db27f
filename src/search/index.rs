//! Search index construction.
//!
//! [`SearchIndex::build`] turns extracted modules into two tries sharing the same
//! results: a name trie keyed by lower-cased characters, and a shape trie keyed by
//! [`ShapeChunk`]s for every result with a declared type.

use super::result::{HashAnchor, PackageInfo, ResultInfo, SearchResult};
use super::shape::{ShapeChunk, shape_of_type};
use crate::config::IndexConfig;
use crate::docs::{
    ChildDeclaration, ChildDeclarationInfo, Constraint, DeclType, Declaration,
    DeclarationInfo, DocModule, QualifiedName, SourceSpan, Type, TypeArgument,
};
use crate::trie::PrefixTrie;
use regex::Regex;
use std::collections::VecDeque;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

/// `type (op)` or `(op)`.
static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(type )?\((.+)\)$").expect("Invalid alias pattern"));

pub type DeclTrie = PrefixTrie<char, VecDeque<Arc<SearchResult>>>;
pub type TypeTrie = PrefixTrie<ShapeChunk, VecDeque<Arc<SearchResult>>>;

/// Counters reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub declarations: usize,
    pub children: usize,
    /// Declarations and children skipped for an incomplete payload.
    pub dropped: usize,
    pub shapes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    decls: DeclTrie,
    types: TypeTrie,
    stats: BuildStats,
}

impl SearchIndex {
    pub fn build(modules: &[DocModule], config: &IndexConfig) -> Self {
        let start = Instant::now();
        let mut builder = IndexBuilder::new(config);
        for module in modules {
            builder.add_module(module);
        }
        let index = builder.finalize();

        tracing::info!(
            modules = modules.len(),
            declarations = index.stats.declarations,
            children = index.stats.children,
            dropped = index.stats.dropped,
            shapes = index.stats.shapes,
            elapsed = ?start.elapsed(),
            "Built search index"
        );
        index
    }

    pub const fn decls(&self) -> &DeclTrie {
        &self.decls
    }

    pub const fn types(&self) -> &TypeTrie {
        &self.types
    }

    pub const fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Every indexed result, in name order.
    pub fn results(&self) -> impl Iterator<Item = &Arc<SearchResult>> {
        self.decls.values().into_iter().flatten()
    }

    pub(crate) fn into_tries(self) -> (DeclTrie, TypeTrie) {
        (self.decls, self.types)
    }
}

struct IndexBuilder<'a> {
    config: &'a IndexConfig,
    decls: DeclTrie,
    stats: BuildStats,
}

impl<'a> IndexBuilder<'a> {
    fn new(config: &'a IndexConfig) -> Self {
        Self {
            config,
            decls: PrefixTrie::new(),
            stats: BuildStats::default(),
        }
    }

    fn add_module(&mut self, module: &DocModule) {
        tracing::trace!(
            module = %module.name,
            declarations = module.declarations.len(),
            "Indexing module"
        );
        for declaration in &module.declarations {
            self.add_declaration(&module.name, declaration);
        }
    }

    fn add_declaration(&mut self, module_name: &str, declaration: &Declaration) {
        let indexable_children = declaration
            .children
            .iter()
            .filter(|child| !matches!(child.info, ChildDeclarationInfo::Instance { .. }))
            .count();

        let Some((name, info)) = declaration_entry(declaration) else {
            self.stats.dropped += 1 + indexable_children;
            return;
        };

        let package_info =
            extract_package(module_name, declaration.source_span.as_ref(), self.config);

        for child in &declaration.children {
            self.add_child(module_name, &package_info, declaration, &info, child);
        }

        self.insert(SearchResult {
            hash_anchor: info.hash_anchor(),
            name,
            comments: declaration.comments.clone(),
            module_name: module_name.to_string(),
            package_info,
            source_span: declaration.source_span.clone(),
            info,
        });
        self.stats.declarations += 1;
    }

    fn add_child(
        &mut self,
        module_name: &str,
        package_info: &PackageInfo,
        parent: &Declaration,
        parent_info: &ResultInfo,
        child: &ChildDeclaration,
    ) {
        let info = match (&child.info, parent_info) {
            (ChildDeclarationInfo::Instance { .. }, _) => return,
            (
                ChildDeclarationInfo::DataConstructor { arguments },
                ResultInfo::Data { data_decl_type, .. },
            ) => ResultInfo::DataConstructor {
                arguments: arguments.clone(),
                data_decl_type: *data_decl_type,
            },
            (
                ChildDeclarationInfo::TypeClassMember { type_ },
                ResultInfo::TypeClass { arguments, .. },
            ) => {
                let class = QualifiedName::new(module_name.split('.'), parent.title.as_str());
                ResultInfo::TypeClassMember {
                    type_: member_type(&class, arguments, type_),
                    type_class: class,
                    type_class_arguments: arguments.clone(),
                }
            }
            _ => {
                self.stats.dropped += 1;
                return;
            }
        };

        self.insert(SearchResult {
            name: child.title.clone(),
            comments: child.comments.clone(),
            hash_anchor: HashAnchor::Value,
            module_name: module_name.to_string(),
            package_info: package_info.clone(),
            source_span: child.source_span.clone(),
            info,
        });
        self.stats.children += 1;
    }

    fn insert(&mut self, result: SearchResult) {
        let path: Vec<char> = result.name.to_lowercase().chars().collect();
        self.decls.push(path, Arc::new(result));
    }

    /// Second pass: index every typed result by shape.
    fn finalize(mut self) -> SearchIndex {
        let mut types = PrefixTrie::new();
        for result in self.decls.values().into_iter().flatten() {
            if let Some(ty) = result.info.declared_type() {
                types.push(shape_of_type(ty), Arc::clone(result));
                self.stats.shapes += 1;
            }
        }

        SearchIndex {
            decls: self.decls,
            types,
            stats: self.stats,
        }
    }
}

/// Name and payload of a top-level declaration, or `None` if its payload is
/// incomplete for its kind.
fn declaration_entry(declaration: &Declaration) -> Option<(String, ResultInfo)> {
    let DeclarationInfo {
        decl_type,
        type_,
        data_decl_type,
        type_arguments,
        arguments,
        kind,
        fundeps,
        superclasses,
    } = &declaration.info;
    let title = declaration.title.clone();

    let info = match decl_type {
        DeclType::Value => ResultInfo::Value {
            type_: type_.clone()?,
        },
        DeclType::Data => ResultInfo::Data {
            type_arguments: type_arguments.clone()?,
            data_decl_type: (*data_decl_type)?,
        },
        DeclType::ExternData => ResultInfo::ExternData {
            kind: kind.clone()?,
        },
        DeclType::TypeSynonym => ResultInfo::TypeSynonym {
            arguments: arguments.clone()?,
            type_: type_.clone()?,
        },
        DeclType::TypeClass => ResultInfo::TypeClass {
            fundeps: fundeps.clone().unwrap_or_default(),
            arguments: arguments.clone()?,
            superclasses: superclasses.clone()?,
        },
        DeclType::ExternKind => ResultInfo::ExternKind,
        DeclType::Alias => return Some(alias_entry(&title)),
    };
    Some((title, info))
}

/// Classifies an alias title: `type (op)` names a type operator, `(op)` a value
/// operator. Anything else is kept verbatim as a value alias.
fn alias_entry(title: &str) -> (String, ResultInfo) {
    match ALIAS_RE.captures(title) {
        Some(captures) => {
            let name = captures[2].to_string();
            if captures.get(1).is_some() {
                (name, ResultInfo::TypeAlias)
            } else {
                (name, ResultInfo::ValueAlias)
            }
        }
        None => (title.to_string(), ResultInfo::ValueAlias),
    }
}

/// `forall <args>. Class <args> => member`
fn member_type(class: &QualifiedName, arguments: &[TypeArgument], member: &Type) -> Type {
    let constraint = Constraint {
        constraint_class: class.clone(),
        constraint_args: arguments.iter().map(|arg| Type::var(&arg.name)).collect(),
    };
    let body = Type::constrained(constraint, member.clone());
    arguments.iter().rev().fold(body, |body, arg| {
        Type::forall(arg.name.as_str(), arg.kind.clone(), body)
    })
}

/// Recovers the package a declaration belongs to.
///
/// Builtin modules win. Otherwise the source path decides: a path under one of the
/// configured dependency directories names its package in the next segment, any
/// other path is local code, and no path at all is unknown.
pub fn extract_package(
    module_name: &str,
    source_span: Option<&SourceSpan>,
    config: &IndexConfig,
) -> PackageInfo {
    let builtin = config.builtin_module.as_str();
    if module_name == builtin
        || module_name
            .strip_prefix(builtin)
            .is_some_and(|rest| rest.starts_with('.'))
    {
        return PackageInfo::Builtin;
    }

    let Some(span) = source_span else {
        return PackageInfo::UnknownPackage;
    };

    let mut segments = span.name.split('/').filter(|segment| !segment.is_empty());
    let Some(first) = segments.next() else {
        return PackageInfo::UnknownPackage;
    };
    if !config.dependency_dirs.iter().any(|dir| dir == first) {
        return PackageInfo::LocalPackage;
    }

    match segments.next() {
        Some(package) => {
            let name = package
                .strip_prefix(config.package_prefix.as_str())
                .unwrap_or(package);
            PackageInfo::Package(name.to_string())
        }
        None => PackageInfo::UnknownPackage,
    }
}
