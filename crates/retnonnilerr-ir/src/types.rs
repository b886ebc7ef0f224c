//! Type system helpers for working with Go types from bridge data.

use crate::ir::{Package, TypeKind, TypeRef};
use std::collections::{HashMap, HashSet};

/// Type lookup table for a package
pub struct TypeMap<'a> {
    types: HashMap<u32, &'a TypeRef>,
}

impl<'a> TypeMap<'a> {
    pub fn from_package(pkg: &'a Package) -> Self {
        let types = pkg.types.iter().map(|t| (t.id, t)).collect();
        Self { types }
    }

    pub fn get(&self, id: u32) -> Option<&'a TypeRef> {
        self.types.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TypeRef> + '_ {
        self.types.values().copied()
    }
}

/// The predeclared `error` interface of one package's type table.
///
/// Resolved once per package and handed to the checks. Matching is by
/// identity: a named type that merely implements `error` is a different type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorType {
    ids: HashSet<u32>,
}

impl ErrorType {
    /// Find the universe `error` type. `None` if the package never mentions it.
    pub fn resolve(types: &TypeMap<'_>) -> Option<Self> {
        let ids: HashSet<u32> = types
            .iter()
            .filter(|t| t.kind == TypeKind::Interface && t.name == "error")
            .map(|t| t.id)
            .collect();
        if ids.is_empty() {
            None
        } else {
            Some(Self { ids })
        }
    }

    /// Whether `type_id` is identical to `error`.
    pub fn is(&self, type_id: u32) -> bool {
        self.ids.contains(&type_id)
    }
}
