//! Read-only reflective access to host types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{ConstructorParam, FieldInfo, TypeInfo, TypeKind};

/// Capability the core queries for constructor, field and enum metadata.
///
/// Implementations must be pure lookups; the core never mutates through it.
pub trait TypeInfoProvider {
    /// Description of the named type, if known.
    fn type_info(&self, name: &str) -> Option<&TypeInfo>;

    /// Every known type name, used for "did you mean" suggestions.
    fn known_types(&self) -> Vec<&str>;

    /// Primary constructor parameters of a struct type.
    fn constructor(&self, name: &str) -> Option<&[ConstructorParam]> {
        match &self.type_info(name)?.kind {
            TypeKind::Struct { constructor, .. } => Some(constructor),
            TypeKind::Enum { .. } => None,
        }
    }

    /// Instance fields of a struct type.
    fn instance_fields(&self, name: &str) -> Option<&[FieldInfo]> {
        match &self.type_info(name)?.kind {
            TypeKind::Struct { fields, .. } => Some(fields),
            TypeKind::Enum { .. } => None,
        }
    }

    /// Associated constants of a struct type.
    fn static_fields(&self, name: &str) -> Option<&[FieldInfo]> {
        match &self.type_info(name)?.kind {
            TypeKind::Struct { static_fields, .. } => Some(static_fields),
            TypeKind::Enum { .. } => None,
        }
    }

    /// Members of an enum type, in declaration order.
    fn enum_members(&self, name: &str) -> Option<&[String]> {
        match &self.type_info(name)?.kind {
            TypeKind::Enum { members } => Some(members),
            TypeKind::Struct { .. } => None,
        }
    }
}

/// In-memory [`TypeInfoProvider`] keyed by type name.
///
/// Deserializes from a JSON array of [`TypeInfo`]; later entries replace
/// earlier ones with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeInfo>", into = "Vec<TypeInfo>")]
pub struct TypeCatalog {
    types: HashMap<String, TypeInfo>,
}

impl TypeCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any previous entry of the same name.
    pub fn insert(&mut self, info: TypeInfo) {
        self.types.insert(info.name.clone(), info);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, info: TypeInfo) -> Self {
        self.insert(info);
        self
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeInfoProvider for TypeCatalog {
    fn type_info(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    fn known_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<TypeInfo> for TypeCatalog {
    fn from_iter<I: IntoIterator<Item = TypeInfo>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for info in iter {
            catalog.insert(info);
        }
        catalog
    }
}

impl From<Vec<TypeInfo>> for TypeCatalog {
    fn from(types: Vec<TypeInfo>) -> Self {
        types.into_iter().collect()
    }
}

impl From<TypeCatalog> for Vec<TypeInfo> {
    fn from(catalog: TypeCatalog) -> Self {
        let mut types: Self = catalog.types.into_values().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }
}
