//! Type registry: canonical name to descriptor

use rustc_hash::FxHashMap;

use reflekt_types::{MemberKind, ReflectError, ReflectResult};

use crate::builtins::builtins;
use crate::ty::TypeRef;

/// Registry of the types reachable by name
#[derive(Debug)]
pub struct TypeRegistry {
    /// Types in registration order
    types: Vec<TypeRef>,
    /// Canonical name to index
    name_to_index: FxHashMap<String, usize>,
}

impl TypeRegistry {
    /// Create a registry holding the built-in types
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for ty in builtins().all() {
            registry.register(ty.clone());
        }
        registry
    }

    /// Create a registry without any types
    pub fn empty() -> Self {
        Self {
            types: Vec::new(),
            name_to_index: FxHashMap::default(),
        }
    }

    /// Register a type; a type with the same name is replaced
    pub fn register(&mut self, ty: TypeRef) {
        match self.name_to_index.get(ty.name()) {
            Some(&index) => self.types[index] = ty,
            None => {
                self.name_to_index
                    .insert(ty.name().to_string(), self.types.len());
                self.types.push(ty);
            }
        }
    }

    /// Get a type by canonical name
    pub fn get(&self, name: &str) -> Option<&TypeRef> {
        self.name_to_index
            .get(name)
            .and_then(|index| self.types.get(*index))
    }

    /// Get a type by canonical name, failing with a lookup error
    pub fn resolve(&self, name: &str) -> ReflectResult<TypeRef> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ReflectError::lookup(MemberKind::Type, name, "registry"))
    }

    /// Whether a type with this name is registered
    pub fn exists(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over the types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.iter()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
