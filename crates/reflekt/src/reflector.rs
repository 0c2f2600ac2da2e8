//! Reflector: registry, converter, permissions and customization in one place
//!
//! Most operations that need to look types up by name, check access, or
//! convert values hang off [`Reflector`]. Stateless queries (classification,
//! assignability, introspection) are free functions in their own modules.

use std::path::Path;
use std::sync::Arc;

use reflekt_types::ReflectResult;

use crate::access::PermissionStore;
use crate::builtins::builtins;
use crate::config::{ConfigError, CustomizationConfig, ReflektConfig};
use crate::convert::Converter;
use crate::registry::TypeRegistry;
use crate::ty::TypeRef;
use crate::value::Value;

/// Entry point for name-based reflection
#[derive(Debug)]
pub struct Reflector {
    registry: TypeRegistry,
    converter: Converter,
    permissions: PermissionStore,
    customization: CustomizationConfig,
}

impl Default for Reflector {
    fn default() -> Self {
        Self::new()
    }
}

impl Reflector {
    /// Reflector with the built-in types, unrestricted access and the
    /// default customization names
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            converter: Converter::default(),
            permissions: PermissionStore::new(),
            customization: CustomizationConfig::default(),
        }
    }

    /// Reflector configured from a validated [`ReflektConfig`]
    pub fn from_config(config: &ReflektConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let reflector = Self {
            registry: TypeRegistry::new(),
            converter: Converter::new(Arc::new(config.date_codec())),
            permissions: config.permission_store()?,
            customization: config.customization.clone(),
        };

        tracing::debug!(
            prefix = %reflector.customization.prefix,
            namespace = %reflector.customization.namespace,
            restricted = reflector.permissions.has_any_restrictions(),
            "reflector configured"
        );
        Ok(reflector)
    }

    /// Reflector configured from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_config(&ReflektConfig::from_file(path)?)
    }

    // ===== Types =====

    /// Register a type, replacing any type of the same name
    pub fn register(&mut self, ty: TypeRef) {
        tracing::trace!(type_name = ty.name(), "registering type");
        self.registry.register(ty);
    }

    /// Registered types
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Registered types, mutably
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Whether a type of this name is registered
    pub fn exists(&self, name: &str) -> bool {
        self.registry.exists(name)
    }

    /// The type of this name, if registered
    pub fn class_if_exists(&self, name: &str) -> Option<TypeRef> {
        self.registry.get(name).cloned()
    }

    /// The type of this name, failing with a lookup error
    pub fn class_for_name(&self, name: &str) -> ReflectResult<TypeRef> {
        self.registry.resolve(name)
    }

    // ===== Conversion =====

    /// Converter in use
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// See [`Converter::convert`]
    pub fn convert(&self, value: &Value, target: &TypeRef) -> ReflectResult<Value> {
        self.converter.convert(value, target)
    }

    /// See [`Converter::convert_str`]
    pub fn convert_str(&self, text: &str, target: &TypeRef) -> ReflectResult<Value> {
        self.converter.convert_str(text, target)
    }

    /// Text form of a value; `None` for `Null`
    pub fn str(&self, value: &Value) -> Option<String> {
        match self.converter.convert(value, &builtins().string) {
            Ok(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    // ===== Policy =====

    /// Permission policy
    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    /// Permission policy, mutably
    pub fn permissions_mut(&mut self) -> &mut PermissionStore {
        &mut self.permissions
    }

    /// Override naming
    pub fn customization(&self) -> &CustomizationConfig {
        &self.customization
    }
}
