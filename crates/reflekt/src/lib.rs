//! Reflekt
//!
//! Runtime type introspection and value conversion over a registry of
//! type descriptors.
//!
//! # Layers
//!
//! - [`ty`], [`builtins`], [`registry`]: type descriptors and lookup by name
//! - [`classify`], [`assignability`]: kinds and assignment compatibility
//! - [`convert`], [`dates`]: text and value conversion
//! - [`members`], [`access`]: fields, methods and the permission policy
//! - [`instantiate`], [`structure`]: object construction
//! - [`config`], [`reflector`]: configuration and the [`Reflector`] facade
//!
//! # Example
//!
//! ```
//! use reflekt::{builtins, Reflector, Value};
//!
//! let reflector = Reflector::new();
//! let n = reflector.convert_str("42", &builtins().int).unwrap();
//! assert_eq!(n, Value::Int(42));
//! ```

#![warn(missing_docs)]

pub mod access;
pub mod assignability;
pub mod builtins;
pub mod classify;
pub mod config;
pub mod convert;
pub mod dates;
pub mod instantiate;
pub mod members;
pub mod reflector;
pub mod registry;
pub mod structure;
pub mod ty;
pub mod value;

pub use access::{AccessGuard, AccessOp, Accessibility, PermissionStore, ReflectionPermission};
pub use assignability::{are_assignable, instance_of, is_assignable_to};
pub use builtins::{builtins, Builtins};
pub use config::{ConfigError, ReflektConfig};
pub use convert::{Converter, Numeric};
pub use dates::{CanonicalDates, DateCodec};
pub use instantiate::unique_instance_of;
pub use reflector::Reflector;
pub use registry::TypeRegistry;
pub use ty::{
    Annotation, ConstructorDescriptor, FieldDescriptor, MethodDescriptor, TypeBuilder,
    TypeDescriptor, TypeFlavor, TypeRef, Visibility,
};
pub use value::{EnumValue, Instance, SharedMap, Value, ValueMap, VarCell};

pub use reflekt_types::{
    kind_for_name, ConversionError, ErrorKind, InstantiationError, MemberKind, PrimitiveType,
    ReflectError, ReflectResult, TypeKind,
};
