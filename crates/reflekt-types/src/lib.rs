//! Reflekt Type Kinds
//!
//! Leaf crate of the Reflekt workspace: the closed set of type kinds,
//! the canonical-name kind registry, primitive/wrapper pairs and the
//! error taxonomy shared by every other layer.

#![warn(missing_docs)]

pub mod error;
pub mod kind;
pub mod names;
pub mod primitive;

pub use error::{
    ConversionError, ErrorKind, InstantiationError, MemberKind, ReflectError, ReflectResult,
};
pub use kind::{kind_for_name, TypeKind};
pub use primitive::{is_standard_name, PrimitiveType};
