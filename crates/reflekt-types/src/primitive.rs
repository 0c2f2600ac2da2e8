//! Primitive types, their wrappers, and standard namespaces

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::names;

/// Primitive (unboxed) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `byte` (signed 8-bit)
    Byte,
    /// `char`
    Char,
    /// `short` (signed 16-bit)
    Short,
    /// `int` (signed 32-bit)
    Int,
    /// `long` (signed 64-bit)
    Long,
    /// `float` (IEEE 754 single precision)
    Float,
    /// `double` (IEEE 754 double precision)
    Double,
    /// `void`
    Void,
}

impl PrimitiveType {
    /// All primitives, in table order
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];

    /// Canonical name of the primitive
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => names::BOOLEAN,
            PrimitiveType::Byte => names::BYTE,
            PrimitiveType::Char => names::CHAR,
            PrimitiveType::Short => names::SHORT,
            PrimitiveType::Int => names::INT,
            PrimitiveType::Long => names::LONG,
            PrimitiveType::Float => names::FLOAT,
            PrimitiveType::Double => names::DOUBLE,
            PrimitiveType::Void => names::VOID,
        }
    }

    /// Canonical name of the wrapper type
    pub const fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => names::BOOLEAN_OBJ,
            PrimitiveType::Byte => names::BYTE_OBJ,
            PrimitiveType::Char => names::CHAR_OBJ,
            PrimitiveType::Short => names::SHORT_OBJ,
            PrimitiveType::Int => names::INT_OBJ,
            PrimitiveType::Long => names::LONG_OBJ,
            PrimitiveType::Float => names::FLOAT_OBJ,
            PrimitiveType::Double => names::DOUBLE_OBJ,
            PrimitiveType::Void => names::VOID_OBJ,
        }
    }

    /// Resolve a primitive from its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Resolve a primitive from its wrapper's canonical name
    pub fn from_wrapper_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.wrapper_name() == name)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

static STANDARD_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(lang|util|var|std|core|alloc)\..*").expect("static pattern is valid")
});

/// Whether a canonical type name belongs to a standard/base namespace
pub fn is_standard_name(name: &str) -> bool {
    STANDARD_NAMESPACE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_table() {
        assert_eq!(PrimitiveType::Int.wrapper_name(), "lang.Integer");
        assert_eq!(PrimitiveType::Char.wrapper_name(), "lang.Character");
        assert_eq!(PrimitiveType::Void.wrapper_name(), "lang.Void");
        assert_eq!(
            PrimitiveType::from_wrapper_name("lang.Double"),
            Some(PrimitiveType::Double)
        );
        assert_eq!(PrimitiveType::from_wrapper_name("lang.String"), None);
    }

    #[test]
    fn test_from_name() {
        for p in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_name(p.name()), Some(p));
        }
        assert_eq!(PrimitiveType::from_name("Integer"), None);
    }

    #[test]
    fn test_standard_names() {
        assert!(is_standard_name("lang.String"));
        assert!(is_standard_name("util.concurrent.ConcurrentMap"));
        assert!(!is_standard_name("app.model.Person"));
        assert!(!is_standard_name("language.Thing"));
        assert!(!is_standard_name("int"));
    }
}
