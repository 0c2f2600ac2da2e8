//! Type kinds and the canonical-name kind registry
//!
//! Every type and every runtime value falls into exactly one [`TypeKind`].
//! The registry mapping canonical names to kinds is built once on first
//! use and never written again.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::names;

/// Classification bucket of a type or value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Absence of a value (only ever produced for values)
    Null,
    /// `boolean`
    Boolean,
    /// `lang.Boolean`
    BooleanBoxed,
    /// `byte`
    Byte,
    /// `lang.Byte`
    ByteBoxed,
    /// `char`
    Char,
    /// `lang.Character`
    CharBoxed,
    /// `short`
    Short,
    /// `lang.Short`
    ShortBoxed,
    /// `int`
    Int,
    /// `lang.Integer`
    IntBoxed,
    /// `long`
    Long,
    /// `lang.Long`
    LongBoxed,
    /// `float`
    Float,
    /// `lang.Float`
    FloatBoxed,
    /// `double`
    Double,
    /// `lang.Double`
    DoubleBoxed,
    /// `lang.String`
    String,
    /// `util.Date`
    Date,
    /// `util.Uuid`
    Uuid,
    /// Anything not otherwise recognized
    Object,
}

impl TypeKind {
    /// Scalar, string, date and uuid kinds are simple; `Object` is not.
    pub const fn is_simple(self) -> bool {
        !matches!(self, TypeKind::Object)
    }

    /// The byte/short/int/long/float/double kinds, primitive or boxed.
    pub const fn is_number(self) -> bool {
        matches!(
            self,
            TypeKind::Byte
                | TypeKind::ByteBoxed
                | TypeKind::Short
                | TypeKind::ShortBoxed
                | TypeKind::Int
                | TypeKind::IntBoxed
                | TypeKind::Long
                | TypeKind::LongBoxed
                | TypeKind::Float
                | TypeKind::FloatBoxed
                | TypeKind::Double
                | TypeKind::DoubleBoxed
        )
    }

    /// Whether this is the unboxed side of a primitive/wrapper pair
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeKind::Boolean
                | TypeKind::Byte
                | TypeKind::Char
                | TypeKind::Short
                | TypeKind::Int
                | TypeKind::Long
                | TypeKind::Float
                | TypeKind::Double
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Null => "null",
            TypeKind::Boolean | TypeKind::BooleanBoxed => "boolean",
            TypeKind::Byte | TypeKind::ByteBoxed => "byte",
            TypeKind::Char | TypeKind::CharBoxed => "char",
            TypeKind::Short | TypeKind::ShortBoxed => "short",
            TypeKind::Int | TypeKind::IntBoxed => "int",
            TypeKind::Long | TypeKind::LongBoxed => "long",
            TypeKind::Float | TypeKind::FloatBoxed => "float",
            TypeKind::Double | TypeKind::DoubleBoxed => "double",
            TypeKind::String => "string",
            TypeKind::Date => "date",
            TypeKind::Uuid => "uuid",
            TypeKind::Object => "object",
        };
        write!(f, "{}", name)
    }
}

static KINDS: LazyLock<FxHashMap<&'static str, TypeKind>> = LazyLock::new(|| {
    let mut kinds = FxHashMap::default();

    kinds.insert(names::BOOLEAN, TypeKind::Boolean);
    kinds.insert(names::BYTE, TypeKind::Byte);
    kinds.insert(names::CHAR, TypeKind::Char);
    kinds.insert(names::SHORT, TypeKind::Short);
    kinds.insert(names::INT, TypeKind::Int);
    kinds.insert(names::LONG, TypeKind::Long);
    kinds.insert(names::FLOAT, TypeKind::Float);
    kinds.insert(names::DOUBLE, TypeKind::Double);

    kinds.insert(names::STRING, TypeKind::String);

    kinds.insert(names::BOOLEAN_OBJ, TypeKind::BooleanBoxed);
    kinds.insert(names::BYTE_OBJ, TypeKind::ByteBoxed);
    kinds.insert(names::CHAR_OBJ, TypeKind::CharBoxed);
    kinds.insert(names::SHORT_OBJ, TypeKind::ShortBoxed);
    kinds.insert(names::INT_OBJ, TypeKind::IntBoxed);
    kinds.insert(names::LONG_OBJ, TypeKind::LongBoxed);
    kinds.insert(names::FLOAT_OBJ, TypeKind::FloatBoxed);
    kinds.insert(names::DOUBLE_OBJ, TypeKind::DoubleBoxed);

    kinds.insert(names::DATE, TypeKind::Date);
    kinds.insert(names::UUID, TypeKind::Uuid);

    kinds
});

/// Look up the kind registered for a canonical type name.
///
/// Exact match only; any unknown name is `Object`. Never returns `Null`.
pub fn kind_for_name(name: &str) -> TypeKind {
    KINDS.get(name).copied().unwrap_or(TypeKind::Object)
}
