//! Canonical names of the built-in types
//!
//! Type identity is the canonical dotted name. Primitives use bare
//! lowercase names, everything else lives in a namespace.

/// `boolean` primitive
pub const BOOLEAN: &str = "boolean";
/// `byte` primitive
pub const BYTE: &str = "byte";
/// `char` primitive
pub const CHAR: &str = "char";
/// `short` primitive
pub const SHORT: &str = "short";
/// `int` primitive
pub const INT: &str = "int";
/// `long` primitive
pub const LONG: &str = "long";
/// `float` primitive
pub const FLOAT: &str = "float";
/// `double` primitive
pub const DOUBLE: &str = "double";
/// `void` pseudo-primitive
pub const VOID: &str = "void";

/// Boolean wrapper
pub const BOOLEAN_OBJ: &str = "lang.Boolean";
/// Byte wrapper
pub const BYTE_OBJ: &str = "lang.Byte";
/// Character wrapper
pub const CHAR_OBJ: &str = "lang.Character";
/// Short wrapper
pub const SHORT_OBJ: &str = "lang.Short";
/// Integer wrapper
pub const INT_OBJ: &str = "lang.Integer";
/// Long wrapper
pub const LONG_OBJ: &str = "lang.Long";
/// Float wrapper
pub const FLOAT_OBJ: &str = "lang.Float";
/// Double wrapper
pub const DOUBLE_OBJ: &str = "lang.Double";
/// Void wrapper
pub const VOID_OBJ: &str = "lang.Void";

/// Root of every non-primitive type
pub const OBJECT: &str = "lang.Object";
/// Common supertype of the numeric wrappers
pub const NUMBER: &str = "lang.Number";
/// Common supertype of enumerations
pub const ENUM: &str = "lang.Enum";
/// Text
pub const STRING: &str = "lang.String";
/// Instant in time
pub const DATE: &str = "util.Date";
/// 128-bit identifier
pub const UUID: &str = "util.Uuid";

/// Collection interface
pub const COLLECTION: &str = "util.Collection";
/// Ordered sequence interface
pub const LIST: &str = "util.List";
/// Set interface
pub const SET: &str = "util.Set";
/// Mapping interface
pub const MAP: &str = "util.Map";
/// Concurrent mapping interface
pub const CONCURRENT_MAP: &str = "util.ConcurrentMap";
/// Default list implementation
pub const ARRAY_LIST: &str = "util.ArrayList";
/// Default set implementation
pub const LINKED_HASH_SET: &str = "util.LinkedHashSet";
/// Default map implementation
pub const LINKED_HASH_MAP: &str = "util.LinkedHashMap";
/// Default concurrent map implementation
pub const CONCURRENT_HASH_MAP: &str = "util.ConcurrentHashMap";

/// Byte array
pub const BYTE_ARRAY: &str = "byte[]";
/// Char array
pub const CHAR_ARRAY: &str = "char[]";
/// Object array
pub const OBJECT_ARRAY: &str = "lang.Object[]";

/// Reactive variable interface
pub const VAR: &str = "var.Var";
/// Default reactive variable implementation
pub const SIMPLE_VAR: &str = "var.SimpleVar";
