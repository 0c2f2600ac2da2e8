//! Runtime values
//!
//! [`Value`] is the closed set of values the converter and instantiator
//! work with. Scalars are held inline; containers and instances are
//! either owned or shared behind a lock.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use reflekt_types::PrimitiveType;

use crate::builtins::builtins;
use crate::dates::truncate_to_millis;
use crate::ty::{TypeDescriptor, TypeRef};

/// A runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value
    Null,
    /// `boolean`
    Bool(bool),
    /// `byte`
    Byte(i8),
    /// `char`
    Char(char),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `lang.String`
    Str(String),
    /// `util.Date`, millisecond precision; build with [`Value::date`]
    Date(DateTime<Utc>),
    /// `util.Uuid`
    Uuid(Uuid),
    /// `byte[]`
    Bytes(Vec<u8>),
    /// `char[]`
    Chars(Vec<char>),
    /// Enumeration constant
    Enum(EnumValue),
    /// `util.ArrayList`
    List(Vec<Value>),
    /// `util.LinkedHashSet` (insertion order, no duplicates)
    Set(Vec<Value>),
    /// `util.LinkedHashMap`
    Map(ValueMap),
    /// `util.ConcurrentHashMap`
    ConcurrentMap(SharedMap),
    /// `var.SimpleVar`
    Var(VarCell),
    /// Instance of a declared type
    Object(Instance),
}

impl Value {
    /// Set value from the items, dropping later duplicates
    pub fn set_of(items: impl IntoIterator<Item = Value>) -> Value {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Date value, truncated to the millisecond
    pub fn date(date: DateTime<Utc>) -> Value {
        Value::Date(truncate_to_millis(date))
    }

    /// String value
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    /// Default value of a slot of the given type: zero for primitives,
    /// `Null` otherwise
    pub fn default_for(ty: &TypeDescriptor) -> Value {
        match ty.as_primitive() {
            Some(PrimitiveType::Boolean) => Value::Bool(false),
            Some(PrimitiveType::Byte) => Value::Byte(0),
            Some(PrimitiveType::Char) => Value::Char('\0'),
            Some(PrimitiveType::Short) => Value::Short(0),
            Some(PrimitiveType::Int) => Value::Int(0),
            Some(PrimitiveType::Long) => Value::Long(0),
            Some(PrimitiveType::Float) => Value::Float(0.0),
            Some(PrimitiveType::Double) => Value::Double(0.0),
            Some(PrimitiveType::Void) | None => Value::Null,
        }
    }

    /// Whether this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of the value; scalars report their wrapper type.
    /// `None` for `Null`.
    pub fn runtime_type(&self) -> Option<TypeRef> {
        let b = builtins();
        let ty = match self {
            Value::Null => return None,
            Value::Bool(_) => &b.boolean_obj,
            Value::Byte(_) => &b.byte_obj,
            Value::Char(_) => &b.char_obj,
            Value::Short(_) => &b.short_obj,
            Value::Int(_) => &b.int_obj,
            Value::Long(_) => &b.long_obj,
            Value::Float(_) => &b.float_obj,
            Value::Double(_) => &b.double_obj,
            Value::Str(_) => &b.string,
            Value::Date(_) => &b.date,
            Value::Uuid(_) => &b.uuid,
            Value::Bytes(_) => &b.byte_array,
            Value::Chars(_) => &b.char_array,
            Value::Enum(e) => e.ty(),
            Value::List(_) => &b.array_list,
            Value::Set(_) => &b.linked_hash_set,
            Value::Map(_) => &b.linked_hash_map,
            Value::ConcurrentMap(_) => &b.concurrent_hash_map,
            Value::Var(_) => &b.simple_var,
            Value::Object(instance) => instance.ty(),
        };
        Some(ty.clone())
    }

    /// Canonical name of the runtime type, `"null"` for `Null`
    pub fn type_name(&self) -> String {
        match self.runtime_type() {
            Some(ty) => ty.name().to_string(),
            None => "null".to_string(),
        }
    }

    /// Text of a `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Payload of a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral payload widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Short(n) => Some(i64::from(*n)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    /// Shared instance of an `Object`
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Items of a `List` or `Set`
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Entries of a `Map`
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => truncate_to_millis(*a) == truncate_to_millis(*b),
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Chars(a), Value::Chars(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::ConcurrentMap(a), Value::ConcurrentMap(b)) => a.ptr_eq(b),
            (Value::Var(a), Value::Var(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::Short(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Double(n) => write!(f, "{:?}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::Bytes(bytes) => write_seq(f, bytes.iter()),
            Value::Chars(chars) => write_seq(f, chars.iter()),
            Value::Enum(e) => write!(f, "{}", e.name()),
            Value::List(items) | Value::Set(items) => write_seq(f, items.iter()),
            Value::Map(map) => write!(f, "{}", map),
            Value::ConcurrentMap(map) => write!(f, "{}", map.snapshot()),
            Value::Var(var) => write!(f, "{}", var.get()),
            Value::Object(instance) => write!(f, "{}", instance),
        }
    }
}

fn write_seq<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    char => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => Str,
    Uuid => Uuid,
    Vec<u8> => Bytes,
    Vec<char> => Chars,
    EnumValue => Enum,
    Vec<Value> => List,
    ValueMap => Map,
    Instance => Object,
    VarCell => Var,
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::date(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// Enumeration constants
// ============================================================================

/// Constant of an enumeration type
#[derive(Debug, Clone)]
pub struct EnumValue {
    ty: TypeRef,
    name: String,
}

impl EnumValue {
    /// Constant `name` of `ty`; `None` if `ty` declares no such constant
    pub fn new(ty: &TypeRef, name: &str) -> Option<Self> {
        ty.enum_constants()
            .iter()
            .any(|c| c == name)
            .then(|| Self {
                ty: ty.clone(),
                name: name.to_string(),
            })
    }

    /// Enumeration type
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Constant name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the constant in declaration order
    pub fn ordinal(&self) -> usize {
        self.ty
            .enum_constants()
            .iter()
            .position(|c| c == &self.name)
            .unwrap_or(0)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty.name() == other.ty.name() && self.name == other.name
    }
}

// ============================================================================
// Maps
// ============================================================================

/// Insertion-ordered map of values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its position
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Value for the key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Value for a string key
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl fmt::Display for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, "}}")
    }
}

/// Map shared between threads
#[derive(Debug, Clone, Default)]
pub struct SharedMap(Arc<RwLock<ValueMap>>);

impl SharedMap {
    /// Empty shared map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.0.write().insert(key, value)
    }

    /// Copy of the value for the key
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> ValueMap {
        self.0.read().clone()
    }

    /// Whether both handles share the same map
    pub fn ptr_eq(&self, other: &SharedMap) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// Reactive variables
// ============================================================================

#[derive(Debug)]
struct VarData {
    name: String,
    value: RwLock<Value>,
}

/// Named, mutable, shared value cell
#[derive(Debug, Clone)]
pub struct VarCell(Arc<VarData>);

impl VarCell {
    /// New variable holding `value`
    pub fn new(name: &str, value: Value) -> Self {
        Self(Arc::new(VarData {
            name: name.to_string(),
            value: RwLock::new(value),
        }))
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Current value
    pub fn get(&self) -> Value {
        self.0.value.read().clone()
    }

    /// Replace the value
    pub fn set(&self, value: Value) {
        *self.0.value.write() = value;
    }

    /// Whether both handles share the same cell
    pub fn ptr_eq(&self, other: &VarCell) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// Instances
// ============================================================================

#[derive(Debug)]
struct InstanceData {
    ty: TypeRef,
    slots: RwLock<Vec<(String, Value)>>,
}

/// Shared instance of a declared type.
///
/// Holds one slot per field declared anywhere in the type's lineage.
/// Slot access here is raw; policy-checked access goes through
/// [`crate::Reflector`].
#[derive(Debug, Clone)]
pub struct Instance(Arc<InstanceData>);

impl Instance {
    /// Default-initialized instance of `ty`
    pub fn new(ty: &TypeRef) -> Self {
        let slots = ty
            .lineage()
            .into_iter()
            .flat_map(|t| t.declared_fields())
            .map(|f| (f.name().to_string(), Value::default_for(f.ty())))
            .collect();

        Self(Arc::new(InstanceData {
            ty: ty.clone(),
            slots: RwLock::new(slots),
        }))
    }

    /// Instance type
    pub fn ty(&self) -> &TypeRef {
        &self.0.ty
    }

    /// Copy of a slot value
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0
            .slots
            .read()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Write a slot; returns `false` if the instance has no such slot
    pub fn set(&self, name: &str, value: Value) -> bool {
        let mut slots = self.0.slots.write();
        match slots.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Whether both handles share the same instance
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.ty().simple_name())?;
        let slots = self.0.slots.read();
        for (i, (name, value)) in slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if matches!(value, Value::Object(_)) {
                write!(f, "{}=<{}>", name, value.type_name())?;
            } else {
                write!(f, "{}={}", name, value)?;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{FieldDescriptor, TypeDescriptor};

    #[test]
    fn test_scalars_report_wrapper_types() {
        assert_eq!(Value::Int(1).type_name(), "lang.Integer");
        assert_eq!(Value::Bool(true).type_name(), "lang.Boolean");
        assert_eq!(Value::str("x").type_name(), "lang.String");
        assert_eq!(Value::Null.type_name(), "null");
        assert!(Value::Null.runtime_type().is_none());
    }

    #[test]
    fn test_display() {
        let list = Value::List(vec![Value::Int(1), Value::str("a"), Value::Null]);
        assert_eq!(list.to_string(), "[1, a, null]");

        let map: ValueMap = [("k", 1), ("j", 2)].into_iter().collect();
        assert_eq!(Value::Map(map).to_string(), "{k=1, j=2}");

        assert_eq!(Value::Double(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let mut map = ValueMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        map.insert("b", 3);

        let keys: Vec<String> = map.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(map.get_str("b"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_set_of_drops_duplicates() {
        let set = Value::set_of([Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(set, Value::Set(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_instance_slots_cover_lineage() {
        let b = builtins();
        let base = TypeDescriptor::class("app.Base")
            .field(FieldDescriptor::new("id", &b.long))
            .build();
        let derived = TypeDescriptor::class("app.Derived")
            .extends(&base)
            .field(FieldDescriptor::new("name", &b.string))
            .build();

        let instance = Instance::new(&derived);
        assert_eq!(instance.get("id"), Some(Value::Long(0)));
        assert_eq!(instance.get("name"), Some(Value::Null));
        assert!(instance.set("name", Value::str("x")));
        assert!(!instance.set("missing", Value::Null));
        assert_eq!(instance.get("name"), Some(Value::str("x")));
    }

    #[test]
    fn test_enum_constants() {
        let color = TypeDescriptor::enumeration("app.Color", ["RED", "GREEN"]).build();
        let green = EnumValue::new(&color, "GREEN").unwrap();
        assert_eq!(green.ordinal(), 1);
        assert!(EnumValue::new(&color, "BLUE").is_none());
    }

    #[test]
    fn test_shared_handles_compare_by_identity() {
        let a = VarCell::new("a", Value::Int(1));
        assert_eq!(Value::Var(a.clone()), Value::Var(a.clone()));
        assert_ne!(Value::Var(a), Value::Var(VarCell::new("a", Value::Int(1))));
    }
}
