//! Classification of types and values

use reflekt_types::{
    is_standard_name, kind_for_name, MemberKind, ReflectError, ReflectResult, TypeKind,
};
use rustc_hash::FxHashMap;

use crate::builtins::builtins;
use crate::convert;
use crate::ty::{TypeDescriptor, TypeRef};
use crate::value::Value;

/// Kind of a type. Never `Null`.
pub fn kind_of_type(ty: &TypeDescriptor) -> TypeKind {
    kind_for_name(ty.name())
}

/// Kind of a value; `Null` exactly when the value is absent.
///
/// Scalars classify as their boxed kind.
pub fn kind_of(value: &Value) -> TypeKind {
    match value {
        Value::Null => TypeKind::Null,
        Value::Bool(_) => TypeKind::BooleanBoxed,
        Value::Byte(_) => TypeKind::ByteBoxed,
        Value::Char(_) => TypeKind::CharBoxed,
        Value::Short(_) => TypeKind::ShortBoxed,
        Value::Int(_) => TypeKind::IntBoxed,
        Value::Long(_) => TypeKind::LongBoxed,
        Value::Float(_) => TypeKind::FloatBoxed,
        Value::Double(_) => TypeKind::DoubleBoxed,
        Value::Str(_) => TypeKind::String,
        Value::Date(_) => TypeKind::Date,
        Value::Uuid(_) => TypeKind::Uuid,
        Value::Bytes(_)
        | Value::Chars(_)
        | Value::Enum(_)
        | Value::List(_)
        | Value::Set(_)
        | Value::Map(_)
        | Value::ConcurrentMap(_)
        | Value::Var(_)
        | Value::Object(_) => TypeKind::Object,
    }
}

/// Whether the value's kind is simple (`Null` included)
pub fn is_simple(value: &Value) -> bool {
    kind_of(value).is_simple()
}

/// Whether the value is numeric
pub fn is_number(value: &Value) -> bool {
    kind_of(value).is_number()
}

/// Collections, maps and arrays of non-primitive elements
pub fn is_data_structure(ty: &TypeDescriptor) -> bool {
    let b = builtins();
    b.collection.is_assignable_from(ty)
        || b.map.is_assignable_from(ty)
        || b.object_array.is_assignable_from(ty)
}

/// Plain structured application type
pub fn is_bean_type(ty: &TypeDescriptor) -> bool {
    kind_of_type(ty) == TypeKind::Object
        && !ty.is_primitive()
        && !ty.is_annotation()
        && !ty.is_enum()
        && !ty.is_interface()
        && !ty.is_array()
        && !is_data_structure(ty)
        && !is_standard_name(ty.name())
}

/// Whether the value is an instance of a bean type
pub fn is_bean(value: &Value) -> bool {
    value.runtime_type().is_some_and(|ty| is_bean_type(&ty))
}

/// Whether the canonical name belongs to a standard namespace
pub fn is_standard_type(name: &str) -> bool {
    is_standard_name(name)
}

/// Wrapper type of a primitive
pub fn wrapper_of(ty: &TypeDescriptor) -> ReflectResult<TypeRef> {
    ty.as_primitive()
        .map(|p| builtins().wrapper(p).clone())
        .ok_or_else(|| ReflectError::not_expected(format!("'{}' is not a primitive type", ty)))
}

/// Runtime type of the value, `lang.Object` for `Null`
pub fn of(value: &Value) -> TypeRef {
    value
        .runtime_type()
        .unwrap_or_else(|| builtins().object.clone())
}

/// Runtime types of the values, `None` at `Null` positions
pub fn types_of(values: &[Value]) -> Vec<Option<TypeRef>> {
    values.iter().map(Value::runtime_type).collect()
}

/// Text rendering of a value; `None` for `Null`
pub fn str(value: &Value) -> Option<String> {
    match convert::convert(value, &builtins().string) {
        Ok(Value::Str(s)) => Some(s),
        _ => None,
    }
}

/// Boolean reading of a value; `false` for `Null`
pub fn bool(value: &Value) -> ReflectResult<bool> {
    match convert::convert(value, &builtins().boolean_obj)? {
        Value::Bool(b) => Ok(b),
        _ => Ok(false),
    }
}

/// The interface a proxy type stands for: its first interface outside the
/// standard namespaces. Other types are returned as-is.
pub fn unproxy(ty: &TypeRef) -> ReflectResult<TypeRef> {
    if !ty.is_proxy() {
        return Ok(ty.clone());
    }

    ty.interfaces()
        .iter()
        .find(|i| !is_standard_name(i.name()))
        .cloned()
        .ok_or_else(|| ReflectError::lookup(MemberKind::Interface, "<proxied>", ty.name()))
}

/// Simple name of the (unproxied) type
pub fn entity_name(ty: &TypeRef) -> ReflectResult<String> {
    Ok(unproxy(ty)?.simple_name().to_string())
}

/// Simple name of the (unproxied) runtime type of a value
pub fn entity_name_of(value: &Value) -> ReflectResult<String> {
    let ty = value
        .runtime_type()
        .ok_or_else(|| ReflectError::not_expected("entity must not be null"))?;
    entity_name(&ty)
}

/// Map of simple name to type; later types win on name clashes, keeping
/// the position of the first
pub fn class_map<'a>(types: impl IntoIterator<Item = &'a TypeRef>) -> Vec<(String, TypeRef)> {
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    let mut map: Vec<(String, TypeRef)> = Vec::new();

    for ty in types {
        let name = ty.simple_name().to_string();
        match positions.get(&name) {
            Some(&index) => map[index].1 = ty.clone(),
            None => {
                positions.insert(name.clone(), map.len());
                map.push((name, ty.clone()));
            }
        }
    }

    map
}
