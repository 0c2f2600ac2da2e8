//! Assignability with primitive/wrapper equivalence

use crate::builtins::builtins;
use crate::ty::{TypeDescriptor, TypeRef};
use crate::value::Value;

/// Whether `ty` is identical to, or a subtype of, any of `targets`.
///
/// A primitive on either side also matches through its wrapper, so a
/// boxed integer satisfies an `int` target and vice versa.
pub fn is_assignable_to(ty: &TypeDescriptor, targets: &[TypeRef]) -> bool {
    let b = builtins();
    let source = match ty.as_primitive() {
        Some(p) => b.wrapper(p).as_ref(),
        None => ty,
    };

    targets.iter().any(|target| match target.as_primitive() {
        Some(p) => target.is_assignable_from(ty) || b.wrapper(p).is_assignable_from(source),
        None => target.is_assignable_from(ty) || target.is_assignable_from(source),
    })
}

/// Whether a present value's runtime type is assignable to any target.
/// Always `false` for `Null`.
pub fn instance_of(value: &Value, targets: &[TypeRef]) -> bool {
    value
        .runtime_type()
        .is_some_and(|ty| is_assignable_to(&ty, targets))
}

/// Positional check of values against parameter types. Lengths must
/// match; `Null` is assignable to every parameter.
pub fn are_assignable(params: &[TypeRef], values: &[Value]) -> bool {
    params.len() == values.len()
        && params
            .iter()
            .zip(values)
            .all(|(param, value)| value.is_null() || instance_of(value, std::slice::from_ref(param)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_satisfies_primitive_target() {
        let b = builtins();
        assert!(is_assignable_to(&b.int_obj, &[b.int.clone()]));
        assert!(is_assignable_to(&b.int, &[b.int_obj.clone()]));
        assert!(is_assignable_to(&b.int, &[b.int.clone()]));
        assert!(!is_assignable_to(&b.long_obj, &[b.int.clone()]));
    }

    #[test]
    fn test_primitive_source_reaches_wrapper_supertypes() {
        let b = builtins();
        assert!(is_assignable_to(&b.int, &[b.number.clone()]));
        assert!(is_assignable_to(&b.int, &[b.object.clone()]));
        assert!(!is_assignable_to(&b.boolean, &[b.number.clone()]));
    }

    #[test]
    fn test_any_target_matches() {
        let b = builtins();
        let targets = [b.string.clone(), b.long.clone()];
        assert!(is_assignable_to(&b.long_obj, &targets));
        assert!(is_assignable_to(&b.string, &targets));
        assert!(!is_assignable_to(&b.int_obj, &targets));
        assert!(!is_assignable_to(&b.int_obj, &[]));
    }

    #[test]
    fn test_instance_of() {
        let b = builtins();
        assert!(instance_of(&Value::Int(5), &[b.int.clone()]));
        assert!(instance_of(&Value::List(vec![]), &[b.collection.clone()]));
        assert!(!instance_of(&Value::Null, &[b.object.clone()]));
    }

    #[test]
    fn test_are_assignable() {
        let b = builtins();
        let params = [b.string.clone(), b.int.clone()];

        assert!(are_assignable(&params, &[Value::str("a"), Value::Int(1)]));
        assert!(are_assignable(&params, &[Value::Null, Value::Null]));
        assert!(!are_assignable(&params, &[Value::str("a")]));
        assert!(!are_assignable(&params, &[Value::Int(1), Value::str("a")]));
        assert!(are_assignable(&[], &[]));
    }
}
