//! Member introspection and policy-checked member access
//!
//! Every walk goes up the supertype chain iteratively, stops before the
//! root, and yields members in declaration order with the most derived
//! type first.

use reflekt_types::{ConversionError, MemberKind, ReflectError, ReflectResult};

use crate::access::{AccessGuard, AccessOp};
use crate::assignability::{are_assignable, instance_of};
use crate::reflector::Reflector;
use crate::ty::{
    type_names, Annotation, ConstructorDescriptor, FieldDescriptor, MethodDescriptor, TypeDescriptor,
    TypeRef,
};
use crate::value::{Instance, Value};

// ============================================================================
// Introspection
// ============================================================================

/// Fields declared by the type and its ancestors
pub fn fields(ty: &TypeDescriptor) -> Vec<&FieldDescriptor> {
    ty.lineage()
        .into_iter()
        .flat_map(|t| t.declared_fields())
        .collect()
}

/// Fields carrying the annotation
pub fn fields_annotated<'a>(ty: &'a TypeDescriptor, annotation: &TypeDescriptor) -> Vec<&'a FieldDescriptor> {
    fields(ty)
        .into_iter()
        .filter(|f| f.is_annotated(annotation))
        .collect()
}

/// Methods declared by the type and its ancestors
pub fn methods(ty: &TypeDescriptor) -> Vec<&MethodDescriptor> {
    ty.lineage()
        .into_iter()
        .flat_map(|t| t.declared_methods())
        .collect()
}

/// Methods carrying the annotation
pub fn methods_annotated<'a>(ty: &'a TypeDescriptor, annotation: &TypeDescriptor) -> Vec<&'a MethodDescriptor> {
    methods(ty)
        .into_iter()
        .filter(|m| m.is_annotated(annotation))
        .collect()
}

/// Methods with the given name, overloads included
pub fn methods_named<'a>(ty: &'a TypeDescriptor, name: &str) -> Vec<&'a MethodDescriptor> {
    methods(ty)
        .into_iter()
        .filter(|m| m.name() == name)
        .collect()
}

/// Annotations declared on the type and its ancestors
pub fn annotations(ty: &TypeDescriptor) -> Vec<&Annotation> {
    ty.lineage()
        .into_iter()
        .flat_map(|t| t.declared_annotations())
        .collect()
}

/// Interfaces declared directly by the type and its ancestors
pub fn implemented_interfaces(ty: &TypeDescriptor) -> Vec<TypeRef> {
    ty.lineage()
        .into_iter()
        .flat_map(|t| t.interfaces().iter().cloned())
        .collect()
}

/// Public methods of the type, including those inherited from every
/// supertype and interface
pub fn public_methods(ty: &TypeDescriptor) -> Vec<&MethodDescriptor> {
    let mut found = Vec::new();
    let mut pending: Vec<&TypeDescriptor> = vec![ty];
    let mut seen: Vec<&str> = Vec::new();

    while !pending.is_empty() {
        let current = pending.remove(0);
        if seen.contains(&current.name()) {
            continue;
        }
        seen.push(current.name());

        found.extend(
            current
                .declared_methods()
                .iter()
                .filter(|m| m.visibility().is_public()),
        );

        if let Some(parent) = current.supertype() {
            pending.push(parent);
        }
        pending.extend(current.interfaces().iter().map(|i| i.as_ref()));
    }

    found
}

/// Method by exact signature: public (inherited included) first, then
/// any method declared by the type itself
pub fn find_method<'a>(ty: &'a TypeDescriptor, name: &str, params: &[TypeRef]) -> Option<&'a MethodDescriptor> {
    public_methods(ty)
        .into_iter()
        .find(|m| m.name() == name && m.has_params(params))
        .or_else(|| {
            ty.declared_methods()
                .iter()
                .find(|m| m.name() == name && m.has_params(params))
        })
}

/// [`find_method`], failing with a lookup error
pub fn method<'a>(ty: &'a TypeDescriptor, name: &str, params: &[TypeRef]) -> ReflectResult<&'a MethodDescriptor> {
    find_method(ty, name, params)
        .ok_or_else(|| ReflectError::lookup(MemberKind::Method, signature(name, params), ty.name()))
}

/// Public field by name, declared by the type or an ancestor
pub fn find_field<'a>(ty: &'a TypeDescriptor, name: &str) -> Option<&'a FieldDescriptor> {
    fields(ty)
        .into_iter()
        .find(|f| f.name() == name && f.visibility().is_public())
}

/// [`find_field`], failing with a lookup error
pub fn field<'a>(ty: &'a TypeDescriptor, name: &str) -> ReflectResult<&'a FieldDescriptor> {
    find_field(ty, name).ok_or_else(|| ReflectError::lookup(MemberKind::Field, name, ty.name()))
}

/// Public constructor with exactly these parameter types
pub fn constructor<'a>(ty: &'a TypeDescriptor, params: &[TypeRef]) -> ReflectResult<&'a ConstructorDescriptor> {
    ty.constructors()
        .iter()
        .find(|c| c.visibility().is_public() && c.has_params(params))
        .ok_or_else(|| ReflectError::lookup(MemberKind::Constructor, signature("<init>", params), ty.name()))
}

/// First public method with the name whose parameters accept the arguments
pub fn find_method_by_args<'a>(ty: &'a TypeDescriptor, name: &str, args: &[Value]) -> Option<&'a MethodDescriptor> {
    public_methods(ty)
        .into_iter()
        .find(|m| m.name() == name && are_assignable(m.params(), args))
}

/// Whether the public no-argument method `name` carries the annotation
pub fn annotated_method(ty: &TypeDescriptor, name: &str, annotation: &TypeDescriptor) -> ReflectResult<bool> {
    Ok(method(ty, name, &[])?.is_annotated(annotation))
}

/// Parameter names of a method: the names supplied with its descriptor,
/// or `arg0`, `arg1`, ... when none were supplied
pub fn method_parameter_names(method: &MethodDescriptor) -> Vec<String> {
    match method.param_names() {
        Some(names) if names.len() == method.params().len() => names.to_vec(),
        _ => (0..method.params().len()).map(|i| format!("arg{}", i)).collect(),
    }
}

fn signature(name: &str, params: &[TypeRef]) -> String {
    format!("{}({})", name, type_names(params).join(", "))
}

fn render_args(args: &[Value]) -> String {
    let items: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("[{}]", items.join(", "))
}

// ============================================================================
// Access
// ============================================================================

impl Reflector {
    /// Write a field of an instance, searching the declaring type up the
    /// lineage
    pub fn set_field_value(&self, instance: &Value, name: &str, value: Value) -> ReflectResult<()> {
        let (object, field) = declared_field(instance, name)?;
        self.set_field(field, object, value)
    }

    /// Write a known field of an instance
    pub fn set_field(&self, field: &FieldDescriptor, instance: &Instance, value: Value) -> ReflectResult<()> {
        let fits = if value.is_null() {
            !field.ty().is_primitive()
        } else {
            instance_of(&value, std::slice::from_ref(field.ty()))
        };

        if !fits {
            return Err(ConversionError::FieldType {
                value: value.to_string(),
                field: field.name().to_string(),
                field_type: field.ty().name().to_string(),
            }
            .into());
        }

        let _guard = AccessGuard::elevate(
            self.permissions(),
            field.access(),
            MemberKind::Field,
            field.name(),
            field.declaring_type(),
            AccessOp::Write,
        )?;

        if instance.set(field.name(), value) {
            Ok(())
        } else {
            Err(ReflectError::lookup(MemberKind::Field, field.name(), instance.ty().name()))
        }
    }

    /// Read a field of an instance, searching the declaring type up the
    /// lineage
    pub fn get_field_value(&self, instance: &Value, name: &str) -> ReflectResult<Value> {
        let (object, field) = declared_field(instance, name)?;
        self.get_field(field, object)
    }

    /// [`Reflector::get_field_value`], returning `default` on any failure
    pub fn get_field_value_or(&self, instance: &Value, name: &str, default: Value) -> Value {
        self.get_field_value(instance, name).unwrap_or(default)
    }

    /// Read a known field of an instance
    pub fn get_field(&self, field: &FieldDescriptor, instance: &Instance) -> ReflectResult<Value> {
        let _guard = AccessGuard::elevate(
            self.permissions(),
            field.access(),
            MemberKind::Field,
            field.name(),
            field.declaring_type(),
            AccessOp::Read,
        )?;

        instance
            .get(field.name())
            .ok_or_else(|| ReflectError::lookup(MemberKind::Field, field.name(), instance.ty().name()))
    }

    /// Invoke a method on a target
    pub fn invoke(&self, method: &MethodDescriptor, target: &Value, args: &[Value]) -> ReflectResult<Value> {
        self.call(method, Some(target), args)
    }

    /// Invoke a static method
    pub fn invoke_static(&self, method: &MethodDescriptor, args: &[Value]) -> ReflectResult<Value> {
        self.call(method, None, args)
    }

    fn call(&self, method: &MethodDescriptor, target: Option<&Value>, args: &[Value]) -> ReflectResult<Value> {
        if !are_assignable(method.params(), args) {
            return Err(ConversionError::Incompatible {
                value: render_args(args),
                target: signature(method.name(), method.params()),
            }
            .into());
        }

        let _guard = AccessGuard::elevate(
            self.permissions(),
            method.access(),
            MemberKind::Method,
            method.name(),
            method.declaring_type(),
            AccessOp::Invoke,
        )?;

        let target = if method.is_static() { None } else { target };
        tracing::trace!(method = method.name(), declaring = method.declaring_type(), "invoking method");
        method.call(target, args)
    }
}

fn declared_field<'a>(instance: &'a Value, name: &str) -> ReflectResult<(&'a Instance, &'a FieldDescriptor)> {
    let object = instance
        .as_instance()
        .ok_or_else(|| ReflectError::lookup(MemberKind::Field, name, instance.type_name()))?;

    let field = fields(object.ty())
        .into_iter()
        .find(|f| f.name() == name)
        .ok_or_else(|| ReflectError::lookup(MemberKind::Field, name, object.ty().name()))?;

    Ok((object, field))
}
