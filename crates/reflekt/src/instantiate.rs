//! Instance construction
//!
//! Constructors are looked up live on every call, in declaration order.
//! Each invocation runs inside an [`AccessGuard`], so non-public
//! constructors are reachable only when the permission policy allows it.

use reflekt_types::{names, InstantiationError, MemberKind, ReflectError, ReflectResult};

use crate::access::{AccessGuard, AccessOp};
use crate::assignability::{are_assignable, instance_of};
use crate::builtins::builtins;
use crate::reflector::Reflector;
use crate::ty::{ConstructorDescriptor, TypeRef};
use crate::value::{Instance, SharedMap, Value, ValueMap, VarCell};

/// The single value in `values` that is an instance of `ty`; `Null` when
/// there is none.
///
/// Fails when two values qualify.
pub fn unique_instance_of(ty: &TypeRef, values: &[Value]) -> ReflectResult<Value> {
    let mut found: Option<&Value> = None;

    for value in values {
        if !instance_of(value, std::slice::from_ref(ty)) {
            continue;
        }
        if let Some(first) = found {
            return Err(InstantiationError::AmbiguousCandidates {
                type_name: ty.name().to_string(),
                param_type: ty.name().to_string(),
                first: first.to_string(),
                second: value.to_string(),
            }
            .into());
        }
        found = Some(value);
    }

    Ok(found.cloned().unwrap_or(Value::Null))
}

impl Reflector {
    /// New instance through the no-argument path.
    ///
    /// The collection interfaces and `var.Var` get empty defaults; every
    /// other type goes through [`Reflector::new_bean_instance`].
    pub fn new_instance(&self, ty: &TypeRef) -> ReflectResult<Value> {
        let value = match ty.name() {
            names::LIST => Value::List(Vec::new()),
            names::SET => Value::Set(Vec::new()),
            names::MAP => Value::Map(ValueMap::new()),
            names::CONCURRENT_MAP => Value::ConcurrentMap(SharedMap::new()),
            names::VAR => Value::Var(VarCell::new("<new>", Value::Null)),
            names::OBJECT => Value::Object(Instance::new(&builtins().object)),
            _ => return self.new_bean_instance(ty),
        };
        Ok(value)
    }

    /// New instance through the declared no-argument constructor,
    /// whatever its visibility
    pub fn new_bean_instance(&self, ty: &TypeRef) -> ReflectResult<Value> {
        let constructor = ty
            .constructors()
            .iter()
            .find(|c| c.params().is_empty())
            .ok_or_else(|| InstantiationError::NoDefaultConstructor {
                type_name: ty.name().to_string(),
            })?;

        self.construct(ty, constructor, &[])
    }

    /// New instance through the first public constructor accepting the
    /// arguments positionally
    pub fn new_instance_with(&self, ty: &TypeRef, args: &[Value]) -> ReflectResult<Value> {
        let constructor = ty
            .constructors()
            .iter()
            .filter(|c| c.visibility().is_public())
            .find(|c| are_assignable(c.params(), args))
            .ok_or_else(|| InstantiationError::NoMatchingConstructor {
                type_name: ty.name().to_string(),
                args: render(args),
            })?;

        tracing::debug!(
            type_name = ty.name(),
            arity = constructor.params().len(),
            "selected constructor by arguments"
        );
        self.construct(ty, constructor, args)
    }

    /// New instance through the first public constructor, filling each
    /// parameter with the unique pool value assignable to it.
    ///
    /// Parameters without a match receive `Null`; an empty pool falls back
    /// to [`Reflector::new_instance`].
    pub fn new_instance_from_pool(&self, ty: &TypeRef, pool: &[Value]) -> ReflectResult<Value> {
        if pool.is_empty() {
            return self.new_instance(ty);
        }

        let constructor = ty
            .constructors()
            .iter()
            .find(|c| c.visibility().is_public())
            .ok_or_else(|| InstantiationError::NoMatchingConstructor {
                type_name: ty.name().to_string(),
                args: render(pool),
            })?;

        let args = constructor
            .params()
            .iter()
            .map(|param| {
                unique_instance_of(param, pool).map_err(|err| match err {
                    ReflectError::Instantiation(InstantiationError::AmbiguousCandidates {
                        param_type,
                        first,
                        second,
                        ..
                    }) => InstantiationError::AmbiguousCandidates {
                        type_name: ty.name().to_string(),
                        param_type,
                        first,
                        second,
                    }
                    .into(),
                    other => other,
                })
            })
            .collect::<ReflectResult<Vec<_>>>()?;

        tracing::debug!(
            type_name = ty.name(),
            arity = args.len(),
            "selected constructor from candidate pool"
        );
        self.construct(ty, constructor, &args)
    }

    /// [`Reflector::new_instance_from_pool`] with the property values as
    /// the pool
    pub fn new_instance_from_properties(&self, ty: &TypeRef, properties: &ValueMap) -> ReflectResult<Value> {
        let pool: Vec<Value> = properties.iter().map(|(_, v)| v.clone()).collect();
        self.new_instance_from_pool(ty, &pool)
    }

    /// One no-argument instance per type, in order
    pub fn instantiate_all(&self, types: &[TypeRef]) -> ReflectResult<Vec<Value>> {
        types.iter().map(|ty| self.new_instance(ty)).collect()
    }

    /// Override of `ty` if one is registered and is a subtype of it.
    ///
    /// Probes `{prefix}{SimpleName}` and then
    /// `{namespace}.{prefix}{SimpleName}`.
    pub fn resolve_override(&self, ty: &TypeRef) -> Option<TypeRef> {
        let customization = self.customization();
        let custom_name = format!("{}{}", customization.prefix, ty.simple_name());

        let found = self.class_if_exists(&custom_name).or_else(|| {
            self.class_if_exists(&format!("{}.{}", customization.namespace, custom_name))
        })?;

        if ty.is_assignable_from(&found) {
            tracing::debug!(type_name = ty.name(), custom = found.name(), "using customized type");
            Some(found)
        } else {
            tracing::debug!(
                type_name = ty.name(),
                custom = found.name(),
                "ignoring customized type that is not a subtype"
            );
            None
        }
    }

    /// Positional instance of the override of `ty`, or of `ty` itself
    pub fn customizable(&self, ty: &TypeRef, args: &[Value]) -> ReflectResult<Value> {
        let target = self.resolve_override(ty).unwrap_or_else(|| ty.clone());
        self.new_instance_with(&target, args)
    }

    fn construct(&self, ty: &TypeRef, constructor: &ConstructorDescriptor, args: &[Value]) -> ReflectResult<Value> {
        let _guard = AccessGuard::elevate(
            self.permissions(),
            constructor.access(),
            MemberKind::Constructor,
            "<init>",
            ty.name(),
            AccessOp::Invoke,
        )?;

        constructor.call(ty, args).map_err(|err| {
            InstantiationError::ConstructorFailed {
                type_name: ty.name().to_string(),
                source: Box::new(err),
            }
            .into()
        })
    }
}

fn render(args: &[Value]) -> String {
    let items: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("[{}]", items.join(", "))
}
