//! Runtime type descriptors
//!
//! A [`TypeDescriptor`] is the runtime stand-in for a class object: a
//! canonical name, a flavor, the declared supertype and interfaces, and
//! the declared members in declaration order. Descriptors are immutable
//! once built and shared as [`TypeRef`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use reflekt_types::{names, MemberKind, PrimitiveType, ReflectError, ReflectResult};

use crate::access::Accessibility;
use crate::builtins::builtins;
use crate::value::{Instance, Value};

/// Shared handle to a type descriptor
pub type TypeRef = Arc<TypeDescriptor>;

/// Constructor body: receives the constructed type and the arguments
pub type ConstructorFn = Arc<dyn Fn(&TypeRef, &[Value]) -> ReflectResult<Value> + Send + Sync>;

/// Method body: receives the target (`None` for static methods) and the arguments
pub type MethodFn = Arc<dyn Fn(Option<&Value>, &[Value]) -> ReflectResult<Value> + Send + Sync>;

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere
    #[default]
    Public,
    /// Visible to subtypes
    Protected,
    /// Visible inside the namespace
    Package,
    /// Visible to the declaring type only
    Private,
}

impl Visibility {
    /// Whether this is `Public`
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// Structural flavor of a type
#[derive(Debug, Clone)]
pub enum TypeFlavor {
    /// Unboxed primitive
    Primitive(PrimitiveType),
    /// Concrete or abstract class
    Class,
    /// Interface
    Interface,
    /// Enumeration with its constants in declaration order
    Enum(Vec<String>),
    /// Annotation type
    Annotation,
    /// Array of the element type
    Array(TypeRef),
    /// Generated proxy implementing one or more interfaces
    Proxy,
}

/// Annotation usage attached to a type, field or method
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    ty: TypeRef,
    attributes: Vec<(String, Value)>,
}

impl Annotation {
    /// Annotation of the given annotation type, without attributes
    pub fn new(ty: &TypeRef) -> Self {
        Self {
            ty: ty.clone(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    /// Annotation type
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Whether this usage is of the given annotation type
    pub fn is(&self, annotation: &TypeDescriptor) -> bool {
        self.ty.name() == annotation.name()
    }
}

/// Declared instance field
#[derive(Debug)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeRef,
    visibility: Visibility,
    annotations: Vec<Annotation>,
    declaring: String,
    access: Accessibility,
}

impl FieldDescriptor {
    /// Public field of the given type
    pub fn new(name: &str, ty: &TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.clone(),
            visibility: Visibility::Public,
            annotations: Vec::new(),
            declaring: String::new(),
            access: Accessibility::new(true),
        }
    }

    /// Set the visibility
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self.access = Accessibility::new(visibility.is_public());
        self
    }

    /// Mark as private
    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    /// Attach an annotation
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field type
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Annotations on this field
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Whether an annotation of the given type is present
    pub fn is_annotated(&self, annotation: &TypeDescriptor) -> bool {
        self.annotations.iter().any(|a| a.is(annotation))
    }

    /// Canonical name of the declaring type
    pub fn declaring_type(&self) -> &str {
        &self.declaring
    }

    /// Accessibility state
    pub fn access(&self) -> &Accessibility {
        &self.access
    }
}

/// Declared method
pub struct MethodDescriptor {
    name: String,
    params: Vec<TypeRef>,
    param_names: Option<Vec<String>>,
    return_type: TypeRef,
    visibility: Visibility,
    is_static: bool,
    annotations: Vec<Annotation>,
    declaring: String,
    body: MethodFn,
    access: Accessibility,
}

impl MethodDescriptor {
    /// Public instance method
    pub fn new<F>(name: &str, params: Vec<TypeRef>, return_type: &TypeRef, body: F) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> ReflectResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            params,
            param_names: None,
            return_type: return_type.clone(),
            visibility: Visibility::Public,
            is_static: false,
            annotations: Vec::new(),
            declaring: String::new(),
            body: Arc::new(body),
            access: Accessibility::new(true),
        }
    }

    /// Mark as static
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set the visibility
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self.access = Accessibility::new(visibility.is_public());
        self
    }

    /// Mark as private
    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    /// Supply parameter names
    pub fn with_param_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Attach an annotation
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types in order
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    /// Caller-supplied parameter names, if any
    pub fn param_names(&self) -> Option<&[String]> {
        self.param_names.as_deref()
    }

    /// Return type
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// Visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the method is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Annotations on this method
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Whether an annotation of the given type is present
    pub fn is_annotated(&self, annotation: &TypeDescriptor) -> bool {
        self.annotations.iter().any(|a| a.is(annotation))
    }

    /// Canonical name of the declaring type
    pub fn declaring_type(&self) -> &str {
        &self.declaring
    }

    /// Accessibility state
    pub fn access(&self) -> &Accessibility {
        &self.access
    }

    pub(crate) fn call(&self, target: Option<&Value>, args: &[Value]) -> ReflectResult<Value> {
        (self.body)(target, args)
    }

    pub(crate) fn has_params(&self, params: &[TypeRef]) -> bool {
        same_types(&self.params, params)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &type_names(&self.params))
            .field("return_type", &self.return_type.name())
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .field("declaring", &self.declaring)
            .finish()
    }
}

/// Declared constructor
pub struct ConstructorDescriptor {
    params: Vec<TypeRef>,
    visibility: Visibility,
    declaring: String,
    body: ConstructorFn,
    access: Accessibility,
}

impl ConstructorDescriptor {
    /// Public constructor with a custom body
    pub fn new<F>(params: Vec<TypeRef>, body: F) -> Self
    where
        F: Fn(&TypeRef, &[Value]) -> ReflectResult<Value> + Send + Sync + 'static,
    {
        Self {
            params,
            visibility: Visibility::Public,
            declaring: String::new(),
            body: Arc::new(body),
            access: Accessibility::new(true),
        }
    }

    /// Public no-argument constructor producing a default-initialized instance
    pub fn empty() -> Self {
        Self::new(Vec::new(), |ty, _| Ok(Value::Object(Instance::new(ty))))
    }

    /// Public constructor assigning each argument to the named field, in order.
    /// Fails with a field lookup error when the type declares no such field.
    pub fn assigning(fields: Vec<(&str, TypeRef)>) -> Self {
        let field_names: Vec<String> = fields.iter().map(|(n, _)| n.to_string()).collect();
        let params = fields.into_iter().map(|(_, ty)| ty).collect();

        Self::new(params, move |ty, args| {
            let instance = Instance::new(ty);
            for (name, arg) in field_names.iter().zip(args) {
                if !instance.set(name, arg.clone()) {
                    return Err(ReflectError::lookup(MemberKind::Field, name.as_str(), ty.name()));
                }
            }
            Ok(Value::Object(instance))
        })
    }

    /// Set the visibility
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self.access = Accessibility::new(visibility.is_public());
        self
    }

    /// Mark as private
    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    /// Parameter types in order
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    /// Visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Canonical name of the declaring type
    pub fn declaring_type(&self) -> &str {
        &self.declaring
    }

    /// Accessibility state
    pub fn access(&self) -> &Accessibility {
        &self.access
    }

    pub(crate) fn call(&self, ty: &TypeRef, args: &[Value]) -> ReflectResult<Value> {
        (self.body)(ty, args)
    }

    pub(crate) fn has_params(&self, params: &[TypeRef]) -> bool {
        same_types(&self.params, params)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &type_names(&self.params))
            .field("visibility", &self.visibility)
            .field("declaring", &self.declaring)
            .finish()
    }
}

/// Runtime description of a type
pub struct TypeDescriptor {
    name: String,
    flavor: TypeFlavor,
    supertype: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    annotations: Vec<Annotation>,
}

impl TypeDescriptor {
    /// Start building a class
    pub fn class(name: &str) -> TypeBuilder {
        TypeBuilder::new(name, TypeFlavor::Class)
    }

    /// Start building an interface
    pub fn interface(name: &str) -> TypeBuilder {
        TypeBuilder::new(name, TypeFlavor::Interface)
    }

    /// Start building an enumeration
    pub fn enumeration<I, S>(name: &str, constants: I) -> TypeBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeBuilder::new(
            name,
            TypeFlavor::Enum(constants.into_iter().map(Into::into).collect()),
        )
    }

    /// Start building an annotation type
    pub fn annotation(name: &str) -> TypeBuilder {
        TypeBuilder::new(name, TypeFlavor::Annotation)
    }

    /// Start building a proxy type
    pub fn proxy(name: &str) -> TypeBuilder {
        TypeBuilder::new(name, TypeFlavor::Proxy)
    }

    /// Array type of the given element type
    pub fn array_of(element: &TypeRef) -> TypeRef {
        Self::array_extending(element, &builtins().object)
    }

    pub(crate) fn array_extending(element: &TypeRef, root: &TypeRef) -> TypeRef {
        let name = format!("{}[]", element.name());
        TypeBuilder::new(&name, TypeFlavor::Array(element.clone()))
            .extends(root)
            .build()
    }

    pub(crate) fn primitive(primitive: PrimitiveType) -> TypeRef {
        TypeBuilder::new(primitive.name(), TypeFlavor::Primitive(primitive)).build()
    }

    /// Canonical name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name after the last namespace separator
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Namespace (empty for primitives and top-level names)
    pub fn namespace(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => "",
        }
    }

    /// Structural flavor
    pub fn flavor(&self) -> &TypeFlavor {
        &self.flavor
    }

    /// Declared supertype (`None` for the root, primitives and interfaces)
    pub fn supertype(&self) -> Option<&TypeRef> {
        self.supertype.as_ref()
    }

    /// Directly declared interfaces
    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    /// Fields declared by this type only
    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Methods declared by this type only
    pub fn declared_methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Constructors in declaration order
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Annotations declared on this type only
    pub fn declared_annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The primitive, if this is a primitive type
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self.flavor {
            TypeFlavor::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this is a primitive type
    pub fn is_primitive(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Primitive(_))
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Interface)
    }

    /// Whether this is an enumeration
    pub fn is_enum(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Enum(_))
    }

    /// Whether this is an annotation type
    pub fn is_annotation(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Annotation)
    }

    /// Whether this is an array type
    pub fn is_array(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Array(_))
    }

    /// Whether this is a proxy type
    pub fn is_proxy(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Proxy)
    }

    /// Enumeration constants (empty for non-enums)
    pub fn enum_constants(&self) -> &[String] {
        match &self.flavor {
            TypeFlavor::Enum(constants) => constants,
            _ => &[],
        }
    }

    /// Array element type
    pub fn array_element(&self) -> Option<&TypeRef> {
        match &self.flavor {
            TypeFlavor::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Whether a value of type `other` can be used where `self` is expected.
    ///
    /// Identity, or reachable from `other` through supertypes and
    /// interfaces. Primitives are only assignable from themselves.
    pub fn is_assignable_from(&self, other: &TypeDescriptor) -> bool {
        if self.name == other.name {
            return true;
        }

        if self.is_primitive() || other.is_primitive() {
            return false;
        }

        if self.name == names::OBJECT {
            return true;
        }

        if let (TypeFlavor::Array(target), TypeFlavor::Array(source)) = (&self.flavor, &other.flavor) {
            return !target.is_primitive()
                && !source.is_primitive()
                && target.is_assignable_from(source);
        }

        let mut pending: Vec<&TypeDescriptor> = vec![other];
        while let Some(current) = pending.pop() {
            if current.name == self.name {
                return true;
            }
            if let Some(parent) = &current.supertype {
                pending.push(parent);
            }
            pending.extend(current.interfaces.iter().map(|i| i.as_ref()));
        }

        false
    }

    /// This type and its ancestors, most derived first, stopping before
    /// the root. Interfaces and the root itself yield nothing.
    pub fn lineage(&self) -> Vec<&TypeDescriptor> {
        let mut chain = Vec::new();
        let mut current = Some(self);

        while let Some(ty) = current {
            let Some(parent) = ty.supertype.as_deref() else {
                break;
            };
            chain.push(ty);
            current = Some(parent);
        }

        chain
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flavor = match &self.flavor {
            TypeFlavor::Primitive(_) => "primitive",
            TypeFlavor::Class => "class",
            TypeFlavor::Interface => "interface",
            TypeFlavor::Enum(_) => "enum",
            TypeFlavor::Annotation => "annotation",
            TypeFlavor::Array(_) => "array",
            TypeFlavor::Proxy => "proxy",
        };
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("flavor", &flavor)
            .field("supertype", &self.supertype.as_ref().map(|s| s.name()))
            .field("interfaces", &type_names(&self.interfaces))
            .finish()
    }
}

/// Builder for [`TypeDescriptor`]
pub struct TypeBuilder {
    descriptor: TypeDescriptor,
}

impl TypeBuilder {
    fn new(name: &str, flavor: TypeFlavor) -> Self {
        Self {
            descriptor: TypeDescriptor {
                name: name.to_string(),
                flavor,
                supertype: None,
                interfaces: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                constructors: Vec::new(),
                annotations: Vec::new(),
            },
        }
    }

    /// Set the supertype
    pub fn extends(mut self, parent: &TypeRef) -> Self {
        self.descriptor.supertype = Some(parent.clone());
        self
    }

    /// Add an implemented (or, for interfaces, extended) interface
    pub fn implements(mut self, interface: &TypeRef) -> Self {
        self.descriptor.interfaces.push(interface.clone());
        self
    }

    /// Declare a field
    pub fn field(mut self, mut field: FieldDescriptor) -> Self {
        field.declaring = self.descriptor.name.clone();
        self.descriptor.fields.push(field);
        self
    }

    /// Declare a method
    pub fn method(mut self, mut method: MethodDescriptor) -> Self {
        method.declaring = self.descriptor.name.clone();
        self.descriptor.methods.push(method);
        self
    }

    /// Declare a constructor
    pub fn constructor(mut self, mut constructor: ConstructorDescriptor) -> Self {
        constructor.declaring = self.descriptor.name.clone();
        self.descriptor.constructors.push(constructor);
        self
    }

    /// Attach an annotation to the type
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.descriptor.annotations.push(annotation);
        self
    }

    /// Finish the descriptor.
    ///
    /// Classes, proxies and enums without an explicit supertype extend
    /// `lang.Object` and `lang.Enum` respectively.
    pub fn build(mut self) -> TypeRef {
        let needs_root = self.descriptor.supertype.is_none()
            && self.descriptor.name != names::OBJECT
            && matches!(
                self.descriptor.flavor,
                TypeFlavor::Class | TypeFlavor::Proxy | TypeFlavor::Enum(_)
            );

        if needs_root {
            let root = if self.descriptor.is_enum() {
                &builtins().enumeration
            } else {
                &builtins().object
            };
            self.descriptor.supertype = Some(root.clone());
        }

        Arc::new(self.descriptor)
    }
}

fn same_types(declared: &[TypeRef], requested: &[TypeRef]) -> bool {
    declared.len() == requested.len()
        && declared
            .iter()
            .zip(requested)
            .all(|(a, b)| a.name() == b.name())
}

pub(crate) fn type_names(types: &[TypeRef]) -> Vec<&str> {
    types.iter().map(|t| t.name()).collect()
}
