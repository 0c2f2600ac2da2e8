//! Built-in type descriptors
//!
//! The primitives, their wrappers, the standard library types and the
//! collection interfaces with their default implementations. Built once
//! on first use and shared for the life of the process.

use std::sync::LazyLock;

use reflekt_types::{names, PrimitiveType, ReflectError, ReflectResult};

use crate::ty::{ConstructorDescriptor, TypeDescriptor, TypeRef};
use crate::value::{SharedMap, Value, ValueMap, VarCell};

/// Handles to every built-in type
#[allow(missing_docs)]
pub struct Builtins {
    pub object: TypeRef,
    pub enumeration: TypeRef,
    pub number: TypeRef,
    pub string: TypeRef,
    pub date: TypeRef,
    pub uuid: TypeRef,

    pub boolean: TypeRef,
    pub byte: TypeRef,
    pub char: TypeRef,
    pub short: TypeRef,
    pub int: TypeRef,
    pub long: TypeRef,
    pub float: TypeRef,
    pub double: TypeRef,
    pub void: TypeRef,

    pub boolean_obj: TypeRef,
    pub byte_obj: TypeRef,
    pub char_obj: TypeRef,
    pub short_obj: TypeRef,
    pub int_obj: TypeRef,
    pub long_obj: TypeRef,
    pub float_obj: TypeRef,
    pub double_obj: TypeRef,
    pub void_obj: TypeRef,

    pub collection: TypeRef,
    pub list: TypeRef,
    pub set: TypeRef,
    pub map: TypeRef,
    pub concurrent_map: TypeRef,
    pub array_list: TypeRef,
    pub linked_hash_set: TypeRef,
    pub linked_hash_map: TypeRef,
    pub concurrent_hash_map: TypeRef,

    pub byte_array: TypeRef,
    pub char_array: TypeRef,
    pub object_array: TypeRef,

    pub var: TypeRef,
    pub simple_var: TypeRef,
}

impl Builtins {
    /// Descriptor of a primitive
    pub fn primitive(&self, primitive: PrimitiveType) -> &TypeRef {
        match primitive {
            PrimitiveType::Boolean => &self.boolean,
            PrimitiveType::Byte => &self.byte,
            PrimitiveType::Char => &self.char,
            PrimitiveType::Short => &self.short,
            PrimitiveType::Int => &self.int,
            PrimitiveType::Long => &self.long,
            PrimitiveType::Float => &self.float,
            PrimitiveType::Double => &self.double,
            PrimitiveType::Void => &self.void,
        }
    }

    /// Descriptor of a primitive's wrapper
    pub fn wrapper(&self, primitive: PrimitiveType) -> &TypeRef {
        match primitive {
            PrimitiveType::Boolean => &self.boolean_obj,
            PrimitiveType::Byte => &self.byte_obj,
            PrimitiveType::Char => &self.char_obj,
            PrimitiveType::Short => &self.short_obj,
            PrimitiveType::Int => &self.int_obj,
            PrimitiveType::Long => &self.long_obj,
            PrimitiveType::Float => &self.float_obj,
            PrimitiveType::Double => &self.double_obj,
            PrimitiveType::Void => &self.void_obj,
        }
    }

    /// Every built-in descriptor
    pub fn all(&self) -> Vec<&TypeRef> {
        vec![
            &self.object,
            &self.enumeration,
            &self.number,
            &self.string,
            &self.date,
            &self.uuid,
            &self.boolean,
            &self.byte,
            &self.char,
            &self.short,
            &self.int,
            &self.long,
            &self.float,
            &self.double,
            &self.void,
            &self.boolean_obj,
            &self.byte_obj,
            &self.char_obj,
            &self.short_obj,
            &self.int_obj,
            &self.long_obj,
            &self.float_obj,
            &self.double_obj,
            &self.void_obj,
            &self.collection,
            &self.list,
            &self.set,
            &self.map,
            &self.concurrent_map,
            &self.array_list,
            &self.linked_hash_set,
            &self.linked_hash_map,
            &self.concurrent_hash_map,
            &self.byte_array,
            &self.char_array,
            &self.object_array,
            &self.var,
            &self.simple_var,
        ]
    }
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(|| {
    let builtins = init_builtins();
    tracing::debug!(types = builtins.all().len(), "built-in types initialized");
    builtins
});

/// The process-wide built-in types
pub fn builtins() -> &'static Builtins {
    &BUILTINS
}

// ============================================================================
// Initialization
// ============================================================================

// Every descriptor here names its supertype explicitly: `TypeBuilder::build`
// falls back to `builtins()` otherwise, which would re-enter this initializer.
fn init_builtins() -> Builtins {
    let object = TypeDescriptor::class(names::OBJECT)
        .constructor(ConstructorDescriptor::empty())
        .build();
    let class = |name: &str| TypeDescriptor::class(name).extends(&object);

    let enumeration = class(names::ENUM).build();
    let number = class(names::NUMBER).build();
    let string = class(names::STRING).build();
    let date = class(names::DATE).build();
    let uuid = class(names::UUID).build();

    let wrapper = |p: PrimitiveType| {
        let parent = match p {
            PrimitiveType::Boolean | PrimitiveType::Char | PrimitiveType::Void => &object,
            _ => &number,
        };
        TypeDescriptor::class(p.wrapper_name()).extends(parent).build()
    };

    let collection = TypeDescriptor::interface(names::COLLECTION).build();
    let list = TypeDescriptor::interface(names::LIST)
        .implements(&collection)
        .build();
    let set = TypeDescriptor::interface(names::SET)
        .implements(&collection)
        .build();
    let map = TypeDescriptor::interface(names::MAP).build();
    let concurrent_map = TypeDescriptor::interface(names::CONCURRENT_MAP)
        .implements(&map)
        .build();

    let array_list = class(names::ARRAY_LIST)
        .implements(&list)
        .constructor(ConstructorDescriptor::new(Vec::new(), |_, _| {
            Ok(Value::List(Vec::new()))
        }))
        .constructor(ConstructorDescriptor::new(vec![collection.clone()], |_, args| {
            Ok(Value::List(collection_items(args)?))
        }))
        .build();

    let linked_hash_set = class(names::LINKED_HASH_SET)
        .implements(&set)
        .constructor(ConstructorDescriptor::new(Vec::new(), |_, _| {
            Ok(Value::Set(Vec::new()))
        }))
        .constructor(ConstructorDescriptor::new(vec![collection.clone()], |_, args| {
            Ok(Value::set_of(collection_items(args)?))
        }))
        .build();

    let linked_hash_map = class(names::LINKED_HASH_MAP)
        .implements(&map)
        .constructor(ConstructorDescriptor::new(Vec::new(), |_, _| {
            Ok(Value::Map(ValueMap::new()))
        }))
        .build();

    let concurrent_hash_map = class(names::CONCURRENT_HASH_MAP)
        .implements(&concurrent_map)
        .constructor(ConstructorDescriptor::new(Vec::new(), |_, _| {
            Ok(Value::ConcurrentMap(SharedMap::new()))
        }))
        .build();

    let primitive = |p: PrimitiveType| TypeDescriptor::primitive(p);
    let boolean = primitive(PrimitiveType::Boolean);
    let byte = primitive(PrimitiveType::Byte);
    let char = primitive(PrimitiveType::Char);

    let byte_array = TypeDescriptor::array_extending(&byte, &object);
    let char_array = TypeDescriptor::array_extending(&char, &object);
    let object_array = TypeDescriptor::array_extending(&object, &object);

    let var = TypeDescriptor::interface(names::VAR).build();
    let simple_var = class(names::SIMPLE_VAR)
        .implements(&var)
        .constructor(ConstructorDescriptor::new(
            vec![string.clone(), object.clone()],
            |_, args| {
                let name = args.first().map(Value::to_string).unwrap_or_default();
                let value = args.get(1).cloned().unwrap_or(Value::Null);
                Ok(Value::Var(VarCell::new(&name, value)))
            },
        ))
        .build();

    Builtins {
        boolean_obj: wrapper(PrimitiveType::Boolean),
        byte_obj: wrapper(PrimitiveType::Byte),
        char_obj: wrapper(PrimitiveType::Char),
        short_obj: wrapper(PrimitiveType::Short),
        int_obj: wrapper(PrimitiveType::Int),
        long_obj: wrapper(PrimitiveType::Long),
        float_obj: wrapper(PrimitiveType::Float),
        double_obj: wrapper(PrimitiveType::Double),
        void_obj: wrapper(PrimitiveType::Void),

        boolean,
        byte,
        char,
        short: primitive(PrimitiveType::Short),
        int: primitive(PrimitiveType::Int),
        long: primitive(PrimitiveType::Long),
        float: primitive(PrimitiveType::Float),
        double: primitive(PrimitiveType::Double),
        void: primitive(PrimitiveType::Void),

        enumeration,
        number,
        string,
        date,
        uuid,

        collection,
        list,
        set,
        map,
        concurrent_map,
        array_list,
        linked_hash_set,
        linked_hash_map,
        concurrent_hash_map,

        byte_array,
        char_array,
        object_array,

        var,
        simple_var,

        object,
    }
}

fn collection_items(args: &[Value]) -> ReflectResult<Vec<Value>> {
    match args.first() {
        Some(Value::List(items)) | Some(Value::Set(items)) => Ok(items.clone()),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(ReflectError::not_expected(format!(
            "collection constructor received {}",
            other.type_name()
        ))),
    }
}
