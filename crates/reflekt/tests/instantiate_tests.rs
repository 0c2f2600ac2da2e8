//! Integration tests for instance construction and override resolution

use reflekt::{
    builtins, ConstructorDescriptor, ErrorKind, FieldDescriptor, InstantiationError, ReflectError,
    ReflectionPermission, Reflector, TypeDescriptor, TypeRef, Value, ValueMap,
};

fn person() -> TypeRef {
    let b = builtins();
    TypeDescriptor::class("app.Person")
        .field(FieldDescriptor::new("name", &b.string))
        .field(FieldDescriptor::new("age", &b.int))
        .constructor(ConstructorDescriptor::empty())
        .constructor(ConstructorDescriptor::assigning(vec![
            ("name", b.string.clone()),
            ("age", b.int.clone()),
        ]))
        .build()
}

fn field(value: &Value, name: &str) -> Value {
    value.as_instance().and_then(|i| i.get(name)).unwrap()
}

#[test]
fn test_positional_constructor_selection() {
    let reflector = Reflector::new();
    let person = person();

    let ann = reflector
        .new_instance_with(&person, &[Value::str("Ann"), Value::Int(30)])
        .unwrap();
    assert_eq!(field(&ann, "name"), Value::str("Ann"));
    assert_eq!(field(&ann, "age"), Value::Int(30));

    let blank = reflector.new_instance_with(&person, &[]).unwrap();
    assert_eq!(field(&blank, "name"), Value::Null);
    assert_eq!(field(&blank, "age"), Value::Int(0));

    // null fits any parameter position
    let unnamed = reflector
        .new_instance_with(&person, &[Value::Null, Value::Int(5)])
        .unwrap();
    assert_eq!(field(&unnamed, "age"), Value::Int(5));
}

#[test]
fn test_no_matching_constructor() {
    let reflector = Reflector::new();
    let err = reflector
        .new_instance_with(&person(), &[Value::Int(30), Value::str("Ann")])
        .unwrap_err();

    assert!(matches!(
        err,
        ReflectError::Instantiation(InstantiationError::NoMatchingConstructor { ref type_name, .. })
            if type_name == "app.Person"
    ));
}

#[test]
fn test_no_arg_instances() {
    let reflector = Reflector::new();
    let b = builtins();

    let values = reflector
        .instantiate_all(&[person(), b.array_list.clone(), b.map.clone()])
        .unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0].type_name(), "app.Person");
    assert_eq!(values[1], Value::List(vec![]));
    assert_eq!(values[2], Value::Map(ValueMap::new()));

    let abstract_like = TypeDescriptor::class("app.NoDefault")
        .field(FieldDescriptor::new("x", &b.int))
        .constructor(ConstructorDescriptor::assigning(vec![("x", b.int.clone())]))
        .build();
    let err = reflector.new_instance(&abstract_like).unwrap_err();
    assert!(matches!(
        err,
        ReflectError::Instantiation(InstantiationError::NoDefaultConstructor { .. })
    ));
}

#[test]
fn test_candidate_pool() {
    let b = builtins();
    let service = TypeDescriptor::class("app.Service")
        .field(FieldDescriptor::new("name", &b.string))
        .field(FieldDescriptor::new("port", &b.int))
        .field(FieldDescriptor::new("tags", &b.list))
        .constructor(ConstructorDescriptor::assigning(vec![
            ("name", b.string.clone()),
            ("port", b.int.clone()),
            ("tags", b.list.clone()),
        ]))
        .build();

    let reflector = Reflector::new();
    let built = reflector
        .new_instance_from_pool(&service, &[Value::Int(8080), Value::str("api")])
        .unwrap();
    assert_eq!(field(&built, "name"), Value::str("api"));
    assert_eq!(field(&built, "port"), Value::Int(8080));
    assert_eq!(field(&built, "tags"), Value::Null);

    let mut properties = ValueMap::new();
    properties.insert("port", 9090);
    properties.insert("name", "web");
    let built = reflector
        .new_instance_from_properties(&service, &properties)
        .unwrap();
    assert_eq!(field(&built, "name"), Value::str("web"));
    assert_eq!(field(&built, "port"), Value::Int(9090));

    let err = reflector
        .new_instance_from_pool(&service, &[Value::str("a"), Value::str("b")])
        .unwrap_err();
    match err {
        ReflectError::Instantiation(InstantiationError::AmbiguousCandidates {
            type_name,
            param_type,
            first,
            second,
        }) => {
            assert_eq!(type_name, "app.Service");
            assert_eq!(param_type, "lang.String");
            assert_eq!(first, "a");
            assert_eq!(second, "b");
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }
}

#[test]
fn test_empty_pool_uses_no_arg_path() {
    let reflector = Reflector::new();
    let built = reflector.new_instance_from_pool(&person(), &[]).unwrap();
    assert_eq!(built.type_name(), "app.Person");
}

fn greeter() -> TypeRef {
    TypeDescriptor::class("app.Greeter")
        .constructor(ConstructorDescriptor::empty())
        .build()
}

#[test]
fn test_customizable_without_override() {
    let reflector = Reflector::new();
    let built = reflector.customizable(&greeter(), &[]).unwrap();
    assert_eq!(built.type_name(), "app.Greeter");
}

#[test]
fn test_customizable_prefers_top_level_override() {
    let greeter = greeter();
    let mut reflector = Reflector::new();
    reflector.register(
        TypeDescriptor::class("CustomizedGreeter")
            .extends(&greeter)
            .constructor(ConstructorDescriptor::empty())
            .build(),
    );
    reflector.register(
        TypeDescriptor::class("custom.CustomizedGreeter")
            .extends(&greeter)
            .constructor(ConstructorDescriptor::empty())
            .build(),
    );

    let built = reflector.customizable(&greeter, &[]).unwrap();
    assert_eq!(built.type_name(), "CustomizedGreeter");
}

#[test]
fn test_customizable_falls_back_to_namespace() {
    let greeter = greeter();
    let mut reflector = Reflector::new();
    reflector.register(
        TypeDescriptor::class("custom.CustomizedGreeter")
            .extends(&greeter)
            .constructor(ConstructorDescriptor::empty())
            .build(),
    );

    let built = reflector.customizable(&greeter, &[]).unwrap();
    assert_eq!(built.type_name(), "custom.CustomizedGreeter");
}

#[test]
fn test_customizable_ignores_unrelated_override() {
    let greeter = greeter();
    let mut reflector = Reflector::new();
    reflector.register(
        TypeDescriptor::class("CustomizedGreeter")
            .constructor(ConstructorDescriptor::empty())
            .build(),
    );
    // not consulted once the first probe finds a type
    reflector.register(
        TypeDescriptor::class("custom.CustomizedGreeter")
            .extends(&greeter)
            .constructor(ConstructorDescriptor::empty())
            .build(),
    );

    assert!(reflector.resolve_override(&greeter).is_none());
    let built = reflector.customizable(&greeter, &[]).unwrap();
    assert_eq!(built.type_name(), "app.Greeter");
}

#[test]
fn test_private_constructor_respects_permissions() {
    let hidden = TypeDescriptor::class("app.Hidden")
        .constructor(ConstructorDescriptor::empty().private())
        .build();

    let mut reflector = Reflector::new();
    let built = reflector.new_instance(&hidden).unwrap();
    assert_eq!(built.type_name(), "app.Hidden");

    let constructor = &hidden.constructors()[0];
    assert_eq!(constructor.access().elevation(), 0);
    assert!(!constructor.access().is_accessible());

    reflector
        .permissions_mut()
        .set_global(ReflectionPermission::PUBLIC_ONLY);
    let err = reflector.new_instance(&hidden).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Access);
    assert_eq!(constructor.access().elevation(), 0);

    // private constructors never take part in positional selection
    let err = Reflector::new().new_instance_with(&hidden, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Instantiation);
}

#[test]
fn test_failing_private_constructor_restores_access() {
    let failing = TypeDescriptor::class("app.Failing")
        .constructor(
            ConstructorDescriptor::new(vec![], |_, _| {
                Err(ReflectError::not_expected("constructor body failed"))
            })
            .private(),
        )
        .build();

    let reflector = Reflector::new();
    let err = reflector.new_instance(&failing).unwrap_err();
    assert!(matches!(
        err,
        ReflectError::Instantiation(InstantiationError::ConstructorFailed { ref type_name, .. })
            if type_name == "app.Failing"
    ));

    let constructor = &failing.constructors()[0];
    assert_eq!(constructor.access().elevation(), 0);
    assert!(!constructor.access().is_accessible());

    // a second failure leaves the counter balanced as well
    assert!(reflector.new_instance(&failing).is_err());
    assert_eq!(constructor.access().elevation(), 0);
}

#[test]
fn test_assigning_to_undeclared_field_fails() {
    let b = builtins();
    let sparse = TypeDescriptor::class("app.Sparse")
        .field(FieldDescriptor::new("name", &b.string))
        .constructor(ConstructorDescriptor::assigning(vec![
            ("name", b.string.clone()),
            ("nickname", b.string.clone()),
        ]))
        .build();

    let err = Reflector::new()
        .new_instance_with(&sparse, &[Value::str("Ann"), Value::str("Annie")])
        .unwrap_err();
    match err {
        ReflectError::Instantiation(InstantiationError::ConstructorFailed { source, .. }) => {
            assert_eq!(source.kind(), ErrorKind::Lookup);
            assert!(source.to_string().contains("nickname"));
        }
        other => panic!("expected a constructor failure, got {:?}", other),
    }
}
