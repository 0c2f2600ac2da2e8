use reflekt_types::names;
use reflekt_types::{kind_for_name, PrimitiveType, TypeKind};

#[test]
fn test_every_canonical_scalar_name() {
    let expected = [
        (names::BOOLEAN, TypeKind::Boolean),
        (names::BYTE, TypeKind::Byte),
        (names::CHAR, TypeKind::Char),
        (names::SHORT, TypeKind::Short),
        (names::INT, TypeKind::Int),
        (names::LONG, TypeKind::Long),
        (names::FLOAT, TypeKind::Float),
        (names::DOUBLE, TypeKind::Double),
        (names::BOOLEAN_OBJ, TypeKind::BooleanBoxed),
        (names::BYTE_OBJ, TypeKind::ByteBoxed),
        (names::CHAR_OBJ, TypeKind::CharBoxed),
        (names::SHORT_OBJ, TypeKind::ShortBoxed),
        (names::INT_OBJ, TypeKind::IntBoxed),
        (names::LONG_OBJ, TypeKind::LongBoxed),
        (names::FLOAT_OBJ, TypeKind::FloatBoxed),
        (names::DOUBLE_OBJ, TypeKind::DoubleBoxed),
        (names::STRING, TypeKind::String),
        (names::DATE, TypeKind::Date),
        (names::UUID, TypeKind::Uuid),
    ];

    for (name, kind) in expected {
        assert_eq!(kind_for_name(name), kind, "kind of {}", name);
    }
}

#[test]
fn test_container_and_void_names_are_objects() {
    for name in [
        names::VOID,
        names::VOID_OBJ,
        names::OBJECT,
        names::LIST,
        names::MAP,
        names::BYTE_ARRAY,
        names::VAR,
    ] {
        assert_eq!(kind_for_name(name), TypeKind::Object, "kind of {}", name);
    }
}

#[test]
fn test_no_prefix_matching() {
    assert_eq!(kind_for_name("lang.Integer2"), TypeKind::Object);
    assert_eq!(kind_for_name("lang.Str"), TypeKind::Object);
    assert_eq!(kind_for_name(" int"), TypeKind::Object);
}

#[test]
fn test_registry_never_yields_null() {
    for name in ["", "null", "Null", "lang.Null"] {
        assert_ne!(kind_for_name(name), TypeKind::Null);
    }
}

#[test]
fn test_primitive_and_wrapper_share_number_flag() {
    for p in PrimitiveType::ALL {
        let unboxed = kind_for_name(p.name());
        let boxed = kind_for_name(p.wrapper_name());
        assert_eq!(unboxed.is_number(), boxed.is_number(), "{}", p);
        assert_eq!(unboxed.to_string(), boxed.to_string(), "{}", p);
    }
}
