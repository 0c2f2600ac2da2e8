//! Integration tests for text and value conversion

use chrono::{TimeZone, Timelike, Utc};
use reflekt::{
    builtins, ConversionError, ErrorKind, ReflectError, Reflector, TypeDescriptor, Value,
};
use uuid::Uuid;

fn conversion_error(result: Result<Value, ReflectError>) -> ConversionError {
    match result {
        Err(ReflectError::Conversion(err)) => err,
        other => panic!("expected a conversion error, got {:?}", other),
    }
}

#[test]
fn test_scalar_text_round_trip() {
    let reflector = Reflector::new();
    let b = builtins();

    let cases = [
        (Value::Bool(true), &b.boolean),
        (Value::Byte(-12), &b.byte_obj),
        (Value::Short(1200), &b.short),
        (Value::Int(42), &b.int),
        (Value::Long(9_000_000_000), &b.long_obj),
        (Value::Double(2.5), &b.double),
        (Value::Char('z'), &b.char),
    ];

    for (value, target) in cases {
        let text = reflector.str(&value).unwrap();
        let parsed = reflector.convert_str(&text, target).unwrap();
        assert_eq!(parsed, value, "round trip of {}", text);
    }
}

#[test]
fn test_integers_are_strict() {
    let reflector = Reflector::new();
    let b = builtins();

    assert_eq!(reflector.convert_str("-7", &b.int).unwrap(), Value::Int(-7));

    for text in [" 7", "7 ", "7.0", "", "0x10"] {
        let err = conversion_error(reflector.convert_str(text, &b.int));
        assert!(matches!(err, ConversionError::MalformedLiteral { .. }), "{:?}", text);
    }

    let err = conversion_error(reflector.convert_str("128", &b.byte));
    assert!(matches!(err, ConversionError::MalformedLiteral { .. }));
}

#[test]
fn test_floats_accept_whitespace_and_suffix() {
    let reflector = Reflector::new();
    let b = builtins();

    assert_eq!(reflector.convert_str(" 1.5 ", &b.double).unwrap(), Value::Double(1.5));
    assert_eq!(reflector.convert_str("1.5f", &b.float).unwrap(), Value::Float(1.5));
    assert_eq!(reflector.convert_str("3d", &b.double_obj).unwrap(), Value::Double(3.0));
    assert!(reflector.convert_str("one", &b.double).is_err());
}

#[test]
fn test_boolean_words() {
    let reflector = Reflector::new();
    let b = builtins();

    for text in ["y", "T", "Yes", "TRUE"] {
        assert_eq!(reflector.convert_str(text, &b.boolean).unwrap(), Value::Bool(true));
    }
    for text in ["n", "F", "No", "false"] {
        assert_eq!(reflector.convert_str(text, &b.boolean_obj).unwrap(), Value::Bool(false));
    }

    let err = conversion_error(reflector.convert_str("maybe", &b.boolean));
    assert!(matches!(err, ConversionError::InvalidBoolean { .. }));
}

#[test]
fn test_enum_constants_ignore_case() {
    let reflector = Reflector::new();
    let color = TypeDescriptor::enumeration("app.Color", ["RED", "GREEN"]).build();

    match reflector.convert_str("green", &color).unwrap() {
        Value::Enum(constant) => {
            assert_eq!(constant.name(), "GREEN");
            assert_eq!(constant.ordinal(), 1);
        }
        other => panic!("expected an enum constant, got {:?}", other),
    }

    let err = conversion_error(reflector.convert_str("blue", &color));
    assert!(matches!(err, ConversionError::NoEnumConstant { .. }));
}

#[test]
fn test_object_target_keeps_text() {
    let reflector = Reflector::new();
    let b = builtins();

    assert_eq!(reflector.convert_str("12", &b.object).unwrap(), Value::str("12"));
    assert_eq!(reflector.convert(&Value::Int(12), &b.object).unwrap(), Value::Int(12));
}

#[test]
fn test_numeric_coercion() {
    let reflector = Reflector::new();
    let b = builtins();

    assert_eq!(reflector.convert(&Value::Long(7), &b.int).unwrap(), Value::Int(7));
    assert_eq!(reflector.convert(&Value::Double(3.9), &b.int_obj).unwrap(), Value::Int(3));
    assert_eq!(reflector.convert(&Value::Int(2), &b.double).unwrap(), Value::Double(2.0));
    assert_eq!(reflector.convert(&Value::Int(300), &b.byte).unwrap(), Value::Byte(44));
    assert_eq!(reflector.convert(&Value::Int(65), &b.char).unwrap(), Value::Char('A'));

    let err = conversion_error(reflector.convert(&Value::Bool(true), &b.int));
    assert!(matches!(err, ConversionError::Incompatible { .. }));
}

#[test]
fn test_null_and_identity() {
    let reflector = Reflector::new();
    let b = builtins();

    assert_eq!(reflector.convert(&Value::Null, &b.int).unwrap(), Value::Null);
    assert_eq!(reflector.convert(&Value::Null, &b.string).unwrap(), Value::Null);

    let list = Value::List(vec![Value::Int(1)]);
    assert_eq!(reflector.convert(&list, &b.collection).unwrap(), list);
}

#[test]
fn test_dates() {
    let reflector = Reflector::new();
    let b = builtins();

    let parsed = reflector.convert_str("2024-03-01 10:15:00", &b.date).unwrap();
    assert_eq!(
        reflector.str(&parsed).as_deref(),
        Some("2024-03-01T10:15:00.000Z")
    );

    let from_rfc = reflector
        .convert_str("2024-03-01T12:15:00+02:00", &b.date)
        .unwrap();
    assert_eq!(from_rfc, parsed);

    let from_millis = reflector.convert(&Value::Long(0), &b.date).unwrap();
    assert_eq!(
        reflector.str(&from_millis).as_deref(),
        Some("1970-01-01T00:00:00.000Z")
    );

    let err = conversion_error(reflector.convert_str("yesterday", &b.date));
    assert!(matches!(err, ConversionError::MalformedLiteral { .. }));
}

#[test]
fn test_dates_keep_millisecond_precision() {
    let reflector = Reflector::new();
    let b = builtins();
    let precise = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();

    let values = [
        Value::Date(precise),
        Value::date(precise),
        Value::from(precise),
        Value::from(Utc::now()),
    ];
    for value in values {
        let text = reflector.str(&value).unwrap();
        let back = reflector.convert_str(&text, &b.date).unwrap();
        assert_eq!(back, value, "round trip of {}", text);
    }

    match Value::date(precise) {
        Value::Date(date) => assert_eq!(date.nanosecond(), 123_000_000),
        other => panic!("expected a date, got {:?}", other),
    }
    assert_eq!(
        reflector.str(&Value::date(precise)).as_deref(),
        Some("2023-11-14T22:13:20.123Z")
    );
}

#[test]
fn test_uuid() {
    let reflector = Reflector::new();
    let b = builtins();
    let id = Uuid::new_v4();

    assert_eq!(
        reflector.convert_str(&id.to_string(), &b.uuid).unwrap(),
        Value::Uuid(id)
    );
    assert_eq!(
        reflector.convert(&Value::Uuid(id), &b.string).unwrap(),
        Value::Str(id.to_string())
    );

    assert!(reflector.convert_str("not-a-uuid", &b.uuid).is_err());
    let err = reflector.convert(&Value::Int(1), &b.uuid).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

#[test]
fn test_structured_targets_are_unsupported() {
    let reflector = Reflector::new();
    let b = builtins();

    let err = conversion_error(reflector.convert_str("[]", &b.list));
    assert!(matches!(err, ConversionError::NoStringConversion { .. }));

    let err = conversion_error(reflector.convert(&Value::Int(1), &b.map));
    assert!(matches!(err, ConversionError::Unsupported { .. }));
}

#[test]
fn test_text_of_binary_values() {
    let reflector = Reflector::new();
    let b = builtins();

    let bytes = Value::Bytes(b"abc".to_vec());
    assert_eq!(reflector.convert(&bytes, &b.string).unwrap(), Value::str("abc"));

    let chars = Value::Chars(vec!['h', 'i']);
    assert_eq!(reflector.str(&chars).as_deref(), Some("hi"));
}
