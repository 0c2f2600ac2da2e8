//! Integration tests for loading reflekt.toml

use std::fs;

use reflekt::{
    builtins, ConfigError, ConstructorDescriptor, ErrorKind, ReflectionPermission, Reflector,
    ReflektConfig, TypeDescriptor, Value,
};
use tempfile::TempDir;

const CONFIG: &str = r#"
[customization]
prefix = "Site"
namespace = "site.overrides"

[dates]
formats = ["%d/%m/%Y %H:%M", "%d/%m/%Y"]

[permissions]
global = "FULL_ACCESS"

[permissions.namespaces]
"plugins.**" = "PUBLIC_ONLY"
"#;

#[test]
fn test_reflector_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reflekt.toml");
    fs::write(&path, CONFIG).unwrap();

    let reflector = Reflector::from_file(&path).unwrap();
    assert_eq!(reflector.customization().prefix, "Site");
    assert_eq!(reflector.permissions().global(), ReflectionPermission::FULL_ACCESS);
    assert_eq!(
        reflector.permissions().resolve("plugins.chat.Bot"),
        ReflectionPermission::PUBLIC_ONLY
    );

    let date = reflector.convert_str("05/06/2024 07:08", &builtins().date).unwrap();
    assert_eq!(
        reflector.str(&date).as_deref(),
        Some("2024-06-05T07:08:00.000Z")
    );
}

#[test]
fn test_configured_override_names() {
    let config = ReflektConfig::from_str(CONFIG).unwrap();
    let mut reflector = Reflector::from_config(&config).unwrap();

    let widget = TypeDescriptor::class("ui.Widget")
        .constructor(ConstructorDescriptor::empty())
        .build();
    reflector.register(
        TypeDescriptor::class("site.overrides.SiteWidget")
            .extends(&widget)
            .constructor(ConstructorDescriptor::empty())
            .build(),
    );
    // default names are not consulted once configured
    reflector.register(
        TypeDescriptor::class("CustomizedWidget")
            .extends(&widget)
            .constructor(ConstructorDescriptor::empty())
            .build(),
    );

    let built = reflector.customizable(&widget, &[]).unwrap();
    assert_eq!(built.type_name(), "site.overrides.SiteWidget");
}

#[test]
fn test_configured_policy_applies_to_private_members() {
    let reflector = Reflector::from_config(&ReflektConfig::from_str(CONFIG).unwrap()).unwrap();
    let plugin = TypeDescriptor::class("plugins.chat.Bot")
        .constructor(ConstructorDescriptor::empty().private())
        .build();

    let err = reflector.new_instance(&plugin).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Access);

    let local = TypeDescriptor::class("app.Bot")
        .constructor(ConstructorDescriptor::empty().private())
        .build();
    assert!(matches!(reflector.new_instance(&local).unwrap(), Value::Object(_)));
}

#[test]
fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = Reflector::from_file(&temp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));
}

#[test]
fn test_invalid_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reflekt.toml");
    fs::write(&path, "[permissions]\nglobal = \"SOMETIMES\"\n").unwrap();

    let err = ReflektConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("SOMETIMES"));
}

#[test]
fn test_config_edits_are_revalidated() {
    let mut config = ReflektConfig::default();
    config.customization.namespace = "not a namespace".to_string();

    let err = Reflector::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}
