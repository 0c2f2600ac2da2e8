//! Reflection and conversion errors

use std::fmt;

use thiserror::Error;

/// Result type for reflection operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Coarse error taxonomy, independent of the concrete variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Member or type does not exist
    Lookup,
    /// Access denied by the reflection policy
    Access,
    /// Value cannot be parsed or coerced
    Conversion,
    /// No usable constructor, or the constructor failed
    Instantiation,
    /// Internally unreachable state
    Invariant,
}

/// Kind of member named in lookup and access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A registered type
    Type,
    /// An instance field
    Field,
    /// A method
    Method,
    /// A constructor
    Constructor,
    /// An implemented interface
    Interface,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Type => write!(f, "type"),
            MemberKind::Field => write!(f, "field"),
            MemberKind::Method => write!(f, "method"),
            MemberKind::Constructor => write!(f, "constructor"),
            MemberKind::Interface => write!(f, "interface"),
        }
    }
}

/// Top-level reflection error
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReflectError {
    /// Requested member does not exist on the type or any ancestor
    #[error("Cannot find the {member} '{name}' in the type '{type_name}'")]
    Lookup {
        /// What was looked up
        member: MemberKind,
        /// Member name (or signature)
        name: String,
        /// Inspected type
        type_name: String,
    },

    /// Access denied by the reflection permission policy
    #[error("Cannot access the {member} '{name}' of '{type_name}': {required} is not granted")]
    Access {
        /// Accessed member kind
        member: MemberKind,
        /// Member name
        name: String,
        /// Declaring type
        type_name: String,
        /// Missing permission
        required: String,
    },

    /// Value conversion failure
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Instantiation failure
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    /// An internally unreachable state was reached
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl ReflectError {
    /// Taxonomy kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReflectError::Lookup { .. } => ErrorKind::Lookup,
            ReflectError::Access { .. } => ErrorKind::Access,
            ReflectError::Conversion(_) => ErrorKind::Conversion,
            ReflectError::Instantiation(_) => ErrorKind::Instantiation,
            ReflectError::Invariant(_) => ErrorKind::Invariant,
        }
    }

    /// Shorthand for a lookup failure
    pub fn lookup(member: MemberKind, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        ReflectError::Lookup {
            member,
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Shorthand for an invariant failure
    pub fn not_expected(what: impl Into<String>) -> Self {
        ReflectError::Invariant(what.into())
    }
}

/// Errors converting a value to a requested type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    /// Text is not a valid literal of the target type
    #[error("Cannot parse '{value}' as {target}: {reason}")]
    MalformedLiteral {
        /// Offending text
        value: String,
        /// Target type name
        target: String,
        /// Parser message
        reason: String,
    },

    /// No enumeration constant matches the text
    #[error("Cannot find the enum constant: {type_name}.{value}")]
    NoEnumConstant {
        /// Enumeration type
        type_name: String,
        /// Offending text
        value: String,
    },

    /// Text is not one of the accepted boolean tokens
    #[error("Cannot convert the string value '{value}' to boolean")]
    InvalidBoolean {
        /// Offending text
        value: String,
    },

    /// No string conversion exists for the target type
    #[error("Cannot convert string value to type '{target}'")]
    NoStringConversion {
        /// Target type name
        target: String,
    },

    /// The source value cannot be coerced to the target
    #[error("Cannot convert the value '{value}' to {target}")]
    Incompatible {
        /// Rendered source value
        value: String,
        /// Target type or kind name
        target: String,
    },

    /// Conversion between structured types is not supported
    #[error("Cannot convert the value to type '{target}'")]
    Unsupported {
        /// Target type name
        target: String,
    },

    /// Value does not fit the declared type of a field
    #[error("Cannot assign '{value}' to the field '{field}' of type '{field_type}'")]
    FieldType {
        /// Rendered value
        value: String,
        /// Field name
        field: String,
        /// Declared field type
        field_type: String,
    },
}

/// Errors constructing instances
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InstantiationError {
    /// No public constructor accepts the arguments
    #[error("Cannot find appropriate constructor for {type_name} with args {args}")]
    NoMatchingConstructor {
        /// Requested type
        type_name: String,
        /// Rendered argument list
        args: String,
    },

    /// Type declares no no-argument constructor
    #[error("Cannot instantiate {type_name}: no default constructor is declared")]
    NoDefaultConstructor {
        /// Requested type
        type_name: String,
    },

    /// Two candidates are assignable to the same parameter
    #[error("Found more than one instance of {param_type}: {first} and {second}")]
    AmbiguousCandidates {
        /// Requested type
        type_name: String,
        /// Parameter type both candidates satisfy
        param_type: String,
        /// First matching candidate
        first: String,
        /// Second matching candidate
        second: String,
    },

    /// The selected constructor itself failed
    #[error("Constructor of {type_name} failed: {source}")]
    ConstructorFailed {
        /// Requested type
        type_name: String,
        /// Underlying failure
        source: Box<ReflectError>,
    },
}
