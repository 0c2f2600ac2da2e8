//! Reflection permissions and scoped access elevation
//!
//! Non-public members are only reachable while an [`AccessGuard`] is held.
//! Acquiring a guard first checks the [`PermissionStore`] for the member's
//! declaring type; the guard restores accessibility when dropped, on every
//! exit path.
//!
//! ## TOML Configuration
//!
//! ```toml
//! [permissions]
//! global = "ALL"
//!
//! [permissions.namespaces]
//! "app" = "FULL_ACCESS"
//! "plugins.*" = "PUBLIC_ONLY"
//! "untrusted.**" = "READ_PUBLIC|INVOKE_PUBLIC"
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashMap;

use reflekt_types::{MemberKind, ReflectError, ReflectResult};

/// Reflection permission flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReflectionPermission(u8);

impl ReflectionPermission {
    /// No reflection allowed
    pub const NONE: Self = Self(0x00);
    /// Read public fields
    pub const READ_PUBLIC: Self = Self(0x01);
    /// Read non-public fields
    pub const READ_PRIVATE: Self = Self(0x02);
    /// Write public fields
    pub const WRITE_PUBLIC: Self = Self(0x04);
    /// Write non-public fields
    pub const WRITE_PRIVATE: Self = Self(0x08);
    /// Invoke public methods and constructors
    pub const INVOKE_PUBLIC: Self = Self(0x10);
    /// Invoke non-public methods and constructors
    pub const INVOKE_PRIVATE: Self = Self(0x20);

    // Common combinations
    /// READ_PUBLIC | READ_PRIVATE
    pub const READ_ALL: Self = Self(0x03);
    /// WRITE_PUBLIC | WRITE_PRIVATE
    pub const WRITE_ALL: Self = Self(0x0C);
    /// INVOKE_PUBLIC | INVOKE_PRIVATE
    pub const INVOKE_ALL: Self = Self(0x30);
    /// READ_PUBLIC | WRITE_PUBLIC | INVOKE_PUBLIC
    pub const PUBLIC_ONLY: Self = Self(0x15);
    /// All read/write/invoke flags
    pub const FULL_ACCESS: Self = Self(0x3F);
    /// Every flag
    pub const ALL: Self = Self(0xFF);

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if permission contains a flag
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of permissions
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Difference (remove flags)
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    fn from_name(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Some(Self::NONE),
            "READ_PUBLIC" => Some(Self::READ_PUBLIC),
            "READ_PRIVATE" => Some(Self::READ_PRIVATE),
            "WRITE_PUBLIC" => Some(Self::WRITE_PUBLIC),
            "WRITE_PRIVATE" => Some(Self::WRITE_PRIVATE),
            "INVOKE_PUBLIC" => Some(Self::INVOKE_PUBLIC),
            "INVOKE_PRIVATE" => Some(Self::INVOKE_PRIVATE),
            "READ_ALL" => Some(Self::READ_ALL),
            "WRITE_ALL" => Some(Self::WRITE_ALL),
            "INVOKE_ALL" => Some(Self::INVOKE_ALL),
            "PUBLIC_ONLY" => Some(Self::PUBLIC_ONLY),
            "FULL_ACCESS" => Some(Self::FULL_ACCESS),
            "ALL" => Some(Self::ALL),
            _ => {
                // Try parsing as hex or decimal
                if let Some(hex) = s.strip_prefix("0x") {
                    u8::from_str_radix(hex, 16).ok().map(Self::from_bits)
                } else {
                    s.parse::<u8>().ok().map(Self::from_bits)
                }
            }
        }
    }
}

impl Default for ReflectionPermission {
    fn default() -> Self {
        Self::ALL
    }
}

/// Parses a flag name, a preset, a raw number, or several of those joined
/// with `|` (e.g. `"READ_PUBLIC|WRITE_PUBLIC"`)
impl FromStr for ReflectionPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('|').try_fold(Self::NONE, |acc, part| {
            Self::from_name(part.trim())
                .map(|perm| acc.union(perm))
                .ok_or_else(|| format!("Invalid permission value: {}", s))
        })
    }
}

impl fmt::Display for ReflectionPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => write!(f, "NONE"),
            Self::READ_PUBLIC => write!(f, "READ_PUBLIC"),
            Self::READ_PRIVATE => write!(f, "READ_PRIVATE"),
            Self::WRITE_PUBLIC => write!(f, "WRITE_PUBLIC"),
            Self::WRITE_PRIVATE => write!(f, "WRITE_PRIVATE"),
            Self::INVOKE_PUBLIC => write!(f, "INVOKE_PUBLIC"),
            Self::INVOKE_PRIVATE => write!(f, "INVOKE_PRIVATE"),
            Self::READ_ALL => write!(f, "READ_ALL"),
            Self::WRITE_ALL => write!(f, "WRITE_ALL"),
            Self::INVOKE_ALL => write!(f, "INVOKE_ALL"),
            Self::PUBLIC_ONLY => write!(f, "PUBLIC_ONLY"),
            Self::FULL_ACCESS => write!(f, "FULL_ACCESS"),
            Self::ALL => write!(f, "ALL"),
            _ => write!(f, "0x{:02X}", self.0),
        }
    }
}

/// Kind of reflective operation on a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOp {
    /// Reading a field
    Read,
    /// Writing a field
    Write,
    /// Invoking a method or constructor
    Invoke,
}

impl AccessOp {
    /// Permission flag required to perform this operation
    pub fn required(self, public: bool) -> ReflectionPermission {
        match (self, public) {
            (AccessOp::Read, true) => ReflectionPermission::READ_PUBLIC,
            (AccessOp::Read, false) => ReflectionPermission::READ_PRIVATE,
            (AccessOp::Write, true) => ReflectionPermission::WRITE_PUBLIC,
            (AccessOp::Write, false) => ReflectionPermission::WRITE_PRIVATE,
            (AccessOp::Invoke, true) => ReflectionPermission::INVOKE_PUBLIC,
            (AccessOp::Invoke, false) => ReflectionPermission::INVOKE_PRIVATE,
        }
    }
}

/// Namespace permission pattern (supports wildcards)
#[derive(Debug, Clone)]
pub struct NamespaceRule {
    /// Pattern (e.g., "app", "plugins.*", "**")
    pub pattern: String,
    /// Permissions for matching namespaces
    pub permissions: ReflectionPermission,
}

impl NamespaceRule {
    /// Check if a namespace matches this pattern.
    ///
    /// `prefix.*` matches direct children only, `prefix.**` matches the
    /// prefix itself and everything below it.
    pub fn matches(&self, namespace: &str) -> bool {
        if self.pattern == "**" || self.pattern == "*" {
            return true;
        }

        if let Some(prefix) = self.pattern.strip_suffix(".**") {
            namespace == prefix
                || namespace
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.'))
        } else if let Some(prefix) = self.pattern.strip_suffix(".*") {
            namespace
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|child| !child.is_empty() && !child.contains('.'))
        } else {
            self.pattern == namespace
        }
    }
}

/// Store for reflection permissions
#[derive(Debug)]
pub struct PermissionStore {
    /// Global default permissions
    global_default: ReflectionPermission,

    /// Type-level permissions: canonical type name -> permissions
    type_permissions: FxHashMap<String, ReflectionPermission>,

    /// Namespace-level permissions: exact namespace -> permissions
    namespace_permissions: FxHashMap<String, ReflectionPermission>,

    /// Wildcard namespace rules, first match wins
    namespace_rules: Vec<NamespaceRule>,
}

impl Default for PermissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionStore {
    /// Create a new permission store with default (ALL) permissions
    pub fn new() -> Self {
        Self {
            global_default: ReflectionPermission::ALL,
            type_permissions: FxHashMap::default(),
            namespace_permissions: FxHashMap::default(),
            namespace_rules: Vec::new(),
        }
    }

    /// Check if any permissions are configured
    pub fn has_any_restrictions(&self) -> bool {
        self.global_default != ReflectionPermission::ALL
            || !self.type_permissions.is_empty()
            || !self.namespace_permissions.is_empty()
            || !self.namespace_rules.is_empty()
    }

    // ===== Global Permissions =====

    /// Set global default permissions
    pub fn set_global(&mut self, permissions: ReflectionPermission) {
        self.global_default = permissions;
    }

    /// Get global default permissions
    pub fn global(&self) -> ReflectionPermission {
        self.global_default
    }

    // ===== Type Permissions =====

    /// Set type-level permissions
    pub fn set_type(&mut self, type_name: &str, permissions: ReflectionPermission) {
        self.type_permissions.insert(type_name.to_string(), permissions);
    }

    /// Clear type-level permissions
    pub fn clear_type(&mut self, type_name: &str) {
        self.type_permissions.remove(type_name);
    }

    // ===== Namespace Permissions =====

    /// Set permissions for a namespace; patterns containing `*` become rules
    pub fn set_namespace(&mut self, pattern: &str, permissions: ReflectionPermission) {
        if pattern.contains('*') {
            self.namespace_rules.push(NamespaceRule {
                pattern: pattern.to_string(),
                permissions,
            });
        } else {
            self.namespace_permissions
                .insert(pattern.to_string(), permissions);
        }
    }

    /// Get namespace permissions with pattern matching
    pub fn namespace_resolved(&self, namespace: &str) -> Option<ReflectionPermission> {
        if let Some(perms) = self.namespace_permissions.get(namespace) {
            return Some(*perms);
        }

        self.namespace_rules
            .iter()
            .find(|rule| rule.matches(namespace))
            .map(|rule| rule.permissions)
    }

    // ===== Permission Resolution =====

    /// Resolve permissions for a canonical type name: type level, then
    /// namespace level, then the global default
    pub fn resolve(&self, type_name: &str) -> ReflectionPermission {
        if let Some(perms) = self.type_permissions.get(type_name) {
            return *perms;
        }

        let namespace = type_name.rfind('.').map_or("", |idx| &type_name[..idx]);
        self.namespace_resolved(namespace)
            .unwrap_or(self.global_default)
    }

    /// Fail with an access error unless `op` is permitted on the member
    pub fn check(
        &self,
        member: MemberKind,
        name: &str,
        type_name: &str,
        op: AccessOp,
        public: bool,
    ) -> ReflectResult<()> {
        let required = op.required(public);
        if self.resolve(type_name).contains(required) {
            Ok(())
        } else {
            Err(ReflectError::Access {
                member,
                name: name.to_string(),
                type_name: type_name.to_string(),
                required: required.to_string(),
            })
        }
    }
}

// ============================================================================
// Accessibility
// ============================================================================

/// Accessibility state of a single member.
///
/// Public members are always accessible. Non-public members are accessible
/// while at least one [`AccessGuard`] on them is alive.
#[derive(Debug)]
pub struct Accessibility {
    public: bool,
    elevation: AtomicUsize,
}

impl Accessibility {
    pub(crate) fn new(public: bool) -> Self {
        Self {
            public,
            elevation: AtomicUsize::new(0),
        }
    }

    /// Whether the member is declared public
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Whether the member can currently be accessed
    pub fn is_accessible(&self) -> bool {
        self.public || self.elevation.load(Ordering::Acquire) > 0
    }

    /// Number of live guards elevating this member
    pub fn elevation(&self) -> usize {
        self.elevation.load(Ordering::Acquire)
    }
}

/// Scoped elevation of a member's accessibility
#[derive(Debug)]
pub struct AccessGuard<'a> {
    access: &'a Accessibility,
    elevated: bool,
}

impl<'a> AccessGuard<'a> {
    /// Check the permission for `op` and make the member accessible until
    /// the guard is dropped
    pub fn elevate(
        store: &PermissionStore,
        access: &'a Accessibility,
        member: MemberKind,
        name: &str,
        type_name: &str,
        op: AccessOp,
    ) -> ReflectResult<Self> {
        store.check(member, name, type_name, op, access.is_public())?;

        let elevated = !access.is_public();
        if elevated {
            let depth = access.elevation.fetch_add(1, Ordering::AcqRel) + 1;
            tracing::trace!(%member, name, type_name, depth, "access elevated");
        }

        Ok(Self { access, elevated })
    }
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        if self.elevated {
            self.access.elevation.fetch_sub(1, Ordering::AcqRel);
        }
    }
}
