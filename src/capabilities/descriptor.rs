//! Declarative capability descriptors attached to provider types.
//!
//! The framework discovers providers through declarative markers rather than
//! through any central wiring file. Each registrable type is represented by a
//! [`TypeDescriptor`]: its simple identifier plus the [`Marker`]s it declares.
//! Bootstrap code assembles the descriptor population (by hand or via a
//! build-time generator) and hands it to the
//! [`CapabilityScanner`](super::scanner::CapabilityScanner).
//!
//! Descriptors are immutable values. They are read-only input to scanning and
//! registration and are never mutated after construction.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MarkerKind
// ---------------------------------------------------------------------------

/// The closed set of recognized declarative marker kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Marks a type as a provider registrable under a `(category, name)` key.
    Provider,
    /// Marks a type as a standalone tool implementation.
    Tool,
    /// Marks a type as an event listener.
    Listener,
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// A single declarative marker carried by a type.
///
/// `category` is only meaningful on provider markers. It is read at scan time
/// but validated at registration time: a marker declaring a category outside
/// the registry's known set is still returned by every scan operation, and
/// only [`register_provider`](crate::registry::ProviderRegistry::register_provider)
/// rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marker {
    /// Which recognized marker this is.
    pub kind: MarkerKind,

    /// Declared category (provider markers only; blank otherwise).
    #[serde(default)]
    pub category: String,

    /// Declared registration name. May legally be blank; see
    /// [`TypeDescriptor::effective_name`] for the derivation rule.
    #[serde(default)]
    pub name: String,
}

impl Marker {
    /// A provider marker with an explicit declared name.
    pub fn provider(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Provider,
            category: category.into(),
            name: name.into(),
        }
    }

    /// A provider marker with a blank name (effective name derived from the
    /// type identifier at registration time).
    pub fn provider_unnamed(category: impl Into<String>) -> Self {
        Self::provider(category, "")
    }

    /// A tool marker.
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Tool,
            category: String::new(),
            name: name.into(),
        }
    }

    /// A listener marker.
    pub fn listener() -> Self {
        Self {
            kind: MarkerKind::Listener,
            category: String::new(),
            name: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// TypeDescriptor
// ---------------------------------------------------------------------------

/// Descriptor for one candidate type in a scan population.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Simple identifier of the type (e.g. `"PostgresProvider"`).
    pub type_name: String,

    /// Markers the type declares, in declaration order.
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl TypeDescriptor {
    /// Create a descriptor for `type_name` carrying the given markers.
    pub fn new(type_name: impl Into<String>, markers: Vec<Marker>) -> Self {
        Self {
            type_name: type_name.into(),
            markers,
        }
    }

    /// Whether this type declares any marker of the given kind.
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.markers.iter().any(|m| m.kind == kind)
    }

    /// First declared marker of the given kind, if any.
    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.kind == kind)
    }

    /// Effective registration name for this type's provider marker.
    ///
    /// A blank declared name falls back to the decapitalized type identifier:
    /// `TestProviderWithoutName` registers as `testProviderWithoutName`. The
    /// effective name is therefore always non-blank for a non-blank type
    /// identifier. Returns `None` when the type carries no provider marker.
    pub fn effective_name(&self) -> Option<String> {
        let marker = self.marker(MarkerKind::Provider)?;
        if marker.name.is_empty() {
            Some(decapitalize(&self.type_name))
        } else {
            Some(marker.name.clone())
        }
    }

    /// `(category, effective_name)` registration key for this type's provider
    /// marker, or `None` when the type carries no provider marker.
    pub fn provider_key(&self) -> Option<(String, String)> {
        let marker = self.marker(MarkerKind::Provider)?;
        let name = self.effective_name()?;
        Some((marker.category.clone(), name))
    }
}

/// Lower-case exactly the first character of an identifier, leaving the
/// remainder unchanged.
pub(crate) fn decapitalize(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
