//! Concurrent provider registry — the authoritative `(category, name)` store.
//!
//! Populated at boot by the scan-and-register loop, queried for the rest of
//! the process lifetime by anything needing a capability. Categories form a
//! closed set fixed at construction; names within a category are last-write-
//! wins keys. Lookups are total functions: "not found" is `None`/empty/zero,
//! never an error. The only hard failure is a [`ConfigurationError`] raised
//! at registration time.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::capabilities::descriptor::TypeDescriptor;

// ---------------------------------------------------------------------------
// Known categories
// ---------------------------------------------------------------------------

/// The closed set of provider categories known to a default-constructed
/// registry. Registration under any other category fails with
/// [`ConfigurationError::UnknownCategory`].
pub const KNOWN_CATEGORIES: &[&str] = &[
    "llm",
    "storage",
    "messaging",
    "queue",
    "tool",
    "database",
    "orchestration",
    "memory",
    "evaluation",
    "web-search",
    "web-test",
    "infrastructure",
];

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// A concrete capability implementation stored in the registry.
///
/// The registry treats instances as opaque shared references: one instance
/// may be registered under several keys, in the same or different categories.
/// Callers that need the concrete type downcast through [`as_any`](Provider::as_any).
pub trait Provider: Send + Sync {
    /// Downcast hook for callers that need the concrete provider type.
    fn as_any(&self) -> &dyn Any;
}

// ---------------------------------------------------------------------------
// ConfigurationError
// ---------------------------------------------------------------------------

/// Hard registration failure. Fatal to the registration call; the bootstrap
/// caller decides whether one bad provider is fatal to the process.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Registration against a category outside the registry's known set.
    #[error("unknown provider category: {category}")]
    UnknownCategory { category: String },

    /// `register_provider_from_class` with a type carrying no provider marker.
    #[error("type {type_name} carries no provider marker")]
    MissingProviderMarker { type_name: String },
}

// ---------------------------------------------------------------------------
// ProviderRegistry
// ---------------------------------------------------------------------------

/// Concurrent, category-partitioned store mapping `(category, name)` to a
/// live provider instance.
///
/// The outer category map is frozen after construction, so the category set
/// can never be observed mid-update; every known category holds an inner
/// [`DashMap`] whose per-key operations are atomic. Registrations may race
/// with each other and with lookups without caller-side locking.
pub struct ProviderRegistry {
    categories: HashMap<String, DashMap<String, Arc<dyn Provider>>>,
}

impl ProviderRegistry {
    /// Registry over the default [`KNOWN_CATEGORIES`] set, every category
    /// initialized to an empty inner map.
    pub fn new() -> Self {
        Self::with_categories(KNOWN_CATEGORIES.iter().copied())
    }

    /// Registry over a caller-supplied closed category set.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|c| (c.into(), DashMap::new()))
                .collect(),
        }
    }

    /// Register `instance` under `(category, name)`, overwriting any previous
    /// entry for that key.
    ///
    /// An empty `name` is a legal (if degenerate) key. Fails only when
    /// `category` is outside the known set, in which case the registry is
    /// left untouched.
    pub fn register_provider(
        &self,
        category: &str,
        name: &str,
        instance: Arc<dyn Provider>,
    ) -> Result<(), ConfigurationError> {
        let providers =
            self.categories
                .get(category)
                .ok_or_else(|| ConfigurationError::UnknownCategory {
                    category: category.to_string(),
                })?;
        providers.insert(name.to_string(), instance);
        log::debug!("[ProviderRegistry] registered {category}/{name}");
        Ok(())
    }

    /// Register `instance` under the `(category, effective_name)` key derived
    /// from the type's provider marker (blank declared names fall back to the
    /// decapitalized type identifier).
    pub fn register_provider_from_class(
        &self,
        descriptor: &TypeDescriptor,
        instance: Arc<dyn Provider>,
    ) -> Result<(), ConfigurationError> {
        let (category, name) =
            descriptor
                .provider_key()
                .ok_or_else(|| ConfigurationError::MissingProviderMarker {
                    type_name: descriptor.type_name.clone(),
                })?;
        self.register_provider(&category, &name, instance)
    }

    /// Look up a provider. `None` for an unknown category or absent name —
    /// lookups never fail.
    pub fn get_provider(&self, category: &str, name: &str) -> Option<Arc<dyn Provider>> {
        self.categories
            .get(category)?
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Defensive copy of a category's `name → instance` map. Empty for an
    /// unknown category; mutating the returned map never affects the registry.
    pub fn get_providers_by_category(&self, category: &str) -> HashMap<String, Arc<dyn Provider>> {
        match self.categories.get(category) {
            Some(providers) => providers
                .iter()
                .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
                .collect(),
            None => HashMap::new(),
        }
    }

    /// Number of providers registered under `category` (zero for an unknown
    /// category).
    pub fn get_provider_count(&self, category: &str) -> usize {
        self.categories.get(category).map_or(0, |providers| providers.len())
    }

    /// Total provider count across all categories.
    pub fn total_provider_count(&self) -> usize {
        self.categories.values().map(|providers| providers.len()).sum()
    }

    /// Whether `(category, name)` is currently registered.
    pub fn has_provider(&self, category: &str, name: &str) -> bool {
        self.get_provider(category, name).is_some()
    }

    /// The closed category set fixed at construction time. Every category is
    /// present here even with zero registered providers.
    pub fn categories(&self) -> HashSet<&str> {
        self.categories.keys().map(String::as_str).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
