//! # Provider Registry
//!
//! The authoritative, concurrency-safe `(category, name) → instance` store.
//!
//! Built once at process start over the closed [`KNOWN_CATEGORIES`] set (or a
//! caller-supplied set), populated by the bootstrap scan-and-register loop,
//! and queried by every component needing a capability thereafter. Lookups
//! are total; registration against an unknown category is the one hard
//! failure ([`ConfigurationError`]).

pub mod provider_registry;

pub use provider_registry::{
    ConfigurationError, Provider, ProviderRegistry, KNOWN_CATEGORIES,
};
