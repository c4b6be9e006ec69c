//! # Capability Discovery
//!
//! Declarative capability markers and the scanner that discovers them.
//!
//! Provider types carry [`Marker`]s describing what they are (`provider`,
//! `tool`, `listener`) and, for providers, the `(category, name)` key they
//! register under. The [`CapabilityScanner`] finds marked types in a
//! descriptor population and groups providers by category; the
//! [`ProviderRegistry`](crate::registry::ProviderRegistry) consumes the same
//! descriptors when registering instances.
//!
//! ## Discovery Flow
//!
//! 1. Bootstrap assembles a `Vec<TypeDescriptor>` population
//! 2. `CapabilityScanner::scan_providers(&population)` groups them by category
//! 3. `ProviderRegistry::register_provider_from_class(desc, instance)` derives
//!    the registration key and stores the instance
//! 4. Application code resolves instances via `get_provider(category, name)`

pub mod descriptor;
pub mod scanner;

pub use descriptor::{Marker, MarkerKind, TypeDescriptor};
pub use scanner::CapabilityScanner;
