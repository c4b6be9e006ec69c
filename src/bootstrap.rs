//! Boot-time provider registration.
//!
//! The bootstrap collaborator scans a descriptor population once at process
//! start and feeds every discovered `(descriptor, instance)` pair through the
//! registry. This module supplies that loop; the scan trigger itself stays
//! with the caller.

use std::sync::Arc;

use crate::capabilities::descriptor::TypeDescriptor;
use crate::registry::{ConfigurationError, Provider, ProviderRegistry};

/// Register every discovered `(descriptor, instance)` pair, deriving each
/// registration key from the descriptor's provider marker.
///
/// Stops at the first [`ConfigurationError`] — earlier registrations stay in
/// place, and the caller decides whether one bad provider is fatal to the
/// process. Returns the number of providers registered.
pub fn register_discovered(
    registry: &ProviderRegistry,
    discovered: &[(TypeDescriptor, Arc<dyn Provider>)],
) -> Result<usize, ConfigurationError> {
    let mut count = 0;
    for (descriptor, instance) in discovered {
        registry.register_provider_from_class(descriptor, Arc::clone(instance))?;
        count += 1;
    }
    log::info!("[bootstrap] registered {count} providers");
    Ok(count)
}
