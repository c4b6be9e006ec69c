//! Capability scanning over descriptor populations.
//!
//! Pure discovery: every operation is a deterministic function of the
//! population passed in, with no external state and no side effects. Scanning
//! never rejects a descriptor — a provider marker declaring an unrecognized
//! category is still returned, and the registry rejects it at registration
//! time.

use std::collections::{HashMap, HashSet};

use super::descriptor::{MarkerKind, TypeDescriptor};

/// Stateless scanner over a descriptor population.
pub struct CapabilityScanner;

impl CapabilityScanner {
    /// Every type in the population carrying any recognized marker.
    pub fn scan(population: &[TypeDescriptor]) -> HashSet<TypeDescriptor> {
        population
            .iter()
            .filter(|d| !d.markers.is_empty())
            .cloned()
            .collect()
    }

    /// Only the types carrying a marker of the given kind.
    pub fn scan_for_marker(
        kind: MarkerKind,
        population: &[TypeDescriptor],
    ) -> HashSet<TypeDescriptor> {
        population
            .iter()
            .filter(|d| d.has_marker(kind))
            .cloned()
            .collect()
    }

    /// Provider-marked types grouped by their declared category.
    ///
    /// A type declaring several provider markers appears under each declared
    /// category. Categories are taken as declared, recognized or not.
    pub fn scan_providers(
        population: &[TypeDescriptor],
    ) -> HashMap<String, HashSet<TypeDescriptor>> {
        let mut by_category: HashMap<String, HashSet<TypeDescriptor>> = HashMap::new();
        for descriptor in population {
            for marker in &descriptor.markers {
                if marker.kind == MarkerKind::Provider {
                    by_category
                        .entry(marker.category.clone())
                        .or_default()
                        .insert(descriptor.clone());
                }
            }
        }
        by_category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::descriptor::Marker;

    fn population() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::new("OpenAiProvider", vec![Marker::provider("llm", "openai")]),
            TypeDescriptor::new("S3Provider", vec![Marker::provider("storage", "s3")]),
            TypeDescriptor::new("SqsProvider", vec![Marker::provider_unnamed("queue")]),
            TypeDescriptor::new("GrepTool", vec![Marker::tool("grep")]),
            TypeDescriptor::new("AuditListener", vec![Marker::listener()]),
            TypeDescriptor::new("PlainStruct", vec![]),
        ]
    }

    #[test]
    fn test_scan_returns_marked_types_only() {
        let result = CapabilityScanner::scan(&population());
        assert_eq!(result.len(), 5);
        assert!(!result.iter().any(|d| d.type_name == "PlainStruct"));
    }

    #[test]
    fn test_scan_empty_population() {
        assert!(CapabilityScanner::scan(&[]).is_empty());
        assert!(CapabilityScanner::scan_providers(&[]).is_empty());
    }

    #[test]
    fn test_scan_for_marker_filters_by_kind() {
        let pop = population();
        let providers = CapabilityScanner::scan_for_marker(MarkerKind::Provider, &pop);
        assert_eq!(providers.len(), 3);
        let tools = CapabilityScanner::scan_for_marker(MarkerKind::Tool, &pop);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools.iter().next().unwrap().type_name, "GrepTool");
    }

    #[test]
    fn test_scan_providers_groups_by_category() {
        let grouped = CapabilityScanner::scan_providers(&population());
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped["llm"].len(), 1);
        assert_eq!(grouped["storage"].len(), 1);
        assert_eq!(grouped["queue"].len(), 1);
        assert!(!grouped.contains_key("tool"));
    }

    #[test]
    fn test_scan_providers_keeps_unrecognized_categories() {
        let pop = vec![TypeDescriptor::new(
            "MysteryProvider",
            vec![Marker::provider("bogus-category", "mystery")],
        )];
        let grouped = CapabilityScanner::scan_providers(&pop);
        assert_eq!(grouped["bogus-category"].len(), 1);
    }

    #[test]
    fn test_scan_providers_multi_category_type() {
        let pop = vec![TypeDescriptor::new(
            "DualProvider",
            vec![
                Marker::provider("storage", "dual"),
                Marker::provider("queue", "dual"),
            ],
        )];
        let grouped = CapabilityScanner::scan_providers(&pop);
        assert_eq!(grouped["storage"].len(), 1);
        assert_eq!(grouped["queue"].len(), 1);
    }

    #[test]
    fn test_scan_is_repeatable() {
        let pop = population();
        assert_eq!(
            CapabilityScanner::scan(&pop),
            CapabilityScanner::scan(&pop)
        );
    }
}
