//! Designation markers resolved into launch targets.

use standoff_core::types::{MarkerHandle, Position};

use crate::host::TargetResolver;

/// An operator-designated aim point, alive as long as its marker is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Position,
    pub marker: MarkerHandle,
}

/// True for labels of the form `<prefix><digits>`, prefix case-insensitive.
pub fn is_designation_label(label: &str, prefix: &str) -> bool {
    let label = label.trim();
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return false;
    }
    let (Some(head), Some(tail)) = (label.get(..prefix.len()), label.get(prefix.len()..)) else {
        return false;
    };
    head.eq_ignore_ascii_case(prefix) && !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit())
}

/// Current designation targets, in the order the resolver reports them.
pub fn resolve_targets(resolver: &impl TargetResolver, prefix: &str) -> Vec<Target> {
    resolver
        .list_pending_markers()
        .into_iter()
        .filter(|m| is_designation_label(&m.label, prefix))
        .map(|m| Target {
            position: m.position,
            marker: m.handle,
        })
        .collect()
}
