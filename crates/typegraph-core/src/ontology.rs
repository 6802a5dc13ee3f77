//! Traversal kind expansion hooks. The ontology (`subClassOf`,
//! `inverseOf`) lookup itself lives with the caller; the compiler only
//! consumes already-expanded kind lists and merges them.

use serde::{Deserialize, Serialize};

///
/// ExpandRule
///
/// How the caller widens the set of edge kinds before lowering.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandRule {
    #[default]
    None,
    /// Include kinds implying the named kinds.
    Implying,
    /// Include inverse kinds (walked in the opposite direction).
    Inverse,
    /// Both of the above.
    All,
}

/// Deduplicated union of forward and inverse edge kinds, preserving
/// forward-first ordering.
#[must_use]
pub fn merge_edge_kinds(forward: &[String], inverse: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(forward.len() + inverse.len());
    for kind in forward.iter().chain(inverse) {
        if !merged.iter().any(|seen| seen == kind) {
            merged.push(kind.clone());
        }
    }
    merged
}
