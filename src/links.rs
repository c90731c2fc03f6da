//! Predecessor resolution from grouped issue links.
//!
//! Upstream trackers describe ordering through several inward link types. Only the
//! highest-priority class that has any links is used as the predecessor list of a task.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPriority {
    DoneAfter,
    BlockedBy,
    ChildOf,
}

impl LinkPriority {
    pub const ALL: [LinkPriority; 3] = [
        LinkPriority::DoneAfter,
        LinkPriority::BlockedBy,
        LinkPriority::ChildOf,
    ];

    pub fn inward_name(self) -> &'static str {
        match self {
            LinkPriority::DoneAfter => "has to be done after",
            LinkPriority::BlockedBy => "is blocked by",
            LinkPriority::ChildOf => "is child of",
        }
    }

    pub fn from_inward(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.inward_name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Keys of the highest-priority non-empty link class, deduplicated in first-seen order.
pub fn resolve_predecessors(prelinks: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    let mut grouped: BTreeMap<LinkPriority, Vec<&str>> = BTreeMap::new();
    for (link_type, keys) in prelinks {
        match LinkPriority::from_inward(link_type) {
            Some(priority) => grouped
                .entry(priority)
                .or_default()
                .extend(keys.iter().map(String::as_str)),
            None => tracing::debug!(link_type = %link_type, "ignoring unknown link type"),
        }
    }

    let Some((priority, keys)) = grouped.into_iter().find(|(_, keys)| !keys.is_empty()) else {
        return Vec::new();
    };

    let mut seen = HashSet::with_capacity(keys.len());
    let resolved: Vec<String> = keys
        .into_iter()
        .filter(|key| seen.insert(*key))
        .map(ToOwned::to_owned)
        .collect();
    tracing::debug!(
        link_type = priority.inward_name(),
        count = resolved.len(),
        "resolved predecessors from links"
    );
    resolved
}
