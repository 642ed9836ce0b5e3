use chrono::{DateTime, Utc};

use crate::feed::Item;

/// Restriction on the item set of a parsed feed. Stateless values, reusable
/// across invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Keep at most this many items, in document order.
    Limit(usize),
    /// Keep items published strictly after this point in time. Items
    /// without a timestamp cannot be newer than the cutoff and are dropped.
    Since(DateTime<Utc>),
}

impl Filter {
    fn accepts(&self, item: &Item) -> bool {
        match self {
            Filter::Limit(_) => true,
            Filter::Since(cutoff) => item.published.map_or(false, |ts| ts > *cutoff),
        }
    }
}

/// Applies a filter list by conjunction: recency predicates drop items
/// first, then every count limit truncates what survived. Evaluating limits
/// last keeps the result independent of filter order.
pub fn apply(filters: &[Filter], items: Vec<Item>) -> Vec<Item> {
    if filters.is_empty() {
        return items;
    }

    let mut kept: Vec<Item> = items
        .into_iter()
        .filter(|item| filters.iter().all(|f| f.accepts(item)))
        .collect();

    for filter in filters {
        if let Filter::Limit(n) = filter {
            kept.truncate(*n);
        }
    }

    kept
}
