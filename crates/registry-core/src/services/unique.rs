//! Order-preserving deduplication

use std::collections::HashSet;
use std::hash::Hash;

/// Keeps the first occurrence of every value, in input order.
pub fn unique<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
