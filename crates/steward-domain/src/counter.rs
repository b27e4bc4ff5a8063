//! Category counters for exclusion logs and demographic tallies
//!
//! Counter keys are discovered at runtime (gender codes, region codes,
//! exclusion reasons), so no schema is fixed in advance. The counter is
//! append-only: counts are monotonically non-decreasing within a run.

use std::collections::HashMap;

/// Append-only mapping from category label to count with default-zero lookup.
///
/// Centralizes the repeated sort-and-report logic used by the filter chain
/// exclusion logs and the demographic counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounter {
    counts: HashMap<String, u64>,
}

impl CategoryCounter {
    /// Create a new empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a category by one
    pub fn increment(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    /// Increment a category by an arbitrary amount
    pub fn add(&mut self, key: impl Into<String>, amount: u64) {
        *self.counts.entry(key.into()).or_insert(0) += amount;
    }

    /// Get the count for a category (zero if never seen)
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all category counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct categories seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no category has been counted yet
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Fold another counter into this one (commutative, associative)
    pub fn merge(&mut self, other: &CategoryCounter) {
        for (key, count) in &other.counts {
            *self.counts.entry(key.clone()).or_insert(0) += count;
        }
    }

    /// Iterate over (label, count) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Categories sorted by descending count, ties broken by label
    ///
    /// This is the order reports are rendered in.
    pub fn sorted_by_count_desc(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Fraction of `part` over `whole`, or `None` when the denominator is zero.
///
/// All percentage computations in reports go through this guard so a
/// zero-candidate round can never raise a division error.
pub fn share(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64)
    }
}

/// Render `part / whole` as a percentage string, or `"N/A"` when the
/// denominator is zero.
pub fn format_share(part: u64, whole: u64) -> String {
    match share(part, whole) {
        Some(fraction) => format!("{:.1}%", 100.0 * fraction),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_empty() {
        let counter = CategoryCounter::new();
        assert!(counter.is_empty());
        assert_eq!(counter.total(), 0);
        assert_eq!(counter.get("anything"), 0);
    }

    #[test]
    fn test_increment_and_get() {
        let mut counter = CategoryCounter::new();
        counter.increment("Q6581097");
        counter.increment("Q6581097");
        counter.increment("Q6581072");

        assert_eq!(counter.get("Q6581097"), 2);
        assert_eq!(counter.get("Q6581072"), 1);
        assert_eq!(counter.total(), 3);
        assert_eq!(counter.len(), 2);
    }

    #[test]
    fn test_add() {
        let mut counter = CategoryCounter::new();
        counter.add("missing_imageinfo", 10);
        counter.add("missing_imageinfo", 3);

        assert_eq!(counter.get("missing_imageinfo"), 13);
    }

    #[test]
    fn test_merge() {
        let mut a = CategoryCounter::new();
        a.add("protected", 5);
        a.add("exists", 7);

        let mut b = CategoryCounter::new();
        b.add("protected", 2);
        b.add("missing", 1);

        a.merge(&b);
        assert_eq!(a.get("protected"), 7);
        assert_eq!(a.get("exists"), 7);
        assert_eq!(a.get("missing"), 1);
        assert_eq!(a.total(), 15);
    }

    #[test]
    fn test_sorted_by_count_desc() {
        let mut counter = CategoryCounter::new();
        counter.add("asia", 3);
        counter.add("europe", 9);
        counter.add("africa", 3);
        counter.add("oceania", 1);

        let sorted = counter.sorted_by_count_desc();
        assert_eq!(
            sorted,
            vec![("europe", 9), ("africa", 3), ("asia", 3), ("oceania", 1)]
        );
    }

    #[test]
    fn test_share_guards_zero_denominator() {
        assert_eq!(share(5, 0), None);
        assert_eq!(share(0, 0), None);
        assert_eq!(share(1, 4), Some(0.25));
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(1, 4), "25.0%");
        assert_eq!(format_share(0, 3), "0.0%");
        assert_eq!(format_share(7, 0), "N/A");
    }
}
