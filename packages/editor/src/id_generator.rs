use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

const SUFFIX_LEN: usize = 9;

/// Id generator for copied nodes.
///
/// Ids combine a monotonically increasing counter with a random base-36
/// suffix: `{prefix}-{count}-{suffix}`. The counter keeps ids from one
/// generator unique; the suffix keeps ids from separate generators apart.
#[derive(Debug)]
pub struct IdGenerator {
    prefix: String,
    count: AtomicU64,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            count: AtomicU64::new(0),
        }
    }

    /// Generate the next id
    pub fn new_id(&self) -> String {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}-{}", self.prefix, count, random_suffix())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("copy")
    }
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| std::char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let gen = IdGenerator::new("copy");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.starts_with("copy-1-"));
        assert!(id2.starts_with("copy-2-"));
        assert_eq!(id1.len(), "copy-1-".len() + SUFFIX_LEN);
    }

    #[test]
    fn test_rapid_ids_are_unique() {
        let gen = IdGenerator::default();
        let ids: HashSet<String> = (0..10_000).map(|_| gen.new_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_separate_generators_differ() {
        let a = IdGenerator::new("copy");
        let b = IdGenerator::new("copy");
        assert_ne!(a.new_id(), b.new_id());
    }
}
