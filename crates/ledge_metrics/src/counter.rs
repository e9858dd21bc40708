//! Named event totals

use std::collections::BTreeMap;

/// Totals keyed by static names; iterates in name order so periodic
/// summaries print stably.
#[derive(Debug, Default, Clone)]
pub struct Counters {
    totals: BTreeMap<&'static str, u64>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, amount: u64) {
        *self.totals.entry(name).or_insert(0) += amount;
    }

    pub fn set(&mut self, name: &'static str, value: u64) {
        self.totals.insert(name, value);
    }

    pub fn get(&self, name: &'static str) -> u64 {
        self.totals.get(name).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.totals.iter().map(|(&name, &value)| (name, value))
    }

    /// Return the current totals and start over from zero.
    pub fn take(&mut self) -> BTreeMap<&'static str, u64> {
        std::mem::take(&mut self.totals)
    }

    pub fn clear(&mut self) {
        self.totals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_takes() {
        let mut counters = Counters::new();
        counters.add("removed", 2);
        counters.add("hits", 5);
        counters.add("removed", 1);
        counters.set("live", 40);

        assert_eq!(counters.get("removed"), 3);
        assert_eq!(counters.get("missing"), 0);
        let names: Vec<_> = counters.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["hits", "live", "removed"]);

        let taken = counters.take();
        assert_eq!(taken.get("hits"), Some(&5));
        assert_eq!(counters.get("hits"), 0);
    }
}
