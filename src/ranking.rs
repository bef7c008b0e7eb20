//! Bounded best-path list
//!
//! Keeps the top paths sorted by success rate, highest first. Paths with equal
//! success rates stay in the order they were offered.

use crate::consts::MAX_PATHS;
use crate::sim::ThreeCushionPath;

/// Top-N ranking of candidate paths
#[derive(Debug, Clone)]
pub struct PathRanking {
    capacity: usize,
    entries: Vec<ThreeCushionPath>,
}

impl Default for PathRanking {
    fn default() -> Self {
        Self::new(MAX_PATHS)
    }
}

impl PathRanking {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Check if a path would make the list
    pub fn qualifies(&self, path: &ThreeCushionPath) -> bool {
        if !path.is_valid || self.capacity == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        // Must beat the lowest entry outright
        self.entries
            .last()
            .map(|e| path.success_rate > e.success_rate)
            .unwrap_or(true)
    }

    /// Rank a path would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, path: &ThreeCushionPath) -> Option<usize> {
        if !self.qualifies(path) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| path.success_rate > e.success_rate);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Offer a path to the ranking
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn insert(&mut self, path: ThreeCushionPath) -> Option<usize> {
        let rank = self.potential_rank(&path)?;
        self.entries.insert(rank - 1, path);
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best success rate so far (if any)
    pub fn top_success_rate(&self) -> Option<f64> {
        self.entries.first().map(|e| e.success_rate)
    }

    pub fn paths(&self) -> &[ThreeCushionPath] {
        &self.entries
    }

    pub fn into_paths(self) -> Vec<ThreeCushionPath> {
        self.entries
    }
}
