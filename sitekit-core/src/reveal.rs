use crate::error::ConfigError;
use std::collections::HashSet;
use std::hash::Hash;

/// Share of an element's area that must be on screen before it reveals.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.12;

/// Class added to revealed elements.
pub const VISIBLE_CLASS: &str = "visible";

/// Marker class for elements that take part in reveal animations.
pub const REVEAL_CLASS: &str = "reveal";

// Observers report ratios just under the threshold they fired for.
const RATIO_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealRule {
    threshold: f64,
}

impl Default for RevealRule {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

impl RevealRule {
    /// # Errors
    ///
    /// Returns an error unless `threshold` lies in `(0, 1]`.
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        if threshold > 0.0 && threshold <= 1.0 {
            Ok(Self { threshold })
        } else {
            Err(ConfigError::Invalid {
                field: "reveal.threshold",
                reason: format!("must be within (0, 1], got {threshold}"),
            })
        }
    }

    #[must_use]
    pub const fn threshold(self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn should_reveal(self, is_intersecting: bool, ratio: f64) -> bool {
        is_intersecting && ratio + RATIO_TOLERANCE >= self.threshold
    }
}

/// Set-once visibility flags keyed by element identity.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
    rule: RevealRule,
    revealed: HashSet<K>,
}

impl<K: Eq + Hash> RevealTracker<K> {
    #[must_use]
    pub fn new(rule: RevealRule) -> Self {
        Self {
            rule,
            revealed: HashSet::new(),
        }
    }

    /// Feed one intersection report; true only the first time `key` reveals.
    pub fn record(&mut self, key: K, is_intersecting: bool, ratio: f64) -> bool {
        if !self.rule.should_reveal(is_intersecting, ratio) {
            return false;
        }
        self.revealed.insert(key)
    }

    #[must_use]
    pub fn is_revealed(&self, key: &K) -> bool {
        self.revealed.contains(key)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub const fn rule(&self) -> RevealRule {
        self.rule
    }
}
