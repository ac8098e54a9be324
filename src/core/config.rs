//! Trading configuration.
//!
//! `TradeConfig` collects every tunable the engine reads: the protected
//! share of a holding's value, the controller's attempt ceiling, the
//! minimum holding breadth required before a player trades, the discount
//! applied to one-sided proposals and the calamity retention caps.
//!
//! The orchestrator normally builds it with `TradeConfig::default()` and
//! the `with_*` methods, or loads it from JSON.

use serde::{Deserialize, Serialize};

use super::error::{Result, TradeError};

/// Caps on how many revealed calamities a holder may keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalamityCaps {
    /// Maximum major calamities retained.
    pub major: usize,
    /// Maximum calamities retained overall (major + minor).
    pub total: usize,
}

impl Default for CalamityCaps {
    fn default() -> Self {
        Self { major: 2, total: 3 }
    }
}

/// Trading engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    /// Share of a holding's value a player refuses to trade away, in (0, 1].
    pub priority_threshold: f64,

    /// Ceiling on controller steps per trading round.
    pub max_attempts: usize,

    /// Both holdings need at least this many distinct non-full types
    /// before a proposal is considered.
    pub min_distinct_types: usize,

    /// Multiplier applied to the estimated value of proposals where the
    /// actor has nothing the counterpart prioritizes.
    pub one_sided_discount: f64,

    /// Calamity retention caps.
    pub calamity_caps: CalamityCaps,

    /// Seed for overflow discards and random draws.
    pub seed: u64,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            priority_threshold: 0.5,
            max_attempts: 1000,
            min_distinct_types: 3,
            one_sided_discount: 0.5,
            calamity_caps: CalamityCaps::default(),
            seed: 42,
        }
    }
}

impl TradeConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.priority_threshold > 0.0 && self.priority_threshold <= 1.0) {
            return Err(TradeError::InvalidThreshold(self.priority_threshold));
        }
        if self.max_attempts == 0 {
            return Err(TradeError::InvalidConfig("max_attempts must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.one_sided_discount) {
            return Err(TradeError::InvalidConfig(format!(
                "one_sided_discount must be in [0, 1], got {}",
                self.one_sided_discount
            )));
        }
        if self.calamity_caps.major > self.calamity_caps.total {
            return Err(TradeError::InvalidConfig(format!(
                "major calamity cap {} exceeds total cap {}",
                self.calamity_caps.major, self.calamity_caps.total
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_priority_threshold(mut self, threshold: f64) -> Self {
        self.priority_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_min_distinct_types(mut self, count: usize) -> Self {
        self.min_distinct_types = count;
        self
    }

    #[must_use]
    pub fn with_calamity_caps(mut self, major: usize, total: usize) -> Self {
        self.calamity_caps = CalamityCaps { major, total };
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
