//! Planner configuration
//!
//! Every tunable the planner reads lives in [`PlannerConfig`], which is handed
//! to the planner explicitly. Nothing is read from process-wide state here;
//! loading from files or the environment is the caller's job.
//!
//! ```toml
//! learning_phase_ratio = 0.7
//! testing_phase_ratio = 0.3
//! review_window_growth = 2
//!
//! [pace.beginner]
//! pages_per_day = 12
//! minutes_per_page = 6
//! ```

use serde::{Deserialize, Serialize};

use crate::{ConfigError, PaceTable, Tier};

/// Share of the calendar weeks targeted for learning
pub const DEFAULT_LEARNING_PHASE_RATIO: f64 = 0.7;

/// Share of the calendar weeks nominally reserved for testing
pub const DEFAULT_TESTING_PHASE_RATIO: f64 = 0.3;

/// Extra chapter titles added to each successive testing window
pub const DEFAULT_REVIEW_WINDOW_GROWTH: usize = 2;

/// Tunables for the weekly planner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Fraction of total weeks targeted for the learning phase
    pub learning_phase_ratio: f64,
    /// Informational only. Testing weeks are whatever learning leaves over.
    pub testing_phase_ratio: f64,
    /// Growth of the testing review window per testing week
    pub review_window_growth: usize,
    /// Reading pace per tier
    pub pace: PaceTable,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            learning_phase_ratio: DEFAULT_LEARNING_PHASE_RATIO,
            testing_phase_ratio: DEFAULT_TESTING_PHASE_RATIO,
            review_window_growth: DEFAULT_REVIEW_WINDOW_GROWTH,
            pace: PaceTable::STANDARD,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the learning phase ratio
    pub fn learning_phase_ratio(mut self, ratio: f64) -> Self {
        self.learning_phase_ratio = ratio;
        self
    }

    /// Set the testing phase ratio
    pub fn testing_phase_ratio(mut self, ratio: f64) -> Self {
        self.testing_phase_ratio = ratio;
        self
    }

    /// Set the review window growth
    pub fn review_window_growth(mut self, growth: usize) -> Self {
        self.review_window_growth = growth;
        self
    }

    /// Replace the pace table
    pub fn pace(mut self, pace: PaceTable) -> Self {
        self.pace = pace;
        self
    }

    /// Check that every value is usable by the planner
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("learning_phase_ratio", self.learning_phase_ratio, false)?;
        // Not read by the builder; zero is allowed
        check_ratio("testing_phase_ratio", self.testing_phase_ratio, true)?;

        if self.review_window_growth == 0 {
            return Err(ConfigError::ZeroReviewGrowth);
        }

        for (tier, pace) in self.pace.entries() {
            if pace.pages_per_day == 0 || pace.minutes_per_page == 0 {
                return Err(ConfigError::ZeroPace(tier));
            }
        }

        Ok(())
    }

    /// Pace for a tier under this configuration
    pub fn pace_for(&self, tier: Tier) -> crate::Pace {
        self.pace.get(tier)
    }
}

fn check_ratio(name: &'static str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    // NaN fails every comparison
    let above_floor = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if above_floor && value <= 1.0 {
        Ok(())
    } else {
        let range = if allow_zero { "[0, 1]" } else { "(0, 1]" };
        Err(ConfigError::RatioOutOfRange { name, range, value })
    }
}
