//! # studypath-solver
//!
//! Weekly study planner.
//!
//! This crate provides:
//! - Feasibility evaluation of a deadline against a tier's reading pace
//! - Learning/testing phase split of the calendar weeks
//! - Greedy, order-preserving chapter packing into learning weeks
//! - Cumulative review windows for testing weeks
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use studypath_core::{Chapter, Planner, ScheduleRequest, Tier};
//! use studypath_solver::WeeklyPlanner;
//!
//! let request = ScheduleRequest::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 21).unwrap(),
//! )
//! .tier(Tier::Intermediate)
//! .chapter(Chapter::new("Ch1", 1, 30))
//! .chapter(Chapter::new("Ch2", 31, 50));
//!
//! let plan = WeeklyPlanner::new().build(&request);
//! assert_eq!(plan.learning_weeks, 2);
//! assert_eq!(plan.testing_weeks, 1);
//! assert_eq!(plan.learned_titles(), vec!["Ch1", "Ch2"]);
//! ```

pub mod feasibility;
pub mod packing;
pub mod review;

use chrono::NaiveDate;
use studypath_core::{
    Chapter, ConfigError, FeasibilityResult, Planner, PlannerConfig, ScheduleRequest,
    SchedulePlan, StudyTask, Tier,
};
use tracing::{debug, warn};

use crate::packing::PlanWindow;

/// Calendar weeks spanned by a duration. Never less than one.
pub fn total_weeks_target(duration_days: i64) -> u32 {
    // Ceiling division that also rounds non-positive spans up to zero
    let weeks = if duration_days > 0 {
        (duration_days + 6) / 7
    } else {
        0
    };
    u32::try_from(weeks).unwrap_or(u32::MAX).max(1)
}

/// Learning weeks targeted out of `total_weeks`. Never less than one.
pub fn learning_weeks_target(total_weeks: u32, learning_phase_ratio: f64) -> u32 {
    let target = (f64::from(total_weeks) * learning_phase_ratio).ceil();
    // `as` saturates and maps NaN to 0
    (target as u32).max(1)
}

/// Planner producing weekly learning and testing tasks
#[derive(Clone, Debug, Default)]
pub struct WeeklyPlanner {
    config: PlannerConfig,
}

impl WeeklyPlanner {
    /// Planner with the standard configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Planner with a custom configuration. The configuration is not checked.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Planner with a validated configuration
    pub fn try_with_config(config: PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

impl Planner for WeeklyPlanner {
    fn evaluate(&self, total_pages: u64, tier: Tier, duration_days: i64) -> FeasibilityResult {
        feasibility::evaluate(&self.config.pace, total_pages, tier, duration_days)
    }

    fn build(&self, request: &ScheduleRequest) -> SchedulePlan {
        let total_pages = request.total_pages();
        let duration_days = request.duration_days();
        let total_weeks = total_weeks_target(duration_days);
        let learning_target = learning_weeks_target(total_weeks, self.config.learning_phase_ratio);
        let pace = self.config.pace_for(request.tier);

        debug!(
            total_pages,
            duration_days,
            total_weeks,
            learning_target,
            tier = %request.tier,
            "planning schedule"
        );

        let window = PlanWindow {
            start: request.start_date,
            deadline: request.deadline_date,
        };

        let mut tasks = packing::pack_learning_weeks(&request.chapters, pace, learning_target, window);
        if tasks.is_empty() {
            // No chapters: keep week 1 as an empty learning week so week numbers stay contiguous
            tasks.push(StudyTask::learning(1, Vec::new(), window.due_date(1)));
        }

        let learning_weeks = tasks.len() as u32;
        let testing_weeks = total_weeks.saturating_sub(learning_weeks);

        let learned: Vec<String> = tasks
            .iter()
            .flat_map(|t| t.assigned_chapters.iter().cloned())
            .collect();
        tasks.extend(review::testing_tasks(
            &learned,
            learning_weeks,
            testing_weeks,
            self.config.review_window_growth,
            window,
        ));

        let feasibility = self.evaluate(total_pages, request.tier, duration_days);
        if !feasibility.feasible {
            warn!(alerts = feasibility.alerts.len(), "schedule is not feasible");
        }

        SchedulePlan {
            start_date: request.start_date,
            deadline_date: request.deadline_date,
            tier: request.tier,
            total_pages,
            duration_days,
            learning_weeks,
            testing_weeks,
            total_weeks: learning_weeks + testing_weeks,
            tasks,
            alerts: feasibility.alerts,
            granularity: request.granularity.clone(),
        }
    }
}

/// Feasibility preview with the standard configuration
pub fn evaluate_feasibility(total_pages: u64, tier: Tier, duration_days: i64) -> FeasibilityResult {
    WeeklyPlanner::new().evaluate(total_pages, tier, duration_days)
}

/// Build a plan with the standard configuration
pub fn build_schedule(
    chapters: &[Chapter],
    start_date: NaiveDate,
    deadline_date: NaiveDate,
    tier: Tier,
    granularity: &str,
) -> SchedulePlan {
    let request = ScheduleRequest::new(start_date, deadline_date)
        .tier(tier)
        .granularity(granularity)
        .chapters(chapters.iter().cloned());
    WeeklyPlanner::new().build(&request)
}
