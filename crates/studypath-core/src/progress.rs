//! Plan progress tracking
//!
//! The planner always emits tasks as `Pending`. Callers record progress with
//! [`ProgressUpdate`] and ask "how am I doing right now?" with
//! [`PlanStatus::from_plan`].
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use studypath_core::progress::{PlanStatus, StatusIndicator};
//!
//! let status = PlanStatus {
//!     status_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
//!     final_due_date: NaiveDate::from_ymd_opt(2024, 1, 21).unwrap(),
//!     total_tasks: 3,
//!     completed_tasks: 1,
//!     in_progress_tasks: 0,
//!     pending_tasks: 2,
//!     overdue_tasks: 0,
//!     percent_complete: 33,
//!     days_remaining: 11,
//!     upcoming_test: None,
//! };
//!
//! assert_eq!(status.status_indicator(), StatusIndicator::OnTrack);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ProgressError, SchedulePlan, StudyTask, TaskStatus, TaskType, Week};

// ============================================================================
// Updates
// ============================================================================

/// Progress reported by the reader for one week
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub status: TaskStatus,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub time_spent_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub flagged_difficult: bool,
}

impl ProgressUpdate {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            completion_date: None,
            time_spent_minutes: None,
            notes: None,
            flagged_difficult: false,
        }
    }

    /// Mark the week completed on the given date
    pub fn completed_on(date: NaiveDate) -> Self {
        Self::new(TaskStatus::Completed).completion_date(date)
    }

    pub fn completion_date(mut self, date: NaiveDate) -> Self {
        self.completion_date = Some(date);
        self
    }

    pub fn time_spent(mut self, minutes: u32) -> Self {
        self.time_spent_minutes = Some(minutes);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn flag_difficult(mut self) -> Self {
        self.flagged_difficult = true;
        self
    }
}

impl SchedulePlan {
    /// Record progress for a week.
    ///
    /// Reopening a week clears its completion date. Time spent and notes
    /// are only replaced when the update carries them.
    pub fn apply_progress(
        &mut self,
        week: Week,
        update: &ProgressUpdate,
    ) -> Result<&StudyTask, ProgressError> {
        let start = self.start_date;
        if let Some(date) = update.completion_date {
            if date < start {
                return Err(ProgressError::CompletionBeforeStart { week, date, start });
            }
        }

        let task = self.task_mut(week).ok_or(ProgressError::WeekNotFound(week))?;
        task.status = update.status;
        task.completion_date = match update.status {
            TaskStatus::Completed => update.completion_date.or(task.completion_date),
            TaskStatus::Pending | TaskStatus::InProgress => None,
        };
        if update.time_spent_minutes.is_some() {
            task.time_spent_minutes = update.time_spent_minutes;
        }
        if update.notes.is_some() {
            task.notes.clone_from(&update.notes);
        }
        task.flagged_difficult = update.flagged_difficult;

        Ok(task)
    }
}

// ============================================================================
// Phase summary
// ============================================================================

/// Phase week counts recomputed from a stored task list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub learning_weeks: u32,
    pub testing_weeks: u32,
    pub total_weeks: u32,
}

impl PhaseSummary {
    pub fn from_tasks(tasks: &[StudyTask]) -> Self {
        let learning_weeks = tasks.iter().filter(|t| t.is_learning()).count() as u32;
        let testing_weeks = tasks.iter().filter(|t| t.is_testing()).count() as u32;
        Self {
            learning_weeks,
            testing_weeks,
            total_weeks: learning_weeks + testing_weeks,
        }
    }
}

// ============================================================================
// Status
// ============================================================================

/// Status classification for the plan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusIndicator {
    /// Nothing overdue
    OnTrack,
    /// One week overdue
    AtRisk,
    /// More than one week overdue
    Behind,
}

impl StatusIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusIndicator::OnTrack => "On Track",
            StatusIndicator::AtRisk => "At Risk",
            StatusIndicator::Behind => "Behind",
        }
    }
}

impl std::fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next open testing week
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingTest {
    pub week: Week,
    pub due_date: NaiveDate,
    /// Chapters to revise before the test
    pub recommended_review: Vec<String>,
}

/// Aggregated progress for a plan as of a given date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStatus {
    /// As-of date
    pub status_date: NaiveDate,

    /// Latest due date in the plan
    pub final_due_date: NaiveDate,

    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub pending_tasks: usize,

    /// Open tasks whose due date is before the status date
    pub overdue_tasks: usize,

    /// Completed share of all tasks (0-100)
    pub percent_complete: u8,

    /// Days from the status date to the final due date
    pub days_remaining: i64,

    pub upcoming_test: Option<UpcomingTest>,
}

impl PlanStatus {
    pub fn from_plan(plan: &SchedulePlan, status_date: NaiveDate) -> Self {
        let mut completed_tasks = 0usize;
        let mut in_progress_tasks = 0usize;
        let mut pending_tasks = 0usize;
        let mut overdue_tasks = 0usize;

        for task in &plan.tasks {
            match task.status {
                TaskStatus::Completed => completed_tasks += 1,
                TaskStatus::InProgress => in_progress_tasks += 1,
                TaskStatus::Pending => pending_tasks += 1,
            }
            if task.status.is_open() && task.due_date < status_date {
                overdue_tasks += 1;
            }
        }

        let total_tasks = plan.tasks.len();
        let percent_complete = if total_tasks == 0 {
            0
        } else {
            (completed_tasks * 100 / total_tasks) as u8
        };

        let final_due_date = plan.final_due_date().unwrap_or(plan.deadline_date);

        let upcoming_test = plan
            .tasks
            .iter()
            .find(|t| t.task_type == TaskType::Testing && t.status.is_open())
            .map(|t| UpcomingTest {
                week: t.week,
                due_date: t.due_date,
                recommended_review: t.assigned_chapters.clone(),
            });

        Self {
            status_date,
            final_due_date,
            total_tasks,
            completed_tasks,
            in_progress_tasks,
            pending_tasks,
            overdue_tasks,
            percent_complete,
            days_remaining: (final_due_date - status_date).num_days(),
            upcoming_test,
        }
    }

    /// - On Track: nothing overdue
    /// - At Risk: exactly one overdue week
    /// - Behind: more than one
    pub fn status_indicator(&self) -> StatusIndicator {
        match self.overdue_tasks {
            0 => StatusIndicator::OnTrack,
            1 => StatusIndicator::AtRisk,
            _ => StatusIndicator::Behind,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.total_tasks > 0 && self.completed_tasks == self.total_tasks
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Chapter, PaceTable, ScheduledChapter, Tier};
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn create_test_plan() -> SchedulePlan {
        let pace = PaceTable::STANDARD.intermediate;
        let tasks = vec![
            StudyTask::learning(
                1,
                vec![
                    ScheduledChapter::new(Chapter::new("Ch1", 1, 30), pace),
                    ScheduledChapter::new(Chapter::new("Ch2", 31, 50), pace),
                ],
                date(2024, 1, 7),
            ),
            StudyTask::testing(2, vec!["Ch1".into()], date(2024, 1, 14)),
            StudyTask::testing(3, vec!["Ch1".into(), "Ch2".into()], date(2024, 1, 21)),
        ];

        SchedulePlan {
            start_date: date(2024, 1, 1),
            deadline_date: date(2024, 1, 21),
            tier: Tier::Intermediate,
            total_pages: 50,
            duration_days: 21,
            learning_weeks: 1,
            testing_weeks: 2,
            total_weeks: 3,
            tasks,
            alerts: Vec::new(),
            granularity: "weekly".into(),
        }
    }

    #[test]
    fn fresh_plan_status() {
        let plan = create_test_plan();
        let status = PlanStatus::from_plan(&plan, date(2024, 1, 3));

        assert_eq!(status.total_tasks, 3);
        assert_eq!(status.pending_tasks, 3);
        assert_eq!(status.completed_tasks, 0);
        assert_eq!(status.overdue_tasks, 0);
        assert_eq!(status.percent_complete, 0);
        assert_eq!(status.days_remaining, 18);
        assert_eq!(status.status_indicator(), StatusIndicator::OnTrack);
        assert_eq!(
            status.upcoming_test,
            Some(UpcomingTest {
                week: 2,
                due_date: date(2024, 1, 14),
                recommended_review: vec!["Ch1".into()],
            })
        );
    }

    #[test]
    fn overdue_weeks_drive_indicator() {
        let plan = create_test_plan();
        assert_eq!(
            PlanStatus::from_plan(&plan, date(2024, 1, 8)).status_indicator(),
            StatusIndicator::AtRisk
        );
        assert_eq!(
            PlanStatus::from_plan(&plan, date(2024, 1, 16)).status_indicator(),
            StatusIndicator::Behind
        );
    }

    #[test]
    fn completed_weeks_are_never_overdue() {
        let mut plan = create_test_plan();
        plan.apply_progress(1, &ProgressUpdate::completed_on(date(2024, 1, 6)))
            .unwrap();

        let status = PlanStatus::from_plan(&plan, date(2024, 1, 9));
        assert_eq!(status.completed_tasks, 1);
        assert_eq!(status.overdue_tasks, 0);
        assert_eq!(status.percent_complete, 33);
    }

    #[test]
    fn upcoming_test_skips_completed_tests() {
        let mut plan = create_test_plan();
        plan.apply_progress(2, &ProgressUpdate::completed_on(date(2024, 1, 13)))
            .unwrap();

        let status = PlanStatus::from_plan(&plan, date(2024, 1, 13));
        let upcoming = status.upcoming_test.unwrap();
        assert_eq!(upcoming.week, 3);
        assert_eq!(upcoming.recommended_review, vec!["Ch1", "Ch2"]);
    }

    #[test]
    fn all_completed_is_finished() {
        let mut plan = create_test_plan();
        for week in 1..=3 {
            plan.apply_progress(week, &ProgressUpdate::completed_on(date(2024, 1, 20)))
                .unwrap();
        }

        let status = PlanStatus::from_plan(&plan, date(2024, 1, 21));
        assert!(status.is_finished());
        assert_eq!(status.percent_complete, 100);
        assert_eq!(status.upcoming_test, None);
    }

    #[test]
    fn apply_progress_unknown_week() {
        let mut plan = create_test_plan();
        let err = plan
            .apply_progress(9, &ProgressUpdate::new(TaskStatus::InProgress))
            .unwrap_err();
        assert_eq!(err, ProgressError::WeekNotFound(9));
    }

    #[test]
    fn apply_progress_rejects_completion_before_start() {
        let mut plan = create_test_plan();
        let err = plan
            .apply_progress(1, &ProgressUpdate::completed_on(date(2023, 12, 31)))
            .unwrap_err();
        assert!(matches!(err, ProgressError::CompletionBeforeStart { week: 1, .. }));
        assert_eq!(plan.tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn reopening_clears_completion_date() {
        let mut plan = create_test_plan();
        plan.apply_progress(1, &ProgressUpdate::completed_on(date(2024, 1, 5)))
            .unwrap();
        let task = plan
            .apply_progress(1, &ProgressUpdate::new(TaskStatus::InProgress).notes("re-reading"))
            .unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.completion_date, None);
        assert_eq!(task.notes.as_deref(), Some("re-reading"));
    }

    #[test]
    fn apply_progress_keeps_earlier_details() {
        let mut plan = create_test_plan();
        plan.apply_progress(
            2,
            &ProgressUpdate::new(TaskStatus::InProgress)
                .time_spent(90)
                .flag_difficult(),
        )
        .unwrap();
        let task = plan
            .apply_progress(2, &ProgressUpdate::completed_on(date(2024, 1, 12)))
            .unwrap();

        assert_eq!(task.time_spent_minutes, Some(90));
        assert_eq!(task.completion_date, Some(date(2024, 1, 12)));
        assert!(!task.flagged_difficult);
    }

    #[test]
    fn phase_summary_recounts_tasks() {
        let plan = create_test_plan();
        assert_eq!(
            PhaseSummary::from_tasks(&plan.tasks),
            PhaseSummary {
                learning_weeks: 1,
                testing_weeks: 2,
                total_weeks: 3,
            }
        );
    }

    #[test]
    fn progress_update_deserializes_with_defaults() {
        let update: ProgressUpdate =
            serde_json::from_str(r#"{"status": "InProgress", "time_spent_minutes": 45}"#).unwrap();
        assert_eq!(update, ProgressUpdate::new(TaskStatus::InProgress).time_spent(45));
    }
}
