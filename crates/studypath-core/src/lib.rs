//! # studypath-core
//!
//! Core domain model and traits for the studypath schedule planner.
//!
//! This crate provides:
//! - Domain types: `Chapter`, `Tier`, `PaceTable`, `StudyTask`, `SchedulePlan`
//! - Core traits: `Planner`, `Renderer`
//! - Planner configuration, assessment grading, outline derivation and
//!   progress tracking
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use studypath_core::{Chapter, ScheduleRequest, Tier};
//!
//! let request = ScheduleRequest::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 21).unwrap(),
//! )
//! .tier(Tier::Intermediate)
//! .chapter(Chapter::new("Ch1", 1, 30))
//! .chapter(Chapter::new("Ch2", 31, 50));
//!
//! assert_eq!(request.total_pages(), 50);
//! assert_eq!(request.duration_days(), 21);
//! ```

pub mod assessment;
pub mod config;
pub mod outline;
pub mod progress;

pub use assessment::{grade_assessment, AnswerKey, AssessmentGrade};
pub use config::PlannerConfig;
pub use outline::{chapters_from_outline, fixed_sections, outline_or_sections, OutlineEntry};
pub use progress::{PhaseSummary, PlanStatus, ProgressUpdate, StatusIndicator, UpcomingTest};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Week number within a plan (1-based)
pub type Week = u32;

/// Granularity used when the caller does not supply one
pub const DEFAULT_GRANULARITY: &str = "weekly";

// ============================================================================
// Tier & Pace
// ============================================================================

/// Skill tier driving reading-speed assumptions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Tier {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    /// All tiers, slowest first
    pub const ALL: [Tier; 3] = [Tier::Beginner, Tier::Intermediate, Tier::Advanced];

    /// Parse a tier label (case-insensitive). Returns `None` for unknown labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Tier::Beginner),
            "intermediate" => Some(Tier::Intermediate),
            "advanced" => Some(Tier::Advanced),
            _ => None,
        }
    }

    /// Parse a tier label, falling back to `Beginner` for anything unknown
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Beginner => "Beginner",
            Tier::Intermediate => "Intermediate",
            Tier::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for Tier {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Sustainable reading pace for a tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pace {
    /// Pages a reader of this tier can sustain per day
    pub pages_per_day: u32,
    /// Minutes spent per page
    pub minutes_per_page: u32,
}

impl Pace {
    pub const fn new(pages_per_day: u32, minutes_per_page: u32) -> Self {
        Self {
            pages_per_day,
            minutes_per_page,
        }
    }

    /// Page budget for a full calendar week
    pub fn pages_per_week(&self) -> u64 {
        u64::from(self.pages_per_day) * 7
    }
}

/// Tier → pace mapping. One entry per tier, no open-ended registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaceTable {
    pub beginner: Pace,
    pub intermediate: Pace,
    pub advanced: Pace,
}

impl PaceTable {
    /// Standard reading paces
    pub const STANDARD: PaceTable = PaceTable {
        beginner: Pace::new(12, 6),
        intermediate: Pace::new(20, 5),
        advanced: Pace::new(28, 4),
    };

    /// Look up the pace for a tier
    pub fn get(&self, tier: Tier) -> Pace {
        match tier {
            Tier::Beginner => self.beginner,
            Tier::Intermediate => self.intermediate,
            Tier::Advanced => self.advanced,
        }
    }

    /// Look up the pace for a raw tier label. Unknown labels get the beginner pace.
    pub fn for_label(&self, label: &str) -> Pace {
        Tier::parse(label).map_or(self.beginner, |tier| self.get(tier))
    }

    /// Entries in tier order
    pub fn entries(&self) -> [(Tier, Pace); 3] {
        Tier::ALL.map(|tier| (tier, self.get(tier)))
    }
}

impl Default for PaceTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ============================================================================
// Chapter
// ============================================================================

/// A contiguous page range of the source document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title
    pub title: String,
    /// First page (1-based, inclusive)
    pub page_start: u32,
    /// Last page (inclusive)
    pub page_end: u32,
}

impl Chapter {
    pub fn new(title: impl Into<String>, page_start: u32, page_end: u32) -> Self {
        Self {
            title: title.into(),
            page_start,
            page_end,
        }
    }

    /// Number of pages in the chapter. Inverted ranges count as a single page;
    /// a range wider than `u32::MAX` pages saturates.
    pub fn page_count(&self) -> u32 {
        let count = i64::from(self.page_end) - i64::from(self.page_start) + 1;
        u32::try_from(count.max(1)).unwrap_or(u32::MAX)
    }

    /// Estimated reading time at the given pace
    pub fn estimated_minutes(&self, pace: Pace) -> u64 {
        u64::from(self.page_count()) * u64::from(pace.minutes_per_page)
    }
}

/// Chapter assigned to a learning week, with its reading estimate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledChapter {
    #[serde(flatten)]
    pub chapter: Chapter,
    /// page_count × minutes_per_page
    pub estimated_minutes: u64,
}

impl ScheduledChapter {
    pub fn new(chapter: Chapter, pace: Pace) -> Self {
        let estimated_minutes = chapter.estimated_minutes(pace);
        Self {
            chapter,
            estimated_minutes,
        }
    }

    pub fn title(&self) -> &str {
        &self.chapter.title
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// Kind of weekly task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// New chapters to study
    Learning,
    /// Cumulative review of chapters already studied
    Testing,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::Learning => f.pad("Learning"),
            TaskType::Testing => f.pad("Testing"),
        }
    }
}

/// Task status for progress tracking
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => f.pad("Pending"),
            TaskStatus::InProgress => f.pad("In Progress"),
            TaskStatus::Completed => f.pad("Completed"),
        }
    }
}

/// One week of the plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyTask {
    /// Week number (1-based, contiguous across the plan)
    pub week: Week,
    pub task_type: TaskType,
    /// Chapter titles, in reading order
    pub assigned_chapters: Vec<String>,
    /// Per-chapter estimates (learning weeks only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapter_payload: Vec<ScheduledChapter>,
    /// End of the week, never after the deadline
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    /// Reading time reported by the reader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flagged_difficult: bool,
}

impl StudyTask {
    /// Create a learning task from the chapters packed into a week
    pub fn learning(week: Week, chapters: Vec<ScheduledChapter>, due_date: NaiveDate) -> Self {
        Self {
            week,
            task_type: TaskType::Learning,
            assigned_chapters: chapters.iter().map(|c| c.title().to_string()).collect(),
            chapter_payload: chapters,
            due_date,
            status: TaskStatus::Pending,
            completion_date: None,
            time_spent_minutes: None,
            notes: None,
            flagged_difficult: false,
        }
    }

    /// Create a testing task reviewing the given chapter titles
    pub fn testing(week: Week, review: Vec<String>, due_date: NaiveDate) -> Self {
        Self {
            week,
            task_type: TaskType::Testing,
            assigned_chapters: review,
            chapter_payload: Vec::new(),
            due_date,
            status: TaskStatus::Pending,
            completion_date: None,
            time_spent_minutes: None,
            notes: None,
            flagged_difficult: false,
        }
    }

    pub fn is_learning(&self) -> bool {
        self.task_type == TaskType::Learning
    }

    pub fn is_testing(&self) -> bool {
        self.task_type == TaskType::Testing
    }

    /// Pages assigned to this week (zero for testing weeks)
    pub fn pages(&self) -> u64 {
        self.chapter_payload
            .iter()
            .map(|c| u64::from(c.chapter.page_count()))
            .sum()
    }

    /// Total estimated reading time for this week
    pub fn estimated_minutes(&self) -> u64 {
        self.chapter_payload.iter().map(|c| c.estimated_minutes).sum()
    }
}

// ============================================================================
// Request & Plan
// ============================================================================

/// Inputs to the schedule builder
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Chapters in reading order
    pub chapters: Vec<Chapter>,
    pub start_date: NaiveDate,
    pub deadline_date: NaiveDate,
    pub tier: Tier,
    /// Passed through to the plan untouched
    pub granularity: String,
}

impl ScheduleRequest {
    pub fn new(start_date: NaiveDate, deadline_date: NaiveDate) -> Self {
        Self {
            chapters: Vec::new(),
            start_date,
            deadline_date,
            tier: Tier::default(),
            granularity: DEFAULT_GRANULARITY.to_string(),
        }
    }

    /// Set the skill tier
    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    /// Set the granularity label
    pub fn granularity(mut self, granularity: impl Into<String>) -> Self {
        self.granularity = granularity.into();
        self
    }

    /// Append a chapter
    pub fn chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }

    /// Replace the chapter list
    pub fn chapters(mut self, chapters: impl IntoIterator<Item = Chapter>) -> Self {
        self.chapters = chapters.into_iter().collect();
        self
    }

    /// Sum of page counts across all chapters
    pub fn total_pages(&self) -> u64 {
        self.chapters.iter().map(|c| u64::from(c.page_count())).sum()
    }

    /// Inclusive day span between start and deadline
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.deadline_date)
    }
}

/// A complete weekly study plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
    pub start_date: NaiveDate,
    pub deadline_date: NaiveDate,
    pub tier: Tier,
    pub total_pages: u64,
    pub duration_days: i64,
    /// Learning weeks actually used (at least 1)
    pub learning_weeks: u32,
    pub testing_weeks: u32,
    pub total_weeks: u32,
    /// Learning tasks followed by testing tasks
    pub tasks: Vec<StudyTask>,
    /// Feasibility alerts for the whole plan
    pub alerts: Vec<String>,
    pub granularity: String,
}

impl SchedulePlan {
    pub fn is_feasible(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn learning_tasks(&self) -> impl Iterator<Item = &StudyTask> {
        self.tasks.iter().filter(|t| t.is_learning())
    }

    pub fn testing_tasks(&self) -> impl Iterator<Item = &StudyTask> {
        self.tasks.iter().filter(|t| t.is_testing())
    }

    /// Titles of all chapters introduced in learning weeks, in week order
    pub fn learned_titles(&self) -> Vec<String> {
        self.learning_tasks()
            .flat_map(|t| t.assigned_chapters.iter().cloned())
            .collect()
    }

    /// Get a task by week number
    pub fn task(&self, week: Week) -> Option<&StudyTask> {
        self.tasks.iter().find(|t| t.week == week)
    }

    pub fn task_mut(&mut self, week: Week) -> Option<&mut StudyTask> {
        self.tasks.iter_mut().find(|t| t.week == week)
    }

    /// Last due date across all tasks
    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.tasks.iter().map(|t| t.due_date).max()
    }
}

/// Result of a feasibility check
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub feasible: bool,
    pub alerts: Vec<String>,
}

impl FeasibilityResult {
    pub fn feasible() -> Self {
        Self {
            feasible: true,
            alerts: Vec::new(),
        }
    }

    pub fn infeasible(alert: impl Into<String>) -> Self {
        Self {
            feasible: false,
            alerts: vec![alert.into()],
        }
    }
}

// ============================================================================
// Date helpers
// ============================================================================

/// Inclusive day span: `(deadline - start) + 1`. Zero or negative when the
/// deadline precedes the start.
pub fn duration_days(start: NaiveDate, deadline: NaiveDate) -> i64 {
    (deadline - start).num_days() + 1
}

/// Last day of the given plan week, clamped to the deadline
pub fn week_due_date(start: NaiveDate, week: Week, deadline: NaiveDate) -> NaiveDate {
    let offset = u64::from(week.saturating_sub(1)) * 7 + 6;
    start
        .checked_add_days(Days::new(offset))
        .map_or(deadline, |end| end.min(deadline))
}

/// First day of the given plan week. Not clamped: for a deadline that falls
/// inside the week this may be the only day before it.
pub fn week_start_date(start: NaiveDate, week: Week) -> NaiveDate {
    let offset = u64::from(week.saturating_sub(1)) * 7;
    start.checked_add_days(Days::new(offset)).unwrap_or(start)
}

// ============================================================================
// Traits
// ============================================================================

/// Core planning abstraction
pub trait Planner: Send + Sync {
    /// Check whether a page count fits the tier's pace over the given duration
    fn evaluate(&self, total_pages: u64, tier: Tier, duration_days: i64) -> FeasibilityResult;

    /// Build a complete weekly plan
    fn build(&self, request: &ScheduleRequest) -> SchedulePlan;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a plan to the output format
    fn render(&self, plan: &SchedulePlan) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid planner configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within {range}, got {value}")]
    RatioOutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("review window growth must be at least 1")]
    ZeroReviewGrowth,

    #[error("pace for {0} must have non-zero pages per day and minutes per page")]
    ZeroPace(Tier),
}

/// Progress update rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Week not found in plan: {0}")]
    WeekNotFound(Week),

    #[error("Completion date {date} for week {week} is before the plan start {start}")]
    CompletionBeforeStart {
        week: Week,
        date: NaiveDate,
        start: NaiveDate,
    },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<std::fmt::Error> for RenderError {
    fn from(err: std::fmt::Error) -> Self {
        RenderError::Format(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
