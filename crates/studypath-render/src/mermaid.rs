//! MermaidJS Gantt chart renderer
//!
//! Generates text-based Gantt charts in MermaidJS format, suitable for
//! embedding in Markdown notes, GitHub, wikis, and other platforms.
//!
//! ## Example Output
//!
//! ```text
//! gantt
//!     title Study Plan
//!     dateFormat YYYY-MM-DD
//!
//!     section Learning
//!     Week 1 - Ch1 :w1, 2024-01-01, 7d
//!     Week 2 - Ch2 :w2, 2024-01-08, 7d
//!
//!     section Testing
//!     Week 3 - Ch1, Ch2 :crit, w3, 2024-01-15, 7d
//! ```

use chrono::NaiveDate;
use studypath_core::{
    week_start_date, RenderError, Renderer, SchedulePlan, StudyTask, TaskStatus, TaskType,
};

/// MermaidJS Gantt chart renderer
#[derive(Clone, Debug)]
pub struct MermaidRenderer {
    /// Chart title
    pub title: String,
    /// Whether to split the chart into Learning and Testing sections
    pub show_sections: bool,
    /// Whether to mark testing weeks with `crit`
    pub highlight_tests: bool,
    /// Whether to show task completion status
    pub show_completion: bool,
    /// Optional `axisFormat` directive (d3 time format)
    pub axis_format: Option<String>,
    /// Exclude weekends from duration calculation
    pub exclude_weekends: bool,
}

impl Default for MermaidRenderer {
    fn default() -> Self {
        Self {
            title: "Study Plan".into(),
            show_sections: true,
            highlight_tests: true,
            show_completion: true,
            axis_format: None,
            exclude_weekends: false,
        }
    }
}

impl MermaidRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Disable sections grouping
    pub fn no_sections(mut self) -> Self {
        self.show_sections = false;
        self
    }

    /// Disable testing week highlighting
    pub fn no_highlight(mut self) -> Self {
        self.highlight_tests = false;
        self
    }

    /// Disable completion status
    pub fn no_completion(mut self) -> Self {
        self.show_completion = false;
        self
    }

    /// Set the axis label format
    pub fn axis_format(mut self, format: impl Into<String>) -> Self {
        self.axis_format = Some(format.into());
        self
    }

    /// Exclude weekends (use excludes directive)
    pub fn exclude_weekends(mut self) -> Self {
        self.exclude_weekends = true;
        self
    }

    /// Sanitize a task name for Mermaid (escape special characters)
    fn sanitize_name(name: &str) -> String {
        // Colons end the name, `#` starts an entity
        name.replace(':', "-")
            .replace(';', "-")
            .replace('#', "")
            .replace('\n', " ")
            .replace('\r', "")
    }

    fn make_id(task: &StudyTask) -> String {
        format!("w{}", task.week)
    }

    /// First day of the bar and its length in days. Weeks clipped by the
    /// deadline are shorter; a deadline before the start yields one day.
    fn span(plan_start: NaiveDate, task: &StudyTask) -> (NaiveDate, i64) {
        let start = week_start_date(plan_start, task.week).min(task.due_date);
        let days = (task.due_date - start).num_days() + 1;
        (start, days.max(1))
    }

    fn get_modifiers(&self, task: &StudyTask) -> Vec<&'static str> {
        let mut mods = Vec::new();

        if self.highlight_tests && task.is_testing() {
            mods.push("crit");
        }

        if self.show_completion {
            match task.status {
                TaskStatus::Completed => mods.push("done"),
                TaskStatus::InProgress => mods.push("active"),
                TaskStatus::Pending => {}
            }
        }

        mods
    }

    fn format_task_line(&self, plan_start: NaiveDate, task: &StudyTask) -> String {
        let name = if task.assigned_chapters.is_empty() {
            format!("Week {}", task.week)
        } else {
            format!("Week {} - {}", task.week, task.assigned_chapters.join(", "))
        };
        let (start, days) = Self::span(plan_start, task);

        let mut parts: Vec<String> = self
            .get_modifiers(task)
            .into_iter()
            .map(str::to_string)
            .collect();
        parts.push(Self::make_id(task));
        parts.push(start.format("%Y-%m-%d").to_string());
        parts.push(format!("{}d", days));

        format!("{} :{}", Self::sanitize_name(&name), parts.join(", "))
    }
}

impl Renderer for MermaidRenderer {
    type Output = String;

    fn render(&self, plan: &SchedulePlan) -> Result<String, RenderError> {
        if plan.tasks.is_empty() {
            return Err(RenderError::InvalidData("No tasks to render".into()));
        }

        let mut output = String::new();

        output.push_str("gantt\n");
        output.push_str(&format!("    title {}\n", Self::sanitize_name(&self.title)));
        output.push_str("    dateFormat YYYY-MM-DD\n");
        if let Some(axis) = &self.axis_format {
            output.push_str(&format!("    axisFormat {}\n", axis));
        }
        if self.exclude_weekends {
            output.push_str("    excludes weekends\n");
        }
        output.push('\n');

        if self.show_sections {
            for (section, task_type) in [("Learning", TaskType::Learning), ("Testing", TaskType::Testing)] {
                let mut tasks = plan.tasks.iter().filter(|t| t.task_type == task_type).peekable();
                if tasks.peek().is_none() {
                    continue;
                }
                output.push_str(&format!("    section {}\n", section));
                for task in tasks {
                    output.push_str(&format!("    {}\n", self.format_task_line(plan.start_date, task)));
                }
                output.push('\n');
            }
        } else {
            for task in &plan.tasks {
                output.push_str(&format!("    {}\n", self.format_task_line(plan.start_date, task)));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use studypath_core::{Chapter, Pace, ScheduledChapter, Tier};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_plan() -> SchedulePlan {
        let pace = Pace::new(20, 5);
        SchedulePlan {
            start_date: date(2024, 1, 1),
            deadline_date: date(2024, 1, 18),
            tier: Tier::Intermediate,
            total_pages: 50,
            duration_days: 18,
            learning_weeks: 2,
            testing_weeks: 1,
            total_weeks: 3,
            tasks: vec![
                StudyTask::learning(
                    1,
                    vec![ScheduledChapter::new(Chapter::new("Ch1", 1, 30), pace)],
                    date(2024, 1, 7),
                ),
                StudyTask::learning(
                    2,
                    vec![ScheduledChapter::new(Chapter::new("Ch2", 31, 50), pace)],
                    date(2024, 1, 14),
                ),
                StudyTask::testing(3, vec!["Ch1".into(), "Ch2".into()], date(2024, 1, 18)),
            ],
            alerts: Vec::new(),
            granularity: "weekly".into(),
        }
    }

    #[test]
    fn mermaid_renderer_creation() {
        let renderer = MermaidRenderer::new();
        assert!(renderer.show_sections);
        assert!(renderer.highlight_tests);
        assert!(renderer.show_completion);
        assert_eq!(renderer.title, "Study Plan");
    }

    #[test]
    fn mermaid_renderer_with_options() {
        let renderer = MermaidRenderer::new()
            .title("Algorithms")
            .no_sections()
            .no_highlight()
            .no_completion()
            .axis_format("%b %d");
        assert!(!renderer.show_sections);
        assert!(!renderer.highlight_tests);
        assert!(!renderer.show_completion);
        assert_eq!(renderer.axis_format.as_deref(), Some("%b %d"));
    }

    #[test]
    fn mermaid_produces_valid_output() {
        let output = MermaidRenderer::new().render(&create_test_plan()).unwrap();
        let expected = "\
gantt
    title Study Plan
    dateFormat YYYY-MM-DD

    section Learning
    Week 1 - Ch1 :w1, 2024-01-01, 7d
    Week 2 - Ch2 :w2, 2024-01-08, 7d

    section Testing
    Week 3 - Ch1, Ch2 :crit, w3, 2024-01-15, 4d

";
        assert_eq!(output, expected);
    }

    #[test]
    fn mermaid_clips_last_week_to_deadline() {
        let plan = create_test_plan();
        let (start, days) = MermaidRenderer::span(plan.start_date, &plan.tasks[2]);
        assert_eq!(start, date(2024, 1, 15));
        assert_eq!(days, 4);
    }

    #[test]
    fn mermaid_deadline_before_start_is_one_day() {
        let task = StudyTask::learning(1, Vec::new(), date(2023, 12, 25));
        let (start, days) = MermaidRenderer::span(date(2024, 1, 1), &task);
        assert_eq!(start, date(2023, 12, 25));
        assert_eq!(days, 1);
    }

    #[test]
    fn mermaid_empty_plan_fails() {
        let mut plan = create_test_plan();
        plan.tasks.clear();
        let result = MermaidRenderer::new().render(&plan);
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn mermaid_skips_empty_testing_section() {
        let mut plan = create_test_plan();
        plan.tasks.truncate(2);
        let output = MermaidRenderer::new().render(&plan).unwrap();
        assert!(output.contains("section Learning"));
        assert!(!output.contains("section Testing"));
    }

    #[test]
    fn mermaid_sanitizes_special_chars() {
        assert_eq!(MermaidRenderer::sanitize_name("Part 1: Basics"), "Part 1- Basics");
        assert_eq!(MermaidRenderer::sanitize_name("C# in depth"), "C in depth");
        assert_eq!(MermaidRenderer::sanitize_name("a;b\nc"), "a-b c");
    }

    #[test]
    fn mermaid_excludes_weekends() {
        let output = MermaidRenderer::new()
            .exclude_weekends()
            .render(&create_test_plan())
            .unwrap();
        assert!(output.contains("excludes weekends"));
    }

    #[test]
    fn mermaid_axis_format() {
        let output = MermaidRenderer::new()
            .axis_format("%b %d")
            .render(&create_test_plan())
            .unwrap();
        assert!(output.contains("    axisFormat %b %d\n"));
    }

    #[test]
    fn mermaid_no_sections_flat_list() {
        let output = MermaidRenderer::new().no_sections().render(&create_test_plan()).unwrap();
        assert!(!output.contains("section"));
        assert_eq!(output.lines().filter(|l| l.contains(":w")).count(), 3);
    }

    #[test]
    fn mermaid_done_and_active_modifiers() {
        let mut plan = create_test_plan();
        plan.tasks[0].status = TaskStatus::Completed;
        plan.tasks[1].status = TaskStatus::InProgress;
        let output = MermaidRenderer::new().render(&plan).unwrap();
        assert!(output.contains("Week 1 - Ch1 :done, w1,"));
        assert!(output.contains("Week 2 - Ch2 :active, w2,"));
    }

    #[test]
    fn mermaid_no_completion_hides_done_active() {
        let mut plan = create_test_plan();
        plan.tasks[0].status = TaskStatus::Completed;
        let output = MermaidRenderer::new()
            .no_completion()
            .no_highlight()
            .render(&plan)
            .unwrap();
        assert!(!output.contains("done"));
        assert!(!output.contains("crit"));
    }

    #[test]
    fn mermaid_empty_week_has_plain_name() {
        let mut plan = create_test_plan();
        plan.tasks = vec![StudyTask::learning(1, Vec::new(), date(2024, 1, 7))];
        let output = MermaidRenderer::new().render(&plan).unwrap();
        assert!(output.contains("    Week 1 :w1, 2024-01-01, 7d\n"));
    }
}
