//! # studypath-render
//!
//! Rendering backends for studypath plans.
//!
//! This crate provides:
//! - Plain text output for the console
//! - SVG week chart rendering
//! - MermaidJS Gantt chart rendering (for Markdown/docs)
//! - JSON output for persisting a plan
//!
//! ## Example
//!
//! ```rust,ignore
//! use studypath_core::Renderer;
//! use studypath_render::{MermaidRenderer, SvgRenderer, TextRenderer};
//!
//! // Console summary
//! let text = TextRenderer::new().render(&plan)?;
//!
//! // Pure SVG output
//! let svg = SvgRenderer::default().render(&plan)?;
//!
//! // MermaidJS for Markdown/documentation
//! let mermaid = MermaidRenderer::new().title("Algorithms").render(&plan)?;
//! ```

pub mod mermaid;

pub use mermaid::MermaidRenderer;

use std::fmt::Write as _;

use chrono::{Days, NaiveDate};
use studypath_core::{week_start_date, RenderError, Renderer, SchedulePlan, StudyTask, TaskStatus};
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

/// SVG week chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Width of the chart area (excluding labels) in pixels
    pub chart_width: u32,
    /// Height per week row in pixels
    pub row_height: u32,
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Color for learning weeks
    pub learning_color: String,
    /// Color for testing weeks
    pub testing_color: String,
    /// Color for completed weeks
    pub completed_color: String,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Chart title
    pub title: String,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            chart_width: 800,
            row_height: 28,
            label_width: 220,
            header_height: 50,
            padding: 20,
            learning_color: "#3498db".into(),
            testing_color: "#e67e22".into(),
            completed_color: "#27ae60".into(),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
            title: "Study Plan".into(),
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure chart width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Configure row height
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Configure chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn total_width(&self) -> u32 {
        self.padding * 2 + self.label_width + self.chart_width
    }

    fn total_height(&self, row_count: usize) -> u32 {
        self.padding * 2 + self.header_height + (row_count as u32 * self.row_height)
    }

    fn pixels_per_day(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = ((end - start).num_days() + 1).max(1) as f64;
        self.chart_width as f64 / days
    }

    fn date_to_x(&self, date: NaiveDate, plan_start: NaiveDate, px_per_day: f64) -> f64 {
        let days = (date - plan_start).num_days() as f64;
        self.padding as f64 + self.label_width as f64 + (days * px_per_day)
    }

    fn bar_color(&self, task: &StudyTask) -> &str {
        if task.status == TaskStatus::Completed {
            self.completed_color.as_str()
        } else if task.is_testing() {
            self.testing_color.as_str()
        } else {
            self.learning_color.as_str()
        }
    }

    /// Header with week-start labels
    fn render_header(&self, plan_start: NaiveDate, plan_end: NaiveDate, px_per_day: f64) -> Group {
        let mut group = Group::new().set("class", "header");

        let header_bg = Rectangle::new()
            .set("x", self.padding)
            .set("y", self.padding)
            .set("width", self.label_width + self.chart_width)
            .set("height", self.header_height)
            .set("fill", "#f8f9fa");
        group = group.add(header_bg);

        // Long plans get a label every other week
        let total_days = (plan_end - plan_start).num_days();
        let interval_days = if total_days <= 120 { 7 } else { 14 };

        let mut current = plan_start;
        while current <= plan_end {
            let x = self.date_to_x(current, plan_start, px_per_day);

            let tick = Line::new()
                .set("x1", x)
                .set("y1", (self.padding + self.header_height).saturating_sub(10))
                .set("x2", x)
                .set("y2", self.padding + self.header_height)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(tick);

            let label = Text::new(current.format("%b %d").to_string())
                .set("x", x)
                .set("y", (self.padding + self.header_height).saturating_sub(15))
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size.saturating_sub(1))
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle");
            group = group.add(label);

            match current.checked_add_days(Days::new(interval_days)) {
                Some(next) => current = next,
                None => break,
            }
        }

        let title = Text::new(self.title.as_str())
            .set("x", self.padding + self.label_width + self.chart_width / 2)
            .set("y", self.padding + 18)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 2)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str())
            .set("text-anchor", "middle");
        group = group.add(title);

        group
    }

    /// Horizontal row separators plus one vertical line per week
    fn render_grid(
        &self,
        row_count: usize,
        plan_start: NaiveDate,
        plan_end: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "grid");

        let chart_top = self.padding + self.header_height;
        let chart_bottom = chart_top + (row_count as u32 * self.row_height);

        for i in 0..=row_count {
            let y = chart_top + (i as u32 * self.row_height);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", self.padding + self.label_width + self.chart_width)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        let mut current = plan_start;
        while current <= plan_end {
            let x = self.date_to_x(current, plan_start, px_per_day);
            let line = Line::new()
                .set("x1", x)
                .set("y1", chart_top)
                .set("x2", x)
                .set("y2", chart_bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
            match current.checked_add_days(Days::new(7)) {
                Some(next) => current = next,
                None => break,
            }
        }

        group
    }

    /// One bar per week, from the week start through its due date
    fn render_week(
        &self,
        task: &StudyTask,
        row: usize,
        plan_start: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new()
            .set("class", "week")
            .set("data-week", task.week);

        let y = self.padding + self.header_height + (row as u32 * self.row_height);
        let bar_height = (self.row_height as f64 * 0.6) as u32;
        let bar_y = y + (self.row_height - bar_height) / 2;

        let label = Text::new(truncate(&week_label(task), 30))
            .set("x", self.padding + 8)
            .set("y", y + self.row_height / 2 + 4)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str());
        group = group.add(label);

        let week_start = week_start_date(plan_start, task.week).min(task.due_date);
        let x_start = self.date_to_x(week_start, plan_start, px_per_day);
        let x_end = self.date_to_x(task.due_date, plan_start, px_per_day) + px_per_day;
        let bar_width = (x_end - x_start).max(4.0);

        let bar = Rectangle::new()
            .set("x", x_start)
            .set("y", bar_y)
            .set("width", bar_width)
            .set("height", bar_height)
            .set("rx", 3)
            .set("ry", 3)
            .set("fill", self.bar_color(task));
        group = group.add(bar);

        let highlight = Rectangle::new()
            .set("x", x_start)
            .set("y", bar_y)
            .set("width", bar_width)
            .set("height", bar_height / 3)
            .set("rx", 3)
            .set("ry", 3)
            .set("fill", "rgba(255,255,255,0.2)");
        group = group.add(highlight);

        group
    }

    fn render_legend(&self, y_offset: u32) -> Group {
        let mut group = Group::new().set("class", "legend");
        let x_start = self.padding as f64;
        let y = y_offset as f64 + 15.0;
        let box_size = 12.0;
        let spacing = 120.0;

        let entries = [
            ("Learning", self.learning_color.as_str()),
            ("Testing", self.testing_color.as_str()),
            ("Completed", self.completed_color.as_str()),
        ];

        for (i, (name, color)) in entries.into_iter().enumerate() {
            let x = x_start + spacing * i as f64;
            let swatch = Rectangle::new()
                .set("x", x)
                .set("y", y - box_size + 2.0)
                .set("width", box_size)
                .set("height", box_size)
                .set("rx", 2)
                .set("fill", color);
            group = group.add(swatch);

            let label = Text::new(name)
                .set("x", x + box_size + 5.0)
                .set("y", y)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size.saturating_sub(1))
                .set("fill", self.text_color.as_str());
            group = group.add(label);
        }

        group
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, plan: &SchedulePlan) -> Result<String, RenderError> {
        if plan.tasks.is_empty() {
            return Err(RenderError::InvalidData("No tasks to render".into()));
        }

        let row_count = plan.tasks.len();
        let plan_start = plan.start_date;
        // A deadline before the start still gets a one-day axis
        let plan_end = plan.final_due_date().unwrap_or(plan_start).max(plan_start);
        let px_per_day = self.pixels_per_day(plan_start, plan_end);

        let width = self.total_width();
        let height = self.total_height(row_count) + 30; // legend

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        document = document.add(self.render_grid(row_count, plan_start, plan_end, px_per_day));
        document = document.add(self.render_header(plan_start, plan_end, px_per_day));

        for (row, task) in plan.tasks.iter().enumerate() {
            document = document.add(self.render_week(task, row, plan_start, px_per_day));
        }

        let legend_y = self.padding + self.header_height + (row_count as u32 * self.row_height) + 10;
        document = document.add(self.render_legend(legend_y));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Short row label: `Week N: first title (+k)`
fn week_label(task: &StudyTask) -> String {
    match task.assigned_chapters.split_first() {
        None => format!("Week {}", task.week),
        Some((first, [])) => format!("Week {}: {}", task.week, first),
        Some((first, rest)) => format!("Week {}: {} (+{})", task.week, first, rest.len()),
    }
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Plain text renderer for console output
#[derive(Clone, Debug, Default)]
pub struct TextRenderer {
    /// Append estimated reading minutes to learning weeks
    pub show_estimates: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show estimated reading minutes per learning week
    pub fn with_estimates(mut self) -> Self {
        self.show_estimates = true;
        self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, plan: &SchedulePlan) -> Result<String, RenderError> {
        let mut out = String::new();

        writeln!(
            out,
            "Study plan: {} to {} ({} days)",
            plan.start_date, plan.deadline_date, plan.duration_days
        )?;
        writeln!(
            out,
            "Tier: {}  Pages: {}  Weeks: {} ({} learning, {} testing)",
            plan.tier, plan.total_pages, plan.total_weeks, plan.learning_weeks, plan.testing_weeks
        )?;

        if !plan.tasks.is_empty() {
            out.push('\n');
        }
        for task in &plan.tasks {
            write!(
                out,
                "Week {:<3} {:<9} due {}  [{}]  {}",
                task.week,
                task.task_type,
                task.due_date,
                task.status,
                task.assigned_chapters.join(", ")
            )?;
            if self.show_estimates && task.is_learning() {
                write!(out, "  (~{} min)", task.estimated_minutes())?;
            }
            out.push('\n');
        }

        if !plan.alerts.is_empty() {
            out.push_str("\nAlerts:\n");
            for alert in &plan.alerts {
                writeln!(out, "  {}", alert)?;
            }
        }

        Ok(out)
    }
}

/// JSON renderer. The output deserializes back into a [`SchedulePlan`].
#[derive(Clone, Debug)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, plan: &SchedulePlan) -> Result<String, RenderError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(plan)
        } else {
            serde_json::to_string(plan)
        };
        result.map_err(|e| RenderError::Format(format!("Failed to write JSON: {}", e)))
    }
}
