//! studypath CLI - Study Schedule Planner
//!
//! Command-line interface for checking, planning, and tracking study schedules.

mod diagnostics;
mod study;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use studypath_core::{
    chapters_from_outline, fixed_sections, grade_assessment, outline_or_sections, PhaseSummary,
    PlanStatus, Planner, PlannerConfig, ProgressUpdate, Renderer, TaskStatus, Tier,
};
use studypath_render::{JsonRenderer, MermaidRenderer, SvgRenderer, TextRenderer};
use studypath_solver::WeeklyPlanner;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::diagnostics::{
    plan_alerts, Alert, AlertEmitter, DiagnosticConfig, ExitCode, JsonEmitter, TerminalEmitter,
};
use crate::study::{AssessmentFile, ChapterList, OutlineFile, StudyFile};

#[derive(Parser)]
#[command(name = "studypath")]
#[command(author, version, about = "Deadline-driven study schedule planner", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    planner: PlannerArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Planner configuration sources. Flags and environment override the file.
#[derive(Args)]
struct PlannerArgs {
    /// Planner configuration file (TOML)
    #[arg(long, global = true, env = "STUDYPATH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Share of the calendar weeks targeted for learning
    #[arg(long, global = true, env = "STUDYPATH_LEARNING_PHASE_RATIO", value_name = "RATIO")]
    learning_phase_ratio: Option<f64>,

    /// Nominal share of the calendar weeks for testing
    #[arg(long, global = true, env = "STUDYPATH_TESTING_PHASE_RATIO", value_name = "RATIO")]
    testing_phase_ratio: Option<f64>,

    /// Titles added to each successive testing window
    #[arg(long, global = true, env = "STUDYPATH_REVIEW_WINDOW_GROWTH", value_name = "N")]
    review_window_growth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a study file's deadline fits the reading pace
    Check {
        /// Study file (TOML, or JSON by extension)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Override the tier from the study file
        #[arg(short, long, value_parser = parse_tier)]
        tier: Option<Tier>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Build a weekly study plan
    Plan {
        /// Study file (TOML, or JSON by extension)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Override the tier from the study file
        #[arg(short, long, value_parser = parse_tier)]
        tier: Option<Tier>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show estimated reading minutes per learning week (text format)
        #[arg(long)]
        estimates: bool,

        /// Treat alerts as errors (exit 1 on an infeasible plan)
        #[arg(long)]
        strict: bool,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Grade a placement quiz and suggest a tier
    Grade {
        /// Assessment file with `responses` and `answers`
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Show progress of a saved plan
    Status {
        /// Plan file written by `plan --format json`
        #[arg(value_name = "PLAN")]
        plan: PathBuf,

        /// Status date (YYYY-MM-DD, defaults to today)
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Record progress for one week of a saved plan
    Mark {
        /// Plan file written by `plan --format json`
        #[arg(value_name = "PLAN")]
        plan: PathBuf,

        /// Week number
        #[arg(short, long)]
        week: u32,

        /// New status
        #[arg(short, long, value_enum, default_value_t = StatusArg::Completed)]
        status: StatusArg,

        /// Completion date (YYYY-MM-DD, defaults to today for completed weeks)
        #[arg(long, value_name = "DATE")]
        on: Option<NaiveDate>,

        /// Minutes spent
        #[arg(long)]
        minutes: Option<u32>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Flag the week as difficult
        #[arg(long)]
        difficult: bool,
    },

    /// Derive chapters from a document outline
    Outline {
        /// Outline file with `total_pages` and `[[entries]]`
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Section size when the outline has no entries
        #[arg(long, value_name = "PAGES")]
        section_pages: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlanFormat {
    Text,
    Mermaid,
    Svg,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Pending,
    InProgress,
    Completed,
}

impl From<StatusArg> for TaskStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => TaskStatus::Pending,
            StatusArg::InProgress => TaskStatus::InProgress,
            StatusArg::Completed => TaskStatus::Completed,
        }
    }
}

fn parse_tier(label: &str) -> Result<Tier, String> {
    Tier::parse(label).ok_or_else(|| {
        format!("unknown tier '{}' (expected beginner, intermediate or advanced)", label)
    })
}

fn main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Some(Commands::Check { file, tier, format }) => {
            cmd_check(&planner_config(&cli.planner)?, &file, tier, format)?
        }
        Some(Commands::Plan {
            file,
            tier,
            format,
            output,
            estimates,
            strict,
            quiet,
        }) => {
            let options = PlanOptions {
                format,
                output,
                estimates,
                diagnostics: DiagnosticConfig { strict, quiet },
            };
            cmd_plan(&planner_config(&cli.planner)?, &file, tier, &options)?
        }
        Some(Commands::Grade { file, format }) => cmd_grade(&file, format)?,
        Some(Commands::Status { plan, as_of, format }) => {
            cmd_status(&plan, as_of.unwrap_or_else(today), format)?
        }
        Some(Commands::Mark {
            plan,
            week,
            status,
            on,
            minutes,
            notes,
            difficult,
        }) => {
            let mut update = ProgressUpdate::new(status.into());
            if let Some(date) = on {
                update = update.completion_date(date);
            } else if matches!(status, StatusArg::Completed) {
                update = update.completion_date(today());
            }
            if let Some(minutes) = minutes {
                update = update.time_spent(minutes);
            }
            if let Some(notes) = notes {
                update = update.notes(notes);
            }
            if difficult {
                update = update.flag_difficult();
            }
            cmd_mark(&plan, week, &update)?
        }
        Some(Commands::Outline { file, section_pages }) => cmd_outline(&file, section_pages)?,
        None => {
            println!("studypath - Deadline-driven study schedule planner");
            println!("Run with --help for usage information");
            ExitCode::Success
        }
    };

    Ok(code.into())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "error",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Configuration file, then flag/environment overrides, then validation
fn planner_config(args: &PlannerArgs) -> Result<PlannerConfig> {
    let mut config = study::load_config(args.config.as_deref())?;

    if let Some(ratio) = args.learning_phase_ratio {
        config.learning_phase_ratio = ratio;
    }
    if let Some(ratio) = args.testing_phase_ratio {
        config.testing_phase_ratio = ratio;
    }
    if let Some(growth) = args.review_window_growth {
        config.review_window_growth = growth;
    }

    config.validate().context("Invalid planner configuration")?;
    debug!(?config, "planner configuration");
    Ok(config)
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_check(
    config: &PlannerConfig,
    file: &Path,
    tier: Option<Tier>,
    format: ReportFormat,
) -> Result<ExitCode> {
    let study: StudyFile = study::load(file)?;
    let request = study.request(tier);
    let planner = WeeklyPlanner::with_config(config.clone());

    let total_pages = request.total_pages();
    let duration_days = request.duration_days();
    let result = planner.evaluate(total_pages, request.tier, duration_days);
    let pace = config.pace_for(request.tier);

    // An infeasible deadline is the failure this command reports
    let alerts = result.alerts.iter().map(Alert::error);

    match format {
        ReportFormat::Text => {
            println!(
                "{}: {} pages over {} days",
                study.display_name(),
                total_pages,
                duration_days
            );
            println!("Tier: {} ({} pages/day)", request.tier, pace.pages_per_day);
            println!("{}", if result.feasible { "Feasible" } else { "Not feasible" });

            let mut emitter = TerminalEmitter::new(std::io::stderr(), DiagnosticConfig::default());
            alerts.for_each(|alert| emitter.emit(alert));
            Ok(emitter.exit_code())
        }
        ReportFormat::Json => {
            let mut emitter = JsonEmitter::new(DiagnosticConfig::default());
            alerts.for_each(|alert| emitter.emit(alert));

            let report = serde_json::json!({
                "name": study.display_name(),
                "total_pages": total_pages,
                "duration_days": duration_days,
                "tier": request.tier,
                "pages_per_day": pace.pages_per_day,
                "feasible": result.feasible,
                "alerts": emitter.to_json_value(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(emitter.exit_code())
        }
    }
}

struct PlanOptions {
    format: PlanFormat,
    output: Option<PathBuf>,
    estimates: bool,
    diagnostics: DiagnosticConfig,
}

fn cmd_plan(
    config: &PlannerConfig,
    file: &Path,
    tier: Option<Tier>,
    options: &PlanOptions,
) -> Result<ExitCode> {
    let study: StudyFile = study::load(file)?;
    let request = study.request(tier);
    let plan = WeeklyPlanner::with_config(config.clone()).build(&request);
    info!(
        learning_weeks = plan.learning_weeks,
        testing_weeks = plan.testing_weeks,
        "plan built"
    );

    let name = study.display_name();
    let rendered = match options.format {
        PlanFormat::Text => TextRenderer {
            show_estimates: options.estimates,
        }
        .render(&plan),
        PlanFormat::Mermaid => MermaidRenderer::new().title(name).render(&plan),
        PlanFormat::Svg => SvgRenderer::new().title(name).render(&plan),
        PlanFormat::Json => JsonRenderer::new().render(&plan),
    }
    .context("Failed to render plan")?;

    write_output(options.output.as_deref(), &rendered)?;

    let mut emitter = TerminalEmitter::new(std::io::stderr(), options.diagnostics.clone());
    for alert in plan_alerts(&plan, config.pace_for(plan.tier)) {
        emitter.emit(alert);
    }
    Ok(emitter.exit_code())
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

fn cmd_grade(file: &Path, format: ReportFormat) -> Result<ExitCode> {
    let assessment: AssessmentFile = study::load(file)?;
    let key = assessment.answer_key();
    if assessment.responses.len() != key.len() {
        debug!(
            responses = assessment.responses.len(),
            answers = key.len(),
            "grading the shorter of responses and answers"
        );
    }

    let grade = grade_assessment(&assessment.responses, &key);
    match format {
        ReportFormat::Text => {
            println!("Score: {:.1}%", grade.score);
            println!("Tier: {}", grade.tier);
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&grade)?),
    }
    Ok(ExitCode::Success)
}

fn cmd_status(plan_path: &Path, as_of: NaiveDate, format: ReportFormat) -> Result<ExitCode> {
    let plan = study::load_plan(plan_path)?;
    let status = PlanStatus::from_plan(&plan, as_of);
    let indicator = status.status_indicator();

    match format {
        ReportFormat::Text => {
            let phases = PhaseSummary::from_tasks(&plan.tasks);
            println!(
                "Plan: {} to {} ({})",
                plan.start_date, plan.deadline_date, plan.tier
            );
            println!("Status: {}", indicator);
            println!(
                "Progress: {} {}%",
                progress_bar(status.percent_complete),
                status.percent_complete
            );
            println!(
                "Weeks: {} ({} learning, {} testing)",
                phases.total_weeks, phases.learning_weeks, phases.testing_weeks
            );
            println!(
                "Tasks: {} completed, {} in progress, {} pending, {} overdue",
                status.completed_tasks,
                status.in_progress_tasks,
                status.pending_tasks,
                status.overdue_tasks
            );
            println!("Days remaining: {}", status.days_remaining);
            if let Some(test) = &status.upcoming_test {
                println!(
                    "Next test: week {} due {} (review: {})",
                    test.week,
                    test.due_date,
                    test.recommended_review.join(", ")
                );
            }
        }
        ReportFormat::Json => {
            let mut value = serde_json::to_value(&status)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("indicator".into(), indicator.as_str().into());
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(ExitCode::Success)
}

/// `[#####---------------]` with one mark per 5%
fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) / 5;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}

fn cmd_mark(plan_path: &Path, week: u32, update: &ProgressUpdate) -> Result<ExitCode> {
    let mut plan = study::load_plan(plan_path)?;
    let task = plan
        .apply_progress(week, update)
        .with_context(|| format!("Cannot update {}", plan_path.display()))?;
    println!("Week {} ({}) marked {}", task.week, task.task_type, task.status);

    study::save_plan(plan_path, &plan)?;
    Ok(ExitCode::Success)
}

fn cmd_outline(file: &Path, section_pages: Option<u32>) -> Result<ExitCode> {
    let outline: OutlineFile = study::load(file)?;
    let chapters = match section_pages {
        Some(size) if outline.entries.is_empty() => fixed_sections(outline.total_pages, size),
        Some(_) => chapters_from_outline(&outline.entries, outline.total_pages),
        None => outline_or_sections(&outline.entries, outline.total_pages),
    };

    let list = ChapterList {
        chapters: &chapters,
    };
    print!("{}", toml::to_string(&list).context("Failed to serialize chapters")?);
    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn tier_flag_is_strict() {
        assert_eq!(parse_tier("Advanced"), Ok(Tier::Advanced));
        assert!(parse_tier("guru").is_err());
    }

    #[test]
    fn progress_bar_scales() {
        assert_eq!(progress_bar(0), "[--------------------]");
        assert_eq!(progress_bar(33), "[######--------------]");
        assert_eq!(progress_bar(100), "[####################]");
    }
}
