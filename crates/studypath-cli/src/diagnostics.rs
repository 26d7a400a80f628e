//! Alert formatting for CLI output
//!
//! This module implements alert emitters for different output formats:
//! - `TerminalEmitter`: rustc-style output to stderr
//! - `JsonEmitter`: machine-readable JSON output
//!
//! Both emitters support:
//! - `--strict` mode: escalates warnings to errors, hints to warnings
//! - `--quiet` mode: suppresses all output except errors
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings/hints allowed) |
//! | 1 | Failure: one or more errors emitted |
//!
//! ### Policy Effects
//!
//! - **Default mode**: feasibility alerts are warnings, overloaded weeks are hints
//! - **`--strict` mode**: an infeasible plan exits 1
//! - **`--quiet` mode**: Does NOT affect exit code, only output visibility

use std::io::Write;
use std::process;

use serde::Serialize;
use studypath_core::{Pace, SchedulePlan, Week};

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: no errors (warnings/hints allowed)
    Success = 0,
    /// Failure: one or more errors emitted
    Failure = 1,
}

impl ExitCode {
    /// Determine exit code from error count.
    ///
    /// The error count should already reflect policy (strict mode escalation).
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, ExitCode::Failure)
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
        }
    }
}

/// A message about a plan, optionally tied to one week
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    pub week: Option<Week>,
    pub notes: Vec<String>,
}

impl Alert {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            week: None,
            notes: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn hint(message: impl Into<String>) -> Self {
        Self::new(Severity::Hint, message)
    }

    pub fn with_week(mut self, week: Week) -> Self {
        self.week = Some(week);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Sink for alerts
pub trait AlertEmitter {
    fn emit(&mut self, alert: Alert);
}

/// Alerts for a built plan: each feasibility alert as a warning, plus a
/// hint for every learning week packed above the weekly page capacity.
pub fn plan_alerts(plan: &SchedulePlan, pace: Pace) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = plan.alerts.iter().map(Alert::warning).collect();

    let capacity = pace.pages_per_week();
    for task in plan.learning_tasks() {
        let pages = task.pages();
        if pages > capacity {
            alerts.push(
                Alert::hint(format!(
                    "week {} assigns {} pages, above the {} weekly capacity of {}",
                    task.week, pages, plan.tier, capacity
                ))
                .with_week(task.week)
                .with_note(format!("chapters: {}", task.assigned_chapters.join(", "))),
            );
        }
    }

    alerts
}

// ============================================================================
// Emitter Config
// ============================================================================

/// Configuration for alert output
#[derive(Debug, Clone, Default)]
pub struct DiagnosticConfig {
    /// Escalate severities: warnings become errors, hints become warnings
    pub strict: bool,
    /// Suppress all output except errors
    pub quiet: bool,
}

impl DiagnosticConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Default::default()
        }
    }

    /// Escalate severity according to strict mode rules
    pub fn effective_severity(&self, severity: Severity) -> Severity {
        if self.strict {
            match severity {
                Severity::Warning => Severity::Error,
                Severity::Hint => Severity::Warning,
                s => s,
            }
        } else {
            severity
        }
    }

    /// Quiet mode only shows errors
    pub fn should_show(&self, severity: Severity) -> bool {
        !self.quiet || self.effective_severity(severity) == Severity::Error
    }
}

// ============================================================================
// Emitters
// ============================================================================

/// Terminal emitter that writes rustc-style alerts
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    error_count: usize,
    warning_count: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            error_count: 0,
            warning_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Exit code based on emitted alerts (after policy)
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count)
    }

    fn write_alert(&mut self, alert: &Alert) -> std::io::Result<()> {
        let effective = self.config.effective_severity(alert.severity);

        // Counted even when quiet hides it
        match effective {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Hint => {}
        }

        if !self.config.should_show(alert.severity) {
            return Ok(());
        }

        writeln!(self.writer, "{}: {}", effective.as_str(), alert.message)?;
        if let Some(week) = alert.week {
            writeln!(self.writer, "  --> week {}", week)?;
        }
        for note in &alert.notes {
            writeln!(self.writer, "   = note: {}", note)?;
        }
        writeln!(self.writer)?;

        Ok(())
    }
}

impl<W: Write> AlertEmitter for TerminalEmitter<W> {
    fn emit(&mut self, alert: Alert) {
        // stderr may be closed
        let _ = self.write_alert(&alert);
    }
}

/// JSON emitter that collects alerts in machine-readable form
pub struct JsonEmitter {
    alerts: Vec<JsonAlert>,
    config: DiagnosticConfig,
    error_count: usize,
}

/// JSON representation of an alert
#[derive(Debug, Serialize)]
pub struct JsonAlert {
    pub severity: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<Week>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl JsonEmitter {
    pub fn new(config: DiagnosticConfig) -> Self {
        Self {
            alerts: Vec::new(),
            config,
            error_count: 0,
        }
    }

    pub fn alerts(&self) -> &[JsonAlert] {
        &self.alerts
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.alerts).unwrap_or(serde_json::Value::Null)
    }
}

impl AlertEmitter for JsonEmitter {
    fn emit(&mut self, alert: Alert) {
        let effective = self.config.effective_severity(alert.severity);
        if effective == Severity::Error {
            self.error_count += 1;
        }
        if !self.config.should_show(alert.severity) {
            return;
        }

        self.alerts.push(JsonAlert {
            severity: effective.as_str().to_string(),
            message: alert.message,
            week: alert.week,
            notes: alert.notes,
        });
    }
}
