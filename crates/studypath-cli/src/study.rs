//! Input files: study descriptions, assessments, outlines, planner config
//!
//! Files are TOML unless the extension is `.json`.
//!
//! ```toml
//! name = "Algorithms"
//! start = "2024-01-01"
//! deadline = "2024-01-21"
//! tier = "intermediate"
//!
//! [[chapters]]
//! title = "Sorting"
//! page_start = 1
//! page_end = 30
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use studypath_core::{
    AnswerKey, Chapter, OutlineEntry, PlannerConfig, SchedulePlan, ScheduleRequest, Tier,
    DEFAULT_GRANULARITY,
};

/// Study file describing what to read and by when
#[derive(Debug, Clone, Deserialize)]
pub struct StudyFile {
    #[serde(default)]
    pub name: Option<String>,
    pub start: NaiveDate,
    pub deadline: NaiveDate,
    #[serde(default = "default_tier")]
    pub tier: Tier,
    #[serde(default = "default_granularity")]
    pub granularity: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

fn default_tier() -> Tier {
    Tier::Intermediate
}

fn default_granularity() -> String {
    DEFAULT_GRANULARITY.to_string()
}

impl StudyFile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Study Plan")
    }

    /// Planner request, with an optional tier override
    pub fn request(&self, tier: Option<Tier>) -> ScheduleRequest {
        ScheduleRequest::new(self.start, self.deadline)
            .tier(tier.unwrap_or(self.tier))
            .granularity(self.granularity.as_str())
            .chapters(self.chapters.iter().cloned())
    }
}

/// Placement quiz: the reader's responses and the answer key
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentFile {
    pub responses: Vec<String>,
    pub answers: Vec<AnswerEntry>,
}

/// Answer key entry, either a bare answer or a table with a chapter reference
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerEntry {
    Plain(String),
    Keyed(AnswerKey),
}

impl AssessmentFile {
    pub fn answer_key(&self) -> Vec<AnswerKey> {
        self.answers
            .iter()
            .map(|entry| match entry {
                AnswerEntry::Plain(answer) => AnswerKey::new(answer.as_str()),
                AnswerEntry::Keyed(key) => key.clone(),
            })
            .collect()
    }
}

/// Document outline with its page count
#[derive(Debug, Clone, Deserialize)]
pub struct OutlineFile {
    pub total_pages: u32,
    #[serde(default)]
    pub entries: Vec<OutlineEntry>,
}

/// Chapter list as written back out by `outline`
#[derive(Debug, Serialize)]
pub struct ChapterList<'a> {
    pub chapters: &'a [Chapter],
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Read and parse a TOML or JSON file
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))
    } else {
        toml::from_str(&content).with_context(|| format!("Failed to parse TOML: {}", path.display()))
    }
}

/// Read a plan previously written with `plan --format json`
pub fn load_plan(path: &Path) -> Result<SchedulePlan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse plan: {}", path.display()))
}

pub fn save_plan(path: &Path, plan: &SchedulePlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write plan: {}", path.display()))
}

/// Planner configuration from an optional TOML file
pub fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        }
        None => Ok(PlannerConfig::default()),
    }
}
