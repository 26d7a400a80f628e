//! End-to-end tests for plan, grade and outline

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn studypath_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_studypath"))
}

fn studypath() -> Command {
    let mut cmd = Command::new(studypath_binary());
    cmd.env_remove("RUST_LOG")
        .env_remove("STUDYPATH_CONFIG")
        .env_remove("STUDYPATH_LEARNING_PHASE_RATIO")
        .env_remove("STUDYPATH_TESTING_PHASE_RATIO")
        .env_remove("STUDYPATH_REVIEW_WINDOW_GROWTH");
    cmd
}

/// Run a prepared command and return (exit_code, stdout, stderr)
fn run(cmd: &mut Command) -> (i32, String, String) {
    let output = cmd.output().expect("failed to execute studypath");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Ten 20-page chapters between 2024-03-01 and 2024-04-30
fn textbook(dir: &TempDir) -> PathBuf {
    let mut content = String::from(
        "name = \"Textbook\"\nstart = \"2024-03-01\"\ndeadline = \"2024-04-30\"\n",
    );
    for i in 0..10 {
        content.push_str(&format!(
            "\n[[chapters]]\ntitle = \"C{}\"\npage_start = {}\npage_end = {}\n",
            i + 1,
            i * 20 + 1,
            i * 20 + 20
        ));
    }
    write(dir, "textbook.toml", &content)
}

fn plan_json(file: &Path, extra: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run(studypath()
        .args(["plan", "--format", "json"])
        .args(extra)
        .arg(file));
    assert_eq!(code, 0, "stderr: {}", stderr);
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_text_lists_weeks() {
    let dir = TempDir::new().unwrap();
    let file = textbook(&dir);

    let (code, stdout, _) = run(studypath().arg("plan").arg(&file));
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Study plan: 2024-03-01 to 2024-04-30 (61 days)\n"));
    assert!(stdout.contains("Weeks: 9 (7 learning, 2 testing)"));
    assert!(stdout.contains("Week 1   Learning  due 2024-03-07  [Pending]  C1\n"));
}

#[test]
fn plan_text_with_estimates() {
    let dir = TempDir::new().unwrap();
    let file = textbook(&dir);

    let (_, stdout, _) = run(studypath().args(["plan", "--estimates"]).arg(&file));
    // 20 pages at 5 minutes per page
    assert!(stdout.contains("C1  (~100 min)"));
}

#[test]
fn plan_json_has_plan_fields() {
    let dir = TempDir::new().unwrap();
    let plan = plan_json(&textbook(&dir), &[]);

    assert_eq!(plan["tier"], "Intermediate");
    assert_eq!(plan["total_pages"], 200);
    assert_eq!(plan["learning_weeks"], 7);
    assert_eq!(plan["testing_weeks"], 2);
    assert_eq!(plan["granularity"], "weekly");
    assert_eq!(plan["tasks"][0]["status"], "Pending");
    assert_eq!(plan["tasks"][8]["due_date"], "2024-04-30");
}

#[test]
fn plan_mermaid_uses_study_name() {
    let dir = TempDir::new().unwrap();
    let file = textbook(&dir);

    let (code, stdout, _) = run(studypath().args(["plan", "--format", "mermaid"]).arg(&file));
    assert_eq!(code, 0);
    assert!(stdout.starts_with("gantt\n    title Textbook\n"));
    assert!(stdout.contains("section Testing"));
}

#[test]
fn plan_svg_to_output_file() {
    let dir = TempDir::new().unwrap();
    let file = textbook(&dir);
    let out = dir.path().join("plan.svg");

    let (code, stdout, _) = run(studypath()
        .args(["plan", "--format", "svg", "--output"])
        .arg(&out)
        .arg(&file));
    assert_eq!(code, 0);
    assert!(stdout.is_empty());

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Textbook"));
}

#[test]
fn plan_json_study_file() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "study.json",
        r#"{"start": "2024-01-01", "deadline": "2024-01-28", "tier": "Advanced", "granularity": "daily"}"#,
    );

    let plan = plan_json(&file, &[]);
    assert_eq!(plan["tier"], "Advanced");
    assert_eq!(plan["granularity"], "daily");
    assert_eq!(plan["learning_weeks"], 1);
    assert_eq!(plan["testing_weeks"], 3);
}

#[test]
fn plan_tier_override() {
    let dir = TempDir::new().unwrap();
    let plan = plan_json(&textbook(&dir), &["--tier", "beginner"]);
    assert_eq!(plan["tier"], "Beginner");
    assert_eq!(plan["tasks"][0]["chapter_payload"][0]["estimated_minutes"], 120);
}

// =============================================================================
// Configuration sources
// =============================================================================

#[test]
fn learning_ratio_flag() {
    // 9 weeks × 0.3 -> 3 learning weeks
    let dir = TempDir::new().unwrap();
    let plan = plan_json(&textbook(&dir), &["--learning-phase-ratio", "0.3"]);
    assert_eq!(plan["learning_weeks"], 3);
    assert_eq!(plan["testing_weeks"], 6);
}

#[test]
fn learning_ratio_from_environment() {
    let dir = TempDir::new().unwrap();
    let file = textbook(&dir);

    let (code, stdout, _) = run(studypath()
        .env("STUDYPATH_LEARNING_PHASE_RATIO", "0.3")
        .args(["plan", "--format", "json"])
        .arg(&file));
    assert_eq!(code, 0);
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(plan["learning_weeks"], 3);
}

#[test]
fn config_file_and_flag_precedence() {
    let dir = TempDir::new().unwrap();
    let file = textbook(&dir);
    let config = write(&dir, "planner.toml", "learning_phase_ratio = 0.3\n");
    let config_arg = config.to_str().unwrap();

    let plan = plan_json(&file, &["--config", config_arg]);
    assert_eq!(plan["learning_weeks"], 3);

    let plan = plan_json(&file, &["--config", config_arg, "--learning-phase-ratio", "0.7"]);
    assert_eq!(plan["learning_weeks"], 7);
}

#[test]
fn config_file_pace_table() {
    let dir = TempDir::new().unwrap();
    let file = textbook(&dir);
    let config = write(
        &dir,
        "planner.toml",
        "[pace.intermediate]\npages_per_day = 20\nminutes_per_page = 3\n",
    );

    let plan = plan_json(&file, &["--config", config.to_str().unwrap()]);
    assert_eq!(plan["tasks"][0]["chapter_payload"][0]["estimated_minutes"], 60);
}

#[test]
fn zero_testing_ratio_is_accepted() {
    let dir = TempDir::new().unwrap();
    let plan = plan_json(
        &textbook(&dir),
        &["--learning-phase-ratio", "1.0", "--testing-phase-ratio", "0"],
    );
    // 9 target weeks, the last takes the final two chapters
    assert_eq!(plan["learning_weeks"], 9);
    assert_eq!(plan["testing_weeks"], 0);
}

// =============================================================================
// grade
// =============================================================================

#[test]
fn grade_text_output() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "quiz.toml",
        "responses = [\"a\", \"b\", \"x\", \"anything\"]\nanswers = [\"A\", \" b \", \"c\", \"freeform\"]\n",
    );

    let (code, stdout, _) = run(studypath().arg("grade").arg(&file));
    assert_eq!(code, 0);
    assert_eq!(stdout, "Score: 62.5%\nTier: Intermediate\n");
}

#[test]
fn grade_json_output() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "quiz.json",
        r#"{"responses": ["a", "b"], "answers": [{"answer": "a", "chapter_reference": "Ch1"}, "b"]}"#,
    );

    let (code, stdout, _) = run(studypath().args(["grade", "--format", "json"]).arg(&file));
    assert_eq!(code, 0);
    let grade: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(grade["score"], 100.0);
    assert_eq!(grade["tier"], "Advanced");
}

#[test]
fn grade_empty_responses_is_beginner() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "quiz.toml", "responses = []\nanswers = [\"a\"]\n");

    let (_, stdout, _) = run(studypath().arg("grade").arg(&file));
    assert_eq!(stdout, "Score: 0.0%\nTier: Beginner\n");
}

// =============================================================================
// outline
// =============================================================================

#[test]
fn outline_prints_chapter_table() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "outline.toml",
        r#"
total_pages = 100

[[entries]]
title = "Intro"
page_index = 0

[[entries]]
title = "Body"
page_index = 10

[[entries]]
title = "  "
page_index = 60
"#,
    );

    let (code, stdout, _) = run(studypath().arg("outline").arg(&file));
    assert_eq!(code, 0);

    let parsed: toml::Value = toml::from_str(&stdout).unwrap();
    let chapters = parsed["chapters"].as_array().unwrap();
    assert_eq!(chapters.len(), 3);
    assert_eq!(chapters[0]["title"].as_str(), Some("Intro"));
    assert_eq!(chapters[0]["page_end"].as_integer(), Some(10));
    assert_eq!(chapters[1]["page_start"].as_integer(), Some(11));
    assert_eq!(chapters[1]["page_end"].as_integer(), Some(60));
    assert_eq!(chapters[2]["title"].as_str(), Some("Untitled"));
    assert_eq!(chapters[2]["page_end"].as_integer(), Some(100));
}

#[test]
fn outline_without_entries_uses_sections() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "outline.toml", "total_pages = 100\n");

    let (_, stdout, _) = run(studypath().arg("outline").arg(&file));
    let parsed: toml::Value = toml::from_str(&stdout).unwrap();
    // 15-page sections
    assert_eq!(parsed["chapters"].as_array().unwrap().len(), 7);

    let (_, stdout, _) = run(studypath()
        .args(["outline", "--section-pages", "40"])
        .arg(&file));
    let parsed: toml::Value = toml::from_str(&stdout).unwrap();
    let chapters = parsed["chapters"].as_array().unwrap();
    assert_eq!(chapters.len(), 3);
    assert_eq!(chapters[2]["title"].as_str(), Some("Section 3"));
    assert_eq!(chapters[2]["page_start"].as_integer(), Some(81));
    assert_eq!(chapters[2]["page_end"].as_integer(), Some(100));
}

#[test]
fn outline_output_feeds_plan() {
    let dir = TempDir::new().unwrap();
    let outline = write(&dir, "outline.toml", "total_pages = 45\n");
    let (_, chapters, _) = run(studypath().arg("outline").arg(&outline));

    let study = write(
        &dir,
        "study.toml",
        &format!("start = \"2024-01-01\"\ndeadline = \"2024-01-21\"\n\n{}", chapters),
    );
    let plan = plan_json(&study, &[]);
    assert_eq!(plan["total_pages"], 45);
}

#[test]
fn no_command_prints_banner() {
    let (code, stdout, _) = run(&mut studypath());
    assert_eq!(code, 0);
    assert!(stdout.contains("Run with --help"));
}

#[test]
fn outline_with_last_page_index_does_not_overflow() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "outline.toml",
        "total_pages = 10\n\n[[entries]]\ntitle = \"Tail\"\npage_index = 4294967295\n",
    );

    let (code, stdout, stderr) = run(studypath().arg("outline").arg(&file));
    assert_eq!(code, 0, "stderr: {}", stderr);

    let parsed: toml::Value = toml::from_str(&stdout).unwrap();
    let chapters = parsed["chapters"].as_array().unwrap();
    assert_eq!(chapters[0]["page_start"].as_integer(), Some(4_294_967_295));
    assert_eq!(chapters[0]["page_end"].as_integer(), Some(4_294_967_295));
}
