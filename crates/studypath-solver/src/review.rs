//! Testing-phase review windows
//!
//! Testing weeks introduce no new chapters. Each one reviews a prefix of the
//! chapters learned so far, and the prefix grows by `growth` titles per
//! testing week.

use studypath_core::{StudyTask, Week};

use crate::packing::PlanWindow;

/// Titles reviewed in the testing week at `offset` (0-based).
///
/// Takes the first `min(len, learning_weeks + offset × growth)` learned
/// titles. An empty window falls back to the full list.
pub fn review_window(
    learned: &[String],
    learning_weeks: u32,
    offset: u32,
    growth: usize,
) -> Vec<String> {
    let span = (learning_weeks as usize).saturating_add((offset as usize).saturating_mul(growth));
    let window = &learned[..span.min(learned.len())];
    if window.is_empty() {
        learned.to_vec()
    } else {
        window.to_vec()
    }
}

/// Testing tasks following `learning_weeks` learning weeks
pub fn testing_tasks(
    learned: &[String],
    learning_weeks: u32,
    testing_weeks: u32,
    growth: usize,
    window: PlanWindow,
) -> Vec<StudyTask> {
    (0..testing_weeks)
        .map(|offset| {
            let week: Week = learning_weeks + offset + 1;
            StudyTask::testing(
                week,
                review_window(learned, learning_weeks, offset, growth),
                window.due_date(week),
            )
        })
        .collect()
}
