//! Learning-phase chapter packing
//!
//! Greedy, order-preserving bin packing of chapters into weeks. Each week's
//! budget is the smaller of the tier's weekly capacity and the average pages
//! still needed per remaining target week, so the budget adapts as the queue
//! drains unevenly. Chapters are atomic: a week takes chapters from the front
//! of the queue until the next one would overflow the budget, and a week that
//! could not fit anything takes exactly one chapter regardless.

use chrono::NaiveDate;
use studypath_core::{week_due_date, Chapter, Pace, ScheduledChapter, StudyTask, Week};
use tracing::{debug, warn};

/// Calendar window the learning weeks are laid out in
#[derive(Clone, Copy, Debug)]
pub struct PlanWindow {
    pub start: NaiveDate,
    pub deadline: NaiveDate,
}

impl PlanWindow {
    pub fn due_date(&self, week: Week) -> NaiveDate {
        week_due_date(self.start, week, self.deadline)
    }
}

/// Page budget for a learning week
pub fn weekly_page_budget(pace: Pace, remaining_pages: u64, remaining_weeks: u32) -> u64 {
    let average_needed = remaining_pages
        .div_ceil(u64::from(remaining_weeks.max(1)))
        .max(1);
    pace.pages_per_week().min(average_needed)
}

/// Pack chapters into at most `target_weeks` learning weeks.
///
/// Stops early once every chapter is placed. The last target week takes
/// every chapter still queued, so no chapter is ever left unscheduled.
pub fn pack_learning_weeks(
    chapters: &[Chapter],
    pace: Pace,
    target_weeks: u32,
    window: PlanWindow,
) -> Vec<StudyTask> {
    let mut tasks = Vec::new();
    let mut next = 0usize;
    let mut remaining_pages: u64 = chapters.iter().map(|c| u64::from(c.page_count())).sum();

    for week in 1..=target_weeks {
        if next >= chapters.len() {
            break;
        }

        let remaining_weeks = target_weeks - week + 1;
        let budget = weekly_page_budget(pace, remaining_pages, remaining_weeks);

        let first = next;
        let mut pages_assigned: u64 = 0;
        while let Some(chapter) = chapters.get(next) {
            let pages = u64::from(chapter.page_count());
            if pages_assigned + pages > budget {
                break;
            }
            pages_assigned += pages;
            next += 1;
        }

        if next == first {
            let chapter = &chapters[next];
            pages_assigned = u64::from(chapter.page_count());
            next += 1;
            warn!(
                week,
                chapter = %chapter.title,
                pages = pages_assigned,
                budget,
                "chapter exceeds weekly budget, assigning it alone"
            );
        }

        if week == target_weeks && next < chapters.len() {
            let overflow = &chapters[next..];
            pages_assigned += overflow.iter().map(|c| u64::from(c.page_count())).sum::<u64>();
            next = chapters.len();
            warn!(
                week,
                chapters = overflow.len(),
                pages = pages_assigned,
                budget,
                "learning phase overflow, final week takes remaining chapters"
            );
        }

        let week_chapters: Vec<ScheduledChapter> = chapters[first..next]
            .iter()
            .map(|c| ScheduledChapter::new(c.clone(), pace))
            .collect();

        debug!(
            week,
            budget,
            pages = pages_assigned,
            chapters = week_chapters.len(),
            "packed learning week"
        );

        tasks.push(StudyTask::learning(week, week_chapters, window.due_date(week)));
        remaining_pages = remaining_pages.saturating_sub(pages_assigned);
    }

    tasks
}
