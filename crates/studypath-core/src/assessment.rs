//! Baseline assessment grading
//!
//! A short placement quiz decides which [`Tier`] the planner uses. Questions
//! are produced elsewhere; this module only scores responses against an
//! answer key and maps the score to a tier.
//!
//! | Score | Tier |
//! |-------|------|
//! | ≤ 40 | Beginner |
//! | ≤ 70 | Intermediate |
//! | > 70 | Advanced |

use serde::{Deserialize, Serialize};

use crate::Tier;

/// Answer key value for open-ended questions
pub const FREEFORM: &str = "freeform";

/// Credit given to any response on a freeform question
const FREEFORM_CREDIT: f64 = 0.5;

/// Expected answer for one quiz question
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey {
    /// Expected answer, or `"freeform"` for open-ended questions
    pub answer: String,
    /// Chapter the question was drawn from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_reference: Option<String>,
}

impl AnswerKey {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            chapter_reference: None,
        }
    }

    pub fn freeform() -> Self {
        Self::new(FREEFORM)
    }

    /// Attach the chapter reference
    pub fn chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter_reference = Some(chapter.into());
        self
    }

    pub fn is_freeform(&self) -> bool {
        self.answer.trim().eq_ignore_ascii_case(FREEFORM)
    }

    /// Credit earned by a response: 1 for a match, 0.5 for freeform, else 0
    fn credit(&self, response: &str) -> f64 {
        if self.is_freeform() {
            FREEFORM_CREDIT
        } else if response.trim().to_lowercase() == self.answer.trim().to_lowercase() {
            1.0
        } else {
            0.0
        }
    }
}

/// Graded assessment
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentGrade {
    /// Percentage score (0-100)
    pub score: f64,
    /// Tier implied by the score
    pub tier: Tier,
}

impl AssessmentGrade {
    /// Tier band for a percentage score
    pub fn tier_for_score(score: f64) -> Tier {
        if score <= 40.0 {
            Tier::Beginner
        } else if score <= 70.0 {
            Tier::Intermediate
        } else {
            Tier::Advanced
        }
    }
}

/// Score responses against the answer key.
///
/// Only the first `min(responses, key)` pairs are graded. An empty response
/// list or key scores zero.
pub fn grade_assessment<S: AsRef<str>>(responses: &[S], key: &[AnswerKey]) -> AssessmentGrade {
    let total = responses.len().min(key.len());
    if total == 0 {
        return AssessmentGrade {
            score: 0.0,
            tier: Tier::Beginner,
        };
    }

    let correct: f64 = responses
        .iter()
        .zip(key)
        .map(|(response, expected)| expected.credit(response.as_ref()))
        .sum();

    let score = correct / total as f64 * 100.0;
    AssessmentGrade {
        score,
        tier: AssessmentGrade::tier_for_score(score),
    }
}
