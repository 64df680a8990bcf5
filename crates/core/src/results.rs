//! Lecture analysis results, as returned by `/results/{id}`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Student response tallies for one comprehension question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTally {
    pub yes: u32,
    pub no: u32,
    pub not_answered: u32,
}

impl QuestionTally {
    /// Total number of students the tally covers.
    pub fn total(&self) -> u32 {
        self.yes + self.no + self.not_answered
    }
}

/// Topics and questions split into understood versus needing revision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LectureResults {
    #[serde(default)]
    pub topics_completed: Vec<String>,
    #[serde(default)]
    pub topics_for_revision: Vec<String>,
    #[serde(default)]
    pub questions_completed: Vec<String>,
    #[serde(default)]
    pub questions_for_revision: Vec<String>,
    #[serde(default)]
    pub question_results: HashMap<String, QuestionTally>,
}

impl LectureResults {
    /// Whether the analysis produced anything to show.
    pub fn has_content(&self) -> bool {
        !self.topics_completed.is_empty() || !self.topics_for_revision.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
