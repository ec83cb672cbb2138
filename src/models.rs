// src/models.rs
use serde::{Deserialize, Serialize};

use crate::extractors::evaluation::EvaluationStrategy;

/// Closed set of graded-component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationKind {
    Exam,
    Project,
    Homework,
    Participation,
    Other,
}

/// One graded component of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationItem {
    pub sequence: u32,          // Order of appearance, starting at 1
    pub week: Option<u32>,
    pub date: Option<String>,   // Free-form token ("30/03", "2024-03-05", ...)
    pub name: String,
    pub abbreviation: Option<String>,
    pub weight: u32,            // Percentage of the final grade, 0..=100
    pub kind: EvaluationKind,
    /// Set when the tabular strategy kept the row without finding a weight.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub weight_defaulted: bool,
}

/// One week of the course timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub week: u32,
    pub date: Option<String>,
    pub topic: String,
    pub evaluation_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub course_name: Option<String>,
    pub instructor: Option<String>,
    pub term: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub evaluations: Vec<EvaluationItem>,
    pub schedule: Vec<ScheduleEntry>,
    pub metadata: Metadata,
}

impl ParseResult {
    pub fn total_weight(&self) -> u32 {
        self.evaluations.iter().map(|e| e.weight).sum()
    }

    /// Returns a copy whose evaluations carry week/date from matching schedule entries.
    pub fn linked(&self) -> ParseResult {
        ParseResult {
            evaluations: crate::linker::link(&self.evaluations, &self.schedule),
            schedule: self.schedule.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Non-fatal signal that evaluation weights do not add up to the expected total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightDiagnostic {
    pub total_weight: u32,
    pub expected_total: u32,
    pub tolerance: u32,
}

impl WeightDiagnostic {
    pub fn deviation(&self) -> u32 {
        self.total_weight.abs_diff(self.expected_total)
    }
}

impl std::fmt::Display for WeightDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "evaluation weights sum to {} (expected {} \u{b1} {})",
            self.total_weight, self.expected_total, self.tolerance
        )
    }
}

/// Everything a single `parse` call produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub result: ParseResult,
    pub diagnostic: Option<WeightDiagnostic>,
    pub strategy: Option<EvaluationStrategy>,
}
