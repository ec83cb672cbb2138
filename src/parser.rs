// src/parser.rs
use crate::config::ParserConfig;
use crate::extractors::evaluation::extract_evaluations_with_strategy;
use crate::extractors::metadata::extract_metadata;
use crate::extractors::schedule::extract_schedule;
use crate::extractors::section::{evaluation_section, schedule_section};
use crate::models::{ParseOutcome, ParseResult, WeightDiagnostic};

/// Composes section location, extraction and the weight-sum check.
#[derive(Debug, Clone, Default)]
pub struct SyllabusParser {
    config: ParserConfig,
}

impl SyllabusParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Extracts evaluations, schedule and metadata from plain syllabus text.
    /// The result is unlinked; call `ParseResult::linked` to merge schedule weeks.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let (strategy, evaluations) = match evaluation_section(text) {
            Some(section) => match extract_evaluations_with_strategy(section) {
                Some((strategy, items)) => (Some(strategy), items),
                None => (None, Vec::new()),
            },
            None => {
                tracing::debug!("No evaluation section found");
                (None, Vec::new())
            }
        };

        let schedule = match schedule_section(text) {
            Some(section) => extract_schedule(section),
            None => {
                tracing::debug!("No schedule section found");
                Vec::new()
            }
        };

        let result = ParseResult {
            evaluations,
            schedule,
            metadata: extract_metadata(text),
        };

        let diagnostic = self.check_weights(&result);
        if let Some(diagnostic) = &diagnostic {
            tracing::warn!("{}", diagnostic);
        }

        ParseOutcome {
            result,
            diagnostic,
            strategy,
        }
    }

    /// Flags a positive weight total that strays from the expected total by more than the tolerance.
    pub fn check_weights(&self, result: &ParseResult) -> Option<WeightDiagnostic> {
        let total_weight = result.total_weight();
        let diagnostic = WeightDiagnostic {
            total_weight,
            expected_total: self.config.expected_total,
            tolerance: self.config.weight_tolerance,
        };
        (total_weight > 0 && diagnostic.deviation() > self.config.weight_tolerance).then_some(diagnostic)
    }
}

/// Parses with the default configuration.
pub fn parse(text: &str) -> ParseOutcome {
    SyllabusParser::default().parse(text)
}
