// src/extractors/mod.rs
pub mod evaluation;
pub mod metadata;
pub mod schedule;
pub mod section;

// Re-export key extraction types for convenience
pub use evaluation::{extract_evaluations, extract_evaluations_with_strategy, EvaluationStrategy};
pub use metadata::extract_metadata;
pub use schedule::{extract_schedule, parse_schedule_line};
pub use section::{
    evaluation_section,
    locate_section,
    locate_section_span,
    schedule_section,
    EVALUATION_HEADING,
    NEXT_HEADING,
    SCHEDULE_HEADING,
};
