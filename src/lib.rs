// src/lib.rs
//! Rule-based extraction of graded components, weekly schedule and course
//! metadata from plain syllabus text.
//!
//! The engine (`extractors`, `lexicon`, `linker`, `parser`) is pure and never
//! fails: missing sections or unreadable rows just yield less data. `storage`
//! and `utils` hold the outer layers used by the CLI.

pub mod config;
pub mod extractors;
pub mod lexicon;
pub mod linker;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

pub use config::ParserConfig;
pub use extractors::EvaluationStrategy;
pub use lexicon::{classify, normalize};
pub use linker::link;
pub use models::{
    EvaluationItem, EvaluationKind, Metadata, ParseOutcome, ParseResult, ScheduleEntry, WeightDiagnostic,
};
pub use parser::{parse, SyllabusParser};
