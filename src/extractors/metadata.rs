// src/extractors/metadata.rs
use crate::lexicon::alternation;
use crate::models::Metadata;
use once_cell::sync::Lazy;
use regex::Regex;

static COURSE_LABELS: &[&str] = &[
    "nombre del curso",
    "nombre de la asignatura",
    "asignatura",
    "curso",
    "materia",
    "course name",
    "course",
    "subject",
];

static INSTRUCTOR_LABELS: &[&str] = &[
    "docente",
    "profesora",
    "profesor",
    "catedratico",
    "instructor",
    "professor",
    "lecturer",
    "teacher",
];

static TERM_LABELS: &[&str] = &[
    "semestre academico",
    "periodo academico",
    "semestre",
    "periodo",
    "ciclo",
    "term",
    "semester",
];

/// `<label> : <value>` at the start of a line, after an optional list marker
/// such as "1.1." or "-".
fn labeled_line_regex(labels: &[&str]) -> Regex {
    let pattern = format!(
        r"(?im)^[ \t]*(?:[-•*·]|\d+(?:\.\d+)*\.?)?[ \t]*{}[ \t]*:[ \t]*(\S[^\n]*?)[ \t]*\r?$",
        alternation(labels)
    );
    Regex::new(&pattern).expect("Failed to compile metadata label pattern")
}

static COURSE_RE: Lazy<Regex> = Lazy::new(|| labeled_line_regex(COURSE_LABELS));
static INSTRUCTOR_RE: Lazy<Regex> = Lazy::new(|| labeled_line_regex(INSTRUCTOR_LABELS));
static TERM_RE: Lazy<Regex> = Lazy::new(|| labeled_line_regex(TERM_LABELS));

fn first_value(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Pulls course name, instructor and term from labeled lines anywhere in the document.
pub fn extract_metadata(text: &str) -> Metadata {
    let metadata = Metadata {
        course_name: first_value(&COURSE_RE, text),
        instructor: first_value(&INSTRUCTOR_RE, text),
        term: first_value(&TERM_RE, text),
    };
    tracing::trace!("Extracted metadata: {:?}", metadata);
    metadata
}
