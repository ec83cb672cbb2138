// src/lexicon.rs

// --- Imports ---
use crate::models::EvaluationKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

// --- Kind Lexicons ---
// Keywords are stored lowercase and accent-folded. A keyword matches when a word of
// the folded name starts with it, so "practica" also covers "practicas".
pub static EXAM_TERMS: &[&str] = &[
    "examen", "exam", "parcial", "prueba", "quiz", "midterm", "test", "evaluacion escrita",
];

pub static PROJECT_TERMS: &[&str] = &[
    "proyecto", "project", "investigacion", "research", "monografia", "informe", "report",
    "ensayo", "essay", "paper", "trabajo final",
];

pub static HOMEWORK_TERMS: &[&str] = &[
    "tarea", "homework", "practica", "practice", "ejercicio", "exercise", "assignment",
    "laboratorio", "lab", "taller", "workshop", "problem set",
];

pub static PARTICIPATION_TERMS: &[&str] = &[
    "participacion", "participation", "asistencia", "attendance", "intervencion",
    "involvement",
];

// Tested in this order; first match wins.
static KIND_LEXICON: &[(EvaluationKind, &[&str])] = &[
    (EvaluationKind::Exam, EXAM_TERMS),
    (EvaluationKind::Project, PROJECT_TERMS),
    (EvaluationKind::Homework, HOMEWORK_TERMS),
    (EvaluationKind::Participation, PARTICIPATION_TERMS),
];

// --- Canonical Abbreviations ---
static CANONICAL_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // Final exam
        ("EXF", "EF"),
        ("EXFIN", "EF"),
        ("E.F.", "EF"),
        // Midterm / partial exam
        ("EXP", "EP"),
        ("EXPAR", "EP"),
        ("E.P.", "EP"),
        // Written exam
        ("EXE", "EE"),
        ("E.E.", "EE"),
        // Practice / quiz
        ("PRA", "PC"),
        ("PRAC", "PC"),
        // Coursework
        ("TRA", "TA"),
        ("TRAB", "TA"),
        // Research work
        ("INV", "TI"),
        ("T.I.", "TI"),
        // Participation / attendance
        ("PART", "PA"),
        ("ASIS", "PA"),
        // Laboratory
        ("LAB", "LB"),
    ]
    .into_iter()
    .collect()
});

/// Maps a free-text evaluation name to its kind by lexicon lookup.
pub fn classify(name: &str) -> EvaluationKind {
    let padded = format!(" {}", word_folded(name));

    KIND_LEXICON
        .iter()
        .find(|(_, terms)| {
            terms
                .iter()
                .any(|term| padded.contains(&format!(" {}", term)))
        })
        .map(|(kind, _)| *kind)
        .unwrap_or(EvaluationKind::Other)
}

/// Canonical form of an abbreviation token. Unknown tokens come back uppercased and trimmed.
pub fn normalize(raw: &str) -> String {
    let token = raw.trim().to_uppercase();
    match CANONICAL_ABBREVIATIONS.get(token.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => token,
    }
}

// --- Accent Helpers ---

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Lowercases, strips accents, and collapses every non-alphanumeric run to one space.
pub(crate) fn word_folded(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase).map(fold_char) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Builds a regex fragment matching `phrase` with or without accents on its vowels
/// (and `n`/`ñ`). Spaces in the phrase match any whitespace run.
/// Combine with `(?i)` for case-insensitivity.
pub(crate) fn accent_insensitive(phrase: &str) -> String {
    let mut pattern = String::new();
    for c in phrase.chars() {
        match c {
            'a' => pattern.push_str("[aáàâä]"),
            'e' => pattern.push_str("[eéèêë]"),
            'i' => pattern.push_str("[iíìîï]"),
            'o' => pattern.push_str("[oóòôö]"),
            'u' => pattern.push_str("[uúùûü]"),
            'n' => pattern.push_str("[nñ]"),
            ' ' => pattern.push_str(r"\s+"),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern
}

/// Joins phrases into a non-capturing alternation, longest first so that
/// "sistema de evaluacion" wins over "evaluacion".
pub(crate) fn alternation(phrases: &[&str]) -> String {
    let mut sorted: Vec<&str> = phrases.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.len()));
    let parts: Vec<String> = sorted.iter().map(|p| accent_insensitive(p)).collect();
    format!("(?:{})", parts.join("|"))
}
