// src/extractors/section.rs

// --- Imports ---
use crate::lexicon::alternation;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// --- Heading Titles ---
// Plain ASCII; accents are expanded by `alternation`.
static EVALUATION_TITLES: &[&str] = &[
    "sistema de evaluacion",
    "evaluacion",
    "evaluation",
    "assessment",
    "grading",
    "calificacion",
];

static SCHEDULE_TITLES: &[&str] = &[
    "cronograma",
    "calendarizacion",
    "calendario",
    "programacion",
    "schedule",
    "calendar",
];

// Other sections commonly found in syllabi; only used to close the previous section.
static OTHER_TITLES: &[&str] = &[
    "bibliografia",
    "referencias",
    "bibliography",
    "references",
    "metodologia",
    "methodology",
    "contenidos",
    "contenido",
    "contents",
    "competencias",
    "sumilla",
    "objetivos",
    "objectives",
    "recursos",
    "politicas",
    "policies",
];

// Roman numerals stay case-sensitive so words like "mi" never read as a prefix.
// Arabic prefixes need a closing '.' or ')' ("7.", "7)", "7.-") so that schedule rows
// ("3 Evaluación ...") are not mistaken for headings.
const HEADING_PREFIX: &str = concat!(
    r"(?:",
    r"(?-i:[IVXLCDM]+)(?:[.)]?[ \t]*[-–—:][ \t]*|[.)]?[ \t]+)",
    r"|\d+(?:\.\d+)*[.)][ \t]*(?:[-–—:][ \t]*)?",
    r")?"
);

// Separator after a roman numeral that closes a section without a known title.
const ROMAN_SEPARATOR: &str = r"(?:\.[ \t]*[-–—:][ \t]*|\.[ \t]+|[ \t]+[-–—][ \t]*)";

// Heading lines are short and never carry a percentage.
const HEADING_TAIL: &str = r"[^\n%]{0,80}$";

// Table-of-contents entry: dot leader (or similar) followed by a page number.
static TOC_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\.{3,}|…+|·{3,}|_{3,})[ \t.…·_]*\d+[ \t]*\r?$")
        .expect("Failed to compile TOC_LINE_RE")
});

fn heading_regex(titles: &[&str]) -> Regex {
    let pattern = format!(
        r"(?im)^[ \t]*{}{}{}",
        HEADING_PREFIX,
        alternation(titles),
        HEADING_TAIL
    );
    Regex::new(&pattern).expect("Failed to compile heading pattern")
}

// --- Heading Patterns (Lazy Static) ---
pub static EVALUATION_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(EVALUATION_TITLES));

pub static SCHEDULE_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(SCHEDULE_TITLES));

/// Any heading that closes a section: a roman-numbered line, or a line opening with a
/// known section title.
pub static NEXT_HEADING: Lazy<Regex> = Lazy::new(|| {
    let titles: Vec<&str> = EVALUATION_TITLES
        .iter()
        .chain(SCHEDULE_TITLES)
        .chain(OTHER_TITLES)
        .copied()
        .collect();
    let pattern = format!(
        r"(?im)(?:^[ \t]*(?-i:[IVXLCDM]+){roman_sep}\p{{L}}{tail})|(?:^[ \t]*{prefix}{titles}{tail})",
        roman_sep = ROMAN_SEPARATOR,
        tail = HEADING_TAIL,
        prefix = HEADING_PREFIX,
        titles = alternation(&titles),
    );
    Regex::new(&pattern).expect("Failed to compile NEXT_HEADING")
});

/// Whether a matched heading line is a table-of-contents entry rather than the heading itself.
pub fn is_toc_line(line: &str) -> bool {
    TOC_LINE_RE.is_match(line)
}

/// Byte range of the body under the first usable `heading` match, ending where the next
/// `next_heading` match starts (or at end of text). Table-of-contents entries are skipped,
/// and a heading with an empty body gives way to a later one.
pub fn locate_section_span(text: &str, heading: &Regex, next_heading: &Regex) -> Option<Range<usize>> {
    let mut empty_fallback: Option<Range<usize>> = None;

    for start_match in heading.find_iter(text) {
        if is_toc_line(start_match.as_str()) {
            tracing::debug!("Skipping heading - likely in ToC: '{}'", start_match.as_str().trim());
            continue;
        }

        let body_start = start_match.end();
        tracing::trace!("Heading matched at {}..{}: '{}'", start_match.start(), body_start, start_match.as_str().trim());

        let body_end = next_heading
            .find_iter(&text[body_start..])
            .find(|m| !is_toc_line(m.as_str()))
            .map(|m| body_start + m.start())
            .unwrap_or(text.len());

        if text[body_start..body_end].trim().is_empty() {
            empty_fallback.get_or_insert(body_start..body_end);
            continue;
        }
        return Some(body_start..body_end);
    }

    empty_fallback
}

/// Text between the end of the matched heading and the next heading.
pub fn locate_section<'a>(text: &'a str, heading: &Regex, next_heading: &Regex) -> Option<&'a str> {
    locate_section_span(text, heading, next_heading).map(|span| &text[span])
}

pub fn evaluation_section(text: &str) -> Option<&str> {
    locate_section(text, &EVALUATION_HEADING, &NEXT_HEADING)
}

pub fn schedule_section(text: &str) -> Option<&str> {
    locate_section(text, &SCHEDULE_HEADING, &NEXT_HEADING)
}
