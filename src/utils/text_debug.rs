// src/utils/text_debug.rs
use std::fs::File;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

use crate::extractors::section::{locate_section_span, EVALUATION_HEADING, NEXT_HEADING, SCHEDULE_HEADING};
use crate::utils::error::AppError;

/// Wraps each highlighted byte range in `[[label>>` ... `<<label]]` markers.
/// Overlapping ranges after the first are skipped.
pub fn annotate(text: &str, highlights: &[(Range<usize>, &str)]) -> String {
    let mut sorted = highlights.to_vec();
    sorted.sort_by_key(|(range, _)| range.start);

    let mut annotated = String::with_capacity(text.len() + 64);
    let mut last_pos = 0;

    for (range, label) in sorted {
        if range.start < last_pos || range.end > text.len() {
            tracing::debug!("Skipping overlapping highlight '{}' at {:?}", label, range);
            continue;
        }
        annotated.push_str(&text[last_pos..range.start]);
        annotated.push_str(&format!("[[{}>>", label));
        annotated.push_str(&text[range.clone()]);
        annotated.push_str(&format!("<<{}]]", label));
        last_pos = range.end;
    }

    annotated.push_str(&text[last_pos..]);
    annotated
}

/// Byte ranges of the evaluation and schedule sections, as the parser sees them.
pub fn section_highlights(text: &str) -> Vec<(Range<usize>, &'static str)> {
    let mut highlights = Vec::new();
    if let Some(span) = locate_section_span(text, &EVALUATION_HEADING, &NEXT_HEADING) {
        highlights.push((span, "evaluation"));
    }
    if let Some(span) = locate_section_span(text, &SCHEDULE_HEADING, &NEXT_HEADING) {
        highlights.push((span, "schedule"));
    }
    highlights
}

/// Writes a copy of `text` with the located sections marked, for eyeballing section boundaries.
pub fn create_debug_text(text: &str, filename: &Path) -> Result<(), AppError> {
    let highlights = section_highlights(text);
    if highlights.is_empty() {
        tracing::warn!("No sections located for debug output {}", filename.display());
    }

    let mut file = File::create(filename)?;
    file.write_all(annotate(text, &highlights).as_bytes())?;

    tracing::info!("Saved debug text to {}", filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_marks_ranges_in_order() {
        let text = "abcdefghij";
        let annotated = annotate(text, &[(6..8, "b"), (1..3, "a")]);
        assert_eq!(annotated, "a[[a>>bc<<a]]def[[b>>gh<<b]]ij");
    }

    #[test]
    fn test_annotate_skips_overlaps() {
        let annotated = annotate("abcdef", &[(0..4, "x"), (2..5, "y")]);
        assert_eq!(annotated, "[[x>>abcd<<x]]ef");
    }

    #[test]
    fn test_section_highlights_cover_both_sections() {
        let text = "VII. Evaluación\nExamen: 100%\nVIII. Cronograma\n1 Intro\n";
        let highlights = section_highlights(text);
        let labels: Vec<&str> = highlights.iter().map(|(_, label)| *label).collect();
        assert_eq!(labels, vec!["evaluation", "schedule"]);

        let annotated = annotate(text, &highlights);
        assert!(annotated.contains("[[evaluation>>\nExamen: 100%\n<<evaluation]]"));
        assert!(annotated.contains("[[schedule>>\n1 Intro\n<<schedule]]"));
    }

    #[test]
    fn test_create_debug_text_writes_file() {
        let path = std::env::temp_dir().join(format!("syllabus_debug_{}.txt", std::process::id()));
        create_debug_text("Evaluación\nExamen: 100%\n", &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[[evaluation>>"));
        std::fs::remove_file(&path).unwrap();
    }
}
