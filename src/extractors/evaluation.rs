// src/extractors/evaluation.rs

// --- Imports ---
use crate::lexicon::{accent_insensitive, classify};
use crate::models::EvaluationItem;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MAX_WEIGHT: u32 = 100;

// --- Regex Patterns (Lazy Static) ---

// Header row: row marker, week-or-date marker, type marker, weight marker, in that order.
static TABLE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?i)(?:n[°ºo]\.?|nro\.?|num\.?|#|item)[ \t]+(?:semana|sem\.?|week|fecha|date)\b[^\n]{{0,80}}?(?:tipo|{eval}|instrumento|type|evaluation|assessment)[^\n]{{0,80}}?(?:peso|weight|porcentaje|{pond}|%)",
        eval = accent_insensitive("evaluacion"),
        pond = accent_insensitive("ponderacion"),
    );
    Regex::new(&pattern).expect("Failed to compile TABLE_HEADER_RE")
});

// `<index> <week-or-date>` opening a table row. The trailing letter keeps a
// "<weight> <100%>" pair from reading as a new row.
static TABLE_ROW_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3})[ \t]+(\d{1,2}(?:[/\-]\d{1,2}(?:[/\-]\d{2,4})?)?)[ \t]+\p{L}")
        .expect("Failed to compile TABLE_ROW_PREFIX_RE")
});

// Weight is the integer right before a percentage token: "20 100%" => 20.
static TABLE_WEIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3})[ \t]+\d{1,3}(?:[.,]\d+)?[ \t]*%")
        .expect("Failed to compile TABLE_WEIGHT_RE")
});

// Abbreviation token opening a row: at line start, or right after a weight when
// a table was flattened onto one line ("... 1 20 TI Trabajo ... 30").
static ABBREVIATION_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^[ \t]*|\d[ \t]*%?[ \t]+)([A-Z]{2,3}\d*)[ \t]+\S")
        .expect("Failed to compile ABBREVIATION_TOKEN_RE")
});

// Row body after the token: description, then the trailing integer weight.
static ABBREVIATION_BODY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S.*?)[ \t]+(\d+)[ \t]*%?$").expect("Failed to compile ABBREVIATION_BODY_RE")
});

static COLON_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:(?:[-•*·]+|\d+[.)])[ \t]*)?([^:\n]*?)[ \t]*:[ \t]*(\d+)[ \t]*%")
        .expect("Failed to compile COLON_ROW_RE")
});

// --- Strategies ---

/// Extraction strategies, listed in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationStrategy {
    /// Header row plus `<index> <week> <name> <weight> <n>%` rows.
    Tabular,
    /// `<ABBR><digits?> <description> <weight>[%]` lines.
    Abbreviation,
    /// `<name>: <weight>%` lines.
    Colon,
}

type StrategyFn = fn(&str) -> Vec<EvaluationItem>;

static STRATEGY_CHAIN: &[(EvaluationStrategy, StrategyFn)] = &[
    (EvaluationStrategy::Tabular, extract_tabular),
    (EvaluationStrategy::Abbreviation, extract_abbreviated),
    (EvaluationStrategy::Colon, extract_colon),
];

/// Runs the strategy chain over an evaluation section; the first non-empty result wins.
pub fn extract_evaluations(section: &str) -> Vec<EvaluationItem> {
    extract_evaluations_with_strategy(section)
        .map(|(_, items)| items)
        .unwrap_or_default()
}

/// Same as `extract_evaluations`, also naming the strategy that produced the items.
pub fn extract_evaluations_with_strategy(section: &str) -> Option<(EvaluationStrategy, Vec<EvaluationItem>)> {
    first_non_empty(section, STRATEGY_CHAIN)
}

fn first_non_empty(
    section: &str,
    chain: &[(EvaluationStrategy, StrategyFn)],
) -> Option<(EvaluationStrategy, Vec<EvaluationItem>)> {
    for (strategy, run) in chain {
        let items = run(section);
        if !items.is_empty() {
            tracing::debug!("{:?} strategy extracted {} evaluations", strategy, items.len());
            return Some((*strategy, items));
        }
        tracing::trace!("{:?} strategy found nothing", strategy);
    }
    tracing::debug!("No evaluation strategy matched the section");
    None
}

// --- Row Candidates ---

struct Candidate {
    name: String,
    weight: u32,
    abbreviation: Option<String>,
    week: Option<u32>,
    date: Option<String>,
    weight_defaulted: bool,
}

/// Classifies and numbers candidates in extraction order.
fn into_items(candidates: Vec<Candidate>) -> Vec<EvaluationItem> {
    candidates
        .into_iter()
        .zip(1u32..)
        .map(|(c, sequence)| EvaluationItem {
            sequence,
            week: c.week,
            date: c.date,
            kind: classify(&c.name),
            name: c.name,
            abbreviation: c.abbreviation,
            weight: c.weight,
            weight_defaulted: c.weight_defaulted,
        })
        .collect()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_date_token(token: &str) -> bool {
    token.contains('/') || token.contains('-')
}

// --- Strategy 1: Tabular ---

fn extract_tabular(section: &str) -> Vec<EvaluationItem> {
    let Some(header) = TABLE_HEADER_RE.find(section) else {
        return Vec::new();
    };
    let body = &section[header.end()..];

    let prefixes: Vec<regex::Captures> = TABLE_ROW_PREFIX_RE.captures_iter(body).collect();
    let mut candidates = Vec::new();

    for (i, caps) in prefixes.iter().enumerate() {
        let segment_end = prefixes
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(body.len());
        let Some(week_token) = caps.get(2) else { continue };
        let content = &body[week_token.end()..segment_end];

        let (name_part, weight, weight_defaulted) = match TABLE_WEIGHT_RE.captures(content) {
            Some(weight_caps) => {
                let (Some(whole), Some(value)) = (weight_caps.get(0), weight_caps.get(1)) else { continue };
                // Unparsable weight falls back to 0 for this strategy.
                let weight = value.as_str().parse::<u32>().unwrap_or(0);
                (&content[..whole.start()], weight, false)
            }
            None => (content, 0, true),
        };

        if weight > MAX_WEIGHT {
            tracing::debug!("Dropping table row with out-of-range weight {}", weight);
            continue;
        }

        let name = normalize_whitespace(name_part);
        if name.is_empty() {
            tracing::debug!("Dropping table row with empty name");
            continue;
        }
        if weight_defaulted {
            tracing::debug!("No weight found for table row '{}', defaulting to 0", name);
        }

        let token = week_token.as_str();
        let (week, date) = if is_date_token(token) {
            (None, Some(token.to_string()))
        } else {
            (token.parse::<u32>().ok().filter(|w| *w > 0), None)
        };

        candidates.push(Candidate {
            name,
            weight,
            abbreviation: None,
            week,
            date,
            weight_defaulted,
        });
    }

    into_items(candidates)
}

// --- Strategy 2: Abbreviation ---

/// Splits a section into `(token, body)` rows. A row runs from its token to the next
/// token or the end of its line, whichever comes first.
fn abbreviation_rows(section: &str) -> Vec<(&str, &str)> {
    let tokens: Vec<regex::Match> = ABBREVIATION_TOKEN_RE
        .captures_iter(section)
        .filter_map(|caps| caps.get(1))
        .collect();

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let end = tokens.get(i + 1).map_or(section.len(), |next| next.start());
            let body = &section[token.end()..end];
            let body = body.find('\n').map_or(body, |nl| &body[..nl]);
            (token.as_str(), body.trim())
        })
        .collect()
}

fn extract_abbreviated(section: &str) -> Vec<EvaluationItem> {
    let mut candidates = Vec::new();

    for (token, body) in abbreviation_rows(section) {
        let Some(caps) = ABBREVIATION_BODY_RE.captures(body) else {
            tracing::trace!("Abbreviation row '{}' has no trailing weight", token);
            continue;
        };
        let (Some(description), Some(weight)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(weight) = weight.as_str().parse::<u32>().ok().filter(|w| *w <= MAX_WEIGHT) else {
            tracing::debug!("Dropping abbreviation row '{}' with unusable weight", token);
            continue;
        };
        let name = normalize_whitespace(description.as_str().trim_end_matches([':', '-', '–']));
        if name.is_empty() {
            continue;
        }

        candidates.push(Candidate {
            name,
            weight,
            abbreviation: Some(token.to_string()),
            week: None,
            date: None,
            weight_defaulted: false,
        });
    }

    into_items(candidates)
}

// --- Strategy 3: Colon ---

fn extract_colon(section: &str) -> Vec<EvaluationItem> {
    let mut candidates = Vec::new();

    for caps in COLON_ROW_RE.captures_iter(section) {
        let (Some(name), Some(weight)) = (caps.get(1), caps.get(2)) else { continue };
        let Some(weight) = weight.as_str().parse::<u32>().ok().filter(|w| *w <= MAX_WEIGHT) else {
            tracing::debug!("Dropping colon row '{}' with unusable weight", name.as_str());
            continue;
        };
        let name = normalize_whitespace(name.as_str());
        if name.is_empty() {
            continue;
        }

        candidates.push(Candidate {
            name,
            weight,
            abbreviation: None,
            week: None,
            date: None,
            weight_defaulted: false,
        });
    }

    into_items(candidates)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EvaluationKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TABLE: &str = "
N° Semana Tipo de Evaluación Peso
1 5 Examen Escrito 1 20 100%
2 10 Examen Escrito 2 25 100%
3 14 Trabajo de Investigación 30 100%
4 16 Examen Final 25 100%
";

    #[test]
    fn test_tabular_rows() {
        let (strategy, items) = extract_evaluations_with_strategy(TABLE).expect("items");
        assert_eq!(strategy, EvaluationStrategy::Tabular);

        let weights: Vec<u32> = items.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![20, 25, 30, 25]);

        let names: Vec<&str> = items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Examen Escrito 1", "Examen Escrito 2", "Trabajo de Investigación", "Examen Final"]);

        let kinds: Vec<EvaluationKind> = items.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EvaluationKind::Exam, EvaluationKind::Exam, EvaluationKind::Project, EvaluationKind::Exam]);

        let weeks: Vec<Option<u32>> = items.iter().map(|e| e.week).collect();
        assert_eq!(weeks, vec![Some(5), Some(10), Some(14), Some(16)]);

        let sequences: Vec<u32> = items.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        assert!(items.iter().all(|e| !e.weight_defaulted && e.abbreviation.is_none()));
    }

    #[test]
    fn test_tabular_rows_on_a_single_line() {
        let text = "Nº Semana Evaluación Peso 1 5 Examen Parcial 40 100% 2 16 Examen Final 60 100%";
        let items = extract_evaluations(text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Examen Parcial");
        assert_eq!(items[1].weight, 60);
    }

    #[test]
    fn test_tabular_missing_weight_defaults_to_zero() {
        let text = "N° Semana Tipo Peso\n1 5 Exposición oral\n2 9 Informe 30 100%\n";
        let items = extract_evaluations(text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Exposición oral");
        assert_eq!(items[0].weight, 0);
        assert!(items[0].weight_defaulted);
        assert_eq!(items[1].weight, 30);
        assert!(!items[1].weight_defaulted);
    }

    #[test]
    fn test_tabular_out_of_range_weight_drops_row_only() {
        let text = "N° Semana Tipo Peso\n1 5 Examen Parcial 150 100%\n2 16 Examen Final 60 100%\n";
        let items = extract_evaluations(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Examen Final");
        assert_eq!(items[0].sequence, 1, "Sequence follows kept rows");
    }

    #[test]
    fn test_tabular_date_column() {
        let text = "N° Fecha Tipo Peso\n1 30/03 Examen 40 100%\n";
        let items = extract_evaluations(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].date.as_deref(), Some("30/03"));
        assert_eq!(items[0].week, None);
    }

    #[test]
    fn test_abbreviation_rows() {
        let text = "EE1 Examen Escrito 1 20\nTI Trabajo de Investigación 30\n";
        let (strategy, items) = extract_evaluations_with_strategy(text).expect("items");
        assert_eq!(strategy, EvaluationStrategy::Abbreviation);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].abbreviation.as_deref(), Some("EE1"));
        assert_eq!(items[0].name, "Examen Escrito 1");
        assert_eq!(items[0].weight, 20);
        assert_eq!(items[1].abbreviation.as_deref(), Some("TI"));
        assert_eq!(items[1].weight, 30);
        assert_eq!(items[1].kind, EvaluationKind::Project);
    }

    #[test]
    fn test_abbreviation_rows_with_percent_and_bad_weight() {
        let text = "EP Examen Parcial 30%\nEF Examen Final 999\nPA Participación 10 %\n";
        let items = extract_evaluations(text);
        let abbreviations: Vec<&str> = items.iter().filter_map(|e| e.abbreviation.as_deref()).collect();
        assert_eq!(abbreviations, vec!["EP", "PA"]);
        assert_eq!(items[1].kind, EvaluationKind::Participation);
        assert_eq!(items[1].sequence, 2);
    }

    #[test]
    fn test_abbreviation_rows_flattened_onto_one_line() {
        let text = "EE1 Examen Escrito 1 20 TI Trabajo de Investigación 30 EF Examen Final 50%";
        let (strategy, items) = extract_evaluations_with_strategy(text).expect("items");
        assert_eq!(strategy, EvaluationStrategy::Abbreviation);

        let abbreviations: Vec<&str> = items.iter().filter_map(|e| e.abbreviation.as_deref()).collect();
        assert_eq!(abbreviations, vec!["EE1", "TI", "EF"]);
        let names: Vec<&str> = items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Examen Escrito 1", "Trabajo de Investigación", "Examen Final"]);
        let weights: Vec<u32> = items.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![20, 30, 50]);
    }

    #[test]
    fn test_abbreviation_row_without_weight_is_skipped() {
        let text = "EP Examen Parcial
EF Examen Final 60
";
        let items = extract_evaluations(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].abbreviation.as_deref(), Some("EF"));
    }

    #[test]
    fn test_colon_rows() {
        let text = "- Examen parcial: 30%\n- Tareas: 20 %\n1. Examen final : 50%\nNotas: aprobatoria 11\n";
        let (strategy, items) = extract_evaluations_with_strategy(text).expect("items");
        assert_eq!(strategy, EvaluationStrategy::Colon);
        let names: Vec<&str> = items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Examen parcial", "Tareas", "Examen final"]);
        let weights: Vec<u32> = items.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![30, 20, 50]);
        assert!(items.iter().all(|e| e.abbreviation.is_none()));
        assert_eq!(items[1].kind, EvaluationKind::Homework);
    }

    #[test]
    fn test_colon_row_over_hundred_is_dropped() {
        let items = extract_evaluations("Examen: 120%\nProyecto: 40%\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Proyecto");
    }

    #[test]
    fn test_tabular_wins_over_other_strategies() {
        // Also satisfies the colon strategy; only the table may contribute.
        let text = format!("{}\nExamen sorpresa: 10%\n", TABLE);
        let (strategy, items) = extract_evaluations_with_strategy(&text).expect("items");
        assert_eq!(strategy, EvaluationStrategy::Tabular);
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|e| e.name != "Examen sorpresa"));
    }

    static FIRST_CALLS: AtomicUsize = AtomicUsize::new(0);
    static SECOND_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn spy_first(section: &str) -> Vec<EvaluationItem> {
        FIRST_CALLS.fetch_add(1, Ordering::SeqCst);
        extract_tabular(section)
    }

    fn spy_second(section: &str) -> Vec<EvaluationItem> {
        SECOND_CALLS.fetch_add(1, Ordering::SeqCst);
        extract_colon(section)
    }

    #[test]
    fn test_chain_stops_at_first_non_empty() {
        let chain: &[(EvaluationStrategy, StrategyFn)] = &[
            (EvaluationStrategy::Tabular, spy_first),
            (EvaluationStrategy::Colon, spy_second),
        ];

        let result = first_non_empty(TABLE, chain);
        assert_eq!(result.map(|(s, _)| s), Some(EvaluationStrategy::Tabular));
        assert_eq!(FIRST_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(SECOND_CALLS.load(Ordering::SeqCst), 0, "Later strategies must not run");

        let result = first_non_empty("Examen: 40%", chain);
        assert_eq!(result.map(|(s, _)| s), Some(EvaluationStrategy::Colon));
        assert_eq!(FIRST_CALLS.load(Ordering::SeqCst), 2);
        assert_eq!(SECOND_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_section_yields_nothing() {
        assert!(extract_evaluations("").is_empty());
        assert!(extract_evaluations_with_strategy("Sin evaluaciones definidas.").is_none());
    }

    #[test]
    fn test_strategy_chain_order() {
        let chain_order: Vec<EvaluationStrategy> = STRATEGY_CHAIN.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            chain_order,
            vec![EvaluationStrategy::Tabular, EvaluationStrategy::Abbreviation, EvaluationStrategy::Colon]
        );
    }
}
