// src/linker.rs
use crate::lexicon::normalize;
use crate::models::{EvaluationItem, ScheduleEntry};

/// Copies week and date from the first schedule entry referencing each evaluation's
/// abbreviation. Both sides are compared after normalization. Inputs are left untouched.
pub fn link(evaluations: &[EvaluationItem], schedule: &[ScheduleEntry]) -> Vec<EvaluationItem> {
    let references: Vec<Option<String>> = schedule
        .iter()
        .map(|entry| entry.evaluation_ref.as_deref().map(normalize))
        .collect();

    let mut linked_count = 0usize;
    let linked: Vec<EvaluationItem> = evaluations
        .iter()
        .map(|evaluation| {
            let key = match evaluation.abbreviation.as_deref().map(normalize) {
                Some(key) if !key.is_empty() => key,
                _ => return evaluation.clone(),
            };

            let matched = schedule
                .iter()
                .zip(&references)
                .find(|(_, reference)| reference.as_deref() == Some(key.as_str()));

            match matched {
                Some((entry, _)) => {
                    linked_count += 1;
                    EvaluationItem {
                        week: Some(entry.week),
                        date: entry.date.clone(),
                        ..evaluation.clone()
                    }
                }
                None => evaluation.clone(),
            }
        })
        .collect();

    tracing::debug!("Linked {} of {} evaluations to schedule entries", linked_count, evaluations.len());
    linked
}
