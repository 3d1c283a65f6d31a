//! Fuzzy classification of incoming field names
//!
//! Imported headers drift: singular/plural, separator conventions, typos.
//! This module compares a candidate field name against the corpus of names
//! seen in prior imports and decides whether it is the same field in
//! disguise, using exact, normalized-form and edit-distance heuristics.

use tracing::debug;

use crate::app::models::{FieldMapping, FieldMappingReport, MappingStatus, MatchMethod};
use crate::app::services::field_keys::header_to_field_key;
use crate::constants::{CASE_VARIATION_SCORE, SIMILARITY_THRESHOLD};

/// Outcome of comparing one candidate name against the known corpus
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    /// The candidate matches a known field closely enough to suggest it
    pub is_similar: bool,

    /// The known field the candidate probably means
    pub suggestion: Option<String>,

    /// Heuristic that produced the match
    pub method: Option<MatchMethod>,

    /// Similarity score in [0, 1]
    pub score: f64,
}

impl SimilarityResult {
    fn none() -> Self {
        Self {
            is_similar: false,
            suggestion: None,
            method: None,
            score: 0.0,
        }
    }
}

/// Normalized comparison form: lowercased, separators stripped
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_lowercase()
}

/// Compare a candidate field name against known field names.
///
/// Exact raw match scores 1.0; a normalized-form match with different raw
/// spelling is a case/separator variation at 0.95; otherwise the closest
/// Levenshtein match on normalized forms wins if its similarity
/// `1 - distance/max_len` reaches the 0.85 threshold. The threshold is
/// tuned to accept singular/plural and single-character variants
/// (`Commander`/`Commanders`) while rejecting different words of similar
/// shape (`Death Wave`/`Death Ray`).
pub fn check_field_similarity(candidate: &str, known_fields: &[String]) -> SimilarityResult {
    let normalized_candidate = normalize(candidate);
    if normalized_candidate.is_empty() {
        return SimilarityResult::none();
    }

    for known in known_fields {
        if normalize(known) == normalized_candidate {
            if known == candidate {
                return SimilarityResult {
                    is_similar: true,
                    suggestion: Some(known.clone()),
                    method: Some(MatchMethod::Exact),
                    score: 1.0,
                };
            }
            return SimilarityResult {
                is_similar: true,
                suggestion: Some(known.clone()),
                method: Some(MatchMethod::CaseVariation),
                score: CASE_VARIATION_SCORE,
            };
        }
    }

    let mut best: Option<(&String, f64)> = None;
    for known in known_fields {
        let normalized_known = normalize(known);
        let distance = levenshtein_distance(&normalized_candidate, &normalized_known);
        let max_len = normalized_candidate.len().max(normalized_known.len());
        if max_len == 0 {
            continue;
        }
        let score = 1.0 - distance as f64 / max_len as f64;
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((known, score));
        }
    }

    match best {
        Some((known, score)) if score >= SIMILARITY_THRESHOLD => {
            debug!(candidate, suggestion = %known, score, "edit-distance field match");
            SimilarityResult {
                is_similar: true,
                suggestion: Some(known.clone()),
                method: Some(MatchMethod::Levenshtein),
                score,
            }
        }
        _ => SimilarityResult::none(),
    }
}

/// Classify every input header against the fields observed in prior
/// imports (not the current batch), flagging `_`-prefixed headers as
/// internal.
pub fn classify_fields(headers: &[String], known_fields: &[String]) -> FieldMappingReport {
    let mappings = headers
        .iter()
        .map(|header| {
            let field_key = header_to_field_key(header);
            let internal = header.trim().starts_with('_');
            let result = check_field_similarity(&field_key, known_fields);
            let status = match result.method {
                Some(MatchMethod::Exact) => MappingStatus::ExactMatch,
                Some(_) => MappingStatus::SimilarField,
                None => MappingStatus::NewField,
            };
            FieldMapping {
                header: header.clone(),
                field_key,
                status,
                suggestion: result.suggestion.filter(|_| status != MappingStatus::ExactMatch),
                method: result.method,
                internal,
            }
        })
        .collect();

    FieldMappingReport { mappings }
}

/// Levenshtein edit distance, two-row dynamic programming
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous.copy_from_slice(&current);
    }

    previous[b_chars.len()]
}
