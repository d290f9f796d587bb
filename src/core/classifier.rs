//! Heuristic statement classification.
//!
//! Rule-based fallback that assigns a type and confidence to a sentence
//! without an oracle call. Fully deterministic: keyword sets are scanned
//! in the fixed order of `StatementType::ALL` and ties keep the earliest
//! type.

use crate::domain::StatementType;

/// Classify a sentence by counting keyword occurrences per type.
///
/// The score per type is the number of matching keywords normalized by
/// the keyword-set size, clamped to 1.0. With no keyword match the
/// sentence defaults to `(Statement, 0.0)`.
pub fn classify(sentence: &str) -> (StatementType, f64) {
    let lowered = sentence.to_lowercase();

    let mut best_kind = StatementType::Statement;
    let mut best_score = 0.0_f64;

    for kind in StatementType::ALL {
        let keywords = kind.keywords();
        let hits = keywords.iter().filter(|kw| lowered.contains(**kw)).count();
        let score = (hits as f64 / keywords.len() as f64).min(1.0);

        if score > best_score {
            best_score = score;
            best_kind = kind;
        }
    }

    (best_kind, best_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thought_keyword_matches() {
        // "denkt" contains the keyword "denk" as a substring.
        let (kind, confidence) = classify("Jan denkt dat dit project goed gaat.");
        assert_eq!(kind, StatementType::Thought);
        assert!(confidence > 0.0);
    }

    #[test]
    fn test_feeling_keywords() {
        let (kind, confidence) = classify("Ik voel me soms bang en verdrietig.");
        assert_eq!(kind, StatementType::Feeling);
        assert!(confidence > 0.0);
    }

    #[test]
    fn test_no_match_defaults_to_statement_with_zero_confidence() {
        let (kind, confidence) = classify("Appels zijn rood.");
        assert_eq!(kind, StatementType::Statement);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let sentence = "Ik denk dat ik daar bang voor ben.";
        assert_eq!(classify(sentence), classify(sentence));
    }

    #[test]
    fn test_tie_keeps_earliest_type() {
        // One Thought keyword and one Statement keyword: Thought has a
        // 5-word set, Statement a 5-word set, so both score 1/5. The
        // earlier scan position wins.
        let (kind, _) = classify("ik denk en ik zeg");
        assert_eq!(kind, StatementType::Thought);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let (kind, _) = classify("JAN DENKT DAT HET KAN.");
        assert_eq!(kind, StatementType::Thought);
    }
}
