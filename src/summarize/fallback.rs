//! Deterministic extractive summarizer used when the completion endpoint is
//! unavailable or not configured

use super::tier::LengthTier;
use once_cell::sync::Lazy;
use regex::Regex;

/// Appended whenever a summary is cut at its character ceiling
pub const ELLIPSIS: &str = "...";

/// Returned when nothing usable can be extracted
pub const NO_SUMMARY: &str = "Unable to generate a summary for the provided text.";

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"));

/// Summarize `text` by picking sentences at fixed relative positions.
///
/// `language` is accepted so the signature mirrors the remote path, but it
/// does not influence the result: selection is purely positional and the
/// output is always in the language of the input.
pub fn summarize(text: &str, _language: &str, tier: LengthTier) -> String {
    let budget = tier.budget();
    let sentences = split_sentences(text);

    let summary = if sentences.len() <= 3 {
        truncate(text, budget.truncate_chars)
    } else {
        let joined = select_indices(sentences.len(), tier)
            .into_iter()
            .map(|i| sentences[i].trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        truncate(&joined, budget.summary_chars)
    };

    if summary.trim().is_empty() {
        NO_SUMMARY.to_string()
    } else {
        summary
    }
}

/// Split into sentence candidates, keeping terminators attached.
///
/// Trailing text without a terminator is not a sentence. Text with no
/// terminator at all is returned whole.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let sentences: Vec<&str> = SENTENCE.find_iter(text).map(|m| m.as_str()).collect();
    if sentences.is_empty() {
        vec![text]
    } else {
        sentences
    }
}

/// Sentence positions to keep for `n` sentences, ascending and unique
pub fn select_indices(n: usize, tier: LengthTier) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let mut indices = match tier {
        LengthTier::Short => vec![0],
        LengthTier::Medium => vec![0, n / 2, n - 1],
        LengthTier::Long => vec![0, n / 4, n / 2, (3 * n) / 4, n - 1],
    };
    // Positions are non-decreasing, so adjacent dedup removes every repeat
    indices.dedup();
    indices
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (0..n)
            .map(|i| format!("Sentence number {}.", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_medium_picks_first_middle_last() {
        let result = summarize("A. B. C. D. E.", "english", LengthTier::Medium);
        assert_eq!(result, "A. C. E.");
    }

    #[test]
    fn test_short_picks_first_sentence() {
        let result = summarize(&numbered(8), "english", LengthTier::Short);
        assert_eq!(result, "Sentence number 0.");
    }

    #[test]
    fn test_long_picks_quartiles() {
        let result = summarize(&numbered(8), "english", LengthTier::Long);
        assert_eq!(
            result,
            "Sentence number 0. Sentence number 2. Sentence number 4. \
             Sentence number 6. Sentence number 7."
        );
    }

    #[test]
    fn test_long_dedups_small_counts() {
        assert_eq!(select_indices(4, LengthTier::Long), vec![0, 1, 2, 3]);
        assert_eq!(select_indices(5, LengthTier::Long), vec![0, 1, 2, 3, 4]);
        assert_eq!(select_indices(1, LengthTier::Long), vec![0]);
        assert_eq!(select_indices(2, LengthTier::Long), vec![0, 1]);
        assert_eq!(select_indices(1, LengthTier::Medium), vec![0]);

        for n in 1..64 {
            for tier in LengthTier::ALL {
                let picked = select_indices(n, tier);
                let mut unique = picked.clone();
                unique.dedup();
                assert_eq!(picked, unique);
                assert!(picked.windows(2).all(|w| w[0] < w[1]));
                assert!(picked.iter().all(|&i| i < n));
            }
        }
    }

    #[test]
    fn test_two_sentences_truncate_instead_of_select() {
        let text = format!("{}. {}.", "a".repeat(120), "b".repeat(120));
        let result = summarize(&text, "english", LengthTier::Short);
        assert_eq!(result, format!("{}{}", "a".repeat(100), ELLIPSIS));

        let result = summarize(&text, "english", LengthTier::Long);
        assert_eq!(result, text);
    }

    #[test]
    fn test_final_ceiling_applies() {
        let sentence = format!("{}.", "w".repeat(200));
        let text = vec![sentence; 6].join(" ");
        let result = summarize(&text, "english", LengthTier::Medium);
        assert_eq!(result.chars().count(), 300 + ELLIPSIS.len());
        assert!(result.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_never_exceeds_ceiling() {
        let inputs = [
            String::new(),
            "no terminator at all".to_string(),
            numbered(3),
            numbered(40),
            "?!".repeat(300),
            "x".repeat(5000),
            format!("{} tail without end", numbered(12)),
        ];

        for input in &inputs {
            for tier in LengthTier::ALL {
                let result = summarize(input, "english", tier);
                let limit = tier.budget().summary_chars + ELLIPSIS.len();
                assert!(result.chars().count() <= limit.max(NO_SUMMARY.len()));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let text = numbered(17);
        for tier in LengthTier::ALL {
            assert_eq!(
                summarize(&text, "english", tier),
                summarize(&text, "english", tier)
            );
        }
    }

    #[test]
    fn test_language_is_ignored() {
        let text = numbered(9);
        assert_eq!(
            summarize(&text, "english", LengthTier::Medium),
            summarize(&text, "french", LengthTier::Medium)
        );
    }

    #[test]
    fn test_empty_input_returns_sentinel() {
        assert_eq!(summarize("", "english", LengthTier::Short), NO_SUMMARY);
        assert_eq!(summarize("   \n  ", "english", LengthTier::Long), NO_SUMMARY);
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(split_sentences("One. Two! Three?"), vec!["One.", " Two!", " Three?"]);
        assert_eq!(split_sentences("Wait... what?! ok"), vec!["Wait...", " what?!"]);
        assert_eq!(split_sentences("no terminator"), vec!["no terminator"]);
        assert_eq!(split_sentences("...leading dots."), vec!["leading dots."]);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let text = "é".repeat(10);
        assert_eq!(truncate(&text, 4), format!("{}{}", "é".repeat(4), ELLIPSIS));
        assert_eq!(truncate(&text, 10), text);
    }
}
