//! Text-quality heuristics for engines that don't report their own confidence.
//!
//! Japanese text has no spaces between words, so word-shape checks only look
//! at Latin tokens.

/// Score recognized text in `0.0..=1.0`
pub fn estimate_confidence(text: &str) -> f32 {
    let char_count = text.chars().filter(|c| !c.is_whitespace()).count();
    if char_count == 0 {
        return 0.0;
    }
    if char_count < 5 {
        return 0.5; // too short to judge
    }

    let score = 0.5 * expected_char_ratio(text)
        + 0.3 * latin_word_shape(text)
        + 0.2 * repetition_penalty(text);

    score.clamp(0.0, 1.0)
}

/// Share of non-space characters that are letters, digits or common punctuation
fn expected_char_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut expected = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if c.is_alphanumeric() || ".,:;!?'\"()[]{}-+/%&@#$¥円、。「」・ー".contains(c) {
            expected += 1;
        }
    }
    expected as f32 / total as f32
}

/// Penalize Latin tokens that are mostly single letters or implausibly long
fn latin_word_shape(text: &str) -> f32 {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().all(|c| c.is_ascii_alphabetic()))
        .collect();
    if words.is_empty() {
        return 1.0;
    }

    let single = words.iter().filter(|w| w.len() == 1).count() as f32 / words.len() as f32;
    let too_long = words.iter().filter(|w| w.len() > 20).count() as f32 / words.len() as f32;
    (1.0 - single * 0.8 - too_long).max(0.0)
}

/// 1.0 without long same-character runs, lower as more text sits in them
fn repetition_penalty(text: &str) -> f32 {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut repeated = 0usize;
    let mut run = 1usize;
    for pair in chars.windows(2) {
        if pair[0] == pair[1] {
            run += 1;
        } else {
            if run > 3 {
                repeated += run;
            }
            run = 1;
        }
    }
    if run > 3 {
        repeated += run;
    }
    1.0 - repeated as f32 / chars.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_returns_zero() {
        assert_eq!(estimate_confidence(""), 0.0);
        assert_eq!(estimate_confidence("   \n"), 0.0);
    }

    #[test]
    fn test_short_text_returns_half() {
        assert_eq!(estimate_confidence("12"), 0.5);
    }

    #[test]
    fn test_clean_latin_text_high() {
        let score = estimate_confidence("Invoice total 1,234.50 due 2024/05/01");
        assert!(score > 0.9, "got {}", score);
    }

    #[test]
    fn test_japanese_text_not_penalized_for_missing_spaces() {
        let score = estimate_confidence("請求金額の合計は一二三四円です。");
        assert!(score > 0.9, "got {}", score);
    }

    #[test]
    fn test_symbol_soup_low() {
        let score = estimate_confidence("§±®©¥€£¢¤ƒ");
        assert!(score < 0.7, "got {}", score);
        assert!(score < estimate_confidence("Hello World OCR Test"));
    }

    #[test]
    fn test_single_letter_tokens_lower() {
        let score = estimate_confidence("a b c d e f g h i j");
        assert!(score < 0.8, "got {}", score);
    }

    #[test]
    fn test_repetition_lower() {
        assert_eq!(repetition_penalty("abcdef"), 1.0);
        assert!(repetition_penalty("abllllll") < 1.0);
    }
}
