//! String similarity ratios on a 0-100 scale.
//!
//! All ratios are symmetric in their arguments.

use strsim::normalized_levenshtein;

/// Plain edit-distance similarity.
pub fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Best similarity between the shorter string and any equally long window
/// of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }
    if short.len() == long.len() {
        return ratio(a, b);
    }

    let short: String = short.into_iter().collect();
    long.windows(short.chars().count())
        .map(|w| ratio(&short, &w.iter().collect::<String>()))
        .fold(0.0, f64::max)
}

/// Similarity after sorting whitespace-separated tokens, so word order does
/// not matter.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
