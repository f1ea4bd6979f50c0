/// Normalize a field value for comparison.
///
/// Steps:
/// 1. Lowercase
/// 2. Drop everything that is not alphanumeric or whitespace
/// 3. Collapse whitespace runs and trim
pub fn normalize(value: &str) -> String {
    let filtered: String = value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a pair of values, first removing any embedded field label that
/// appears in either of them from both.
///
/// Documents sometimes repeat the field name inside the value
/// ("Roof Pitch 4/12"). If stripping would leave a side empty, that side is
/// normalized without stripping.
pub fn normalize_pair(a: &str, b: &str, embedded_labels: &[String]) -> (String, String) {
    let mut a_lower = a.to_lowercase();
    let mut b_lower = b.to_lowercase();

    for label in embedded_labels {
        if a_lower.contains(label.as_str()) || b_lower.contains(label.as_str()) {
            a_lower = a_lower.replace(label.as_str(), " ");
            b_lower = b_lower.replace(label.as_str(), " ");
        }
    }

    let a_norm = match normalize(&a_lower) {
        s if s.is_empty() => normalize(a),
        s => s,
    };
    let b_norm = match normalize(&b_lower) {
        s if s.is_empty() => normalize(b),
        s => s,
    };
    (a_norm, b_norm)
}
