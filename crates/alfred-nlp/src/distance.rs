//! Edit distance over Unicode scalar values.

/// Levenshtein distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row dynamic program
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Levenshtein distance divided by the reference length (min 1).
///
/// The reference is the known string (a corpus question or an intent
/// example); the query is compared against it. Identical strings score 0.0.
pub fn normalized_distance(query: &str, reference: &str) -> f32 {
    let len = reference.chars().count().max(1);
    levenshtein(query, reference) as f32 / len as f32
}
