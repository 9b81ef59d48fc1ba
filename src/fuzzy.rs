//! Fuzzy string matching using Levenshtein distance
//!
//! Transcripts coming out of speech-to-text are noisy: words get misheard,
//! truncated or merged. Wake phrases are matched by character edit distance
//! rather than equality so a near miss still counts.

/// Calculate Levenshtein distance between two strings
///
/// Counts single-character insertions, deletions and substitutions needed to
/// turn `a` into `b`. Operates on `char`s, so multi-byte text is measured in
/// characters rather than bytes.
#[hotpath::measure]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Rows follow `b`, columns follow `a`
    let mut dp = vec![vec![0; a.len() + 1]; b.len() + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=a.len() {
        dp[0][j] = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            let cost = if b[i - 1] == a[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j - 1] + cost)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j] + 1);
        }
    }
    dp[b.len()][a.len()]
}

/// Clean text for matching: lowercase and remove non-alphabetic characters
pub fn clean_for_matching(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect()
}
