//! Fuzzy title similarity.

/// Token-order-insensitive similarity between two titles, 0.0-100.0.
///
/// Both sides are lower-cased and their whitespace-separated tokens sorted,
/// then compared with the Indel ratio `2 * LCS / (|a| + |b|) * 100`, so
/// "matrix the" and "the matrix" score 100. The value is not rounded;
/// threshold checks compare it as is. An empty side scores 0.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = sorted_tokens(a).chars().collect();
    let b: Vec<char> = sorted_tokens(b).chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let lcs = longest_common_subsequence(&a, &b);
    200.0 * lcs as f64 / (a.len() + b.len()) as f64
}

fn sorted_tokens(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut tokens: Vec<&str> = lower.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Length of the longest common subsequence, one DP row at a time.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];

    for a_char in a {
        let mut diagonal = 0;
        for (j, b_char) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if a_char == b_char {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_identical_titles_score_100() {
        assert_close(token_sort_ratio("the matrix", "the matrix"), 100.0);
    }

    #[test]
    fn test_token_order_is_ignored() {
        assert_close(token_sort_ratio("the matrix", "matrix the"), 100.0);
        assert_close(token_sort_ratio("Children of Men", "men of children"), 100.0);
    }

    #[test]
    fn test_case_is_ignored() {
        assert_close(token_sort_ratio("HEAT", "heat"), 100.0);
    }

    #[test]
    fn test_one_deletion_uses_indel_ratio() {
        // "matrix the" vs "matrx the": LCS 9 over 10 + 9 characters.
        assert_close(token_sort_ratio("the matrix", "the matrx"), 1800.0 / 19.0);
    }

    #[test]
    fn test_substitution_counts_as_two_edits() {
        // Two substitutions in 13 characters leave an LCS of 11.
        let score = token_sort_ratio("abcdefghijklm", "abcdefghijkxy");
        assert_close(score, 2200.0 / 26.0);
        assert!(score < 85.0);
    }

    #[test]
    fn test_lcs_skips_unmatched_characters() {
        assert_eq!(
            longest_common_subsequence(
                &"abcbdab".chars().collect::<Vec<_>>(),
                &"bdcaba".chars().collect::<Vec<_>>()
            ),
            4
        );
    }

    #[test]
    fn test_unrelated_titles_score_low() {
        assert!(token_sort_ratio("the matrix", "casablanca") < 50.0);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        assert_eq!(token_sort_ratio("", "heat"), 0.0);
        assert_eq!(token_sort_ratio("heat", "   "), 0.0);
        assert_eq!(token_sort_ratio("", ""), 0.0);
    }
}
