//! Text similarity heuristic
//!
//! Secondary signal for "same comment, edited" decisions. The
//! structural edit policy is authoritative whenever edit ranges are
//! available; this heuristic backs the remaining judgement calls.

/// Levenshtein edit distance (Wagner-Fischer algorithm)
///
/// Minimum number of single-character insertions, deletions, and
/// substitutions turning one string into the other.
///
/// Time complexity: O(m * n)
/// Space complexity: O(min(m, n))
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Use two rows for space optimization
    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row: Vec<usize> = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;

        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            curr_row[j] = std::cmp::min(
                std::cmp::min(curr_row[j - 1] + 1, prev_row[j] + 1),
                prev_row[j - 1] + cost,
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Fuzzy comment equality
///
/// True if both texts are empty, if either is a substring of the other,
/// or if the edit distance divided by the longer length stays at or
/// under the threshold.
pub fn are_similar(a: &str, b: &str, threshold: f64) -> bool {
    if a.is_empty() && b.is_empty() {
        return true;
    }
    if a.contains(b) || b.contains(a) {
        return true;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(a, b);
    (distance as f64 / max_len as f64) <= threshold
}
