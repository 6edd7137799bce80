/// Guesses at or above this similarity count as correct.
pub const MATCH_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    /// Similarity percentage, rounded to the nearest integer.
    pub similarity: u8,
}

fn normalize(value: &str) -> Vec<char> {
    value.trim().to_lowercase().chars().collect()
}

/// Unit-cost insert/delete/substitute distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    distance(&a, &b)
}

fn distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // single rolling row of the classic matrix
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

fn percentage(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 100.0;
    }
    let distance = distance(a, b);
    (max_len - distance) as f64 * 100.0 / max_len as f64
}

/// Similarity of two names in `[0, 100]`, ignoring case and surrounding
/// whitespace.
pub fn similarity(a: &str, b: &str) -> f64 {
    percentage(&normalize(a), &normalize(b))
}

pub fn is_match(guess: &str, target: &str) -> MatchResult {
    let guess = normalize(guess);
    let target = normalize(target);
    if guess == target {
        return MatchResult {
            matched: true,
            similarity: 100,
        };
    }

    let similarity = percentage(&guess, &target);
    MatchResult {
        matched: similarity >= MATCH_THRESHOLD,
        similarity: similarity.round() as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_classics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_similarity_is_symmetric_and_reflexive() {
        let names = ["pikachu", "raichu", "Mr. Mime", "", "  eevee ", "flabébé", "ho-oh"];
        for a in names {
            assert_eq!(similarity(a, a), 100.0, "{a:?} should match itself");
            for b in names {
                assert_eq!(similarity(a, b), similarity(b, a), "{a:?} vs {b:?}");
                let value = similarity(a, b);
                assert!((0.0..=100.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_both_empty_is_full_similarity() {
        assert_eq!(similarity("", "   "), 100.0);
    }

    #[test]
    fn test_exact_match_short_circuits() {
        assert_eq!(
            is_match("pikachu", "pikachu"),
            MatchResult {
                matched: true,
                similarity: 100
            }
        );
        assert_eq!(is_match("  PIKACHU ", "pikachu").similarity, 100);
    }

    #[test]
    fn test_close_guess_matches() {
        // one extra letter out of eight
        let result = is_match("pikachuu", "pikachu");
        assert!(result.matched);
        assert_eq!(result.similarity, 88);
    }

    #[test]
    fn test_unrelated_guess_does_not_match() {
        let result = is_match("xyz", "pikachu");
        assert!(!result.matched);
        assert_eq!(result.similarity, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 3 edits over 10 chars is exactly 70%
        let result = is_match("abcdefgxyz", "abcdefghij");
        assert_eq!(result.similarity, 70);
        assert!(result.matched);

        // 4 edits over 10 chars falls short
        let result = is_match("abcdefwxyz", "abcdefghij");
        assert_eq!(result.similarity, 60);
        assert!(!result.matched);
    }

    #[test]
    fn test_unicode_lengths_are_code_points() {
        // é is one edit away from e, not two
        let result = is_match("flabebe", "flabébé");
        assert_eq!(levenshtein("flabebe", "flabébé"), 2);
        assert_eq!(result.similarity, 71);
        assert!(result.matched);
    }
}
