//! Jaro and Jaro-Winkler similarity

/// Longest common prefix credited by the Winkler adjustment
const MAX_PREFIX: usize = 4;

/// Winkler scaling factor
const PREFIX_SCALE: f64 = 0.1;

/// Jaro similarity with a match window of `floor(max_len / 2) - 1`
pub fn jaro(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ac) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());

        for j in start..end {
            if !b_matched[j] && b[j] == *ac {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Half the number of matched characters that appear out of order
    let b_sequence = b
        .iter()
        .zip(&b_matched)
        .filter_map(|(c, matched)| matched.then_some(c));
    let out_of_order = a
        .iter()
        .zip(&a_matched)
        .filter_map(|(c, matched)| matched.then_some(c))
        .zip(b_sequence)
        .filter(|(x, y)| x != y)
        .count();
    let transpositions = out_of_order as f64 / 2.0;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions) / m) / 3.0
}

/// Jaro score plus the common-prefix bonus `prefix * 0.1 * (1 - jaro)`
pub fn similarity(a: &[char], b: &[char]) -> f64 {
    let jaro = jaro(a, b);

    let prefix = a
        .iter()
        .zip(b)
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    (jaro + prefix as f64 * PREFIX_SCALE * (1.0 - jaro)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_classic_values() {
        let score = similarity(&chars("martha"), &chars("marhta"));
        assert!((score - 0.9611).abs() < 1e-3);

        let score = jaro(&chars("dixon"), &chars("dicksonx"));
        assert!((score - 0.7667).abs() < 1e-3);
    }

    #[test]
    fn test_gaming_game() {
        let jaro_score = jaro(&chars("gaming"), &chars("game"));
        assert!((jaro_score - 0.75).abs() < 1e-9);

        let score = similarity(&chars("gaming"), &chars("game"));
        assert!((score - 0.825).abs() < 1e-9);
    }

    #[test]
    fn test_no_common_characters() {
        assert_eq!(similarity(&chars("abc"), &chars("xyz")), 0.0);
    }

    #[test]
    fn test_single_characters() {
        assert_eq!(similarity(&chars("a"), &chars("a")), 1.0);
        assert_eq!(similarity(&chars("a"), &chars("b")), 0.0);
    }

    #[test]
    fn test_prefix_capped_at_four() {
        let a = chars("abcdefgh");
        let b = chars("abcdefxy");
        let jaro_score = jaro(&a, &b);
        let expected = jaro_score + 4.0 * 0.1 * (1.0 - jaro_score);
        assert!((similarity(&a, &b) - expected).abs() < 1e-9);
    }
}
