//! Levenshtein edit distance

/// Edit distance with unit costs for insert, delete and substitute
pub fn distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row over the longer string
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut row: Vec<usize> = (0..=long.len()).collect();

    for (i, sc) in short.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, lc) in long.iter().enumerate() {
            let substitution = diagonal + usize::from(sc != lc);
            let insertion = row[j] + 1;
            let deletion = row[j + 1] + 1;

            diagonal = row[j + 1];
            row[j + 1] = substitution.min(insertion).min(deletion);
        }
    }

    row[long.len()]
}

/// `1 - distance / max(len)`, clamped to [0, 1]
pub fn similarity(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }

    (1.0 - distance(a, b) as f64 / max_len as f64).clamp(0.0, 1.0)
}
