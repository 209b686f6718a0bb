//! Levenshtein-distance name suggestions for undefined-name diagnostics.

/// Levenshtein edit distance between two strings.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            cur[j] = (prev[j] + 1)
                .min(cur[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Candidates within `max_distance` of `target`, ordered by distance then
/// lexicographically. Used to suggest a fix for an undefined name.
pub fn find_similar_names<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
) -> Vec<&'a str> {
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .map(|c| (levenshtein(target, c), c))
        .filter(|(d, _)| *d <= max_distance && *d > 0)
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(b.1)));
    scored.into_iter().map(|(_, name)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_identical() {
        assert_eq!(levenshtein("foo", "foo"), 0);
    }

    #[test]
    fn levenshtein_one_edit() {
        assert_eq!(levenshtein("cat", "cats"), 1);
        assert_eq!(levenshtein("cat", "bat"), 1);
    }

    #[test]
    fn find_similar_names_within_distance() {
        let candidates = ["print", "length", "greet", "map"];
        let found = find_similar_names("grete", candidates, 2);
        assert_eq!(found, vec!["greet"]);
    }

    #[test]
    fn find_similar_names_excludes_exact_match() {
        let candidates = ["print"];
        let found = find_similar_names("print", candidates, 2);
        assert!(found.is_empty());
    }

    #[test]
    fn find_similar_names_orders_by_distance() {
        let candidates = ["prinnt", "prin", "print"];
        let found = find_similar_names("prrint", candidates, 2);
        assert_eq!(found[0], "print");
    }
}
