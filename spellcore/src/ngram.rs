//! N-gram similarity, used to find dictionary stems that resemble a
//! misspelled word when simple edits did not produce enough candidates.

/// Score how much of `s1` and `s2` is shared, counting every common run of
/// `n` characters for `n` from 1 up to `nmax`, weighted by `n`.
/// Stops early once a size has at most one common run, since no longer run
/// can then exist more than once.
pub fn ngram(nmax: usize, s1: &[char], s2: &[char]) -> usize {
    let mut score: usize = s1
        .iter()
        .map(|c1| s2.iter().filter(|c2| *c2 == c1).count())
        .sum();
    if nmax == 1 || score <= 1 {
        return score;
    }

    for n in 2..=nmax.min(s1.len()).min(s2.len()) {
        let hits: usize = s1
            .windows(n)
            .map(|w1| s2.windows(n).filter(|w2| *w2 == w1).count())
            .sum();
        score += hits * n;
        if hits <= 1 {
            break;
        }
    }
    score
}

/// Similarity of a dictionary stem to a misspelled word, penalized by the
/// difference in length. Both should already be lowercased.
pub fn root_similarity(nmax: usize, word: &[char], stem: &[char]) -> usize {
    ngram(nmax, word, stem).saturating_sub(word.len().abs_diff(stem.len()))
}
