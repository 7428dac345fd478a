//! Candidate generators. Each one offers its candidates to a callback,
//! most likely first, and stops as soon as the callback returns false.

use std::ops::Range;

/// `word` with the bytes in `range` replaced by `insert`.
fn splice(word: &str, range: Range<usize>, insert: &str) -> String {
    let mut sugg = String::with_capacity(word.len() + insert.len());
    sugg.push_str(&word[..range.start]);
    sugg.push_str(insert);
    sugg.push_str(&word[range.end..]);
    sugg
}

/// Byte ranges of the chars of `word`.
fn char_ranges(word: &str) -> impl Iterator<Item = (Range<usize>, char)> + '_ {
    word.char_indices().map(|(i, c)| (i..i + c.len_utf8(), c))
}

/// Substitutions within the `MAP` groups, in every combination. A group
/// member may be longer than one char. The number of combinations grows
/// quickly with word length, so this relies on `suggest` to call a halt.
pub fn related_char_suggestions(
    related: &[Vec<String>],
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    related_from(related, word, 0, &mut suggest);
}

/// Substitutions starting at or after byte `pos`. Returns false once
/// `suggest` has called a halt.
fn related_from<F>(related: &[Vec<String>], word: &str, pos: usize, suggest: &mut F) -> bool
where
    F: FnMut(String) -> bool,
{
    for (offset, _) in word[pos..].char_indices() {
        let start = pos + offset;
        for group in related {
            for unit in group.iter().filter(|u| word[start..].starts_with(u.as_str())) {
                let end = start + unit.len();
                for other in group.iter().filter(|o| *o != unit) {
                    let sugg = splice(word, start..end, other);
                    if !suggest(sugg.clone()) {
                        return false;
                    }
                    if !related_from(related, &sugg, start + other.len(), suggest) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

pub fn delete_char_suggestions(word: &str, mut suggest: impl FnMut(String) -> bool) {
    for (range, _) in char_ranges(word) {
        if !suggest(splice(word, range, "")) {
            return;
        }
    }
}

/// Neighbouring chars swapped, then any two chars swapped.
pub fn swap_char_suggestions(word: &str, mut suggest: impl FnMut(String) -> bool) {
    let chars: Vec<(Range<usize>, char)> = char_ranges(word).collect();
    for pair in chars.windows(2) {
        let (r1, c1) = &pair[0];
        let (r2, c2) = &pair[1];
        let swapped: String = [*c2, *c1].iter().collect();
        if !suggest(splice(word, r1.start..r2.end, &swapped)) {
            return;
        }
    }
    for (i, (r1, c1)) in chars.iter().enumerate() {
        for (r2, c2) in chars.iter().skip(i + 2) {
            let mut sugg = splice(word, r2.clone(), c1.encode_utf8(&mut [0; 4]));
            sugg = splice(&sugg, r1.clone(), c2.encode_utf8(&mut [0; 4]));
            if !suggest(sugg) {
                return;
            }
        }
    }
}

/// Substitute each character in turn with each of `chars`.
pub fn replace_char_suggestions(
    word: &str,
    chars: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    for tc in chars.chars() {
        let insert = tc.to_string();
        for (range, c) in char_ranges(word) {
            if c != tc && !suggest(splice(word, range, &insert)) {
                return;
            }
        }
    }
}

/// Typos from hitting a neighbouring key, or from a stray shift key.
/// `keyboard` holds the rows of the keyboard separated by `|`.
pub fn keyboard_suggestions(
    word: &str,
    keyboard: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    let rows: Vec<Vec<char>> = keyboard.split('|').map(|row| row.chars().collect()).collect();
    for (range, c) in char_ranges(word) {
        let mut candidates: Vec<char> = c.to_uppercase().filter(|u| *u != c).take(1).collect();
        for row in rows.iter() {
            for (pos, _) in row.iter().enumerate().filter(|(_, k)| **k == c) {
                if pos > 0 {
                    candidates.push(row[pos - 1]);
                }
                if let Some(next) = row.get(pos + 1) {
                    candidates.push(*next);
                }
            }
        }
        for newc in candidates {
            if !suggest(splice(word, range.clone(), newc.encode_utf8(&mut [0; 4]))) {
                return;
            }
        }
    }
}

/// Two words that were run together.
pub fn split_word_suggestions(word: &str, mut suggest: impl FnMut(String) -> bool) {
    for (i, _) in word.char_indices().skip(1) {
        if !suggest(splice(word, i..i, " ")) {
            return;
        }
    }
}

/// Each of `try_chars` inserted at every position, the characters in the
/// order given.
pub fn add_char_suggestions(
    word: &str,
    try_chars: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    let positions: Vec<usize> = word
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(word.len()))
        .collect();
    for tc in try_chars.chars() {
        let insert = tc.to_string();
        for &i in positions.iter() {
            if !suggest(splice(word, i..i, &insert)) {
                return;
            }
        }
    }
}
