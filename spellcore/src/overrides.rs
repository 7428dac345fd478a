//! Per-user word lists that override the dictionary's verdict.
//!
//! The lists themselves are stored by the caller. The checker only asks,
//! per word and language, whether the word is allowed.

use caseless::default_case_fold_str;
use fnv::{FnvHashMap, FnvHashSet};

use crate::error::{Result, SpellError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideVerdict {
    /// The word is always correct for this user.
    Allow,
    /// The user's lists say nothing about the word.
    Unlisted,
}

pub trait Overrides {
    fn verdict(&self, word: &str, language: &str) -> OverrideVerdict;

    fn allows(&self, word: &str, language: &str) -> bool {
        self.verdict(word, language) == OverrideVerdict::Allow
    }
}

impl<F> Overrides for F
where
    F: Fn(&str, &str) -> OverrideVerdict,
{
    fn verdict(&self, word: &str, language: &str) -> OverrideVerdict {
        self(word, language)
    }
}

/// For callers without personal lists.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverrides;

impl Overrides for NoOverrides {
    fn verdict(&self, _word: &str, _language: &str) -> OverrideVerdict {
        OverrideVerdict::Unlisted
    }
}

/// An allow-list of words per language. Matching ignores case.
#[derive(Clone, Debug, Default)]
pub struct WordList {
    words: FnvHashMap<String, FnvHashSet<String>>,
}

impl WordList {
    pub fn new() -> Self {
        WordList::default()
    }

    pub fn add(&mut self, word: &str, language: &str) -> Result<()> {
        let word = word.trim();
        if word.is_empty() {
            return Err(SpellError::InvalidInput(
                "cannot add an empty word to a word list".to_string(),
            ));
        }
        self.words
            .entry(language.to_string())
            .or_default()
            .insert(default_case_fold_str(word));
        Ok(())
    }

    /// Load words one per line, ignoring blank lines.
    pub fn extend_from_lines(&mut self, text: &str, language: &str) -> Result<usize> {
        let mut added = 0;
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.add(line, language)?;
            added += 1;
        }
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.words.values().map(FnvHashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Overrides for WordList {
    fn verdict(&self, word: &str, language: &str) -> OverrideVerdict {
        match self.words.get(language) {
            Some(words) if words.contains(&default_case_fold_str(word.trim())) => {
                OverrideVerdict::Allow
            }
            _ => OverrideVerdict::Unlisted,
        }
    }
}
