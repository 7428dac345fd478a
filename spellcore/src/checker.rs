use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::DictionaryCache;
use crate::dictionary::LoadedDictionary;
use crate::overrides::Overrides;
use crate::suggest::SuggestionEngine;

/// The verdict on one word of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordVerdict {
    pub word: String,
    pub is_correct: bool,
}

/// Answers spelling questions for any supported language, loading
/// dictionaries through the shared cache.
#[derive(Clone, Debug)]
pub struct SpellChecker {
    cache: Arc<DictionaryCache>,
}

impl SpellChecker {
    pub fn new(cache: Arc<DictionaryCache>) -> Self {
        SpellChecker { cache }
    }

    pub fn cache(&self) -> &Arc<DictionaryCache> {
        &self.cache
    }

    pub fn max_suggestions(&self) -> usize {
        self.cache.config().max_suggestions
    }

    fn check_with<O>(dict: &LoadedDictionary, text: &str, language: &str, overrides: &O) -> bool
    where
        O: Overrides + ?Sized,
    {
        let word = text.trim();
        if word.is_empty() {
            return false;
        }
        overrides.allows(word, language) || dict.check_word(word)
    }

    /// Is `text` a correctly spelled word in `language`?
    /// Surrounding whitespace is ignored; an empty word is never correct.
    pub fn check_text<O>(&self, text: &str, language: &str, overrides: &O) -> bool
    where
        O: Overrides + ?Sized,
    {
        if text.trim().is_empty() {
            return false;
        }
        let dict = self.cache.resolve(language);
        Self::check_with(&dict, text, language, overrides)
    }

    /// Check each of `words` independently. The verdicts are in the same
    /// order as the words.
    pub fn check_batch<S, O>(&self, words: &[S], language: &str, overrides: &O) -> Vec<WordVerdict>
    where
        S: AsRef<str> + Sync,
        O: Overrides + Sync + ?Sized,
    {
        let dict = self.cache.resolve(language);
        words
            .par_iter()
            .map(|word| {
                let word = word.as_ref();
                WordVerdict {
                    word: word.to_string(),
                    is_correct: Self::check_with(&dict, word, language, overrides),
                }
            })
            .collect()
    }

    /// Up to `max` corrections for `word`, best first.
    pub fn suggest<O>(&self, word: &str, language: &str, max: usize, overrides: &O) -> Vec<String>
    where
        O: Overrides + ?Sized,
    {
        let dict = self.cache.resolve(language);
        SuggestionEngine::new(&dict).suggest(word, language, max, overrides)
    }

    /// Suggestions for each distinct word of `words`, in order of first
    /// appearance.
    pub fn suggest_batch<S, O>(
        &self,
        words: &[S],
        language: &str,
        max: usize,
        overrides: &O,
    ) -> Vec<(String, Vec<String>)>
    where
        S: AsRef<str> + Sync,
        O: Overrides + Sync + ?Sized,
    {
        let dict = self.cache.resolve(language);
        let mut seen = fnv::FnvHashSet::default();
        let distinct: Vec<&str> = words
            .iter()
            .map(|w| w.as_ref())
            .filter(|w| seen.insert(*w))
            .collect();
        distinct
            .par_iter()
            .map(|word| {
                let suggs = SuggestionEngine::new(&dict).suggest(word, language, max, overrides);
                (word.to_string(), suggs)
            })
            .collect()
    }
}
