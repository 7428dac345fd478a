use caseless::default_case_fold_str;
use fnv::FnvHashSet;
use unicode_titlecase::StrTitleCase;

use crate::hunspell::CapStyle;

/// No more than this many suggestion attempts from any one source.
const MAX_SUGGESTS_PER_SOURCE: usize = 1000;

/// Gathers valid candidates from the suggestion sources, skipping the input
/// itself and anything already collected (ignoring case).
pub struct SuggCollector<'a, V> {
    valid: V,
    word: &'a str,
    caps: CapStyle,
    limit: usize,
    suggs: Vec<String>,
    seen: FnvHashSet<String>,

    current_source: &'static str,
    counter: usize,
}

impl<'a, V> std::fmt::Debug for SuggCollector<'a, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SuggCollector")
            .field("word", &self.word)
            .field("suggs", &self.suggs)
            .field("current_source", &self.current_source)
            .finish()
    }
}

impl<'a, V: Fn(&str) -> bool> SuggCollector<'a, V> {
    /// `valid` decides whether a candidate may be suggested.
    /// At most `limit` candidates are collected.
    pub fn new(word: &'a str, limit: usize, valid: V) -> Self {
        SuggCollector {
            valid,
            word,
            caps: CapStyle::detect(word),
            limit,
            suggs: Vec::new(),
            seen: FnvHashSet::default(),
            current_source: "unknown",
            counter: MAX_SUGGESTS_PER_SOURCE,
        }
    }

    pub fn len(&self) -> usize {
        self.suggs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggs.is_empty()
    }

    pub fn new_source(&mut self, name: &'static str) {
        if !self.suggs.is_empty() {
            log::trace!("{} candidates for {} before {}", self.suggs.len(), self.word, name);
        }
        self.current_source = name;
        self.counter = MAX_SUGGESTS_PER_SOURCE;
    }

    /// Return true iff no more suggestions should be submitted
    pub fn limit(&self) -> bool {
        self.suggs.len() >= self.limit || self.counter == 0
    }

    fn accept(&mut self, sugg: String) -> bool {
        if sugg == self.word {
            return false;
        }
        let folded = default_case_fold_str(&sugg);
        if self.seen.contains(&folded) || !(self.valid)(&sugg) {
            return false;
        }
        self.seen.insert(folded);
        self.suggs.push(sugg);
        true
    }

    /// Offer a candidate. Returns false when the current source should stop.
    pub fn suggest(&mut self, sugg: &str) -> bool {
        if self.limit() {
            return false;
        }
        self.counter -= 1;

        // If the original word was capitalized or uppercase, then prefer
        // capitalized or uppercased suggestions. Do fall back on the
        // unmodified suggestion in case the capitalized forms are rejected.
        let recased = match self.caps {
            CapStyle::Capitalized => Some(sugg.to_titlecase()),
            CapStyle::AllCaps => Some(sugg.to_uppercase()),
            _ => None,
        };
        if let Some(recased) = recased.filter(|r| r != sugg) {
            if self.accept(recased) {
                return !self.limit();
            }
        }
        self.accept(sugg.to_string());
        !self.limit()
    }
}

impl<'a, V> IntoIterator for SuggCollector<'a, V> {
    type Item = String;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.suggs.into_iter()
    }
}
