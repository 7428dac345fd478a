//! Finding likely intended words for a misspelling.

use caseless::default_case_fold_str;
use itertools::Itertools;
use strsim::osa_distance;
use unicode_titlecase::StrTitleCase;

use crate::dictionary::LoadedDictionary;
use crate::hunspell::suggcollector::SuggCollector;
use crate::hunspell::suggestions::{
    add_char_suggestions, delete_char_suggestions, keyboard_suggestions,
    related_char_suggestions, replace_char_suggestions, split_word_suggestions,
    swap_char_suggestions,
};
use crate::ngram::root_similarity;
use crate::overrides::Overrides;

/// The candidate pool is capped at this size before ranking.
const MAX_CANDIDATES: usize = 100;
/// How many dictionary stems may join the pool by similarity.
const MAX_ROOTS: usize = 10;
/// Longest chunk considered when scoring stem similarity.
const NGRAM_MAX: usize = 3;

#[derive(Clone, Copy, Debug)]
pub struct SuggestionEngine<'a> {
    dict: &'a LoadedDictionary,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(dict: &'a LoadedDictionary) -> Self {
        SuggestionEngine { dict }
    }

    /// Up to `max` suggestions for `word`, best first. Never includes
    /// `word` itself, nor two suggestions that differ only in case.
    pub fn suggest<O>(&self, word: &str, language: &str, max: usize, overrides: &O) -> Vec<String>
    where
        O: Overrides + ?Sized,
    {
        let original = word.trim();
        let aff = self.dict.affix_rules();
        let word = aff.iconv.conv(original);
        if word.is_empty() || max == 0 {
            return Vec::new();
        }

        let folded_word = default_case_fold_str(&word);
        // A word the user allowed is a candidate for other words, not for
        // itself in another case.
        let valid = |cand: &str| {
            self.dict.is_suggestible(cand)
                || (overrides.allows(cand, language) && default_case_fold_str(cand) != folded_word)
        };
        let mut coll = SuggCollector::new(&word, MAX_CANDIDATES.max(max), valid);
        self.collect_edits(&word, &mut coll);
        if coll.len() < max {
            coll.new_source("ngram");
            for root in self.root_candidates(&word) {
                if !coll.suggest(root) {
                    break;
                }
            }
        }

        let ranked = rank(&word, coll.into_iter().collect());
        ranked
            .into_iter()
            .map(|sugg| aff.oconv.conv(&sugg))
            .filter(|sugg| sugg != original)
            .unique()
            .take(max)
            .collect()
    }

    fn collect_edits<V: Fn(&str) -> bool>(&self, word: &str, coll: &mut SuggCollector<V>) {
        let aff = self.dict.affix_rules();

        coll.new_source("case");
        for sugg in [
            word.to_lowercase(),
            word.to_titlecase_lower_rest(),
            word.to_uppercase(),
        ] {
            coll.suggest(&sugg);
        }

        coll.new_source("replacements");
        aff.replacements.suggest(word, |sugg| coll.suggest(&sugg));

        coll.new_source("related chars");
        related_char_suggestions(&aff.related_chars, word, |sugg| coll.suggest(&sugg));

        if let Some(keyboard) = &aff.keyboard_string {
            coll.new_source("keyboard");
            keyboard_suggestions(word, keyboard, |sugg| coll.suggest(&sugg));
        }

        coll.new_source("delete");
        delete_char_suggestions(word, |sugg| coll.suggest(&sugg));

        coll.new_source("swap");
        swap_char_suggestions(word, |sugg| coll.suggest(&sugg));

        // TRY characters first because the affix file orders them by
        // frequency, then whatever else the stems use.
        let chars: String = aff
            .try_string
            .as_deref()
            .unwrap_or("")
            .chars()
            .chain(self.dict.lexicon().alphabet().chars())
            .unique()
            .collect();

        coll.new_source("insert");
        add_char_suggestions(word, &chars, |sugg| coll.suggest(&sugg));

        coll.new_source("substitute");
        replace_char_suggestions(word, &chars, |sugg| coll.suggest(&sugg));

        coll.new_source("split");
        split_word_suggestions(word, |sugg| coll.suggest(&sugg));
    }

    /// Stems that look like `word`, best first.
    fn root_candidates(&self, word: &str) -> Vec<&'a str> {
        let lower: Vec<char> = word.to_lowercase().chars().collect();
        let mut scored: Vec<(usize, &str)> = self
            .dict
            .lexicon()
            .stems()
            .filter(|(_, entries)| {
                entries
                    .iter()
                    .any(|e| e.is_suggestible() && e.is_standalone())
            })
            .filter_map(|(stem, _)| {
                let stem_lower: Vec<char> = stem.to_lowercase().chars().collect();
                let score = root_similarity(NGRAM_MAX, &lower, &stem_lower);
                (score >= lower.len()).then_some((score, stem))
            })
            .collect();
        scored.sort_by(|(s1, w1), (s2, w2)| s2.cmp(s1).then_with(|| w1.cmp(w2)));
        scored.truncate(MAX_ROOTS);
        scored.into_iter().map(|(_, stem)| stem).collect()
    }
}

/// Order candidates by edit distance from `word`, ignoring case, then
/// byte-wise.
fn rank(word: &str, candidates: Vec<String>) -> Vec<String> {
    let folded = default_case_fold_str(word);
    candidates
        .into_iter()
        .map(|sugg| (osa_distance(&folded, &default_case_fold_str(&sugg)), sugg))
        .sorted_by(|(d1, s1), (d2, s2)| d1.cmp(d2).then_with(|| s1.as_bytes().cmp(s2.as_bytes())))
        .map(|(_, sugg)| sugg)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Language;
    use crate::overrides::{NoOverrides, OverrideVerdict};

    const AFF: &[u8] = b"TRY esianrtolcdugmphbyfvkwz
NOSUGGEST !
REP 2
REP f ph
REP ^alot$ a_lot
SFX S Y 1
SFX S 0 s .
";

    const DIC: &[u8] = b"9
color/S
colour/S
a
lot/S
phone/S
Alberta
cooler
heck/!
hello
";

    fn dict() -> LoadedDictionary {
        LoadedDictionary::from_bytes(Language::new("en_US", "English"), AFF, DIC).unwrap()
    }

    #[test]
    fn test_rank() {
        let ranked = rank(
            "colr",
            vec!["colour".to_string(), "cooler".to_string(), "color".to_string(), "Color".to_string()],
        );
        assert_eq!(vec!["Color", "color", "colour", "cooler"], ranked);
    }

    #[test]
    fn test_suggest_basics() {
        let d = dict();
        let engine = SuggestionEngine::new(&d);
        let suggs = engine.suggest("colr", "en_US", 5, &NoOverrides);
        assert_eq!(Some("color"), suggs.first().map(String::as_str));
        assert!(suggs.iter().any(|s| s == "colour"));
        assert!(suggs.len() <= 5);

        assert_eq!(vec!["phone"], engine.suggest("fone", "en_US", 1, &NoOverrides));
        assert!(engine.suggest("alot", "en_US", 5, &NoOverrides).contains(&"a lot".to_string()));
        assert_eq!(Some("Alberta"), engine.suggest("alberta", "en_US", 5, &NoOverrides).first().map(String::as_str));
        assert!(engine.suggest("", "en_US", 5, &NoOverrides).is_empty());
        assert!(engine.suggest("colr", "en_US", 0, &NoOverrides).is_empty());
    }

    #[test]
    fn test_skips_nosuggest() {
        let d = dict();
        let engine = SuggestionEngine::new(&d);
        assert!(!engine.suggest("hekc", "en_US", 5, &NoOverrides).contains(&"heck".to_string()));
    }

    #[test]
    fn test_overrides_in_pool() {
        let d = dict();
        let engine = SuggestionEngine::new(&d);
        let allow = |word: &str, _: &str| {
            if word == "colrs" || word == "Colrs" {
                OverrideVerdict::Allow
            } else {
                OverrideVerdict::Unlisted
            }
        };
        // allowed words may be suggested for other words
        assert!(engine.suggest("colrss", "en_US", 5, &allow).contains(&"colrs".to_string()));
        // but never for themselves
        let suggs = engine.suggest("colrs", "en_US", 5, &allow);
        assert!(!suggs.iter().any(|s| s.eq_ignore_ascii_case("colrs")));
    }
}
