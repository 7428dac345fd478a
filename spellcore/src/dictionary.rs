use anyhow::Context;
use std::fs::read;
use std::path::Path;
use unicode_titlecase::StrTitleCase;

use crate::config::Language;
use crate::error::{Result, SpellError};
use crate::hunspell::affixdata::AffixRuleSet;
use crate::hunspell::lexicon::Lexicon;
use crate::hunspell::lookup::Lookup;
use crate::hunspell::wordflags::WordFlags;
use crate::hunspell::CapStyle;

/// Parse the contents of an affix file and a stem file.
pub fn parse(affix: &[u8], dictionary: &[u8]) -> Result<(AffixRuleSet, Lexicon)> {
    crate::hunspell::parse(affix, dictionary).map_err(|e| SpellError::malformed("(in memory)", &e))
}

/// A language's rules and stems, ready for queries. Immutable once built.
#[derive(Clone, Debug)]
pub struct LoadedDictionary {
    language: Language,
    aff: AffixRuleSet,
    lex: Lexicon,
}

impl LoadedDictionary {
    pub fn from_bytes(language: Language, affix: &[u8], dictionary: &[u8]) -> Result<Self> {
        let (aff, lex) = crate::hunspell::parse(affix, dictionary)
            .map_err(|e| SpellError::malformed(&language.code, &e))?;
        log::info!(
            "loaded dictionary {}: {} stems, {} prefixes, {} suffixes",
            language.code,
            lex.len(),
            aff.prefix_count(),
            aff.suffix_count()
        );
        Ok(LoadedDictionary { language, aff, lex })
    }

    pub fn from_files(language: Language, affix: &Path, dictionary: &Path) -> Result<Self> {
        let affix_bytes = read(affix)
            .with_context(|| format!("Could not read affix data from {}", affix.display()))
            .map_err(|e| SpellError::malformed(&language.code, &e))?;
        let dict_bytes = read(dictionary)
            .with_context(|| format!("Could not read words from {}", dictionary.display()))
            .map_err(|e| SpellError::malformed(&language.code, &e))?;
        Self::from_bytes(language, &affix_bytes, &dict_bytes)
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn affix_rules(&self) -> &AffixRuleSet {
        &self.aff
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lex
    }

    fn lookup(&self) -> Lookup<'_> {
        Lookup::new(&self.aff, &self.lex)
    }

    /// Is `word`, exactly as written, a form of this dictionary?
    pub fn is_known_form(&self, word: &str) -> bool {
        self.lookup().is_known_form(word)
    }

    /// The word in lower case, and all-caps words in title case.
    /// Keep-case stems and forbidden forms only count for the lower case
    /// retry.
    fn known_case_variant(&self, word: &str, lookup: Lookup) -> bool {
        let lower = word.to_lowercase();
        if lower != word && lookup.is_known_form(&lower) {
            return true;
        }
        if CapStyle::detect(word) == CapStyle::AllCaps && !self.lex.is_forbidden(word) {
            let title = lower.to_titlecase();
            let lookup = lookup.skipping(WordFlags::KeepCase);
            if title != word && title != lower && lookup.is_known_form(&title) {
                return true;
            }
        }
        false
    }

    /// Is `word` correctly spelled, allowing for capitalization?
    /// `ICONV` conversions are applied first.
    pub fn check_word(&self, word: &str) -> bool {
        let word = self.aff.iconv.conv(word);
        let lookup = self.lookup();
        lookup.is_known_form(&word) || self.known_case_variant(&word, lookup)
    }

    /// May `word` be offered as a suggestion? Like `check_word`, but
    /// no-suggest stems don't count, and a phrase of two words is accepted
    /// if both words are.
    pub fn is_suggestible(&self, word: &str) -> bool {
        let lookup = self.lookup().skipping(WordFlags::NoSuggest);
        if lookup.is_known_form(word) || self.known_case_variant(word, lookup) {
            return true;
        }
        match word.split_once(' ') {
            Some((worda, wordb)) if !worda.is_empty() && !wordb.is_empty() => {
                self.is_suggestible(worda) && self.is_suggestible(wordb)
            }
            _ => false,
        }
    }
}
