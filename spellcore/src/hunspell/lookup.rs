//! Deciding whether a string is a word form of a dictionary, by analysing it
//! into a stem and the affixes that could have produced it.

use std::str::CharIndices;

use crate::hunspell::affixdata::{AffixFlag, AffixRule, AffixRuleSet};
use crate::hunspell::is_numeric;
use crate::hunspell::lexicon::{Lexicon, StemEntry};
use crate::hunspell::wordflags::WordFlags;

/// A limit on the recursive attempts to break a word at breakpoints such as -
const MAX_WORD_BREAK_ATTEMPTS: u16 = 1000;

#[derive(Clone, Copy, Debug)]
pub struct Lookup<'a> {
    aff: &'a AffixRuleSet,
    lex: &'a Lexicon,
    /// Stem entries with any of these flags are not used.
    skip: WordFlags,
}

impl<'a> Lookup<'a> {
    pub fn new(aff: &'a AffixRuleSet, lex: &'a Lexicon) -> Self {
        Lookup {
            aff,
            lex,
            skip: WordFlags::Forbidden,
        }
    }

    /// Also refuse stems that carry any of `flags`.
    pub fn skipping(mut self, flags: WordFlags) -> Self {
        self.skip |= flags;
        self
    }

    fn usable(&self, entry: &StemEntry) -> bool {
        !entry.word_flags.intersects(self.skip)
    }

    /// Is there a usable, non-compound entry for `stem` that carries `flag`
    /// (and `also`, if given)?
    fn stem_has(&self, stem: &str, flag: AffixFlag, also: Option<AffixFlag>) -> bool {
        self.lex.homonyms(stem).iter().any(|e| {
            self.usable(e)
                && !e.word_flags.contains(WordFlags::OnlyInCompound)
                && e.has_affix_flag(flag)
                && also.map_or(true, |f| e.has_affix_flag(f))
        })
    }

    /// Undo `rule` on `word`. Unless `FULLSTRIP` is set, something of the
    /// word has to remain after removing the affix.
    fn strip_rule(&self, rule: &AffixRule, word: &str) -> Option<String> {
        if word.len() <= rule.add.len() && !self.aff.fullstrip {
            return None;
        }
        rule.to_stem(word).filter(|stem| !stem.is_empty())
    }

    /// Is `word`, exactly as written, a form of this dictionary?
    pub fn is_known_form(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let mut count = 0u16;
        self.check_breaks(word, &mut count)
    }

    fn check_breaks(&self, word: &str, count: &mut u16) -> bool {
        if *count > MAX_WORD_BREAK_ATTEMPTS {
            return false;
        }
        *count += 1;

        if is_numeric(word) {
            return true;
        }
        if self.lex.is_forbidden(word) {
            return false;
        }
        if self.check_compound(word) {
            return true;
        }

        let breaks = self.aff.effective_word_breaks();
        // break patterns may be anchored with ^ or $
        // Try those first.
        for brk in breaks.iter() {
            let bword = if let Some(brk) = brk.strip_prefix('^') {
                word.strip_prefix(brk)
            } else if let Some(brk) = brk.strip_suffix('$') {
                word.strip_suffix(brk)
            } else {
                None
            };
            if let Some(bword) = bword {
                if !bword.is_empty() && self.check_breaks(bword, count) {
                    return true;
                }
            }
        }

        // Try breaking words into pieces, at every place the pattern occurs.
        for brk in breaks.iter() {
            if brk.is_empty() || brk.starts_with('^') || brk.ends_with('$') {
                continue;
            }
            for (i, _) in word.match_indices(brk) {
                let worda = &word[..i];
                let wordb = &word[i + brk.len()..];
                if !worda.is_empty()
                    && !wordb.is_empty()
                    && self.check_breaks(worda, count)
                    && self.check_breaks(wordb, count)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Check a word against the dictionary and try compound words
    fn check_compound(&self, word: &str) -> bool {
        if self.check_affixes(word) {
            return true;
        }

        // For COMPOUNDRULE, divide the word into pieces that are all
        // directly in the dictionary (no prefix/suffix processing).
        if !self.aff.compound_rules.is_empty()
            && self.check_compoundrule(word, &mut Vec::new(), word.char_indices())
        {
            return true;
        }

        let sf = &self.aff.special_flags;
        (sf.compound_flag.is_some() || sf.compound_begin.is_some())
            && self.check_flag_compound(word, true)
    }

    /// Check a word against the stems and try affix combinations
    fn check_affixes(&self, word: &str) -> bool {
        if self
            .lex
            .homonyms(word)
            .iter()
            .any(|e| self.usable(e) && e.is_standalone())
        {
            return true;
        }
        self.check_suffixed(word) || self.check_prefixed(word)
    }

    /// A word with one suffix, or with two where the inner suffix allows
    /// the outer one.
    fn check_suffixed(&self, word: &str) -> bool {
        let sf = &self.aff.special_flags;
        self.aff.matching_suffixes(word, |id| {
            let sfx = self.aff.suffix(id);
            if sfx.has_contflag(sf.need_affix)
                || sfx.has_contflag(sf.circumfix)
                || sfx.has_contflag(sf.only_in_compound)
            {
                return false;
            }
            match self.strip_rule(sfx, word) {
                Some(stem) => {
                    self.stem_has(&stem, sfx.flag, None) || self.check_inner_suffix(&stem, sfx.flag)
                }
                None => false,
            }
        })
    }

    fn check_inner_suffix(&self, word: &str, outer: AffixFlag) -> bool {
        let sf = &self.aff.special_flags;
        self.aff.matching_suffixes(word, |id| {
            let sfx = self.aff.suffix(id);
            if !sfx.has_contflag(Some(outer)) || sfx.has_contflag(sf.circumfix) {
                return false;
            }
            match self.strip_rule(sfx, word) {
                Some(stem) => self.stem_has(&stem, sfx.flag, None),
                None => false,
            }
        })
    }

    /// A word with one prefix, possibly combined with a suffix.
    fn check_prefixed(&self, word: &str) -> bool {
        let sf = &self.aff.special_flags;
        self.aff.matching_prefixes(word, |id| {
            let pfx = self.aff.prefix(id);
            if pfx.has_contflag(sf.only_in_compound) {
                return false;
            }
            let rest = match self.strip_rule(pfx, word) {
                Some(rest) => rest,
                None => return false,
            };
            let alone = !pfx.has_contflag(sf.need_affix)
                && !pfx.has_contflag(sf.circumfix)
                && self.stem_has(&rest, pfx.flag, None);
            alone || (pfx.allow_cross && self.check_cross(pfx, &rest))
        })
    }

    /// `rest` is the word with `pfx` removed; look for a suffix on it.
    fn check_cross(&self, pfx: &AffixRule, rest: &str) -> bool {
        let sf = &self.aff.special_flags;
        self.aff.matching_suffixes(rest, |id| {
            let sfx = self.aff.suffix(id);
            if !sfx.allow_cross || sfx.has_contflag(sf.only_in_compound) {
                return false;
            }
            // circumfixes come in pairs
            if pfx.has_contflag(sf.circumfix) != sfx.has_contflag(sf.circumfix) {
                return false;
            }
            if pfx.has_contflag(sf.need_affix) && sfx.has_contflag(sf.need_affix) {
                return false;
            }
            match self.strip_rule(sfx, rest) {
                Some(stem) => {
                    self.stem_has(&stem, sfx.flag, Some(pfx.flag))
                        || (sfx.has_contflag(Some(pfx.flag))
                            && self.stem_has(&stem, sfx.flag, None))
                }
                None => false,
            }
        })
    }

    fn has_compound_flag(&self, piece: &str, flag: AffixFlag) -> bool {
        self.lex
            .homonyms(piece)
            .iter()
            .any(|e| self.usable(e) && e.has_affix_flag(flag))
    }

    fn check_compoundrule<'w>(
        &self,
        word: &'w str,
        v: &mut Vec<&'w str>,
        mut iter: CharIndices,
    ) -> bool {
        let mut wlen = 0;
        let mut wstart = None;
        while let Some((i, c)) = iter.next() {
            let start = *wstart.get_or_insert(i);
            wlen += 1;
            if wlen < self.aff.compound_min {
                continue;
            }
            let piece = &word[start..i + c.len_utf8()];
            if !self.lex.contains(piece) {
                continue;
            }
            // Found a possible word piece.
            // Recurse to try the piece.
            v.push(piece);
            // Only try the piece if at least one rule would match these pieces.
            // This avoids a lot of backtracking for words that would never
            // work anyway.
            for rule in self.aff.compound_rules.iter() {
                if rule.partial_match(v, |word, flag| self.has_compound_flag(word, flag)) {
                    if self.check_compoundrule(word, v, iter.clone()) {
                        return true;
                    }
                    break;
                }
            }
            // Then loop to try not using the piece.
            v.pop();
        }
        if wlen > 0 || v.is_empty() {
            // too-small leftover piece at the end
            return false;
        }
        self.aff
            .compound_rules
            .iter()
            .any(|rule| rule.matches(v, |word, flag| self.has_compound_flag(word, flag)))
    }

    /// Can `piece` stand at this position of a flag-based compound?
    fn compound_part(&self, piece: &str, position: Option<AffixFlag>) -> bool {
        let sf = &self.aff.special_flags;
        self.lex.homonyms(piece).iter().any(|e| {
            self.usable(e)
                && !e.needs_affix()
                && (e.has_flag(sf.compound_flag) || e.has_flag(position))
        })
    }

    /// Split `word` into at least two parts of `COMPOUNDMIN` characters or
    /// more, each allowed at its position by `COMPOUNDFLAG` or
    /// `COMPOUNDBEGIN`/`COMPOUNDMIDDLE`/`COMPOUNDEND`.
    fn check_flag_compound(&self, word: &str, first: bool) -> bool {
        let sf = &self.aff.special_flags;
        let min = self.aff.compound_min;
        let position = if first {
            sf.compound_begin
        } else {
            sf.compound_middle
        };
        for (i, _) in word.char_indices().skip(min) {
            let (part, rest) = word.split_at(i);
            if rest.chars().count() < min {
                break;
            }
            if !self.compound_part(part, position) {
                continue;
            }
            if self.compound_part(rest, sf.compound_end) || self.check_flag_compound(rest, false) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hunspell::lexicon::parse_dictionary;
    use crate::hunspell::parse_aff::parse_affix_data;

    const AFF: &str = "
FORBIDDENWORD !
NEEDAFFIX X
CIRCUMFIX C
NOSUGGEST N

PFX A Y 1
PFX A 0 re .

PFX B Y 1
PFX B 0 ge/C .

SFX T Y 1
SFX T 0 t/C .

SFX S Y 3
SFX S y ies [^aeiouy]y
SFX S 0 s [aeiou]y
SFX S 0 s [^y]

SFX D Y 2
SFX D y ied [^aeiou]y
SFX D 0 ed [^y]

SFX E Y 1
SFX E 0 er/S .
";

    const DIC: &str = "8
apply/ADS
cat/S
cats/!
drink/E
foo/XS
mach/BT
hidden/N
well
";

    fn check(aff: &str, dic: &str, words: &[(&str, bool)]) {
        let aff = parse_affix_data(aff).unwrap();
        let lex = parse_dictionary(dic, &aff).unwrap();
        let lookup = Lookup::new(&aff, &lex);
        for (word, expect) in words {
            assert_eq!(*expect, lookup.is_known_form(word), "checking {}", word);
        }
    }

    #[test]
    fn test_affixes() {
        check(
            AFF,
            DIC,
            &[
                ("apply", true),
                ("applies", true),
                ("applied", true),
                ("reapply", true),
                ("reapplied", true),
                ("reapplys", false),
                ("applyed", false),
                ("cat", true),
                ("cats", false),
                ("drinker", true),
                ("drinkers", true),
                ("drinks", false),
                ("foo", false),
                ("foos", true),
                ("gemacht", true),
                ("gemach", false),
                ("macht", false),
                ("hidden", true),
                ("", false),
            ],
        );
    }

    #[test]
    fn test_numbers_and_breaks() {
        check(
            AFF,
            DIC,
            &[
                ("1,000.50", true),
                ("cat-well", true),
                ("-well", true),
                ("well-", true),
                ("-", false),
                ("cat-dog", false),
            ],
        );
    }

    #[test]
    fn test_skipping() {
        let aff = parse_affix_data(AFF).unwrap();
        let lex = parse_dictionary(DIC, &aff).unwrap();
        let lookup = Lookup::new(&aff, &lex).skipping(WordFlags::NoSuggest);
        assert!(!lookup.is_known_form("hidden"));
        assert!(lookup.is_known_form("well"));
    }

    #[test]
    fn test_compoundrule() {
        check(
            "COMPOUNDMIN 1\nCOMPOUNDRULE 1\nCOMPOUNDRULE n*t\n",
            "4\n1/n\n2/n\nth/t\nfoo\n",
            &[
                ("12th", true),
                ("1th", true),
                ("th", true),
                ("12", true),
                ("12foo", false),
                ("th1", false),
            ],
        );
    }

    #[test]
    fn test_flag_compounds() {
        check(
            "COMPOUNDFLAG Y\nONLYINCOMPOUND O\n",
            "4\nfoot/Y\nball/Y\nbase\nzz/YO\n",
            &[
                ("football", true),
                ("ballfootball", true),
                ("footbase", false),
                ("footbal", false),
                ("zz", false),
            ],
        );
    }
}
