use anyhow::{bail, Result};
use fnv::FnvHashMap;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::hunspell::affixdata::{AffixFlag, AffixRuleSet};
use crate::hunspell::wordflags::WordFlags;

/// One line of the dictionary file, minus the stem itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StemEntry {
    pub word_flags: WordFlags,
    /// Sorted
    pub affix_flags: SmallVec<[AffixFlag; 4]>,
}

impl StemEntry {
    pub fn new(word_flags: WordFlags, mut affix_flags: SmallVec<[AffixFlag; 4]>) -> Self {
        affix_flags.sort_unstable();
        affix_flags.dedup();
        StemEntry {
            word_flags,
            affix_flags,
        }
    }

    pub fn has_affix_flag(&self, flag: AffixFlag) -> bool {
        self.affix_flags.binary_search(&flag).is_ok()
    }

    pub fn has_flag(&self, flag: Option<AffixFlag>) -> bool {
        flag.map_or(false, |flag| self.has_affix_flag(flag))
    }

    pub fn is_forbidden(&self) -> bool {
        self.word_flags.contains(WordFlags::Forbidden)
    }

    pub fn needs_affix(&self) -> bool {
        self.word_flags.contains(WordFlags::NeedAffix)
    }

    /// May this entry be offered as a suggestion?
    pub fn is_suggestible(&self) -> bool {
        !self.word_flags.intersects(WordFlags::NOT_SUGGESTIBLE)
    }

    /// May this entry stand alone as a word without any affixes?
    pub fn is_standalone(&self) -> bool {
        !self.word_flags.intersects(WordFlags::NOT_STANDALONE)
    }
}

/// The stems of a dictionary, with their flags.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    words: FnvHashMap<String, SmallVec<[StemEntry; 1]>>,
    alphabet: String,
    declared_count: usize,
}

impl Lexicon {
    pub fn new() -> Self {
        Lexicon::default()
    }

    pub fn insert(&mut self, stem: &str, entry: StemEntry) {
        self.words.entry(stem.to_string()).or_default().push(entry);
    }

    pub fn homonyms(&self, stem: &str) -> &[StemEntry] {
        self.words.get(stem).map_or(&[], |v| v.as_slice())
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.words.contains_key(stem)
    }

    /// Number of distinct stems.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The stem count stated on the first line of the dictionary file.
    pub fn declared_count(&self) -> usize {
        self.declared_count
    }

    pub fn stems(&self) -> impl Iterator<Item = (&str, &[StemEntry])> + '_ {
        self.words.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The characters used by the stems, most frequent first.
    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    /// A stem is forbidden if it has entries and all of them are forbidden.
    pub fn is_forbidden(&self, stem: &str) -> bool {
        let homonyms = self.homonyms(stem);
        !homonyms.is_empty() && homonyms.iter().all(StemEntry::is_forbidden)
    }

    /// Does some entry for `stem` stand alone as a word?
    pub fn is_standalone(&self, stem: &str) -> bool {
        self.homonyms(stem).iter().any(StemEntry::is_standalone)
    }

    fn compute_alphabet(&mut self) {
        let mut counts: FnvHashMap<char, usize> = FnvHashMap::default();
        for word in self.words.keys() {
            for c in word.chars() {
                *counts.entry(c).or_default() += 1;
            }
        }
        self.alphabet = counts
            .into_iter()
            .sorted_by(|(c1, n1), (c2, n2)| n2.cmp(n1).then(c1.cmp(c2)))
            .map(|(c, _)| c)
            .collect();
    }
}

/// Split a dictionary line into the word part and the morphological fields.
fn split_morphological_fields(s: &str) -> (&str, Option<&str>) {
    // Parsing these is tricky because they are separated from the
    // word by a space, but the word may itself contain a space.
    // Parse them by recognizing the pattern xx:yyy with a two-char tag.
    let mut last_space = None;
    for (i, c) in s.char_indices() {
        if let Some(spos) = last_space {
            if i - spos == 3 && c == ':' {
                return (&s[..spos], Some(s[spos + 1..].trim()));
            }
            if i - spos <= 2 && c.is_ascii_alphanumeric() {
                continue;
            }
            last_space = None;
        }
        if c == ' ' || c == '\t' {
            last_space = Some(i);
        }
    }
    (s, None)
}

/// Split `word/flags`, where `\/` is a literal slash in the word.
fn split_flags(s: &str) -> (String, &str) {
    let mut word = String::with_capacity(s.len());
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            if c != '/' {
                word.push('\\');
            }
            word.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '/' {
            return (word, &s[i + 1..]);
        } else {
            word.push(c);
        }
    }
    if escaped {
        word.push('\\');
    }
    (word, "")
}

/// Parse the text of a `.dic` file, using the flag format and special
/// flags of `aff`.
pub fn parse_dictionary(text: &str, aff: &AffixRuleSet) -> Result<Lexicon> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
    let first = match lines.next() {
        Some(first) => first.trim(),
        None => bail!("Dictionary is empty"),
    };
    let declared_count = match first.split_whitespace().next().map(str::parse::<usize>) {
        Some(Ok(n)) => n,
        _ => bail!("Expected word count on first line, got {}", first),
    };

    let mut lex = Lexicon::new();
    let mut entries = 0;
    let mut dropped_flags = 0;
    for line in lines {
        if line.starts_with('\t') {
            // comment
            continue;
        }
        let (word, _morphs) = split_morphological_fields(line.trim_end());
        let (word, flagstr) = split_flags(word);
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        // Flags that don't parse, or that nothing uses, are dropped.
        let affix_flags: SmallVec<[AffixFlag; 4]> = match aff.resolve_flags(flagstr.trim()) {
            Ok(flags) => flags
                .into_iter()
                .filter(|f| {
                    let known = aff.is_known_flag(*f);
                    if !known {
                        dropped_flags += 1;
                    }
                    known
                })
                .collect(),
            Err(e) => {
                log::debug!("ignoring flags of {}: {:#}", word, e);
                dropped_flags += 1;
                SmallVec::new()
            }
        };
        let word_flags = aff.special_flags.word_flags(&affix_flags);
        lex.insert(word, StemEntry::new(word_flags, affix_flags));
        entries += 1;
    }
    if entries != declared_count {
        log::debug!(
            "dictionary declares {} entries but has {}",
            declared_count,
            entries
        );
    }
    if dropped_flags > 0 {
        log::debug!("dropped {} unknown flags", dropped_flags);
    }
    lex.declared_count = declared_count;
    lex.compute_alphabet();
    Ok(lex)
}
