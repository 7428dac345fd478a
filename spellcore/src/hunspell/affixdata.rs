use anyhow::{anyhow, bail, Result};
use fnv::{FnvHashMap, FnvHashSet};
use itertools::Itertools;

use crate::affix_trie::{PrefixTrie, SuffixTrie};
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::condition::AffixCondition;
use crate::hunspell::replacements::Replacements;
use crate::hunspell::wordflags::WordFlags;

/// Represents the format of the flags after words in the dictionary file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlagMode {
    /// Single-character flags
    #[default]
    CharFlags,
    /// Two-character flags
    DoubleCharFlags,
    /// Flags are comma-separated ASCII integers
    NumericFlags,
    /// Flags are Unicode codepoints in UTF-8 format
    Utf8Flags,
}

pub type AffixFlag = u32;

/// Index into `AffixRuleSet::prefixes` or `AffixRuleSet::suffixes`.
pub type RuleId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

/// One `PFX` or `SFX` entry.
#[derive(Clone, Debug)]
pub struct AffixRule {
    pub kind: AffixKind,
    pub flag: AffixFlag,
    /// May combine with an affix of the other kind on the same stem.
    pub allow_cross: bool,
    /// Removed from the stem before `add` is attached.
    pub strip: String,
    pub add: String,
    pub condition: AffixCondition,
    /// Sorted continuation flags.
    pub contflags: Vec<AffixFlag>,
}

impl AffixRule {
    pub fn has_contflag(&self, flag: Option<AffixFlag>) -> bool {
        match flag {
            Some(flag) => self.contflags.binary_search(&flag).is_ok(),
            None => false,
        }
    }

    /// Undo this rule on `word`, returning the stem it must have come from.
    /// The caller has already established that `add` is present.
    pub fn to_stem(&self, word: &str) -> Option<String> {
        let stem = match self.kind {
            AffixKind::Prefix => {
                let rest = word.strip_prefix(self.add.as_str())?;
                let mut stem = String::with_capacity(self.strip.len() + rest.len());
                stem.push_str(&self.strip);
                stem.push_str(rest);
                stem
            }
            AffixKind::Suffix => {
                let rest = word.strip_suffix(self.add.as_str())?;
                let mut stem = String::with_capacity(rest.len() + self.strip.len());
                stem.push_str(rest);
                stem.push_str(&self.strip);
                stem
            }
        };
        let cond_ok = match self.kind {
            AffixKind::Prefix => self.condition.prefix_match(&stem),
            AffixKind::Suffix => self.condition.suffix_match(&stem),
        };
        cond_ok.then_some(stem)
    }
}

/// The flags that the affix file gives special meaning to.
#[derive(Clone, Debug, Default)]
pub struct SpecialFlags {
    pub forbidden: Option<AffixFlag>,
    pub no_suggest: Option<AffixFlag>,
    pub need_affix: Option<AffixFlag>,
    pub keep_case: Option<AffixFlag>,
    pub only_in_compound: Option<AffixFlag>,
    pub circumfix: Option<AffixFlag>,
    pub compound_flag: Option<AffixFlag>,
    pub compound_begin: Option<AffixFlag>,
    pub compound_middle: Option<AffixFlag>,
    pub compound_end: Option<AffixFlag>,
    pub compound_permit: Option<AffixFlag>,
    pub warn: Option<AffixFlag>,
}

impl SpecialFlags {
    fn table(&self) -> [(Option<AffixFlag>, WordFlags); 12] {
        [
            (self.forbidden, WordFlags::Forbidden),
            (self.no_suggest, WordFlags::NoSuggest),
            (self.need_affix, WordFlags::NeedAffix),
            (self.keep_case, WordFlags::KeepCase),
            (self.only_in_compound, WordFlags::OnlyInCompound),
            (self.circumfix, WordFlags::Circumfix),
            (self.compound_flag, WordFlags::CompoundFlag),
            (self.compound_begin, WordFlags::CompoundBegin),
            (self.compound_middle, WordFlags::CompoundMiddle),
            (self.compound_end, WordFlags::CompoundEnd),
            (self.compound_permit, WordFlags::CompoundPermit),
            (self.warn, WordFlags::Warn),
        ]
    }

    /// Translate a stem's affix flags into its word-class flags.
    pub fn word_flags(&self, flags: &[AffixFlag]) -> WordFlags {
        let mut wf = WordFlags::empty();
        for (flag, bit) in self.table() {
            if let Some(flag) = flag {
                if flags.contains(&flag) {
                    wf |= bit;
                }
            }
        }
        wf
    }

    pub fn contains(&self, flag: AffixFlag) -> bool {
        self.table().iter().any(|(f, _)| *f == Some(flag))
    }
}

/// Everything parsed from a `.aff` file.
#[derive(Clone, Debug, Default)]
pub struct AffixRuleSet {
    /// Character encoding declared by `SET`, normalized to upper case.
    pub encoding: String,
    /// The valid formats for flags used in this affix file
    pub flag_mode: FlagMode,
    /// Flag sets declared with `AF`, referenced by 1-based number.
    pub flag_aliases: Vec<Vec<AffixFlag>>,
    pub special_flags: SpecialFlags,
    prefixes: Vec<AffixRule>,
    suffixes: Vec<AffixRule>,
    prefix_index: PrefixTrie<RuleId>,
    suffix_index: SuffixTrie<RuleId>,
    prefix_flags: FnvHashMap<AffixFlag, Vec<RuleId>>,
    suffix_flags: FnvHashMap<AffixFlag, Vec<RuleId>>,
    /// Replacements to try when suggesting words
    pub replacements: Replacements,
    /// keyboard layout rows, separated by `|`, used to suggest spelling fixes.
    pub keyboard_string: Option<String>,
    /// letters to try when suggesting fixes, from common to rare.
    pub try_string: Option<String>,
    /// extra letters that may be part of words.
    pub extra_word_string: Option<String>,
    /// The minimum length of words in compound words.
    pub compound_min: usize,
    pub compound_rules: Vec<CompoundRule>,
    compound_rule_flags: FnvHashSet<AffixFlag>,
    /// Groups of related characters or strings, most likely confusions first.
    pub related_chars: Vec<Vec<String>>,
    /// Patterns at which a word may be split and each piece checked.
    pub word_breaks: Vec<String>,
    /// Conversions applied to input words before checking.
    pub iconv: Replacements,
    /// Conversions applied to suggestions before returning them.
    pub oconv: Replacements,
    /// Allow affixes to completely remove a root
    pub fullstrip: bool,
    /// German sharp s handling. Parsed but not acted on.
    pub check_sharps: bool,
}

impl AffixRuleSet {
    pub fn new() -> Self {
        AffixRuleSet {
            encoding: "UTF-8".to_string(),
            compound_min: 3,
            ..Default::default()
        }
    }

    pub fn add_rule(&mut self, rule: AffixRule) {
        match rule.kind {
            AffixKind::Prefix => {
                let id = self.prefixes.len();
                self.prefix_index.insert(&rule.add, id);
                self.prefix_flags.entry(rule.flag).or_default().push(id);
                self.prefixes.push(rule);
            }
            AffixKind::Suffix => {
                let id = self.suffixes.len();
                self.suffix_index.insert(&rule.add, id);
                self.suffix_flags.entry(rule.flag).or_default().push(id);
                self.suffixes.push(rule);
            }
        }
    }

    pub fn add_compound_rule(&mut self, rule: CompoundRule) {
        self.compound_rule_flags.extend(rule.flags());
        self.compound_rules.push(rule);
    }

    pub fn prefix(&self, id: RuleId) -> &AffixRule {
        &self.prefixes[id]
    }

    pub fn suffix(&self, id: RuleId) -> &AffixRule {
        &self.suffixes[id]
    }

    pub fn prefix_count(&self) -> usize {
        self.prefixes.len()
    }

    pub fn suffix_count(&self) -> usize {
        self.suffixes.len()
    }

    /// Visit the prefix rules whose added text starts `word`.
    pub fn matching_prefixes(&self, word: &str, found: impl FnMut(RuleId) -> bool) -> bool {
        self.prefix_index.lookup(word, found)
    }

    /// Visit the suffix rules whose added text ends `word`.
    pub fn matching_suffixes(&self, word: &str, found: impl FnMut(RuleId) -> bool) -> bool {
        self.suffix_index.lookup(word, found)
    }

    /// Is `flag` used by anything in this rule set?
    pub fn is_known_flag(&self, flag: AffixFlag) -> bool {
        self.prefix_flags.contains_key(&flag)
            || self.suffix_flags.contains_key(&flag)
            || self.compound_rule_flags.contains(&flag)
            || self.special_flags.contains(flag)
    }

    pub fn parse_flags(&self, flags: &str) -> Result<Vec<AffixFlag>> {
        match self.flag_mode {
            FlagMode::CharFlags | FlagMode::Utf8Flags => {
                Ok(flags.chars().map(|c| c as u32).collect())
            }
            FlagMode::DoubleCharFlags => flags
                .chars()
                .chunks(2)
                .into_iter()
                .map(|pair| {
                    let pair: Vec<u32> = pair.map(|c| c as u32).collect();
                    match pair[..] {
                        [c1, c2] if c1 <= 255 && c2 <= 255 => Ok(c1 * 256 + c2),
                        [_, _] => bail!("Invalid characters in double flag {}", flags),
                        _ => bail!("Odd number of characters in double flags {}", flags),
                    }
                })
                .collect(),
            FlagMode::NumericFlags => flags
                .split(',')
                .filter(|d| !d.is_empty())
                .map(|d| {
                    d.trim()
                        .parse::<AffixFlag>()
                        .map_err(|e| anyhow!("Bad numeric flag {}: {}", d, e))
                })
                .collect(),
        }
    }

    /// Like `parse_flags`, but a plain number refers to an `AF` alias when
    /// aliases were declared.
    pub fn resolve_flags(&self, flags: &str) -> Result<Vec<AffixFlag>> {
        if !self.flag_aliases.is_empty() && !flags.is_empty() {
            if let Ok(n) = flags.parse::<usize>() {
                return match n.checked_sub(1).and_then(|i| self.flag_aliases.get(i)) {
                    Some(aliased) => Ok(aliased.clone()),
                    None => Err(anyhow!("Unknown flag alias {}", n)),
                };
            }
        }
        self.parse_flags(flags)
    }

    /// Parse a single flag, as used in `PFX`/`SFX` headers and special flag
    /// declarations.
    pub fn parse_one_flag(&self, flag: &str) -> Result<AffixFlag> {
        let v = self.parse_flags(flag)?;
        match v[..] {
            [f] => Ok(f),
            _ => bail!("Expected a single flag, got {}", flag),
        }
    }

    /// The break patterns in effect. Without a `BREAK` table hunspell breaks
    /// at hyphens.
    pub fn effective_word_breaks(&self) -> Vec<&str> {
        if self.word_breaks.is_empty() {
            vec!["-", "^-", "-$"]
        } else {
            self.word_breaks.iter().map(String::as_str).collect()
        }
    }
}
