use anyhow::{bail, Result};

use crate::hunspell::affixdata::AffixFlag;

/// One `COMPOUNDRULE` pattern: a sequence of flags, each optionally
/// followed by `*` (any number of parts) or `?` (zero or one part).
/// Multi-character flags are written in parentheses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundRule {
    v: Vec<CompoundElement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CompoundElement {
    Multi(AffixFlag),
    Optional(AffixFlag),
    Once(AffixFlag),
}
use CompoundElement::*;

impl CompoundRule {
    pub fn parse(
        s: &str,
        parse_flags: impl Fn(&str) -> Result<Vec<AffixFlag>>,
    ) -> Result<Self> {
        let mut v: Vec<CompoundElement> = Vec::new();
        let mut paren_start = None;
        for (i, c) in s.char_indices() {
            if let Some(ppos) = paren_start {
                if c == ')' {
                    let flag = parse_flags(&s[ppos..i])?;
                    if flag.len() != 1 {
                        bail!("COMPOUNDRULE: expected 1 flag in {}", s);
                    }
                    v.push(Once(flag[0]));
                    paren_start = None;
                }
            } else if c == '(' {
                paren_start = Some(i + c.len_utf8());
            } else if c == '*' || c == '?' {
                let node = match v.pop() {
                    Some(Once(f)) if c == '*' => Multi(f),
                    Some(Once(f)) => Optional(f),
                    _ => bail!("COMPOUNDRULE: {} must follow a flag in {}", c, s),
                };
                v.push(node);
            } else {
                let flag = parse_flags(&s[i..i + c.len_utf8()])?;
                if flag.len() != 1 {
                    bail!("COMPOUNDRULE: bad flag in {}", s);
                }
                v.push(Once(flag[0]));
            }
        }
        if paren_start.is_some() {
            bail!("COMPOUNDRULE: unclosed parenthesis in {}", s);
        }
        Ok(CompoundRule { v })
    }

    pub fn flags(&self) -> impl Iterator<Item = AffixFlag> + '_ {
        self.v.iter().map(|e| match e {
            Multi(f) | Optional(f) | Once(f) => *f,
        })
    }

    fn _matches(
        &self,
        words: &[&str],
        pos: usize,
        partial: bool,
        check: &impl Fn(&str, AffixFlag) -> bool,
    ) -> bool {
        if let Some(word) = words.first() {
            match self.v.get(pos) {
                None => false,
                Some(Once(f)) => {
                    check(word, *f)
                        && self._matches(&words[1..], pos + 1, partial, check)
                }
                Some(Optional(f)) => {
                    (check(word, *f)
                        && self._matches(&words[1..], pos + 1, partial, check))
                        || self._matches(words, pos + 1, partial, check)
                }
                Some(Multi(f)) => {
                    (check(word, *f)
                        && self._matches(&words[1..], pos, partial, check))
                        || self._matches(words, pos + 1, partial, check)
                }
            }
        } else if partial {
            true
        } else {
            self.v[pos..].iter().all(|e| !matches!(e, Once(_)))
        }
    }

    /// Do the `words` form a complete compound under this rule?
    pub fn matches(
        &self,
        words: &[&str],
        check: impl Fn(&str, AffixFlag) -> bool,
    ) -> bool {
        self._matches(words, 0, false, &check)
    }

    /// Could the `words` be the first parts of a compound under this rule?
    pub fn partial_match(
        &self,
        words: &[&str],
        check: impl Fn(&str, AffixFlag) -> bool,
    ) -> bool {
        self._matches(words, 0, true, &check)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn char_flags(s: &str) -> Result<Vec<AffixFlag>> {
        Ok(s.chars().map(|c| c as u32).collect())
    }

    fn has(word: &str, flag: AffixFlag) -> bool {
        // digits carry flag 'n', the word "th" carries flag 't'
        match char::from_u32(flag) {
            Some('n') => word.chars().all(|c| c.is_ascii_digit()),
            Some('t') => word == "th",
            _ => false,
        }
    }

    #[test]
    fn test_ordinal_rule() {
        let rule = CompoundRule::parse("n*t", char_flags).unwrap();
        assert!(rule.matches(&["1", "2", "th"], has));
        assert!(rule.matches(&["th"], has));
        assert!(!rule.matches(&["1", "2"], has));
        assert!(rule.partial_match(&["1", "2"], has));
        assert!(!rule.partial_match(&["th", "1"], has));
    }

    #[test]
    fn test_bad_rules() {
        assert!(CompoundRule::parse("*n", char_flags).is_err());
        assert!(CompoundRule::parse("(nn", char_flags).is_err());
        let rule = CompoundRule::parse("(n)?(t)", char_flags).unwrap();
        assert_eq!(vec!['n' as u32, 't' as u32], rule.flags().collect::<Vec<_>>());
    }
}
