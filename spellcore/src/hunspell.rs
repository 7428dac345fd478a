//! Reading hunspell-format `.aff`/`.dic` pairs, and the morphological
//! lookup and candidate generation that work on them.

use anyhow::{anyhow, bail, Context, Result};
use encoding::label::encoding_from_whatwg_label;
use encoding::DecoderTrap;
use unicode_casing::CharExt;

pub mod affixdata;
pub mod compoundrule;
pub mod condition;
pub mod lexicon;
pub mod lookup;
pub mod parse_aff;
pub mod replacements;
pub mod suggcollector;
pub mod suggestions;
pub mod wordflags;

use crate::hunspell::affixdata::AffixRuleSet;
use crate::hunspell::lexicon::{parse_dictionary, Lexicon};
use crate::hunspell::parse_aff::parse_affix_data;

const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapStyle {
    Lowercase,
    Capitalized,
    AllCaps,
    Mixed,
    Neutral,
}

impl CapStyle {
    pub fn detect(word: &str) -> Self {
        let mut iter = word.chars();
        let c1 = match iter.next() {
            Some(c1) => c1,
            None => {
                return CapStyle::Neutral;
            }
        };
        if c1.is_lowercase() {
            for c in iter {
                if c.is_uppercase() || c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            CapStyle::Lowercase
        } else if c1.is_uppercase() {
            let mut seen_ucase = false;
            let mut seen_lcase = false;
            for c in iter {
                if c.is_lowercase() {
                    seen_lcase = true;
                } else if c.is_uppercase() {
                    seen_ucase = true;
                } else if c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            if seen_ucase && seen_lcase {
                CapStyle::Mixed
            } else if seen_lcase {
                CapStyle::Capitalized
            } else {
                CapStyle::AllCaps
            }
        } else if c1.is_titlecase() {
            for c in iter {
                if c.is_uppercase() || c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            CapStyle::Capitalized
        } else {
            // Skip leading digits and punctuation
            CapStyle::detect(&word[c1.len_utf8()..])
        }
    }
}

/// Find the encoding named by the affix file's `SET` line, if any.
/// This has to happen before the file can be decoded, so it works on bytes.
fn declared_encoding(affix: &[u8]) -> Option<String> {
    affix
        .split(|b| *b == b'\n')
        .map(|line| line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line))
        .find_map(|line| {
            let line = line.strip_prefix(b"SET")?;
            if !line.first()?.is_ascii_whitespace() {
                return None;
            }
            let name = String::from_utf8_lossy(line);
            name.split_whitespace().next().map(str::to_string)
        })
}

/// Decode file contents according to a hunspell encoding name.
fn decode(bytes: &[u8], encoding: &str) -> Result<String> {
    let bytes = bytes.strip_prefix(BYTE_ORDER_MARK).unwrap_or(bytes);
    let label = encoding.to_ascii_lowercase();
    if label == "utf-8" || label == "utf8" {
        return String::from_utf8(bytes.to_vec())
            .map_err(|e| anyhow!("Contents are not valid UTF-8: {}", e));
    }
    // hunspell spells windows code pages as microsoft-cp1251
    let label = label.strip_prefix("microsoft-").unwrap_or(&label);
    let decoder = encoding_from_whatwg_label(label)
        .ok_or_else(|| anyhow!("Unsupported encoding {}", encoding))?;
    decoder
        .decode(bytes, DecoderTrap::Strict)
        .map_err(|e| anyhow!("Contents do not match encoding {}: {}", encoding, e))
}

/// Parse an affix file and a dictionary file into their in-memory forms.
/// Both files are decoded with the encoding the affix file declares.
pub fn parse(affix: &[u8], dictionary: &[u8]) -> Result<(AffixRuleSet, Lexicon)> {
    let encoding = declared_encoding(affix).unwrap_or_else(|| "UTF-8".to_string());
    let affix_text = decode(affix, &encoding).context("Could not decode affix data")?;
    let mut rules = parse_affix_data(&affix_text).context("Could not parse affix data")?;
    rules.encoding = encoding.to_ascii_uppercase();

    if dictionary.iter().all(u8::is_ascii_whitespace) {
        bail!("Dictionary is empty");
    }
    let dict_text =
        decode(dictionary, &encoding).context("Could not decode dictionary")?;
    let lexicon = parse_dictionary(&dict_text, &rules).context("Could not parse dictionary")?;
    Ok((rules, lexicon))
}

/// Numbers with optional separators are always accepted.
/// Allows dots or commas between digit groups, `-` in front and `--` at
/// the end.
pub fn is_numeric(word: &str) -> bool {
    let word = word.strip_suffix("--").unwrap_or(word);
    let word = word.strip_prefix('-').unwrap_or(word);
    let mut seen_digit = false;
    let mut any_digit = false;
    for c in word.chars() {
        if c == '.' || c == ',' {
            if !seen_digit {
                return false;
            }
            seen_digit = false;
        } else if c.is_ascii_digit() {
            seen_digit = true;
            any_digit = true;
        } else {
            return false;
        }
    }
    any_digit
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("54"));
        assert!(is_numeric("-1,000.00"));
        assert!(is_numeric("-1,000.--"));
        assert!(!is_numeric("1,ooo"));
        assert!(!is_numeric("100,,000"));
        assert!(!is_numeric(".."));
        assert!(!is_numeric(".50"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("-"));
    }

    #[test]
    fn test_cap_style() {
        assert_eq!(CapStyle::Lowercase, CapStyle::detect("color"));
        assert_eq!(CapStyle::Capitalized, CapStyle::detect("Color"));
        assert_eq!(CapStyle::AllCaps, CapStyle::detect("COLOR"));
        assert_eq!(CapStyle::Mixed, CapStyle::detect("iPod"));
        assert_eq!(CapStyle::Capitalized, CapStyle::detect("'Tis"));
        assert_eq!(CapStyle::Neutral, CapStyle::detect("123"));
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            Some("ISO8859-1".to_string()),
            declared_encoding(b"# comment\nSET ISO8859-1\nTRY abc\n")
        );
        assert_eq!(None, declared_encoding(b"SETTINGS x\n"));
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!("caf\u{e9}", decode(b"caf\xE9", "ISO8859-1").unwrap());
        assert!(decode(b"caf\xE9", "UTF-8").is_err());
        assert!(decode(b"abc", "NO-SUCH-ENCODING").is_err());
    }
}
