//! Parser for hunspell-format .aff files

use anyhow::{anyhow, bail, Context, Result};
use fnv::FnvHashMap;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, one_of, space0, space1};
use nom::combinator::{cut, eof, map, opt, peek, rest, value};
use nom::error::{ErrorKind, ParseError};
use nom::sequence::{pair, preceded, separated_pair, terminated, tuple};
use nom::{Err, Finish, IResult};
use std::fmt;

use crate::hunspell::affixdata::{
    AffixFlag, AffixKind, AffixRule, AffixRuleSet, FlagMode,
};
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::condition::AffixCondition;

type Input<'a> = &'a str;
type PResult<'a, O> = IResult<Input<'a>, O, AffError>;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Debug)]
struct AffError {
    message: String,
}

impl AffError {
    fn new(message: &str) -> Self {
        AffError {
            message: message.to_string(),
        }
    }
}

impl<'a> ParseError<Input<'a>> for AffError {
    fn from_error_kind(input: Input, kind: ErrorKind) -> Self {
        let message = format!("{:?} at: {}", kind, input);
        AffError { message }
    }

    fn append(_input: Input, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl fmt::Display for AffError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug)]
enum AffixLine<'a> {
    Empty,
    Ignored(&'a str),
    SetEncoding(&'a str),
    SetFlagMode(FlagMode),
    SetKeyboardString(&'a str),
    SetTryString(&'a str),
    SetExtraWordString(&'a str),
    SetFlag(&'a str, &'a str),
    SetCompoundMin(u32),
    AddAlias(&'a str),
    AddIconv((&'a str, &'a str)),
    AddOconv((&'a str, &'a str)),
    AddReplacement((&'a str, &'a str)),
    AddCompoundRule(&'a str),
    AddRelatedChars(&'a str),
    AddWordBreaks(&'a str),
    SetFullstrip,
    SetCheckSharps,
    AffixHeader {
        kind: AffixKind,
        flag: &'a str,
        cross: bool,
    },
    AddAffix {
        kind: AffixKind,
        flag: &'a str,
        strip: &'a str,
        add: &'a str,
        cond: Option<&'a str>,
    },
}

fn value_string(s: Input) -> PResult<&str> {
    take_till1(|c: char| c.is_whitespace())(s)
}

fn sp(s: Input) -> PResult<&str> {
    space1(s)
}

fn number(s: Input) -> PResult<u32> {
    nom::character::complete::u32(s)
}

fn comment(s: Input) -> PResult<()> {
    value((), preceded(char('#'), rest))(s)
}

/// Whatever may follow the meaningful part of a line.
fn ending(s: Input) -> PResult<()> {
    value((), tuple((space0, opt(comment), eof)))(s)
}

fn key_tag<'a>(key: &'static str, s: Input<'a>) -> PResult<'a, ()> {
    value((), pair(tag(key), space1))(s)
}

/// Turn a recoverable error into a hard failure, so that a line whose
/// keyword was recognized is not retried as some other kind of line.
fn committed<O>(r: PResult<O>) -> PResult<O> {
    match r {
        Err(Err::Error(e)) => Err(Err::Failure(e)),
        rest => rest,
    }
}

/// Parse a line starting with a keyword and then a value.
/// Takes the tag for the keyword, and a parser for the value.
/// Returns the result of the value parser.
fn keyword<'a, O>(
    key: &'static str,
    mut value: impl FnMut(Input<'a>) -> PResult<'a, O>,
) -> impl FnMut(Input<'a>) -> PResult<'a, O> {
    move |s: Input<'a>| {
        let (s, _) = key_tag(key, s)?;
        committed(value(s))
    }
}

/// Parse a line that is a table entry. Each line of a table
/// starts with the same keyword. The first line holds the
/// number of entries that follow, which we ignore.
///
/// Returns `AffixLine::Empty` for the first line, and the result of `conv`
/// for the following lines.
fn table_line<'a, O>(
    key: &'static str,
    mut value: impl FnMut(Input<'a>) -> PResult<'a, O>,
    conv: impl Fn(O) -> AffixLine<'a>,
) -> impl FnMut(Input<'a>) -> PResult<'a, AffixLine<'a>> {
    move |s: Input<'a>| {
        let (s, _) = key_tag(key, s)?;
        if let Ok((s, _)) = terminated(number, peek(ending))(s) {
            return Ok((s, AffixLine::Empty));
        }
        committed(map(&mut value, &conv)(s))
    }
}

fn value_pair(s: Input) -> PResult<(&str, &str)> {
    separated_pair(value_string, sp, value_string)(s)
}

const FLAG_NAMES: [&str; 12] = [
    "FORBIDDENWORD",
    "NOSUGGEST",
    "NEEDAFFIX",
    "KEEPCASE",
    "ONLYINCOMPOUND",
    "CIRCUMFIX",
    "COMPOUNDFLAG",
    "COMPOUNDBEGIN",
    "COMPOUNDMIDDLE",
    "COMPOUNDEND",
    "COMPOUNDPERMITFLAG",
    "WARN",
];

fn assign_flag(s: Input) -> PResult<AffixLine> {
    let (s, key) = value_string(s)?;
    if !FLAG_NAMES.contains(&key) {
        return Err(Err::Error(AffError::new("Keyword not a known flag")));
    }
    let (s, _) = sp(s)?;
    let (s, v) = cut(value_string)(s)?;
    Ok((s, AffixLine::SetFlag(key, v)))
}

fn flag_mode(s: Input) -> PResult<FlagMode> {
    alt((
        value(FlagMode::DoubleCharFlags, tag("long")),
        value(FlagMode::NumericFlags, tag("num")),
        value(FlagMode::Utf8Flags, tag("UTF-8")),
    ))(s)
}

fn blank(s: Input) -> PResult<AffixLine> {
    value(AffixLine::Empty, peek(ending))(s)
}

fn set_encoding(s: Input) -> PResult<AffixLine> {
    map(keyword("SET", value_string), AffixLine::SetEncoding)(s)
}

fn set_flag_mode(s: Input) -> PResult<AffixLine> {
    map(keyword("FLAG", flag_mode), AffixLine::SetFlagMode)(s)
}

fn set_keyboard_string(s: Input) -> PResult<AffixLine> {
    map(keyword("KEY", value_string), AffixLine::SetKeyboardString)(s)
}

fn set_try_string(s: Input) -> PResult<AffixLine> {
    map(keyword("TRY", value_string), AffixLine::SetTryString)(s)
}

fn set_extra_word_string(s: Input) -> PResult<AffixLine> {
    map(keyword("WORDCHARS", value_string), AffixLine::SetExtraWordString)(s)
}

fn set_compound_min(s: Input) -> PResult<AffixLine> {
    map(keyword("COMPOUNDMIN", number), AffixLine::SetCompoundMin)(s)
}

fn add_alias(s: Input) -> PResult<AffixLine> {
    table_line("AF", value_string, AffixLine::AddAlias)(s)
}

fn add_iconv(s: Input) -> PResult<AffixLine> {
    table_line("ICONV", value_pair, AffixLine::AddIconv)(s)
}

fn add_oconv(s: Input) -> PResult<AffixLine> {
    table_line("OCONV", value_pair, AffixLine::AddOconv)(s)
}

fn add_replacement(s: Input) -> PResult<AffixLine> {
    table_line("REP", value_pair, AffixLine::AddReplacement)(s)
}

fn add_compound_rule(s: Input) -> PResult<AffixLine> {
    table_line("COMPOUNDRULE", value_string, AffixLine::AddCompoundRule)(s)
}

fn add_related_chars(s: Input) -> PResult<AffixLine> {
    table_line("MAP", value_string, AffixLine::AddRelatedChars)(s)
}

fn add_word_breaks(s: Input) -> PResult<AffixLine> {
    table_line("BREAK", value_string, AffixLine::AddWordBreaks)(s)
}

fn set_fullstrip(s: Input) -> PResult<AffixLine> {
    value(AffixLine::SetFullstrip, terminated(tag("FULLSTRIP"), peek(ending)))(s)
}

fn set_checksharps(s: Input) -> PResult<AffixLine> {
    value(AffixLine::SetCheckSharps, terminated(tag("CHECKSHARPS"), peek(ending)))(s)
}

fn affix_header(s: Input) -> PResult<bool> {
    terminated(
        map(separated_pair(one_of("YN"), sp, number), |(yn, _)| yn == 'Y'),
        peek(ending),
    )(s)
}

/// `strip add[/flags] [condition [morphology...]]`
fn affix_entry(s: Input) -> PResult<(&str, &str, Option<&str>)> {
    let (s, strip) = value_string(s)?;
    let (s, _) = sp(s)?;
    let (s, add) = value_string(s)?;
    let (s, cond) = opt(preceded(sp, value_string))(s)?;
    // Morphological fields are not used.
    let (s, _) = rest(s)?;
    Ok((s, (strip, add, cond.filter(|c| !c.starts_with('#')))))
}

fn add_affix<'a>(
    key: &'static str,
    kind: AffixKind,
) -> impl FnMut(Input<'a>) -> PResult<'a, AffixLine<'a>> {
    move |s: Input<'a>| {
        let (s, _) = key_tag(key, s)?;
        let (s, flag) = committed(value_string(s))?;
        let (s, _) = committed(sp(s))?;
        if let Ok((s, cross)) = affix_header(s) {
            return Ok((s, AffixLine::AffixHeader { kind, flag, cross }));
        }
        let (s, (strip, add, cond)) = committed(affix_entry(s))?;
        Ok((
            s,
            AffixLine::AddAffix {
                kind,
                flag,
                strip,
                add,
                cond,
            },
        ))
    }
}

/// Keywords this parser has no use for (LANG, NAME, PHONE, AM, ...).
fn ignored(s: Input) -> PResult<AffixLine> {
    let (s, key) = value_string(s)?;
    let (s, _) = rest(s)?;
    Ok((s, AffixLine::Ignored(key)))
}

fn line(s: Input) -> PResult<AffixLine> {
    alt((
        blank,
        set_encoding,
        set_flag_mode,
        set_keyboard_string,
        set_try_string,
        set_extra_word_string,
        set_compound_min,
        add_alias,
        add_iconv,
        add_oconv,
        add_replacement,
        add_compound_rule,
        add_related_chars,
        add_word_breaks,
        set_fullstrip,
        set_checksharps,
        add_affix("PFX", AffixKind::Prefix),
        add_affix("SFX", AffixKind::Suffix),
        assign_flag,
        ignored,
    ))(s)
}

/// `0` stands for the empty string in affix entries.
fn zero_empty(s: &str) -> &str {
    if s == "0" {
        ""
    } else {
        s
    }
}

#[derive(Default)]
struct AffixFileState {
    /// Cross-product permission of each `PFX`/`SFX` block header seen.
    headers: FnvHashMap<(bool, AffixFlag), bool>,
}

fn apply_line(d: &mut AffixRuleSet, st: &mut AffixFileState, l: AffixLine) -> Result<()> {
    match l {
        AffixLine::Empty => (),
        AffixLine::Ignored(key) => log::debug!("ignoring affix keyword {}", key),
        AffixLine::SetEncoding(enc) => d.encoding = enc.to_ascii_uppercase(),
        AffixLine::SetFlagMode(fm) => d.flag_mode = fm,
        AffixLine::SetKeyboardString(k) => d.keyboard_string = Some(k.to_string()),
        AffixLine::SetTryString(t) => d.try_string = Some(t.to_string()),
        AffixLine::SetExtraWordString(t) => d.extra_word_string = Some(t.to_string()),
        AffixLine::SetFlag(key, v) => {
            let flag = Some(d.parse_one_flag(v)?);
            let sf = &mut d.special_flags;
            match key {
                "FORBIDDENWORD" => sf.forbidden = flag,
                "NOSUGGEST" => sf.no_suggest = flag,
                "NEEDAFFIX" => sf.need_affix = flag,
                "KEEPCASE" => sf.keep_case = flag,
                "ONLYINCOMPOUND" => sf.only_in_compound = flag,
                "CIRCUMFIX" => sf.circumfix = flag,
                "COMPOUNDFLAG" => sf.compound_flag = flag,
                "COMPOUNDBEGIN" => sf.compound_begin = flag,
                "COMPOUNDMIDDLE" => sf.compound_middle = flag,
                "COMPOUNDEND" => sf.compound_end = flag,
                "COMPOUNDPERMITFLAG" => sf.compound_permit = flag,
                "WARN" => sf.warn = flag,
                _ => bail!("Unhandled flag keyword {}", key),
            }
        }
        AffixLine::SetCompoundMin(v) => d.compound_min = (v as usize).max(1),
        AffixLine::AddAlias(v) => {
            let flags = d.parse_flags(v)?;
            d.flag_aliases.push(flags);
        }
        AffixLine::AddIconv((from, to)) => d.iconv.push(from, to),
        AffixLine::AddOconv((from, to)) => d.oconv.push(from, to),
        AffixLine::AddReplacement((from, to)) => d.replacements.push(from, to),
        AffixLine::AddCompoundRule(v) => {
            let rule = CompoundRule::parse(v, |f| d.parse_flags(f))?;
            d.add_compound_rule(rule);
        }
        AffixLine::AddRelatedChars(v) => d.related_chars.push(related_group(v)),
        AffixLine::AddWordBreaks(v) => d.word_breaks.push(v.to_string()),
        AffixLine::SetFullstrip => d.fullstrip = true,
        AffixLine::SetCheckSharps => d.check_sharps = true,
        AffixLine::AffixHeader { kind, flag, cross } => {
            let flag = d.parse_one_flag(flag)?;
            st.headers.insert((kind == AffixKind::Prefix, flag), cross);
        }
        AffixLine::AddAffix {
            kind,
            flag,
            strip,
            add,
            cond,
        } => {
            let flag = d.parse_one_flag(flag)?;
            let allow_cross = *st
                .headers
                .get(&(kind == AffixKind::Prefix, flag))
                .ok_or_else(|| anyhow!("Affix entry without a header"))?;
            let (add, contflags) = match add.split_once('/') {
                Some((add, cont)) => (add, d.resolve_flags(cont)?),
                None => (add, Vec::new()),
            };
            let mut contflags = contflags;
            contflags.sort_unstable();
            contflags.dedup();
            d.add_rule(AffixRule {
                kind,
                flag,
                allow_cross,
                strip: zero_empty(strip).to_string(),
                add: zero_empty(add).to_string(),
                condition: AffixCondition::new(cond.unwrap_or(".")),
                contflags,
            });
        }
    };
    Ok(())
}

pub fn parse_affix_data(text: &str) -> Result<AffixRuleSet> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut d = AffixRuleSet::new();
    let mut st = AffixFileState::default();
    for (nr, raw) in text.lines().enumerate() {
        let l = match terminated(line, ending)(raw.trim_start()).finish() {
            Ok((_, l)) => l,
            Err(e) => bail!("line {}: {}", nr + 1, e),
        };
        apply_line(&mut d, &mut st, l).with_context(|| format!("line {}", nr + 1))?;
    }
    log::debug!(
        "parsed affix data: {} prefixes, {} suffixes, {} replacements",
        d.prefix_count(),
        d.suffix_count(),
        d.replacements.len()
    );
    Ok(d)
}

/// Split a `MAP` value into its members. Each member is a single char
/// or a parenthesised string, as in `(ß)(ss)`.
fn related_group(v: &str) -> Vec<String> {
    let mut group = Vec::new();
    let mut chars = v.chars();
    while let Some(c) = chars.next() {
        if c == '(' {
            let unit: String = chars.by_ref().take_while(|c| *c != ')').collect();
            if !unit.is_empty() {
                group.push(unit);
            }
        } else {
            group.push(c.to_string());
        }
    }
    group
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = "\u{FEFF}SET UTF-8
# a comment
TRY esianrtolcdugmphbyfvkwz
LANG en_US
NOSUGGEST !
COMPOUNDMIN 1
REP 2
REP f ph
REP ^alot$ a_lot

PFX A Y 1
PFX A   0     re         .

SFX D Y 2
SFX D   0     ed         [^ey]   po:verb
SFX D   y     ied        [^aeiou]y
";

    #[test]
    fn test_parse_sample() {
        let d = parse_affix_data(SAMPLE).unwrap();
        assert_eq!(1, d.prefix_count());
        assert_eq!(2, d.suffix_count());
        assert_eq!(2, d.replacements.len());
        assert_eq!(1, d.compound_min);
        assert_eq!(Some('!' as u32), d.special_flags.no_suggest);
        assert_eq!(Some("esianrtolcdugmphbyfvkwz"), d.try_string.as_deref());

        let sfx = d.suffix(1);
        assert_eq!("y", sfx.strip);
        assert_eq!("ied", sfx.add);
        assert!(sfx.allow_cross);
        assert_eq!(Some("apply".to_string()), sfx.to_stem("applied"));
    }

    #[test]
    fn test_contflags_and_long_flags() {
        let d = parse_affix_data(
            "FLAG long\nSFX Aa Y 1\nSFX Aa 0 s/BbCc .\nSFX Bb N 1\nSFX Bb 0 x .\n",
        )
        .unwrap();
        let first = d.suffix(0);
        assert_eq!(('A' as u32) * 256 + 'a' as u32, first.flag);
        assert_eq!(2, first.contflags.len());
        assert!(!d.suffix(1).allow_cross);
    }

    #[test]
    fn test_no_header_is_error() {
        assert!(parse_affix_data("SFX D 0 ed .\n").is_err());
    }

    #[test]
    fn test_bad_lines_report_line_number() {
        let err = parse_affix_data("TRY abc\nFLAG wrong\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));

        let err = parse_affix_data("COMPOUNDMIN many\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 1"));
    }

    #[test]
    fn test_aliases() {
        let d = parse_affix_data("AF 2\nAF AB\nAF C\nSFX A Y 1\nSFX A 0 s/2 .\n").unwrap();
        assert_eq!(2, d.flag_aliases.len());
        assert_eq!(vec!['C' as u32], d.suffix(0).contflags);
    }

    #[test]
    fn test_related_groups() {
        let d = parse_affix_data("MAP 2\nMAP aáà\nMAP (ß)(ss)\n").unwrap();
        assert_eq!(vec!["a", "á", "à"], d.related_chars[0]);
        assert_eq!(vec!["ß", "ss"], d.related_chars[1]);
    }
}
