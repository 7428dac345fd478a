//! A table of string replacements, as used by the `REP`, `ICONV` and
//! `OCONV` sections of an affix file. Patterns may be anchored to the start
//! of the word with `^` or to the end with `$`.

#[derive(Clone, Debug, Default)]
struct Rep {
    anchor_begin: bool,
    anchor_end: bool,
    from: String,
    to: String,
}

impl Rep {
    /// `rest` is the remainder of the word starting at the candidate
    /// position.
    fn matches(&self, rest: &str, at_start: bool) -> bool {
        if self.anchor_begin && !at_start {
            false
        } else if self.anchor_end {
            rest == self.from
        } else {
            rest.starts_with(&self.from)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Replacements {
    reps: Vec<Rep>,
}

impl Replacements {
    pub fn push(&mut self, from: &str, to: &str) {
        let mut rep = Rep::default();
        let mut from = from;
        if let Some(f) = from.strip_prefix('^') {
            from = f;
            rep.anchor_begin = true;
        }
        if let Some(f) = from.strip_suffix('$') {
            from = f;
            rep.anchor_end = true;
        }
        if from.is_empty() {
            return;
        }
        // Underscores stand for spaces in REP tables.
        rep.from = from.replace('_', " ");
        rep.to = to.replace('_', " ");
        self.reps.push(rep);
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reps.len()
    }

    fn longest_match(&self, rest: &str, at_start: bool) -> Option<&Rep> {
        let mut longest: Option<&Rep> = None;
        for rep in self.reps.iter() {
            if rep.from.len() > longest.map_or(0, |r| r.from.len())
                && rep.matches(rest, at_start)
            {
                longest = Some(rep);
            }
        }
        longest
    }

    /// Apply the table as a conversion: scan left to right and replace the
    /// longest matching pattern at each position.
    pub fn conv(&self, word: &str) -> String {
        if self.reps.is_empty() {
            return word.to_string();
        }
        let mut output = String::with_capacity(word.len());
        let mut skip_to = 0;
        for (i, c) in word.char_indices() {
            if i < skip_to {
                continue;
            }
            if let Some(rep) = self.longest_match(&word[i..], i == 0) {
                output += &rep.to;
                skip_to = i + rep.from.len();
            } else {
                output.push(c);
            }
        }
        output
    }

    /// Offer every single-replacement variant of `word` to `suggest`, in
    /// table order per position. Stops when `suggest` returns false.
    pub fn suggest(&self, word: &str, mut suggest: impl FnMut(String) -> bool) {
        for (i, _) in word.char_indices() {
            for rep in self.reps.iter() {
                if rep.matches(&word[i..], i == 0) {
                    let mut sugg = String::with_capacity(word.len() + rep.to.len());
                    sugg.push_str(&word[..i]);
                    sugg.push_str(&rep.to);
                    sugg.push_str(&word[i + rep.from.len()..]);
                    if !suggest(sugg) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_conv_longest_match() {
        let mut reps = Replacements::default();
        reps.push("a", "b");
        reps.push("aa", "c");
        assert_eq!("cb", reps.conv("aaa"));
        assert_eq!("xyz", reps.conv("xyz"));
    }

    #[test]
    fn test_suggest_anchors() {
        let mut reps = Replacements::default();
        reps.push("^ph", "f");
        reps.push("f$", "ph");
        reps.push("alot", "a_lot");

        let mut v = Vec::new();
        reps.suggest("phoef", |s| {
            v.push(s);
            true
        });
        assert_eq!(vec!["foef".to_string(), "phoeph".to_string()], v);

        let mut v = Vec::new();
        reps.suggest("alot", |s| {
            v.push(s);
            true
        });
        assert_eq!(vec!["a lot".to_string()], v);
    }
}
