//! Affix conditions are small regular expressions over single characters:
//! literals, `.` wildcards, `[...]` groups and `[^...]` negated groups.
//! A suffix rule's condition is matched against the end of the stem, a
//! prefix rule's against the start.

#[derive(Clone, Debug, PartialEq, Eq)]
enum CondChar {
    Any,
    Literal(char),
    OneOf(String),
    NoneOf(String),
}

impl CondChar {
    fn accepts(&self, wc: char) -> bool {
        match self {
            CondChar::Any => true,
            CondChar::Literal(c) => *c == wc,
            CondChar::OneOf(s) => s.contains(wc),
            CondChar::NoneOf(s) => !s.contains(wc),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AffixCondition {
    pattern: Vec<CondChar>,
}

impl AffixCondition {
    pub fn new(condition: &str) -> Self {
        // A lone dot is the conventional "no condition".
        if condition == "." {
            return AffixCondition::default();
        }

        #[derive(PartialEq)]
        enum State {
            Outside,
            GroupOpened,
            InGroup { negated: bool, start: usize },
        }
        let mut state = State::Outside;
        let mut pattern = Vec::new();
        for (i, c) in condition.char_indices() {
            match state {
                State::Outside => match c {
                    '[' => state = State::GroupOpened,
                    '.' => pattern.push(CondChar::Any),
                    _ => pattern.push(CondChar::Literal(c)),
                },
                State::GroupOpened => {
                    state = if c == '^' {
                        State::InGroup {
                            negated: true,
                            start: i + 1,
                        }
                    } else {
                        State::InGroup {
                            negated: false,
                            start: i,
                        }
                    };
                }
                State::InGroup { negated, start } => {
                    if c == ']' {
                        let members = condition[start..i].to_string();
                        pattern.push(if negated {
                            CondChar::NoneOf(members)
                        } else {
                            CondChar::OneOf(members)
                        });
                        state = State::Outside;
                    }
                }
            }
        }
        if state != State::Outside {
            // Unterminated group. Such a rule can never apply.
            log::debug!("unterminated group in affix condition {}", condition);
            pattern.push(CondChar::OneOf(String::new()));
        }
        AffixCondition { pattern }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Does the start of `stem` satisfy this condition?
    pub fn prefix_match(&self, stem: &str) -> bool {
        let mut chars = stem.chars();
        self.pattern
            .iter()
            .all(|cc| chars.next().map_or(false, |c| cc.accepts(c)))
    }

    /// Does the end of `stem` satisfy this condition?
    pub fn suffix_match(&self, stem: &str) -> bool {
        let mut chars = stem.chars().rev();
        self.pattern
            .iter()
            .rev()
            .all(|cc| chars.next().map_or(false, |c| cc.accepts(c)))
    }
}
