//! Byte tries over affix strings, used to find the affix rules whose added
//! text matches the start or end of a word without scanning every rule.
//!
//! Children are kept in a small sorted vector.

#[derive(Clone, Debug, Default)]
pub struct SuffixTrie<T> {
    end_here: Vec<T>,
    more: Vec<(u8, SuffixTrie<T>)>,
}

impl<T: Copy + Default> SuffixTrie<T> {
    pub fn insert(&mut self, suffix: &str, t: T) {
        let mut ptr = self;
        for b in suffix.bytes().rev() {
            ptr = child_mut(&mut ptr.more, b);
        }
        ptr.end_here.push(t);
    }

    /// Calls `found` for every value whose key is a suffix of `word`,
    /// shortest keys first. Stops as soon as `found` returns true.
    pub fn lookup(&self, word: &str, mut found: impl FnMut(T) -> bool) -> bool {
        let mut ptr = self;
        let mut bytes = word.bytes().rev();
        loop {
            if ptr.end_here.iter().any(|t| found(*t)) {
                return true;
            }
            match bytes.next().and_then(|b| child(&ptr.more, b)) {
                Some(next) => ptr = next,
                None => return false,
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PrefixTrie<T> {
    end_here: Vec<T>,
    more: Vec<(u8, PrefixTrie<T>)>,
}

impl<T: Copy + Default> PrefixTrie<T> {
    pub fn insert(&mut self, prefix: &str, t: T) {
        let mut ptr = self;
        for b in prefix.bytes() {
            ptr = child_mut(&mut ptr.more, b);
        }
        ptr.end_here.push(t);
    }

    /// Calls `found` for every value whose key is a prefix of `word`,
    /// shortest keys first. Stops as soon as `found` returns true.
    pub fn lookup(&self, word: &str, mut found: impl FnMut(T) -> bool) -> bool {
        let mut ptr = self;
        let mut bytes = word.bytes();
        loop {
            if ptr.end_here.iter().any(|t| found(*t)) {
                return true;
            }
            match bytes.next().and_then(|b| child(&ptr.more, b)) {
                Some(next) => ptr = next,
                None => return false,
            }
        }
    }
}

fn child<N>(more: &[(u8, N)], b: u8) -> Option<&N> {
    more.binary_search_by_key(&b, |(k, _)| *k)
        .ok()
        .map(|i| &more[i].1)
}

fn child_mut<N: Default>(more: &mut Vec<(u8, N)>, b: u8) -> &mut N {
    let i = match more.binary_search_by_key(&b, |(k, _)| *k) {
        Ok(i) => i,
        Err(i) => {
            more.insert(i, (b, N::default()));
            i
        }
    };
    &mut more[i].1
}
