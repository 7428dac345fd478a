#![allow(non_upper_case_globals)]

use bitflags::bitflags;

bitflags! {
    /// What a stem may be used for, derived from the special flags that
    /// the affix file declares (`FORBIDDENWORD`, `NOSUGGEST`, ...).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WordFlags: u16 {
        /// Never correct, even when other entries would allow it.
        const Forbidden = 0x0001;
        const CompoundBegin = 0x0002;
        const CompoundMiddle = 0x0004;
        const CompoundEnd = 0x0008;
        const CompoundPermit = 0x0010;
        /// Only valid as a part of a compound.
        const OnlyInCompound = 0x0020;
        /// Correct, but never offered as a suggestion.
        const NoSuggest = 0x0040;
        const Circumfix = 0x0080;
        /// Only valid with at least one affix applied.
        const NeedAffix = 0x0100;
        /// Not found through a change of case.
        const KeepCase = 0x0200;
        /// Any position in a flag compound.
        const CompoundFlag = 0x0400;
        const Warn = 0x0800;
    }
}

impl WordFlags {
    /// Entries with any of these cannot be a word by themselves.
    pub const NOT_STANDALONE: WordFlags = WordFlags::Forbidden
        .union(WordFlags::NeedAffix)
        .union(WordFlags::OnlyInCompound);

    /// Entries with any of these are never suggested.
    pub const NOT_SUGGESTIBLE: WordFlags = WordFlags::Forbidden.union(WordFlags::NoSuggest);
}
