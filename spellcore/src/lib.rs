#![warn(missing_debug_implementations)]

mod affix_trie;
pub mod api;
pub mod cache;
pub mod checker;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod hunspell;
pub mod ngram;
pub mod overrides;
pub mod suggest;

pub use crate::api::{CheckRequest, CheckResponse, SuggestResponse, SuggestionMap};
pub use crate::cache::DictionaryCache;
pub use crate::checker::{SpellChecker, WordVerdict};
pub use crate::config::{Language, SpellConfig, TextDirection};
pub use crate::dictionary::{parse, LoadedDictionary};
pub use crate::error::SpellError;
pub use crate::hunspell::affixdata::AffixRuleSet;
pub use crate::hunspell::lexicon::Lexicon;
pub use crate::overrides::{NoOverrides, OverrideVerdict, Overrides, WordList};
pub use crate::suggest::SuggestionEngine;
