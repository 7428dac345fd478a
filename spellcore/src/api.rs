//! Request and response shapes for callers that talk JSON.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::checker::{SpellChecker, WordVerdict};
use crate::config::DEFAULT_LANGUAGE;
use crate::error::{Result, SpellError};
use crate::overrides::Overrides;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// `{ "words": [...], "language": "en_US", "max_results": 5 }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub words: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    /// Only used for suggestions. The configured default applies if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl CheckRequest {
    pub fn new(words: Vec<String>, language: &str) -> Self {
        CheckRequest {
            words,
            language: language.to_string(),
            max_results: None,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let request: CheckRequest =
            serde_json::from_str(text).map_err(|e| SpellError::InvalidInput(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(SpellError::InvalidInput("no words given".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(SpellError::InvalidInput("empty language code".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub results: Vec<WordVerdict>,
    /// The language code as requested, even if another dictionary was used.
    pub language: String,
}

/// Suggestions per input word, kept in input order. Serialized as a JSON
/// object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuggestionMap(pub Vec<(String, Vec<String>)>);

impl SuggestionMap {
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, suggs)| suggs.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SuggestionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, suggs) in self.0.iter() {
            map.serialize_entry(word, suggs)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuggestResponse {
    pub suggestions: SuggestionMap,
    pub language: String,
}

impl SpellChecker {
    pub fn respond_check<O>(&self, request: &CheckRequest, overrides: &O) -> Result<CheckResponse>
    where
        O: Overrides + Sync + ?Sized,
    {
        request.validate()?;
        Ok(CheckResponse {
            results: self.check_batch(&request.words, &request.language, overrides),
            language: request.language.clone(),
        })
    }

    pub fn respond_suggest<O>(&self, request: &CheckRequest, overrides: &O) -> Result<SuggestResponse>
    where
        O: Overrides + Sync + ?Sized,
    {
        request.validate()?;
        let max = request.max_results.unwrap_or_else(|| self.max_suggestions());
        let suggestions = self.suggest_batch(&request.words, &request.language, max, overrides);
        Ok(SuggestResponse {
            suggestions: SuggestionMap(suggestions),
            language: request.language.clone(),
        })
    }
}
