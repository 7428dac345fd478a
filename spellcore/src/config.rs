//! The supported-language configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpellError};

pub const DEFAULT_LANGUAGE: &str = "en_US";
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// A language the checker can be asked for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    #[serde(rename = "language_code")]
    pub code: String,
    /// Display name
    #[serde(rename = "language")]
    pub name: String,
    #[serde(rename = "text_direction", default)]
    pub direction: TextDirection,
    /// Location of the `.aff`/`.dic` pair without the extension.
    /// Relative paths are taken from the dictionary root.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Language {
    pub fn new(code: &str, name: &str) -> Self {
        Language {
            code: code.to_string(),
            name: name.to_string(),
            direction: TextDirection::Ltr,
            path: None,
        }
    }
}

fn default_dict_root() -> PathBuf {
    PathBuf::from("dicts")
}

fn default_fallback() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellConfig {
    /// Directory holding one subdirectory of dictionary files per language.
    #[serde(default = "default_dict_root")]
    pub dict_root: PathBuf,
    #[serde(default = "default_fallback")]
    pub fallback_language: String,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Supported languages by code.
    #[serde(default)]
    pub languages: BTreeMap<String, Language>,
}

impl Default for SpellConfig {
    fn default() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert(
            DEFAULT_LANGUAGE.to_string(),
            Language::new(DEFAULT_LANGUAGE, "English (US)"),
        );
        SpellConfig {
            dict_root: default_dict_root(),
            fallback_language: default_fallback(),
            max_suggestions: default_max_suggestions(),
            languages,
        }
    }
}

impl SpellConfig {
    /// A configuration with the default language list, reading
    /// dictionaries from `dict_root`.
    pub fn with_dict_root(dict_root: &Path) -> Self {
        SpellConfig {
            dict_root: dict_root.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: SpellConfig =
            serde_json::from_str(text).map_err(|e| SpellError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file. A relative `dict_root` is taken from the
    /// directory the file is in.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path)
            .map_err(|e| SpellError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_json(&text)
            .map_err(|e| SpellError::Config(format!("{}: {}", path.display(), e)))?;
        if config.dict_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.dict_root = dir.join(&config.dict_root);
            }
        }
        log::debug!(
            "loaded config {} with {} languages",
            path.display(),
            config.languages.len()
        );
        Ok(config)
    }

    /// Merge a custom language file over this configuration. The file maps
    /// language codes to language records; its entries replace entries with
    /// the same code.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let text = read_to_string(path)
            .map_err(|e| SpellError::Config(format!("{}: {}", path.display(), e)))?;
        let custom: BTreeMap<String, Language> = serde_json::from_str(&text)
            .map_err(|e| SpellError::Config(format!("{}: {}", path.display(), e)))?;
        self.merge(custom);
        Ok(())
    }

    pub fn merge(&mut self, custom: BTreeMap<String, Language>) {
        for (code, language) in custom {
            if self.languages.insert(code.clone(), language).is_some() {
                log::debug!("custom config replaces language {}", code);
            }
        }
    }

    pub fn language(&self, code: &str) -> Option<&Language> {
        self.languages.get(code)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.languages.contains_key(&self.fallback_language) {
            return Err(SpellError::Config(format!(
                "fallback language {} is not in the language list",
                self.fallback_language
            )));
        }
        if self.max_suggestions == 0 {
            return Err(SpellError::Config("max_suggestions must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::write;

    const CONFIG: &str = r#"{
        "dict_root": "dicts",
        "languages": {
            "en_US": { "language_code": "en_US", "language": "English (US)", "text_direction": "ltr" },
            "ar": { "language_code": "ar", "language": "Arabic", "text_direction": "rtl", "path": "ar/ar_SA" }
        }
    }"#;

    #[test]
    fn test_from_json() {
        let config = SpellConfig::from_json(CONFIG).unwrap();
        assert_eq!("en_US", config.fallback_language);
        assert_eq!(5, config.max_suggestions);
        let ar = config.language("ar").unwrap();
        assert_eq!(TextDirection::Rtl, ar.direction);
        assert_eq!(Some(PathBuf::from("ar/ar_SA")), ar.path);
    }

    #[test]
    fn test_bad_configs() {
        assert!(matches!(
            SpellConfig::from_json("{ \"languages\": {} }"),
            Err(SpellError::Config(_))
        ));
        assert!(matches!(SpellConfig::from_json("[1, 2]"), Err(SpellError::Config(_))));
        assert!(matches!(
            SpellConfig::from_json(r#"{ "languages": { "en_US": { "language": "x" } } }"#),
            Err(SpellError::Config(_))
        ));
    }

    #[test]
    fn test_load_and_merge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        write(&path, CONFIG).unwrap();
        let custom = dir.path().join("custom.json");
        write(
            &custom,
            r#"{ "ar": { "language_code": "ar", "language": "Arabic (Saudi Arabia)", "text_direction": "rtl" },
                 "fr": { "language_code": "fr", "language": "French" } }"#,
        )
        .unwrap();

        let mut config = SpellConfig::load(&path).unwrap();
        assert_eq!(dir.path().join("dicts"), config.dict_root);
        config.merge_file(&custom).unwrap();
        assert_eq!(3, config.languages.len());
        assert_eq!("Arabic (Saudi Arabia)", config.language("ar").unwrap().name);
        assert_eq!(None, config.language("ar").unwrap().path);
        assert_eq!(TextDirection::Ltr, config.language("fr").unwrap().direction);

        assert!(SpellConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
