//! Loading dictionaries by language code, once per process.

use fnv::FnvHashMap;
use itertools::Itertools;
use parking_lot::{Mutex, RwLock};
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Language, SpellConfig};
use crate::dictionary::LoadedDictionary;
use crate::error::{Result, SpellError};

/// Shared cache of loaded dictionaries. Every language that loaded
/// successfully stays resident, and a language that failed to load keeps
/// its error. Nothing is evicted.
#[derive(Debug)]
pub struct DictionaryCache {
    config: SpellConfig,
    fallback: Arc<LoadedDictionary>,
    loaded: RwLock<FnvHashMap<String, Arc<LoadedDictionary>>>,
    failed: RwLock<FnvHashMap<String, SpellError>>,
    /// Held while parsing, so that concurrent requests for a new language
    /// parse it only once.
    load_lock: Mutex<()>,
}

impl DictionaryCache {
    /// Fails only if the fallback language's dictionary cannot be loaded.
    pub fn new(config: SpellConfig) -> Result<Self> {
        config.validate()?;
        let fallback = match config.language(&config.fallback_language) {
            Some(language) => Arc::new(load_language(&config.dict_root, language)?),
            None => return Err(SpellError::UnsupportedLanguage(config.fallback_language.clone())),
        };
        let mut loaded = FnvHashMap::default();
        loaded.insert(config.fallback_language.clone(), Arc::clone(&fallback));
        Ok(DictionaryCache {
            config,
            fallback,
            loaded: RwLock::new(loaded),
            failed: RwLock::new(FnvHashMap::default()),
            load_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &SpellConfig {
        &self.config
    }

    pub fn fallback(&self) -> Arc<LoadedDictionary> {
        Arc::clone(&self.fallback)
    }

    /// The dictionary for `code`, or the fallback dictionary if that
    /// language is unsupported or cannot be loaded.
    pub fn resolve(&self, code: &str) -> Arc<LoadedDictionary> {
        match self.load(code) {
            Ok(dict) => dict,
            Err(e) => {
                log::warn!("{}; using {}", e, self.config.fallback_language);
                self.fallback()
            }
        }
    }

    /// The dictionary for `code`, loading it if needed. The files of a
    /// language are read at most once, whether or not that succeeds.
    pub fn load(&self, code: &str) -> Result<Arc<LoadedDictionary>> {
        if let Some(found) = self.cached(code) {
            return found;
        }
        let language = self
            .config
            .language(code)
            .ok_or_else(|| SpellError::UnsupportedLanguage(code.to_string()))?;

        let _guard = self.load_lock.lock();
        // Someone else may have tried it while we waited.
        if let Some(found) = self.cached(code) {
            return found;
        }
        match load_language(&self.config.dict_root, language) {
            Ok(dict) => {
                let dict = Arc::new(dict);
                self.loaded.write().insert(code.to_string(), Arc::clone(&dict));
                Ok(dict)
            }
            Err(e) => {
                self.failed.write().insert(code.to_string(), e.clone());
                Err(e)
            }
        }
    }

    fn cached(&self, code: &str) -> Option<Result<Arc<LoadedDictionary>>> {
        if let Some(dict) = self.loaded.read().get(code) {
            return Some(Ok(Arc::clone(dict)));
        }
        self.failed.read().get(code).map(|e| Err(e.clone()))
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.config.languages.contains_key(code)
    }

    /// The supported languages, sorted by display name.
    pub fn languages(&self) -> Vec<&Language> {
        self.config
            .languages
            .values()
            .sorted_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)))
            .collect()
    }

    /// Codes of the languages that loaded successfully.
    pub fn cached_codes(&self) -> Vec<String> {
        self.loaded.read().keys().cloned().sorted().collect()
    }
}

fn load_language(dict_root: &Path, language: &Language) -> Result<LoadedDictionary> {
    let (aff, dic) = find_dictionary_files(dict_root, language)?;
    log::debug!("loading {} from {}", language.code, aff.display());
    LoadedDictionary::from_files(language.clone(), &aff, &dic)
}

/// Locate the `.aff`/`.dic` pair for a language.
fn find_dictionary_files(dict_root: &Path, language: &Language) -> Result<(PathBuf, PathBuf)> {
    let code = &language.code;
    if let Some(path) = &language.path {
        let path = dict_root.join(path);
        return Ok((path.with_extension("aff"), path.with_extension("dic")));
    }

    let dir = dict_root.join(code);
    let pair = |stem: PathBuf| {
        let aff = stem.with_extension("aff");
        let dic = stem.with_extension("dic");
        (aff.is_file() && dic.is_file()).then_some((aff, dic))
    };
    if let Some(found) = pair(dir.join(code)) {
        return Ok(found);
    }
    if let Ok(entries) = read_dir(&dir) {
        let found = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |ext| ext == "aff"))
            .sorted()
            .find_map(pair);
        if let Some(found) = found {
            return Ok(found);
        }
    }
    if let Some(found) = pair(dict_root.join(code)) {
        return Ok(found);
    }
    Err(SpellError::MalformedDictionary {
        name: code.to_string(),
        reason: format!("no .aff/.dic pair found under {}", dict_root.display()),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::{create_dir_all, write};

    const AFF: &str = "SFX S Y 1\nSFX S 0 s .\n";

    fn write_pair(dir: &Path, stem: &str, dic: &str) {
        create_dir_all(dir).unwrap();
        write(dir.join(format!("{}.aff", stem)), AFF).unwrap();
        write(dir.join(format!("{}.dic", stem)), dic).unwrap();
    }

    #[test]
    fn test_find_files() {
        let root = tempfile::tempdir().unwrap();
        let root = root.path();
        write_pair(&root.join("nl"), "nl", "1\nkat\n");
        write_pair(&root.join("de"), "de_DE_frami", "1\nKatze\n");
        write(root.join("de").join("aaa.aff"), AFF).unwrap();
        write_pair(root, "sv", "1\nkatt\n");
        write_pair(&root.join("elsewhere"), "fr", "1\nchat\n");

        let found = |code: &str| find_dictionary_files(root, &Language::new(code, code));
        assert_eq!(root.join("nl/nl.aff"), found("nl").unwrap().0);
        assert_eq!(root.join("de/de_DE_frami.dic"), found("de").unwrap().1);
        assert_eq!(root.join("sv.aff"), found("sv").unwrap().0);
        assert!(found("fr").is_err());

        let mut fr = Language::new("fr", "French");
        fr.path = Some(PathBuf::from("elsewhere/fr"));
        assert_eq!(root.join("elsewhere/fr.dic"), find_dictionary_files(root, &fr).unwrap().1);
    }

    #[test]
    fn test_missing_fallback() {
        let root = tempfile::tempdir().unwrap();
        let config = SpellConfig::with_dict_root(root.path());
        assert!(matches!(
            DictionaryCache::new(config),
            Err(SpellError::MalformedDictionary { .. })
        ));
    }
}
