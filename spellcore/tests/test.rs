use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use spellcore::{
    CheckRequest, DictionaryCache, LoadedDictionary, NoOverrides, SpellChecker, SpellConfig,
    SpellError, TextDirection, WordList,
};

fn checker() -> SpellChecker {
    let config = SpellConfig::load(Path::new("tests/files/config.json")).unwrap();
    SpellChecker::new(Arc::new(DictionaryCache::new(config).unwrap()))
}

fn en_us() -> LoadedDictionary {
    let language = spellcore::Language::new("en_US", "English (US)");
    LoadedDictionary::from_files(
        language,
        Path::new("tests/files/en_US/en_US.aff"),
        Path::new("tests/files/en_US/en_US.dic"),
    )
    .unwrap()
}

#[test]
fn match_root_words() {
    let dict = en_us();

    assert!(dict.check_word("Alberta"));
    assert!(dict.check_word("angle"));
    assert!(dict.check_word("anglicism"));
    assert!(dict.check_word("anoint"));
    assert!(dict.check_word("appear"));
    assert!(dict.check_word("apply"));

    assert!(!dict.check_word("alberta"));
    assert!(!dict.check_word("agnle"));
    assert!(!dict.check_word("anglisism"));
    assert!(!dict.check_word("apear"));
}

#[test]
fn match_prefixes() {
    let dict = en_us();

    assert!(dict.check_word("reappear")); // A
    assert!(dict.check_word("disappear")); // E
    assert!(dict.check_word("reapply")); // A

    assert!(!dict.check_word("unappear")); // U (flag not present)
}

#[test]
fn match_suffixes() {
    let dict = en_us();

    assert!(dict.check_word("Alberta's")); // M

    assert!(dict.check_word("angle's")); // M
    assert!(dict.check_word("anglers")); // Z
    assert!(dict.check_word("angling")); // G
    assert!(dict.check_word("angled")); // D
    assert!(dict.check_word("angler")); // R
    assert!(dict.check_word("angles")); // S

    assert!(dict.check_word("anglicisms")); // S

    assert!(dict.check_word("anointing")); // G
    assert!(dict.check_word("anointed")); // D
    assert!(dict.check_word("anointer")); // R
    assert!(dict.check_word("anointment")); // L
    assert!(dict.check_word("anoints")); // S

    assert!(dict.check_word("appears")); // S
    assert!(dict.check_word("appeared")); // D
    assert!(dict.check_word("appearing")); // G

    assert!(dict.check_word("application")); // N
    assert!(dict.check_word("applications")); // X
    assert!(dict.check_word("applying")); // G
    assert!(dict.check_word("applied")); // D
    assert!(dict.check_word("applies")); // S

    assert!(!dict.check_word("applyication")); // badly applied N
    assert!(!dict.check_word("applyications")); // badly applied X
    assert!(!dict.check_word("applyed")); // badly applied D
    assert!(!dict.check_word("applyes")); // badly applied S

    assert!(!dict.check_word("applion")); // wrong N
    assert!(!dict.check_word("appleion")); // badly applied N
    assert!(!dict.check_word("applyen")); // wrong N
}

#[test]
fn match_cross_products() {
    let dict = en_us();

    assert!(dict.check_word("reapplied"));
    assert!(dict.check_word("disappearing"));
    assert!(dict.check_word("disusers"));
    assert!(!dict.check_word("reapplyed"));
}

#[test]
fn match_ordinals() {
    let dict = en_us();

    assert!(dict.check_word("1st"));
    assert!(dict.check_word("11th"));
    assert!(dict.check_word("21st"));
    assert!(dict.check_word("22nd"));
    assert!(dict.check_word("103rd"));
    assert!(dict.check_word("10th"));

    assert!(!dict.check_word("1th"));
    assert!(!dict.check_word("21th"));
    assert!(!dict.check_word("2st"));
}

#[test]
fn match_special_forms() {
    let dict = en_us();

    assert!(dict.check_word("1,000"));
    assert!(dict.check_word("-12.5"));
    assert!(dict.check_word("can\u{2019}t"));
    assert!(dict.check_word("hello-world"));
    assert!(dict.check_word("HELLO"));
    assert!(dict.check_word("ALBERTA"));
    assert!(!dict.check_word("hello-wrld"));
}

#[test]
fn check_text_edges() {
    let checker = checker();

    assert!(!checker.check_text("", "en_US", &NoOverrides));
    assert!(!checker.check_text("   ", "en_US", &NoOverrides));
    assert!(checker.check_text("  color ", "en_US", &NoOverrides));
    assert!(checker.check_text("Color", "en_US", &NoOverrides));
    assert!(checker.check_text("COLOR", "en_US", &NoOverrides));
    assert!(!checker.check_text("colr", "en_US", &NoOverrides));
}

#[test]
fn check_per_language() {
    let checker = checker();

    assert!(checker.check_text("color", "en_US", &NoOverrides));
    assert!(!checker.check_text("colour", "en_US", &NoOverrides));
    assert!(checker.check_text("colour", "en_GB", &NoOverrides));
    assert!(checker.check_text("colours", "en_GB", &NoOverrides));
    assert!(!checker.check_text("color", "en_GB", &NoOverrides));
}

#[test]
fn unsupported_language_falls_back() {
    let checker = checker();

    for word in ["color", "colour", "colr", "appeared"] {
        assert_eq!(
            checker.check_text(word, "en_US", &NoOverrides),
            checker.check_text(word, "xx_XX", &NoOverrides),
            "checking {}",
            word
        );
    }
    assert_eq!(
        checker.suggest("colr", "en_US", 5, &NoOverrides),
        checker.suggest("colr", "xx_XX", 5, &NoOverrides)
    );
    // configured, but there are no files for it
    assert!(checker.check_text("appeared", "ar", &NoOverrides));
    assert!(matches!(
        checker.cache().load("xx_XX"),
        Err(SpellError::UnsupportedLanguage(_))
    ));
    assert!(matches!(
        checker.cache().load("ar"),
        Err(SpellError::MalformedDictionary { .. })
    ));
    assert!(!checker.cache().cached_codes().contains(&"ar".to_string()));
}

#[test]
fn overrides_allow_words() {
    let checker = checker();
    let mut list = WordList::new();
    list.add("grok", "en_US").unwrap();

    assert!(!checker.check_text("grok", "en_US", &NoOverrides));
    assert!(checker.check_text("grok", "en_US", &list));
    assert!(checker.check_text("Grok", "en_US", &list));
    assert!(!checker.check_text("grok", "en_GB", &list));

    assert!(checker.suggest("grokk", "en_US", 5, &list).contains(&"grok".to_string()));
    assert!(!checker.suggest("grok", "en_US", 5, &list).contains(&"grok".to_string()));
}

#[test]
fn suggestions() {
    let checker = checker();
    let suggest = |word: &str| checker.suggest(word, "en_US", 5, &NoOverrides);

    assert_eq!(Some("color"), suggest("colr").first().map(String::as_str));
    assert_eq!(Some("phone"), suggest("fone").first().map(String::as_str));
    assert_eq!(Some("receive"), suggest("recieve").first().map(String::as_str));
    assert!(suggest("hte").contains(&"the".to_string()));
    assert_eq!(Some("Alberta"), suggest("alberta").first().map(String::as_str));
    assert!(suggest("alot").contains(&"a lot".to_string()));
    assert!(suggest("").is_empty());
    // no-suggest words are correct but never offered
    assert!(checker.check_text("fanny", "en_US", &NoOverrides));
    assert!(!suggest("fany").contains(&"fanny".to_string()));
}

#[test]
fn suggestion_properties() {
    let checker = checker();

    for word in ["colr", "Colr", "COLR", "apear", "wrold", "xyzzy", "a", "Hello"] {
        for max in [1, 3, 5] {
            let suggs = checker.suggest(word, "en_US", max, &NoOverrides);
            assert!(suggs.len() <= max, "too many for {}", word);
            assert!(!suggs.iter().any(|s| s == word), "{} suggested for itself", word);
            let mut folded: Vec<String> = suggs.iter().map(|s| s.to_lowercase()).collect();
            folded.sort();
            folded.dedup();
            assert_eq!(suggs.len(), folded.len(), "duplicates for {}", word);
            assert_eq!(suggs, checker.suggest(word, "en_US", max, &NoOverrides));
        }
    }
}

#[test]
fn batch_keeps_order() {
    let checker = checker();
    let words = ["color", "colr", "", "appeared", "colour", "  the  "];
    let verdicts = checker.check_batch(&words, "en_US", &NoOverrides);

    assert_eq!(words.len(), verdicts.len());
    for (word, verdict) in words.iter().zip(verdicts.iter()) {
        assert_eq!(*word, verdict.word);
    }
    let correct: Vec<bool> = verdicts.iter().map(|v| v.is_correct).collect();
    assert_eq!(vec![true, false, false, true, false, true], correct);
}

#[test]
fn json_round_trip() {
    let checker = checker();
    let request =
        CheckRequest::from_json(r#"{ "words": ["colr", "color", "colr"], "language": "xx" }"#)
            .unwrap();

    let response = checker.respond_check(&request, &NoOverrides).unwrap();
    assert_eq!("xx", response.language);
    assert_eq!(3, response.results.len());
    assert!(response.results[1].is_correct);

    let response = checker.respond_suggest(&request, &NoOverrides).unwrap();
    assert_eq!(2, response.suggestions.len());
    assert!(response.suggestions.get("colr").unwrap().contains(&"color".to_string()));
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.find("\"colr\"").unwrap() < json.find("\"color\":").unwrap());

    assert!(matches!(
        CheckRequest::from_json(r#"{ "language": "en_US" }"#),
        Err(SpellError::InvalidInput(_))
    ));
}

#[test]
fn language_listing() {
    let checker = checker();
    let cache = checker.cache();

    let names: Vec<&str> = cache.languages().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(vec!["Arabic", "English (UK)", "English (US)"], names);
    assert_eq!(TextDirection::Rtl, cache.languages()[0].direction);
    assert!(cache.is_supported("en_GB"));
    assert!(!cache.is_supported("fr"));
    assert_eq!(vec!["en_US".to_string()], cache.cached_codes());
    cache.resolve("en_GB");
    assert_eq!(vec!["en_GB".to_string(), "en_US".to_string()], cache.cached_codes());
}

#[test]
fn concurrent_loads_share_dictionary() {
    let checker = checker();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(checker.cache());
            thread::spawn(move || cache.resolve("en_GB"))
        })
        .collect();
    let dicts: Vec<Arc<LoadedDictionary>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for dict in &dicts {
        assert_eq!("en_GB", dict.language().code);
        assert!(Arc::ptr_eq(&dicts[0], dict));
    }
}

#[test]
fn malformed_dictionary_falls_back() {
    let root = tempfile::tempdir().unwrap();
    let us = root.path().join("en_US");
    fs::create_dir(&us).unwrap();
    fs::copy("tests/files/en_US/en_US.aff", us.join("en_US.aff")).unwrap();
    fs::copy("tests/files/en_US/en_US.dic", us.join("en_US.dic")).unwrap();
    let de = root.path().join("de_DE");
    fs::create_dir(&de).unwrap();
    fs::write(de.join("de_DE.aff"), "SFX A Y 1\nSFX B 0 e .\n").unwrap();
    fs::write(de.join("de_DE.dic"), "1\nHaus/A\n").unwrap();

    let mut config = SpellConfig::with_dict_root(root.path());
    config
        .languages
        .insert("de_DE".to_string(), spellcore::Language::new("de_DE", "Deutsch"));
    let checker = SpellChecker::new(Arc::new(DictionaryCache::new(config).unwrap()));

    assert!(matches!(
        checker.cache().load("de_DE"),
        Err(SpellError::MalformedDictionary { .. })
    ));
    assert_eq!("en_US", checker.cache().resolve("de_DE").language().code);
    assert!(checker.check_text("color", "de_DE", &NoOverrides));
    assert!(!checker.check_text("Haus", "de_DE", &NoOverrides));

    // the failure is remembered, the repaired files are not read
    fs::write(de.join("de_DE.aff"), "SFX A Y 1\nSFX A 0 e .\n").unwrap();
    assert!(matches!(
        checker.cache().load("de_DE"),
        Err(SpellError::MalformedDictionary { .. })
    ));
    assert_eq!("en_US", checker.cache().resolve("de_DE").language().code);
    assert!(!checker.check_text("Haus", "de_DE", &NoOverrides));
    assert_eq!(vec!["en_US".to_string()], checker.cache().cached_codes());
}
