use anyhow::{Context, Result};
use clap::Parser;
use home::home_dir;
use std::env::current_exe;
use std::fs::read_to_string;
use std::io::{stdin, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spellcore::{CheckRequest, DictionaryCache, SpellChecker, SpellConfig, WordList};

/// Check the spelling of words, or suggest corrections, and print the
/// result as JSON.
#[derive(Parser)]
struct Cli {
    /// Words to check. Read from stdin, one per line, if none are given.
    words: Vec<String>,
    /// Configuration file listing the supported languages.
    #[clap(long)]
    config: Option<PathBuf>,
    /// Extra language definitions that override the configuration.
    #[clap(long)]
    custom_config: Option<PathBuf>,
    /// Language code of the dictionary to use.
    #[clap(short, long, default_value = "en_US")]
    language: String,
    /// Print suggestions instead of verdicts.
    #[clap(long)]
    suggest: bool,
    /// Maximum number of suggestions per word.
    #[clap(long)]
    max: Option<usize>,
    /// File of words, one per line, that are always accepted.
    #[clap(long)]
    allow: Option<PathBuf>,
    /// Read a JSON request from stdin instead of plain words.
    #[clap(long)]
    json: bool,
}

const CONFIG_FILE: &str = "config.json";
const CONFIG_SEARCH_PATH: [&str; 4] = ["./dicts", ".", "$EXE/dicts", "$HOME/.config/spellcheck"];

fn expand_dir(dir: &Path) -> Option<PathBuf> {
    if let Ok(path) = dir.strip_prefix("$HOME") {
        Some(home_dir()?.join(path))
    } else if let Ok(path) = dir.strip_prefix("$EXE") {
        match current_exe() {
            Ok(exe) => Some(exe.parent()?.join(path)),
            Err(_) => None,
        }
    } else {
        Some(dir.to_path_buf())
    }
}

/// Look for a configuration file in the provided directory search path.
fn find_config(search_path: &[&str]) -> Option<PathBuf> {
    for dir in search_path {
        let dir = match expand_dir(&PathBuf::from(dir)) {
            Some(dir) => dir,
            None => {
                log::warn!("Could not expand path {}", dir);
                continue;
            }
        };
        let path = dir.join(CONFIG_FILE);
        log::debug!("Looking for configuration at {}", path.display());
        if path.exists() {
            return Some(path);
        }
    }
    None
}

fn load_config(args: &Cli) -> Result<SpellConfig> {
    let mut config = match args
        .config
        .clone()
        .or_else(|| find_config(&CONFIG_SEARCH_PATH))
    {
        Some(path) => SpellConfig::load(&path)?,
        None => {
            log::info!("No configuration found, using built-in defaults");
            SpellConfig::default()
        }
    };
    if let Some(custom) = &args.custom_config {
        config.merge_file(custom)?;
    }
    Ok(config)
}

fn read_request(args: &Cli) -> Result<CheckRequest> {
    let mut request = if args.json {
        let mut text = String::new();
        stdin().read_to_string(&mut text).context("reading request")?;
        CheckRequest::from_json(&text)?
    } else {
        let words = if args.words.is_empty() {
            let mut text = String::new();
            stdin().read_to_string(&mut text).context("reading words")?;
            text.lines().map(str::to_string).collect()
        } else {
            args.words.clone()
        };
        CheckRequest::new(words, &args.language)
    };
    if args.max.is_some() {
        request.max_results = args.max;
    }
    request.validate()?;
    Ok(request)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let config = load_config(&args)?;
    let request = read_request(&args)?;

    let mut allowed = WordList::new();
    if let Some(path) = &args.allow {
        let text = read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let added = allowed.extend_from_lines(&text, &request.language)?;
        log::info!("Loaded {} allowed words from {}", added, path.display());
    }

    let cache = DictionaryCache::new(config)?;
    let checker = SpellChecker::new(Arc::new(cache));
    let output = if args.suggest {
        serde_json::to_string_pretty(&checker.respond_suggest(&request, &allowed)?)?
    } else {
        serde_json::to_string_pretty(&checker.respond_check(&request, &allowed)?)?
    };
    println!("{}", output);
    Ok(())
}
