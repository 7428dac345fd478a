use thiserror::Error;

/// Errors that cross the library boundary.
#[derive(Clone, Debug, Error)]
pub enum SpellError {
    /// The affix or stem file of a language could not be read or parsed.
    #[error("malformed dictionary {name}: {reason}")]
    MalformedDictionary { name: String, reason: String },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A request that cannot be answered as given.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SpellError {
    /// Wrap an internal parse or I/O failure, keeping its context chain.
    pub(crate) fn malformed(name: &str, err: &anyhow::Error) -> Self {
        SpellError::MalformedDictionary {
            name: name.to_string(),
            reason: format!("{:#}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpellError>;
