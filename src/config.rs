//! Process-wide configuration, captured once from the environment.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Language-model identifier, e.g. `gemini/gemini-2.0-flash`.
pub const MODEL_VAR: &str = "MODEL";
/// Credential for the language model and the embedding model.
pub const LLM_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Credential for the web-search capability.
pub const SEARCH_API_KEY_VAR: &str = "SERPER_API_KEY";
/// Optional override for the embedding model identifier.
pub const EMBED_MODEL_VAR: &str = "EMBEDDING_MODEL";
/// Optional override for the memory store directory.
pub const MEMORY_DIR_VAR: &str = "CONCIERGE_MEMORY_DIR";

const DEFAULT_EMBED_PROVIDER: &str = "google";
const DEFAULT_EMBED_MODEL: &str = "models/text-embedding-004";
const DEFAULT_MEMORY_DIR: &str = ".content";

/// Immutable snapshot of everything the core reads from the environment.
///
/// Captured once at startup so a missing value fails fast and in one place,
/// instead of surfacing on first invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Language-model identifier.
    pub model: String,
    /// Language-model credential, shared with the embedder.
    pub llm_api_key: SecretString,
    /// Search capability credential.
    pub search_api_key: SecretString,
    /// Embedding provider for the similarity memory tiers.
    pub embed_provider: String,
    /// Embedding model for the similarity memory tiers.
    pub embed_model: String,
    /// Directory holding the memory tier backing files.
    pub memory_dir: PathBuf,
}

impl Settings {
    /// Load a `.env` file if one is present, then capture from the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Capture settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Capture settings from an arbitrary key lookup.
    ///
    /// Tests use this with a plain map so configuration failures are
    /// reproducible without mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let model = require(&lookup, MODEL_VAR)?;
        let llm_api_key = SecretString::from(require(&lookup, LLM_API_KEY_VAR)?);
        let search_api_key = SecretString::from(require(&lookup, SEARCH_API_KEY_VAR)?);
        let embed_model =
            lookup(EMBED_MODEL_VAR).unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string());
        let memory_dir = lookup(MEMORY_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMORY_DIR));

        Ok(Self {
            model,
            llm_api_key,
            search_api_key,
            embed_provider: DEFAULT_EMBED_PROVIDER.to_string(),
            embed_model,
            memory_dir,
        })
    }
}

/// Fetch a required value; blank counts as missing.
fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (MODEL_VAR, "gemini/gemini-2.0-flash"),
            (LLM_API_KEY_VAR, "llm-key"),
            (SEARCH_API_KEY_VAR, "search-key"),
        ])
    }

    fn lookup_in(
        map: HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Option<String> {
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn captures_required_values_and_defaults() {
        let settings = Settings::from_lookup(lookup_in(full_env())).unwrap();
        assert_eq!(settings.model, "gemini/gemini-2.0-flash");
        assert_eq!(settings.embed_provider, "google");
        assert_eq!(settings.embed_model, "models/text-embedding-004");
        assert_eq!(settings.memory_dir, PathBuf::from(".content"));
    }

    #[test]
    fn missing_model_fails_fast() {
        let mut env = full_env();
        env.remove(MODEL_VAR);
        let err = Settings::from_lookup(lookup_in(env)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == MODEL_VAR));
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut env = full_env();
        env.insert(LLM_API_KEY_VAR, "   ");
        let err = Settings::from_lookup(lookup_in(env)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == LLM_API_KEY_VAR));
    }

    #[test]
    fn overrides_are_honored() {
        let mut env = full_env();
        env.insert(EMBED_MODEL_VAR, "models/custom-embedding");
        env.insert(MEMORY_DIR_VAR, "/var/lib/concierge");
        let settings = Settings::from_lookup(lookup_in(env)).unwrap();
        assert_eq!(settings.embed_model, "models/custom-embedding");
        assert_eq!(settings.memory_dir, PathBuf::from("/var/lib/concierge"));
    }
}
