//! Memory store bindings — three durable tiers per conversation.
//!
//! The long-term tier is a plain append store; the short-term and entity
//! tiers are similarity stores and carry an embedding configuration. The
//! backing files themselves are owned by the delegated engine; this module
//! only guarantees that each tier resolves to a distinct, durable path with
//! valid credentials attached.

use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::config::Settings;
use crate::error::ConfigError;

/// One of the three memory scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTier {
    LongTerm,
    ShortTerm,
    Entity,
}

impl MemoryTier {
    /// Similarity tiers need an embedding model; the long-term log does not.
    pub fn requires_embedder(self) -> bool {
        !matches!(self, MemoryTier::LongTerm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemoryTier::LongTerm => "long_term",
            MemoryTier::ShortTerm => "short_term",
            MemoryTier::Entity => "entity",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            MemoryTier::LongTerm => "long_term_memory.db",
            MemoryTier::ShortTerm => "short_term_memory.db",
            MemoryTier::Entity => "entity_memory.db",
        }
    }
}

impl fmt::Display for MemoryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embedding model configuration for the similarity-backed tiers.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub provider: String,
    pub model: String,
    pub api_key: SecretString,
}

impl EmbedderConfig {
    /// Build an embedder configuration, rejecting blank fields.
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        api_key: SecretString,
    ) -> Result<Self, ConfigError> {
        let provider = provider.into();
        let model = model.into();
        if provider.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "embedder.provider".to_string(),
                hint: "Name the embedding provider, e.g. \"google\".".to_string(),
            });
        }
        if model.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "embedder.model".to_string(),
                hint: "Name the embedding model identifier.".to_string(),
            });
        }
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "embedder.api_key".to_string(),
                hint: "Similarity tiers cannot run with an empty credential.".to_string(),
            });
        }
        Ok(Self {
            provider,
            model,
            api_key,
        })
    }
}

/// A persistence handle for one memory tier.
///
/// Constructed once at session start and reused for the process lifetime.
/// The backing file is created on first use and reused across restarts.
#[derive(Debug, Clone)]
pub struct MemoryBinding {
    tier: MemoryTier,
    storage_path: PathBuf,
    embedder: Option<EmbedderConfig>,
}

impl MemoryBinding {
    /// Checked construction: similarity tiers must carry an embedder, the
    /// long-term tier must not.
    pub fn new(
        tier: MemoryTier,
        storage_path: impl Into<PathBuf>,
        embedder: Option<EmbedderConfig>,
    ) -> Result<Self, ConfigError> {
        match (tier.requires_embedder(), &embedder) {
            (true, None) => Err(ConfigError::MissingRequired {
                key: format!("memory.{tier}.embedder"),
                hint: format!("The {tier} tier is similarity-backed and needs an embedder."),
            }),
            (false, Some(_)) => Err(ConfigError::InvalidValue {
                key: format!("memory.{tier}.embedder"),
                message: "the long-term tier is a plain store and takes no embedder".to_string(),
            }),
            _ => Ok(Self {
                tier,
                storage_path: storage_path.into(),
                embedder,
            }),
        }
    }

    /// Bind the long-term append store.
    pub fn long_term(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            tier: MemoryTier::LongTerm,
            storage_path: storage_path.into(),
            embedder: None,
        }
    }

    /// Bind the short-term similarity store.
    pub fn short_term(storage_path: impl Into<PathBuf>, embedder: EmbedderConfig) -> Self {
        Self {
            tier: MemoryTier::ShortTerm,
            storage_path: storage_path.into(),
            embedder: Some(embedder),
        }
    }

    /// Bind the entity similarity store.
    pub fn entity(storage_path: impl Into<PathBuf>, embedder: EmbedderConfig) -> Self {
        Self {
            tier: MemoryTier::Entity,
            storage_path: storage_path.into(),
            embedder: Some(embedder),
        }
    }

    pub fn tier(&self) -> MemoryTier {
        self.tier
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn embedder(&self) -> Option<&EmbedderConfig> {
        self.embedder.as_ref()
    }

    /// Create the backing file (and parent directories) if absent.
    ///
    /// Opens in append mode; an existing store is reused, never truncated.
    pub fn ensure_backing(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.storage_path)?;
        tracing::debug!(tier = %self.tier, path = %self.storage_path.display(), "memory backing ready");
        Ok(())
    }
}

/// The full set of bindings one session attaches to a conversation.
#[derive(Debug, Clone)]
pub struct MemorySet {
    long_term: MemoryBinding,
    short_term: MemoryBinding,
    entity: MemoryBinding,
}

impl MemorySet {
    /// Compose a set from hand-built bindings.
    ///
    /// Rejects bindings whose tier does not match its slot, and any two
    /// bindings sharing a storage path — the tiers must never collide.
    pub fn new(
        long_term: MemoryBinding,
        short_term: MemoryBinding,
        entity: MemoryBinding,
    ) -> Result<Self, ConfigError> {
        for (binding, expected) in [
            (&long_term, MemoryTier::LongTerm),
            (&short_term, MemoryTier::ShortTerm),
            (&entity, MemoryTier::Entity),
        ] {
            if binding.tier() != expected {
                return Err(ConfigError::InvalidValue {
                    key: format!("memory.{expected}"),
                    message: format!("expected a {expected} binding, got {}", binding.tier()),
                });
            }
        }
        let paths = [
            long_term.storage_path(),
            short_term.storage_path(),
            entity.storage_path(),
        ];
        for (i, a) in paths.iter().enumerate() {
            for b in &paths[i + 1..] {
                if a == b {
                    return Err(ConfigError::InvalidValue {
                        key: "memory.storage_path".to_string(),
                        message: format!("tiers share a backing file: {}", a.display()),
                    });
                }
            }
        }
        Ok(Self {
            long_term,
            short_term,
            entity,
        })
    }

    /// Lay out all three tiers under one root directory.
    ///
    /// File names are fixed per tier, so the paths are distinct by
    /// construction.
    pub fn under_root(root: impl AsRef<Path>, embedder: EmbedderConfig) -> Self {
        let root = root.as_ref();
        Self {
            long_term: MemoryBinding::long_term(root.join(MemoryTier::LongTerm.file_name())),
            short_term: MemoryBinding::short_term(
                root.join(MemoryTier::ShortTerm.file_name()),
                embedder.clone(),
            ),
            entity: MemoryBinding::entity(root.join(MemoryTier::Entity.file_name()), embedder),
        }
    }

    /// The standard layout: captured memory dir, captured embedder, LLM
    /// credential shared with the embedding model.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let embedder = EmbedderConfig::new(
            settings.embed_provider.clone(),
            settings.embed_model.clone(),
            settings.llm_api_key.clone(),
        )?;
        Ok(Self::under_root(&settings.memory_dir, embedder))
    }

    pub fn long_term(&self) -> &MemoryBinding {
        &self.long_term
    }

    pub fn short_term(&self) -> &MemoryBinding {
        &self.short_term
    }

    pub fn entity(&self) -> &MemoryBinding {
        &self.entity
    }

    pub fn bindings(&self) -> [&MemoryBinding; 3] {
        [&self.long_term, &self.short_term, &self.entity]
    }

    /// Create any missing backing files.
    pub fn ensure_backing(&self) -> Result<(), ConfigError> {
        for binding in self.bindings() {
            binding.ensure_backing()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder() -> EmbedderConfig {
        EmbedderConfig::new(
            "google",
            "models/text-embedding-004",
            SecretString::from("test-key"),
        )
        .unwrap()
    }

    #[test]
    fn long_term_needs_no_embedder() {
        assert!(!MemoryTier::LongTerm.requires_embedder());
        assert!(MemoryTier::ShortTerm.requires_embedder());
        assert!(MemoryTier::Entity.requires_embedder());
    }

    #[test]
    fn similarity_tier_without_embedder_is_rejected() {
        let err = MemoryBinding::new(MemoryTier::ShortTerm, "short.db", None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
    }

    #[test]
    fn long_term_with_embedder_is_rejected() {
        let err =
            MemoryBinding::new(MemoryTier::LongTerm, "long.db", Some(embedder())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn blank_embedder_credential_is_rejected() {
        let err = EmbedderConfig::new("google", "models/text-embedding-004", SecretString::from(""))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
    }

    #[test]
    fn under_root_keeps_tiers_distinct() {
        let set = MemorySet::under_root("/tmp/mem", embedder());
        let paths = set.bindings().map(|b| b.storage_path().to_path_buf());
        assert_eq!(paths[0], PathBuf::from("/tmp/mem/long_term_memory.db"));
        assert_eq!(paths[1], PathBuf::from("/tmp/mem/short_term_memory.db"));
        assert_eq!(paths[2], PathBuf::from("/tmp/mem/entity_memory.db"));
    }

    #[test]
    fn colliding_paths_are_rejected() {
        let err = MemorySet::new(
            MemoryBinding::long_term("same.db"),
            MemoryBinding::short_term("same.db", embedder()),
            MemoryBinding::entity("entity.db", embedder()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn mismatched_slot_is_rejected() {
        let err = MemorySet::new(
            MemoryBinding::long_term("long.db"),
            MemoryBinding::entity("entity.db", embedder()),
            MemoryBinding::entity("entity2.db", embedder()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn ensure_backing_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("deep").join("long_term_memory.db");
        let binding = MemoryBinding::long_term(&path);
        binding.ensure_backing().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn ensure_backing_reuses_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("long_term_memory.db");
        std::fs::write(&path, b"persisted entries").unwrap();

        let binding = MemoryBinding::long_term(&path);
        binding.ensure_backing().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"persisted entries");
    }
}
