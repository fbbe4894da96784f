//! Worker and task assembly — pure construction from configuration.
//!
//! One worker and one task template are assembled at session start and
//! reused for every turn. Anything invalid fails here, not on first
//! invocation.

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::ConfigError;

/// Language-model binding for a worker.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: SecretString,
}

impl LlmConfig {
    /// Validate and bind a model identifier with its credential.
    pub fn new(model: impl Into<String>, api_key: SecretString) -> Result<Self, ConfigError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "llm.model".to_string(),
                hint: format!("Set {} to a model identifier.", crate::config::MODEL_VAR),
            });
        }
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "llm.api_key".to_string(),
                hint: format!("Set {} to the model credential.", crate::config::LLM_API_KEY_VAR),
            });
        }
        Ok(Self { model, api_key })
    }
}

/// External capabilities a worker may call at runtime.
#[derive(Debug, Clone)]
pub enum Capability {
    /// Web search, keyed by the search provider credential.
    Search { api_key: SecretString },
}

impl Capability {
    /// Bind the web-search capability.
    pub fn search(api_key: SecretString) -> Result<Self, ConfigError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "capability.search.api_key".to_string(),
                hint: format!(
                    "Set {} to the search provider credential.",
                    crate::config::SEARCH_API_KEY_VAR
                ),
            });
        }
        Ok(Self::Search { api_key })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Capability::Search { .. } => "search",
        }
    }
}

/// Declarative role definition for a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl RoleProfile {
    /// The built-in personal assistant role.
    pub fn personal_assistant() -> Self {
        Self {
            name: "personal_assistant".to_string(),
            role: "Personal Assistant".to_string(),
            goal: "Help the user with everyday questions and tasks, searching the web \
                   whenever fresh information is needed."
                .to_string(),
            backstory: "A dependable assistant that remembers past conversations and uses \
                        that context to give personally relevant answers."
                .to_string(),
        }
    }
}

/// Declarative task definition with `{placeholder}` slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskProfile {
    pub name: String,
    pub description: String,
    pub expected_output: String,
}

impl TaskProfile {
    /// The built-in question-handling task.
    pub fn question_handler() -> Self {
        Self {
            name: "task_handler".to_string(),
            description: "Answer the user's question: {question}. Use the search \
                          capability for anything that needs current information, and \
                          keep prior conversation context in mind."
                .to_string(),
            expected_output: "A clear, direct answer to the question, in plain text."
                .to_string(),
        }
    }
}

/// A fully assembled worker: role, model binding, capabilities.
///
/// Immutable after assembly.
#[derive(Debug, Clone)]
pub struct WorkerSpec {
    role: RoleProfile,
    llm: LlmConfig,
    capabilities: Vec<Capability>,
}

impl WorkerSpec {
    /// Compose a worker from already-validated parts. Pure and deterministic.
    pub fn assemble(role: RoleProfile, llm: LlmConfig, capabilities: Vec<Capability>) -> Self {
        Self {
            role,
            llm,
            capabilities,
        }
    }

    /// The standard assistant worker: personal-assistant role, captured LLM
    /// binding, web-search capability.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let llm = LlmConfig::new(settings.model.clone(), settings.llm_api_key.clone())?;
        let search = Capability::search(settings.search_api_key.clone())?;
        Ok(Self::assemble(
            RoleProfile::personal_assistant(),
            llm,
            vec![search],
        ))
    }

    pub fn role(&self) -> &RoleProfile {
        &self.role
    }

    pub fn llm(&self) -> &LlmConfig {
        &self.llm
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// Runtime inputs bound into a task template at invocation time.
pub type TaskInputs = BTreeMap<String, String>;

/// One concrete unit of work, ready for the engine.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTask {
    pub name: String,
    pub description: String,
    pub expected_output: String,
}

/// A reusable task template, rendered once per invocation.
#[derive(Debug, Clone)]
pub struct TaskTemplate {
    profile: TaskProfile,
}

impl TaskTemplate {
    pub fn new(profile: TaskProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &TaskProfile {
        &self.profile
    }

    /// Substitute `{key}` slots in the description and expected output.
    ///
    /// Slots with no matching input are left untouched.
    pub fn render(&self, inputs: &TaskInputs) -> RenderedTask {
        let mut description = self.profile.description.clone();
        let mut expected_output = self.profile.expected_output.clone();
        for (key, value) in inputs {
            let slot = format!("{{{key}}}");
            description = description.replace(&slot, value);
            expected_output = expected_output.replace(&slot, value);
        }
        RenderedTask {
            name: self.profile.name.clone(),
            description,
            expected_output,
        }
    }
}
