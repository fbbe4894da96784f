//! Seam to the delegated execution engine.
//!
//! The engine owns agent reasoning, tool calls, and memory reads/writes.
//! This module defines what it receives per invocation and the two shapes
//! its result can come back in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::assembly::{RenderedTask, WorkerSpec};
use crate::error::EngineError;
use crate::memory::MemorySet;

/// How queued tasks are driven. Exactly one task runs per invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessMode {
    #[default]
    Sequential,
}

/// Everything the engine needs for one invocation.
#[derive(Debug)]
pub struct ExecutionRequest<'a> {
    pub worker: &'a WorkerSpec,
    pub task: RenderedTask,
    pub memory: &'a MemorySet,
    pub mode: ProcessMode,
}

/// Token accounting reported by the engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Typed result of one engine run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Canonical answer text.
    pub raw: String,
    /// Structured output, when the engine produced one.
    pub structured: Option<serde_json::Value>,
    pub token_usage: Option<TokenUsage>,
}

impl TaskOutput {
    pub fn from_text(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Self::default()
        }
    }
}

/// Output of one invocation, before normalization.
///
/// Depending on transport the engine hands back either a typed output or an
/// already-serialized blob that only approximates one. Normalization copes
/// with both.
#[derive(Debug, Clone)]
pub enum RawResult {
    Typed(TaskOutput),
    Text(String),
}

impl From<TaskOutput> for RawResult {
    fn from(output: TaskOutput) -> Self {
        RawResult::Typed(output)
    }
}

impl From<String> for RawResult {
    fn from(text: String) -> Self {
        RawResult::Text(text)
    }
}

impl From<&str> for RawResult {
    fn from(text: &str) -> Self {
        RawResult::Text(text.to_string())
    }
}

/// The delegated execution engine.
///
/// One call runs one task to completion, including any memory reads and
/// writes for the turn. Implementations live outside this crate.
#[async_trait]
pub trait TaskEngine: Send + Sync {
    async fn execute(&self, request: ExecutionRequest<'_>) -> Result<RawResult, EngineError>;
}
