//! Orchestration session — one invocable pipeline per conversation.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::assembly::{TaskInputs, TaskProfile, TaskTemplate, WorkerSpec};
use crate::config::Settings;
use crate::engine::{ExecutionRequest, ProcessMode, RawResult, TaskEngine};
use crate::error::{Error, ExecutionError};
use crate::memory::MemorySet;

/// One worker, one task template, three memory tiers, one engine.
///
/// Created once per conversation and reused across turns so memory
/// accumulates. Recreating a session resets nothing on disk; the backing
/// stores persist at their configured paths.
pub struct OrchestrationSession {
    id: Uuid,
    worker: WorkerSpec,
    task: TaskTemplate,
    memory: MemorySet,
    mode: ProcessMode,
    engine: Arc<dyn TaskEngine>,
}

impl OrchestrationSession {
    /// Compose a session and create any missing memory backing files.
    pub fn new(
        worker: WorkerSpec,
        task: TaskTemplate,
        memory: MemorySet,
        engine: Arc<dyn TaskEngine>,
    ) -> Result<Self, Error> {
        memory.ensure_backing()?;
        let id = Uuid::new_v4();
        tracing::info!(session = %id, worker = %worker.role().name, "orchestration session ready");
        Ok(Self {
            id,
            worker,
            task,
            memory,
            mode: ProcessMode::Sequential,
            engine,
        })
    }

    /// Assemble the standard assistant pipeline from captured settings.
    pub fn from_settings(settings: &Settings, engine: Arc<dyn TaskEngine>) -> Result<Self, Error> {
        let worker = WorkerSpec::from_settings(settings)?;
        let task = TaskTemplate::new(TaskProfile::question_handler());
        let memory = MemorySet::from_settings(settings)?;
        Self::new(worker, task, memory, engine)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn worker(&self) -> &WorkerSpec {
        &self.worker
    }

    pub fn memory(&self) -> &MemorySet {
        &self.memory
    }

    pub fn mode(&self) -> ProcessMode {
        self.mode
    }

    /// Run one turn to completion.
    ///
    /// Binds `{question: prompt}` into the task template and hands the
    /// pipeline to the engine. The call blocks its caller for the duration
    /// of the turn; `&mut self` keeps two invocations from ever
    /// interleaving on one session. Any durable memory the engine wrote is
    /// committed by the time this returns. Engine failures propagate with
    /// their cause; retries are a caller policy.
    pub async fn invoke(&mut self, prompt: &str) -> Result<RawResult, ExecutionError> {
        let inputs = TaskInputs::from([("question".to_string(), prompt.to_string())]);
        let task = self.task.render(&inputs);

        tracing::debug!(session = %self.id, task = %task.name, "invoking engine");
        let started = Instant::now();

        let request = ExecutionRequest {
            worker: &self.worker,
            task,
            memory: &self.memory,
            mode: self.mode,
        };
        let result = self
            .engine
            .execute(request)
            .await
            .map_err(ExecutionError::from)?;

        tracing::info!(
            session = %self.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "turn complete"
        );
        Ok(result)
    }
}
