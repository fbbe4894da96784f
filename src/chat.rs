//! The UI-facing boundary: prompt in, display-ready text out.

use crate::error::ExecutionError;
use crate::normalize::normalize;
use crate::session::OrchestrationSession;
use crate::transcript::{Role, Transcript};

/// One conversation as the UI sees it.
///
/// Wraps an [`OrchestrationSession`], normalizes every answer, and keeps
/// the transcript. Dropping a `ChatSession` loses the transcript but not
/// the durable memory stores.
pub struct ChatSession {
    session: OrchestrationSession,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(session: OrchestrationSession) -> Self {
        Self {
            session,
            transcript: Transcript::new(),
        }
    }

    /// Run one turn and return the normalized answer.
    ///
    /// On engine failure the error propagates for the UI to surface
    /// non-fatally; the transcript and the memory stores stay in whatever
    /// state they reached. Nothing is rolled back and nothing is retried.
    pub async fn ask(&mut self, prompt: &str) -> Result<String, ExecutionError> {
        self.transcript.push(Role::User, prompt);
        let raw = self.session.invoke(prompt).await?;
        let answer = normalize(&raw);
        self.transcript.push(Role::Assistant, answer.clone());
        Ok(answer)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Wipe the transcript. The durable memory stores are untouched.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        tracing::debug!(session = %self.session.id(), "transcript cleared");
    }

    pub fn session(&self) -> &OrchestrationSession {
        &self.session
    }
}
