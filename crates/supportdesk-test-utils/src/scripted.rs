// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Programmable assistant roles for pipeline tests.
//!
//! `ScriptedAssistants` implements all four assistant traits with answers
//! set by the test, counts calls per role, can fail any role on demand, and
//! can hold classification behind a gate to observe pre-triage state.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use supportdesk_core::{
    AutoResponder, Classification, DeskError, Difficulty, KnowledgeMatcher, MatchVerdict, Priority,
    ResolutionSummary, Solution, Team, TicketClassifier, TicketMessage, Tone,
    TranscriptSummarizer,
};

/// One of the four assistant roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistantRole {
    Classify,
    Match,
    Respond,
    Summarize,
}

#[derive(Default)]
struct CallCounters {
    classify: AtomicUsize,
    matching: AtomicUsize,
    respond: AtomicUsize,
    summarize: AtomicUsize,
}

impl CallCounters {
    fn counter(&self, role: AssistantRole) -> &AtomicUsize {
        match role {
            AssistantRole::Classify => &self.classify,
            AssistantRole::Match => &self.matching,
            AssistantRole::Respond => &self.respond,
            AssistantRole::Summarize => &self.summarize,
        }
    }
}

/// Assistant roles with test-controlled answers.
pub struct ScriptedAssistants {
    classification: Mutex<Classification>,
    verdict: Mutex<MatchVerdict>,
    reply: Mutex<String>,
    summary: Mutex<ResolutionSummary>,
    failing: Mutex<HashSet<AssistantRole>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    calls: CallCounters,
    seen_solutions: Mutex<Vec<Solution>>,
    seen_transcript: Mutex<Vec<TicketMessage>>,
}

impl Default for ScriptedAssistants {
    fn default() -> Self {
        Self {
            classification: Mutex::new(Classification {
                difficulty: Difficulty::Medium,
                priority: Priority::Medium,
                tone: Tone::Neutral,
                team_id: None,
            }),
            verdict: Mutex::new(MatchVerdict::no_match()),
            reply: Mutex::new("Here is how to fix it.".to_string()),
            summary: Mutex::new(ResolutionSummary {
                problem: "problem".to_string(),
                solution: "solution".to_string(),
                should_remember: false,
            }),
            failing: Mutex::new(HashSet::new()),
            gate: Mutex::new(None),
            calls: CallCounters::default(),
            seen_solutions: Mutex::new(Vec::new()),
            seen_transcript: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedAssistants {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_classification(&self, classification: Classification) {
        *self.classification.lock().await = classification;
    }

    pub async fn set_verdict(&self, verdict: MatchVerdict) {
        *self.verdict.lock().await = verdict;
    }

    pub async fn set_reply(&self, reply: impl Into<String>) {
        *self.reply.lock().await = reply.into();
    }

    pub async fn set_summary(&self, summary: ResolutionSummary) {
        *self.summary.lock().await = summary;
    }

    /// Make every later call of `role` fail with a provider error.
    pub async fn fail(&self, role: AssistantRole) {
        self.failing.lock().await.insert(role);
    }

    /// Block classification until [`release_classification`](Self::release_classification).
    pub async fn hold_classification(&self) {
        *self.gate.lock().await = Some(Arc::new(Semaphore::new(0)));
    }

    pub async fn release_classification(&self) {
        if let Some(gate) = self.gate.lock().await.take() {
            gate.close();
        }
    }

    /// Number of calls made to `role`.
    pub fn calls(&self, role: AssistantRole) -> usize {
        self.calls.counter(role).load(Ordering::SeqCst)
    }

    /// Solutions passed to the most recent match call.
    pub async fn seen_solutions(&self) -> Vec<Solution> {
        self.seen_solutions.lock().await.clone()
    }

    /// Transcript passed to the most recent summarize call.
    pub async fn seen_transcript(&self) -> Vec<TicketMessage> {
        self.seen_transcript.lock().await.clone()
    }

    async fn enter(&self, role: AssistantRole) -> Result<(), DeskError> {
        self.calls.counter(role).fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().await.contains(&role) {
            return Err(DeskError::provider(format!("scripted {role:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl TicketClassifier for ScriptedAssistants {
    async fn classify(&self, _content: &str, _teams: &[Team]) -> Result<Classification, DeskError> {
        let gate = self.gate.lock().await.clone();
        if let Some(gate) = gate {
            // Closed on release; the error just means "go ahead".
            let _ = gate.acquire().await;
        }
        self.enter(AssistantRole::Classify).await?;
        Ok(self.classification.lock().await.clone())
    }
}

#[async_trait]
impl KnowledgeMatcher for ScriptedAssistants {
    async fn find_match(
        &self,
        _content: &str,
        solutions: &[Solution],
    ) -> Result<MatchVerdict, DeskError> {
        self.enter(AssistantRole::Match).await?;
        *self.seen_solutions.lock().await = solutions.to_vec();
        Ok(self.verdict.lock().await.clone())
    }
}

#[async_trait]
impl AutoResponder for ScriptedAssistants {
    async fn respond(
        &self,
        _content: &str,
        _classification: &Classification,
    ) -> Result<String, DeskError> {
        self.enter(AssistantRole::Respond).await?;
        Ok(self.reply.lock().await.clone())
    }
}

#[async_trait]
impl TranscriptSummarizer for ScriptedAssistants {
    async fn summarize(
        &self,
        _ticket_content: Option<&str>,
        transcript: &[TicketMessage],
    ) -> Result<ResolutionSummary, DeskError> {
        self.enter(AssistantRole::Summarize).await?;
        *self.seen_transcript.lock().await = transcript.to_vec();
        Ok(self.summary.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn counts_calls_and_injects_failures() {
        let assistants = ScriptedAssistants::new();
        assistants.classify("x", &[]).await.unwrap();
        assistants.fail(AssistantRole::Classify).await;
        assert!(assistants.classify("x", &[]).await.is_err());
        assert_eq!(assistants.calls(AssistantRole::Classify), 2);
        assert_eq!(assistants.calls(AssistantRole::Match), 0);
    }

    #[tokio::test]
    async fn gate_holds_classification_until_released() {
        let assistants = Arc::new(ScriptedAssistants::new());
        assistants.hold_classification().await;

        let task = {
            let assistants = assistants.clone();
            tokio::spawn(async move { assistants.classify("x", &[]).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());

        assistants.release_classification().await;
        task.await.unwrap().unwrap();
    }
}
