// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-backed implementations of the four assistant roles.
//!
//! [`LlmAssistant`] renders a prompt (plus a JSON schema for structured
//! roles), sends one completion through a [`ProviderAdapter`], and decodes
//! the answer. Markdown code fences around JSON answers are tolerated.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use supportdesk_config::model::GeminiConfig;
use supportdesk_core::types::ProviderRequest;
use supportdesk_core::{
    AutoResponder, Classification, DeskError, KnowledgeMatcher, MatchVerdict, ProviderAdapter,
    ResolutionSummary, Solution, Team, TicketClassifier, TicketMessage, TranscriptSummarizer,
};

/// Thinking disabled; used for the cheap roles.
const NO_THINKING: i32 = 0;
/// Provider picks the thinking budget; used for knowledge matching.
const DYNAMIC_THINKING: i32 = -1;

/// Model names used per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantModels {
    pub classify: String,
    pub matching: String,
    pub respond: String,
    pub summarize: String,
}

impl From<&GeminiConfig> for AssistantModels {
    fn from(config: &GeminiConfig) -> Self {
        Self {
            classify: config.classify_model.clone(),
            matching: config.match_model.clone(),
            respond: config.respond_model.clone(),
            summarize: config.summarize_model.clone(),
        }
    }
}

/// Implements every assistant role on top of a single LLM provider.
pub struct LlmAssistant {
    provider: Arc<dyn ProviderAdapter>,
    models: AssistantModels,
}

impl LlmAssistant {
    pub fn new(provider: Arc<dyn ProviderAdapter>, models: AssistantModels) -> Self {
        Self { provider, models }
    }

    async fn ask(&self, request: ProviderRequest) -> Result<String, DeskError> {
        let model = request.model.clone();
        let response = self.provider.complete(request).await?;
        debug!(
            model = %model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "assistant call completed"
        );
        Ok(response.content)
    }

    async fn ask_json<T: DeserializeOwned>(&self, request: ProviderRequest) -> Result<T, DeskError> {
        let text = self.ask(request).await?;
        parse_json_answer(&text)
    }
}

/// Decodes a JSON answer, tolerating a surrounding markdown code fence.
pub fn parse_json_answer<T: DeserializeOwned>(text: &str) -> Result<T, DeskError> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).map_err(|e| DeskError::Provider {
        message: format!("malformed assistant answer: {e}"),
        source: Some(Box::new(e)),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn classification_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "ticket_difficulty": { "type": "string", "enum": ["easy", "medium", "hard"] },
            "ticket_priority": { "type": "string", "enum": ["low", "medium", "high"] },
            "ticket_tone": {
                "type": "string",
                "enum": ["happy", "neutral", "frustrated", "angry", "confused"]
            },
            "team_id": {
                "type": ["string", "null"],
                "description": "team_id of the best matching team, or null if none fits"
            }
        },
        "required": ["ticket_difficulty", "ticket_priority", "ticket_tone", "team_id"]
    })
}

fn match_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "foundMatch": { "type": "boolean" },
            "solution": { "type": ["string", "null"] },
            "confidence": { "type": "number" }
        },
        "required": ["foundMatch", "solution", "confidence"]
    })
}

fn summary_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "problem": { "type": "string" },
            "solution": { "type": "string" },
            "shouldRemember": { "type": "boolean" }
        },
        "required": ["problem", "solution", "shouldRemember"]
    })
}

fn classification_prompt(content: &str, teams: &[Team]) -> String {
    let mut prompt = String::from(
        "Classify the following support ticket.\n\n\
         Decide its difficulty (easy: answerable directly without account access or \
         investigation; medium or hard otherwise), its priority, and the tone of the \
         customer. Assign it to the team whose scope fits best, using the team_id \
         exactly as listed, or null if no team fits.\n\n**Teams:**\n",
    );
    if teams.is_empty() {
        prompt.push_str("(no teams configured)\n");
    }
    for team in teams {
        let _ = writeln!(
            prompt,
            "- team_id: {} | name: {} | scope: {}",
            team.team_id,
            team.team_name,
            team.team_description.as_deref().unwrap_or("-")
        );
    }
    let _ = write!(prompt, "\n**Ticket:**\n{content}");
    prompt
}

fn match_prompt(content: &str, solutions: &[Solution]) -> String {
    let knowledge = solutions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "Suggestion {}:\nProblem: {}\nSolution: {}",
                i + 1,
                s.problem,
                s.solution
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n");

    format!(
        "You are a helpful support assistant.\n\n\
         **User Query:**\n\"{content}\"\n\n\
         **Knowledge Base (Known Problems & Solutions):**\n{knowledge}\n\n\
         Compare the user query with the known problems. If one of them describes the \
         same problem, return its solution. Only set foundMatch to true if your \
         confidence is above 0.8.\n\n\
         Answer with foundMatch, solution (null when there is no match) and confidence \
         between 0 and 1."
    )
}

fn response_prompt(content: &str, classification: &Classification) -> String {
    format!(
        "A customer wrote the following support request (priority: {}, tone: {}).\n\
         Reply directly to the customer with a short, friendly answer that resolves \
         the request, in the customer's language.\n\n{content}",
        classification.priority, classification.tone
    )
}

fn summary_prompt(ticket_content: Option<&str>, transcript: &[TicketMessage]) -> String {
    let conversation = transcript
        .iter()
        .map(|m| format!("{}: {}", m.sender_type.as_ref().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = String::from(
        "Analyze the following support ticket conversation and summarize it into a \
         \"Problem\" and \"Solution\". Also determine shouldRemember.\n\n\
         shouldRemember is TRUE if and only if the supporter provided a solution \
         IMMEDIATELY after the user's question, without asking any clarification \
         questions (one-shot resolution). It is FALSE if there was any clarification \
         or back-and-forth.\n\n",
    );
    if let Some(content) = ticket_content {
        let _ = write!(prompt, "Original ticket:\n{content}\n\n");
    }
    let _ = write!(prompt, "Conversation:\n{conversation}");
    prompt
}

#[async_trait]
impl TicketClassifier for LlmAssistant {
    async fn classify(&self, content: &str, teams: &[Team]) -> Result<Classification, DeskError> {
        let request = ProviderRequest {
            model: self.models.classify.clone(),
            system_prompt: None,
            prompt: classification_prompt(content, teams),
            response_schema: Some(classification_schema()),
            thinking_budget: Some(NO_THINKING),
        };
        let mut classification: Classification = self.ask_json(request).await?;

        if let Some(team_id) = &classification.team_id
            && !teams.iter().any(|t| &t.team_id == team_id)
        {
            warn!(team_id = %team_id, "classifier returned an unknown team, discarding");
            classification.team_id = None;
        }
        Ok(classification)
    }
}

#[async_trait]
impl KnowledgeMatcher for LlmAssistant {
    async fn find_match(
        &self,
        content: &str,
        solutions: &[Solution],
    ) -> Result<MatchVerdict, DeskError> {
        if solutions.is_empty() {
            return Ok(MatchVerdict::no_match());
        }
        let request = ProviderRequest {
            model: self.models.matching.clone(),
            system_prompt: None,
            prompt: match_prompt(content, solutions),
            response_schema: Some(match_schema()),
            thinking_budget: Some(DYNAMIC_THINKING),
        };
        self.ask_json(request).await
    }
}

#[async_trait]
impl AutoResponder for LlmAssistant {
    async fn respond(
        &self,
        content: &str,
        classification: &Classification,
    ) -> Result<String, DeskError> {
        let request = ProviderRequest {
            model: self.models.respond.clone(),
            system_prompt: Some("You are a customer support assistant.".to_string()),
            prompt: response_prompt(content, classification),
            response_schema: None,
            thinking_budget: Some(NO_THINKING),
        };
        let reply = self.ask(request).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(DeskError::provider("auto-response is empty"));
        }
        Ok(reply.to_string())
    }
}

#[async_trait]
impl TranscriptSummarizer for LlmAssistant {
    async fn summarize(
        &self,
        ticket_content: Option<&str>,
        transcript: &[TicketMessage],
    ) -> Result<ResolutionSummary, DeskError> {
        let request = ProviderRequest {
            model: self.models.summarize.clone(),
            system_prompt: None,
            prompt: summary_prompt(ticket_content, transcript),
            response_schema: Some(summary_schema()),
            thinking_budget: Some(NO_THINKING),
        };
        self.ask_json(request).await
    }
}
