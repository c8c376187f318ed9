// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider adapter for the supportdesk assistants.
//!
//! Implements [`ProviderAdapter`] on top of the `generateContent` API with
//! optional structured (JSON schema) output and thinking budgets.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use supportdesk_config::model::GeminiConfig;
use supportdesk_core::error::DeskError;
use supportdesk_core::traits::{PluginAdapter, ProviderAdapter};
use supportdesk_core::types::{HealthStatus, ProviderRequest, ProviderResponse, TokenUsage};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, ThinkingConfig};

/// Environment variable consulted when `gemini.api_key` is not configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config, then `GEMINI_API_KEY`, otherwise an error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a provider from the `[gemini]` configuration section.
    pub fn new(config: &GeminiConfig) -> Result<Self, DeskError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = GeminiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(base_url = %config.base_url, "Gemini provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

/// Converts a [`ProviderRequest`] into the Gemini wire format.
fn to_generate_request(request: &ProviderRequest) -> GenerateContentRequest {
    let mut generation = GenerationConfig::default();
    if let Some(schema) = &request.response_schema {
        generation.response_mime_type = Some("application/json".to_string());
        generation.response_json_schema = Some(schema.clone());
    }
    if let Some(budget) = request.thinking_budget {
        generation.thinking_config = Some(ThinkingConfig {
            thinking_budget: budget,
        });
    }
    let has_generation = generation.response_mime_type.is_some()
        || generation.thinking_config.is_some();

    GenerateContentRequest {
        contents: vec![Content::user(request.prompt.clone())],
        system_instruction: request.system_prompt.clone().map(Content::system),
        generation_config: has_generation.then_some(generation),
    }
}

fn resolve_api_key(config_key: Option<&str>) -> Result<String, DeskError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.to_string());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            DeskError::Config(format!(
                "Gemini API key not found. Set gemini.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn health_check(&self) -> Result<HealthStatus, DeskError> {
        // No API call: health checks must not consume quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DeskError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, DeskError> {
        let api_request = to_generate_request(&request);
        let response = self
            .client
            .generate_content(&request.model, &api_request)
            .await?;

        let content = response.text();
        if content.trim().is_empty() {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .or_else(|| response.candidates.first().and_then(|c| c.finish_reason.clone()));
            return Err(DeskError::provider(match reason {
                Some(reason) => format!("response is empty ({reason})"),
                None => "response is empty".to_string(),
            }));
        }

        let usage = response.usage_metadata.unwrap_or_default();
        Ok(ProviderResponse {
            content,
            model: response.model_version.unwrap_or(request.model),
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}
