use crate::chat::prompts::{MAX_OUTPUT_TOKENS, SYSTEM_PROMPT};
use crate::chat::{ChatServiceError, ContextEntry, LanguageModel, Speaker};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
            role: role.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Part {
    // Non-text parts (function calls, inline data) are not requested and
    // deserialize with no text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: u32,
    #[serde(rename = "totalTokenCount", default)]
    pub total_token_count: u32,
}

impl GenerateContentResponse {
    /// Text of the first candidate. A blocked prompt or a candidate stopped
    /// for safety is an error, not an empty reply.
    pub fn text(&self) -> Result<String, ChatServiceError> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref()) {
            return Err(ChatServiceError::Blocked(reason.clone()));
        }

        let Some(candidate) = self.candidates.first() else {
            return Ok(String::new());
        };

        if let Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) =
            candidate.finish_reason.as_deref()
        {
            return Err(ChatServiceError::Blocked(reason.to_string()));
        }

        Ok(candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

fn role_for(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "user",
        Speaker::Assistant => "model",
    }
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Conversation so far, then the new utterance, under the campus
    /// system instruction.
    pub fn build_request(context: &[ContextEntry], utterance: &str) -> GenerateContentRequest {
        let mut contents: Vec<Content> = context
            .iter()
            .map(|entry| Content::text(Some(role_for(entry.speaker)), &entry.text))
            .collect();
        contents.push(Content::text(Some("user"), utterance));

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(None, SYSTEM_PROMPT)),
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
            }),
        }
    }

    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ChatServiceError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        tracing::debug!("Gemini API request contents count: {}", request.contents.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(ChatServiceError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        tracing::debug!(
            "Gemini API response (truncated): {}...",
            response_text.chars().take(500).collect::<String>()
        );

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            ChatServiceError::Decode(e)
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                completion_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini token usage"
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, context: &[ContextEntry], utterance: &str) -> Result<String, ChatServiceError> {
        let request = Self::build_request(context, utterance);
        self.generate_content(&request).await?.text()
    }
}
