/// LLM Client: the single point of entry for all Gemini API calls in SkillSync.
///
/// ARCHITECTURAL RULE: No other module may call the generative-AI vendor directly.
/// All LLM interactions MUST go through this module.
///
/// Models are hardcoded constants (not configuration) to prevent drift.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::analysis::GroundingLink;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Text and structured-output model.
pub const MODEL: &str = "gemini-3-flash-preview";
/// Speech synthesis model used for verdict playback.
pub const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const MAX_RETRIES: u32 = 3;
const DEFAULT_GROUNDING_TITLE: &str = "Market Source";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// One conversation turn. `role` is `user` or `model`; the system
/// instruction is sent as a role-less content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![Part::text(text)])
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    response_modalities: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline binary blob of the first candidate (e.g. synthesized audio).
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.first_parts().iter().find_map(|p| p.inline_data.as_ref())
    }

    /// Web sources cited by search grounding. Chunks without a URI are dropped.
    pub fn grounding_links(&self) -> Vec<GroundingLink> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| {
                m.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
                        Some(GroundingLink {
                            title: web
                                .title
                                .clone()
                                .filter(|t| !t.is_empty())
                                .unwrap_or_else(|| DEFAULT_GROUNDING_TITLE.to_string()),
                            uri: uri.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Deserializes the text content as JSON, tolerating markdown fences.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, LlmError> {
        let text = self.text().ok_or(LlmError::EmptyContent)?;
        serde_json::from_str(strip_json_fences(&text)).map_err(LlmError::Parse)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Call options
// ────────────────────────────────────────────────────────────────────────────

/// Per-call knobs. Defaults to the text model with thinking disabled.
#[derive(Debug, Clone, Copy)]
pub struct CallOptions<'a> {
    pub model: &'a str,
    pub system: Option<&'a str>,
    pub response_schema: Option<&'a Value>,
    pub google_search: bool,
    pub speech_voice: Option<&'a str>,
}

impl Default for CallOptions<'_> {
    fn default() -> Self {
        Self {
            model: MODEL,
            system: None,
            response_schema: None,
            google_search: false,
            speech_voice: None,
        }
    }
}

impl<'a> CallOptions<'a> {
    pub fn with_system(mut self, system: &'a str) -> Self {
        self.system = Some(system);
        self
    }

    /// Requests `application/json` output constrained by `schema`.
    pub fn with_json_schema(mut self, schema: &'a Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_google_search(mut self) -> Self {
        self.google_search = true;
        self
    }

    /// Switches to the speech model, returning audio spoken by `voice`.
    pub fn speech(voice: &'a str) -> Self {
        Self {
            model: TTS_MODEL,
            speech_voice: Some(voice),
            ..Self::default()
        }
    }
}

fn build_request<'a>(contents: &'a [Content], options: &CallOptions<'a>) -> GenerateContentRequest<'a> {
    let mut generation_config = GenerationConfig::default();

    if let Some(schema) = options.response_schema {
        generation_config.response_mime_type = Some("application/json");
        generation_config.response_schema = Some(schema);
    }

    match options.speech_voice {
        Some(voice) => {
            generation_config.response_modalities = vec!["AUDIO"];
            generation_config.speech_config = Some(json!({
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
            }));
        }
        None => {
            generation_config.thinking_config = Some(json!({ "thinkingBudget": 0 }));
        }
    }

    let tools = if options.google_search {
        vec![json!({ "googleSearch": {} })]
    } else {
        vec![]
    };

    GenerateContentRequest {
        contents,
        system_instruction: options.system.map(Content::system),
        tools,
        generation_config,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services in SkillSync.
/// Wraps the Gemini `generateContent` API with retry logic and response helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        contents: &[Content],
        options: CallOptions<'_>,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = build_request(contents, &options);
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", options.model);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            if let Some(usage) = &llm_response.usage_metadata {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                    options.model, usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Single-turn prompt returning plain text.
    pub async fn call_text(
        &self,
        prompt: &str,
        options: CallOptions<'_>,
    ) -> Result<String, LlmError> {
        let response = self.call(&[Content::user_text(prompt)], options).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}

/// Extracts the JSON body from model output wrapped in ```json ... ``` or
/// ``` ... ``` fences. Text without fences is returned trimmed.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let body = if let Some(start) = text.find("```json") {
        &text[start + "```json".len()..]
    } else if let Some(start) = text.find("```") {
        &text[start + "```".len()..]
    } else {
        return text;
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_with_surrounding_prose() {
        let input = "Here is the audit:\n```json\n{\"a\": 1}\n```\nGood luck!";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    fn response_from(value: Value) -> LlmResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_concatenates_parts() {
        let response = response_from(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}] } }]
        }));
        assert_eq!(response.text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn test_text_none_without_candidates() {
        assert!(response_from(json!({})).text().is_none());
    }

    #[test]
    fn test_json_parses_fenced_output() {
        let response = response_from(json!({
            "candidates": [{ "content": { "parts": [{"text": "```json\n{\"score\": 7}\n```"}] } }]
        }));
        let parsed: Value = response.json().unwrap();
        assert_eq!(parsed["score"], 7);
    }

    #[test]
    fn test_grounding_links_default_title_and_drop_missing_uri() {
        let response = response_from(json!({
            "candidates": [{
                "content": { "parts": [{"text": "{}"}] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://jobs.example.com/1", "title": "Example Jobs" } },
                    { "web": { "uri": "https://careers.example.org/2" } },
                    { "web": { "title": "No link" } },
                    {}
                ]}
            }]
        }));
        let links = response.grounding_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "Example Jobs");
        assert_eq!(links[1].title, "Market Source");
        assert_eq!(links[1].uri, "https://careers.example.org/2");
    }

    #[test]
    fn test_inline_data_found() {
        let response = response_from(json!({
            "candidates": [{ "content": { "parts": [{"inlineData": {"mimeType": "audio/L16;rate=24000", "data": "AAAA"}}] } }]
        }));
        assert_eq!(response.inline_data().map(|d| d.data.as_str()), Some("AAAA"));
    }

    #[test]
    fn test_request_json_mode_with_search() {
        let schema = json!({"type": "OBJECT"});
        let contents = vec![Content::user_text("hi")];
        let options = CallOptions::default()
            .with_system("be brief")
            .with_json_schema(&schema)
            .with_google_search();
        let value = serde_json::to_value(build_request(&contents, &options)).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["tools"][0], json!({"googleSearch": {}}));
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
        assert_eq!(value["contents"][0]["role"], "user");
    }

    #[test]
    fn test_request_speech_mode() {
        let contents = vec![Content::user_text("say it")];
        let options = CallOptions::speech("Kore");
        assert_eq!(options.model, TTS_MODEL);
        let value = serde_json::to_value(build_request(&contents, &options)).unwrap();

        assert_eq!(value["generationConfig"]["responseModalities"], json!(["AUDIO"]));
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );
        assert!(value["generationConfig"].get("thinkingConfig").is_none());
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_inline_part_serializes_camel_case() {
        let value = serde_json::to_value(Part::inline("application/pdf", "JVBERi0=")).unwrap();
        assert_eq!(value["inlineData"]["mimeType"], "application/pdf");
        assert!(value.get("text").is_none());
    }
}
