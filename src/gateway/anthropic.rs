use crate::error::GenerationError;
use crate::gateway::{ProviderKind, api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;
const SYSTEM_PROMPT: &str = "You are an expert in Google's Query Fan-Out system and SEO optimization. Provide detailed, actionable recommendations.";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first text block
    fn text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
    }
}

/// Calls the messages endpoint
pub async fn generate(
    client: &Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, GenerationError> {
    let body = MessagesRequest {
        model,
        max_tokens: MAX_TOKENS,
        temperature: 0.7,
        system: SYSTEM_PROMPT,
        messages: vec![Message {
            role: "user",
            content: prompt,
        }],
    };

    let response = client
        .post(ANTHROPIC_API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(api_error(ProviderKind::Anthropic, response).await);
    }

    let parsed: MessagesResponse = response.json().await?;
    parsed
        .text()
        .ok_or(GenerationError::EmptyResponse(ProviderKind::Anthropic))
}
