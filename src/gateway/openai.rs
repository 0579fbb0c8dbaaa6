use crate::error::GenerationError;
use crate::gateway::{ProviderKind, api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are an expert in Google's Query Fan-Out system and SEO optimization.";
const MAX_TOKENS: u32 = 4000;
const REASONING_MAX_COMPLETION_TOKENS: u32 = 32000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Reasoning models take no system message and a fixed temperature
fn is_reasoning_model(model: &str) -> bool {
    model.contains("o1")
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    if is_reasoning_model(model) {
        ChatRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: 1.0,
            max_tokens: None,
            max_completion_tokens: Some(REASONING_MAX_COMPLETION_TOKENS),
        }
    } else {
        ChatRequest {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
            max_tokens: Some(MAX_TOKENS),
            max_completion_tokens: None,
        }
    }
}

/// Calls the chat completions endpoint
pub async fn generate(
    client: &Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, GenerationError> {
    let response = client
        .post(OPENAI_API_URL)
        .bearer_auth(api_key)
        .json(&build_request(model, prompt))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(api_error(ProviderKind::OpenAi, response).await);
    }

    let parsed: ChatResponse = response.json().await?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(GenerationError::EmptyResponse(ProviderKind::OpenAi))
}
