use crate::error::GenerationError;
use crate::gateway::{ProviderKind, api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

/// Calls `generateContent` for `model`
pub async fn generate(
    client: &Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, GenerationError> {
    let body = GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: prompt }],
        }],
    };

    let response = client
        .post(format!("{}/{}:generateContent", GEMINI_API_BASE, model))
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(api_error(ProviderKind::Gemini, response).await);
    }

    let parsed: GenerateResponse = response.json().await?;
    parsed
        .text()
        .ok_or(GenerationError::EmptyResponse(ProviderKind::Gemini))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{"candidates": [
            {"content": {"parts": [{"text": "Hello "}, {"text": "world"}], "role": "model"}},
            {"content": {"parts": [{"text": "ignored"}]}}
        ]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert_eq!(parsed.text(), None);
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hi" }],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
    }
}
