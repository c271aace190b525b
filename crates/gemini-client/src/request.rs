use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::*;

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
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Request body asking for JSON that matches `schema`.
pub(crate) fn build_request_body(prompt: &str, schema: Value) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema
        }
    })
}

/// Concatenated text of the first candidate.
pub(crate) fn extract_text(body: &str) -> Result<String, GeminiError> {
    let resp: GenerateResponse = serde_json::from_str(body)?;
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(GeminiError::EmptyResponse);
    }
    Ok(text)
}

/// Error message from an API error body, or the raw body.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

impl GeminiClient {
    /// POST a prompt and decode the returned JSON text into `T`.
    pub(super) async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, GeminiError> {
        let url = self.config.endpoint();
        tracing::debug!(model = %self.config.model, "Sending Gemini request");
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&build_request_body(prompt, schema))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let text = extract_text(&body)?;
        Ok(serde_json::from_str(&text)?)
    }
}
