//! OpenAI-compatible chat client.
//!
//! Talks to a local Ollama (or any compatible) `/chat/completions` endpoint
//! with a blocking client; the whole program is synchronous and the only
//! suspension points are stdin and the model's response.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{PennyError, Result};
use crate::settings::Settings;
use crate::tools::ToolSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain("assistant", content)
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }

    fn plain(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, as the wire format delivers it.
    pub arguments: String,
}

impl FunctionCall {
    pub fn parsed_arguments(&self) -> Result<Value> {
        serde_json::from_str(&self.arguments)
            .map_err(|e| PennyError::Llm(format!("bad tool arguments: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

pub struct ChatClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    seed: u64,
    temperature: f32,
}

impl ChatClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        // No request timeout: a local model can legitimately take minutes.
        let http = reqwest::blocking::Client::builder().timeout(None).build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            seed: settings.seed,
            temperature: settings.temperature,
        })
    }

    fn request_body(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "seed": self.seed,
            "temperature": self.temperature,
            "stream": false,
        });
        if !tools.is_empty() {
            body["tools"] = Value::Array(
                tools
                    .iter()
                    .map(|t| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect(),
            );
        }
        body
    }

    /// One completion turn. Returns the assistant message, which carries
    /// either plain content or tool-call requests (or both).
    pub fn chat(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<ChatMessage> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(messages, tools);

        let response = self.http.post(&url).json(&body).send()?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(PennyError::Llm(format!("{status}: {text}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .map_err(|e| PennyError::Llm(format!("bad completion response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| PennyError::Llm("no choices in completion response".to_string()))
    }
}
