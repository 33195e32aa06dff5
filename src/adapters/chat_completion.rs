use crate::adapters::http::{build_client, join_url, read_json};
use crate::config::toml_config::LlmConfig;
use crate::domain::ports::{Prompt, TextGenerator};
use crate::utils::error::{Result, TravelError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "LLM";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client (Groq by default).
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl ChatCompletionClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        temperature: Option<f32>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            api_key,
            model,
            temperature,
        })
    }

    pub fn from_config(config: &LlmConfig, timeout: Option<Duration>) -> Result<Self> {
        let api_key = validate_required_field("llm.api_key", &config.api_key)?;
        Self::new(
            config.base_url.clone(),
            api_key.clone(),
            config.model.clone(),
            config.temperature,
            timeout,
        )
    }

    fn build_request<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let url = join_url(&self.base_url, "chat/completions");
        tracing::debug!("Calling {} with model {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let body: ChatResponse = read_json(SERVICE, response).await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(TravelError::language_model("model returned an empty answer"));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_includes_system_message_first() {
        let client = ChatCompletionClient::new(
            "http://localhost".to_string(),
            "key".to_string(),
            "gemma2-9b-it".to_string(),
            None,
            None,
        )
        .unwrap();
        let prompt = Prompt::user("List destinations").with_system("You are a travel agent");

        let json = serde_json::to_value(client.build_request(&prompt)).unwrap();
        assert_eq!(json["model"], "gemma2-9b-it");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "List destinations");
        assert!(json.get("temperature").is_none());
    }
}
