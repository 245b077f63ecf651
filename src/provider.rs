use crate::config::Config;
use serde_json::{json, Value};

pub const COMPLETION_MAX_TOKENS: u32 = 1500;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("completion request failed: {0}")]
    Request(String),
    #[error("malformed completion response: {0}")]
    Response(String),
}

/// The one thing the rest of the tool needs from a completion provider.
pub trait Completion {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    models_endpoint: String,
    completions_endpoint: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            models_endpoint: config.api_endpoint_models.clone(),
            completions_endpoint: config.completions_endpoint(),
            api_key: config.api_key.clone(),
            model: config.selected_model.clone(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let value = self.get(&self.models_endpoint)?;
        Ok(parse_models(&value))
    }

    fn get(&self, url: &str) -> Result<Value, ProviderError> {
        let mut request = ureq::get(url);
        if !self.api_key.is_empty() {
            request = request.set("Authorization", &format!("Bearer {}", self.api_key));
        }
        let response = request
            .call()
            .map_err(|err| ProviderError::Request(err.to_string()))?;
        response
            .into_json::<Value>()
            .map_err(|err| ProviderError::Response(err.to_string()))
    }

    fn post_json(&self, url: &str, body: Value) -> Result<Value, ProviderError> {
        let mut request = ureq::post(url);
        if !self.api_key.is_empty() {
            request = request.set("Authorization", &format!("Bearer {}", self.api_key));
        }
        let response = request
            .send_json(body)
            .map_err(|err| ProviderError::Request(err.to_string()))?;
        response
            .into_json::<Value>()
            .map_err(|err| ProviderError::Response(err.to_string()))
    }
}

impl Completion for CompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "max_tokens": COMPLETION_MAX_TOKENS,
        });
        let value = self.post_json(&self.completions_endpoint, body)?;
        parse_completion(&value)
    }
}

/// Model ids from a `{"data": [{"id": …}, …]}` listing. Entries without an
/// id are skipped; a missing list is treated as empty.
pub(crate) fn parse_models(value: &Value) -> Vec<String> {
    value
        .get("data")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(|model| model.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// First choice text from a completion response, trimmed.
pub(crate) fn parse_completion(value: &Value) -> Result<String, ProviderError> {
    let text = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("text"))
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::Response("no completion choices returned".to_string()))?;
    Ok(text.trim().to_string())
}
