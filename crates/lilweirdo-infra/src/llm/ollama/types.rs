//! Ollama API request/response types.
//!
//! Only the fields the bot sends or reads are modelled; unknown response
//! fields are ignored.

use serde::{Deserialize, Serialize};

use lilweirdo_types::llm::ModelConfig;

/// Request body for `POST /api/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest<'a> {
    pub model: &'a str,
    /// Base model reference, `name:tag`.
    pub from: String,
    pub template: &'a str,
    pub parameters: CreateParameters<'a>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateParameters<'a> {
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub stop: &'a [String],
}

impl<'a> CreateRequest<'a> {
    pub fn new(name: &'a str, config: &'a ModelConfig) -> Self {
        Self {
            model: name,
            from: config.from_ref(),
            template: &config.template,
            parameters: CreateParameters {
                stop: &config.stop_sequences,
            },
            stream: false,
        }
    }
}

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Response body of a non-streaming `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub eval_count: Option<u64>,
    #[serde(default)]
    pub total_duration: Option<u64>,
}

/// Request body for `DELETE /api/delete`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest<'a> {
    pub model: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ModelConfig {
        ModelConfig {
            base_model: "mistral".to_string(),
            tag: "latest".to_string(),
            template: "Here's what they said:\n\n{{ .Prompt }}\n".to_string(),
            stop_sequences: vec!["[MSG]".to_string(), "[/MSG]".to_string()],
        }
    }

    #[test]
    fn create_request_shape() {
        let config = config();
        let body = serde_json::to_value(CreateRequest::new("lilweirdo-abc", &config)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "lilweirdo-abc",
                "from": "mistral:latest",
                "template": "Here's what they said:\n\n{{ .Prompt }}\n",
                "parameters": { "stop": ["[MSG]", "[/MSG]"] },
                "stream": false,
            })
        );
    }

    #[test]
    fn create_request_omits_empty_stop_list() {
        let config = ModelConfig {
            stop_sequences: Vec::new(),
            ..config()
        };
        let body = serde_json::to_value(CreateRequest::new("m", &config)).unwrap();
        assert_eq!(body["parameters"], json!({}));
    }

    #[test]
    fn generate_request_shape() {
        let body = serde_json::to_value(GenerateRequest {
            model: "lilweirdo-abc",
            prompt: "[MSG] at: hi [/MSG]",
            stream: false,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "model": "lilweirdo-abc", "prompt": "[MSG] at: hi [/MSG]", "stream": false })
        );
    }

    #[test]
    fn delete_request_shape() {
        let body = serde_json::to_value(DeleteRequest { model: "lilweirdo-abc" }).unwrap();
        assert_eq!(body, json!({ "model": "lilweirdo-abc" }));
    }

    #[test]
    fn generate_response_ignores_extra_fields() {
        let raw = r#"{"model":"lilweirdo-abc","created_at":"2024-01-01T00:00:00Z","response":"ok boomer","done":true,"context":[1,2,3],"eval_count":4}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.response, "ok boomer");
        assert!(parsed.done);
        assert_eq!(parsed.eval_count, Some(4));
        assert_eq!(parsed.total_duration, None);
    }
}
