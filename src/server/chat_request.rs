use serde::Deserialize;

use crate::providers::ChatMessage;

/// Inbound proxy request envelope.
///
/// Notes:
/// - `model` selects the pool mode only; the identifier sent upstream is
///   fixed in configuration.
/// - Sampling fields default to what the original front-end sent.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatProxyRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_fields_default_when_absent() {
        let request: ChatProxyRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1024);
        assert_eq!(request.model, None);
    }

    #[test]
    fn structured_content_survives_deserialization() {
        let request: ChatProxyRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":[{"type":"text","text":"hi"}]}],"model":"groq:study"}"#,
        )
        .unwrap();
        assert!(request.messages[0].content.is_array());
        assert_eq!(request.model.as_deref(), Some("groq:study"));
    }
}
