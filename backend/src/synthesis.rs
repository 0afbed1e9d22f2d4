use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::AppConfig;
use crate::prompt;

pub const MAX_OUTPUT_TOKENS: u32 = 1000;
/// Low temperature biases the generative model toward consistent structured
/// output. Determinism is favored, not guaranteed.
pub const SAMPLING_TEMPERATURE: f64 = 0.5;

/// The single failure kind the synthesizer surfaces. Upstream call errors,
/// parse errors and non-object results all collapse into this shape so the
/// orchestrator never sees a raw parser error.
#[derive(Debug, thiserror::Error)]
#[error("Could not retrieve specifications for '{model}': {detail}")]
pub struct SynthesisFailure {
    pub model: String,
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ChatError(pub String);

/// Seam over the generative text capability: prompt in, free-form text out.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponseBody {
    text: String,
}

/// Cohere chat client with a bounded output length and request timeout.
pub struct CohereChat {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl CohereChat {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.synthesis_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.cohere_api_url.clone(),
            api_key: config.cohere_api_key.clone(),
            model: config.cohere_model.clone(),
        })
    }
}

#[async_trait]
impl ChatCompletion for CohereChat {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let body = ChatRequest {
            model: &self.model,
            message: prompt,
            temperature: SAMPLING_TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError(format!("{}: {}", status, text)));
        }

        let parsed: ChatResponseBody = response
            .json()
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        Ok(parsed.text)
    }
}

/// Removes markdown code-fence markers the model sometimes wraps its JSON
/// in despite the prompt's instructions.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Renders the prompt, invokes the generative capability and parses its
/// response into one JSON object.
pub struct Synthesizer {
    chat: Arc<dyn ChatCompletion>,
}

impl Synthesizer {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }

    pub async fn synthesize(&self, model_name: &str) -> Result<Value, SynthesisFailure> {
        let failure = |detail: String| SynthesisFailure {
            model: model_name.to_string(),
            detail,
        };

        let prompt = prompt::build_prompt(model_name);
        let raw = self
            .chat
            .complete(&prompt)
            .await
            .map_err(|e| failure(e.0))?;

        let cleaned = strip_code_fences(&raw);
        let value: Value =
            serde_json::from_str(&cleaned).map_err(|e| failure(e.to_string()))?;

        if !value.is_object() {
            return Err(failure("response was not a JSON object".to_string()));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct MockChat {
        response: Result<String, String>,
        pub calls: AtomicUsize,
    }

    impl MockChat {
        fn replying(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(detail: &str) -> Self {
            Self {
                response: Err(detail.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for MockChat {
        async fn complete(&self, _prompt: &str) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map_err(ChatError)
        }
    }

    #[test]
    fn strips_json_fence_markers() {
        let raw = "```json\n{\"model\": \"Audi A4\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"model\": \"Audi A4\"}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[actix_web::test]
    async fn parses_fenced_json_object() {
        let synth = Synthesizer::new(Arc::new(MockChat::replying(
            "```json\n{\"engine\":{\"horsepower\":\"283 HP\"}}\n```",
        )));
        let value = synth.synthesize("Tesla Model 3").await.unwrap();
        assert_eq!(value["engine"]["horsepower"], "283 HP");
    }

    #[actix_web::test]
    async fn prose_response_collapses_into_synthesis_failure() {
        let synth = Synthesizer::new(Arc::new(MockChat::replying(
            "I'm sorry, I cannot provide specifications for that model.",
        )));
        let err = synth.synthesize("Tesla Model 3").await.unwrap_err();
        assert_eq!(err.model, "Tesla Model 3");
        assert!(!err.detail.is_empty());
    }

    #[actix_web::test]
    async fn non_object_json_is_rejected() {
        let synth = Synthesizer::new(Arc::new(MockChat::replying("[1, 2, 3]")));
        let err = synth.synthesize("Mazda MX-5").await.unwrap_err();
        assert!(err.detail.contains("not a JSON object"));
    }

    #[actix_web::test]
    async fn upstream_error_carries_model_name() {
        let synth = Synthesizer::new(Arc::new(MockChat::failing("503 Service Unavailable")));
        let err = synth.synthesize("Kia EV6").await.unwrap_err();
        assert_eq!(err.model, "Kia EV6");
        assert!(err.detail.contains("503"));
    }
}
