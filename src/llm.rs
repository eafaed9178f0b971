// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para geração de texto.
// Provedor real: Hugging Face Inference API. Mock para testes.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// URL base padrão da Hugging Face Inference API
pub const HF_DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Modelo padrão de geração
pub const HF_DEFAULT_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta";

/// Limite padrão de tokens gerados
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 500;

/// Marcadores que denunciam saída degenerada do modelo
const CORRUPTION_MARKERS: [&str; 4] = ["--c2-", "( ( (", "< ( (", "\u{FFFD}"];

/// Erros do cliente LLM
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Generation API rejected credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Invalid response format: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unusable model output: {0}")]
    UnusableOutput(String),
}

/// Trait principal para clientes LLM
///
/// Uma única chamada síncrona (do ponto de vista do chamador) por prompt.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Gera texto a partir de um prompt
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

type Responder = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;

/// Cliente mock para testes
///
/// Registra o último prompt recebido e o número de chamadas.
#[derive(Default)]
pub struct MockLlmClient {
    responder: Option<Box<Responder>>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(answer: impl Into<String>) -> Self {
        let answer = answer.into();
        Self::with_responder(move |_| Ok(answer.clone()))
    }

    pub fn with_error(error: LlmError) -> Self {
        Self::with_responder(move |_| Err(error.clone()))
    }

    /// Resposta calculada a partir do prompt
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|guard| guard.clone())
    }
}

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_prompt.lock() {
            *guard = Some(prompt.to_string());
        }

        match &self.responder {
            Some(responder) => responder(prompt),
            None => Ok("Mock generated answer".into()),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO HUGGING FACE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

/// Formatos aceitos pela Inference API
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<Generation>),
    Error { error: String },
    Single(Generation),
}

/// Cliente para a Hugging Face Inference API (text-generation)
pub struct HuggingFaceClient {
    api_key: String,
    model: String,
    max_new_tokens: u32,
    base_url: String,
    client: reqwest::Client,
}

impl HuggingFaceClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: HF_DEFAULT_MODEL.into(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            base_url: HF_DEFAULT_BASE_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').into();
        self
    }

    /// Endpoint do modelo configurado
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmClient for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: self.max_new_tokens,
                return_full_text: false,
            },
        };

        let endpoint = self.endpoint();
        log::debug!("🌐 POST {} (max_new_tokens={})", endpoint, self.max_new_tokens);

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        match status {
            200..=299 => {}
            401 | 403 => return Err(LlmError::Unauthorized(status)),
            429 => return Err(LlmError::RateLimitError),
            _ => return Err(LlmError::ApiError(format!("HTTP {}: {}", status, body))),
        }

        let text = extract_generated_text(&body)?;
        check_output(&text)?;
        Ok(text)
    }
}

/// Extrai o texto gerado de um corpo de resposta da Inference API
///
/// O texto é devolvido sem espaços nas bordas.
pub fn extract_generated_text(body: &str) -> Result<String, LlmError> {
    let parsed: GenerationResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ParseError(e.to_string()))?;

    match parsed {
        GenerationResponse::Batch(items) => items
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .ok_or_else(|| LlmError::UnusableOutput("empty generation list".into())),
        GenerationResponse::Single(g) => Ok(g.generated_text.trim().to_string()),
        GenerationResponse::Error { error } => Err(LlmError::ApiError(error)),
    }
}

/// Rejeita saídas vazias ou degeneradas
pub fn check_output(text: &str) -> Result<(), LlmError> {
    if text.trim().is_empty() {
        return Err(LlmError::UnusableOutput("empty answer".into()));
    }
    if let Some(marker) = CORRUPTION_MARKERS.iter().find(|m| text.contains(**m)) {
        return Err(LlmError::UnusableOutput(format!(
            "corrupted output marker {:?}",
            marker
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_records_prompt() {
        let client = MockLlmClient::new();
        let answer = client.generate("hello").await.unwrap();

        assert_eq!(answer, "Mock generated answer");
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.last_prompt().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_mock_responder() {
        let client = MockLlmClient::with_responder(|p| Ok(format!("len={}", p.len())));
        assert_eq!(client.generate("abcd").await.unwrap(), "len=4");
    }

    #[test]
    fn test_extract_batch_response() {
        let text = extract_generated_text(r#"[{"generated_text":"  Rust is fast.  "}]"#).unwrap();
        assert_eq!(text, "Rust is fast.");
    }

    #[test]
    fn test_extract_single_response() {
        let text = extract_generated_text(r#"{"generated_text":"ok"}"#).unwrap();
        assert_eq!(text, "ok");
    }

    #[test]
    fn test_extract_error_response() {
        let err = extract_generated_text(r#"{"error":"Model is currently loading"}"#).unwrap_err();
        assert_eq!(err, LlmError::ApiError("Model is currently loading".into()));
    }

    #[test]
    fn test_extract_empty_batch() {
        assert!(matches!(
            extract_generated_text("[]"),
            Err(LlmError::UnusableOutput(_))
        ));
    }

    #[test]
    fn test_extract_malformed() {
        assert!(matches!(
            extract_generated_text("not json"),
            Err(LlmError::ParseError(_))
        ));
    }

    #[test]
    fn test_check_output() {
        assert!(check_output("A normal answer.").is_ok());
        assert!(check_output("   ").is_err());
        assert!(check_output("text --c2- garbage").is_err());
        assert!(check_output("( ( ( ( (").is_err());
        assert!(check_output("Answer \u{FFFD}\u{FFFD} garbled").is_err());
    }

    #[test]
    fn test_replacement_char_from_body_is_unusable() {
        let text = extract_generated_text(r#"[{"generated_text":"Answer \ufffd\ufffd garbled"}]"#).unwrap();
        assert!(matches!(check_output(&text), Err(LlmError::UnusableOutput(_))));
    }

    #[test]
    fn test_endpoint_with_model() {
        let client = HuggingFaceClient::new("k".into())
            .with_base_url("http://localhost:9000/")
            .with_model("org/model");
        assert_eq!(client.endpoint(), "http://localhost:9000/models/org/model");
    }
}
