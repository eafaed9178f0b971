// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE DE BUSCA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para busca web.
// Provedor real: Tavily. Mock para testes.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{SearchQuery, Snippet};

/// URL base padrão da API Tavily
pub const TAVILY_DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Erros do cliente de busca
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("Search API error: {0}")]
    ApiError(String),

    #[error("Search API rejected credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response format: {0}")]
    ParseError(String),

    #[error("Search returned no results")]
    NoResults,
}

/// Resultado de uma busca
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Trechos na ordem devolvida pelo provedor
    pub snippets: Vec<Snippet>,
    /// Tempo de resposta reportado pelo provedor, em segundos
    pub response_time: Option<f64>,
}

/// Trait principal para clientes de busca
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Executa uma única busca, pedindo no máximo `query.max_results` resultados
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente mock para testes
///
/// Devolve sempre a mesma resposta e conta quantas vezes foi chamado.
#[derive(Debug, Default)]
pub struct MockSearchClient {
    pub mock_results: Option<Vec<Snippet>>,
    pub mock_error: Option<SearchError>,
    calls: AtomicUsize,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<Snippet>) -> Self {
        Self {
            mock_results: Some(results),
            ..Self::default()
        }
    }

    pub fn with_error(error: SearchError) -> Self {
        Self {
            mock_error: Some(error),
            ..Self::default()
        }
    }

    /// Número de buscas recebidas
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, _query: &SearchQuery) -> Result<SearchResult, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.mock_error {
            return Err(error.clone());
        }

        let snippets = self.mock_results.clone().unwrap_or_else(|| {
            vec![Snippet::new(
                "Mock Title",
                "Mock snippet",
                "https://example.com/mock",
            )]
        });

        Ok(SearchResult {
            snippets,
            response_time: None,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO TAVILY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
    #[serde(default)]
    response_time: Option<f64>,
}

#[derive(Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl From<TavilyHit> for Snippet {
    fn from(hit: TavilyHit) -> Self {
        Snippet {
            title: hit.title,
            content: hit.content,
            url: hit.url,
        }
    }
}

/// Cliente para a API de busca Tavily
pub struct TavilyClient {
    api_key: String,
    search_endpoint: String,
    client: reqwest::Client,
}

impl TavilyClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, TAVILY_DEFAULT_BASE_URL)
    }

    /// Aponta o cliente para outra URL base (proxy, servidor de teste)
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            search_endpoint: format!("{}/search", base_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint de busca efetivo
    pub fn endpoint(&self) -> &str {
        &self.search_endpoint
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query: &query.q,
            max_results: query.max_results,
            search_depth: "basic",
        };

        log::debug!("🌐 POST {} (max_results={})", self.search_endpoint, query.max_results);

        let response = self
            .client
            .post(&self.search_endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        match status {
            200..=299 => {}
            401 | 403 => return Err(SearchError::Unauthorized(status)),
            429 => return Err(SearchError::RateLimitError),
            _ => return Err(SearchError::ApiError(format!("HTTP {}: {}", status, body))),
        }

        let parsed: TavilyResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::ParseError(e.to_string()))?;

        Ok(SearchResult {
            snippets: parsed.results.into_iter().map(Snippet::from).collect(),
            response_time: parsed.response_time,
        })
    }
}
