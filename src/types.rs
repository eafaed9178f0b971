// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

/// Tipo de URL (alias para String)
pub type Url = String;

/// Número máximo de resultados pedidos ao colaborador de busca
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Trecho de resultado de busca, exatamente como recebido do provedor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Título da página
    pub title: String,
    /// Corpo do trecho
    pub content: String,
    /// URL da fonte
    pub url: Url,
}

impl Snippet {
    /// Cria um novo trecho
    pub fn new(title: impl Into<String>, content: impl Into<String>, url: impl Into<Url>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
        }
    }

    /// Hostname da fonte, se a URL for válida
    pub fn hostname(&self) -> Option<String> {
        extract_hostname(&self.url)
    }
}

/// Query de busca com limite de resultados
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Texto da query
    pub q: String,
    /// Limite superior de resultados
    pub max_results: usize,
}

impl SearchQuery {
    /// Cria uma query com o limite padrão
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            max_results: MAX_SEARCH_RESULTS,
        }
    }
}

/// Extrai hostname de uma URL
pub fn extract_hostname(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hostname() {
        assert_eq!(
            extract_hostname("https://www.example.com/path"),
            Some("www.example.com".into())
        );
        assert_eq!(extract_hostname("invalid"), None);
    }

    #[test]
    fn test_search_query_default_bound() {
        let query = SearchQuery::new("rust async");
        assert_eq!(query.max_results, MAX_SEARCH_RESULTS);
        assert_eq!(query.q, "rust async");
    }

    #[test]
    fn test_snippet_hostname() {
        let snippet = Snippet::new("Docs", "body", "https://docs.rs/tokio");
        assert_eq!(snippet.hostname(), Some("docs.rs".into()));
    }
}
