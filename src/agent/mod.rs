// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESEARCH WORKFLOW - ORQUESTRADOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Executa pesquisa e redação, nessa ordem, sobre um único registro.
// Sem ramificações, sem loops, sem retry.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod stages;
mod state;

pub use stages::{build_prompt, draft, research};
pub use state::*;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::llm::LlmClient;
use crate::search::SearchClient;
use crate::utils::{ActionTimer, TimingStats};

/// Orquestrador de dois estágios
///
/// Cada chamada a [`ResearchWorkflow::run`] cria uma sessão nova; nenhum estado
/// é compartilhado entre queries.
pub struct ResearchWorkflow {
    search_client: Arc<dyn SearchClient>,
    llm_client: Arc<dyn LlmClient>,
}

impl ResearchWorkflow {
    /// Cria o workflow com os colaboradores fornecidos
    pub fn new(search_client: Arc<dyn SearchClient>, llm_client: Arc<dyn LlmClient>) -> Self {
        Self {
            search_client,
            llm_client,
        }
    }

    /// Executa `pending → researched → answered` para uma query
    pub async fn run(&self, query: impl Into<String>) -> Result<ResearchOutcome, WorkflowError> {
        let session_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut timing = TimingStats::new();

        let record = SessionRecord::new(query);
        log::info!("🆔 Sessão {} [{}]", session_id, record.phase());

        let timer = ActionTimer::start("Pesquisa");
        let record = research(self.search_client.as_ref(), record).await?;
        timing.record_search(timer.stop_and_log());
        log::debug!("Sessão {} [{}]", session_id, record.phase());

        let timer = ActionTimer::start("Redação");
        let record = draft(self.llm_client.as_ref(), record).await?;
        timing.record_draft(timer.stop_and_log());
        log::info!("✅ Sessão {} [{}]", session_id, record.phase());

        let (query, snippets, answer) = record.into_parts();

        Ok(ResearchOutcome {
            session_id,
            started_at,
            query,
            snippets,
            answer,
            timing,
        })
    }

    /// Executa o workflow e devolve só o texto da resposta
    pub async fn answer(&self, query: impl Into<String>) -> Result<String, WorkflowError> {
        self.run(query).await.map(|outcome| outcome.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient};
    use crate::search::{MockSearchClient, SearchError};
    use crate::types::Snippet;

    fn three_snippets() -> Vec<Snippet> {
        vec![
            Snippet::new("A", "alpha", "https://a.com"),
            Snippet::new("B", "beta", "https://b.com"),
            Snippet::new("C", "gamma", "https://c.com"),
        ]
    }

    #[tokio::test]
    async fn test_run_returns_generation_text_unmodified() {
        let search = Arc::new(MockSearchClient::with_results(three_snippets()));
        let llm = Arc::new(MockLlmClient::with_answer("The answer."));
        let workflow = ResearchWorkflow::new(search.clone(), llm.clone());

        let outcome = workflow.run("What is Rust?").await.unwrap();

        assert_eq!(outcome.answer, "The answer.");
        assert_eq!(outcome.query, "What is Rust?");
        assert_eq!(outcome.snippets.len(), 3);
        assert_eq!(search.call_count(), 1);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_auth_error_skips_generation() {
        let search = Arc::new(MockSearchClient::with_error(SearchError::Unauthorized(401)));
        let llm = Arc::new(MockLlmClient::new());
        let workflow = ResearchWorkflow::new(search, llm.clone());

        let err = workflow.run("anything").await.unwrap_err();

        assert_eq!(err, WorkflowError::SearchFailure(SearchError::Unauthorized(401)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_search_skips_generation() {
        let search = Arc::new(MockSearchClient::with_results(vec![]));
        let llm = Arc::new(MockLlmClient::new());
        let workflow = ResearchWorkflow::new(search, llm.clone());

        let err = workflow.answer("anything").await.unwrap_err();

        assert_eq!(err, WorkflowError::SearchFailure(SearchError::NoResults));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces() {
        let search = Arc::new(MockSearchClient::with_results(three_snippets()));
        let llm = Arc::new(MockLlmClient::with_error(LlmError::UnusableOutput("empty answer".into())));
        let workflow = ResearchWorkflow::new(search, llm);

        let err = workflow.run("q").await.unwrap_err();
        assert!(matches!(err, WorkflowError::GenerationFailure(LlmError::UnusableOutput(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let search = Arc::new(MockSearchClient::with_results(three_snippets()));
        let llm = Arc::new(MockLlmClient::with_answer("same"));
        let workflow = ResearchWorkflow::new(search, llm);

        let first = workflow.run("q").await.unwrap();
        let second = workflow.run("q").await.unwrap();

        assert_ne!(first.session_id, second.session_id);
        assert_eq!(first.answer, second.answer);
    }
}
