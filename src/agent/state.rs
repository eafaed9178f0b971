// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTADOS DA SESSÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::llm::LlmError;
use crate::search::SearchError;
use crate::types::Snippet;
use crate::utils::TimingStats;

/// Fase da sessão - transições explícitas
///
/// Só existe um caminho: `Pending → Researched → Answered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Query recebida, nenhuma chamada feita
    Pending,
    /// Trechos de pesquisa armazenados
    Researched,
    /// Resposta redigida. Estado terminal.
    Answered,
}

impl SessionPhase {
    /// Verifica se uma transição é válida
    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        matches!(
            (self, target),
            (SessionPhase::Pending, SessionPhase::Researched)
                | (SessionPhase::Researched, SessionPhase::Answered)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Pending => "pending",
            SessionPhase::Researched => "researched",
            SessionPhase::Answered => "answered",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_transition(from: SessionPhase, to: SessionPhase) {
    debug_assert!(from.can_transition_to(to), "transição inválida {} → {}", from, to);
    log::debug!("🔄 Sessão: {} → {}", from, to);
}

// Marcadores de tipo da sessão. Cada estágio consome o registro anterior
// e devolve o próximo, então nenhum campo é lido antes de ser produzido.

/// Sessão recém-criada
#[derive(Debug, Clone, PartialEq)]
pub struct Pending;

/// Sessão com trechos de pesquisa
#[derive(Debug, Clone, PartialEq)]
pub struct Researched {
    research_data: Vec<Snippet>,
}

/// Sessão com resposta redigida
#[derive(Debug, Clone, PartialEq)]
pub struct Answered {
    research_data: Vec<Snippet>,
    answer_draft: String,
}

/// Registro de uma sessão de pesquisa
///
/// `query` é imutável; `research_data` e `answer_draft` só existem a partir
/// das fases que os produzem.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord<S> {
    query: String,
    stage: S,
}

impl<S> SessionRecord<S> {
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl SessionRecord<Pending> {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            stage: Pending,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::Pending
    }

    /// Armazena os trechos de pesquisa (uma única vez)
    ///
    /// Só o estágio de pesquisa produz `Researched`, sempre com trechos.
    pub(crate) fn with_research(self, research_data: Vec<Snippet>) -> SessionRecord<Researched> {
        log_transition(SessionPhase::Pending, SessionPhase::Researched);
        SessionRecord {
            query: self.query,
            stage: Researched { research_data },
        }
    }
}

impl SessionRecord<Researched> {
    pub fn phase(&self) -> SessionPhase {
        SessionPhase::Researched
    }

    pub fn research_data(&self) -> &[Snippet] {
        &self.stage.research_data
    }

    /// Armazena a resposta redigida (uma única vez)
    pub fn with_answer(self, answer_draft: String) -> SessionRecord<Answered> {
        log_transition(SessionPhase::Researched, SessionPhase::Answered);
        SessionRecord {
            query: self.query,
            stage: Answered {
                research_data: self.stage.research_data,
                answer_draft,
            },
        }
    }
}

impl SessionRecord<Answered> {
    pub fn phase(&self) -> SessionPhase {
        SessionPhase::Answered
    }

    pub fn research_data(&self) -> &[Snippet] {
        &self.stage.research_data
    }

    pub fn answer_draft(&self) -> &str {
        &self.stage.answer_draft
    }

    /// Desmonta o registro em (query, trechos, resposta)
    pub fn into_parts(self) -> (String, Vec<Snippet>, String) {
        (self.query, self.stage.research_data, self.stage.answer_draft)
    }
}

/// Resultado final de uma execução do workflow
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub query: String,
    pub snippets: Vec<Snippet>,
    pub answer: String,
    pub timing: TimingStats,
}

/// Erros do workflow
///
/// Nenhum é recuperado localmente; o chamador recebe a falha como está.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("search failure: {0}")]
    SearchFailure(#[from] SearchError),

    #[error("generation failure: {0}")]
    GenerationFailure(#[from] LlmError),
}

impl WorkflowError {
    /// Fase em que a sessão parou
    pub fn failed_phase(&self) -> SessionPhase {
        match self {
            WorkflowError::EmptyQuery | WorkflowError::SearchFailure(_) => SessionPhase::Pending,
            WorkflowError::GenerationFailure(_) => SessionPhase::Researched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert!(SessionPhase::Pending.can_transition_to(SessionPhase::Researched));
        assert!(SessionPhase::Researched.can_transition_to(SessionPhase::Answered));

        assert!(!SessionPhase::Pending.can_transition_to(SessionPhase::Answered));
        assert!(!SessionPhase::Researched.can_transition_to(SessionPhase::Pending));
        assert!(!SessionPhase::Answered.can_transition_to(SessionPhase::Pending));
        assert!(!SessionPhase::Answered.can_transition_to(SessionPhase::Researched));
    }

    #[test]
    fn test_record_lifecycle() {
        let record = SessionRecord::new("What is Rust?");
        assert_eq!(record.phase(), SessionPhase::Pending);

        let record = record.with_research(vec![Snippet::new("t", "c", "https://a.com")]);
        assert_eq!(record.phase(), SessionPhase::Researched);
        assert_eq!(record.research_data().len(), 1);
        assert_eq!(record.query(), "What is Rust?");

        let record = record.with_answer("Rust is a language.".into());
        assert_eq!(record.phase(), SessionPhase::Answered);
        assert_eq!(record.answer_draft(), "Rust is a language.");

        let (query, snippets, answer) = record.into_parts();
        assert_eq!(query, "What is Rust?");
        assert_eq!(snippets.len(), 1);
        assert_eq!(answer, "Rust is a language.");
    }

    #[test]
    fn test_failed_phase() {
        let err = WorkflowError::from(SearchError::NoResults);
        assert_eq!(err.failed_phase(), SessionPhase::Pending);

        let err = WorkflowError::from(LlmError::RateLimitError);
        assert_eq!(err.failed_phase(), SessionPhase::Researched);
    }
}
