//! # Research Draft
//!
//! Agente de pesquisa em dois estágios: busca na web e redação de resposta
//! por um LLM hospedado.
//!
//! ## Fluxo
//!
//! 1. Recebe uma pergunta
//! 2. **Pesquisa**: busca até 5 resultados na API Tavily
//! 3. **Redação**: monta um prompt com a pergunta e os trechos e chama a
//!    Hugging Face Inference API uma única vez
//! 4. Devolve o texto gerado
//!
//! A sessão passa por `pending → researched → answered`, sem volta. Cada
//! transição consome o registro anterior ([`agent::SessionRecord`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use research_draft::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let workflow = ResearchWorkflow::new(
//!         Arc::new(TavilyClient::new(tavily_key)),
//!         Arc::new(HuggingFaceClient::new(hf_key)),
//!     );
//!     let answer = workflow.answer("What are the latest AI trends?").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

#![warn(rust_2018_idioms)]

/// Tipos fundamentais: [`types::Snippet`], [`types::SearchQuery`].
pub mod types;

/// Orquestrador, registro de sessão e os dois estágios.
pub mod agent;

/// Cliente de geração de texto.
///
/// Define a trait `LlmClient` e implementações para:
/// - Hugging Face Inference API
/// - Mock para testes
pub mod llm;

/// Cliente de busca web.
///
/// Define a trait `SearchClient` e implementações para:
/// - Tavily
/// - Mock para testes
pub mod search;

/// Pontuação de acurácia contra uma resposta de referência.
pub mod evaluation;

/// Utilitários de texto e timing.
pub mod utils;

/// Configuração via variáveis de ambiente e `.env`.
///
/// **Obrigatórias:**
/// - `TAVILY_API_KEY`
/// - `HUGGINGFACEHUB_API_KEY`
///
/// **Opcionais:**
/// - `HF_MODEL`: modelo de geração (padrão: "HuggingFaceH4/zephyr-7b-beta")
/// - `HF_MAX_NEW_TOKENS`: limite de tokens gerados (padrão: 500)
/// - `TAVILY_API_BASE_URL` / `HF_API_BASE_URL`: URLs base alternativas
pub mod config;

// Re-exports principais
pub use agent::{ResearchOutcome, ResearchWorkflow, WorkflowError};
pub use config::{create_runtime, load_app_config, load_dotenv, AppConfig, ConfigError};
pub use evaluation::{score_answer, AccuracyScore};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns.
pub mod prelude {
    pub use crate::agent::{ResearchOutcome, ResearchWorkflow, SessionPhase, WorkflowError};
    pub use crate::llm::{HuggingFaceClient, LlmClient, LlmError};
    pub use crate::search::{SearchClient, SearchError, TavilyClient};
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
