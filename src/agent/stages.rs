// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTÁGIOS DO WORKFLOW
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Pesquisa: query → busca → trechos
// Redação:  trechos + query → prompt → texto gerado
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt::Write as _;

use crate::llm::LlmClient;
use crate::search::{SearchClient, SearchError};
use crate::types::{SearchQuery, Snippet, MAX_SEARCH_RESULTS};
use crate::utils::estimate_tokens;

use super::state::{Answered, Pending, Researched, SessionRecord, WorkflowError};

const PROMPT_HEADER: &str = "You are an AI assistant providing highly accurate, factual answers.\n\
Strictly base your response on the research data provided.\n\
Avoid assumptions and provide structured, well-cited responses.";

const PROMPT_FOOTER: &str = "Output a fact-checked, well-structured response.";

/// Monta o prompt de redação: instruções, pergunta e trechos numerados
pub fn build_prompt(query: &str, snippets: &[Snippet]) -> String {
    let mut prompt = String::with_capacity(
        PROMPT_HEADER.len()
            + PROMPT_FOOTER.len()
            + query.len()
            + snippets.iter().map(|s| s.title.len() + s.content.len() + 16).sum::<usize>()
            + 64,
    );

    prompt.push_str(PROMPT_HEADER);
    prompt.push_str("\n\nQuestion: ");
    prompt.push_str(query);
    prompt.push_str("\n\nResearch Data:\n");

    for (i, snippet) in snippets.iter().enumerate() {
        // write! em String não falha
        let _ = write!(prompt, "[{}] {}\n{}\n\n", i + 1, snippet.title, snippet.content);
    }

    prompt.push_str(PROMPT_FOOTER);
    prompt
}

/// Estágio de pesquisa
///
/// Pede no máximo [`MAX_SEARCH_RESULTS`] resultados e guarda os trechos na
/// ordem recebida. Zero resultados é falha; a redação não roda sem dados.
pub async fn research(
    client: &dyn SearchClient,
    record: SessionRecord<Pending>,
) -> Result<SessionRecord<Researched>, WorkflowError> {
    if record.query().trim().is_empty() {
        return Err(WorkflowError::EmptyQuery);
    }

    log::info!("🔍 Pesquisando: {}", record.query());

    let query = SearchQuery::new(record.query());
    let result = client.search(&query).await.map_err(|e| {
        log::error!("❌ Erro na API de busca: {}", e);
        WorkflowError::SearchFailure(e)
    })?;

    let mut snippets = result.snippets;
    if snippets.is_empty() {
        log::warn!("⚠️ Nenhum resultado de busca encontrado");
        return Err(WorkflowError::SearchFailure(SearchError::NoResults));
    }
    if snippets.len() > MAX_SEARCH_RESULTS {
        log::debug!(
            "Provedor devolveu {} resultados; mantendo os {} primeiros",
            snippets.len(),
            MAX_SEARCH_RESULTS
        );
        snippets.truncate(MAX_SEARCH_RESULTS);
    }

    log::info!("📚 {} trechos coletados", snippets.len());
    Ok(record.with_research(snippets))
}

/// Estágio de redação
///
/// Uma única chamada ao modelo; o texto devolvido é armazenado sem alteração.
/// Sem trechos não há redação.
pub async fn draft(
    client: &dyn LlmClient,
    record: SessionRecord<Researched>,
) -> Result<SessionRecord<Answered>, WorkflowError> {
    if record.research_data().is_empty() {
        log::warn!("⚠️ Redação sem dados de pesquisa recusada");
        return Err(WorkflowError::SearchFailure(SearchError::NoResults));
    }

    let prompt = build_prompt(record.query(), record.research_data());

    log::info!(
        "✍️ Gerando resposta (prompt ~{} tokens)...",
        estimate_tokens(&prompt)
    );

    let answer = client.generate(&prompt).await.map_err(|e| {
        log::error!("❌ Erro na API de geração: {}", e);
        WorkflowError::GenerationFailure(e)
    })?;

    Ok(record.with_answer(answer))
}
