// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIMING UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Medição de tempo dos dois estágios do workflow.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::Instant;

/// Timer para medir duração de um estágio
pub struct ActionTimer {
    start: Instant,
    action_name: String,
}

impl ActionTimer {
    /// Inicia um novo timer
    pub fn start(action_name: &str) -> Self {
        Self {
            start: Instant::now(),
            action_name: action_name.to_string(),
        }
    }

    /// Tempo decorrido em milissegundos
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Para o timer e loga o tempo decorrido
    pub fn stop_and_log(self) -> u128 {
        let elapsed = self.elapsed_ms();
        log::info!("⏱️  {} completado em {}ms", self.action_name, elapsed);
        elapsed
    }

    /// Para o timer sem logar
    pub fn stop(self) -> u128 {
        self.elapsed_ms()
    }
}

/// Tempos de uma execução do workflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingStats {
    /// Tempo do estágio de pesquisa (ms)
    pub search_ms: u128,
    /// Tempo do estágio de redação (ms)
    pub draft_ms: u128,
}

impl TimingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_search(&mut self, ms: u128) {
        self.search_ms = ms;
    }

    pub fn record_draft(&mut self, ms: u128) {
        self.draft_ms = ms;
    }

    /// Tempo total dos dois estágios
    pub fn total_ms(&self) -> u128 {
        self.search_ms + self.draft_ms
    }

    /// Formata um resumo das estatísticas
    pub fn summary(&self) -> String {
        format!(
            "Timing Stats:\n\
             - Search: {}ms\n\
             - Draft: {}ms\n\
             - Total: {}ms",
            self.search_ms,
            self.draft_ms,
            self.total_ms()
        )
    }
}
