// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AVALIAÇÃO DE ACURÁCIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Compara a resposta gerada com uma resposta de referência usando
// sobreposição de palavras (precision, recall, F1).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashMap;

use crate::utils::tokenize_words;

/// Pontuação de uma resposta contra a referência
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccuracyScore {
    /// Fração das palavras da resposta presentes na referência
    pub precision: f32,
    /// Fração das palavras da referência presentes na resposta
    pub recall: f32,
    /// Média harmônica de precision e recall
    pub f1: f32,
}

impl AccuracyScore {
    /// Classificação legível para o F1
    pub fn label(&self) -> &'static str {
        match self.f1 {
            f if f >= 0.8 => "high",
            f if f >= 0.5 => "moderate",
            _ => "low",
        }
    }
}

/// Calcula a sobreposição de palavras entre resposta e referência
///
/// Palavras repetidas contam no máximo tantas vezes quanto aparecem nos dois
/// textos. Texto vazio em qualquer lado resulta em zero.
pub fn score_answer(predicted: &str, reference: &str) -> AccuracyScore {
    let predicted = tokenize_words(predicted);
    let reference = tokenize_words(reference);

    if predicted.is_empty() || reference.is_empty() {
        return AccuracyScore::default();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &reference {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut overlap = 0usize;
    for token in &predicted {
        if let Some(count) = counts.get_mut(token.as_str()) {
            if *count > 0 {
                *count -= 1;
                overlap += 1;
            }
        }
    }

    if overlap == 0 {
        return AccuracyScore::default();
    }

    let precision = overlap as f32 / predicted.len() as f32;
    let recall = overlap as f32 / reference.len() as f32;
    let f1 = 2.0 * precision * recall / (precision + recall);

    AccuracyScore {
        precision,
        recall,
        f1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "The common cold is a viral infection that affects the respiratory system, \
        typically caused by rhinovirus.";

    #[test]
    fn test_identical_texts() {
        let score = score_answer(REFERENCE, REFERENCE);
        assert!((score.f1 - 1.0).abs() < f32::EPSILON);
        assert_eq!(score.label(), "high");
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        let score = score_answer("the COMMON cold!", "The common cold.");
        assert!((score.f1 - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_disjoint_texts() {
        let score = score_answer("quantum chromodynamics", REFERENCE);
        assert_eq!(score, AccuracyScore::default());
        assert_eq!(score.label(), "low");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(score_answer("", REFERENCE).f1, 0.0);
        assert_eq!(score_answer(REFERENCE, "   ").f1, 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // 2 de 4 palavras em comum
        let score = score_answer("cold virus spreads fast", "common cold virus infection");
        assert!((score.precision - 0.5).abs() < 1e-6);
        assert!((score.recall - 0.5).abs() < 1e-6);
        assert!((score.f1 - 0.5).abs() < 1e-6);
        assert_eq!(score.label(), "moderate");
    }

    #[test]
    fn test_repeated_tokens_clipped() {
        // "cold" aparece uma vez na referência; só uma ocorrência conta
        let score = score_answer("cold cold cold cold", "cold virus");
        assert!((score.precision - 0.25).abs() < 1e-6);
        assert!((score.recall - 0.5).abs() < 1e-6);
    }
}
