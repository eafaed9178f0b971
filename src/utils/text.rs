// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TEXT UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Utilitários para processamento de texto:
// - Token estimation
// - Tokenização por palavras (avaliação)
// - Previews para exibição
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::Regex;

/// Estimativa de tokens por caractere
const CHARS_PER_TOKEN: f32 = 4.0;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid word regex"));

/// Estima número de tokens em um texto
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() as f32 / CHARS_PER_TOKEN).ceil() as usize
}

/// Conta palavras em um texto
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Quebra o texto em palavras minúsculas, sem pontuação
pub fn tokenize_words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Extrai primeira sentença de um texto
pub fn first_sentence(text: &str) -> &str {
    let terminators = ['.', '!', '?'];
    for (i, c) in text.char_indices() {
        if terminators.contains(&c) {
            // Abreviações como "Dr." seguidas de minúscula não encerram a sentença
            let remaining = &text[i + c.len_utf8()..];
            if remaining.starts_with(char::is_whitespace)
                || remaining.starts_with(char::is_uppercase)
                || remaining.is_empty()
            {
                return &text[..=i];
            }
        }
    }
    text
}
