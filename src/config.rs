// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO RUNTIME E DOS PROVEDORES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Credenciais e parâmetros dos provedores de busca e geração.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;
use std::path::PathBuf;

use crate::llm::{DEFAULT_MAX_NEW_TOKENS, HF_DEFAULT_BASE_URL, HF_DEFAULT_MODEL};
use crate::search::TAVILY_DEFAULT_BASE_URL;

/// Variável com a chave da API Tavily
pub const TAVILY_API_KEY_VAR: &str = "TAVILY_API_KEY";

/// Variável com o token da Hugging Face
pub const HF_API_KEY_VAR: &str = "HUGGINGFACEHUB_API_KEY";

/// Erros de configuração (fatais na inicialização)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is missing. Check your .env file or export it in the shell")]
    MissingVar(&'static str),

    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} is not a valid URL: {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Credencial que não aparece em logs
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

/// Configuração do provedor de busca
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub api_key: ApiKey,
    pub base_url: String,
}

/// Configuração do provedor de geração
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub max_new_tokens: u32,
    pub base_url: String,
}

/// Configuração completa da aplicação
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Monta a configuração a partir de uma função de lookup
    ///
    /// Valores vazios contam como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let tavily_key = get(TAVILY_API_KEY_VAR).ok_or(ConfigError::MissingVar(TAVILY_API_KEY_VAR))?;
        let hf_key = get(HF_API_KEY_VAR).ok_or(ConfigError::MissingVar(HF_API_KEY_VAR))?;

        let search_base = match get("TAVILY_API_BASE_URL") {
            Some(value) => validate_url("TAVILY_API_BASE_URL", value)?,
            None => TAVILY_DEFAULT_BASE_URL.to_string(),
        };

        let llm_base = match get("HF_API_BASE_URL") {
            Some(value) => validate_url("HF_API_BASE_URL", value)?,
            None => HF_DEFAULT_BASE_URL.to_string(),
        };

        let max_new_tokens = match get("HF_MAX_NEW_TOKENS") {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "HF_MAX_NEW_TOKENS",
                        value,
                    })
                }
            },
            None => DEFAULT_MAX_NEW_TOKENS,
        };

        Ok(Self {
            search: SearchConfig {
                api_key: ApiKey(tavily_key),
                base_url: search_base,
            },
            llm: LlmConfig {
                api_key: ApiKey(hf_key),
                model: get("HF_MODEL").unwrap_or_else(|| HF_DEFAULT_MODEL.to_string()),
                max_new_tokens,
                base_url: llm_base,
            },
        })
    }
}

fn validate_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    match url::Url::parse(&value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(value),
        _ => Err(ConfigError::InvalidUrl { var, value }),
    }
}

/// Carrega a configuração a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `TAVILY_API_KEY`: chave da API de busca (obrigatória)
/// - `HUGGINGFACEHUB_API_KEY`: token da Hugging Face (obrigatório)
/// - `HF_MODEL`: modelo de geração (padrão: "HuggingFaceH4/zephyr-7b-beta")
/// - `HF_MAX_NEW_TOKENS`: limite de tokens gerados (padrão: 500)
/// - `TAVILY_API_BASE_URL`: URL base da busca (padrão: "https://api.tavily.com")
/// - `HF_API_BASE_URL`: URL base da geração (padrão: "https://api-inference.huggingface.co")
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::from_lookup(|var| std::env::var(var).ok())?;

    log::info!("📦 HF_MODEL={}", config.llm.model);
    log::info!("📦 HF_MAX_NEW_TOKENS={}", config.llm.max_new_tokens);
    if config.search.base_url != TAVILY_DEFAULT_BASE_URL {
        log::info!("📦 TAVILY_API_BASE_URL={}", config.search.base_url);
    }
    if config.llm.base_url != HF_DEFAULT_BASE_URL {
        log::info!("📦 HF_API_BASE_URL={}", config.llm.base_url);
    }

    Ok(config)
}

/// Tenta carregar o arquivo .env do diretório atual ou do pai.
///
/// Retorna o caminho carregado, se algum.
pub fn load_dotenv() -> Option<PathBuf> {
    let possible_paths = [PathBuf::from(".env"), PathBuf::from("../.env")];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => return Some(path.clone()),
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    None
}

/// Cria o runtime Tokio de thread única.
///
/// O workflow é estritamente sequencial; um worker basta.
///
/// ```rust,ignore
/// let runtime = create_runtime()?;
/// runtime.block_on(async { /* ... */ });
/// ```
pub fn create_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    log::debug!("🚀 Criando runtime Tokio (current_thread)");

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (TAVILY_API_KEY_VAR, "tvly-123"),
            (HF_API_KEY_VAR, "hf_abc"),
        ]))
        .unwrap();

        assert_eq!(config.search.api_key.expose(), "tvly-123");
        assert_eq!(config.search.base_url, TAVILY_DEFAULT_BASE_URL);
        assert_eq!(config.llm.model, HF_DEFAULT_MODEL);
        assert_eq!(config.llm.max_new_tokens, 500);
        assert_eq!(config.llm.base_url, HF_DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_tavily_key() {
        let err = AppConfig::from_lookup(lookup_from(&[(HF_API_KEY_VAR, "hf_abc")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(TAVILY_API_KEY_VAR));
    }

    #[test]
    fn test_missing_hf_key() {
        let err = AppConfig::from_lookup(lookup_from(&[(TAVILY_API_KEY_VAR, "tvly-123")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(HF_API_KEY_VAR));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (TAVILY_API_KEY_VAR, "   "),
            (HF_API_KEY_VAR, "hf_abc"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(TAVILY_API_KEY_VAR));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (TAVILY_API_KEY_VAR, "tvly-123"),
            (HF_API_KEY_VAR, "hf_abc"),
            ("HF_MODEL", "mistralai/Mistral-7B-Instruct-v0.2"),
            ("HF_MAX_NEW_TOKENS", "256"),
            ("TAVILY_API_BASE_URL", "http://localhost:8080"),
        ]))
        .unwrap();

        assert_eq!(config.llm.model, "mistralai/Mistral-7B-Instruct-v0.2");
        assert_eq!(config.llm.max_new_tokens, 256);
        assert_eq!(config.search.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_max_tokens() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (TAVILY_API_KEY_VAR, "tvly-123"),
            (HF_API_KEY_VAR, "hf_abc"),
            ("HF_MAX_NEW_TOKENS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (TAVILY_API_KEY_VAR, "tvly-123"),
            (HF_API_KEY_VAR, "hf_abc"),
            ("HF_API_BASE_URL", "ftp://nope"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: "HF_API_BASE_URL", .. }));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey("secret".into());
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
    }

    #[test]
    fn test_create_runtime() {
        let runtime = create_runtime().unwrap();
        assert_eq!(runtime.block_on(async { 1 + 1 }), 2);
    }
}
