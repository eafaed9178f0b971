// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESEARCH DRAFT CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Uso:
//   research-draft-cli "What are the latest AI trends?"
//   research-draft-cli                      (lê a pergunta do stdin)
//   research-draft-cli --reference "..." "pergunta"
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use research_draft::config::{create_runtime, load_app_config, load_dotenv, AppConfig};
use research_draft::evaluation::score_answer;
use research_draft::llm::HuggingFaceClient;
use research_draft::search::TavilyClient;
use research_draft::utils::{first_sentence, word_count};
use research_draft::{ResearchWorkflow, VERSION};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Pesquisa na web e redige uma resposta com um LLM hospedado.
#[derive(Parser, Debug)]
#[command(name = "research-draft-cli", version, about, long_about = None)]
struct Cli {
    /// Pergunta de pesquisa (lida do stdin se omitida)
    query: Vec<String>,

    /// Resposta de referência para calcular a pontuação de acurácia
    #[arg(short, long, env = "REFERENCE_ANSWER")]
    reference: Option<String>,

    /// Mostra as fontes usadas na resposta
    #[arg(short, long)]
    sources: bool,

    /// Verbosidade dos logs (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Pergunta vinda dos argumentos ou, na falta deles, do stdin
fn read_query(args: &[String]) -> anyhow::Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    print!("Enter your research query: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read query from stdin")?;
    Ok(line.trim().to_string())
}

fn build_workflow(config: &AppConfig) -> ResearchWorkflow {
    let search = TavilyClient::with_base_url(
        config.search.api_key.expose().to_string(),
        &config.search.base_url,
    );
    let llm = HuggingFaceClient::new(config.llm.api_key.expose().to_string())
        .with_model(&config.llm.model)
        .with_max_new_tokens(config.llm.max_new_tokens)
        .with_base_url(&config.llm.base_url);

    ResearchWorkflow::new(Arc::new(search), Arc::new(llm))
}

fn main() -> anyhow::Result<()> {
    // .env antes de tudo; o clap também lê variáveis
    let dotenv_path = load_dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::debug!("research-draft v{}", VERSION);

    match &dotenv_path {
        Some(path) => log::info!("✓ Carregado .env de: {:?}", path),
        None => log::debug!("Nenhum arquivo .env encontrado"),
    }

    let config = match load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Erro: {}", e);
            eprintln!();
            eprintln!("Defina as variáveis no arquivo .env ou no shell:");
            eprintln!("  export TAVILY_API_KEY=sua-chave-aqui");
            eprintln!("  export HUGGINGFACEHUB_API_KEY=sua-chave-aqui");
            std::process::exit(1);
        }
    };

    let query = read_query(&cli.query)?;
    if query.is_empty() {
        eprintln!("✗ Erro: pergunta vazia");
        std::process::exit(1);
    }

    let workflow = build_workflow(&config);
    let runtime = create_runtime().context("failed to build tokio runtime")?;

    let outcome = match runtime.block_on(workflow.run(query)) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("✗ Pesquisa falhou ({}): {}", e.failed_phase(), e);
            std::process::exit(1);
        }
    };

    log::info!("{}", outcome.timing.summary().replace('\n', " | "));

    println!();
    println!("{}", RULE);
    println!(" 💡 FINAL ANSWER");
    println!("{}", RULE);
    println!();
    println!("{}", outcome.answer);
    println!();

    if cli.sources {
        println!("Fontes:");
        for (i, snippet) in outcome.snippets.iter().enumerate() {
            let host = snippet.hostname().unwrap_or_else(|| snippet.url.clone());
            println!("  {}. {} ({})", i + 1, snippet.title, host);
            println!("     {}", snippet.url);
            println!("     {}", first_sentence(&snippet.content));
        }
        println!();
    }

    if let Some(reference) = &cli.reference {
        let score = score_answer(&outcome.answer, reference);
        println!(
            "✅ Accuracy Score: {:.2} ({}; precision {:.2}, recall {:.2})",
            score.f1,
            score.label(),
            score.precision,
            score.recall
        );
    }

    log::debug!(
        "Sessão {} iniciada em {} | {} palavras na resposta",
        outcome.session_id,
        outcome.started_at.to_rfc3339(),
        word_count(&outcome.answer)
    );

    Ok(())
}
