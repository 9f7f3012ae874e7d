use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use docqa_core::config::API_KEY_VARS;
use docqa_core::{Answer, Config, Pipeline, Session};
use docqa_llm::openai::OpenAiProvider;
use docqa_llm::{EmbeddingProvider, LlmProvider};
use docqa_memory::document::{extractor_for_path, read_document};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Parser, Debug)]
#[command(
    name = "docqa",
    version,
    about = "Ask questions about a PDF or text document"
)]
struct Cli {
    /// TOML config file [default: $DOCQA_CONFIG, then config/default.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// PDF, plain text or markdown document to load
    document: PathBuf,

    /// Question to answer; may be repeated. Reads one question per stdin line when omitted
    #[arg(short, long = "question")]
    questions: Vec<String>,

    /// Print the chunks each answer was grounded in
    #[arg(long)]
    show_sources: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    config.validate().context("invalid configuration")?;

    let Some(api_key) = config.secrets.openai_api_key.as_ref() else {
        bail!(
            "no API key configured: set {} or {}",
            API_KEY_VARS[0],
            API_KEY_VARS[1]
        );
    };
    let provider = OpenAiProvider::new(
        api_key.expose().to_owned(),
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.embedding_model.clone(),
        config.llm.max_tokens,
    )
    .with_temperature(config.llm.temperature);
    tracing::info!(
        model = provider.model(),
        embedding_model = %config.llm.embedding_model,
        "using OpenAI-compatible backend at {}",
        config.llm.base_url
    );
    let pipeline = Pipeline::new(provider.clone(), provider, &config);

    let extractor = extractor_for_path(&cli.document, config.document.max_file_size)?;
    let document = read_document(&cli.document, config.document.max_file_size)
        .await
        .with_context(|| format!("failed to load {}", cli.document.display()))?;

    println!("Processing...");
    let mut session = Session::new();
    pipeline
        .process_document(&mut session, extractor.as_ref(), document)
        .await?;
    println!("Document processed successfully! You can now ask questions.");

    if cli.questions.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            answer_question(&pipeline, &session, question, cli.show_sources).await;
        }
    } else {
        for question in &cli.questions {
            answer_question(&pipeline, &session, question, cli.show_sources).await;
        }
    }

    Ok(())
}

/// Errors are reported and the caller moves on to the next question.
async fn answer_question<E, G>(
    pipeline: &Pipeline<E, G>,
    session: &Session,
    question: &str,
    show_sources: bool,
) where
    E: EmbeddingProvider,
    G: LlmProvider,
{
    match pipeline.ask(session, question).await {
        Ok(answer) => println!("{}", render_answer(&answer, show_sources)),
        Err(e) => {
            tracing::warn!("question failed: {e}");
            eprintln!("Error: {e}");
        }
    }
}

fn render_answer(answer: &Answer, show_sources: bool) -> String {
    let mut out = answer.text.trim().to_owned();
    if show_sources {
        for source in &answer.sources {
            let _ = write!(
                out,
                "\n  [chunk {} @ {}..{}, score {:.3}]",
                source.chunk.chunk_index, source.chunk.start, source.chunk.end, source.score
            );
        }
    }
    out
}

fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_path {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("DOCQA_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
