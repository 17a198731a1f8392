use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verifier::{
    Gateway, GeminiClient,
    deterministic::{self, Outcome},
    llm::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL},
    server,
};

#[derive(Parser)]
#[command(name = "verifier")]
#[command(about = "Bug-fix verification gateway", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /verify and GET /health
    Serve {
        #[arg(long, env = "VERIFIER_HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "VERIFIER_PORT", default_value_t = 8000)]
        port: u16,

        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        gemini_api_key: Option<String>,

        #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
        gemini_model: String,

        #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
        gemini_base_url: String,
    },
    /// Run only the deterministic verifier against local files
    Check {
        /// Bug documentation file
        #[arg(long)]
        doc: PathBuf,

        /// Diff file; non-JSON content is treated as raw text
        #[arg(long)]
        diff: PathBuf,

        /// Bug key, e.g. BUG3
        #[arg(long)]
        bug: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("verifier={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
        } => serve(host, port, gemini_api_key, gemini_model, gemini_base_url).await,
        Commands::Check { doc, diff, bug } => check(doc, diff, bug).await,
    }
}

async fn serve(
    host: String,
    port: u16,
    api_key: Option<String>,
    model: String,
    base_url: String,
) -> anyhow::Result<()> {
    let client = GeminiClient::new(base_url, model, api_key)
        .context("Failed to build Gemini client")?;

    if !client.has_api_key() {
        tracing::warn!("GEMINI_API_KEY not set; only deterministic verdicts will succeed");
    }
    tracing::info!("Using Gemini model: {}", client.model());

    let gateway = Arc::new(Gateway::new(Arc::new(client)));
    let app = server::router(gateway);

    let bind_address = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Verification gateway listening on http://{}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn check(doc: PathBuf, diff: PathBuf, bug: String) -> anyhow::Result<()> {
    let bugs_doc = tokio::fs::read_to_string(&doc)
        .await
        .with_context(|| format!("Failed to read {}", doc.display()))?;
    let diff_text = tokio::fs::read_to_string(&diff)
        .await
        .with_context(|| format!("Failed to read {}", diff.display()))?;

    let diff_value = serde_json::from_str(&diff_text)
        .unwrap_or_else(|_| serde_json::json!({ "raw": diff_text }));

    let outcome = deterministic::verify(&bugs_doc, &diff_value, &bug);
    tracing::debug!("Deterministic outcome for {}: {:?}", bug, outcome);

    println!("{}: {}", bug, outcome);
    if let Outcome::Inconclusive(_) = outcome {
        println!("No deterministic verdict; the gateway would consult the LLM.");
    }

    Ok(())
}
