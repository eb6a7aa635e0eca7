use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use negaposi_ai::VerdictService;
use negaposi_api::AppState;

/// Japanese sentiment verdict service for job descriptions.
#[derive(Parser, Debug)]
#[command(name = "negaposi", version)]
struct Args {
    /// Directory containing model.onnx and tokenizer.json.
    #[arg(long, env = "NEGAPOSI_MODEL_DIR", default_value = "models/sentence-bert-base-ja")]
    model_dir: PathBuf,

    /// Path to the trained sentiment artifact.
    #[arg(long, env = "NEGAPOSI_ARTIFACT", default_value = "models/nega_posi.json")]
    artifact: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "NEGAPOSI_LISTEN", default_value = "127.0.0.1:8000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("negaposi v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Both models must load before we bind; a broken environment means
    // the process exits here instead of serving errors.
    let service = VerdictService::load(&args.model_dir, &args.artifact)
        .context("loading inference artifacts")?;

    let model = service.model().to_string();
    let dim = service.dim();
    let state = AppState::new(Arc::new(service), model, dim);

    negaposi_api::serve(args.listen, state).await
}
