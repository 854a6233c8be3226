use clap::Parser;
use std::io;

mod compose;
mod error;
mod handlers;
mod server;
mod state;
mod validate;

use server::run_server;
use state::AppState;

#[derive(Parser, Debug, Clone)]
#[command(name = "lore-server")]
#[command(about = "Loreforge generation HTTP server")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8787")]
    port: u16,

    /// Generation provider (openai or gemini)
    #[arg(long, env = "GENERATION_PROVIDER", default_value = "gemini")]
    provider: ProviderType,

    /// Generation API key; without it the service answers 503
    #[arg(long, env = "GENERATION_API_KEY")]
    api_key: Option<String>,

    /// Provider API base URL override
    #[arg(long, env = "GENERATION_BASE_URL")]
    base_url: Option<String>,

    /// Text model override
    #[arg(long, env = "GENERATION_MODEL")]
    model: Option<String>,

    /// Image model override
    #[arg(long, env = "GENERATION_IMAGE_MODEL")]
    image_model: Option<String>,

    /// Transient-failure retries per provider call (0 = single attempt)
    #[arg(long, env = "GENERATION_MAX_RETRIES", default_value = "0")]
    max_retries: u32,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ProviderType {
    #[value(name = "openai")]
    OpenAI,
    #[value(name = "gemini")]
    Gemini,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if cli.log_level.is_some() {
        env_logger::init();
    } else {
        let level = if cli.debug { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }

    log::info!("Starting lore-server on port {}", cli.port);
    log::info!("  Provider: {:?}", cli.provider);
    if let Some(base_url) = &cli.base_url {
        log::info!("  Base URL: {}", base_url);
    }
    if let Some(model) = &cli.model {
        log::info!("  Model: {}", model);
    }

    let provider = match cli.provider {
        ProviderType::OpenAI => "openai",
        ProviderType::Gemini => "gemini",
    };

    let state = AppState::new_with_config(
        provider,
        cli.api_key,
        cli.base_url,
        cli.model,
        cli.image_model,
        cli.max_retries,
    );

    run_server(cli.port, state).await
}
