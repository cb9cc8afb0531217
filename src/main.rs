use clap::Parser;

mod audio;
mod claude_client;
mod cli;
mod config;
mod openai_client;
mod pipeline;
mod slide;
mod types;
mod utils;
mod video;
mod wordlist;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let args = cli::Args::parse();
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = utils::check_tools_available(&config.soffice_bin) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    match pipeline::run(&config).await {
        Ok(summary) => {
            if summary.words_failed > 0 {
                tracing::warn!(
                    "{} of {} words failed; re-run to retry them",
                    summary.words_failed,
                    summary.words_completed + summary.words_failed
                );
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,vocab_clips=trace,reqwest=info,hyper=info".to_string()
        } else {
            "info,vocab_clips=info,reqwest=warn,hyper=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
    Ok(())
}
