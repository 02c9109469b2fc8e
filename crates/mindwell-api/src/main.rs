//! Mindwell CLI and HTTP/SSE entry point.
//!
//! Binary name: `mindwell`
//!
//! Parses CLI arguments, sets up tracing, loads config and the generation
//! backend, then dispatches to a command or starts the server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use mindwell_infra::assets::BackgroundAsset;
use mindwell_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions {
        default_filter: TracingOptions::filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        otel: cli.otel,
    };
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // These need neither config nor a backend.
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "mindwell", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Affirmation { mood } => return cli::wellness::affirmation(*mood, cli.json),
        Commands::Moods => return cli::wellness::moods(cli.json),
        Commands::Sentiment { text } => return cli::wellness::sentiment(&text.join(" "), cli.json),
        _ => {}
    }

    let state = AppState::init(&cli.overrides()).await?;
    tracing::debug!(data_dir = %state.data_dir.display(), "Application state ready");

    match cli.command {
        Commands::Chat { mood } => {
            BackgroundAsset::check_configured(state.config.assets.background_image.as_deref())
                .await;
            cli::chat::loop_runner::run_chat_loop(&state, mood).await?;
        }

        Commands::Ask { message } => {
            cli::ask::ask(&state, &message.join(" "), cli.json).await?;
        }

        Commands::Check => {
            cli::check::check(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            // Surface a missing background at startup rather than per request.
            BackgroundAsset::check_configured(state.config.assets.background_image.as_deref())
                .await;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Mindwell API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {} {} via {}",
                console::style("Model:").bold(),
                state.provider.model(),
                state.provider.name()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let sessions = state.sessions.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!(open_sessions = sessions.len(), "Server stopped");
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. }
        | Commands::Affirmation { .. }
        | Commands::Moods
        | Commands::Sentiment { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
