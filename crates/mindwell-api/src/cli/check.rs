//! `mindwell check`: can the configured backend serve the configured model?

use std::time::{Duration, Instant};

use console::style;

use crate::state::AppState;

pub async fn check(state: &AppState, json: bool) -> anyhow::Result<()> {
    let backend = &state.config.backend;
    let spinner = indicatif::ProgressBar::new_spinner();
    if !json {
        if let Ok(template) = indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(format!("contacting {}...", backend.base_url));
        spinner.enable_steady_tick(Duration::from_millis(80));
    }

    let start = Instant::now();
    let result = state.provider.check().await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    spinner.finish_and_clear();

    let background = state.config.assets.background_image.as_deref();
    let background_ok = match background {
        Some(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
        None => true,
    };

    if json {
        let out = serde_json::json!({
            "provider": state.provider.name(),
            "model": state.provider.model(),
            "base_url": backend.base_url,
            "reachable": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
            "elapsed_ms": elapsed_ms,
            "transcription_url": state.config.speech.transcription_url,
            "background_ok": background_ok,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let mark = |ok: bool| {
            if ok {
                format!("{}", style("✓").green())
            } else {
                format!("{}", style("✗").red())
            }
        };
        println!();
        println!(
            "  {} Backend check for {} ({})",
            style("🔍").bold(),
            style(state.provider.model()).cyan(),
            state.provider.name()
        );
        println!();
        match &result {
            Ok(()) => println!(
                "  {} {} reachable, model available ({elapsed_ms} ms)",
                mark(true),
                backend.base_url
            ),
            Err(e) => println!("  {} {e}", mark(false)),
        }
        println!(
            "  {} Transcription endpoint: {}",
            style("·").dim(),
            state.config.speech.transcription_url
        );
        if let Some(path) = background {
            println!("  {} Background image {}", mark(background_ok), path.display());
        }
        println!();
    }

    if let Err(e) = result {
        anyhow::bail!("backend check failed: {e}");
    }
    Ok(())
}
