//! `parley serve`: run the HTTP server until Ctrl+C or SIGTERM.

use crate::http;
use crate::state::AppState;

pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    print_banner(&state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    println!(
        "  {} Parley listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Why the server is (or is not) using the upstream service.
fn print_banner(state: &AppState) {
    let config = &state.upstream_config;
    let upstream = state.orchestrator.upstream();

    println!();
    if !config.has_api_key() {
        println!(
            "  {} GROQ_API_KEY not set. Running in fallback mode.",
            console::style("!").yellow().bold()
        );
    } else if !upstream.is_configured() {
        println!(
            "  {} Upstream client initialization failed. Running in fallback mode.",
            console::style("!").yellow().bold()
        );
    } else {
        println!(
            "  {} Upstream enabled ({}). Model: {}",
            console::style("✓").green(),
            upstream.provider_name().unwrap_or("unknown"),
            console::style(&config.model).cyan()
        );
        let format = if config.key_format_valid() {
            "valid"
        } else {
            "may be invalid"
        };
        println!("  {} API key format: {format}", console::style("✓").green());
    }

    if state.web_dir.is_dir() {
        println!("  Static files: {}", state.web_dir.display());
    }
    println!();
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A signal handler that fails to install never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
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
