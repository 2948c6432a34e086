//! Parley CLI and HTTP server entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes tracing and the shared conversation
//! pipeline, then dispatches to the command handler or starts the server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use parley_observe::tracing_setup::DEFAULT_FILTER;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if matches!(cli.command, Commands::Serve { .. }) => DEFAULT_FILTER,
        0 => "warn",
        1 => "info,parley=debug,parley_core=debug,parley_infra=debug",
        _ => "trace",
    };
    parley_observe::tracing_setup::init_tracing(cli.otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = cli.upstream.upstream_config();

    let result = match cli.command {
        Commands::Serve {
            port,
            host,
            web_dir,
        } => {
            let state = AppState::init(config, cli.upstream.max_turns, web_dir);
            cli::serve::serve(state, &host, port).await
        }

        Commands::Ask { text, stream } => {
            let state = AppState::init(config, cli.upstream.max_turns, Default::default());
            cli::ask::ask(&state, &text, stream, cli.json).await
        }

        Commands::Health => {
            let state = AppState::init(config, cli.upstream.max_turns, Default::default());
            cli::health::health(&state, cli.json).await
        }

        Commands::Completions { .. } => Ok(()),
    };

    parley_observe::tracing_setup::shutdown_tracing();
    result
}
