//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Upstream settings are read
//! from flags or their matching environment variables.

pub mod ask;
pub mod health;
pub mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use parley_core::chat::memory::MAX_TURNS;
use parley_infra::config::UpstreamConfig;
use parley_infra::llm::openai_compat::config::{GROQ_BASE_URL, GROQ_DEFAULT_MODEL};

/// Conversational response server with a local fallback.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(flatten)]
    pub upstream: UpstreamArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static files served alongside the API.
        #[arg(long, env = "PARLEY_WEB_DIR", default_value = "web")]
        web_dir: PathBuf,
    },

    /// Send one message through the pipeline and print the reply.
    Ask {
        /// The user message.
        text: String,

        /// Print the reply fragment by fragment.
        #[arg(long)]
        stream: bool,
    },

    /// Show upstream configuration and run a probe call.
    Health,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Upstream and memory settings shared by every command.
#[derive(Args)]
pub struct UpstreamArgs {
    /// Upstream API key. Unset or blank runs in fallback mode.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Upstream model identifier.
    #[arg(long, env = "GROQ_MODEL", default_value = GROQ_DEFAULT_MODEL, global = true)]
    pub model: String,

    /// OpenAI-compatible base URL.
    #[arg(long, env = "GROQ_BASE_URL", default_value = GROQ_BASE_URL, global = true)]
    pub base_url: String,

    /// Per-request upstream timeout in seconds.
    #[arg(long, env = "PARLEY_REQUEST_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Conversation turns kept in memory (entries = 2 x turns).
    #[arg(long, env = "PARLEY_MAX_TURNS", default_value_t = MAX_TURNS, global = true)]
    pub max_turns: usize,
}

impl UpstreamArgs {
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig::new(
            self.api_key.clone(),
            self.model.clone(),
            self.base_url.clone(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["parley", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host, .. } => {
                assert_eq!(port, 5000);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_ask_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "parley",
            "ask",
            "hello",
            "--stream",
            "--json",
            "--model",
            "llama-3.3-70b-versatile",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.upstream.model, "llama-3.3-70b-versatile");
        let config = cli.upstream.upstream_config();
        assert_eq!(config.timeout, Duration::from_secs(5));
        match cli.command {
            Commands::Ask { text, stream } => {
                assert_eq!(text, "hello");
                assert!(stream);
            }
            _ => panic!("expected ask"),
        }
    }
}
