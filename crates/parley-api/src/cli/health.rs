//! `parley health`: upstream configuration status and probe.

use crate::state::AppState;

pub async fn health(state: &AppState, json: bool) -> anyhow::Result<()> {
    let status = state.upstream_status().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", console::style("✓").green())
        } else {
            format!("{}", console::style("✗").red())
        }
    };

    println!();
    println!(
        "  Upstream {} ({})",
        console::style(&status.provider).cyan(),
        status.model
    );
    println!();
    println!("  {} API key present", check_mark(status.api_key_present));
    println!(
        "  {} API key format valid",
        check_mark(status.api_key_format_valid)
    );
    println!(
        "  {} Client initialized",
        check_mark(status.client_initialized)
    );
    if status.using_fallback {
        println!("  {}", console::style("Running in fallback mode").yellow());
    }
    if let Some(ok) = status.probe_ok {
        println!("  {} Probe call", check_mark(ok));
        if let Some(sample) = &status.probe_sample {
            println!("      {}", console::style(sample).dim());
        }
        if let Some(error) = &status.probe_error {
            println!("      {}", console::style(error).red());
        }
    }
    println!(
        "  Conversation memory: {} entries",
        status.conversation_memory_size
    );
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{Behavior, test_state};

    #[tokio::test]
    async fn test_health_prints_both_formats() {
        let state = test_state(Some(Behavior::Fail));
        health(&state, true).await.unwrap();
        health(&state, false).await.unwrap();
    }
}
