//! `parley ask`: one message through the local pipeline.

use std::io::Write;

use parley_types::chat::{DONE_SENTINEL, StreamItem};

use crate::state::AppState;

/// Print the reply to `text`, whole or fragment by fragment.
///
/// With `json`, the whole reply prints as `{"text", "source"}` and a
/// streamed reply prints one `{"token"}` object per line followed by the
/// sentinel.
pub async fn ask(state: &AppState, text: &str, stream: bool, json: bool) -> anyhow::Result<()> {
    if !stream {
        let reply = state.orchestrator.respond_detailed(text).await;
        if json {
            println!("{}", serde_json::to_string_pretty(&reply)?);
        } else {
            println!("{}", reply.text);
        }
        return Ok(());
    }

    let chunker = state.orchestrator.respond_stream(text).await;
    let mut stdout = std::io::stdout().lock();
    for item in chunker {
        match item {
            StreamItem::Fragment(fragment) if json => {
                writeln!(stdout, "{}", serde_json::to_string(&fragment)?)?;
            }
            StreamItem::Fragment(fragment) => {
                write!(stdout, "{}", fragment.token)?;
                stdout.flush()?;
            }
            StreamItem::Done if json => writeln!(stdout, "{DONE_SENTINEL}")?,
            StreamItem::Done => writeln!(stdout)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{Behavior, test_state};

    #[tokio::test]
    async fn test_ask_records_turns() {
        let state = test_state(Some(Behavior::Reply("Sure.")));
        ask(&state, "hello", false, false).await.unwrap();
        ask(&state, "again", true, true).await.unwrap();
        assert_eq!(state.orchestrator.memory().lock().await.len(), 4);
    }
}
