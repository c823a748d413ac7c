//! Live change feed.

use std::sync::Arc;

use chrono::Local;
use owo_colors::OwoColorize;
use serde::Serialize;
use tokio::sync::mpsc;

use homeweave_core::{ChangeEvent, Provider};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StampedEvent<'a> {
    received_at: String,
    #[serde(flatten)]
    event: &'a ChangeEvent,
}

fn render_event(event: &ChangeEvent, format: &OutputFormat, color: bool) -> Result<String, CliError> {
    let now = Local::now();
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(
            &StampedEvent {
                received_at: now.to_rfc3339(),
                event,
            },
            true,
        ),
        OutputFormat::Plain => Ok(event.name.clone()),
        OutputFormat::Table => {
            let stamp = now.format("%H:%M:%S").to_string();
            let name = if color {
                event.name.cyan().to_string()
            } else {
                event.name.clone()
            };
            Ok(format!("{stamp}  {name}  {}", event.option))
        }
    }
}

pub async fn handle(
    provider: &dyn Provider,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ChangeEvent>();
    let subscription = provider.subscribe(Arc::new(move |events: Vec<ChangeEvent>| {
        for event in events {
            // Receiver gone means we are shutting down.
            let _ = tx.send(event);
        }
    }));

    if !global.quiet {
        eprintln!("Watching for changes (Ctrl-C to stop)");
    }

    let color = output::should_color(&global.color);
    let deadline = args.duration.map(|d| tokio::time::Instant::now() + d);
    let expired = async move {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    };
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(expired, interrupted);

    let mut seen = 0_usize;
    let outcome = loop {
        tokio::select! {
            received = rx.recv() => {
                let Some(event) = received else { break Ok(()) };
                match render_event(&event, &global.output, color) {
                    Ok(line) => output::print_output(&line, global.quiet),
                    Err(e) => break Err(e),
                }
                seen += 1;
                if args.count.is_some_and(|max| seen >= max) {
                    break Ok(());
                }
            }
            _ = &mut interrupted => break Ok(()),
            () = &mut expired => break Ok(()),
        }
    };

    provider.unsubscribe();
    subscription.join().await?;
    tracing::debug!(seen, "watch finished");
    outcome
}
