//! KatiCRM admin console
//!
//! Terminal front end for the ticket-reporting backend. Run without arguments
//! for an interactive shell, or pass a single command, e.g.
//! `kati-console nav /companies`.

mod notify;
mod pages;
mod shell;
mod state;
mod ui;

use anyhow::Context;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::shell::{Shell, Terminal};
use crate::state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with page output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kati_console=info,kati_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = std::env::var("KATI_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".kati-console"));

    tracing::info!("Using data directory: {:?}", data_dir);

    let state = AppState::new(&data_dir)
        .await
        .with_context(|| format!("Failed to open console storage in {:?}", data_dir))?;

    let mut shell = Shell::new(state);
    let mut terminal = Terminal::new(
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        shell.run(&mut terminal).await?;
    } else {
        shell.execute_words(&args, &mut terminal).await?;
    }
    Ok(())
}
