//! # Headline Cards
//!
//! A terminal client for the NewsAPI `top-headlines` endpoint. Headlines are
//! fetched on start-up and on demand, normalized into cards and written to
//! stdout, with a status line reporting the last update, failures and
//! connectivity changes.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... headline_cards --country us --category technology
//! ```
//!
//! ## Architecture
//!
//! Everything runs on one thread:
//! 1. **Input**: a reader thread turns typed commands into events
//! 2. **Connectivity**: a local task probes the provider and reports transitions
//! 3. **Cycle**: each refresh is a local task; overlapping refreshes are dropped
//! 4. **Output**: cards and status lines go to stdout, logs to stderr

use std::error::Error;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod connectivity;
mod controller;
mod error;
mod events;
mod models;
mod normalize;
mod render;
mod request;
mod status;
mod transport;
mod utils;

use cli::Cli;
use config::ApiConfig;
use controller::FetchCycle;
use events::{AppEvent, Flow};
use models::CycleState;
use render::{TerminalView, View};
use status::{StatusLine, StatusReporter};
use transport::{HeadlineTransport, ReqwestTransport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    let config = ApiConfig::from_cli(&args);
    info!(?config, once = args.once, "headline_cards starting up");
    if !config.has_credential() {
        warn!("No API key configured; every refresh will fail until NEWS_API_KEY is set");
    }

    let cycle = Rc::new(FetchCycle::new(
        config.clone(),
        ReqwestTransport::new(),
        TerminalView::new(io::stdout()),
        StatusLine::new(io::stdout()),
    ));

    if args.once {
        cycle.refresh().await;
        return match cycle.state() {
            CycleState::Failed(message) => Err(message.into()),
            _ => Ok(()),
        };
    }

    let probe_every = Duration::from_secs(args.probe_interval.max(1));
    LocalSet::new()
        .run_until(run_session(cycle, &config, probe_every))
        .await;

    info!("headline_cards shutting down");
    Ok(())
}

/// Register the event sources once, then apply events until the user quits.
#[instrument(level = "info", skip_all)]
async fn run_session<T, V, S>(cycle: Rc<FetchCycle<T, V, S>>, config: &ApiConfig, probe_every: Duration)
where
    T: HeadlineTransport + 'static,
    V: View + 'static,
    S: StatusReporter + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Tokio's stdin would keep the runtime alive on shutdown; a detached
    // thread does not.
    let input_tx = tx.clone();
    std::thread::spawn(move || events::read_commands(io::stdin().lock(), input_tx));

    match config.provider_authority() {
        Some((host, port)) => {
            tokio::task::spawn_local(connectivity::watch(host, port, probe_every, tx.clone()));
        }
        None => warn!("Provider URL has no host; connectivity watch disabled"),
    }

    // Initial load, as if the user had asked for it.
    let _ = tx.send(AppEvent::Refresh);
    drop(tx);

    while let Some(event) = rx.recv().await {
        debug!(?event, "Event");
        match events::dispatch(event, &cycle) {
            Flow::Continue => {}
            Flow::Exit => break,
            Flow::Drain => {
                events::wait_idle(&cycle).await;
                break;
            }
        }
    }
}
