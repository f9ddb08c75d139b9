//! Room list scenario replay.
//!
//! Feeds a JSON scenario through the store runtime and logs every published
//! set of room lists.
//!
//! # Usage
//!
//! ```bash
//! # Replay a scenario
//! roomlist-replay crates/roomlist-replay/scenarios/retag.json
//!
//! # Fail on the first invariant violation, with per-event debug logs
//! roomlist-replay --check-invariants --log-level debug scenario.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use roomlist_core::{Room, RoomListView, Runtime};
use roomlist_harness::{InvariantRegistry, Scenario, SimRoom};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Room list scenario replay
#[derive(Parser, Debug)]
#[command(name = "roomlist-replay")]
#[command(about = "Replay a room list scenario and log the resulting buckets")]
#[command(version)]
struct Args {
    /// Path to the scenario file (JSON)
    scenario: PathBuf,

    /// Check bucket invariants on every published view
    #[arg(long)]
    check_invariants: bool,

    /// Replay as this user instead of the scenario's
    #[arg(long)]
    user_id: Option<String>,

    /// Only log non-empty buckets
    #[arg(long)]
    skip_empty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn log_view(view: &RoomListView<SimRoom>, skip_empty: bool) {
    tracing::info!(generation = view.generation, ready = view.ready, "room lists");
    for (key, rooms) in view.lists.buckets() {
        if skip_empty && rooms.is_empty() {
            continue;
        }
        let ids: Vec<&str> = rooms.iter().map(|room| room.room_id().as_str()).collect();
        tracing::info!(bucket = key, rooms = ?ids);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Replaying {}", args.scenario.display());

    let mut scenario = Scenario::load(&args.scenario)?;
    if let Some(user_id) = args.user_id {
        scenario.user_id = user_id;
    }

    let mut driver = scenario.into_driver()?;
    if args.check_invariants {
        driver = driver.with_invariants(InvariantRegistry::standard());
    }

    let direct_messages = driver.direct_messages().clone();
    let mut runtime = Runtime::new(driver, direct_messages);

    let mut events = 0usize;
    let mut last_generation = 0;
    while runtime.step().await? {
        events += 1;
        let view = runtime.view();
        if view.generation != last_generation {
            last_generation = view.generation;
            log_view(&view, args.skip_empty);
        }
    }

    let view = runtime.view();
    if !view.ready {
        tracing::warn!("Store is not ready at the end of the scenario");
    }
    tracing::info!(events, notifications = view.generation, "Replay finished");

    Ok(())
}
