use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::app::App;

mod cli;

#[tokio::main]
async fn main() {
    let app = App::parse();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time();
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(stdout_layer)
        .try_init();

    // Ctrl-C flips a flag that the build and materialize loops poll between
    // entries, so an interrupt unwinds through the normal cleanup paths
    // instead of killing a half-written archive.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received; stopping after the current entry");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    if let Err(err) = cli::run(app, cancel).await {
        error!("fabriq: fatal: {err:#}");
        process::exit(1);
    }
}
