//! Recoder binary.
//!
//! Streams an Avro Object Container File from stdin, rewrites one configured
//! column between string keys and 128-bit identifiers using a mapping file,
//! and writes the re-encoded container to stdout. On success the process
//! exits cleanly; any unrecovered error is reported on the diagnostic channel
//! and the process exits non-zero. Output may be partially flushed when the
//! run fails, so a non-zero exit means the output must be discarded.

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use avromap::concurrency::shutdown::ShutdownToken;

use crate::config::load_recoder_config;
use crate::core::start_recoder_with_config;
use crate::error::RecoderResult;

mod config;
mod core;
mod error;

/// Initializes tracing on stderr, keeping stdout free for container bytes.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avromap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // A consumer-requested stop is the pipeline's result, not an
            // application error; it still exits non-zero because the output
            // may be truncated.
            if !err.is_cancellation() {
                error!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> RecoderResult<()> {
    let recoder_config = load_recoder_config()?;

    let shutdown = ShutdownToken::new();

    start_recoder_with_config(recoder_config, shutdown)
}
