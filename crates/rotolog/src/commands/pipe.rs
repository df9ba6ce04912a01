//! Pipe command implementation - copies stdin into a rotating log file

use anyhow::Result;
use rotolog_logs::{LogCapture, RotatingWriter};
use std::sync::Arc;
use tracing::info;

use crate::cli::PipeArgs;

pub async fn execute(args: PipeArgs) -> Result<()> {
    let config = super::resolve_config(&args.target)?;
    let writer = Arc::new(RotatingWriter::new(config)?);

    let lines = LogCapture::new(Arc::clone(&writer))
        .with_timestamps(args.timestamps)
        .with_echo(args.tee)
        .run(tokio::io::stdin())
        .await;

    // Close even if reading stdin failed, so buffered data reaches the file
    let closed = writer.close();
    let lines = lines?;
    closed?;

    info!("Captured {} lines into {}", lines, writer.path().display());
    Ok(())
}
