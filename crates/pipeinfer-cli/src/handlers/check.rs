//! Check command handler.
//!
//! Starts the worker, waits for its readiness token and stops it again.

use anyhow::Result;
use pipeinfer_core::InferenceService;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the check command.
///
/// # Errors
///
/// Returns `CliError::Worker` with the worker's captured output if it
/// could not be started or never became ready.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let settings = ctx.settings();
    println!(
        "Starting {} {}",
        settings.worker_executable.display(),
        settings.worker_args().join(" ")
    );

    ctx.session().start().await.map_err(CliError::from)?;
    println!("Worker is ready ({} printed)", settings.readiness_token);

    ctx.session().shutdown().await;
    Ok(())
}
