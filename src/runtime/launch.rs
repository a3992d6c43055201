use crate::config::{ConfigLoadError, ConfigLoader, LaunchArgs};
use crate::orchestrator::Orchestrator;
use crate::supervisor::{LaunchReport, ProcessSupervisor, SupervisorError};
use thiserror::Error;
use tracing::{error, info, instrument};

/// Anything that can go wrong between reading parameter files and the last
/// process exiting.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

/// Builds the launch plan and hands it to `supervisor`.
///
/// The supervisor is only called once the whole plan exists. A configuration
/// error returns before anything is started.
#[instrument(skip_all)]
pub async fn launch<L, S>(
    orchestrator: &Orchestrator<L>,
    args: &LaunchArgs,
    supervisor: &S,
) -> Result<LaunchReport, LaunchError>
where
    L: ConfigLoader,
    S: ProcessSupervisor + ?Sized,
{
    let plan = orchestrator.build_plan(args).inspect_err(|e| {
        error!(error = %e, "Could not build launch plan");
    })?;

    info!(entries = plan.len(), "Handing plan to supervisor");
    let report = supervisor.execute(plan).await?;

    info!(
        processes = report.exits.len(),
        interrupted = report.interrupted,
        success = report.success(),
        "Launch finished"
    );
    Ok(report)
}
