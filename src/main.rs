use anyhow::{bail, Result};
use awsim_launch::cli::Cli;
use awsim_launch::config::{FsConfigLoader, PackageResolver, DECLARED_ARGUMENTS};
use awsim_launch::orchestrator::Orchestrator;
use awsim_launch::runtime::{launch, setup_tracing};
use awsim_launch::supervisor::{DryRunSupervisor, LocalSupervisor, ProcessSupervisor};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_args {
        println!("Arguments (pass arguments as '<name>:=<value>'):");
        for arg in DECLARED_ARGUMENTS {
            println!("\n    '{}':\n        {}", arg.name, arg.description);
        }
        return Ok(());
    }

    setup_tracing();

    let sources = cli.parameter_sources(&PackageResolver::from_env())?;
    let orchestrator = Orchestrator::new(FsConfigLoader, sources).with_namespace(cli.namespace.clone());
    let args = cli.launch_args();

    if cli.print_plan {
        let plan = orchestrator.build_plan(&args)?;
        print!("{}", serde_yaml::to_string(&plan)?);
        return Ok(());
    }

    let supervisor: Box<dyn ProcessSupervisor> = if cli.dry_run {
        Box::new(DryRunSupervisor::new(cli.ros2_bin.clone()))
    } else {
        let mut local = LocalSupervisor::new(cli.ros2_bin.clone());
        if let Some(dir) = &cli.log_dir {
            local = local.with_log_dir(dir);
        }
        info!(log_dir = %local.log_dir().display(), "Writing node output logs");
        Box::new(local)
    };

    info!(namespace = %orchestrator.namespace(), "Starting launch");
    let report = launch(&orchestrator, &args, supervisor.as_ref()).await?;

    if !report.interrupted && !report.success() {
        let failed: Vec<&str> = report
            .exits
            .iter()
            .filter(|exit| !exit.success())
            .map(|exit| exit.label.as_str())
            .collect();
        bail!("Processes exited with failure: {}", failed.join(", "));
    }
    Ok(())
}
