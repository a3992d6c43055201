/// Initializes the tracing/logging infrastructure for the launcher.
///
/// Log verbosity comes from `RUST_LOG` and falls back to `info`:
/// - `RUST_LOG=debug` - also show loaded parameter files and resolved packages
/// - `RUST_LOG=awsim_launch=trace` - everything from this crate
///
/// Output of child processes running in `log` or `both` mode is forwarded at
/// `info` (stdout) and `warn` (stderr) with a `process` field.
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Launcher started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}
