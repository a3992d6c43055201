use crate::model::OutputMode;
use crate::supervisor::{CommandLine, ProcessExit, SupervisorError};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

/// How long children get to exit after SIGINT before their process group is killed.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

const MAX_LOG_NAME_LEN: usize = 64;

/// A started child plus the tasks forwarding its output.
struct RunningProcess {
    label: String,
    child: Child,
    /// Process group led by the child. Cleared once the group has been killed.
    group: Option<i32>,
    forwarders: Vec<JoinHandle<()>>,
    exit: Option<ProcessExit>,
}

impl RunningProcess {
    /// SIGKILLs everything left in the child's process group.
    fn kill_group(&mut self) -> Result<(), SupervisorError> {
        if let Some(group) = self.group.take() {
            signal_group(group, libc::SIGKILL).map_err(|source| SupervisorError::Kill {
                label: self.label.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn record_exit(&mut self, status: ExitStatus) -> &ProcessExit {
        self.exit.insert(ProcessExit {
            label: self.label.clone(),
            code: status.code(),
        })
    }
}

/// Where a child's stdout/stderr end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRoute {
    /// Lines are appended to a per-process file in the log directory.
    pub log_file: bool,
    /// Lines reach this process's stdout/stderr.
    pub terminal: bool,
}

impl OutputRoute {
    pub fn for_mode(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Screen => Self {
                log_file: false,
                terminal: true,
            },
            OutputMode::Log => Self {
                log_file: true,
                terminal: false,
            },
            OutputMode::Both => Self {
                log_file: true,
                terminal: true,
            },
        }
    }
}

/// Owns every process started for one launch.
///
/// `LaunchSystem` is responsible for:
/// - **Startup**: spawning each command in its own process group, wiring output per its [`OutputMode`]
/// - **Supervision**: waiting for every child to exit
/// - **Shutdown**: SIGINT to each group, then SIGKILL after [`SHUTDOWN_GRACE_PERIOD`]
///
/// Dropping a `LaunchSystem` without calling [`shutdown`](Self::shutdown)
/// kills every group that is still alive.
pub struct LaunchSystem {
    processes: Vec<RunningProcess>,
}

impl LaunchSystem {
    /// Spawns every command in order.
    ///
    /// Output of `Log` and `Both` commands is written to `<log_dir>/<label>.log`.
    /// If one command fails to start, the ones already running are killed and
    /// the error is returned.
    pub fn start(commands: Vec<CommandLine>, log_dir: &Path) -> Result<Self, SupervisorError> {
        let mut processes: Vec<RunningProcess> = Vec::with_capacity(commands.len());

        for line in commands {
            debug!(command = %line, "Spawning");
            let route = OutputRoute::for_mode(line.output);

            let log = if route.log_file {
                let path = log_dir.join(log_file_name(&line.label));
                match open_log(&path) {
                    Ok(file) => Some((path, file)),
                    Err(source) => {
                        error!(process = %line.label, path = %path.display(), error = %source, "Failed to open log file");
                        abort(&mut processes);
                        return Err(SupervisorError::LogFile { path, source });
                    }
                }
            } else {
                None
            };

            let mut command = line.to_command();
            command.kill_on_drop(true).stdin(Stdio::null()).process_group(0);
            if log.is_some() {
                command.stdout(Stdio::piped()).stderr(Stdio::piped());
            } else {
                command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }

            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(source) => {
                    error!(process = %line.label, error = %source, "Failed to start");
                    abort(&mut processes);
                    return Err(SupervisorError::Spawn {
                        label: line.label,
                        source,
                    });
                }
            };
            info!(process = %line.label, pid = ?child.id(), "Started");

            let mut forwarders = Vec::new();
            if let Some((path, file)) = log {
                debug!(process = %line.label, path = %path.display(), "Logging output");
                let files = file.try_clone().map(|copy| (file, copy));
                match files {
                    Ok((out_file, err_file)) => {
                        if let Some(stdout) = child.stdout.take() {
                            forwarders.push(tokio::spawn(forward(
                                line.label.clone(),
                                stdout,
                                out_file,
                                Stream::Stdout,
                                route.terminal,
                            )));
                        }
                        if let Some(stderr) = child.stderr.take() {
                            forwarders.push(tokio::spawn(forward(
                                line.label.clone(),
                                stderr,
                                err_file,
                                Stream::Stderr,
                                route.terminal,
                            )));
                        }
                    }
                    Err(source) => {
                        error!(process = %line.label, error = %source, "Failed to share log file");
                        processes.push(RunningProcess {
                            label: line.label,
                            group: group_of(&child),
                            child,
                            forwarders,
                            exit: None,
                        });
                        abort(&mut processes);
                        return Err(SupervisorError::LogFile { path, source });
                    }
                }
            }

            processes.push(RunningProcess {
                label: line.label,
                group: group_of(&child),
                child,
                forwarders,
                exit: None,
            });
        }

        Ok(Self { processes })
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Waits until every process has exited, returning exits in start order.
    ///
    /// Once a child exits, whatever it left behind in its process group is
    /// killed. Safe to cancel: processes that already exited keep their
    /// recorded exit.
    pub async fn wait_all(&mut self) -> Result<Vec<ProcessExit>, SupervisorError> {
        for process in &mut self.processes {
            if process.exit.is_some() {
                continue;
            }
            let status = process.child.wait().await.map_err(|source| SupervisorError::Wait {
                label: process.label.clone(),
                source,
            })?;
            process.kill_group()?;
            join_forwarders(process).await;

            let exit = process.record_exit(status);
            if exit.success() {
                info!(process = %exit.label, "Exited");
            } else {
                warn!(process = %exit.label, code = ?exit.code, "Exited with failure");
            }
        }
        Ok(self.exits())
    }

    /// Stops every process still running within [`SHUTDOWN_GRACE_PERIOD`].
    pub async fn shutdown(self) -> Result<Vec<ProcessExit>, SupervisorError> {
        self.shutdown_within(SHUTDOWN_GRACE_PERIOD).await
    }

    /// Sends SIGINT to every process group still running, waits up to `grace`
    /// for the children to exit, then SIGKILLs whatever remains.
    pub async fn shutdown_within(mut self, grace: Duration) -> Result<Vec<ProcessExit>, SupervisorError> {
        info!("Shutting down processes...");

        for process in &mut self.processes {
            if process.exit.is_some() {
                continue;
            }
            let running = process
                .child
                .try_wait()
                .map_err(|source| SupervisorError::Wait {
                    label: process.label.clone(),
                    source,
                })?
                .is_none();
            if let (true, Some(group)) = (running, process.group) {
                debug!(process = %process.label, group, "Sending SIGINT");
                signal_group(group, libc::SIGINT).map_err(|source| SupervisorError::Kill {
                    label: process.label.clone(),
                    source,
                })?;
            }
        }

        let deadline = Instant::now() + grace;
        for process in &mut self.processes {
            if process.exit.is_none() {
                let status = match timeout_at(deadline, process.child.wait()).await {
                    Ok(waited) => waited,
                    Err(_) => {
                        warn!(process = %process.label, "Still running after {:?}, killing", grace);
                        process.kill_group()?;
                        process.child.wait().await
                    }
                }
                .map_err(|source| SupervisorError::Wait {
                    label: process.label.clone(),
                    source,
                })?;
                process.record_exit(status);
            }
            process.kill_group()?;
            join_forwarders(process).await;
        }

        info!("Shutdown complete.");
        Ok(self.exits())
    }

    fn exits(&self) -> Vec<ProcessExit> {
        self.processes.iter().filter_map(|p| p.exit.clone()).collect()
    }
}

impl Drop for LaunchSystem {
    fn drop(&mut self) {
        abort(&mut self.processes);
    }
}

/// Kills every group still owned by `processes`, logging failures.
fn abort(processes: &mut [RunningProcess]) {
    for process in processes {
        if let Err(e) = process.kill_group() {
            error!(process = %process.label, error = %e, "Failed to kill process group");
        }
    }
}

fn group_of(child: &Child) -> Option<i32> {
    child.id().and_then(|pid| i32::try_from(pid).ok())
}

/// Sends `signal` to every process in `group`. A group that no longer exists is not an error.
fn signal_group(group: i32, signal: libc::c_int) -> io::Result<()> {
    // SAFETY: kill(2) only takes integers; a negative pid addresses the whole group.
    let result = unsafe { libc::kill(-group, signal) };
    if result == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(())
    } else {
        Err(err)
    }
}

/// File name for a process's output: the label with anything outside
/// `[A-Za-z0-9_-]` replaced by `_`.
pub fn log_file_name(label: &str) -> String {
    let stem: String = label
        .chars()
        .take(MAX_LOG_NAME_LEN)
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}.log", stem)
}

/// `$ROS_LOG_DIR`, else `$ROS_HOME/log`, else `~/.ros/log`, with a
/// per-run `awsim-launch-<pid>` directory underneath.
pub fn default_log_dir() -> PathBuf {
    let base = log_base_dir(
        std::env::var_os("ROS_LOG_DIR").map(PathBuf::from),
        std::env::var_os("ROS_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    );
    base.join(format!("awsim-launch-{}", std::process::id()))
}

fn log_base_dir(ros_log_dir: Option<PathBuf>, ros_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    ros_log_dir
        .or_else(|| ros_home.map(|dir| dir.join("log")))
        .or_else(|| home.map(|dir| dir.join(".ros").join("log")))
        .unwrap_or_else(|| std::env::temp_dir().join("ros").join("log"))
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

async fn join_forwarders(process: &mut RunningProcess) {
    for handle in process.forwarders.drain(..) {
        if let Err(e) = handle.await {
            error!(process = %process.label, "Output forwarder failed: {:?}", e);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

async fn forward<R: AsyncRead + Unpin>(label: String, reader: R, log: File, stream: Stream, terminal: bool) {
    let mut log = tokio::fs::File::from_std(log);
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Err(e) = log.write_all(format!("{}\n", line).as_bytes()).await {
                    warn!(process = %label, error = %e, "Failed to write log file");
                }
                if terminal {
                    match stream {
                        Stream::Stdout => println!("[{}] {}", label, line),
                        Stream::Stderr => eprintln!("[{}] {}", label, line),
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(process = %label, error = %e, "Stopped reading output");
                break;
            }
        }
    }
    if let Err(e) = log.flush().await {
        warn!(process = %label, error = %e, "Failed to flush log file");
    }
}
